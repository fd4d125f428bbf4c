use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("cannot read capture device: {0}")]
    Capture(String),
    #[error("face detection failed: {0}")]
    Detection(String),
    #[error("display failed: {0}")]
    Display(String),
    #[error("failed to spawn {name} thread: {source}")]
    Spawn {
        name: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} thread panicked")]
    ThreadPanicked(&'static str),
}
