use std::env;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use facewatch_core::capture::domain::display_surface::DisplaySurface;
use facewatch_core::capture::domain::frame_source::FrameSource;
use facewatch_core::detection::domain::face_detector::FaceDetector;
use facewatch_core::notification::infrastructure::webhook_notifier::WebhookNotifier;
use facewatch_core::pipeline::infrastructure::threaded_recognition_pipeline::ThreadedRecognitionPipeline;
use facewatch_core::pipeline::watch_faces_use_case::WatchFacesUseCase;
use facewatch_core::recognition::infrastructure::http_face_search::HttpFaceSearch;
use facewatch_core::shared::constants::{RECOGNITION_URL_ENV, WEBHOOK_URL_ENV};
use facewatch_core::shared::settings::Settings;

/// Watches a webcam, recognizes faces remotely and announces who arrived.
#[derive(Parser)]
#[command(name = "facewatch")]
struct Cli {
    /// Camera device index.
    camera: Option<i32>,

    /// Cascade classifier XML file.
    classifier: Option<PathBuf>,
}

/// Capture, display and detection adapters for one session.
struct Devices {
    source: Box<dyn FrameSource>,
    display: Box<dyn DisplaySurface>,
    detector: Box<dyn FaceDetector>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let (camera, classifier) = match (cli.camera, cli.classifier) {
        (Some(camera), Some(classifier)) => (camera, classifier),
        _ => {
            println!("How to run:\n\tfacewatch [camera ID] [classifier XML file]");
            return Ok(());
        }
    };

    let webhook_url = match non_empty_env(WEBHOOK_URL_ENV) {
        Some(url) => url,
        None => {
            println!("{WEBHOOK_URL_ENV} is required");
            println!("Check your incoming-webhook at https://api.slack.com/");
            return Ok(());
        }
    };

    let settings = Settings::load();
    settings.validate()?;

    let recognition_url = non_empty_env(RECOGNITION_URL_ENV)
        .or_else(|| settings.recognition_url.clone())
        .ok_or_else(|| {
            format!(
                "No face recognition endpoint configured: set {RECOGNITION_URL_ENV} \
                 or recognition_url in the settings file"
            )
        })?;
    let recognizer = HttpFaceSearch::new(recognition_url, settings.recognition_timeout())?;
    let notifier = WebhookNotifier::new(webhook_url)?;

    let devices = open_devices(camera, &classifier, &settings)?;

    log::info!("start reading camera device {camera}");
    let pipeline =
        ThreadedRecognitionPipeline::spawn(Box::new(recognizer), Box::new(notifier), &settings)?;

    let watch = WatchFacesUseCase::new(
        devices.source,
        devices.detector,
        devices.display,
        pipeline.handoff,
        pipeline.identity,
        settings.key_poll(),
    );
    let watched = watch.execute();
    let report = pipeline.handle.shutdown()?;
    log::info!(
        "Notifications: {} delivered, {} failed",
        report.delivered,
        report.failed
    );
    watched?;

    Ok(())
}

#[cfg(feature = "opencv")]
fn open_devices(
    camera: i32,
    classifier: &Path,
    settings: &Settings,
) -> Result<Devices, Box<dyn std::error::Error>> {
    use facewatch_core::capture::infrastructure::opencv_camera::OpencvCamera;
    use facewatch_core::capture::infrastructure::opencv_window::OpencvWindow;
    use facewatch_core::detection::infrastructure::cascade_face_detector::CascadeFaceDetector;

    let source = OpencvCamera::open(camera)?;
    let display = OpencvWindow::open(&settings.window_title)?;
    let detector = CascadeFaceDetector::load(classifier)?;
    Ok(Devices {
        source: Box::new(source),
        display: Box::new(display),
        detector: Box::new(detector),
    })
}

#[cfg(not(feature = "opencv"))]
fn open_devices(
    _camera: i32,
    _classifier: &Path,
    _settings: &Settings,
) -> Result<Devices, Box<dyn std::error::Error>> {
    Err("camera, window and classifier support requires building with the `opencv` feature".into())
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
