use std::thread::{self, JoinHandle};

use crate::notification::domain::notification_sink::NotificationSink;
use crate::pipeline::frame_handoff::FrameHandoff;
use crate::pipeline::identity_debouncer::IdentityDebouncer;
use crate::pipeline::identity_store::{identity_store, IdentityStore};
use crate::pipeline::notification_dispatcher::{DispatchReport, NotificationDispatcher};
use crate::pipeline::pipeline_error::PipelineError;
use crate::pipeline::recognition_worker::RecognitionWorker;
use crate::recognition::domain::identity_recognizer::IdentityRecognizer;
use crate::shared::cancellation::CancellationToken;
use crate::shared::constants::LABEL_CHANNEL_CAPACITY;
use crate::shared::settings::Settings;

/// Background half of the watch pipeline, running on dedicated threads.
///
/// Layout: `handoff → recognition worker → debouncer → identity store`,
/// with the debouncer feeding a notification dispatcher on the side.
///
/// The caller keeps [`ThreadedRecognitionPipeline::handoff`] and
/// [`ThreadedRecognitionPipeline::identity`] for the capture loop and calls
/// [`PipelineHandle::shutdown`] once it is done.
pub struct ThreadedRecognitionPipeline {
    pub handoff: FrameHandoff,
    pub identity: IdentityStore,
    pub handle: PipelineHandle,
}

impl ThreadedRecognitionPipeline {
    pub fn spawn(
        recognizer: Box<dyn IdentityRecognizer>,
        sink: Box<dyn NotificationSink>,
        settings: &Settings,
    ) -> Result<Self, PipelineError> {
        let cancel = CancellationToken::new();
        let (identity, publisher) = identity_store();
        let (handoff, frame_rx) = FrameHandoff::new();
        let (label_tx, label_rx) = crossbeam_channel::bounded(LABEL_CHANNEL_CAPACITY);
        let (note_tx, note_rx) = crossbeam_channel::bounded(settings.notification_queue);

        let dispatcher = NotificationDispatcher::new(sink);
        let dispatcher_cancel = cancel.clone();
        let dispatcher_handle = spawn_named("notification-dispatcher", move || {
            dispatcher.run(note_rx, &dispatcher_cancel)
        })?;

        let debouncer = IdentityDebouncer::new(publisher, settings.idle_timeout(), note_tx);
        let debouncer_cancel = cancel.clone();
        let debouncer_handle = spawn_named("identity-debouncer", move || {
            debouncer.run(label_rx, &debouncer_cancel)
        })
        .map_err(|e| {
            cancel.cancel();
            e
        })?;

        let worker = RecognitionWorker::new(
            recognizer,
            settings.collection_id.clone(),
            settings.match_threshold,
        );
        let worker_cancel = cancel.clone();
        let worker_handle = spawn_named("recognition-worker", move || {
            worker.run(frame_rx, label_tx, &worker_cancel)
        })
        .map_err(|e| {
            cancel.cancel();
            e
        })?;

        Ok(Self {
            handoff,
            identity,
            handle: PipelineHandle {
                cancel,
                worker: worker_handle,
                debouncer: debouncer_handle,
                dispatcher: dispatcher_handle,
            },
        })
    }
}

/// Stops and joins the background threads.
pub struct PipelineHandle {
    cancel: CancellationToken,
    worker: JoinHandle<()>,
    debouncer: JoinHandle<()>,
    dispatcher: JoinHandle<DispatchReport>,
}

impl PipelineHandle {
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Cancels all threads and waits for them.
    ///
    /// A recognition call already in flight is not interrupted; the join
    /// waits for it to return or hit its own deadline.
    pub fn shutdown(self) -> Result<DispatchReport, PipelineError> {
        self.cancel.cancel();
        join_threads(self.worker, self.debouncer, self.dispatcher)
    }
}

fn spawn_named<T, F>(name: &'static str, f: F) -> Result<JoinHandle<T>, PipelineError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    thread::Builder::new()
        .name(name.to_string())
        .spawn(f)
        .map_err(|source| PipelineError::Spawn { name, source })
}

/// Joins all pipeline threads and reports the first panic encountered.
fn join_threads(
    worker: JoinHandle<()>,
    debouncer: JoinHandle<()>,
    dispatcher: JoinHandle<DispatchReport>,
) -> Result<DispatchReport, PipelineError> {
    fn set_if_none(slot: &mut Option<PipelineError>, err: PipelineError) {
        if slot.is_none() {
            *slot = Some(err);
        }
    }

    let mut first_error = None;

    if worker.join().is_err() {
        set_if_none(&mut first_error, PipelineError::ThreadPanicked("recognition-worker"));
    }
    if debouncer.join().is_err() {
        set_if_none(&mut first_error, PipelineError::ThreadPanicked("identity-debouncer"));
    }
    let report = match dispatcher.join() {
        Ok(report) => report,
        Err(_) => {
            set_if_none(
                &mut first_error,
                PipelineError::ThreadPanicked("notification-dispatcher"),
            );
            DispatchReport::default()
        }
    };

    match first_error {
        Some(e) => Err(e),
        None => Ok(report),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::frame_handoff::HandoffOutcome;
    use crate::recognition::domain::face_match::{FaceMatch, RecognitionRequest};
    use crate::recognition::domain::identity_recognizer::RecognitionFailure;
    use crate::shared::frame::Frame;
    use crossbeam_channel::{Receiver, Sender};
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    const WAIT: Duration = Duration::from_secs(5);

    enum Reply {
        Match(&'static str),
        NoMatch,
        Fail,
    }

    /// Answers every search with the same reply, optionally holding each
    /// call until the test releases it.
    struct FakeRecognizer {
        reply: Reply,
        entered: Option<Sender<()>>,
        release: Option<Receiver<()>>,
    }

    impl FakeRecognizer {
        fn replying(reply: Reply) -> Self {
            Self {
                reply,
                entered: None,
                release: None,
            }
        }
    }

    impl IdentityRecognizer for FakeRecognizer {
        fn search(&self, _request: &RecognitionRequest) -> Result<Vec<FaceMatch>, RecognitionFailure> {
            if let Some(entered) = &self.entered {
                let _ = entered.send(());
            }
            if let Some(release) = &self.release {
                let _ = release.recv();
            }
            match self.reply {
                Reply::Match(id) => Ok(vec![FaceMatch::new(99.0, id)]),
                Reply::NoMatch => Ok(vec![]),
                Reply::Fail => Err("recognition service timed out".into()),
            }
        }
    }

    struct RecordingSink {
        messages: Arc<Mutex<Vec<String>>>,
    }

    impl NotificationSink for RecordingSink {
        fn post(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            self.messages.lock().unwrap().push(message.to_string());
            Ok(())
        }
    }

    fn settings(idle_ms: u64) -> Settings {
        Settings {
            idle_timeout_ms: idle_ms,
            ..Settings::default()
        }
    }

    fn spawn(
        recognizer: FakeRecognizer,
        idle_ms: u64,
    ) -> (ThreadedRecognitionPipeline, Arc<Mutex<Vec<String>>>) {
        let messages = Arc::new(Mutex::new(Vec::new()));
        let sink = RecordingSink {
            messages: messages.clone(),
        };
        let pipeline =
            ThreadedRecognitionPipeline::spawn(Box::new(recognizer), Box::new(sink), &settings(idle_ms))
                .unwrap();
        (pipeline, messages)
    }

    fn frame(index: usize) -> Frame {
        Frame::new(vec![30u8; 6 * 6 * 3], 6, 6, 3, index)
    }

    fn wait_for<F: Fn() -> bool>(condition: F) -> bool {
        let deadline = Instant::now() + WAIT;
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }

    #[test]
    fn test_recognized_face_sets_identity_and_notifies() {
        let (pipeline, messages) = spawn(FakeRecognizer::replying(Reply::Match("Jane_Doe")), 9_000);

        assert_eq!(pipeline.handoff.offer(&frame(0)), HandoffOutcome::Accepted);

        assert!(wait_for(|| pipeline.identity.current().as_str() == "Jane Doe"));
        assert!(wait_for(|| messages.lock().unwrap().len() == 1));
        assert_eq!(messages.lock().unwrap()[0], "Jane Doe is at the office");
        pipeline.handle.shutdown().unwrap();
    }

    #[test]
    fn test_identity_decays_to_unknown_without_notification() {
        let (pipeline, messages) = spawn(FakeRecognizer::replying(Reply::Match("Jane_Doe")), 100);

        pipeline.handoff.offer(&frame(0));
        assert!(wait_for(|| pipeline.identity.current().as_str() == "Jane Doe"));
        assert!(wait_for(|| pipeline.identity.current().is_unknown()));

        let report = pipeline.handle.shutdown().unwrap();
        assert_eq!(report.delivered, 1);
        assert_eq!(messages.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_no_match_publishes_unknown_silently() {
        let (pipeline, messages) = spawn(FakeRecognizer::replying(Reply::NoMatch), 9_000);

        pipeline.handoff.offer(&frame(0));
        pipeline.handoff.offer(&frame(1));
        thread::sleep(Duration::from_millis(100));

        assert!(pipeline.identity.current().is_unknown());
        assert!(messages.lock().unwrap().is_empty());
        pipeline.handle.shutdown().unwrap();
    }

    #[test]
    fn test_failed_recognition_leaves_identity_and_accepts_next_frame() {
        let (pipeline, messages) = spawn(FakeRecognizer::replying(Reply::Fail), 9_000);

        pipeline.handoff.offer(&frame(0));
        assert!(wait_for(|| pipeline.handoff.offer(&frame(1)) == HandoffOutcome::Accepted));
        thread::sleep(Duration::from_millis(50));

        assert!(pipeline.identity.current().is_unknown());
        assert!(messages.lock().unwrap().is_empty());
        pipeline.handle.shutdown().unwrap();
    }

    #[test]
    fn test_frames_offered_during_recognition_are_dropped() {
        let (entered_tx, entered_rx) = crossbeam_channel::unbounded();
        let (release_tx, release_rx) = crossbeam_channel::unbounded();
        let recognizer = FakeRecognizer {
            reply: Reply::Match("Jane_Doe"),
            entered: Some(entered_tx),
            release: Some(release_rx),
        };
        let (pipeline, messages) = spawn(recognizer, 9_000);

        assert_eq!(pipeline.handoff.offer(&frame(0)), HandoffOutcome::Accepted);
        entered_rx.recv_timeout(WAIT).unwrap();

        // Worker is busy with frame 0: one frame may wait in the slot, the rest drop.
        assert_eq!(pipeline.handoff.offer(&frame(1)), HandoffOutcome::Accepted);
        for i in 2..50 {
            assert_eq!(pipeline.handoff.offer(&frame(i)), HandoffOutcome::Dropped);
        }

        release_tx.send(()).unwrap();
        entered_rx.recv_timeout(WAIT).unwrap();
        release_tx.send(()).unwrap();

        assert!(wait_for(|| messages.lock().unwrap().len() == 2));
        assert!(entered_rx.recv_timeout(Duration::from_millis(50)).is_err());
        pipeline.handle.shutdown().unwrap();
    }

    #[test]
    fn test_shutdown_while_idle_joins_promptly() {
        let (pipeline, _messages) = spawn(FakeRecognizer::replying(Reply::NoMatch), 9_000);
        let start = Instant::now();

        let report = pipeline.handle.shutdown().unwrap();

        assert!(start.elapsed() < Duration::from_secs(1));
        assert_eq!(report, DispatchReport::default());
    }

    #[test]
    fn test_handoff_closes_after_shutdown() {
        let ThreadedRecognitionPipeline {
            handoff, handle, ..
        } = spawn(FakeRecognizer::replying(Reply::NoMatch), 9_000).0;
        assert!(!handle.cancellation().is_cancelled());

        handle.shutdown().unwrap();

        assert_eq!(handoff.offer(&frame(0)), HandoffOutcome::Closed);
    }
}
