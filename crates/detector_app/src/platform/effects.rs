use std::sync::Arc;
use std::time::Duration;

use detector_core::{Effect, Generation, MountId, Msg};
use detector_engine::{Clock, DocumentSource, ExtractionPoller, JobSubmission, Submitter};
use detector_logging::{detector_debug, detector_warn};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::AbortHandle;
use tokio::time::{interval, sleep, MissedTickBehavior};

use super::app::Input;

/// Engine-side collaborators the runner hands work to.
#[derive(Clone)]
pub struct Collaborators {
    pub poller: Arc<ExtractionPoller>,
    pub document: Arc<dyn DocumentSource>,
    pub submitter: Arc<dyn Submitter>,
    pub clock: Arc<dyn Clock>,
}

/// Turns timer, extraction and submission effects into tokio tasks that
/// report back on the coordinator's channel.
pub struct EffectRunner {
    tx: UnboundedSender<Input>,
    engine: Collaborators,
    pending: Vec<AbortHandle>,
    reveal: Option<AbortHandle>,
}

impl EffectRunner {
    pub fn new(tx: UnboundedSender<Input>, engine: Collaborators) -> Self {
        Self {
            tx,
            engine,
            pending: Vec::new(),
            reveal: None,
        }
    }

    pub fn clock(&self) -> &dyn Clock {
        self.engine.clock.as_ref()
    }

    /// Number of detection timers and extraction polls still running.
    pub fn pending_count(&self) -> usize {
        self.pending.iter().filter(|task| !task.is_finished()).count()
    }

    pub fn run(&mut self, effect: Effect) {
        match effect {
            Effect::ScheduleDetection {
                generation,
                delay_ms,
            } => self.schedule_detection(generation, delay_ms),
            Effect::CancelPending => self.cancel_pending(),
            Effect::StartExtraction { generation } => self.start_extraction(generation),
            Effect::StartReveal {
                generation,
                tick_ms,
            } => self.start_reveal(generation, tick_ms),
            Effect::StopReveal => {
                if let Some(task) = self.reveal.take() {
                    task.abort();
                }
            }
            Effect::Submit {
                mount,
                job_description,
                job_url,
            } => self.submit(
                mount,
                JobSubmission {
                    job_description,
                    job_url,
                },
            ),
            Effect::MountPanel { .. }
            | Effect::UnmountPanel
            | Effect::RevealCompleted { .. }
            | Effect::OpenTab { .. } => {
                detector_warn!("surface effect reached the runner: {effect:?}");
            }
        }
    }

    fn track(&mut self, task: AbortHandle) {
        self.pending.retain(|task| !task.is_finished());
        self.pending.push(task);
    }

    fn cancel_pending(&mut self) {
        let count = self.pending.len() + usize::from(self.reveal.is_some());
        for task in self.pending.drain(..) {
            task.abort();
        }
        if let Some(task) = self.reveal.take() {
            task.abort();
        }
        detector_debug!("cancelled {count} pending tasks");
    }

    fn schedule_detection(&mut self, generation: Generation, delay_ms: u64) {
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            sleep(Duration::from_millis(delay_ms)).await;
            let _ = tx.send(Input::Msg(Msg::DetectionDue { generation }));
        });
        self.track(task.abort_handle());
    }

    fn start_extraction(&mut self, generation: Generation) {
        let tx = self.tx.clone();
        let engine = self.engine.clone();
        let task = tokio::spawn(async move {
            let text = engine
                .poller
                .wait_for_content(engine.document.as_ref())
                .await;
            let _ = tx.send(Input::Msg(Msg::ExtractionResolved {
                generation,
                text,
                at_ms: engine.clock.now_ms(),
            }));
        });
        self.track(task.abort_handle());
    }

    fn start_reveal(&mut self, generation: Generation, tick_ms: u64) {
        if let Some(previous) = self.reveal.take() {
            previous.abort();
        }
        let tx = self.tx.clone();
        let clock = self.engine.clock.clone();
        let task = tokio::spawn(async move {
            let mut ticker = interval(Duration::from_millis(tick_ms.max(1)));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let msg = Msg::RevealTick {
                    generation,
                    at_ms: clock.now_ms(),
                };
                if tx.send(Input::Msg(msg)).is_err() {
                    break;
                }
            }
        });
        self.reveal = Some(task.abort_handle());
    }

    /// Submissions are not cancelled with the panel; a late result still
    /// reaches the reducer, which decides what it may touch.
    fn submit(&mut self, mount: MountId, submission: JobSubmission) {
        let tx = self.tx.clone();
        let submitter = self.engine.submitter.clone();
        tokio::spawn(async move {
            let msg = match submitter.submit(&submission).await {
                Ok(receipt) => Msg::SubmissionSucceeded {
                    mount,
                    submission_id: receipt.job_id,
                },
                Err(err) => Msg::SubmissionFailed {
                    mount,
                    reason: err.to_string(),
                },
            };
            let _ = tx.send(Input::Msg(msg));
        });
    }
}
