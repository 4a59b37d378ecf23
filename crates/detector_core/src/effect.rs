use crate::{Generation, JobId, MountId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fire `Msg::DetectionDue` after `delay_ms`.
    ScheduleDetection { generation: Generation, delay_ms: u64 },
    /// Abort every pending detection timer, extraction poll and reveal ticker.
    CancelPending,
    MountPanel { job_id: JobId },
    UnmountPanel,
    /// Run the extraction poller and report back with `Msg::ExtractionResolved`.
    StartExtraction { generation: Generation },
    /// Send `Msg::RevealTick` every `tick_ms` until stopped.
    StartReveal { generation: Generation, tick_ms: u64 },
    StopReveal,
    /// The reveal reached full length. Emitted once per reveal.
    RevealCompleted { job_id: JobId },
    /// Post the text; the outcome comes back tagged with `mount`.
    Submit {
        mount: MountId,
        job_description: String,
        job_url: String,
    },
    /// Open a new top-level browsing context.
    OpenTab { url: String },
}
