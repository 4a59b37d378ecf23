use crate::{Generation, MountId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Initial document load; starts the first detection session.
    PageLoaded { url: String },
    /// The watcher saw the location change without a reload.
    NavigationDetected { url: String },
    /// The document is going away.
    PageUnloaded,
    /// The detection delay for `generation` elapsed.
    DetectionDue { generation: Generation },
    /// The extraction poller settled; an empty `text` means it timed out.
    ExtractionResolved {
        generation: Generation,
        text: String,
        at_ms: u64,
    },
    /// Periodic tick while the reveal runs.
    RevealTick { generation: Generation, at_ms: u64 },
    /// User edited the job description text area.
    TextEdited(String),
    /// User clicked Continue.
    ContinueClicked,
    /// User clicked the close button, or the extension asked to close the panel.
    CloseClicked,
    /// Submission collaborator returned a server-assigned id.
    SubmissionSucceeded {
        mount: MountId,
        submission_id: String,
    },
    /// Submission collaborator failed; the panel stays open.
    SubmissionFailed {
        mount: MountId,
        reason: String,
    },
    /// Extension asked to show a panel with the given description.
    InjectPanel { text: String, at_ms: u64 },
    /// Extension asked to scan the current page regardless of its URL.
    ManualActivation,
    /// Extension toggled its loading indicator.
    SetLoading(bool),
}
