use crate::{JobId, PanelPhase};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PanelView {
    pub phase: PanelPhase,
    pub job_id: Option<JobId>,
    /// Text currently in the text area; a prefix of the posting while streaming.
    pub visible_text: String,
    pub visible_chars: usize,
    /// Reveal progress, only while streaming.
    pub reveal_percent: Option<u8>,
    pub editable: bool,
    pub word_count: usize,
    pub continue_enabled: bool,
    pub submitting: bool,
    pub show_spinner: bool,
    pub dirty: bool,
}
