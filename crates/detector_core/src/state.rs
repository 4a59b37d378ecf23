use crate::view_model::PanelView;
use crate::{char_len, word_count, DetectionSession, Generation, JobId, Settings};

/// Counts panel mounts; a submission result only closes the panel it came from.
pub type MountId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelPhase {
    #[default]
    Unmounted,
    /// Panel visible, spinner, no text yet.
    Scanning,
    /// Text is being revealed; read-only.
    Streaming,
    /// Full text shown and editable.
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) enum Panel {
    #[default]
    Unmounted,
    Scanning,
    Streaming {
        full_text: String,
        total_chars: usize,
        started_at_ms: u64,
        visible_chars: usize,
    },
    Ready {
        text: String,
    },
}

impl Panel {
    pub(crate) fn phase(&self) -> PanelPhase {
        match self {
            Panel::Unmounted => PanelPhase::Unmounted,
            Panel::Scanning => PanelPhase::Scanning,
            Panel::Streaming { .. } => PanelPhase::Streaming,
            Panel::Ready { .. } => PanelPhase::Ready,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    settings: Settings,
    session: Option<DetectionSession>,
    last_generation: Generation,
    pub(crate) panel: Panel,
    pub(crate) last_mount: MountId,
    pub(crate) pending_submission: Option<MountId>,
    pub(crate) external_loading: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn session(&self) -> Option<&DetectionSession> {
        self.session.as_ref()
    }

    /// Generation of the live session, or 0 before the first page load.
    pub fn generation(&self) -> Generation {
        self.session.as_ref().map_or(0, DetectionSession::generation)
    }

    pub fn phase(&self) -> PanelPhase {
        self.panel.phase()
    }

    pub fn tracked_job(&self) -> Option<&JobId> {
        self.session.as_ref().and_then(DetectionSession::tracked_job)
    }

    pub fn is_mounted(&self) -> bool {
        self.panel != Panel::Unmounted
    }

    /// Returns the dirty flag and clears it.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn view(&self) -> PanelView {
        let phase = self.panel.phase();
        let (visible_text, reveal_percent) = match &self.panel {
            Panel::Unmounted | Panel::Scanning => (String::new(), None),
            Panel::Streaming {
                full_text,
                total_chars,
                visible_chars,
                ..
            } => {
                let visible: String = full_text.chars().take(*visible_chars).collect();
                let percent = if *total_chars == 0 {
                    100
                } else {
                    (*visible_chars * 100 / *total_chars) as u8
                };
                (visible, Some(percent))
            }
            Panel::Ready { text } => (text.clone(), None),
        };
        let words = word_count(&visible_text);
        let ready = phase == PanelPhase::Ready;
        PanelView {
            phase,
            job_id: self.tracked_job().cloned(),
            visible_chars: char_len(&visible_text),
            visible_text,
            reveal_percent,
            editable: ready,
            word_count: words,
            continue_enabled: ready
                && self.pending_submission.is_none()
                && words >= self.settings.gates.min_submit_words,
            submitting: self.pending_submission.is_some(),
            show_spinner: phase == PanelPhase::Scanning || self.external_loading,
            dirty: self.dirty,
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn session_mut(&mut self) -> Option<&mut DetectionSession> {
        self.session.as_mut()
    }

    pub(crate) fn is_current(&self, generation: Generation) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.is_current(generation))
    }

    /// Replaces the live session with a fresh one for `url`.
    pub(crate) fn begin_session(&mut self, url: String) -> Generation {
        self.last_generation += 1;
        self.session = Some(DetectionSession::new(self.last_generation, url));
        self.last_generation
    }

    pub(crate) fn end_session(&mut self) {
        self.session = None;
    }
}
