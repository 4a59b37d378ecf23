//! Detector core: URL classification, text gates and the pure panel state machine.
mod classify;
mod effect;
mod msg;
mod navigation;
mod session;
mod settings;
mod state;
mod text;
mod update;
mod view_model;

pub use classify::{is_job_page, job_id, job_id_or_manual, JobId};
pub use effect::Effect;
pub use msg::Msg;
pub use navigation::{NavigationWatcher, PageSignal};
pub use session::{DetectionSession, Generation};
pub use settings::{
    Gates, Settings, Timings, DEFAULT_FALLBACK_TEXT, MIN_SUBMIT_WORDS,
    REAL_CONTENT_CHARS,
};
pub use state::{AppState, MountId, PanelPhase};
pub use text::{char_len, has_real_content, normalize_whitespace, reveal_len, word_count};
pub use update::update;
pub use view_model::PanelView;
