/// Text longer than this is "real content" and gets the streaming reveal.
pub const REAL_CONTENT_CHARS: usize = 50;
/// Minimum word count before the continue action is enabled.
pub const MIN_SUBMIT_WORDS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Delay between page load and the first detection pass.
    pub initial_delay_ms: u64,
    /// Delay between a detected navigation and the next detection pass.
    pub settle_delay_ms: u64,
    pub reveal_duration_ms: u64,
    pub reveal_tick_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            initial_delay_ms: 1_500,
            settle_delay_ms: 500,
            reveal_duration_ms: 2_500,
            reveal_tick_ms: 50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gates {
    pub real_content_chars: usize,
    pub min_submit_words: usize,
}

impl Default for Gates {
    fn default() -> Self {
        Self {
            real_content_chars: REAL_CONTENT_CHARS,
            min_submit_words: MIN_SUBMIT_WORDS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub timings: Timings,
    pub gates: Gates,
    /// Shown instead of the posting when extraction finds nothing in time.
    pub fallback_text: String,
    /// Result page opened after a successful submission; `{job_id}` is replaced.
    pub open_url_template: String,
}

pub const DEFAULT_FALLBACK_TEXT: &str = "No job description could be found on this page. \
Paste or type the job description here before continuing.";

impl Default for Settings {
    fn default() -> Self {
        Self {
            timings: Timings::default(),
            gates: Gates::default(),
            fallback_text: DEFAULT_FALLBACK_TEXT.to_string(),
            open_url_template: "http://localhost:3000/jobs/{job_id}".to_string(),
        }
    }
}

impl Settings {
    pub fn result_url(&self, submission_id: &str) -> String {
        self.open_url_template.replace("{job_id}", submission_id)
    }
}
