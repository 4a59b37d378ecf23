use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use detector_core::{Gates, Settings, Timings, DEFAULT_FALLBACK_TEXT};
use detector_engine::{
    builtin_rules, HostMatch, PollSettings, SiteRule, SubmitSettings, DEFAULT_MIN_CHARS,
};
use detector_logging::detector_info;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingsConfig {
    pub initial_delay_ms: u64,
    pub settle_delay_ms: u64,
    pub poll_interval_ms: u64,
    pub poll_timeout_ms: u64,
    pub reveal_duration_ms: u64,
    pub reveal_tick_ms: u64,
}

impl Default for TimingsConfig {
    fn default() -> Self {
        let timings = Timings::default();
        let poll = PollSettings::default();
        Self {
            initial_delay_ms: timings.initial_delay_ms,
            settle_delay_ms: timings.settle_delay_ms,
            poll_interval_ms: poll.interval.as_millis() as u64,
            poll_timeout_ms: poll.timeout.as_millis() as u64,
            reveal_duration_ms: timings.reveal_duration_ms,
            reveal_tick_ms: timings.reveal_tick_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatesConfig {
    pub min_extracted_chars: usize,
    pub real_content_chars: usize,
    pub min_submit_words: usize,
}

impl Default for GatesConfig {
    fn default() -> Self {
        let gates = Gates::default();
        Self {
            min_extracted_chars: DEFAULT_MIN_CHARS,
            real_content_chars: gates.real_content_chars,
            min_submit_words: gates.min_submit_words,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionConfig {
    pub endpoint: String,
    pub open_url_template: String,
    pub request_timeout_ms: u64,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            endpoint: SubmitSettings::default().endpoint,
            open_url_template: Settings::default().open_url_template,
            request_timeout_ms: 15_000,
        }
    }
}

/// Extra extraction rule, tried before the built-in ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub name: String,
    /// Host fragment; `None` applies everywhere.
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub path_hints: Vec<String>,
    pub selectors: Vec<String>,
}

impl SiteConfig {
    fn to_rule(&self) -> SiteRule {
        let host = match &self.host {
            Some(fragment) => HostMatch::Contains(fragment.to_ascii_lowercase()),
            None => HostMatch::Any,
        };
        SiteRule {
            name: self.name.clone(),
            host,
            path_hints: self.path_hints.clone(),
            selectors: self.selectors.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub timings: TimingsConfig,
    pub gates: GatesConfig,
    pub submission: SubmissionConfig,
    pub fallback_text: String,
    pub extra_sites: Vec<SiteConfig>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            timings: TimingsConfig::default(),
            gates: GatesConfig::default(),
            submission: SubmissionConfig::default(),
            fallback_text: DEFAULT_FALLBACK_TEXT.to_string(),
            extra_sites: Vec::new(),
        }
    }
}

impl DetectorConfig {
    /// Reads `path` when given; defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        detector_info!("loaded config from {:?}", path);
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }

    pub fn core_settings(&self) -> Settings {
        let t = &self.timings;
        Settings {
            timings: Timings {
                initial_delay_ms: t.initial_delay_ms,
                settle_delay_ms: t.settle_delay_ms,
                reveal_duration_ms: t.reveal_duration_ms,
                reveal_tick_ms: t.reveal_tick_ms,
            },
            gates: Gates {
                real_content_chars: self.gates.real_content_chars,
                min_submit_words: self.gates.min_submit_words,
            },
            fallback_text: self.fallback_text.clone(),
            open_url_template: self.submission.open_url_template.clone(),
        }
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            interval: Duration::from_millis(self.timings.poll_interval_ms),
            timeout: Duration::from_millis(self.timings.poll_timeout_ms),
        }
    }

    pub fn submit_settings(&self) -> SubmitSettings {
        SubmitSettings {
            endpoint: self.submission.endpoint.clone(),
            request_timeout: Duration::from_millis(self.submission.request_timeout_ms),
            ..SubmitSettings::default()
        }
    }

    /// Configured sites first, then the built-in rules.
    pub fn site_rules(&self) -> Vec<SiteRule> {
        self.extra_sites
            .iter()
            .map(SiteConfig::to_rule)
            .chain(builtin_rules())
            .collect()
    }
}
