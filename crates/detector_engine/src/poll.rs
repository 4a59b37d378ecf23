use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, Instant};

use detector_logging::{detector_debug, detector_info, detector_warn};

use crate::{DocumentSource, Extractor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(250),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Re-runs the extractor until it finds content or the deadline passes.
///
/// Job boards often render the description after load, so one probe is not
/// enough; the poll is bounded so a page without a posting costs at most
/// `timeout`.
pub struct ExtractionPoller {
    extractor: Arc<dyn Extractor>,
    settings: PollSettings,
}

impl ExtractionPoller {
    pub fn new(extractor: Arc<dyn Extractor>, settings: PollSettings) -> Self {
        Self {
            extractor,
            settings,
        }
    }

    /// Resolves with the extracted text, or with an empty string on timeout.
    /// Callers treat the empty string as "use the fallback", not as an error.
    pub async fn wait_for_content(&self, source: &dyn DocumentSource) -> String {
        let started = Instant::now();
        let deadline = started + self.settings.timeout;
        let mut probes = 0u32;

        loop {
            probes += 1;
            if let Some(text) = self.probe(source) {
                detector_info!(
                    "content found after {}ms ({probes} probes)",
                    started.elapsed().as_millis()
                );
                return text;
            }

            let now = Instant::now();
            if now >= deadline {
                detector_warn!(
                    "no content after {}ms ({probes} probes); falling back",
                    started.elapsed().as_millis()
                );
                return String::new();
            }
            sleep(self.settings.interval.min(deadline - now)).await;
        }
    }

    fn probe(&self, source: &dyn DocumentSource) -> Option<String> {
        let Some(page) = source.snapshot() else {
            detector_debug!("no document available yet");
            return None;
        };
        self.extractor.extract(&page)
    }
}
