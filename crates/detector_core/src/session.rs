use crate::JobId;

/// Monotonic counter identifying one detection session. Timer and
/// extraction results carry the generation they were started for, and the
/// reducer drops anything that does not match the live session.
pub type Generation = u64;

/// Ephemeral state for one page view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionSession {
    generation: Generation,
    url: String,
    tracked_job: Option<JobId>,
    detection_pending: bool,
    mounting: bool,
}

impl DetectionSession {
    pub(crate) fn new(generation: Generation, url: String) -> Self {
        Self {
            generation,
            url,
            tracked_job: None,
            detection_pending: true,
            mounting: false,
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Job the mounted panel belongs to, if any.
    pub fn tracked_job(&self) -> Option<&JobId> {
        self.tracked_job.as_ref()
    }

    /// A detection timer has been scheduled and has not fired yet.
    pub fn detection_pending(&self) -> bool {
        self.detection_pending
    }

    /// A panel was mounted and is still waiting for its extraction result.
    pub fn mounting(&self) -> bool {
        self.mounting
    }

    pub(crate) fn is_current(&self, generation: Generation) -> bool {
        self.generation == generation
    }

    pub(crate) fn detection_fired(&mut self) {
        self.detection_pending = false;
    }

    pub(crate) fn track(&mut self, job: JobId) {
        self.tracked_job = Some(job);
        self.mounting = true;
    }

    pub(crate) fn extraction_settled(&mut self) {
        self.mounting = false;
    }

    pub(crate) fn untrack(&mut self) {
        self.tracked_job = None;
        self.mounting = false;
    }
}
