//! Detector engine: DOM extraction, polling, page fetching and submission.
mod clock;
mod decode;
mod extract;
mod fetch;
mod messaging;
mod poll;
mod source;
mod submit;

pub use clock::{Clock, TokioClock};
pub use decode::{decode_html, DecodeError, DecodedHtml};
pub use extract::{
    builtin_rules, Extractor, ExtractorRegistry, HostMatch, SiteRule, DEFAULT_MIN_CHARS,
};
pub use fetch::{FetchError, FetchSettings, FetchedPage, PageFetcher, ReqwestPageFetcher};
pub use messaging::{decode_command, Ack, CommandError, PanelCommand, MISSING_DESCRIPTION};
pub use poll::{ExtractionPoller, PollSettings};
pub use source::{DocumentSource, LiveDocument, PageSnapshot};
pub use submit::{
    JobSubmission, ReqwestSubmitter, SubmissionReceipt, SubmitError, SubmitSettings, Submitter,
};
