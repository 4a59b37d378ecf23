use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// Stable per-job key: `<hostname>-<id fragment>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(String);

impl JobId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Completion, confirmation, application and listing pages. Checked first.
static EXCLUDE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)/browse[/?]",
        r"(?i)/search[/?]",
        r"(?i)thank[\s-]?you",
        r"(?i)success",
        r"(?i)confirmation",
        r"(?i)submitted",
        r"(?i)completed",
        r"(?i)/jobTasks/",
        r"(?i)/application$",
        r"(?i)applythankyou",
        r"(?i)/questions[/?]",
        r"(?i)/apply[/?]",
        r"(?i)/submit[/?]",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("exclusion pattern"))
    .collect()
});

struct InclusionRule {
    pattern: Regex,
    /// Rejects a match when the rest of the URL after it mentions any of these.
    not_followed_by: &'static [&'static str],
}

static INCLUDE: LazyLock<Vec<InclusionRule>> = LazyLock::new(|| {
    [
        (r"(?i)/jobs?/", &["thank", "complete"][..]),
        (r"(?i)/careers?/", &["task", "complete"][..]),
        (r"(?i)/positions?/", &["thank", "complete"][..]),
        (r"(?i)/vacancy", &["complete"][..]),
        (r"(?i)/vacancies/", &["complete"][..]),
        (r"(?i)/openings?/", &["complete"][..]),
        (r"(?i)/job-description", &[][..]),
        (r"(?i)/job-details", &[][..]),
        (r"(?i)/job-posting", &[][..]),
    ]
    .into_iter()
    .map(|(pattern, not_followed_by)| InclusionRule {
        pattern: Regex::new(pattern).expect("inclusion pattern"),
        not_followed_by,
    })
    .collect()
});

/// Site-specific id patterns first, generic numeric fallback last.
static JOB_ID_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)[?&]currentJobId=(\d+)",
        r"(?i)/jobs/view/(\d+)",
        r"(?i)/job/[^?#]*?/([^/?#]+)",
        r"(?i)/jobs/(\d+)",
        r"(?i)/position/(\d+)",
        r"(?i)jobId=([^&#]+)",
        r"(?i)[?&]gh_jid=(\d+)",
        r"/(\d{5,})(?:[/?#]|$)",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("job id pattern"))
    .collect()
});

impl InclusionRule {
    fn matches(&self, url: &str) -> bool {
        self.pattern.find_iter(url).any(|found| {
            let rest = url[found.end()..].to_ascii_lowercase();
            !self.not_followed_by.iter().any(|word| rest.contains(word))
        })
    }
}

/// Decides from the URL alone whether the page plausibly shows a job posting.
///
/// Exclusion always wins: a URL that looks like an application or
/// confirmation step is rejected even when it also contains `/jobs/`.
pub fn is_job_page(url: &str) -> bool {
    if EXCLUDE.iter().any(|pattern| pattern.is_match(url)) {
        return false;
    }
    INCLUDE.iter().any(|rule| rule.matches(url))
}

/// Derives the job key for `url`, or `None` when no id pattern matches.
pub fn job_id(url: &str) -> Option<JobId> {
    let host = hostname(url)?;
    JOB_ID_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|fragment| fragment.as_str())
            .filter(|fragment| !fragment.is_empty())
            .map(|fragment| JobId::new(format!("{host}-{fragment}")))
    })
}

/// Like [`job_id`], but falls back to `<hostname>-manual` for user-initiated panels.
pub fn job_id_or_manual(url: &str) -> JobId {
    job_id(url).unwrap_or_else(|| {
        let host = hostname(url).unwrap_or_default();
        JobId::new(format!("{host}-manual"))
    })
}

fn hostname(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_owned))
}
