use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use detector_logging::{detector_debug, detector_warn};

use crate::PageSnapshot;

/// Default minimum trimmed length for a match to count as the posting body.
pub const DEFAULT_MIN_CHARS: usize = 100;

pub trait Extractor: Send + Sync {
    /// Returns the job description text, or `None` when nothing qualifies yet.
    fn extract(&self, page: &PageSnapshot) -> Option<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostMatch {
    Any,
    /// Host name contains this fragment, e.g. `myworkdayjobs.com`.
    Contains(String),
}

impl HostMatch {
    fn matches(&self, host: &str) -> bool {
        match self {
            HostMatch::Any => true,
            HostMatch::Contains(fragment) => host.contains(fragment.as_str()),
        }
    }
}

/// One extraction strategy: where it applies and which selectors to probe, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteRule {
    pub name: String,
    pub host: HostMatch,
    /// When non-empty, the URL must also contain one of these.
    pub path_hints: Vec<String>,
    pub selectors: Vec<String>,
}

impl SiteRule {
    pub fn new(name: &str, host: HostMatch, selectors: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            host,
            path_hints: Vec::new(),
            selectors: selectors.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_path_hints(mut self, hints: &[&str]) -> Self {
        self.path_hints = hints.iter().map(|s| s.to_string()).collect();
        self
    }

    fn applies_to(&self, host: &str, url: &str) -> bool {
        self.host.matches(host)
            && (self.path_hints.is_empty()
                || self.path_hints.iter().any(|hint| url.contains(hint.as_str())))
    }
}

/// Known job boards first, generic probes last.
pub fn builtin_rules() -> Vec<SiteRule> {
    vec![
        SiteRule::new(
            "workday",
            HostMatch::Contains("myworkdayjobs.com".into()),
            &[
                r#"[data-automation-id="jobPostingDescription"]"#,
                ".jobPostingDescription",
                r#"[role="main"] .wd-text"#,
            ],
        ),
        SiteRule::new(
            "greenhouse",
            HostMatch::Contains("greenhouse.io".into()),
            &[".job__description.body", "#content .job__description"],
        ),
        SiteRule::new(
            "linkedin",
            HostMatch::Contains("linkedin.com".into()),
            &[
                ".job-view-layout .description__text",
                ".jobs-description__content",
            ],
        )
        .with_path_hints(&["/jobs/view/", "/details/"]),
        SiteRule::new(
            "generic",
            HostMatch::Any,
            &[
                ".job-description",
                ".description",
                r#"[class*="description"]"#,
                ".job-details",
                ".job-content",
            ],
        ),
    ]
}

struct CompiledRule {
    rule: SiteRule,
    selectors: Vec<(String, Selector)>,
}

/// Ordered list of site rules consulted against a parsed document.
pub struct ExtractorRegistry {
    rules: Vec<CompiledRule>,
    min_chars: usize,
}

impl ExtractorRegistry {
    /// Compiles `rules` in order. Selectors that fail to parse are dropped
    /// from their rule; the rest of the rule still applies.
    pub fn new(rules: Vec<SiteRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| {
                let selectors = rule
                    .selectors
                    .iter()
                    .filter_map(|source| match Selector::parse(source) {
                        Ok(selector) => Some((source.clone(), selector)),
                        Err(err) => {
                            detector_warn!("rule {}: bad selector {source:?}: {err}", rule.name);
                            None
                        }
                    })
                    .collect();
                CompiledRule { rule, selectors }
            })
            .collect();
        Self {
            rules,
            min_chars: DEFAULT_MIN_CHARS,
        }
    }

    pub fn builtin() -> Self {
        Self::new(builtin_rules())
    }

    pub fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars;
        self
    }

    /// Names of the rules that would be tried for `url`, in priority order.
    pub fn rules_for(&self, url: &str) -> Vec<&str> {
        let host = host_of(url);
        self.rules
            .iter()
            .filter(|compiled| compiled.rule.applies_to(&host, url))
            .map(|compiled| compiled.rule.name.as_str())
            .collect()
    }
}

impl Extractor for ExtractorRegistry {
    fn extract(&self, page: &PageSnapshot) -> Option<String> {
        let host = host_of(&page.url);
        let doc = Html::parse_document(&page.html);

        for compiled in self
            .rules
            .iter()
            .filter(|compiled| compiled.rule.applies_to(&host, &page.url))
        {
            for (source, selector) in &compiled.selectors {
                let found = doc
                    .select(selector)
                    .map(visible_text)
                    .find(|text| text.chars().count() > self.min_chars);
                if let Some(text) = found {
                    detector_debug!(
                        "rule {} matched {source:?} ({} chars)",
                        compiled.rule.name,
                        text.chars().count()
                    );
                    return Some(text);
                }
            }
        }
        None
    }
}

fn host_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_ascii_lowercase))
        .unwrap_or_default()
}

/// Text content of `element` without scripts or styles, whitespace-normalized.
fn visible_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    collect_text(*element, &mut raw);
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_text(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(text),
        Node::Element(element) => {
            let tag = element.name();
            if matches!(tag, "script" | "style" | "noscript" | "template") {
                return;
            }
            let block = is_block(tag);
            if block {
                out.push(' ');
            }
            for child in node.children() {
                collect_text(child, out);
            }
            if block {
                out.push(' ');
            }
        }
        _ => {
            for child in node.children() {
                collect_text(child, out);
            }
        }
    }
}

fn is_block(tag: &str) -> bool {
    matches!(
        tag,
        "p" | "div"
            | "br"
            | "li"
            | "ul"
            | "ol"
            | "section"
            | "article"
            | "header"
            | "footer"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "tr"
            | "td"
            | "th"
            | "table"
            | "blockquote"
    )
}
