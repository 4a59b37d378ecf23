use crate::Msg;

/// Raw page signals that may indicate a same-document navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSignal {
    /// Something in the document subtree changed; `url` is the location at that moment.
    DomMutated { url: String },
    /// The browser fired a history pop.
    HistoryPopped { url: String },
}

impl PageSignal {
    pub fn url(&self) -> &str {
        match self {
            PageSignal::DomMutated { url } | PageSignal::HistoryPopped { url } => url,
        }
    }
}

/// Turns page signals into navigation messages when the location changes.
///
/// Single-page job boards swap the URL and content without reloading, so
/// every mutation or history pop is checked against the last seen URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationWatcher {
    last_url: String,
}

impl NavigationWatcher {
    pub fn new(initial_url: impl Into<String>) -> Self {
        Self {
            last_url: initial_url.into(),
        }
    }

    pub fn last_url(&self) -> &str {
        &self.last_url
    }

    pub fn observe(&mut self, signal: &PageSignal) -> Option<Msg> {
        let url = signal.url();
        if url == self.last_url {
            return None;
        }
        detector_logging::detector_debug!(
            "navigation detected via {:?}: {} -> {}",
            signal,
            self.last_url,
            url
        );
        self.last_url = url.to_string();
        Some(Msg::NavigationDetected {
            url: url.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{NavigationWatcher, PageSignal};
    use crate::Msg;

    #[test]
    fn same_url_mutations_are_ignored() {
        let mut watcher = NavigationWatcher::new("https://x.com/jobs/1/a");
        let signal = PageSignal::DomMutated {
            url: "https://x.com/jobs/1/a".into(),
        };
        assert_eq!(watcher.observe(&signal), None);
        assert_eq!(watcher.observe(&signal), None);
    }

    #[test]
    fn url_change_from_either_signal_is_reported_once() {
        let mut watcher = NavigationWatcher::new("https://x.com/jobs/1/a");

        let pushed = PageSignal::DomMutated {
            url: "https://x.com/jobs/2/b".into(),
        };
        assert_eq!(
            watcher.observe(&pushed),
            Some(Msg::NavigationDetected {
                url: "https://x.com/jobs/2/b".into()
            })
        );
        assert_eq!(watcher.observe(&pushed), None);

        let popped = PageSignal::HistoryPopped {
            url: "https://x.com/jobs/1/a".into(),
        };
        assert_eq!(
            watcher.observe(&popped),
            Some(Msg::NavigationDetected {
                url: "https://x.com/jobs/1/a".into()
            })
        );
        assert_eq!(watcher.last_url(), "https://x.com/jobs/1/a");
    }
}
