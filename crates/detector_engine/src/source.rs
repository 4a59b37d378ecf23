use std::sync::RwLock;

/// The document as it looked at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnapshot {
    pub url: String,
    pub html: String,
}

impl PageSnapshot {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }
}

/// Read-only view of the host document. Implementations must never mutate it.
pub trait DocumentSource: Send + Sync {
    fn snapshot(&self) -> Option<PageSnapshot>;
}

impl DocumentSource for PageSnapshot {
    fn snapshot(&self) -> Option<PageSnapshot> {
        Some(self.clone())
    }
}

/// Document that changes over time, as the host page renders or navigates.
#[derive(Debug, Default)]
pub struct LiveDocument {
    current: RwLock<Option<PageSnapshot>>,
}

impl LiveDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&self, snapshot: PageSnapshot) {
        if let Ok(mut guard) = self.current.write() {
            *guard = Some(snapshot);
        }
    }
}

impl DocumentSource for LiveDocument {
    fn snapshot(&self) -> Option<PageSnapshot> {
        self.current.read().ok().and_then(|guard| guard.clone())
    }
}
