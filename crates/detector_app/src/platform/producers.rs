//! Input producers: the navigation script and the stdin command reader.
use std::collections::HashSet;
use std::time::Duration;

use detector_core::{Msg, PageSignal};
use detector_engine::{decode_command, LiveDocument, PageFetcher, PageSnapshot};
use detector_logging::{detector_info, detector_warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::sleep;

use super::app::Input;

/// URLs visited in order, the way a single-page job board moves between postings.
pub struct NavigationScript {
    pub urls: Vec<String>,
    /// Markup for the first URL, used instead of fetching it.
    pub first_html: Option<String>,
    pub dwell: Duration,
}

impl NavigationScript {
    /// Loads each page into `document` and reports it: the first as a page
    /// load, later ones as in-page navigations. Revisits surface as history pops.
    pub async fn play(
        self,
        fetcher: &dyn PageFetcher,
        document: &LiveDocument,
        tx: UnboundedSender<Input>,
    ) {
        let mut visited = HashSet::new();
        let mut first_html = self.first_html;

        for (index, url) in self.urls.into_iter().enumerate() {
            let snapshot = match first_html.take().filter(|_| index == 0) {
                Some(html) => PageSnapshot::new(url.clone(), html),
                None => match fetcher.load_snapshot(&url).await {
                    Ok(snapshot) => snapshot,
                    Err(err) => {
                        detector_warn!("could not load {url}: {err}");
                        PageSnapshot::new(url.clone(), String::new())
                    }
                },
            };
            document.replace(snapshot);

            let input = if index == 0 {
                Input::Msg(Msg::PageLoaded { url: url.clone() })
            } else if visited.contains(&url) {
                Input::Signal(PageSignal::HistoryPopped { url: url.clone() })
            } else {
                Input::Signal(PageSignal::DomMutated { url: url.clone() })
            };
            detector_info!("visiting {url}");
            visited.insert(url);
            if tx.send(input).is_err() {
                return;
            }
            sleep(self.dwell).await;
        }
        let _ = tx.send(Input::ProducerDone);
    }
}

/// Forwards one decoded command per non-blank line until end of input.
pub async fn read_commands<R>(reader: R, tx: UnboundedSender<Input>)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => continue,
            Ok(Some(line)) => {
                if tx.send(Input::Command(decode_command(&line))).is_err() {
                    return;
                }
            }
            Ok(None) => break,
            Err(err) => {
                detector_warn!("stopped reading commands: {err}");
                break;
            }
        }
    }
    let _ = tx.send(Input::ProducerDone);
}
