use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use detector_core::{update, AppState, Effect, Msg, NavigationWatcher, PageSignal};
use detector_engine::{
    Ack, CommandError, ExtractionPoller, ExtractorRegistry, FetchSettings, LiveDocument,
    PanelCommand, ReqwestPageFetcher, ReqwestSubmitter, TokioClock,
};
use detector_logging::{detector_debug, detector_info, detector_warn, set_session_generation};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

use super::cli::Cli;
use super::config::DetectorConfig;
use super::effects::{Collaborators, EffectRunner};
use super::logging;
use super::producers::{read_commands, NavigationScript};
use super::surface::{PanelSurface, TerminalSurface};

/// Everything that can wake the coordinator.
#[derive(Debug)]
pub enum Input {
    Msg(Msg),
    /// Raw page signal for the navigation watcher.
    Signal(PageSignal),
    Command(Result<PanelCommand, CommandError>),
    /// A producer has nothing more to send.
    ProducerDone,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    logging::initialize(cli.log, cli.verbose);

    let config = DetectorConfig::load(cli.config.as_deref())?;
    let first_html = cli
        .html
        .as_deref()
        .map(|path| {
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
        })
        .transpose()?;

    let registry = ExtractorRegistry::new(config.site_rules())
        .with_min_chars(config.gates.min_extracted_chars);
    let submitter = ReqwestSubmitter::new(&config.submit_settings())
        .context("building submission client")?;
    detector_info!("submissions go to {}", submitter.endpoint());
    let document = Arc::new(LiveDocument::new());
    let clock = Arc::new(TokioClock::new());

    let (tx, rx) = unbounded_channel();
    let runner = EffectRunner::new(
        tx.clone(),
        Collaborators {
            poller: Arc::new(ExtractionPoller::new(
                Arc::new(registry),
                config.poll_settings(),
            )),
            document: document.clone(),
            submitter: Arc::new(submitter),
            clock,
        },
    );

    let mut producers = 1;
    let script = NavigationScript {
        urls: cli.urls,
        first_html,
        dwell: Duration::from_millis(cli.dwell_ms),
    };
    let fetcher =
        ReqwestPageFetcher::new(FetchSettings::default()).context("building page fetcher")?;
    {
        let tx = tx.clone();
        tokio::spawn(async move {
            script.play(&fetcher, &document, tx).await;
        });
    }
    if cli.commands {
        producers += 1;
        let tx = tx.clone();
        tokio::spawn(async move {
            read_commands(tokio::io::BufReader::new(tokio::io::stdin()), tx).await;
        });
    }
    drop(tx);

    let mut coordinator = Coordinator::new(
        AppState::with_settings(config.core_settings()),
        runner,
        TerminalSurface::new(std::io::stdout()),
        cli.submit,
    );
    coordinator.run(rx, producers).await;
    detector_info!("detector finished");
    Ok(())
}

/// Owns the state and feeds every input through the reducer.
pub struct Coordinator<S: PanelSurface> {
    state: AppState,
    watcher: Option<NavigationWatcher>,
    runner: EffectRunner,
    surface: S,
    auto_submit: bool,
}

impl<S: PanelSurface> Coordinator<S> {
    pub fn new(state: AppState, runner: EffectRunner, surface: S, auto_submit: bool) -> Self {
        Self {
            state,
            watcher: None,
            runner,
            surface,
            auto_submit,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[cfg(test)]
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Runs until every producer is done and no submission is in flight,
    /// then unloads the page.
    pub async fn run(&mut self, mut rx: UnboundedReceiver<Input>, producers: usize) {
        let mut remaining = producers;
        while remaining > 0 || self.state().view().submitting {
            let Some(input) = rx.recv().await else {
                break;
            };
            if matches!(input, Input::ProducerDone) {
                remaining = remaining.saturating_sub(1);
                continue;
            }
            self.handle(input);
        }
        self.dispatch(Msg::PageUnloaded);
        detector_debug!("page unloaded; {} tasks still running", self.runner.pending_count());
    }

    pub fn handle(&mut self, input: Input) {
        match input {
            Input::Msg(msg) => {
                if let Msg::PageLoaded { url } = &msg {
                    self.watcher = Some(NavigationWatcher::new(url.clone()));
                }
                self.dispatch(msg);
            }
            Input::Signal(signal) => {
                let Some(watcher) = self.watcher.as_mut() else {
                    detector_debug!("page signal before load ignored: {signal:?}");
                    return;
                };
                if let Some(msg) = watcher.observe(&signal) {
                    self.dispatch(msg);
                }
            }
            Input::Command(command) => self.command(command),
            Input::ProducerDone => {}
        }
    }

    fn command(&mut self, command: Result<PanelCommand, CommandError>) {
        let command = match command {
            Ok(command) => command,
            Err(err) => {
                detector_warn!("{err}");
                self.report(|surface| surface.acknowledge(&Ack::malformed(&err)));
                return;
            }
        };
        self.report(|surface| surface.acknowledge(&Ack::for_command(&command)));

        let msg = match command {
            PanelCommand::Inject { job_description } => Msg::InjectPanel {
                text: job_description,
                at_ms: self.runner.clock().now_ms(),
            },
            PanelCommand::ManualActivation => Msg::ManualActivation,
            PanelCommand::Close => Msg::CloseClicked,
            PanelCommand::SetLoading(loading) => Msg::SetLoading(loading),
            PanelCommand::Unknown { action } => {
                detector_info!("ignoring unknown command {action:?}");
                return;
            }
        };
        self.dispatch(msg);
    }

    fn dispatch(&mut self, msg: Msg) {
        let mut queue = VecDeque::from([msg]);
        while let Some(msg) = queue.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;
            set_session_generation(self.state.generation());

            for effect in effects {
                if let Some(follow_up) = self.apply(effect) {
                    queue.push_back(follow_up);
                }
            }

            let view = self.state.view();
            if self.state.consume_dirty() {
                self.report(|surface| surface.render(&view));
            }
        }
    }

    fn apply(&mut self, effect: Effect) -> Option<Msg> {
        match effect {
            Effect::MountPanel { job_id } => self.report(|surface| surface.mount(&job_id)),
            Effect::UnmountPanel => self.report(|surface| surface.unmount()),
            Effect::OpenTab { url } => self.report(|surface| surface.open_tab(&url)),
            Effect::RevealCompleted { job_id } => {
                if self.auto_submit {
                    detector_info!("auto-continuing for {job_id}");
                    return Some(Msg::ContinueClicked);
                }
            }
            other => self.runner.run(other),
        }
        None
    }

    fn report(&mut self, write: impl FnOnce(&mut S) -> std::io::Result<()>) {
        if let Err(err) = write(&mut self.surface) {
            detector_warn!("panel output failed: {err}");
        }
    }
}
