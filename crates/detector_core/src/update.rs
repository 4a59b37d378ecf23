use detector_logging::{detector_debug, detector_info, detector_warn};

use crate::state::Panel;
use crate::{
    char_len, has_real_content, is_job_page, job_id, job_id_or_manual, normalize_whitespace,
    reveal_len, word_count, AppState, Effect, Generation, JobId, MountId, Msg, PanelPhase,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::PageLoaded { url } => {
            let delay_ms = state.settings().timings.initial_delay_ms;
            start_session(&mut state, url, delay_ms)
        }
        Msg::NavigationDetected { url } => {
            if state.session().is_some_and(|session| session.url() == url) {
                Vec::new()
            } else {
                let delay_ms = state.settings().timings.settle_delay_ms;
                start_session(&mut state, url, delay_ms)
            }
        }
        Msg::PageUnloaded => {
            let effects = teardown(&mut state);
            state.end_session();
            effects
        }
        Msg::DetectionDue { generation } => detect(&mut state, generation),
        Msg::ExtractionResolved {
            generation,
            text,
            at_ms,
        } => {
            if !state.is_current(generation) || state.phase() != PanelPhase::Scanning {
                detector_debug!("dropping extraction result for generation {generation}");
                return (state, Vec::new());
            }
            if let Some(session) = state.session_mut() {
                session.extraction_settled();
            }
            advance(&mut state, generation, &text, at_ms)
        }
        Msg::RevealTick { generation, at_ms } => reveal_tick(&mut state, generation, at_ms),
        Msg::TextEdited(text) => {
            if let Panel::Ready { text: current } = &mut state.panel {
                *current = text;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ContinueClicked => continue_clicked(&mut state),
        Msg::CloseClicked => unmount_panel(&mut state),
        Msg::SubmissionSucceeded {
            mount,
            submission_id,
        } => {
            detector_info!("submission from mount {mount} accepted as {submission_id}");
            settle_submission(&mut state, mount);
            let mut effects = vec![Effect::OpenTab {
                url: state.settings().result_url(&submission_id),
            }];
            if state.is_mounted() && state.last_mount == mount {
                effects.extend(unmount_panel(&mut state));
            }
            effects
        }
        Msg::SubmissionFailed { mount, reason } => {
            detector_warn!("submission from mount {mount} failed: {reason}");
            settle_submission(&mut state, mount);
            Vec::new()
        }
        Msg::InjectPanel { text, at_ms } => {
            let Some((generation, job)) = current_target(&state) else {
                detector_warn!("inject requested before any page loaded");
                return (state, Vec::new());
            };
            match mount(&mut state, job) {
                Some(mut effects) => {
                    if let Some(session) = state.session_mut() {
                        session.extraction_settled();
                    }
                    effects.extend(advance(&mut state, generation, &text, at_ms));
                    effects
                }
                None => Vec::new(),
            }
        }
        Msg::ManualActivation => {
            let Some((generation, job)) = current_target(&state) else {
                detector_warn!("manual activation before any page loaded");
                return (state, Vec::new());
            };
            match mount(&mut state, job) {
                Some(mut effects) => {
                    effects.push(Effect::StartExtraction { generation });
                    effects
                }
                None => Vec::new(),
            }
        }
        Msg::SetLoading(loading) => {
            if state.external_loading != loading {
                state.external_loading = loading;
                state.mark_dirty();
            }
            Vec::new()
        }
    };

    (state, effects)
}

/// Generation and job key a user-initiated panel would attach to.
fn current_target(state: &AppState) -> Option<(Generation, JobId)> {
    state
        .session()
        .map(|session| (session.generation(), job_id_or_manual(session.url())))
}

fn start_session(state: &mut AppState, url: String, delay_ms: u64) -> Vec<Effect> {
    let mut effects = teardown(state);
    let generation = state.begin_session(url);
    detector_info!(
        "session {generation} started; detection in {delay_ms}ms for {}",
        state.session().map_or("", |session| session.url())
    );
    effects.push(Effect::ScheduleDetection {
        generation,
        delay_ms,
    });
    effects
}

/// Cancels everything the live session started and removes its panel.
fn teardown(state: &mut AppState) -> Vec<Effect> {
    let had_session = state.session().is_some();
    let mut effects = unmount_panel(state);
    if effects.is_empty() && had_session {
        effects.push(Effect::CancelPending);
    }
    effects
}

fn unmount_panel(state: &mut AppState) -> Vec<Effect> {
    if !state.is_mounted() {
        return Vec::new();
    }
    state.panel = Panel::Unmounted;
    if let Some(session) = state.session_mut() {
        session.untrack();
    }
    state.mark_dirty();
    detector_info!("panel unmounted");
    vec![Effect::CancelPending, Effect::UnmountPanel]
}

fn detect(state: &mut AppState, generation: Generation) -> Vec<Effect> {
    let Some(session) = state.session_mut().filter(|s| s.is_current(generation)) else {
        detector_debug!("stale detection timer for generation {generation}");
        return Vec::new();
    };
    session.detection_fired();
    if session.mounting() {
        detector_debug!("mount already in progress; skipping detection pass");
        return Vec::new();
    }
    let url = session.url().to_string();

    if !is_job_page(&url) {
        detector_info!("not a job page: {url}");
        return Vec::new();
    }
    let Some(job) = job_id(&url) else {
        detector_info!("no job id derivable from {url}");
        return Vec::new();
    };

    match mount(state, job) {
        Some(mut effects) => {
            effects.push(Effect::StartExtraction { generation });
            effects
        }
        None => Vec::new(),
    }
}

/// Shows the panel in `Scanning` for `job`, or returns `None` when that job
/// is already on screen.
fn mount(state: &mut AppState, job: JobId) -> Option<Vec<Effect>> {
    if state.is_mounted() && state.tracked_job() == Some(&job) {
        detector_debug!("panel already mounted for {job}");
        return None;
    }
    let mut effects = unmount_panel(state);
    state.session_mut()?.track(job.clone());
    state.last_mount += 1;
    state.panel = Panel::Scanning;
    state.mark_dirty();
    detector_info!("panel {} mounted for {job}", state.last_mount);
    effects.push(Effect::MountPanel { job_id: job });
    Some(effects)
}

fn advance(state: &mut AppState, generation: Generation, text: &str, at_ms: u64) -> Vec<Effect> {
    let text = normalize_whitespace(text);
    state.mark_dirty();

    if text.is_empty() {
        detector_info!("no job description found; showing fallback text");
        state.panel = Panel::Ready {
            text: state.settings().fallback_text.clone(),
        };
        return Vec::new();
    }

    if !has_real_content(&text, state.settings().gates.real_content_chars) {
        detector_debug!("short description ({} chars); skipping reveal", char_len(&text));
        state.panel = Panel::Ready { text };
        return Vec::new();
    }

    let tick_ms = state.settings().timings.reveal_tick_ms;
    state.panel = Panel::Streaming {
        total_chars: char_len(&text),
        full_text: text,
        started_at_ms: at_ms,
        visible_chars: 0,
    };
    vec![Effect::StartReveal {
        generation,
        tick_ms,
    }]
}

fn reveal_tick(state: &mut AppState, generation: Generation, at_ms: u64) -> Vec<Effect> {
    if !state.is_current(generation) {
        return Vec::new();
    }
    let duration_ms = state.settings().timings.reveal_duration_ms;
    let Panel::Streaming {
        total_chars,
        started_at_ms,
        visible_chars,
        ..
    } = &mut state.panel
    else {
        return Vec::new();
    };

    let elapsed = at_ms.saturating_sub(*started_at_ms);
    let next = reveal_len(elapsed, duration_ms, *total_chars).max(*visible_chars);
    if next < *total_chars {
        if next != *visible_chars {
            *visible_chars = next;
            state.mark_dirty();
        }
        return Vec::new();
    }

    if let Panel::Streaming { full_text, .. } = std::mem::take(&mut state.panel) {
        state.panel = Panel::Ready { text: full_text };
    }
    state.mark_dirty();
    let mut effects = vec![Effect::StopReveal];
    if let Some(job) = state.tracked_job().cloned() {
        detector_info!("reveal complete for {job}");
        effects.push(Effect::RevealCompleted { job_id: job });
    }
    effects
}

fn continue_clicked(state: &mut AppState) -> Vec<Effect> {
    let Panel::Ready { text } = &state.panel else {
        detector_debug!("continue ignored in {:?}", state.phase());
        return Vec::new();
    };
    if state.pending_submission.is_some() {
        detector_debug!("submission already in flight");
        return Vec::new();
    }
    let words = word_count(text);
    let min_words = state.settings().gates.min_submit_words;
    if words < min_words {
        detector_info!("continue blocked: {words} words, need {min_words}");
        return Vec::new();
    }
    let Some(session) = state.session() else {
        return Vec::new();
    };
    let effect = Effect::Submit {
        mount: state.last_mount,
        job_description: text.clone(),
        job_url: session.url().to_string(),
    };
    state.pending_submission = Some(state.last_mount);
    state.mark_dirty();
    vec![effect]
}

/// Clears the in-flight marker when `mount` owns it.
fn settle_submission(state: &mut AppState, mount: MountId) {
    if state.pending_submission == Some(mount) {
        state.pending_submission = None;
        state.mark_dirty();
    }
}
