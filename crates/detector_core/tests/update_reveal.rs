use std::sync::Once;

use detector_core::{update, AppState, Effect, JobId, Msg, PanelPhase, DEFAULT_FALLBACK_TEXT};
use pretty_assertions::assert_eq;

const JOB_URL: &str = "https://x.com/jobs/12345/engineer";

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(detector_logging::initialize_for_tests);
}

/// Loads the job page and lets the detection timer fire, leaving the panel scanning.
fn scanning() -> AppState {
    let (state, _) = update(
        AppState::new(),
        Msg::PageLoaded {
            url: JOB_URL.into(),
        },
    );
    let generation = state.generation();
    let (state, _) = update(state, Msg::DetectionDue { generation });
    state
}

fn resolve(state: AppState, text: &str, at_ms: u64) -> (AppState, Vec<Effect>) {
    let generation = state.generation();
    update(
        state,
        Msg::ExtractionResolved {
            generation,
            text: text.into(),
            at_ms,
        },
    )
}

fn tick(state: AppState, at_ms: u64) -> (AppState, Vec<Effect>) {
    let generation = state.generation();
    update(state, Msg::RevealTick { generation, at_ms })
}

#[test]
fn real_content_starts_streaming_from_empty() {
    init_logging();
    let (state, effects) = resolve(scanning(), &"a".repeat(200), 1_000);

    assert_eq!(
        effects,
        vec![Effect::StartReveal {
            generation: 1,
            tick_ms: 50,
        }]
    );
    let view = state.view();
    assert_eq!(view.phase, PanelPhase::Streaming);
    assert_eq!(view.visible_text, "");
    assert_eq!(view.reveal_percent, Some(0));
    assert!(!view.editable);
    assert!(!view.continue_enabled);
    assert!(!view.show_spinner);
    assert!(!state.session().unwrap().mounting());
}

#[test]
fn reveal_length_follows_elapsed_time() {
    init_logging();
    let (state, _) = resolve(scanning(), &"a".repeat(200), 1_000);

    let (state, effects) = tick(state, 1_000 + 1_250);
    assert!(effects.is_empty());
    assert_eq!(state.view().visible_chars, 100);
    assert_eq!(state.view().reveal_percent, Some(50));

    // A single late tick jumps straight to where the clock says it should be.
    let (state, effects) = tick(state, 1_000 + 2_000);
    assert!(effects.is_empty());
    assert_eq!(state.view().visible_chars, 160);
}

#[test]
fn reveal_is_monotonic_and_completes_exactly_once() {
    init_logging();
    let text = "Build and operate the ingestion pipeline for our job search product.";
    let total = text.chars().count();
    let (mut state, _) = resolve(scanning(), text, 0);

    let mut seen = Vec::new();
    let mut completions = 0;
    for at_ms in [100, 700, 400, 1_300, 1_299, 2_400, 2_500, 2_550, 3_000] {
        let (next, effects) = tick(state, at_ms);
        state = next;
        seen.push(state.view().visible_chars);
        completions += effects
            .iter()
            .filter(|effect| matches!(effect, Effect::RevealCompleted { .. }))
            .count();
    }

    assert!(seen.windows(2).all(|pair| pair[0] <= pair[1]), "{seen:?}");
    assert_eq!(seen.last().copied(), Some(total));
    assert_eq!(completions, 1);
    assert_eq!(state.phase(), PanelPhase::Ready);
    assert_eq!(state.view().visible_text, text);
    assert!(state.view().editable);
}

#[test]
fn completion_stops_ticker_and_notifies() {
    init_logging();
    let (state, _) = resolve(scanning(), &"a".repeat(120), 500);

    let (state, effects) = tick(state, 500 + 2_500);
    assert_eq!(
        effects,
        vec![
            Effect::StopReveal,
            Effect::RevealCompleted {
                job_id: JobId::new("x.com-12345"),
            },
        ]
    );
    assert_eq!(state.phase(), PanelPhase::Ready);

    let (_, effects) = tick(state, 9_000);
    assert!(effects.is_empty());
}

#[test]
fn short_text_skips_streaming() {
    init_logging();
    let (state, effects) = resolve(scanning(), "  Remote role,\n apply by Friday.  ", 1_000);

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.phase, PanelPhase::Ready);
    assert_eq!(view.visible_text, "Remote role, apply by Friday.");
    assert_eq!(view.reveal_percent, None);
    assert!(view.editable);
    assert!(!view.continue_enabled);
}

#[test]
fn text_at_threshold_is_not_real_content() {
    init_logging();
    let (state, effects) = resolve(scanning(), &"b".repeat(50), 1_000);
    assert!(effects.is_empty());
    assert_eq!(state.phase(), PanelPhase::Ready);

    let (state, effects) = resolve(scanning(), &"b".repeat(51), 1_000);
    assert_eq!(effects.len(), 1);
    assert_eq!(state.phase(), PanelPhase::Streaming);
}

#[test]
fn timeout_shows_fallback_instantly() {
    init_logging();
    for empty in ["", " \n\t "] {
        let (state, effects) = resolve(scanning(), empty, 11_500);

        assert!(effects.is_empty());
        let view = state.view();
        assert_eq!(view.phase, PanelPhase::Ready);
        assert_eq!(view.visible_text, DEFAULT_FALLBACK_TEXT);
        assert!(view.editable);
        // The placeholder is far below the word gate.
        assert!(!view.continue_enabled);
    }
}

#[test]
fn edits_are_ignored_until_ready() {
    init_logging();
    let (state, _) = resolve(scanning(), &"c".repeat(80), 0);
    let (state, _) = update(state, Msg::TextEdited("hijacked".into()));
    let (state, _) = tick(state, 2_500);

    assert_eq!(state.view().visible_text, "c".repeat(80));

    let (state, _) = update(state, Msg::TextEdited("edited by user".into()));
    assert_eq!(state.view().visible_text, "edited by user");
}
