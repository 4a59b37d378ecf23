use std::sync::Once;

use detector_core::{update, AppState, Effect, JobId, Msg, PanelPhase};
use pretty_assertions::assert_eq;

const JOB_URL: &str = "https://x.com/jobs/12345/engineer";
const OTHER_JOB_URL: &str = "https://x.com/jobs/67890/designer";

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(detector_logging::initialize_for_tests);
}

fn load(url: &str) -> AppState {
    let (state, _) = update(AppState::new(), Msg::PageLoaded { url: url.into() });
    state
}

fn detect(state: AppState) -> (AppState, Vec<Effect>) {
    let generation = state.generation();
    update(state, Msg::DetectionDue { generation })
}

fn long_description() -> String {
    "We are hiring a backend engineer to build reliable services in Rust. ".repeat(4)
}

#[test]
fn page_load_schedules_initial_detection() {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        Msg::PageLoaded {
            url: JOB_URL.into(),
        },
    );

    assert_eq!(
        effects,
        vec![Effect::ScheduleDetection {
            generation: 1,
            delay_ms: 1_500,
        }]
    );
    let session = state.session().expect("session");
    assert_eq!(session.url(), JOB_URL);
    assert!(session.detection_pending());
    assert_eq!(state.phase(), PanelPhase::Unmounted);
}

#[test]
fn detection_on_job_page_mounts_scanning_panel() {
    init_logging();
    let (mut state, effects) = detect(load(JOB_URL));

    assert_eq!(
        effects,
        vec![
            Effect::MountPanel {
                job_id: JobId::new("x.com-12345"),
            },
            Effect::StartExtraction { generation: 1 },
        ]
    );
    let view = state.view();
    assert_eq!(view.phase, PanelPhase::Scanning);
    assert_eq!(view.job_id, Some(JobId::new("x.com-12345")));
    assert!(view.show_spinner);
    assert!(view.visible_text.is_empty());
    assert!(!view.editable);
    assert!(state.consume_dirty());
    assert!(state.session().unwrap().mounting());
    assert!(!state.session().unwrap().detection_pending());
}

#[test]
fn non_job_pages_never_mount() {
    init_logging();
    for url in [
        "https://x.com/blog/engineering-culture",
        "https://x.com/jobs/12345/apply/",
        "https://x.com/jobs/search?q=rust",
        "https://acme.com/careers/backend-engineer",
    ] {
        let (state, effects) = detect(load(url));
        assert!(effects.is_empty(), "{url}");
        assert_eq!(state.phase(), PanelPhase::Unmounted, "{url}");
        assert_eq!(state.tracked_job(), None, "{url}");
    }
}

#[test]
fn second_detection_for_same_job_is_suppressed() {
    init_logging();
    let (state, _) = detect(load(JOB_URL));

    let (state, effects) = detect(state);
    assert!(effects.is_empty());
    assert_eq!(state.phase(), PanelPhase::Scanning);

    let generation = state.generation();
    let (state, _) = update(
        state,
        Msg::ExtractionResolved {
            generation,
            text: "Short note".into(),
            at_ms: 2_000,
        },
    );
    assert_eq!(state.phase(), PanelPhase::Ready);

    let (state, effects) = detect(state);
    assert!(effects.is_empty());
    assert_eq!(state.phase(), PanelPhase::Ready);
}

#[test]
fn stale_detection_timer_is_ignored() {
    init_logging();
    let state = load(JOB_URL);
    let stale = state.generation();
    let (state, _) = update(
        state,
        Msg::NavigationDetected {
            url: "https://x.com/about".into(),
        },
    );

    let (state, effects) = update(state, Msg::DetectionDue { generation: stale });
    assert!(effects.is_empty());
    assert_eq!(state.phase(), PanelPhase::Unmounted);
}

#[test]
fn close_clears_tracked_job_so_redetection_mounts_again() {
    init_logging();
    let (state, _) = detect(load(JOB_URL));

    let (state, effects) = update(state, Msg::CloseClicked);
    assert_eq!(effects, vec![Effect::CancelPending, Effect::UnmountPanel]);
    assert_eq!(state.phase(), PanelPhase::Unmounted);
    assert_eq!(state.tracked_job(), None);

    let (state, effects) = detect(state);
    assert_eq!(
        effects,
        vec![
            Effect::MountPanel {
                job_id: JobId::new("x.com-12345"),
            },
            Effect::StartExtraction { generation: 1 },
        ]
    );
    assert_eq!(state.phase(), PanelPhase::Scanning);
}

#[test]
fn close_without_panel_is_noop() {
    init_logging();
    let (_, effects) = update(load(JOB_URL), Msg::CloseClicked);
    assert!(effects.is_empty());
}

#[test]
fn navigation_while_streaming_tears_down_before_redetecting() {
    init_logging();
    let (state, _) = detect(load(JOB_URL));
    let first = state.generation();
    let (state, effects) = update(
        state,
        Msg::ExtractionResolved {
            generation: first,
            text: long_description(),
            at_ms: 2_000,
        },
    );
    assert_eq!(
        effects,
        vec![Effect::StartReveal {
            generation: first,
            tick_ms: 50,
        }]
    );
    assert_eq!(state.phase(), PanelPhase::Streaming);

    let (state, effects) = update(
        state,
        Msg::NavigationDetected {
            url: OTHER_JOB_URL.into(),
        },
    );
    assert_eq!(
        effects,
        vec![
            Effect::CancelPending,
            Effect::UnmountPanel,
            Effect::ScheduleDetection {
                generation: first + 1,
                delay_ms: 500,
            },
        ]
    );
    assert_eq!(state.phase(), PanelPhase::Unmounted);
    assert_eq!(state.tracked_job(), None);

    // A tick from the cancelled reveal must not resurrect anything.
    let (state, effects) = update(
        state,
        Msg::RevealTick {
            generation: first,
            at_ms: 4_000,
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.phase(), PanelPhase::Unmounted);

    let (state, effects) = detect(state);
    assert_eq!(
        effects,
        vec![
            Effect::MountPanel {
                job_id: JobId::new("x.com-67890"),
            },
            Effect::StartExtraction {
                generation: first + 1,
            },
        ]
    );
    assert_eq!(state.phase(), PanelPhase::Scanning);
}

#[test]
fn navigation_without_panel_only_cancels_pending_timer() {
    init_logging();
    let (state, effects) = update(
        load("https://x.com/"),
        Msg::NavigationDetected {
            url: JOB_URL.into(),
        },
    );
    assert_eq!(
        effects,
        vec![
            Effect::CancelPending,
            Effect::ScheduleDetection {
                generation: 2,
                delay_ms: 500,
            },
        ]
    );
    assert_eq!(state.session().unwrap().url(), JOB_URL);
}

#[test]
fn navigation_to_current_url_is_noop() {
    init_logging();
    let state = load(JOB_URL);
    let (state, effects) = update(
        state,
        Msg::NavigationDetected {
            url: JOB_URL.into(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.generation(), 1);
}

#[test]
fn page_unload_ends_session_and_unmounts() {
    init_logging();
    let (state, _) = detect(load(JOB_URL));
    let (state, effects) = update(state, Msg::PageUnloaded);

    assert_eq!(effects, vec![Effect::CancelPending, Effect::UnmountPanel]);
    assert!(state.session().is_none());
    assert_eq!(state.phase(), PanelPhase::Unmounted);
}

#[test]
fn late_extraction_result_after_navigation_is_dropped() {
    init_logging();
    let (state, _) = detect(load(JOB_URL));
    let stale = state.generation();
    let (state, _) = update(
        state,
        Msg::NavigationDetected {
            url: OTHER_JOB_URL.into(),
        },
    );

    let (state, effects) = update(
        state,
        Msg::ExtractionResolved {
            generation: stale,
            text: long_description(),
            at_ms: 3_000,
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.phase(), PanelPhase::Unmounted);
}
