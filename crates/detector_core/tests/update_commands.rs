use std::sync::Once;

use detector_core::{update, AppState, Effect, JobId, Msg, PanelPhase};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(detector_logging::initialize_for_tests);
}

fn load(url: &str) -> AppState {
    let (state, _) = update(AppState::new(), Msg::PageLoaded { url: url.into() });
    state
}

#[test]
fn inject_mounts_and_streams_provided_text() {
    init_logging();
    let text = "Staff engineer for the payments platform, owning reliability end to end.";
    let (state, effects) = update(
        load("https://x.com/jobs/12345/engineer"),
        Msg::InjectPanel {
            text: text.into(),
            at_ms: 100,
        },
    );

    assert_eq!(
        effects,
        vec![
            Effect::MountPanel {
                job_id: JobId::new("x.com-12345"),
            },
            Effect::StartReveal {
                generation: 1,
                tick_ms: 50,
            },
        ]
    );
    assert_eq!(state.phase(), PanelPhase::Streaming);
    assert!(!state.session().unwrap().mounting());
}

#[test]
fn inject_on_unclassified_page_uses_manual_key() {
    init_logging();
    let (state, effects) = update(
        load("https://acme.com/team"),
        Msg::InjectPanel {
            text: "Short text".into(),
            at_ms: 0,
        },
    );

    assert_eq!(
        effects,
        vec![Effect::MountPanel {
            job_id: JobId::new("acme.com-manual"),
        }]
    );
    assert_eq!(state.phase(), PanelPhase::Ready);
    assert_eq!(state.view().visible_text, "Short text");
}

#[test]
fn inject_for_already_mounted_job_is_noop() {
    init_logging();
    let state = load("https://x.com/jobs/12345/engineer");
    let (state, _) = update(state, Msg::DetectionDue { generation: 1 });

    let (state, effects) = update(
        state,
        Msg::InjectPanel {
            text: "Different text".into(),
            at_ms: 0,
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.phase(), PanelPhase::Scanning);
}

#[test]
fn inject_before_page_load_is_ignored() {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        Msg::InjectPanel {
            text: "anything".into(),
            at_ms: 0,
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.phase(), PanelPhase::Unmounted);
}

#[test]
fn manual_activation_scans_immediately_and_suppresses_timer() {
    init_logging();
    let (state, effects) = update(load("https://acme.com/team"), Msg::ManualActivation);
    assert_eq!(
        effects,
        vec![
            Effect::MountPanel {
                job_id: JobId::new("acme.com-manual"),
            },
            Effect::StartExtraction { generation: 1 },
        ]
    );
    assert_eq!(state.phase(), PanelPhase::Scanning);

    let (state, effects) = update(state, Msg::DetectionDue { generation: 1 });
    assert!(effects.is_empty());
    assert_eq!(state.phase(), PanelPhase::Scanning);

    let (_, effects) = update(state, Msg::ManualActivation);
    assert!(effects.is_empty());
}

#[test]
fn set_loading_shows_spinner_without_changing_phase() {
    init_logging();
    let (state, _) = update(
        load("https://acme.com/team"),
        Msg::InjectPanel {
            text: "Short text".into(),
            at_ms: 0,
        },
    );
    let (mut state, effects) = update(state, Msg::SetLoading(true));
    assert!(effects.is_empty());
    assert!(state.consume_dirty());
    let view = state.view();
    assert_eq!(view.phase, PanelPhase::Ready);
    assert!(view.show_spinner);

    let (mut state, _) = update(state, Msg::SetLoading(true));
    assert!(!state.consume_dirty());

    let (state, _) = update(state, Msg::SetLoading(false));
    assert!(!state.view().show_spinner);
}
