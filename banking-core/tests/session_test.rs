use banking::model::session::SessionMode;
use banking::traits::mode_store::ModeStore;
use banking::BankingError;
use banking_core::fs::PathManager;
use banking_core::session::{FileModeStore, ModeTransition, SessionState};
use banking_core::testing::{MemoryModeStore, ScriptedConfirmer};

#[test]
fn test_declined_switch_stays_demo() {
    let store = MemoryModeStore::new();
    let mut session = SessionState::load(&store);
    let confirmer = ScriptedConfirmer::declining();

    let outcome = session
        .request_mode(SessionMode::Live, &confirmer, &store)
        .unwrap();

    assert_eq!(outcome, ModeTransition::Declined);
    assert_eq!(session.mode(), SessionMode::Demo);
    assert_eq!(store.stored(), None);
    assert_eq!(confirmer.prompts().len(), 1);
}

#[test]
fn test_confirmed_switch_survives_reload() {
    let store = MemoryModeStore::new();
    let mut session = SessionState::load(&store);

    let outcome = session
        .request_mode(SessionMode::Live, &ScriptedConfirmer::accepting(), &store)
        .unwrap();

    assert_eq!(
        outcome,
        ModeTransition::Switched {
            from: SessionMode::Demo,
            to: SessionMode::Live
        }
    );
    assert!(session.is_live());

    let reloaded = SessionState::load(&store.clone());
    assert_eq!(reloaded.mode(), SessionMode::Live);
}

#[test]
fn test_store_failure_keeps_mode() {
    let store = MemoryModeStore::new();
    let mut session = SessionState::load(&store);
    store.set_failing(true);

    let err = session
        .request_mode(SessionMode::Live, &ScriptedConfirmer::accepting(), &store)
        .unwrap_err();

    assert!(matches!(err, BankingError::Storage(_)));
    assert_eq!(session.mode(), SessionMode::Demo);

    // Unreadable state starts in demo.
    assert_eq!(SessionState::load(&store).mode(), SessionMode::Demo);
}

#[test]
fn test_file_store_round_trip_through_data_dir() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let paths = PathManager::new(dir.path().join("config"), dir.path().join("data"));
    let store = FileModeStore::new(paths.session_file());

    let mut session = SessionState::load(&store);
    assert_eq!(session.mode(), SessionMode::Demo);

    let confirmer = ScriptedConfirmer::new([true, true]);
    session.request_mode(SessionMode::Live, &confirmer, &store)?;
    assert_eq!(
        FileModeStore::new(paths.session_file()).load()?,
        Some(SessionMode::Live)
    );

    session.request_mode(SessionMode::Demo, &confirmer, &store)?;
    assert_eq!(SessionState::load(&store).mode(), SessionMode::Demo);
    Ok(())
}

#[test]
fn test_stored_live_flag_is_restored() {
    let store = MemoryModeStore::with_mode(SessionMode::Live);
    let mut session = SessionState::load(&store);
    assert!(session.is_live());

    // Asking for the current mode never prompts.
    let confirmer = ScriptedConfirmer::declining();
    let outcome = session
        .request_mode(SessionMode::Live, &confirmer, &store)
        .unwrap();

    assert_eq!(outcome, ModeTransition::Unchanged);
    assert!(confirmer.prompts().is_empty());
    assert_eq!(store.stored(), Some(SessionMode::Live));
}
