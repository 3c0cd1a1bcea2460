use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use twinplay_core::{
    Applied, Command, EngineError, EngineState, PlaybackEngine, PlaybackPosition, ReadinessPhase,
    Session,
};

/// Engine that records calls into a shared log
#[derive(Default)]
struct LogEngine {
    loaded: bool,
    position_ms: u64,
    state: EngineState,
    calls: Arc<Mutex<Vec<&'static str>>>,
}

impl PlaybackEngine for LogEngine {
    fn open(&mut self, _path: &Path) -> Result<(), EngineError> {
        self.calls.lock().push("open");
        self.loaded = true;
        self.state = EngineState::Stopped;
        Ok(())
    }

    fn play(&mut self) -> Result<(), EngineError> {
        self.calls.lock().push("play");
        self.state = EngineState::Playing;
        Ok(())
    }

    fn pause(&mut self) -> Result<(), EngineError> {
        self.calls.lock().push("pause");
        self.state = EngineState::Paused;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), EngineError> {
        self.calls.lock().push("stop");
        self.state = EngineState::Stopped;
        self.position_ms = 0;
        Ok(())
    }

    fn position_ms(&self) -> u64 {
        self.position_ms
    }

    fn duration_ms(&self) -> u64 {
        600_000
    }

    fn set_position_ms(&mut self, ms: u64) -> Result<(), EngineError> {
        self.calls.lock().push("seek");
        self.position_ms = ms;
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn state(&self) -> EngineState {
        self.state
    }
}

fn session_with_log() -> (Session, Arc<Mutex<Vec<&'static str>>>) {
    let engine = LogEngine::default();
    let calls = engine.calls.clone();
    (Session::new(Box::new(engine)), calls)
}

#[test]
fn test_playback_before_open_is_rejected() {
    let (session, calls) = session_with_log();

    for command in [
        Command::Play,
        Command::Pause,
        Command::Stop,
        Command::Seek(PlaybackPosition::from_secs(5)),
    ] {
        assert_eq!(session.apply(&command), Err(EngineError::NotInitialized));
    }
    assert!(calls.lock().is_empty());
}

#[test]
fn test_open_missing_file() {
    let (session, calls) = session_with_log();
    let result = session.open_media("/definitely/not/here.mkv");

    assert!(matches!(result, Err(EngineError::FileNotFound(_))));
    assert_eq!(session.phase(), ReadinessPhase::NoFile);
    assert!(calls.lock().is_empty());
}

#[test]
fn test_open_marks_local_loaded() {
    let (session, _calls) = session_with_log();
    let file = tempfile::NamedTempFile::new().unwrap();

    session.open_media(file.path()).unwrap();

    assert_eq!(session.phase(), ReadinessPhase::LocalLoaded);
    assert_eq!(
        session.apply(&Command::QueryReadiness),
        Ok(Applied::Readiness(true))
    );
    assert_eq!(session.media_info().path.as_deref(), Some(file.path()));
    assert_eq!(session.duration(), PlaybackPosition::from_secs(600));
}

#[test]
fn test_seek_twice_is_idempotent() {
    let (session, _calls) = session_with_log();
    let file = tempfile::NamedTempFile::new().unwrap();
    session.open_media(file.path()).unwrap();

    let seek = Command::Seek(PlaybackPosition::from_secs(120));
    session.apply(&seek).unwrap();
    let once = session.position();
    session.apply(&seek).unwrap();

    assert_eq!(once, PlaybackPosition::from_secs(120));
    assert_eq!(session.position(), once);
}

#[test]
fn test_notify_loaded_sets_flag_only() {
    let (session, calls) = session_with_log();

    assert_eq!(session.apply(&Command::NotifyLoaded), Ok(Applied::Loaded));
    assert!(session.is_local_loaded());
    // The engine itself still has nothing open
    assert_eq!(
        session.apply(&Command::Play),
        Err(EngineError::NotInitialized)
    );
    assert!(calls.lock().is_empty());
}

#[test]
fn test_remote_flag_tracks_latest_answer() {
    let (session, _calls) = session_with_log();
    let file = tempfile::NamedTempFile::new().unwrap();
    session.open_media(file.path()).unwrap();

    session.set_remote_loaded(true);
    assert_eq!(session.phase(), ReadinessPhase::BothLoaded);

    session.set_remote_loaded(false);
    assert_eq!(session.phase(), ReadinessPhase::LocalLoaded);
}
