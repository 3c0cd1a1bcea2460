#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use parking_lot::Mutex;
use tempfile::NamedTempFile;
use twinplay_control::{CommandDispatcher, PlaybackSync, RetryPolicy};
use twinplay_core::{
    status_channel, EngineError, EngineState, PeerAddress, PlaybackEngine, Session, StatusReceiver,
};

/// Engine that records every call it receives
#[derive(Default)]
pub struct RecordingEngine {
    loaded: bool,
    position_ms: u64,
    state: EngineState,
    calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingEngine {
    pub fn new() -> (Self, Arc<Mutex<Vec<String>>>) {
        let engine = Self::default();
        let calls = engine.calls.clone();
        (engine, calls)
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().push(call.into());
    }
}

impl PlaybackEngine for RecordingEngine {
    fn open(&mut self, _path: &Path) -> Result<(), EngineError> {
        self.record("open");
        self.loaded = true;
        self.state = EngineState::Stopped;
        Ok(())
    }

    fn play(&mut self) -> Result<(), EngineError> {
        self.record("play");
        self.state = EngineState::Playing;
        Ok(())
    }

    fn pause(&mut self) -> Result<(), EngineError> {
        self.record("pause");
        self.state = EngineState::Paused;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), EngineError> {
        self.record("stop");
        self.state = EngineState::Stopped;
        self.position_ms = 0;
        Ok(())
    }

    fn position_ms(&self) -> u64 {
        self.position_ms
    }

    fn duration_ms(&self) -> u64 {
        0
    }

    fn set_position_ms(&mut self, ms: u64) -> Result<(), EngineError> {
        self.record(format!("seek:{}", ms));
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

/// Retry policy with short timings so tests stay fast
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy::new(3, Duration::from_millis(200), Duration::from_millis(100))
}

/// Serve a router on an ephemeral localhost port
pub async fn spawn_peer(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router.into_make_service())
            .await
            .unwrap();
    });
    addr
}

/// An address nothing listens on
pub fn closed_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

pub fn peer_at(addr: SocketAddr) -> PeerAddress {
    PeerAddress::parse(&format!("http://{}", addr)).unwrap()
}

/// A local instance with a call-recording engine
pub struct Instance {
    pub sync: PlaybackSync,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub events: StatusReceiver,
    pub media: NamedTempFile,
}

impl Instance {
    pub fn new(peer: Option<PeerAddress>) -> Self {
        let (engine, calls) = RecordingEngine::new();
        let session = Arc::new(Session::with_peer(Box::new(engine), peer));
        let (status, events) = status_channel();
        let dispatcher = CommandDispatcher::new(session, fast_retry(), status).unwrap();

        Self {
            sync: PlaybackSync::new(dispatcher),
            calls,
            events,
            media: NamedTempFile::new().unwrap(),
        }
    }

    /// Open the medium on the local engine only, without asking the peer
    pub fn load_locally(&self) {
        self.sync.session().open_media(self.media.path()).unwrap();
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}
