//! Session Store Port - Registry of live chat sessions.
//!
//! A live session pairs the `ChatSession` aggregate with the runtime guards
//! the engine needs: a send gate serializing exchanges, and a typing flag
//! readable while an exchange is pending. Handles also track when they were
//! last used so idle sessions can be evicted.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, MutexGuard};

use crate::domain::conversation::ChatSession;
use crate::domain::foundation::SessionId;

/// A chat session plus its concurrency guards.
#[derive(Debug)]
pub struct SessionHandle {
    id: SessionId,
    send_gate: Mutex<()>,
    state: Mutex<ChatSession>,
    typing: AtomicBool,
    opened: Instant,
    /// Milliseconds after `opened` of the last gate or state access
    last_active_ms: AtomicU64,
}

impl SessionHandle {
    pub fn new(session: ChatSession) -> Self {
        Self {
            id: *session.id(),
            send_gate: Mutex::new(()),
            state: Mutex::new(session),
            typing: AtomicBool::new(false),
            opened: Instant::now(),
            last_active_ms: AtomicU64::new(0),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Waits for any in-flight exchange on this session to finish.
    ///
    /// Holders run one exchange at a time, in arrival order.
    pub async fn acquire_send(&self) -> MutexGuard<'_, ()> {
        let guard = self.send_gate.lock().await;
        self.touch();
        guard
    }

    /// Short-held lock over the session state.
    pub async fn state(&self) -> MutexGuard<'_, ChatSession> {
        let guard = self.state.lock().await;
        self.touch();
        guard
    }

    /// Time since the session was last read or written.
    pub fn idle_for(&self) -> Duration {
        let last = Duration::from_millis(self.last_active_ms.load(Ordering::Relaxed));
        self.opened.elapsed().saturating_sub(last)
    }

    /// Returns true while an exchange holds the send gate.
    pub fn is_busy(&self) -> bool {
        self.send_gate.try_lock().is_err()
    }

    fn touch(&self) {
        let ms = u64::try_from(self.opened.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.last_active_ms.fetch_max(ms, Ordering::Relaxed);
    }

    pub fn is_typing(&self) -> bool {
        self.typing.load(Ordering::SeqCst)
    }

    pub fn set_typing(&self, typing: bool) {
        self.typing.store(typing, Ordering::SeqCst);
    }
}

/// Port for storing live sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Registers a session, replacing any with the same id.
    async fn insert(&self, handle: Arc<SessionHandle>);

    async fn get(&self, id: &SessionId) -> Option<Arc<SessionHandle>>;

    /// Removes a session; returns false if it did not exist.
    async fn remove(&self, id: &SessionId) -> bool;

    async fn len(&self) -> usize;

    /// Drops sessions idle for at least `max_idle`, skipping any with an
    /// exchange in flight. Returns how many were dropped.
    async fn evict_idle(&self, max_idle: Duration) -> usize;
}
