//! Conversation Session Tracker
//!
//! Transient per-user answer sets for a questionnaire submission. A session
//! is created when a submission starts and removed when it is drained for
//! scoring; nothing is kept between questionnaires.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;
use triage_domain::{Answer, SessionAnswer};

/// Per-user in-progress answers
#[derive(Default)]
pub struct SessionTracker {
    sessions: Mutex<HashMap<String, Vec<SessionAnswer>>>,
    user_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize submissions of one user.
    ///
    /// Hold the guard from `begin` until `drain` so two submissions by the
    /// same user never share a session.
    pub async fn lock_user(&self, user_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.user_locks.lock().await;
            Arc::clone(locks.entry(user_id.to_string()).or_default())
        };
        lock.lock_owned().await
    }

    /// Start a fresh session, discarding any leftover one
    pub async fn begin(&self, user_id: &str) {
        let previous = self
            .sessions
            .lock()
            .await
            .insert(user_id.to_string(), Vec::new());
        if previous.is_some() {
            debug!("Discarded unfinished session for {}", user_id);
        }
    }

    /// Append an answer to the user's session, starting one if needed
    pub async fn record(&self, user_id: &str, question: impl Into<String>, answer: Answer) {
        self.sessions
            .lock()
            .await
            .entry(user_id.to_string())
            .or_default()
            .push(SessionAnswer::new(question, answer));
    }

    /// Remove and return the user's answers in recording order
    pub async fn drain(&self, user_id: &str) -> Vec<SessionAnswer> {
        self.sessions
            .lock()
            .await
            .remove(user_id)
            .unwrap_or_default()
    }

    #[cfg(test)]
    async fn active_sessions(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_begin_record_drain() {
        let tracker = SessionTracker::new();
        tracker.begin("U1").await;
        tracker.record("U1", "A", Answer::Yes).await;
        tracker.record("U1", "B", Answer::No).await;

        let answers = tracker.drain("U1").await;
        assert_eq!(answers, vec![SessionAnswer::yes("A"), SessionAnswer::no("B")]);
        assert_eq!(tracker.active_sessions().await, 0);
        assert!(tracker.drain("U1").await.is_empty());
    }

    #[tokio::test]
    async fn test_sessions_are_per_user() {
        let tracker = SessionTracker::new();
        tracker.begin("U1").await;
        tracker.begin("U2").await;
        tracker.record("U1", "A", Answer::Yes).await;
        tracker.record("U2", "B", Answer::No).await;

        assert_eq!(tracker.drain("U2").await, vec![SessionAnswer::no("B")]);
        assert_eq!(tracker.drain("U1").await, vec![SessionAnswer::yes("A")]);
    }

    #[tokio::test]
    async fn test_begin_discards_leftover_answers() {
        let tracker = SessionTracker::new();
        tracker.record("U1", "stale", Answer::Yes).await;
        tracker.begin("U1").await;
        assert!(tracker.drain("U1").await.is_empty());
    }

    #[tokio::test]
    async fn test_lock_user_serializes_same_user() {
        let tracker = Arc::new(SessionTracker::new());
        let guard = tracker.lock_user("U1").await;

        let contender = {
            let tracker = Arc::clone(&tracker);
            tokio::spawn(async move {
                let _guard = tracker.lock_user("U1").await;
            })
        };
        // Another user is not blocked
        tokio::time::timeout(Duration::from_millis(100), tracker.lock_user("U2"))
            .await
            .expect("other user proceeds");

        tokio::task::yield_now().await;
        assert!(!contender.is_finished());
        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .expect("contender proceeds")
            .unwrap();
    }
}
