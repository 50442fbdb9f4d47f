//! Server-side storage of running quizzes.
//!
//! The browser only holds an opaque [`SessionKey`]; the quiz itself stays
//! here until it expires.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rand::Rng;
use rand::distr::Alphanumeric;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;
use uuid::Uuid;

use crate::Clock;
use crate::quiz::QuizSession;

/// Idle time after which a quiz is forgotten.
pub const DEFAULT_SESSION_TTL_SECS: i64 = 3600;

const CSRF_TOKEN_LEN: usize = 32;

/// Opaque identifier carried in the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionKey(Uuid);

impl SessionKey {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for SessionKey {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Shared handle to a running quiz plus the token its forms must echo back.
///
/// Clones point at the same quiz. Changes go through [`StoredQuiz::lock`], which
/// lets one request at a time work on the quiz.
#[derive(Debug, Clone)]
pub struct StoredQuiz {
    pub csrf_token: String,
    session: Arc<Mutex<QuizSession>>,
}

impl StoredQuiz {
    fn new(session: QuizSession) -> Self {
        Self {
            csrf_token: generate_csrf_token(),
            session: Arc::new(Mutex::new(session)),
        }
    }

    /// Wait until no other request holds the quiz, then take it.
    pub async fn lock(&self) -> MutexGuard<'_, QuizSession> {
        self.session.lock().await
    }

    /// Compares without stopping at the first differing byte.
    #[must_use]
    pub fn verify_csrf(&self, token: &str) -> bool {
        let expected = self.csrf_token.as_bytes();
        let given = token.as_bytes();
        expected.len() == given.len()
            && expected
                .iter()
                .zip(given)
                .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }
}

fn generate_csrf_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(CSRF_TOKEN_LEN)
        .map(char::from)
        .collect()
}

#[derive(Clone)]
struct Entry {
    quiz: StoredQuiz,
    touched_at: DateTime<Utc>,
}

/// Concurrent map of running quizzes with idle expiry.
pub struct QuizSessionStore {
    clock: Clock,
    ttl: Duration,
    entries: DashMap<SessionKey, Entry>,
}

impl QuizSessionStore {
    #[must_use]
    pub fn new(clock: Clock, ttl: Duration) -> Self {
        Self {
            clock,
            ttl,
            entries: DashMap::new(),
        }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn is_expired(&self, entry: &Entry, now: DateTime<Utc>) -> bool {
        now - entry.touched_at > self.ttl
    }

    /// Store a new quiz under a fresh key.
    pub fn create(&self, session: QuizSession) -> (SessionKey, StoredQuiz) {
        let key = SessionKey::generate();
        let quiz = StoredQuiz::new(session);
        self.entries.insert(
            key,
            Entry {
                quiz: quiz.clone(),
                touched_at: self.clock.now(),
            },
        );
        debug!(%key, active = self.entries.len(), "quiz session created");
        (key, quiz)
    }

    /// Handle to a live quiz, refreshing its idle timer. Expired entries are dropped.
    #[must_use]
    pub fn get(&self, key: SessionKey) -> Option<StoredQuiz> {
        let now = self.clock.now();
        {
            let mut entry = self.entries.get_mut(&key)?;
            if !self.is_expired(&entry, now) {
                entry.touched_at = now;
                return Some(entry.quiz.clone());
            }
        }
        self.entries.remove(&key);
        debug!(%key, "quiz session expired");
        None
    }

    /// True while `key` names a quiz that has not expired.
    #[must_use]
    pub fn contains(&self, key: SessionKey) -> bool {
        let now = self.clock.now();
        self.entries
            .get(&key)
            .is_some_and(|entry| !self.is_expired(&entry, now))
    }

    pub fn remove(&self, key: SessionKey) -> Option<StoredQuiz> {
        self.entries.remove(&key).map(|(_, entry)| entry.quiz)
    }

    /// Drop every expired entry and return how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !self.is_expired(entry, now));
        before.saturating_sub(self.entries.len())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::{QuizBuilder, QuizPhase};
    use rccm_core::model::{Choice, Department, QuestionCount, QuestionId, QuizScope};
    use rccm_core::time::fixed_now;

    fn quiz() -> QuizSession {
        let plan = QuizBuilder::new(
            QuizScope::department(Department::Basic),
            QuestionCount::Ten,
        )
        .with_shuffle(false)
        .build((1..=3).map(QuestionId::basic));
        QuizSession::new(plan, fixed_now()).unwrap()
    }

    #[test]
    fn keys_round_trip_through_text() {
        let key = SessionKey::generate();
        assert_eq!(key.to_string().parse::<SessionKey>().unwrap(), key);
        assert!("not-a-key".parse::<SessionKey>().is_err());
    }

    #[tokio::test]
    async fn handles_share_one_quiz() {
        let store = QuizSessionStore::new(Clock::fixed(fixed_now()), Duration::hours(1));
        let (key, created) = store.create(quiz());
        assert_eq!(created.csrf_token.len(), CSRF_TOKEN_LEN);
        assert!(created.verify_csrf(&created.csrf_token));
        assert!(!created.verify_csrf("forged"));

        {
            let handle = store.get(key).unwrap();
            let mut session = handle.lock().await;
            session
                .submit_answer(Choice::A, Choice::A, fixed_now())
                .unwrap();
        }
        assert_eq!(created.lock().await.phase(), QuizPhase::Feedback);

        assert!(store.contains(key));
        assert!(store.remove(key).is_some());
        assert!(store.get(key).is_none());
        assert!(!store.contains(key));
    }

    #[tokio::test]
    async fn a_second_request_waits_and_sees_the_first_ones_change() {
        let store = QuizSessionStore::new(Clock::fixed(fixed_now()), Duration::hours(1));
        let (key, _) = store.create(quiz());
        let first = store.get(key).unwrap();
        let second = store.get(key).unwrap();

        let held = first.lock().await;
        let waiting = tokio::spawn(async move {
            let mut session = second.lock().await;
            session.submit_answer(Choice::B, Choice::A, fixed_now()).map(|_| ())
        });
        tokio::task::yield_now().await;
        assert!(!waiting.is_finished());
        drop(held);

        // the first request answered nothing, so the second one may
        assert!(waiting.await.unwrap().is_ok());

        let err = first
            .lock()
            .await
            .submit_answer(Choice::C, Choice::A, fixed_now())
            .unwrap_err();
        assert!(matches!(err, crate::QuizError::NotAwaitingAnswer));
    }

    #[test]
    fn idle_entries_expire_and_are_purged() {
        let clock = Clock::fixed(fixed_now());
        let store = QuizSessionStore::new(clock, Duration::seconds(DEFAULT_SESSION_TTL_SECS));
        let (stale, _) = store.create(quiz());

        let mut later = clock;
        later.advance(Duration::seconds(DEFAULT_SESSION_TTL_SECS + 1));
        let store_later = QuizSessionStore {
            clock: later,
            ttl: store.ttl(),
            entries: store.entries.clone(),
        };
        let (fresh, _) = store_later.create(quiz());

        assert_eq!(store_later.len(), 2);
        assert!(!store_later.contains(stale));
        assert_eq!(store_later.purge_expired(), 1);
        assert!(store_later.get(fresh).is_some());
        assert!(store_later.get(stale).is_none());
    }

    #[test]
    fn expired_entries_are_dropped_on_read() {
        let clock = Clock::fixed(fixed_now() - Duration::hours(2));
        let store = QuizSessionStore::new(clock, Duration::hours(1));
        let (key, _) = store.create(quiz());

        let reader = QuizSessionStore {
            clock: Clock::fixed(fixed_now()),
            ttl: store.ttl(),
            entries: store.entries.clone(),
        };
        assert!(reader.get(key).is_none());
        assert!(reader.is_empty());
    }
}
