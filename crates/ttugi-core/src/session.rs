//! Bounded LRU + TTL session store.
//!
//! Holds one [`SessionPreference`] per chat session id. Entries expire after
//! `ttl` of inactivity; once the store is more than half full, every
//! `touch` sweeps expired entries out. When more than `max_sessions` are
//! still live the least recently touched entry is evicted.
//!
//! Thread-safe via `RwLock<HashMap>` for the entries and `AtomicU64` for
//! the LRU access counter. Every time-dependent operation has an `_at`
//! variant taking an explicit `Instant` so eviction is testable without
//! sleeping.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::debug;

use ttugi_types::config::SessionConfig;
use ttugi_types::session::SessionPreference;
use ttugi_types::{Result, TtugiError};

/// Longest accepted session id.
pub const MAX_SESSION_ID_LEN: usize = 128;

/// Session cache interface used by the recommendation facade.
pub trait SessionCache: Send + Sync {
    /// Current preference for `session_id`, if live.
    fn get(&self, session_id: &str) -> Option<SessionPreference>;

    /// Create or refresh a session, apply `update`, and return the result.
    fn touch(
        &self,
        session_id: &str,
        update: &mut dyn FnMut(&mut SessionPreference),
    ) -> Result<SessionPreference>;

    /// Drop every expired session. Returns how many were removed.
    fn evict_expired(&self) -> usize;
}

struct SessionEntry {
    preference: SessionPreference,
    last_seen: Instant,
    /// Monotonic counter value at last touch (for LRU eviction).
    last_access: u64,
}

/// In-memory [`SessionCache`].
pub struct SessionStore {
    entries: RwLock<HashMap<String, SessionEntry>>,
    ttl: Duration,
    max_sessions: usize,
    access_counter: AtomicU64,
}

impl SessionStore {
    pub fn new(config: &SessionConfig) -> Self {
        Self::with_limits(config.max_sessions, Duration::from_secs(config.ttl_secs))
    }

    /// Store with an explicit cap and TTL. A cap of 0 is raised to 1.
    pub fn with_limits(max_sessions: usize, ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            max_sessions: max_sessions.max(1),
            access_counter: AtomicU64::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    /// Number of stored sessions, expired ones included until evicted.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// [`SessionCache::get`] evaluated at `now`.
    pub fn get_at(&self, session_id: &str, now: Instant) -> Option<SessionPreference> {
        let entries = self.entries.read();
        entries
            .get(session_id)
            .filter(|e| !self.is_expired(e, now))
            .map(|e| e.preference.clone())
    }

    /// [`SessionCache::touch`] evaluated at `now`.
    pub fn touch_at(
        &self,
        session_id: &str,
        now: Instant,
        update: &mut dyn FnMut(&mut SessionPreference),
    ) -> Result<SessionPreference> {
        validate_session_id(session_id)?;
        let order = self.access_counter.fetch_add(1, Ordering::Relaxed);

        let mut entries = self.entries.write();
        let entry = entries
            .entry(session_id.to_string())
            .or_insert_with(|| SessionEntry {
                preference: SessionPreference::default(),
                last_seen: now,
                last_access: order,
            });

        if now.saturating_duration_since(entry.last_seen) >= self.ttl {
            debug!(session_id, "session expired, starting fresh");
            entry.preference = SessionPreference::default();
        }
        entry.last_seen = now;
        entry.last_access = order;
        update(&mut entry.preference);
        let snapshot = entry.preference.clone();

        if entries.len() > self.max_sessions / 2 {
            sweep_expired(&mut entries, now, self.ttl);
        }
        while entries.len() > self.max_sessions {
            if !evict_oldest(&mut entries) {
                break;
            }
        }
        Ok(snapshot)
    }

    /// [`SessionCache::evict_expired`] evaluated at `now`.
    pub fn evict_expired_at(&self, now: Instant) -> usize {
        sweep_expired(&mut self.entries.write(), now, self.ttl)
    }

    /// Forget one session.
    pub fn remove(&self, session_id: &str) -> Option<SessionPreference> {
        self.entries.write().remove(session_id).map(|e| e.preference)
    }

    pub fn clear(&self) {
        self.entries.write().clear();
        self.access_counter.store(0, Ordering::Relaxed);
    }

    fn is_expired(&self, entry: &SessionEntry, now: Instant) -> bool {
        now.saturating_duration_since(entry.last_seen) >= self.ttl
    }
}

impl SessionCache for SessionStore {
    fn get(&self, session_id: &str) -> Option<SessionPreference> {
        self.get_at(session_id, Instant::now())
    }

    fn touch(
        &self,
        session_id: &str,
        update: &mut dyn FnMut(&mut SessionPreference),
    ) -> Result<SessionPreference> {
        self.touch_at(session_id, Instant::now(), update)
    }

    fn evict_expired(&self) -> usize {
        self.evict_expired_at(Instant::now())
    }
}

/// Drop entries idle for `ttl` or longer. Returns how many were removed.
fn sweep_expired(entries: &mut HashMap<String, SessionEntry>, now: Instant, ttl: Duration) -> usize {
    let before = entries.len();
    entries.retain(|_, e| now.saturating_duration_since(e.last_seen) < ttl);
    let removed = before - entries.len();
    if removed > 0 {
        debug!(removed, remaining = entries.len(), "evicted expired sessions");
    }
    removed
}

/// Remove the least recently touched entry. Returns false on an empty map.
fn evict_oldest(entries: &mut HashMap<String, SessionEntry>) -> bool {
    let oldest = entries
        .iter()
        .min_by_key(|(_, e)| e.last_access)
        .map(|(k, _)| k.clone());
    match oldest {
        Some(key) => {
            debug!(session_id = %key, "evicting least recently used session");
            entries.remove(&key);
            true
        }
        None => false,
    }
}

/// Session ids are 1-128 characters of ASCII alphanumerics, `-`, `_`, `.`
/// or `:`.
pub fn validate_session_id(session_id: &str) -> Result<()> {
    if session_id.is_empty() {
        return Err(TtugiError::InvalidSession {
            reason: "session id is empty".into(),
        });
    }
    if session_id.len() > MAX_SESSION_ID_LEN {
        return Err(TtugiError::InvalidSession {
            reason: format!("session id longer than {MAX_SESSION_ID_LEN} bytes"),
        });
    }
    if let Some(bad) = session_id
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(*c, '-' | '_' | '.' | ':')))
    {
        return Err(TtugiError::InvalidSession {
            reason: format!("unexpected character {bad:?}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    use ttugi_types::restaurant::Area;

    fn store(max: usize, ttl_secs: u64) -> SessionStore {
        SessionStore::with_limits(max, Duration::from_secs(ttl_secs))
    }

    fn add_area(area: Area) -> impl FnMut(&mut SessionPreference) {
        move |p: &mut SessionPreference| {
            p.areas.push(area);
            p.turns += 1;
        }
    }

    #[test]
    fn touch_creates_and_get_reads() {
        let s = store(10, 60);
        let now = Instant::now();
        assert!(s.get_at("s1", now).is_none());

        let pref = s.touch_at("s1", now, &mut add_area(Area::Haeundae)).unwrap();
        assert_eq!(pref.areas, vec![Area::Haeundae]);
        assert_eq!(s.get_at("s1", now).unwrap().turns, 1);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn updates_accumulate() {
        let s = store(10, 60);
        let now = Instant::now();
        s.touch_at("s1", now, &mut add_area(Area::Seomyeon)).unwrap();
        let pref = s
            .touch_at("s1", now + Duration::from_secs(5), &mut add_area(Area::Nampo))
            .unwrap();
        assert_eq!(pref.areas, vec![Area::Seomyeon, Area::Nampo]);
        assert_eq!(pref.turns, 2);
    }

    #[test]
    fn expired_sessions_are_invisible_and_reset() {
        let s = store(10, 60);
        let t0 = Instant::now();
        s.touch_at("s1", t0, &mut add_area(Area::Haeundae)).unwrap();

        let later = t0 + Duration::from_secs(61);
        assert!(s.get_at("s1", later).is_none());

        let pref = s.touch_at("s1", later, &mut |_| {}).unwrap();
        assert_eq!(pref, SessionPreference::default());
    }

    #[test]
    fn evict_expired_removes_only_stale() {
        let s = store(10, 60);
        let t0 = Instant::now();
        s.touch_at("old", t0, &mut |_| {}).unwrap();
        s.touch_at("fresh", t0 + Duration::from_secs(50), &mut |_| {}).unwrap();

        let removed = s.evict_expired_at(t0 + Duration::from_secs(70));
        assert_eq!(removed, 1);
        assert!(s.get_at("fresh", t0 + Duration::from_secs(70)).is_some());
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn touch_sweeps_expired_sessions_once_half_full() {
        let s = store(4, 60);
        let t0 = Instant::now();
        s.touch_at("a", t0, &mut |_| {}).unwrap();
        s.touch_at("b", t0, &mut |_| {}).unwrap();
        assert_eq!(s.len(), 2);

        // "a" and "b" are stale; the third touch pushes the store past half.
        let later = t0 + Duration::from_secs(90);
        s.touch_at("c", later, &mut |_| {}).unwrap();
        assert_eq!(s.len(), 1);
        assert!(s.get_at("c", later).is_some());
    }

    #[test]
    fn touch_below_half_full_keeps_stale_entries() {
        let s = store(10, 60);
        let t0 = Instant::now();
        s.touch_at("a", t0, &mut |_| {}).unwrap();
        s.touch_at("b", t0 + Duration::from_secs(90), &mut |_| {}).unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s.evict_expired_at(t0 + Duration::from_secs(90)), 1);
    }

    #[test]
    fn evict_expired_through_trait() {
        let s = SessionStore::with_limits(10, Duration::ZERO);
        s.touch("a", &mut |_| {}).unwrap();
        let cache: &dyn SessionCache = &s;
        assert_eq!(cache.evict_expired(), 1);
        assert!(s.is_empty());
    }

    #[test]
    fn lru_eviction_over_cap() {
        let s = store(2, 600);
        let now = Instant::now();
        s.touch_at("a", now, &mut |_| {}).unwrap();
        s.touch_at("b", now, &mut |_| {}).unwrap();
        // Refresh "a" so "b" becomes least recently used.
        s.touch_at("a", now, &mut |_| {}).unwrap();
        s.touch_at("c", now, &mut |_| {}).unwrap();

        assert_eq!(s.len(), 2);
        assert!(s.get_at("a", now).is_some());
        assert!(s.get_at("b", now).is_none());
        assert!(s.get_at("c", now).is_some());
    }

    #[test]
    fn get_does_not_refresh_recency() {
        let s = store(2, 600);
        let now = Instant::now();
        s.touch_at("a", now, &mut |_| {}).unwrap();
        s.touch_at("b", now, &mut |_| {}).unwrap();
        let _ = s.get_at("a", now);
        s.touch_at("c", now, &mut |_| {}).unwrap();
        assert!(s.get_at("a", now).is_none());
    }

    #[test]
    fn zero_cap_is_raised_to_one() {
        let s = store(0, 60);
        assert_eq!(s.max_sessions(), 1);
        let now = Instant::now();
        s.touch_at("a", now, &mut |_| {}).unwrap();
        s.touch_at("b", now, &mut |_| {}).unwrap();
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn rejects_bad_session_ids() {
        let s = store(10, 60);
        assert!(matches!(
            s.touch("", &mut |_| {}),
            Err(TtugiError::InvalidSession { .. })
        ));
        assert!(s.touch("has space", &mut |_| {}).is_err());
        assert!(s.touch(&"x".repeat(MAX_SESSION_ID_LEN + 1), &mut |_| {}).is_err());
        assert!(s.touch("web:user-1_a.b", &mut |_| {}).is_ok());
    }

    #[test]
    fn remove_and_clear() {
        let s = store(10, 60);
        s.touch("a", &mut |_| {}).unwrap();
        s.touch("b", &mut |_| {}).unwrap();
        assert!(s.remove("a").is_some());
        assert!(s.remove("a").is_none());
        s.clear();
        assert!(s.is_empty());
    }

    #[test]
    fn concurrent_touches() {
        let s = Arc::new(store(1_000, 600));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let s = Arc::clone(&s);
                thread::spawn(move || {
                    for _ in 0..50 {
                        s.touch(&format!("s{i}"), &mut |p| p.turns += 1).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(s.len(), 8);
        for i in 0..8 {
            assert_eq!(s.get(&format!("s{i}")).unwrap().turns, 50);
        }
    }
}
