use crate::report::GeneratedContent;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionStatus {
    Unrequested,
    InFlight,
    Resolved,
    Failed,
}

#[derive(Debug, Default)]
struct Inner {
    cache: HashMap<String, Arc<GeneratedContent>>,
    in_flight: HashSet<String>,
    failures: HashMap<String, Arc<GeneratedContent>>,
}

/// Session-wide section cache and in-flight set.
///
/// Cache entries are written once and never replaced. Only the fetch coordinator
/// mutates this state, through [`InFlightGuard`]; views read it.
#[derive(Debug, Default)]
pub struct SessionState {
    inner: Mutex<Inner>,
}

impl SessionState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Marks `id` in flight unless it is already cached or in flight.
    pub fn try_begin(self: &Arc<Self>, id: &str) -> Option<InFlightGuard> {
        let mut inner = self.lock();
        if inner.cache.contains_key(id) || inner.in_flight.contains(id) {
            return None;
        }
        inner.in_flight.insert(id.to_string());
        Some(InFlightGuard {
            state: Arc::clone(self),
            id: id.to_string(),
        })
    }

    pub fn get(&self, id: &str) -> Option<Arc<GeneratedContent>> {
        self.lock().cache.get(id).cloned()
    }

    /// Error notice from the most recent failed attempt, if the section is unresolved.
    pub fn failure(&self, id: &str) -> Option<Arc<GeneratedContent>> {
        self.lock().failures.get(id).cloned()
    }

    pub fn status(&self, id: &str) -> SectionStatus {
        let inner = self.lock();
        if inner.cache.contains_key(id) {
            SectionStatus::Resolved
        } else if inner.in_flight.contains(id) {
            SectionStatus::InFlight
        } else if inner.failures.contains_key(id) {
            SectionStatus::Failed
        } else {
            SectionStatus::Unrequested
        }
    }

    pub fn resolved_count(&self) -> usize {
        self.lock().cache.len()
    }

    pub fn in_flight_count(&self) -> usize {
        self.lock().in_flight.len()
    }
}

/// Ownership of one in-flight marker. Dropping the guard clears the marker,
/// whether or not a result was recorded.
#[derive(Debug)]
pub struct InFlightGuard {
    state: Arc<SessionState>,
    id: String,
}

impl InFlightGuard {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn resolve(self, content: GeneratedContent) {
        let mut inner = self.state.lock();
        inner.failures.remove(&self.id);
        inner
            .cache
            .entry(self.id.clone())
            .or_insert_with(|| Arc::new(content));
    }

    pub fn fail(self, notice: GeneratedContent) {
        let mut inner = self.state.lock();
        if !inner.cache.contains_key(&self.id) {
            inner.failures.insert(self.id.clone(), Arc::new(notice));
        }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.state.lock().in_flight.remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_begin_is_refused_while_in_flight() {
        let state = SessionState::new();
        let guard = state.try_begin("intro").expect("first begin succeeds");
        assert_eq!(state.status("intro"), SectionStatus::InFlight);
        assert!(state.try_begin("intro").is_none());
        drop(guard);
        assert_eq!(state.status("intro"), SectionStatus::Unrequested);
    }

    #[test]
    fn resolved_section_is_terminal() {
        let state = SessionState::new();
        state
            .try_begin("intro")
            .expect("begin")
            .resolve(GeneratedContent::from_markdown("first"));

        assert_eq!(state.status("intro"), SectionStatus::Resolved);
        assert!(state.try_begin("intro").is_none());
        assert_eq!(state.in_flight_count(), 0);
        assert_eq!(
            state.get("intro").map(|content| content.markdown.clone()),
            Some("first".to_string())
        );
    }

    #[test]
    fn failed_section_can_be_retried_and_then_resolved() {
        let state = SessionState::new();
        let mut notice = GeneratedContent::from_markdown("## failed");
        notice.fallback = true;
        state.try_begin("policy").expect("begin").fail(notice);

        assert_eq!(state.status("policy"), SectionStatus::Failed);
        assert!(state.failure("policy").is_some());
        assert!(state.get("policy").is_none());

        let retry = state.try_begin("policy").expect("failed sections are retryable");
        assert_eq!(state.status("policy"), SectionStatus::InFlight);
        retry.resolve(GeneratedContent::from_markdown("ok"));

        assert_eq!(state.status("policy"), SectionStatus::Resolved);
        assert!(state.failure("policy").is_none());
        assert_eq!(state.resolved_count(), 1);
    }
}
