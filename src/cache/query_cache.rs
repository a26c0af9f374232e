use super::query::{QueryKey, QueryResult};
use crate::api::NoteStore;
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use leptos::logging::{log, warn};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Hands a future to the local (single-threaded) executor.
pub(crate) type Spawner = Rc<dyn Fn(LocalBoxFuture<'static, ()>)>;

/// Called with the originating key after every fetch completes.
pub(crate) type Listener = Rc<dyn Fn(&QueryKey)>;

/// Upper bound on stored pages; the least recently read ones go first.
const MAX_ENTRIES: usize = 64;

struct CacheEntry {
    result: QueryResult,
    stale: bool,
    last_used: u64,
}

struct CacheState {
    entries: HashMap<QueryKey, CacheEntry>,
    max_entries: usize,
    clock: u64,

    /// Pending request registry. The flag records an invalidation that happened while
    /// the fetch was in flight; such a result is stored stale.
    in_flight: HashMap<QueryKey, bool>,

    listeners: Vec<Listener>,
}

impl Default for CacheState {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            max_entries: MAX_ENTRIES,
            clock: 0,
            in_flight: HashMap::new(),
            listeners: Vec::new(),
        }
    }
}

impl CacheState {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Drops least recently used entries until the cap holds. `keep` is never dropped.
    fn evict_over_capacity(&mut self, keep: &QueryKey) {
        while self.entries.len() > self.max_entries {
            let oldest = self
                .entries
                .iter()
                .filter(|(k, _)| *k != keep)
                .min_by_key(|(_, e)| e.last_used)
                .map(|(k, _)| k.clone());
            match oldest {
                Some(k) => {
                    self.entries.remove(&k);
                }
                None => break,
            }
        }
    }
}

/// Keyed store of notes pages with staleness and in-flight deduplication.
///
/// Every result is stored under the key that requested it, so replies arriving out of
/// order never overwrite each other.
#[derive(Clone)]
pub(crate) struct QueryCache {
    state: Rc<RefCell<CacheState>>,
    store: Rc<dyn NoteStore>,
    spawner: Spawner,
}

impl QueryCache {
    pub fn new(store: Rc<dyn NoteStore>, spawner: Spawner) -> Self {
        Self {
            state: Rc::new(RefCell::new(CacheState::default())),
            store,
            spawner,
        }
    }

    /// Non-blocking lookup. Starts at most one fetch per key and returns `Pending` until it lands.
    pub fn get(&self, key: &QueryKey) -> QueryResult {
        {
            let mut s = self.state.borrow_mut();
            if s.in_flight.contains_key(key) {
                return QueryResult::Pending;
            }
            let now = s.tick();
            if let Some(entry) = s.entries.get_mut(key) {
                if !entry.stale {
                    entry.last_used = now;
                    return entry.result.clone();
                }
            }
            s.in_flight.insert(key.clone(), false);
        }

        self.spawn_fetch(key.clone());
        QueryResult::Pending
    }

    /// Stored result regardless of staleness. Never fetches.
    pub fn peek(&self, key: &QueryKey) -> Option<QueryResult> {
        self.state
            .borrow()
            .entries
            .get(key)
            .map(|e| e.result.clone())
    }

    #[cfg(test)]
    pub fn is_fetching(&self, key: &QueryKey) -> bool {
        self.state.borrow().in_flight.contains_key(key)
    }

    #[cfg(test)]
    pub fn is_stale(&self, key: &QueryKey) -> bool {
        self.state
            .borrow()
            .entries
            .get(key)
            .is_some_and(|e| e.stale)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.state.borrow().entries.len()
    }

    /// Marks every entry (and every fetch still in flight) as no longer authoritative.
    pub fn invalidate_all(&self) {
        let mut s = self.state.borrow_mut();
        for entry in s.entries.values_mut() {
            entry.stale = true;
        }
        for invalidated in s.in_flight.values_mut() {
            *invalidated = true;
        }
        log!(
            "[notes] cache invalidated ({} cached, {} in flight)",
            s.entries.len(),
            s.in_flight.len()
        );
    }

    pub fn invalidate(&self, key: &QueryKey) {
        let mut s = self.state.borrow_mut();
        if let Some(entry) = s.entries.get_mut(key) {
            entry.stale = true;
        }
        if let Some(invalidated) = s.in_flight.get_mut(key) {
            *invalidated = true;
        }
    }

    pub fn subscribe(&self, listener: Listener) {
        self.state.borrow_mut().listeners.push(listener);
    }

    fn spawn_fetch(&self, key: QueryKey) {
        let store = self.store.clone();
        let state = self.state.clone();

        let fetch = async move {
            let result = match store.list(key.page, key.per_page, &key.search).await {
                Ok(page) => QueryResult::Ready(Rc::new(page)),
                Err(e) => {
                    warn!(
                        "[notes] loading page {} (search {:?}) failed: {}",
                        key.page, key.search, e
                    );
                    QueryResult::Failed(e.to_string())
                }
            };
            Self::complete(&state, key, result);
        };

        (self.spawner)(fetch.boxed_local());
    }

    fn complete(state: &Rc<RefCell<CacheState>>, key: QueryKey, result: QueryResult) {
        let listeners = {
            let mut s = state.borrow_mut();
            let stale = s.in_flight.remove(&key).unwrap_or(false);
            let last_used = s.tick();
            s.entries.insert(
                key.clone(),
                CacheEntry {
                    result,
                    stale,
                    last_used,
                },
            );
            s.evict_over_capacity(&key);
            s.listeners.clone()
        };

        // Listeners may call back into the cache; no borrow is held here.
        for listener in listeners {
            listener(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{local_spawner, note, ScriptedStore};
    use crate::api::ApiError;
    use crate::cache::NOTES_PER_PAGE;
    use crate::models::NoteTag;
    use futures::executor::LocalPool;
    use std::cell::Cell;

    fn thirty_notes() -> Rc<ScriptedStore> {
        ScriptedStore::with_notes(
            (1..=30)
                .map(|i| note(&format!("n{i:02}"), &format!("Note {i:02}"), NoteTag::Work))
                .collect(),
        )
    }

    fn ids(result: &QueryResult) -> Vec<String> {
        result
            .data()
            .map(|p| p.notes.iter().map(|n| n.id.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_duplicate_gets_share_one_fetch() {
        let mut pool = LocalPool::new();
        let store = thirty_notes();
        store.hold_lists(true);
        let cache = QueryCache::new(store.clone(), local_spawner(&pool));
        let key = QueryKey::new(1, "");

        assert!(cache.get(&key).is_pending());
        assert!(cache.get(&key).is_pending());
        pool.run_until_stalled();
        assert!(cache.get(&key).is_pending());
        assert!(cache.is_fetching(&key));
        assert_eq!(store.list_count(), 1);

        assert!(store.release_list(1, ""));
        pool.run_until_stalled();

        let result = cache.get(&key);
        assert_eq!(ids(&result).len(), 12);
        assert_eq!(result.data().map(|p| p.total_pages), Some(3));
        assert_eq!(store.list_count(), 1);
        assert!(!cache.is_fetching(&key));
    }

    #[test]
    fn test_fresh_entry_is_served_without_fetching() {
        let mut pool = LocalPool::new();
        let store = thirty_notes();
        let cache = QueryCache::new(store.clone(), local_spawner(&pool));
        let key = QueryKey::new(2, "");

        cache.get(&key);
        pool.run_until_stalled();

        let result = cache.get(&key);
        assert_eq!(ids(&result).first().map(String::as_str), Some("n13"));
        assert_eq!(store.list_count(), 1);
        assert_eq!(store.list_calls(), vec![(2, NOTES_PER_PAGE, String::new())]);
    }

    #[test]
    fn test_invalidate_all_forces_refetch_of_identical_key() {
        let mut pool = LocalPool::new();
        let store = thirty_notes();
        let cache = QueryCache::new(store.clone(), local_spawner(&pool));
        let first = QueryKey::new(1, "");
        let second = QueryKey::new(2, "");

        cache.get(&first);
        cache.get(&second);
        pool.run_until_stalled();
        assert_eq!(store.list_count(), 2);

        cache.invalidate_all();
        assert!(cache.is_stale(&first));
        assert!(cache.is_stale(&second));
        // Stale data stays readable for placeholders.
        assert!(cache.peek(&first).is_some_and(|r| r.data().is_some()));

        assert!(cache.get(&first).is_pending());
        pool.run_until_stalled();
        assert_eq!(store.list_count(), 3);
        assert!(!cache.is_stale(&first));

        assert!(cache.get(&second).is_pending());
        pool.run_until_stalled();
        assert_eq!(store.list_count(), 4);
    }

    #[test]
    fn test_out_of_order_replies_land_under_their_own_keys() {
        let mut pool = LocalPool::new();
        let store = thirty_notes();
        store.hold_lists(true);
        let cache = QueryCache::new(store.clone(), local_spawner(&pool));
        let page2 = QueryKey::new(2, "");
        let page3 = QueryKey::new(3, "");

        cache.get(&page2);
        cache.get(&page3);
        pool.run_until_stalled();
        assert_eq!(store.list_count(), 2);

        store.release_list(3, "");
        pool.run_until_stalled();
        store.release_list(2, "");
        pool.run_until_stalled();

        let p3 = cache.get(&page3);
        let p2 = cache.get(&page2);
        assert_eq!(ids(&p3), vec!["n25", "n26", "n27", "n28", "n29", "n30"]);
        assert_eq!(ids(&p2).first().map(String::as_str), Some("n13"));
        assert_eq!(store.list_count(), 2);
    }

    #[test]
    fn test_failure_is_terminal_until_invalidated() {
        let mut pool = LocalPool::new();
        let store = thirty_notes();
        store.fail_next_list(ApiError::Transport {
            message: "Network error: connection refused".to_string(),
        });
        let cache = QueryCache::new(store.clone(), local_spawner(&pool));
        let key = QueryKey::new(1, "");

        cache.get(&key);
        pool.run_until_stalled();

        assert_eq!(
            cache.get(&key),
            QueryResult::Failed("Network error: connection refused".to_string())
        );
        pool.run_until_stalled();
        assert_eq!(store.list_count(), 1);

        cache.invalidate(&key);
        assert!(cache.get(&key).is_pending());
        pool.run_until_stalled();
        assert_eq!(ids(&cache.get(&key)).len(), 12);
        assert_eq!(store.list_count(), 2);
    }

    #[test]
    fn test_invalidation_during_flight_stores_result_stale() {
        let mut pool = LocalPool::new();
        let store = thirty_notes();
        store.hold_lists(true);
        let cache = QueryCache::new(store.clone(), local_spawner(&pool));
        let key = QueryKey::new(1, "");

        cache.get(&key);
        pool.run_until_stalled();
        cache.invalidate_all();

        // Still attached to the fetch already in flight.
        assert!(cache.get(&key).is_pending());
        assert_eq!(store.list_count(), 1);

        store.release_list(1, "");
        pool.run_until_stalled();
        assert!(cache.is_stale(&key));

        store.hold_lists(false);
        assert!(cache.get(&key).is_pending());
        pool.run_until_stalled();
        assert_eq!(store.list_count(), 2);
        assert!(!cache.is_stale(&key));
    }

    #[test]
    fn test_listeners_hear_the_originating_key() {
        let mut pool = LocalPool::new();
        let store = thirty_notes();
        let cache = QueryCache::new(store, local_spawner(&pool));
        let heard: Rc<RefCell<Vec<QueryKey>>> = Rc::default();
        let calls = Rc::new(Cell::new(0));

        let heard2 = heard.clone();
        let calls2 = calls.clone();
        cache.subscribe(Rc::new(move |key: &QueryKey| {
            heard2.borrow_mut().push(key.clone());
            calls2.set(calls2.get() + 1);
        }));

        cache.get(&QueryKey::new(1, "note 0"));
        pool.run_until_stalled();

        assert_eq!(calls.get(), 1);
        assert_eq!(heard.borrow().as_slice(), &[QueryKey::new(1, "note 0")]);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_least_recently_used_entry_is_evicted_over_capacity() {
        let mut pool = LocalPool::new();
        let store = thirty_notes();
        let cache = QueryCache::new(store.clone(), local_spawner(&pool));
        cache.state.borrow_mut().max_entries = 2;
        let page1 = QueryKey::new(1, "");
        let page2 = QueryKey::new(2, "");
        let page3 = QueryKey::new(3, "");

        cache.get(&page1);
        pool.run_until_stalled();
        cache.get(&page2);
        pool.run_until_stalled();
        // Reading page 1 again makes page 2 the oldest.
        assert_eq!(ids(&cache.get(&page1)).len(), 12);

        cache.get(&page3);
        pool.run_until_stalled();

        assert_eq!(cache.len(), 2);
        assert!(cache.peek(&page2).is_none());
        assert!(cache.peek(&page1).is_some());
        assert!(cache.peek(&page3).is_some());
        assert_eq!(store.list_count(), 3);

        // An evicted page is simply fetched again.
        assert!(cache.get(&page2).is_pending());
        pool.run_until_stalled();
        assert_eq!(store.list_count(), 4);
        assert_eq!(cache.len(), 2);
    }
}
