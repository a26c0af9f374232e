use crate::api::{ApiError, NoteStore};
use crate::cache::{QueryCache, QueryKey, QueryResult, Spawner};
use crate::models::{DeletedNote, NewNote, Note, NotesPage};
use crate::state::debounce::{DebounceTicket, Debouncer};
use crate::validation::{FieldErrors, NoteValidator};
use leptos::logging::{error, log};
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum MutationError {
    /// Rejected by the local form rules; nothing was sent.
    #[error("{0}")]
    Invalid(FieldErrors),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// `Idle -> Submitting -> Idle`. Success or failure is handed back to the caller;
/// a failed mutation is retried only by a new user intent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum MutationPhase {
    #[default]
    Idle,
    Submitting,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum ViewStatus {
    /// Nothing to show yet.
    Loading,
    Ready,
    /// The active key is loading; older data is shown in the meantime.
    Refreshing,
    Failed(String),
}

/// Everything the notes page renders, derived from one binder state.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct NotesView {
    pub search_input: String,
    pub search: String,
    pub page: u32,
    pub data: Option<Rc<NotesPage>>,
    pub status: ViewStatus,
    pub create_phase: MutationPhase,
    pub deleting: Vec<String>,
}

impl NotesView {
    pub fn notes(&self) -> &[Note] {
        self.data
            .as_deref()
            .map(|p| p.notes.as_slice())
            .unwrap_or(&[])
    }

    pub fn total_pages(&self) -> u32 {
        self.data.as_ref().map(|p| p.total_pages).unwrap_or(0)
    }

    pub fn is_placeholder(&self) -> bool {
        self.status == ViewStatus::Refreshing
    }

    pub fn is_creating(&self) -> bool {
        self.create_phase == MutationPhase::Submitting
    }

    pub fn delete_phase(&self) -> MutationPhase {
        if self.deleting.is_empty() {
            MutationPhase::Idle
        } else {
            MutationPhase::Submitting
        }
    }
}

#[derive(Default)]
struct ViewState {
    search_input: String,
    search: String,
    page: u32,
    debouncer: Debouncer<String>,

    /// Last key whose data reached the screen; source of placeholder data.
    displayed: Option<QueryKey>,

    creating: u32,
    deleting: Vec<String>,
}

impl ViewState {
    fn active_key(&self) -> QueryKey {
        QueryKey::new(self.page, self.search.clone())
    }
}

type ChangeSlot = Rc<RefCell<Option<Rc<dyn Fn()>>>>;

fn fire(slot: &ChangeSlot) {
    let callback = slot.borrow().clone();
    if let Some(callback) = callback {
        callback();
    }
}

/// Binds page, stabilized search, the query cache and mutation state into a
/// `NotesView`, and turns UI intents into cache lookups and store calls.
#[derive(Clone)]
pub(crate) struct NotesViewBinder {
    state: Rc<RefCell<ViewState>>,
    cache: QueryCache,
    store: Rc<dyn NoteStore>,
    validator: Rc<dyn NoteValidator>,
    on_change: ChangeSlot,
}

impl NotesViewBinder {
    pub fn new(
        store: Rc<dyn NoteStore>,
        validator: Rc<dyn NoteValidator>,
        spawner: Spawner,
    ) -> Self {
        let state = Rc::new(RefCell::new(ViewState {
            page: 1,
            ..Default::default()
        }));
        let on_change: ChangeSlot = Rc::default();
        let cache = QueryCache::new(store.clone(), spawner);

        // Only the key on screen re-renders; other completions just sit in the cache.
        let weak_state = Rc::downgrade(&state);
        let slot = on_change.clone();
        cache.subscribe(Rc::new(move |key: &QueryKey| {
            let Some(state) = weak_state.upgrade() else {
                return;
            };
            let is_active = *key == state.borrow().active_key();
            if is_active {
                fire(&slot);
            }
        }));

        Self {
            state,
            cache,
            store,
            validator,
            on_change,
        }
    }

    /// Registers the render hook, called after any change the view should reflect.
    pub fn set_on_change(&self, callback: impl Fn() + 'static) {
        *self.on_change.borrow_mut() = Some(Rc::new(callback));
    }

    fn notify(&self) {
        fire(&self.on_change);
    }

    pub fn active_key(&self) -> QueryKey {
        self.state.borrow().active_key()
    }

    #[cfg(test)]
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Records a raw keystroke value. The returned ticket must be settled once the
    /// quiet period has elapsed.
    pub fn on_search_input(&self, text: String) -> DebounceTicket {
        let ticket = {
            let mut s = self.state.borrow_mut();
            s.search_input = text.clone();
            s.debouncer.push(text)
        };
        self.notify();
        ticket
    }

    pub fn search_delay_ms(&self) -> u32 {
        self.state.borrow().debouncer.delay_ms()
    }

    /// Applies a stabilized search value. Returns whether the active key changed.
    pub fn on_search_settled(&self, ticket: DebounceTicket) -> bool {
        let key = {
            let mut s = self.state.borrow_mut();
            let Some(text) = s.debouncer.settle(ticket) else {
                return false;
            };
            if text == s.search {
                return false;
            }
            s.search = text;
            s.page = 1;
            s.active_key()
        };

        log!("[notes] search settled on {:?}", key.search);
        self.cache.get(&key);
        self.notify();
        true
    }

    pub fn on_page_change(&self, page: u32) {
        let key = {
            let mut s = self.state.borrow_mut();
            let page = page.max(1);
            if s.page == page {
                return;
            }
            s.page = page;
            s.active_key()
        };

        self.cache.get(&key);
        self.notify();
    }

    /// User-initiated refetch of the active key (e.g. after a failed load).
    pub fn retry(&self) {
        let key = self.active_key();
        self.cache.invalidate(&key);
        self.cache.get(&key);
        self.notify();
    }

    pub async fn on_create_requested(&self, note: NewNote) -> Result<Note, MutationError> {
        self.validator
            .validate(&note)
            .map_err(MutationError::Invalid)?;

        self.state.borrow_mut().creating += 1;
        self.notify();

        let outcome = self.store.create(&note).await;

        {
            let mut s = self.state.borrow_mut();
            s.creating = s.creating.saturating_sub(1);
        }

        match outcome {
            Ok(created) => {
                log!("[notes] created note {}", created.id);
                self.refresh_after_mutation();
                Ok(created)
            }
            Err(e) => {
                error!("[notes] creating note failed: {}", e);
                self.notify();
                Err(e.into())
            }
        }
    }

    pub async fn on_delete_requested(&self, id: String) -> Result<DeletedNote, MutationError> {
        self.state.borrow_mut().deleting.push(id.clone());
        self.notify();

        let outcome = self.store.delete(&id).await;

        {
            let mut s = self.state.borrow_mut();
            if let Some(pos) = s.deleting.iter().position(|d| *d == id) {
                s.deleting.remove(pos);
            }
        }

        match outcome {
            Ok(deleted) => {
                log!("[notes] deleted note {}", deleted.id);
                self.refresh_after_mutation();
                Ok(deleted)
            }
            Err(e) => {
                error!("[notes] deleting note {} failed: {}", id, e);
                self.notify();
                Err(e.into())
            }
        }
    }

    // Blunt on purpose: every cached page may contain (or now miss) the mutated note.
    fn refresh_after_mutation(&self) {
        self.cache.invalidate_all();
        let key = self.active_key();
        self.cache.get(&key);
        self.notify();
    }

    /// Reads the active key through the cache (fetching if needed) and composes the view.
    pub fn snapshot(&self) -> NotesView {
        let key = self.active_key();
        let result = self.cache.get(&key);

        let mut s = self.state.borrow_mut();
        let (data, status) = match result {
            QueryResult::Ready(page) => {
                s.displayed = Some(key);
                (Some(page), ViewStatus::Ready)
            }
            QueryResult::Failed(reason) => (None, ViewStatus::Failed(reason)),
            QueryResult::Pending => {
                let placeholder = self
                    .cache
                    .peek(&key)
                    .and_then(|r| r.data().cloned())
                    .or_else(|| {
                        s.displayed
                            .as_ref()
                            .and_then(|k| self.cache.peek(k))
                            .and_then(|r| r.data().cloned())
                    });
                match placeholder {
                    Some(page) => (Some(page), ViewStatus::Refreshing),
                    None => (None, ViewStatus::Loading),
                }
            }
        };

        NotesView {
            search_input: s.search_input.clone(),
            search: s.search.clone(),
            page: s.page,
            data,
            status,
            create_phase: if s.creating > 0 {
                MutationPhase::Submitting
            } else {
                MutationPhase::Idle
            },
            deleting: s.deleting.clone(),
        }
    }
}
