//! In-memory `NoteStore` for driving the cache and binder in tests.

use super::{ApiError, ApiResult, NoteStore};
use crate::cache::Spawner;
use crate::models::{DeletedNote, NewNote, Note, NoteTag, NotesPage};
use async_trait::async_trait;
use futures::channel::oneshot;
use futures::executor::LocalPool;
use futures::future::LocalBoxFuture;
use futures::task::LocalSpawnExt;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

pub(crate) fn note(id: &str, title: &str, tag: NoteTag) -> Note {
    Note {
        id: id.to_string(),
        title: title.to_string(),
        content: String::new(),
        tag,
        created_at: None,
        updated_at: None,
    }
}

/// Spawner that queues tasks on `pool`; they only run when the test drives the pool.
pub(crate) fn local_spawner(pool: &LocalPool) -> Spawner {
    let spawner = pool.spawner();
    Rc::new(move |fut: LocalBoxFuture<'static, ()>| {
        spawner
            .spawn_local(fut)
            .expect("local pool should accept tasks");
    })
}

#[derive(Default)]
struct ScriptState {
    notes: Vec<Note>,
    next_id: u32,

    hold_lists: bool,
    held: Vec<((u32, String), oneshot::Sender<()>)>,
    hold_creates: bool,
    held_creates: Vec<oneshot::Sender<()>>,

    list_calls: Vec<(u32, u32, String)>,
    create_calls: Vec<NewNote>,
    delete_calls: Vec<String>,

    list_failures: VecDeque<ApiError>,
    create_failures: VecDeque<ApiError>,
    delete_failures: VecDeque<ApiError>,
}

impl ScriptState {
    fn page_of(&self, page: u32, per_page: u32, search: &str) -> NotesPage {
        let needle = search.to_lowercase();
        let matching: Vec<&Note> = self
            .notes
            .iter()
            .filter(|n| needle.is_empty() || n.title.to_lowercase().contains(&needle))
            .collect();

        let per_page = per_page.max(1) as usize;
        let skip = (page.max(1) as usize - 1) * per_page;

        NotesPage {
            notes: matching.iter().skip(skip).take(per_page).map(|n| (*n).clone()).collect(),
            total_pages: matching.len().div_ceil(per_page) as u32,
            total_notes: Some(matching.len() as u32),
            current_page: Some(page),
        }
    }
}

/// A fake NoteHub: keeps notes in memory, records every call, and can hold list and
/// create responses until the test releases them (slow or out-of-order replies).
#[derive(Default)]
pub(crate) struct ScriptedStore {
    inner: RefCell<ScriptState>,
}

impl ScriptedStore {
    pub fn with_notes(notes: Vec<Note>) -> Rc<Self> {
        let store = Self::default();
        store.inner.borrow_mut().notes = notes;
        Rc::new(store)
    }

    pub fn hold_lists(&self, hold: bool) {
        self.inner.borrow_mut().hold_lists = hold;
    }

    /// Lets the oldest held list call for `(page, search)` complete.
    pub fn release_list(&self, page: u32, search: &str) -> bool {
        let mut s = self.inner.borrow_mut();
        let Some(pos) = s
            .held
            .iter()
            .position(|((p, q), _)| *p == page && q == search)
        else {
            return false;
        };
        let (_, tx) = s.held.remove(pos);
        tx.send(()).is_ok()
    }

    pub fn release_all(&self) {
        let held = std::mem::take(&mut self.inner.borrow_mut().held);
        for (_, tx) in held {
            let _ = tx.send(());
        }
    }

    pub fn hold_creates(&self, hold: bool) {
        self.inner.borrow_mut().hold_creates = hold;
    }

    pub fn release_creates(&self) {
        let held = std::mem::take(&mut self.inner.borrow_mut().held_creates);
        for tx in held {
            let _ = tx.send(());
        }
    }

    pub fn fail_next_list(&self, e: ApiError) {
        self.inner.borrow_mut().list_failures.push_back(e);
    }

    pub fn fail_next_create(&self, e: ApiError) {
        self.inner.borrow_mut().create_failures.push_back(e);
    }

    pub fn fail_next_delete(&self, e: ApiError) {
        self.inner.borrow_mut().delete_failures.push_back(e);
    }

    pub fn list_calls(&self) -> Vec<(u32, u32, String)> {
        self.inner.borrow().list_calls.clone()
    }

    pub fn list_count(&self) -> usize {
        self.inner.borrow().list_calls.len()
    }

    pub fn create_count(&self) -> usize {
        self.inner.borrow().create_calls.len()
    }

    pub fn delete_count(&self) -> usize {
        self.inner.borrow().delete_calls.len()
    }
}

#[async_trait(?Send)]
impl NoteStore for ScriptedStore {
    async fn list(&self, page: u32, per_page: u32, search: &str) -> ApiResult<NotesPage> {
        let gate = {
            let mut s = self.inner.borrow_mut();
            s.list_calls.push((page, per_page, search.to_string()));
            if s.hold_lists {
                let (tx, rx) = oneshot::channel();
                s.held.push(((page, search.to_string()), tx));
                Some(rx)
            } else {
                None
            }
        };

        if let Some(rx) = gate {
            let _ = rx.await;
        }

        let mut s = self.inner.borrow_mut();
        if let Some(e) = s.list_failures.pop_front() {
            return Err(e);
        }
        Ok(s.page_of(page, per_page, search))
    }

    async fn create(&self, note: &NewNote) -> ApiResult<Note> {
        let gate = {
            let mut s = self.inner.borrow_mut();
            s.create_calls.push(note.clone());
            if s.hold_creates {
                let (tx, rx) = oneshot::channel();
                s.held_creates.push(tx);
                Some(rx)
            } else {
                None
            }
        };

        if let Some(rx) = gate {
            let _ = rx.await;
        }

        let mut s = self.inner.borrow_mut();
        if let Some(e) = s.create_failures.pop_front() {
            return Err(e);
        }

        s.next_id += 1;
        let created = Note {
            id: format!("created-{}", s.next_id),
            title: note.title.clone(),
            content: note.content.clone(),
            tag: note.tag,
            created_at: None,
            updated_at: None,
        };
        s.notes.insert(0, created.clone());
        Ok(created)
    }

    async fn delete(&self, id: &str) -> ApiResult<DeletedNote> {
        let mut s = self.inner.borrow_mut();
        s.delete_calls.push(id.to_string());
        if let Some(e) = s.delete_failures.pop_front() {
            return Err(e);
        }

        let before = s.notes.len();
        s.notes.retain(|n| n.id != id);
        if s.notes.len() == before {
            return Err(ApiError::NotFound { id: id.to_string() });
        }
        Ok(DeletedNote { id: id.to_string() })
    }
}
