pub(crate) mod debounce;
pub(crate) mod notes_view;

use crate::api::{ApiClient, EnvConfig, NoteStore};
use crate::cache::Spawner;
use crate::validation::NoteRules;
use futures::future::LocalBoxFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use notes_view::{NotesView, NotesViewBinder};
use std::rc::Rc;

/// App-wide handle to the notes view binder.
///
/// The binder is `!Send` (it owns `Rc` state), so it lives in local storage; a revision
/// counter is bumped on every binder change and is the only thing views subscribe to.
#[derive(Clone, Copy)]
pub(crate) struct AppContext {
    binder: StoredValue<NotesViewBinder, LocalStorage>,
    revision: RwSignal<u64>,
}

impl AppContext {
    pub fn new(config: &EnvConfig) -> Self {
        let store: Rc<dyn NoteStore> = Rc::new(ApiClient::from_config(config));
        let spawner: Spawner = Rc::new(|fut: LocalBoxFuture<'static, ()>| spawn_local(fut));
        let binder = NotesViewBinder::new(store, Rc::new(NoteRules), spawner);

        let revision = RwSignal::new(0u64);
        binder.set_on_change(move || revision.update(|r| *r = r.wrapping_add(1)));

        Self {
            binder: StoredValue::new_local(binder),
            revision,
        }
    }

    pub fn binder(&self) -> NotesViewBinder {
        self.binder.get_value()
    }

    /// Reactive snapshot; re-evaluates whenever the binder reports a change.
    pub fn view(&self) -> NotesView {
        self.revision.track();
        self.binder.with_value(|b| b.snapshot())
    }

    /// Memoized projection of the view; dependents re-run only when `f`'s output changes.
    pub fn select<T>(&self, f: impl Fn(&NotesView) -> T + Send + Sync + 'static) -> Memo<T>
    where
        T: PartialEq + Send + Sync + 'static,
    {
        let ctx = *self;
        Memo::new(move |_| f(&ctx.view()))
    }
}
