use crate::components::ui::{Alert, AlertDescription, Button, ButtonSize, ButtonVariant, Spinner};
use crate::components::{Modal, NoteForm, NoteList, Pagination, SearchBox};
use crate::state::notes_view::ViewStatus;
use crate::state::AppContext;
use leptos::prelude::*;

#[derive(Clone, Debug, PartialEq)]
enum Body {
    Loading,
    Failed(String),
    List,
}

/// Search, pager and "create" toolbar over the current page of notes.
///
/// The toolbar stays mounted while the list below switches between loading, error
/// and data, so typing in the search box is never interrupted.
#[component]
pub fn NotesScreen() -> impl IntoView {
    let ctx = expect_context::<AppContext>();

    let body = ctx.select(|v| match &v.status {
        ViewStatus::Loading => Body::Loading,
        ViewStatus::Failed(reason) => Body::Failed(reason.clone()),
        ViewStatus::Ready | ViewStatus::Refreshing => Body::List,
    });
    let notes = ctx.select(|v| v.notes().to_vec());
    let page = ctx.select(|v| v.page);
    let total_pages = ctx.select(|v| v.total_pages());
    let refreshing = ctx.select(|v| v.is_placeholder());

    let modal_open = RwSignal::new(false);
    let close_modal = Callback::new(move |_: ()| modal_open.set(false));

    let on_page_change = Callback::new(move |p: u32| ctx.binder().on_page_change(p));
    let on_retry = move |_: web_sys::MouseEvent| ctx.binder().retry();

    view! {
        <div class="mx-auto flex max-w-6xl flex-col gap-6 px-4 py-6">
            <header class="flex flex-wrap items-center justify-between gap-3">
                <SearchBox />
                <Pagination total_pages=total_pages current=page on_change=on_page_change />
                <Button on:click=move |_| modal_open.set(true)>"Create note +"</Button>
            </header>

            <main
                class="transition-opacity"
                class:opacity-60=move || refreshing.get()
                aria-busy=move || refreshing.get().then_some("true")
            >
                {move || match body.get() {
                    Body::Loading => {
                        view! {
                            <div class="flex items-center gap-2 py-12 text-sm text-muted-foreground">
                                <Spinner />
                                "Loading notes..."
                            </div>
                        }
                            .into_any()
                    }
                    Body::Failed(reason) => {
                        view! {
                            <Alert class="border-destructive/30">
                                <AlertDescription class="text-destructive">
                                    {format!("Error loading notes: {reason}")}
                                </AlertDescription>
                                <Button
                                    variant=ButtonVariant::Outline
                                    size=ButtonSize::Sm
                                    on:click=on_retry
                                >
                                    "Retry"
                                </Button>
                            </Alert>
                        }
                            .into_any()
                    }
                    Body::List => {
                        view! { <NoteList notes=notes /> }.into_any()
                    }
                }}
            </main>

            <Modal open=modal_open on_close=close_modal>
                <NoteForm on_close=close_modal />
            </Modal>
        </div>
    }
}
