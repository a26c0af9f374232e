use crate::components::ui::{Button, ButtonSize, ButtonVariant};
use crate::models::Note;
use crate::state::notes_view::{MutationError, MutationPhase};
use crate::state::AppContext;
use crate::util::alert;
use leptos::logging::error;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub(crate) fn NoteList(#[prop(into)] notes: Signal<Vec<Note>>) -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let deleting = ctx.select(|v| v.deleting.clone());
    let delete_busy = ctx.select(|v| v.delete_phase() == MutationPhase::Submitting);

    let on_delete = move |id: String| {
        let binder = ctx.binder();
        spawn_local(async move {
            match binder.on_delete_requested(id.clone()).await {
                Ok(_) => {}
                Err(MutationError::Api(e)) => {
                    error!("[notes] error deleting note {}: {}", id, e);
                    alert(&format!("Failed to delete note. {e}"));
                }
                Err(e) => error!("[notes] error deleting note {}: {}", id, e),
            }
        });
    };

    view! {
        <Show
            when=move || !notes.with(Vec::is_empty)
            fallback=|| {
                view! {
                    <p class="py-12 text-center text-sm text-muted-foreground">
                        "No notes found. Create a new one or adjust your search."
                    </p>
                }
            }
        >
            <ul class="grid gap-4 sm:grid-cols-2 lg:grid-cols-3">
                <For each=move || notes.get() key=|note| note.id.clone() let:note>
                    {
                        let id = note.id.clone();
                        let label = {
                            let id = id.clone();
                            move || {
                                if deleting.with(|d| d.contains(&id)) { "Deleting..." } else { "Delete" }
                            }
                        };
                        view! {
                            <li class="flex flex-col gap-3 rounded-xl border bg-card p-4 shadow-sm">
                                <h2 class="font-semibold leading-tight break-words">{note.title}</h2>
                                <p class="flex-1 text-sm text-muted-foreground whitespace-pre-wrap break-words">
                                    {note.content}
                                </p>
                                <div class="flex items-center justify-between">
                                    <span class="rounded-full bg-accent px-2.5 py-0.5 text-xs font-medium">
                                        {note.tag.to_string()}
                                    </span>
                                    <Button
                                        variant=ButtonVariant::Destructive
                                        size=ButtonSize::Sm
                                        attr:disabled=move || delete_busy.get()
                                        on:click=move |_| on_delete(id.clone())
                                    >
                                        {label}
                                    </Button>
                                </div>
                            </li>
                        }
                    }
                </For>
            </ul>
        </Show>
    }
}
