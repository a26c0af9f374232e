use crate::api::ApiError;
use crate::components::ui::{
    Alert, AlertDescription, Button, ButtonVariant, FieldError, Input, Label, NativeSelect,
    Spinner, Textarea,
};
use crate::models::{NewNote, NoteTag};
use crate::state::notes_view::MutationError;
use crate::state::AppContext;
use crate::util::alert;
use crate::validation::{FieldErrors, NoteField, NoteRules, NoteValidator};
use leptos::logging::error;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::str::FromStr;
use strum::IntoEnumIterator;

#[derive(Clone, Copy)]
struct Touched {
    title: RwSignal<bool>,
    content: RwSignal<bool>,
    tag: RwSignal<bool>,
}

impl Touched {
    fn new() -> Self {
        Self {
            title: RwSignal::new(false),
            content: RwSignal::new(false),
            tag: RwSignal::new(false),
        }
    }

    fn field(&self, field: NoteField) -> RwSignal<bool> {
        match field {
            NoteField::Title => self.title,
            NoteField::Content => self.content,
            NoteField::Tag => self.tag,
        }
    }

    fn all(&self) {
        self.title.set(true);
        self.content.set(true);
        self.tag.set(true);
    }
}

/// The submit button is live only for a valid draft that is not already being sent.
fn can_submit(submitting: bool, errors: &FieldErrors) -> bool {
    !submitting && errors.is_empty()
}

/// Create-note form. Field errors appear once a field has been touched (blurred or
/// submitted); the modal closes on success.
#[component]
pub fn NoteForm(#[prop(into)] on_close: Callback<()>) -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let submitting = ctx.select(|v| v.is_creating());

    let title = RwSignal::new(String::new());
    let content = RwSignal::new(String::new());
    let tag = RwSignal::new(NoteTag::default());
    let touched = Touched::new();
    let server_error: RwSignal<Option<String>> = RwSignal::new(None);

    let draft = move || NewNote {
        title: title.get(),
        content: content.get(),
        tag: tag.get(),
    };
    let errors = Memo::new(move |_| {
        NoteRules
            .validate(&draft())
            .err()
            .unwrap_or_else(FieldErrors::default)
    });
    let shown_error = move |field: NoteField| {
        Signal::derive(move || {
            if touched.field(field).get() {
                errors.with(|e| e.get(field).map(str::to_string))
            } else {
                None
            }
        })
    };
    let invalid = move |field: NoteField| {
        Signal::derive(move || {
            touched.field(field).get() && errors.with(|e| e.get(field).is_some())
        })
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        touched.all();
        server_error.set(None);

        if !errors.with_untracked(|e| can_submit(submitting.get_untracked(), e)) {
            return;
        }

        let binder = ctx.binder();
        let note = draft();
        spawn_local(async move {
            match binder.on_create_requested(note).await {
                Ok(_) => on_close.run(()),
                // Already rendered next to the fields.
                Err(MutationError::Invalid(_)) => {}
                Err(MutationError::Api(ApiError::Validation { message })) => {
                    server_error.set(Some(message));
                }
                Err(MutationError::Api(e)) => {
                    error!("[notes] error creating note: {}", e);
                    alert(&format!("Failed to create note. {e}"));
                }
            }
        });
    };

    let tag_options: Vec<String> = NoteTag::iter().map(|t| t.to_string()).collect();

    view! {
        <form class="flex flex-col gap-4" on:submit=on_submit>
            <h2 class="text-lg font-semibold">"Create New Note"</h2>

            <div class="flex flex-col gap-2">
                <Label html_for="title">"Title"</Label>
                <Input
                    id="title"
                    name="title"
                    autofocus=true
                    invalid=invalid(NoteField::Title)
                    value=title
                    on_input=move |v: String| title.set(v)
                    on_blur=move |_: ()| touched.title.set(true)
                />
                <FieldError message=shown_error(NoteField::Title) />
            </div>

            <div class="flex flex-col gap-2">
                <Label html_for="content">"Content"</Label>
                <Textarea
                    id="content"
                    name="content"
                    rows=8
                    invalid=invalid(NoteField::Content)
                    value=content
                    on_input=move |v: String| content.set(v)
                    on_blur=move |_: ()| touched.content.set(true)
                />
                <FieldError message=shown_error(NoteField::Content) />
            </div>

            <div class="flex flex-col gap-2">
                <Label html_for="tag">"Tag"</Label>
                <NativeSelect
                    id="tag"
                    name="tag"
                    options=tag_options
                    value=Signal::derive(move || tag.get().to_string())
                    on_change=move |v: String| {
                        touched.tag.set(true);
                        if let Ok(t) = NoteTag::from_str(&v) {
                            tag.set(t);
                        }
                    }
                />
                <FieldError message=shown_error(NoteField::Tag) />
            </div>

            {move || {
                server_error
                    .get()
                    .map(|message| {
                        view! {
                            <Alert class="border-destructive/30">
                                <AlertDescription class="text-destructive">{message}</AlertDescription>
                            </Alert>
                        }
                    })
            }}

            <div class="flex justify-end gap-2">
                <Button
                    variant=ButtonVariant::Outline
                    attr:disabled=move || submitting.get()
                    on:click=move |ev: web_sys::MouseEvent| {
                        ev.prevent_default();
                        on_close.run(());
                    }
                >
                    "Cancel"
                </Button>
                <Button attr:disabled=move || !errors.with(|e| can_submit(submitting.get(), e))>
                    <Show when=move || submitting.get()>
                        <Spinner />
                    </Show>
                    {move || if submitting.get() { "Creating..." } else { "Create note" }}
                </Button>
            </div>
        </form>
    }
}
