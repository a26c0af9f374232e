use crate::api::EnvConfig;
use crate::pages::NotesScreen;
use crate::state::AppContext;
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub(crate) fn App(config: EnvConfig) -> impl IntoView {
    provide_context(AppContext::new(&config));

    view! {
        <Router>
            <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div> }>
                <Route path=path!("") view=NotesScreen />
            </Routes>
        </Router>
    }
}
