use crate::components::hooks::use_debounced_search;
use crate::components::ui::Input;
use crate::state::AppContext;
use leptos::prelude::*;

/// Shows the raw (not yet stabilized) search text; edits are debounced before they
/// change the query.
#[component]
pub fn SearchBox() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let raw = ctx.select(|v| v.search_input.clone());
    let on_input = use_debounced_search();

    view! {
        <Input
            class="sm:max-w-xs"
            r#type="search"
            placeholder="Search notes"
            attr:aria-label="Search notes"
            value=raw
            on_input=on_input
        />
    }
}
