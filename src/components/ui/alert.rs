use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Alert, div, "relative w-full rounded-lg border px-4 py-3 text-sm flex flex-wrap items-center gap-3"}
    clx! {AlertDescription, p, "text-sm leading-relaxed flex-1"}
}

pub use components::*;
