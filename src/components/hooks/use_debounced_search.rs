use crate::state::AppContext;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// Feeds raw search keystrokes into the notes binder and settles them after the
/// quiet period.
///
/// One browser timer at a time: every keystroke clears the pending timeout before
/// arming a new one, so only the last edit of a burst reaches the cache.
pub fn use_debounced_search() -> Callback<String> {
    let ctx = expect_context::<AppContext>();
    let timer: StoredValue<Option<i32>> = StoredValue::new(None);

    on_cleanup(move || {
        if let (Some(win), Some(Some(tid))) = (web_sys::window(), timer.try_get_value()) {
            win.clear_timeout_with_handle(tid);
        }
    });

    Callback::new(move |text: String| {
        let binder = ctx.binder();
        let ticket = binder.on_search_input(text);
        let delay_ms = binder.search_delay_ms();

        let Some(win) = web_sys::window() else {
            return;
        };

        if let Some(tid) = timer.get_value() {
            win.clear_timeout_with_handle(tid);
        }

        let cb = wasm_bindgen::closure::Closure::once_into_js(move || {
            binder.on_search_settled(ticket);
        });

        let tid = win
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                cb.as_ref().unchecked_ref(),
                delay_ms as i32,
            )
            .ok();

        timer.set_value(tid);
    })
}
