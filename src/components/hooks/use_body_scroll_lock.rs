use leptos::prelude::*;

/// Sets `overflow: hidden` on `<body>` while `locked` is true and restores the
/// previous value afterwards (including when the owner is disposed).
pub fn use_body_scroll_lock(locked: Signal<bool>) {
    let saved: StoredValue<Option<String>> = StoredValue::new(None);

    let apply = move |lock: bool| {
        let Some(body) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.body())
        else {
            return;
        };
        let style = body.style();

        if lock {
            if saved.get_value().is_none() {
                let previous = style.get_property_value("overflow").unwrap_or_default();
                saved.set_value(Some(previous));
            }
            let _ = style.set_property("overflow", "hidden");
        } else if let Some(previous) = saved.try_get_value().flatten() {
            let _ = style.set_property("overflow", &previous);
            let _ = saved.try_set_value(None);
        }
    };

    Effect::new(move |_| apply(locked.get()));
    on_cleanup(move || apply(false));
}
