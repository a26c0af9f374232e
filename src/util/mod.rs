use leptos::logging::warn;

/// Blocking browser alert. Falls back to a console warning when there is no window.
pub(crate) fn alert(message: &str) {
    match web_sys::window() {
        Some(win) => {
            let _ = win.alert_with_message(message);
        }
        None => warn!("{}", message),
    }
}
