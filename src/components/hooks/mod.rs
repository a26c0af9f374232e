mod use_body_scroll_lock;
mod use_debounced_search;

pub use use_body_scroll_lock::use_body_scroll_lock;
pub use use_debounced_search::use_debounced_search;
