mod api;
mod app;
mod cache;
mod components;
mod models;
mod pages;
mod state;
mod util;
mod validation;

use crate::api::EnvConfig;
use crate::app::App;
use leptos::logging::{log, warn};
use leptos::prelude::*;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();

    let config = EnvConfig::new();
    log!("[notehub] API base URL: {}", config.api_url);
    if !config.has_token() {
        warn!("[notehub] no API token configured (window.ENV.NOTEHUB_TOKEN or NOTEHUB_TOKEN at build time); requests will be rejected");
    }

    mount_to_body(move || view! { <App config=config /> });
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use crate::api::{EnvConfig, DEFAULT_API_URL};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_env_config_reads_window_env() {
        let window = web_sys::window().expect("browser window");
        let env = js_sys::Object::new();
        js_sys::Reflect::set(&env, &"API_URL".into(), &"https://example.test/api/".into())
            .expect("set API_URL");
        js_sys::Reflect::set(&env, &"NOTEHUB_TOKEN".into(), &"t1".into()).expect("set token");
        js_sys::Reflect::set(&window, &"ENV".into(), &env).expect("set ENV");

        let config = EnvConfig::new();
        assert_eq!(config.api_url, "https://example.test/api");
        assert_eq!(config.token.as_deref(), Some("t1"));

        js_sys::Reflect::delete_property(&window, &"ENV".into()).expect("remove ENV");
        if option_env!("NOTEHUB_API_URL").is_none() {
            assert_eq!(EnvConfig::new().api_url, DEFAULT_API_URL);
        }
    }
}
