use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use cc_app::{CopyDeps, CopyEngine};
use cc_core::ports::DomPort;
use cc_core::CopyConfig;

use crate::{WebDom, WebImageFetcher, WebRichClipboard, WebTextClipboard};

thread_local! {
    static ENGINE: RefCell<Option<CopyEngine<WebDom>>> = const { RefCell::new(None) };
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Module entry: installs logging and decorates the page with defaults.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    wasm_logger::init(wasm_logger::Config::new(level));
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "chatcopy loaded");

    launch(CopyConfig::default())
}

/// Restarts the engine with a TOML configuration; missing keys keep defaults.
#[wasm_bindgen(js_name = startWithConfig)]
pub fn start_with_config(config_toml: &str) -> Result<(), JsValue> {
    let value: toml::Value = toml::from_str(config_toml).map_err(to_js)?;
    let config = CopyConfig::from_toml(&value).map_err(|err| to_js(format!("{err:#}")))?;
    stop();
    launch(config)
}

/// Disconnects the observer. Buttons already injected stay functional.
#[wasm_bindgen]
pub fn stop() {
    ENGINE.with(|slot| {
        if let Some(engine) = slot.borrow_mut().take() {
            engine.stop();
        }
    });
}

fn launch(config: CopyConfig) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| to_js("no window"))?;
    let dom = WebDom::from_window().map_err(to_js)?;

    if dom.body().is_none() {
        // Loaded from <head>: wait for the parser to create <body>.
        let document = window.document().ok_or_else(|| to_js("no document"))?;
        let deferred = Closure::once_into_js(move || {
            if let Err(err) = launch(config) {
                tracing::error!(error = ?err, "deferred start failed");
            }
        });
        document.add_event_listener_with_callback("DOMContentLoaded", deferred.unchecked_ref())?;
        return Ok(());
    }

    let deps = CopyDeps {
        rich_clipboard: Rc::new(WebRichClipboard::new(window.clone())),
        text_clipboard: Rc::new(WebTextClipboard::new(window.clone())),
        image_fetcher: Rc::new(WebImageFetcher::new(window)),
    };
    let engine = CopyEngine::new(dom, deps, &config);
    let attached = engine.start().map_err(|err| to_js(format!("{err:#}")))?;
    tracing::info!(attached, "copy engine started");

    ENGINE.with(|slot| {
        if let Some(previous) = slot.borrow_mut().replace(engine) {
            previous.stop();
        }
    });
    Ok(())
}
