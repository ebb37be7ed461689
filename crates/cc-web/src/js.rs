use js_sys::{Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};

/// Readable form of a thrown JS value.
pub(crate) fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// `target[key]`, or `None` when missing or undefined.
pub(crate) fn property(target: &JsValue, key: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

/// `target[key]` when it is callable.
pub(crate) fn method(target: &JsValue, key: &str) -> Option<Function> {
    property(target, key).and_then(|value| value.dyn_into::<Function>().ok())
}
