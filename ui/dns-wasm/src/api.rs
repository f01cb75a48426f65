//! HTTP client for the dev ledger service.
//!
//! Used by [`crate::contract::BrowserGateway`] when the page has no injected
//! contract binding.

use crate::dom;
use crate::view;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

/// `#baseUrl` when filled in, otherwise the page host on port 8080.
pub fn base_url() -> String {
    let typed = dom::by_id_typed::<web_sys::HtmlInputElement>("baseUrl").map(|input| input.value());
    let location = dom::window().map(|window| window.location());
    let protocol = location.as_ref().and_then(|l| l.protocol().ok());
    let host = location.as_ref().and_then(|l| l.hostname().ok());
    view::ledger_base_url(typed.as_deref(), protocol.as_deref(), host.as_deref())
}

/// Fetch `path` and parse the JSON body. Non-2xx responses surface the
/// service's `error` field when it has one.
pub async fn request(
    path: &str,
    method: &str,
    body: Option<String>,
) -> Result<serde_json::Value, String> {
    let url = format!("{}{}", base_url(), path);

    let opts = RequestInit::new();
    opts.set_method(method);
    opts.set_mode(RequestMode::Cors);

    let headers = Headers::new().map_err(js_message)?;
    if let Some(body) = &body {
        headers
            .set("Content-Type", "application/json")
            .map_err(js_message)?;
        opts.set_body(&JsValue::from_str(body));
    }
    opts.set_headers(&headers);

    let request = Request::new_with_str_and_init(&url, &opts).map_err(js_message)?;
    let window = dom::window().ok_or_else(|| "no window".to_string())?;
    let response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| format!("fetch error: {}", js_message(e)))?;
    let response: Response = response
        .dyn_into()
        .map_err(|_| "response is not a Response".to_string())?;

    let text = JsFuture::from(response.text().map_err(js_message)?)
        .await
        .map_err(js_message)?
        .as_string()
        .unwrap_or_default();

    if !response.ok() {
        let detail = serde_json::from_str::<serde_json::Value>(&text)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_owned))
            .unwrap_or(text);
        return Err(format!("{} {}: {}", response.status(), response.status_text(), detail));
    }

    serde_json::from_str(&text).map_err(|e| format!("JSON parse error: {}", e))
}

/// Best-effort text for a thrown JS value.
pub fn js_message(value: JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    if let Some(text) = value.as_string() {
        return text;
    }
    js_sys::Reflect::get(&value, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}
