//! EIP-1193 wallet connection via `window.ethereum`.

use crate::api::js_message;
use crate::dom::{self, Elements};
use crate::view::Latch;
use crate::{render, state};
use js_sys::{Array, Function, Promise, Reflect};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

thread_local! {
    static ACCOUNTS_WATCHED: Latch = const { Latch::new() };
}

#[derive(Serialize)]
struct RpcRequest {
    method: &'static str,
}

fn provider() -> Option<JsValue> {
    let window = dom::window()?;
    let value = Reflect::get(&window, &JsValue::from_str("ethereum")).ok()?;
    (!value.is_undefined() && !value.is_null()).then_some(value)
}

fn method(target: &JsValue, name: &str) -> Result<Function, String> {
    Reflect::get(target, &JsValue::from_str(name))
        .map_err(js_message)?
        .dyn_into::<Function>()
        .map_err(|_| format!("wallet provider has no {name}()"))
}

/// Ask the provider for accounts; the first one becomes the active account.
async fn request_accounts(provider: &JsValue) -> Result<String, String> {
    let args = serde_wasm_bindgen::to_value(&RpcRequest {
        method: "eth_requestAccounts",
    })
    .map_err(|e| e.to_string())?;
    let out = method(provider, "request")?
        .call1(provider, &args)
        .map_err(js_message)?;
    let accounts = JsFuture::from(Promise::resolve(&out))
        .await
        .map_err(js_message)?;
    let accounts: Vec<String> = serde_wasm_bindgen::from_value(accounts).map_err(|e| e.to_string())?;
    Ok(accounts.into_iter().next().unwrap_or_default())
}

/// Follow `accountsChanged` so the owner gate tracks the wallet's selection.
/// Registered once per page; reconnects reuse the same listener.
fn watch_accounts(provider: &JsValue, els: &Elements) -> Result<(), String> {
    let els = els.clone();
    let cb = Closure::wrap(Box::new(move |accounts: JsValue| {
        let first = Array::from(&accounts)
            .get(0)
            .as_string()
            .unwrap_or_default();
        state::with_mut(|s| {
            if s.connected {
                s.account = first;
            }
        });
        render::render(&els);
    }) as Box<dyn FnMut(JsValue)>);

    method(provider, "on")?
        .call2(provider, &JsValue::from_str("accountsChanged"), cb.as_ref().unchecked_ref())
        .map_err(js_message)?;
    cb.forget();
    Ok(())
}

pub async fn on_connect(els: &Elements) {
    let strings = state::language().strings();
    let Some(provider) = provider() else {
        dom::alert(strings.connect_failed);
        return;
    };

    match request_accounts(&provider).await {
        Ok(account) => {
            state::set_account(account);
            if ACCOUNTS_WATCHED.with(Latch::claim) {
                if let Err(err) = watch_accounts(&provider, els) {
                    ACCOUNTS_WATCHED.with(Latch::release);
                    gloo_console::warn!(format!("accountsChanged not available: {err}"));
                }
            }
        }
        Err(err) => {
            gloo_console::error!(format!("wallet connect failed: {err}"));
            dom::alert(strings.connect_failed);
        }
    }
    render::render(els);
}

pub fn on_disconnect(els: &Elements) {
    state::disconnect();
    render::render(els);
}
