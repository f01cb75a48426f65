//! Event binding. Async handlers are spawned with
//! `wasm_bindgen_futures::spawn_local`.

use crate::dom::Elements;
use crate::i18n::Language;
use crate::{records, render, state, wallet};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, EventTarget};

/// Attach an async click handler that receives a clone of `Elements`.
macro_rules! on_click_async {
    ($el:expr, $els:expr, $handler:expr) => {{
        let els = $els.clone();
        listen(&$el, "click", move |_: web_sys::Event| {
            let els = els.clone();
            wasm_bindgen_futures::spawn_local(async move {
                $handler(&els).await;
            });
        });
    }};
}

/// Attach a sync handler that mutates state and re-renders.
macro_rules! on_event {
    ($el:expr, $kind:expr, $els:expr, $body:block) => {{
        let els = $els.clone();
        listen(&$el, $kind, move |_: web_sys::Event| {
            $body
            render::render(&els);
        });
    }};
}

fn listen<F>(target: &EventTarget, kind: &str, handler: F)
where
    F: FnMut(web_sys::Event) + 'static,
{
    let cb = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
    if let Err(err) = target.add_event_listener_with_callback(kind, cb.as_ref().unchecked_ref()) {
        gloo_console::error!(format!("failed to bind {kind}: {}", crate::api::js_message(err)));
    }
    cb.forget();
}

/// Bind all UI event listeners. Call once after init.
pub fn bind_events(els: &Elements) {
    // Wallet
    on_click_async!(els.connect_btn, els, wallet::on_connect);
    {
        let els2 = els.clone();
        listen(&els.disconnect_btn, "click", move |_| wallet::on_disconnect(&els2));
    }

    // Language
    {
        let els2 = els.clone();
        listen(&els.language_select, "change", move |_| {
            let lang = Language::from_code(&els2.language_select.value());
            state::with_mut(|s| s.language = lang);
            render::apply_language(&els2);
            render::render(&els2);
        });
    }

    // Search and dashboard
    {
        let els2 = els.clone();
        listen(&els.search_input, "input", move |_| {
            let search = els2.search_input.value();
            state::with_mut(|s| s.search = search);
            render::render(&els2);
        });
    }
    on_event!(els.faq_toggle, "click", els, {
        state::with_mut(|s| s.faq_open = !s.faq_open);
    });
    on_click_async!(els.refresh_btn, els, records::on_refresh);

    // Create modal
    on_event!(els.add_record_btn, "click", els, {
        state::with_mut(|s| s.modal_open = true);
    });
    on_event!(els.create_first_btn, "click", els, {
        state::with_mut(|s| s.modal_open = true);
    });
    on_event!(els.cancel_btn, "click", els, {
        state::with_mut(|s| s.modal_open = false);
    });
    {
        let els2 = els.clone();
        listen(&els.domain_input, "input", move |_| {
            let domain = els2.domain_input.value();
            state::with_mut(|s| s.draft.domain = domain);
        });
    }
    {
        let els2 = els.clone();
        listen(&els.ip_input, "input", move |_| {
            let ip_address = els2.ip_input.value();
            state::with_mut(|s| s.draft.ip_address = ip_address);
        });
    }
    on_click_async!(els.submit_btn, els, records::on_submit);

    // Row actions, delegated from the table body
    {
        let els2 = els.clone();
        listen(&els.records_body, "click", move |event| {
            let Some((action, id)) = row_action(&event) else {
                return;
            };
            let els3 = els2.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match action.as_str() {
                    "verify" => records::on_verify(&els3, id).await,
                    "reject" => records::on_reject(&els3, id).await,
                    _ => {}
                }
            });
        });
    }
}

fn row_action(event: &web_sys::Event) -> Option<(String, String)> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    let button = target.closest("button[data-action]").ok()??;
    Some((button.get_attribute("data-action")?, button.get_attribute("data-id")?))
}
