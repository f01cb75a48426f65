//! Projects [`state::AppState`] and the loaded records onto the page.
//!
//! `render` is idempotent and cheap enough to call after every state change.

use crate::dom::{self, Elements};
use crate::i18n::{Language, Strings};
use crate::state::{self, AppState};
use crate::view::{self, RowView};
use wasm_bindgen::prelude::*;
use web_sys::Element;

pub fn render(els: &Elements) {
    let app = state::snapshot();
    let store = state::store();
    let records = store.records();
    let strings = app.language.strings();

    dom::set_visible(&els.loading_screen, app.loading);
    dom::set_visible(&els.app, !app.loading);

    render_header(els, &app, strings);
    render_dashboard(els, &view::dashboard(&records));

    let caller = state::caller();
    let rows = view::table_rows(&records, &app.search, &caller);
    if let Err(err) = render_rows(els, &rows, app.language) {
        gloo_console::error!(format!("render rows: {}", crate::api::js_message(err)));
    }
    dom::set_visible(&els.empty_state, rows.is_empty());

    dom::set_text(
        &els.refresh_btn,
        if app.refreshing { strings.refreshing } else { strings.refresh },
    );
    els.refresh_btn.set_disabled(app.refreshing);

    render_modal(els, &app, strings);
    render_overlay(els, &app);
    if let Err(err) = render_faq(els, &app, strings) {
        gloo_console::error!(format!("render faq: {}", crate::api::js_message(err)));
    }
}

/// Re-label every `data-i18n` element for the active language.
pub fn apply_language(els: &Elements) {
    let lang = state::language();
    let strings = lang.strings();
    for el in &els.translatable {
        let Some(key) = el.get_attribute("data-i18n") else {
            continue;
        };
        if let Some(text) = strings.lookup(&key) {
            dom::set_text(el, text);
        }
    }
    els.search_input.set_placeholder(strings.search_placeholder);
    els.language_select.set_value(lang.code());
    if let Some(document) = dom::document() {
        if let Some(root) = document.document_element() {
            let _ = root.set_attribute("lang", lang.code());
        }
    }
}

fn render_header(els: &Elements, app: &AppState, strings: &Strings) {
    dom::set_visible(&els.connect_btn, !app.connected);
    dom::set_visible(&els.disconnect_btn, app.connected);
    dom::set_visible(&els.account_label, app.connected);
    if app.connected {
        let label = if app.account.is_empty() {
            String::new()
        } else {
            view::shorten_owner(&app.account)
        };
        dom::set_text(&els.account_label, &label);
    }
    dom::set_text(&els.connect_btn, strings.connect_wallet);
    dom::set_text(&els.disconnect_btn, strings.disconnect);
}

fn render_dashboard(els: &Elements, stats: &pd_api_types::RecordStats) {
    dom::set_text(&els.stat_total, &stats.total.to_string());
    dom::set_text(&els.stat_verified, &stats.verified.to_string());
    dom::set_text(&els.stat_pending, &stats.pending.to_string());
    dom::set_text(&els.stat_rejected, &stats.rejected.to_string());
}

fn render_rows(els: &Elements, rows: &[RowView], lang: Language) -> Result<(), JsValue> {
    let strings = lang.strings();
    dom::clear(&els.records_body);

    for row in rows {
        let tr = dom::create_element("tr")?;
        tr.set_class_name("record-row");
        tr.set_attribute("data-id", &row.id)?;

        tr.append_child(&dom::text_element("td", "domain", &row.domain)?)?;
        tr.append_child(&dom::text_element("td", "owner", &row.owner_short)?)?;
        tr.append_child(&dom::text_element("td", "date", &format_date(row.timestamp, lang))?)?;

        let status = dom::create_element("td")?;
        let badge = dom::text_element(
            "span",
            &format!("status-badge {}", row.status.as_str()),
            view::status_label(lang, row.status),
        )?;
        status.append_child(&badge)?;
        tr.append_child(&status)?;

        let actions = dom::create_element("td")?;
        actions.set_class_name("actions");
        if row.can_act {
            actions.append_child(&action_button("verify", "success", strings.verify, &row.id)?)?;
            actions.append_child(&action_button("reject", "danger", strings.reject, &row.id)?)?;
        }
        tr.append_child(&actions)?;

        els.records_body.append_child(&tr)?;
    }
    Ok(())
}

/// Row buttons carry `data-action`/`data-id`; a single delegated listener on
/// the table body dispatches them.
fn action_button(action: &str, tone: &str, label: &str, id: &str) -> Result<Element, JsValue> {
    let button = dom::text_element("button", &format!("action-btn {tone}"), label)?;
    button.set_attribute("type", "button")?;
    button.set_attribute("data-action", action)?;
    button.set_attribute("data-id", id)?;
    Ok(button)
}

fn render_modal(els: &Elements, app: &AppState, strings: &Strings) {
    dom::set_visible(&els.create_modal, app.modal_open);
    if els.domain_input.value() != app.draft.domain {
        els.domain_input.set_value(&app.draft.domain);
    }
    if els.ip_input.value() != app.draft.ip_address {
        els.ip_input.set_value(&app.draft.ip_address);
    }
    els.submit_btn.set_disabled(app.creating);
    dom::set_text(
        &els.submit_btn,
        if app.creating { strings.submitting } else { strings.submit },
    );
}

fn render_overlay(els: &Elements, app: &AppState) {
    let overlay = &app.overlay;
    dom::set_visible(&els.tx_overlay, overlay.visible);
    els.tx_icon
        .set_class_name(&format!("transaction-icon {}", overlay.phase.css_class()));
    dom::set_text(&els.tx_message, &overlay.message);
}

fn render_faq(els: &Elements, app: &AppState, strings: &Strings) -> Result<(), JsValue> {
    dom::set_text(&els.faq_toggle, if app.faq_open { "▲" } else { "▼" });
    dom::set_visible(&els.faq_list, app.faq_open);
    dom::clear(&els.faq_list);
    if !app.faq_open {
        return Ok(());
    }
    for (question, answer) in strings.faq_items {
        let item = dom::create_element("div")?;
        item.set_class_name("faq-item");
        item.append_child(&dom::text_element("div", "faq-question", &format!("Q: {question}"))?)?;
        item.append_child(&dom::text_element("div", "faq-answer", &format!("A: {answer}"))?)?;
        els.faq_list.append_child(&item)?;
    }
    Ok(())
}

fn format_date(timestamp: u64, lang: Language) -> String {
    let date = js_sys::Date::new(&JsValue::from_f64(timestamp as f64 * 1000.0));
    String::from(date.to_locale_date_string(lang.locale(), &JsValue::UNDEFINED))
}
