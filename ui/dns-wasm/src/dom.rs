//! DOM element bindings.
//!
//! Every element the page needs is resolved once at startup. Table rows are
//! rebuilt from text nodes on each render, never from HTML strings.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlButtonElement, HtmlInputElement, HtmlSelectElement};

pub fn window() -> Option<web_sys::Window> {
    web_sys::window()
}

pub fn document() -> Option<Document> {
    window()?.document()
}

pub fn by_id(id: &str) -> Option<Element> {
    document()?.get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|el| el.dyn_into::<T>().ok())
}

pub fn query_all(selector: &str) -> Vec<Element> {
    let Some(list) = document().and_then(|doc| doc.query_selector_all(selector).ok()) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn create_element(tag: &str) -> Result<Element, JsValue> {
    document()
        .ok_or_else(|| JsValue::from_str("no document"))?
        .create_element(tag)
}

/// `<tag class="...">text</tag>`
pub fn text_element(tag: &str, class: &str, text: &str) -> Result<Element, JsValue> {
    let el = create_element(tag)?;
    if !class.is_empty() {
        el.set_class_name(class);
    }
    el.set_text_content(Some(text));
    Ok(el)
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn clear(el: &Element) {
    el.set_text_content(None);
}

pub fn toggle_class(el: &Element, cls: &str, force: bool) {
    let _ = el.class_list().toggle_with_force(cls, force);
}

/// Show or hide via the `hidden` class.
pub fn set_visible(el: &Element, visible: bool) {
    toggle_class(el, "hidden", !visible);
}

pub fn alert(message: &str) {
    if let Some(window) = window() {
        let _ = window.alert_with_message(message);
    }
}

#[derive(Clone)]
pub struct Elements {
    pub loading_screen: Element,
    pub app: Element,

    // Header
    pub search_input: HtmlInputElement,
    pub add_record_btn: HtmlButtonElement,
    pub language_select: HtmlSelectElement,
    pub connect_btn: HtmlButtonElement,
    pub disconnect_btn: HtmlButtonElement,
    pub account_label: Element,

    // Dashboard
    pub stat_total: Element,
    pub stat_verified: Element,
    pub stat_pending: Element,
    pub stat_rejected: Element,
    pub faq_toggle: HtmlButtonElement,
    pub faq_list: Element,

    // Records
    pub refresh_btn: HtmlButtonElement,
    pub records_body: Element,
    pub empty_state: Element,
    pub create_first_btn: HtmlButtonElement,

    // Create modal
    pub create_modal: Element,
    pub domain_input: HtmlInputElement,
    pub ip_input: HtmlInputElement,
    pub submit_btn: HtmlButtonElement,
    pub cancel_btn: HtmlButtonElement,

    // Transaction overlay
    pub tx_overlay: Element,
    pub tx_icon: Element,
    pub tx_message: Element,

    pub translatable: Vec<Element>,
}

macro_rules! get_el {
    ($id:expr) => {
        by_id($id).ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

macro_rules! get_typed {
    ($ty:ty, $id:expr) => {
        by_id_typed::<$ty>($id).ok_or_else(|| {
            JsValue::from_str(&format!("missing {} #{}", stringify!($ty), $id))
        })?
    };
}

impl Elements {
    /// Resolve all DOM references. Call once after the document has loaded.
    pub fn bind() -> Result<Elements, JsValue> {
        Ok(Elements {
            loading_screen: get_el!("loadingScreen"),
            app: get_el!("app"),

            search_input: get_typed!(HtmlInputElement, "searchInput"),
            add_record_btn: get_typed!(HtmlButtonElement, "addRecordBtn"),
            language_select: get_typed!(HtmlSelectElement, "languageSelect"),
            connect_btn: get_typed!(HtmlButtonElement, "connectBtn"),
            disconnect_btn: get_typed!(HtmlButtonElement, "disconnectBtn"),
            account_label: get_el!("accountLabel"),

            stat_total: get_el!("statTotal"),
            stat_verified: get_el!("statVerified"),
            stat_pending: get_el!("statPending"),
            stat_rejected: get_el!("statRejected"),
            faq_toggle: get_typed!(HtmlButtonElement, "faqToggle"),
            faq_list: get_el!("faqList"),

            refresh_btn: get_typed!(HtmlButtonElement, "refreshBtn"),
            records_body: get_el!("recordsBody"),
            empty_state: get_el!("emptyState"),
            create_first_btn: get_typed!(HtmlButtonElement, "createFirstBtn"),

            create_modal: get_el!("createModal"),
            domain_input: get_typed!(HtmlInputElement, "domainInput"),
            ip_input: get_typed!(HtmlInputElement, "ipInput"),
            submit_btn: get_typed!(HtmlButtonElement, "submitBtn"),
            cancel_btn: get_typed!(HtmlButtonElement, "cancelBtn"),

            tx_overlay: get_el!("txOverlay"),
            tx_icon: get_el!("txIcon"),
            tx_message: get_el!("txMessage"),

            translatable: query_all("[data-i18n]"),
        })
    }
}
