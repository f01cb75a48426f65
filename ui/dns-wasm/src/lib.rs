//! PrivateDNS web client.
//!
//! `i18n` and `view` hold the page's text and derived view data and build on
//! any target. The DOM, wallet and contract modules only exist on wasm32.

pub mod i18n;
pub mod view;

#[cfg(target_arch = "wasm32")]
pub mod api;
#[cfg(target_arch = "wasm32")]
pub mod contract;
#[cfg(target_arch = "wasm32")]
pub mod dom;
#[cfg(target_arch = "wasm32")]
pub mod events;
#[cfg(target_arch = "wasm32")]
pub mod records;
#[cfg(target_arch = "wasm32")]
pub mod render;
#[cfg(target_arch = "wasm32")]
pub mod state;
#[cfg(target_arch = "wasm32")]
pub mod wallet;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Runs when the module is instantiated.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let els = dom::Elements::bind()?;
    render::apply_language(&els);
    render::render(&els);
    events::bind_events(&els);

    records::load_records(&els).await;
    Ok(())
}
