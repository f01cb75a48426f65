//! Browser-side [`ContractGateway`].
//!
//! When the page exposes `window.privateDnsContract` (an object with
//! `isAvailable`, `getData` and `setData` returning promises), calls go to it.
//! Otherwise the dev ledger service is used over HTTP.

use crate::api;
use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use js_sys::{Array, Function, Promise, Reflect, Uint8Array};
use pd_api_types::{ContractAvailableResponse, ContractDataResponse, ContractWriteRequest, ContractWriteResponse};
use pd_contract_client::{ContractGateway, TxReceipt};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

const BINDING: &str = "privateDnsContract";

/// Stateless; the binding is looked up on every call so a late-injected
/// contract is picked up.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserGateway;

#[async_trait(?Send)]
impl ContractGateway for BrowserGateway {
    async fn is_available(&self) -> Result<bool> {
        if let Some(binding) = binding() {
            let out = invoke(&binding, "isAvailable", &Array::new()).await?;
            return Ok(out.as_bool().unwrap_or(false));
        }

        let value = api::request("/contract/available", "GET", None)
            .await
            .map_err(|e| anyhow!(e))?;
        let response: ContractAvailableResponse = serde_json::from_value(value)?;
        Ok(response.available)
    }

    async fn get_data(&self, key: &str) -> Result<Vec<u8>> {
        if let Some(binding) = binding() {
            let out = invoke(&binding, "getData", &Array::of1(&JsValue::from_str(key))).await?;
            return bytes_from_js(&out);
        }

        let path = format!("/contract/data/{}", String::from(js_sys::encode_uri_component(key)));
        let value = api::request(&path, "GET", None)
            .await
            .map_err(|e| anyhow!(e))?;
        let response: ContractDataResponse = serde_json::from_value(value)?;
        Ok(STANDARD.decode(response.value.as_bytes())?)
    }

    async fn set_data(&self, key: &str, value: Vec<u8>) -> Result<TxReceipt> {
        if let Some(binding) = binding() {
            let bytes = Uint8Array::from(value.as_slice());
            let args = Array::of2(&JsValue::from_str(key), &bytes);
            let out = invoke(&binding, "setData", &args).await?;
            return Ok(TxReceipt {
                tx_hash: tx_hash_from_js(&out),
            });
        }

        let body = serde_json::to_string(&ContractWriteRequest {
            key: key.to_owned(),
            value: STANDARD.encode(value),
        })?;
        let value = api::request("/contract/data", "POST", Some(body))
            .await
            .map_err(|e| anyhow!(e))?;
        let response: ContractWriteResponse = serde_json::from_value(value)?;
        Ok(TxReceipt {
            tx_hash: response.tx_hash,
        })
    }
}

fn binding() -> Option<JsValue> {
    let window = web_sys::window()?;
    let value = Reflect::get(&window, &JsValue::from_str(BINDING)).ok()?;
    if value.is_undefined() || value.is_null() {
        None
    } else {
        Some(value)
    }
}

/// Call `target[method](...args)` and await the result, promise or not.
async fn invoke(target: &JsValue, method: &str, args: &Array) -> Result<JsValue> {
    let func: Function = Reflect::get(target, &JsValue::from_str(method))
        .map_err(|e| anyhow!(api::js_message(e)))?
        .dyn_into()
        .map_err(|_| anyhow!("contract binding has no {method}()"))?;
    let out = func
        .apply(target, args)
        .map_err(|e| anyhow!(api::js_message(e)))?;
    JsFuture::from(Promise::resolve(&out))
        .await
        .map_err(|e| anyhow!(api::js_message(e)))
}

/// `getData` may hand back a `Uint8Array`, a `0x` hex string (ethers'
/// `BytesLike`) or plain text.
fn bytes_from_js(value: &JsValue) -> Result<Vec<u8>> {
    if value.is_undefined() || value.is_null() {
        return Ok(Vec::new());
    }
    if let Some(array) = value.dyn_ref::<Uint8Array>() {
        return Ok(array.to_vec());
    }
    match value.as_string() {
        Some(text) => match text.strip_prefix("0x") {
            Some(hex) => decode_hex(hex),
            None => Ok(text.into_bytes()),
        },
        None => bail!("unsupported getData result"),
    }
}

fn tx_hash_from_js(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    Reflect::get(value, &JsValue::from_str("hash"))
        .ok()
        .and_then(|hash| hash.as_string())
        .unwrap_or_default()
}

fn decode_hex(hex: &str) -> Result<Vec<u8>> {
    if hex.len() % 2 != 0 {
        bail!("odd-length hex data");
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            hex.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| anyhow!("invalid hex data"))
        })
        .collect()
}
