//! Raw key/value routes mirroring the contract's `isAvailable`, `getData`
//! and `setData`. Values travel base64-encoded.

use axum::{
    Json,
    extract::{Path, State},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use pd_api_types::{
    ContractAvailableResponse, ContractDataResponse, ContractWriteRequest, ContractWriteResponse,
};
use pd_contract_client::ContractGateway;
use tracing::info;

use crate::{AppState, ApiResult, bad_request, internal_error};

pub(crate) async fn contract_available(
    State(state): State<AppState>,
) -> ApiResult<ContractAvailableResponse> {
    let available = state
        .gateway()
        .is_available()
        .await
        .map_err(internal_error)?;
    Ok(Json(ContractAvailableResponse { available }))
}

pub(crate) async fn contract_read(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<ContractDataResponse> {
    if key.trim().is_empty() {
        return Err(bad_request("key is required"));
    }

    let value = state.gateway().get_data(&key).await.map_err(internal_error)?;
    Ok(Json(ContractDataResponse {
        key,
        value: STANDARD.encode(value),
    }))
}

pub(crate) async fn contract_write(
    State(state): State<AppState>,
    Json(request): Json<ContractWriteRequest>,
) -> ApiResult<ContractWriteResponse> {
    if request.key.trim().is_empty() {
        return Err(bad_request("key is required"));
    }

    let value = STANDARD
        .decode(request.value.as_bytes())
        .map_err(|_| bad_request("value must be valid base64"))?;

    let receipt = state
        .gateway()
        .set_data(&request.key, value)
        .await
        .map_err(internal_error)?;
    info!(key = %request.key, tx_hash = %receipt.tx_hash, "contract write");

    Ok(Json(ContractWriteResponse {
        tx_hash: receipt.tx_hash,
    }))
}

#[cfg(test)]
mod tests {
    use crate::tests::{call, test_app};
    use axum::http::StatusCode;
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use serde_json::json;

    #[tokio::test]
    async fn write_then_read_roundtrip() -> anyhow::Result<()> {
        let app = test_app();
        let value = STANDARD.encode(br#"["a","b"]"#);

        let (status, body) = call(
            &app,
            "POST",
            "/contract/data",
            None,
            Some(json!({ "key": "domain_keys", "value": value })),
        )
        .await?;
        assert_eq!(status, StatusCode::OK);
        assert!(body["tx_hash"].as_str().unwrap_or_default().starts_with("0x"));

        let (status, body) = call(&app, "GET", "/contract/data/domain_keys", None, None).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["key"], "domain_keys");
        assert_eq!(body["value"], value);
        Ok(())
    }

    #[tokio::test]
    async fn unwritten_key_reads_empty() -> anyhow::Result<()> {
        let app = test_app();
        let (status, body) = call(&app, "GET", "/contract/data/domain_nothing", None, None).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["value"], "");
        Ok(())
    }

    #[tokio::test]
    async fn write_rejects_non_base64() -> anyhow::Result<()> {
        let app = test_app();
        let (status, body) = call(
            &app,
            "POST",
            "/contract/data",
            None,
            Some(json!({ "key": "domain_x", "value": "%%%" })),
        )
        .await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "value must be valid base64");
        Ok(())
    }

    #[tokio::test]
    async fn available_is_reported() -> anyhow::Result<()> {
        let app = test_app();
        let (status, body) = call(&app, "GET", "/contract/available", None, None).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["available"], true);
        Ok(())
    }
}
