use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use pd_api_types::{DomainRecord, RecordListResponse, RecordStats, RecordSubmitRequest, WalletAddress};
use pd_crypto::RecordStamp;
use pd_record_store::{StoreError, filter_records};
use serde::Deserialize;
use tracing::warn;

use crate::{AppState, ApiResult, ErrorResponse, error_response, internal_error, unauthorized};

#[derive(Debug, Deserialize)]
pub(crate) struct RecordListQuery {
    search: Option<String>,
}

/// Reloads from the contract on every call, then filters. Stats cover the
/// whole list, not the filtered view.
pub(crate) async fn list_records(
    State(state): State<AppState>,
    Query(query): Query<RecordListQuery>,
) -> ApiResult<RecordListResponse> {
    let all = state.store.load_records().await;
    let stats = RecordStats::tally(&all);
    let records = match query.search.as_deref() {
        Some(search) => filter_records(&all, search),
        None => all,
    };

    Ok(Json(RecordListResponse { records, stats }))
}

pub(crate) async fn submit_record(
    State(state): State<AppState>,
    Json(request): Json<RecordSubmitRequest>,
) -> ApiResult<DomainRecord> {
    let stamp = RecordStamp::now().map_err(internal_error)?;
    let owner = WalletAddress(request.owner);

    let record = state
        .store
        .submit_record(&owner, &request.domain, &request.ip_address, stamp)
        .await
        .map_err(store_error)?;

    Ok(Json(record))
}

pub(crate) async fn verify_record(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<DomainRecord> {
    let caller = require_owner(&state, &headers, &id).await?;
    let record = state
        .store
        .verify_record(&caller, &id)
        .await
        .map_err(store_error)?;
    Ok(Json(record))
}

pub(crate) async fn reject_record(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<DomainRecord> {
    let caller = require_owner(&state, &headers, &id).await?;
    let record = state
        .store
        .reject_record(&caller, &id)
        .await
        .map_err(store_error)?;
    Ok(Json(record))
}

/// The contract itself has no access control; the service enforces the
/// owner gate the web client only applies in its view.
async fn require_owner(
    state: &AppState,
    headers: &HeaderMap,
    id: &str,
) -> Result<WalletAddress, (StatusCode, Json<ErrorResponse>)> {
    let caller = headers
        .get("x-wallet-address")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| WalletAddress(value.to_owned()))
        .ok_or_else(|| unauthorized("missing x-wallet-address header"))?;

    let records = state.store.load_records().await;
    let Some(record) = records.iter().find(|record| record.id == id) else {
        return Err(error_response(StatusCode::NOT_FOUND, "Record not found"));
    };

    if !caller.matches(&record.owner) {
        warn!(id, caller = %caller.0, "status change refused for non-owner");
        return Err(error_response(
            StatusCode::FORBIDDEN,
            "only the record owner can change its status",
        ));
    }

    Ok(caller)
}

fn store_error(err: StoreError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &err {
        StoreError::NotConnected => StatusCode::UNAUTHORIZED,
        StoreError::InvalidInput(_) | StoreError::Seal(_) => StatusCode::BAD_REQUEST,
        StoreError::RecordNotFound { .. } => StatusCode::NOT_FOUND,
        StoreError::InvalidTransition { .. } => StatusCode::CONFLICT,
        StoreError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        StoreError::Gateway(_) => StatusCode::BAD_GATEWAY,
    };
    if status.is_server_error() {
        warn!("record operation failed: {err}");
    }
    error_response(status, &err.to_string())
}

#[cfg(test)]
mod tests {
    use crate::tests::{OWNER, call, test_app};
    use axum::http::StatusCode;
    use pd_crypto::seal_ip;
    use serde_json::json;

    const STRANGER: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

    async fn submit(app: &axum::Router, domain: &str) -> anyhow::Result<String> {
        let (status, body) = call(
            app,
            "POST",
            "/records",
            None,
            Some(json!({ "owner": OWNER, "domain": domain, "ip_address": "192.168.1.1" })),
        )
        .await?;
        assert_eq!(status, StatusCode::OK);
        Ok(body["id"].as_str().unwrap_or_default().to_owned())
    }

    #[tokio::test]
    async fn submit_then_list_with_search() -> anyhow::Result<()> {
        let app = test_app();
        let first = submit(&app, "Example.com").await?;
        submit(&app, "other.org").await?;

        let (status, body) = call(&app, "GET", "/records?search=EXAMPLE", None, None).await?;
        assert_eq!(status, StatusCode::OK);
        let records = body["records"].as_array().cloned().unwrap_or_default();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["id"], first.as_str());
        assert_eq!(records[0]["encryptedIp"], seal_ip("192.168.1.1"));
        assert_eq!(records[0]["status"], "pending");
        assert_eq!(body["stats"]["total"], 2);
        assert_eq!(body["stats"]["pending"], 2);
        Ok(())
    }

    #[tokio::test]
    async fn submit_without_owner_is_unauthorized() -> anyhow::Result<()> {
        let app = test_app();
        let (status, body) = call(
            &app,
            "POST",
            "/records",
            None,
            Some(json!({ "owner": "", "domain": "a.com", "ip_address": "1.1.1.1" })),
        )
        .await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "wallet not connected");
        Ok(())
    }

    #[tokio::test]
    async fn only_owner_may_verify_and_only_once() -> anyhow::Result<()> {
        let app = test_app();
        let id = submit(&app, "gated.com").await?;
        let verify = format!("/records/{id}/verify");

        let (status, _) = call(&app, "POST", &verify, None, None).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = call(&app, "POST", &verify, Some(STRANGER), None).await?;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let owner_lower = OWNER.to_lowercase();
        let (status, body) = call(&app, "POST", &verify, Some(&owner_lower), None).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "verified");

        let reject = format!("/records/{id}/reject");
        let (status, _) = call(&app, "POST", &reject, Some(OWNER), None).await?;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, body) = call(&app, "GET", "/records", None, None).await?;
        assert_eq!(body["stats"]["verified"], 1);
        assert_eq!(body["stats"]["rejected"], 0);
        Ok(())
    }

    #[tokio::test]
    async fn unknown_record_is_not_found() -> anyhow::Result<()> {
        let app = test_app();
        let (status, body) = call(&app, "POST", "/records/missing/reject", Some(OWNER), None).await?;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Record not found");
        Ok(())
    }
}
