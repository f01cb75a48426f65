use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use pd_api_types::{
    ContractAvailableResponse, ContractDataResponse, ContractWriteRequest, ContractWriteResponse,
};
use pd_contract_client::{ContractGateway, TxReceipt};
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, warn};

pub const DEFAULT_LEDGER_URL: &str = "http://localhost:8080";

/// HTTP gateway for a PrivateDNS dev ledger (or any node exposing the same
/// `/contract/*` routes).
///
/// Reads `PRIVATEDNS_LEDGER_URL` from environment at construction time
/// (default: `http://localhost:8080`).
pub struct HttpContractGateway {
    endpoint: String,
    http: reqwest::Client,
}

impl Default for HttpContractGateway {
    fn default() -> Self {
        Self::new(None)
    }
}

impl HttpContractGateway {
    pub fn new(endpoint: Option<String>) -> Self {
        let endpoint = endpoint
            .or_else(|| std::env::var("PRIVATEDNS_LEDGER_URL").ok())
            .unwrap_or_else(|| DEFAULT_LEDGER_URL.to_string());
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn route(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.endpoint)
            .with_context(|| format!("invalid ledger url: {}", self.endpoint))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("ledger url cannot be a base: {}", self.endpoint))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
struct LedgerErrorResponse {
    error: String,
}

#[async_trait]
impl ContractGateway for HttpContractGateway {
    async fn is_available(&self) -> Result<bool> {
        let url = self.route(&["contract", "available"])?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .context("ledger is_available transport")?;

        if !response.status().is_success() {
            warn!("ledger is_available HTTP {}", response.status());
            return Ok(false);
        }

        let body: ContractAvailableResponse = response
            .json()
            .await
            .context("ledger is_available parse")?;
        Ok(body.available)
    }

    async fn get_data(&self, key: &str) -> Result<Vec<u8>> {
        let url = self.route(&["contract", "data", key])?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .context("ledger get_data transport")?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            // Unwritten key reads as empty, same as the contract.
            return Ok(Vec::new());
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("ledger get_data HTTP {status}: {text}");
        }

        let body: ContractDataResponse = response
            .json()
            .await
            .context("ledger get_data parse")?;

        STANDARD
            .decode(body.value.as_bytes())
            .with_context(|| format!("ledger returned non-base64 value for {key}"))
    }

    async fn set_data(&self, key: &str, value: Vec<u8>) -> Result<TxReceipt> {
        let url = self.route(&["contract", "data"])?;
        let body = ContractWriteRequest {
            key: key.to_owned(),
            value: STANDARD.encode(&value),
        };

        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .context("ledger set_data transport")?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            if let Ok(err) = serde_json::from_str::<LedgerErrorResponse>(&text) {
                anyhow::bail!("{}", err.error);
            }
            anyhow::bail!("ledger set_data HTTP {status}: {text}");
        }

        let written: ContractWriteResponse =
            serde_json::from_str(&text).context("ledger set_data parse")?;
        debug!(key, tx_hash = %written.tx_hash, "ledger write accepted");

        Ok(TxReceipt {
            tx_hash: written.tx_hash,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_endpoint_is_trimmed() {
        let gateway = HttpContractGateway::new(Some("http://ledger.local:9000/".to_owned()));
        assert_eq!(gateway.endpoint(), "http://ledger.local:9000");
    }

    #[test]
    fn route_appends_escaped_segments() -> Result<()> {
        let gateway = HttpContractGateway::new(Some("http://ledger.local/api/".to_owned()));
        let url = gateway.route(&["contract", "data", "domain_1700-abc"])?;
        assert_eq!(url.as_str(), "http://ledger.local/api/contract/data/domain_1700-abc");

        let url = gateway.route(&["contract", "data", "odd key/with slash"])?;
        assert_eq!(
            url.as_str(),
            "http://ledger.local/api/contract/data/odd%20key%2Fwith%20slash"
        );
        Ok(())
    }

    #[test]
    fn route_rejects_garbage_endpoint() {
        let gateway = HttpContractGateway::new(Some("not a url".to_owned()));
        assert!(gateway.route(&["contract", "available"]).is_err());
    }
}
