use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: String,
}

/// Key/value surface of the PrivateDNS contract.
///
/// `get_data` returns an empty vector for keys that were never written.
/// The browser implementation wraps JS promises, so futures are only `Send`
/// off wasm32.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait ContractGateway: Send + Sync {
    async fn is_available(&self) -> Result<bool>;
    async fn get_data(&self, key: &str) -> Result<Vec<u8>>;
    async fn set_data(&self, key: &str, value: Vec<u8>) -> Result<TxReceipt>;
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl<G> ContractGateway for Arc<G>
where
    G: ContractGateway + ?Sized,
{
    async fn is_available(&self) -> Result<bool> {
        (**self).is_available().await
    }

    async fn get_data(&self, key: &str) -> Result<Vec<u8>> {
        (**self).get_data(key).await
    }

    async fn set_data(&self, key: &str, value: Vec<u8>) -> Result<TxReceipt> {
        (**self).set_data(key, value).await
    }
}
