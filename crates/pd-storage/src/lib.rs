use anyhow::Result;
use async_trait::async_trait;
use pd_contract_client::{ContractGateway, TxReceipt};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Process-local contract key space. Backs the dev ledger and tests.
pub struct InMemoryContract {
    entries: RwLock<HashMap<String, Vec<u8>>>,
    available: AtomicBool,
    tx_counter: AtomicU64,
}

impl Default for InMemoryContract {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
            tx_counter: AtomicU64::new(0),
        }
    }
}

impl InMemoryContract {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Write without minting a transaction. Used to seed fixtures.
    pub async fn seed(&self, key: &str, value: impl Into<Vec<u8>>) {
        let mut guard = self.entries.write().await;
        guard.insert(key.to_owned(), value.into());
    }

    pub async fn snapshot(&self, key: &str) -> Option<Vec<u8>> {
        let guard = self.entries.read().await;
        guard.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    fn mint_tx_hash(&self, key: &str, value: &[u8]) -> String {
        let seq = self.tx_counter.fetch_add(1, Ordering::SeqCst);
        let mut hasher = Sha256::new();
        hasher.update(seq.to_le_bytes());
        hasher.update(key.as_bytes());
        hasher.update(value);
        format!("0x{}", hex_lower(&hasher.finalize()))
    }
}

#[async_trait]
impl ContractGateway for InMemoryContract {
    async fn is_available(&self) -> Result<bool> {
        Ok(self.available.load(Ordering::SeqCst))
    }

    async fn get_data(&self, key: &str) -> Result<Vec<u8>> {
        let guard = self.entries.read().await;
        Ok(guard.get(key).cloned().unwrap_or_default())
    }

    async fn set_data(&self, key: &str, value: Vec<u8>) -> Result<TxReceipt> {
        let tx_hash = self.mint_tx_hash(key, &value);
        let mut guard = self.entries.write().await;
        guard.insert(key.to_owned(), value);
        Ok(TxReceipt { tx_hash })
    }
}

fn hex_lower(bytes: &[u8]) -> String {
    let mut output = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        output.push_str(&format!("{byte:02x}"));
    }
    output
}
