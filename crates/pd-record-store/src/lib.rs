use pd_api_types::{
    DomainRecord, INDEX_KEY, RecordStats, RecordStatus, StoredRecord, WalletAddress, record_key,
};
use pd_contract_client::ContractGateway;
use pd_crypto::{IpSealer, PlaceholderFhe, RecordStamp};
use serde_json::{Map, Value};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("wallet not connected")]
    NotConnected,

    #[error("{0}")]
    InvalidInput(&'static str),

    #[error("Record not found")]
    RecordNotFound { id: String },

    #[error("record {id} is already {status}")]
    InvalidTransition { id: String, status: RecordStatus },

    #[error("ip sealing failed: {0}")]
    Seal(anyhow::Error),

    #[error("record encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Gateway(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// In-memory mirror of the contract's record space.
///
/// Every refresh rebuilds the list from the index key; mutations are plain
/// read-modify-write against the gateway with no conflict detection.
pub struct RecordStore<G, E = PlaceholderFhe> {
    gateway: G,
    sealer: E,
    records: RwLock<Vec<DomainRecord>>,
}

impl<G> RecordStore<G>
where
    G: ContractGateway,
{
    pub fn new(gateway: G) -> Self {
        Self::with_sealer(gateway, PlaceholderFhe)
    }
}

impl<G, E> RecordStore<G, E>
where
    G: ContractGateway,
    E: IpSealer,
{
    pub fn with_sealer(gateway: G, sealer: E) -> Self {
        Self {
            gateway,
            sealer,
            records: RwLock::new(Vec::new()),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn records(&self) -> Vec<DomainRecord> {
        self.read_state().clone()
    }

    pub fn filter(&self, search: &str) -> Vec<DomainRecord> {
        filter_records(&self.read_state(), search)
    }

    pub fn stats(&self) -> RecordStats {
        RecordStats::tally(&self.read_state())
    }

    /// Rebuild the record list from the contract and return it.
    ///
    /// Never fails: an unavailable contract or an unreadable index leaves the
    /// previous list in place, a malformed index yields an empty list, and
    /// unreadable record blobs are dropped.
    pub async fn load_records(&self) -> Vec<DomainRecord> {
        match self.gateway.is_available().await {
            Ok(true) => {}
            Ok(false) => {
                warn!("contract is not available");
                return self.records();
            }
            Err(err) => {
                warn!("error loading records: {err:#}");
                return self.records();
            }
        }

        let keys = match self.read_index().await {
            Ok(keys) => keys,
            Err(err) => {
                warn!("error loading records: {err:#}");
                return self.records();
            }
        };

        let mut list = Vec::with_capacity(keys.len());
        for key in keys {
            let raw = match self.gateway.get_data(&record_key(&key)).await {
                Ok(raw) => raw,
                Err(err) => {
                    warn!("error loading record {key}: {err:#}");
                    continue;
                }
            };
            if raw.is_empty() {
                continue;
            }
            match serde_json::from_slice::<StoredRecord>(&raw) {
                Ok(stored) => list.push(DomainRecord::from_stored(key, stored)),
                Err(err) => warn!("error parsing record data for {key}: {err}"),
            }
        }

        list.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        *self.write_state() = list.clone();
        list
    }

    /// Create a `pending` record owned by `owner`, append it to the index and
    /// reload.
    ///
    /// The index is re-read right before the append. Two submitters that both
    /// read it before either writes still lose one id. If the index write
    /// fails the record blob stays behind unreferenced.
    pub async fn submit_record(
        &self,
        owner: &WalletAddress,
        domain: &str,
        ip_address: &str,
        stamp: RecordStamp,
    ) -> StoreResult<DomainRecord> {
        if owner.is_empty() {
            return Err(StoreError::NotConnected);
        }
        if domain.trim().is_empty() || ip_address.trim().is_empty() {
            return Err(StoreError::InvalidInput("domain and ip address are required"));
        }

        let encrypted_ip = self.sealer.seal(ip_address).map_err(StoreError::Seal)?;
        let record = DomainRecord {
            id: stamp.record_id(),
            domain: domain.to_owned(),
            encrypted_ip,
            timestamp: stamp.unix_seconds(),
            owner: owner.0.clone(),
            status: RecordStatus::Pending,
        };

        let blob = serde_json::to_vec(&record.to_stored())?;
        let receipt = self.gateway.set_data(&record_key(&record.id), blob).await?;
        info!(id = %record.id, tx_hash = %receipt.tx_hash, "record blob written");

        let mut keys = self.read_index().await?;
        keys.push(record.id.clone());
        let receipt = self
            .gateway
            .set_data(INDEX_KEY, serde_json::to_vec(&keys)?)
            .await?;
        info!(entries = keys.len(), tx_hash = %receipt.tx_hash, "record index written");

        self.load_records().await;
        Ok(record)
    }

    pub async fn verify_record(
        &self,
        caller: &WalletAddress,
        id: &str,
    ) -> StoreResult<DomainRecord> {
        self.transition(caller, id, RecordStatus::Verified).await
    }

    pub async fn reject_record(
        &self,
        caller: &WalletAddress,
        id: &str,
    ) -> StoreResult<DomainRecord> {
        self.transition(caller, id, RecordStatus::Rejected).await
    }

    /// Ownership is not checked here; callers gate on [`can_moderate`].
    async fn transition(
        &self,
        caller: &WalletAddress,
        id: &str,
        target: RecordStatus,
    ) -> StoreResult<DomainRecord> {
        if caller.is_empty() {
            return Err(StoreError::NotConnected);
        }

        let key = record_key(id);
        let raw = self.gateway.get_data(&key).await?;
        if raw.is_empty() {
            return Err(StoreError::RecordNotFound { id: id.to_owned() });
        }

        // Keep unknown fields intact; only `status` is replaced.
        let mut fields: Map<String, Value> = serde_json::from_slice(&raw)?;
        let current = serde_json::from_value::<StoredRecord>(Value::Object(fields.clone()))?.status;
        if current.is_terminal() {
            return Err(StoreError::InvalidTransition {
                id: id.to_owned(),
                status: current,
            });
        }

        fields.insert("status".to_owned(), Value::from(target.as_str()));
        let blob = serde_json::to_vec(&fields)?;
        let receipt = self.gateway.set_data(&key, blob).await?;
        info!(id, status = %target, tx_hash = %receipt.tx_hash, "record status written");

        let stored: StoredRecord = serde_json::from_value(Value::Object(fields))?;
        self.load_records().await;
        Ok(DomainRecord::from_stored(id, stored))
    }

    /// Fresh read of the index key. Empty or malformed JSON counts as an
    /// empty index; gateway failures propagate.
    async fn read_index(&self) -> anyhow::Result<Vec<String>> {
        let raw = self.gateway.get_data(INDEX_KEY).await?;
        if raw.is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_slice(&raw).unwrap_or_else(|err| {
            warn!("error parsing domain keys: {err}");
            Vec::new()
        }))
    }

    fn read_state(&self) -> RwLockReadGuard<'_, Vec<DomainRecord>> {
        self.records.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, Vec<DomainRecord>> {
        self.records.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Records whose domain contains `search`, ignoring case. Order is kept.
pub fn filter_records(records: &[DomainRecord], search: &str) -> Vec<DomainRecord> {
    let needle = search.to_lowercase();
    records
        .iter()
        .filter(|record| record.domain.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Whether `caller` may verify or reject `record`: the owner, while pending.
pub fn can_moderate(record: &DomainRecord, caller: &WalletAddress) -> bool {
    record.status == RecordStatus::Pending && caller.matches(&record.owner)
}
