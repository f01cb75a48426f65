use serde::de::IntoDeserializer;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Contract key holding the JSON array of record ids.
pub const INDEX_KEY: &str = "domain_keys";

pub const RECORD_KEY_PREFIX: &str = "domain_";

pub fn record_key(id: &str) -> String {
    format!("{RECORD_KEY_PREFIX}{id}")
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    #[default]
    Pending,
    Verified,
    Rejected,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Pending => "pending",
            RecordStatus::Verified => "verified",
            RecordStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, RecordStatus::Pending)
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WalletAddress(pub String);

impl WalletAddress {
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Addresses compare case-insensitively (checksummed vs lowercase hex).
    pub fn matches(&self, other: &str) -> bool {
        !self.is_empty() && self.0.eq_ignore_ascii_case(other)
    }
}

/// Blob stored under `domain_{id}`. The id itself is the key suffix.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct StoredRecord {
    pub domain: String,
    pub encrypted_ip: String,
    pub timestamp: u64,
    pub owner: String,
    #[serde(deserialize_with = "status_or_pending")]
    pub status: RecordStatus,
}

/// Absent, `null` and `""` all read as `pending`; any other unknown string is
/// an error.
fn status_or_pending<'de, D>(deserializer: D) -> Result<RecordStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(RecordStatus::Pending),
        Some(status) => RecordStatus::deserialize(status.into_deserializer()),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DomainRecord {
    pub id: String,
    pub domain: String,
    pub encrypted_ip: String,
    pub timestamp: u64,
    pub owner: String,
    pub status: RecordStatus,
}

impl DomainRecord {
    pub fn from_stored(id: impl Into<String>, stored: StoredRecord) -> Self {
        Self {
            id: id.into(),
            domain: stored.domain,
            encrypted_ip: stored.encrypted_ip,
            timestamp: stored.timestamp,
            owner: stored.owner,
            status: stored.status,
        }
    }

    pub fn to_stored(&self) -> StoredRecord {
        StoredRecord {
            domain: self.domain.clone(),
            encrypted_ip: self.encrypted_ip.clone(),
            timestamp: self.timestamp,
            owner: self.owner.clone(),
            status: self.status,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordStats {
    pub total: usize,
    pub verified: usize,
    pub pending: usize,
    pub rejected: usize,
}

impl RecordStats {
    pub fn tally(records: &[DomainRecord]) -> Self {
        let mut stats = RecordStats {
            total: records.len(),
            ..Default::default()
        };
        for record in records {
            match record.status {
                RecordStatus::Pending => stats.pending += 1,
                RecordStatus::Verified => stats.verified += 1,
                RecordStatus::Rejected => stats.rejected += 1,
            }
        }
        stats
    }
}

// ── Dev ledger wire types ──
//
// Blob values travel as standard base64 so arbitrary bytes survive JSON.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractAvailableResponse {
    pub available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractDataResponse {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractWriteRequest {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractWriteResponse {
    pub tx_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSubmitRequest {
    pub owner: String,
    pub domain: String,
    pub ip_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordListResponse {
    pub records: Vec<DomainRecord>,
    pub stats: RecordStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_record_defaults_missing_status_to_pending() {
        let raw = r#"{"domain":"example.com","encryptedIp":"FHE-MQ==","timestamp":1700000000,"owner":"0xabc"}"#;
        let stored: StoredRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(stored.status, RecordStatus::Pending);
        assert_eq!(stored.encrypted_ip, "FHE-MQ==");
    }

    #[test]
    fn stored_record_treats_null_and_blank_status_as_pending() {
        let null: StoredRecord =
            serde_json::from_str(r#"{"domain":"n.com","timestamp":1,"status":null}"#).unwrap();
        assert_eq!(null.status, RecordStatus::Pending);

        let blank: StoredRecord =
            serde_json::from_str(r#"{"domain":"e.com","timestamp":1,"status":""}"#).unwrap();
        assert_eq!(blank.status, RecordStatus::Pending);

        let verified: StoredRecord = serde_json::from_str(r#"{"status":"verified"}"#).unwrap();
        assert_eq!(verified.status, RecordStatus::Verified);
        assert!(serde_json::from_str::<StoredRecord>(r#"{"status":"archived"}"#).is_err());
    }

    #[test]
    fn stored_record_uses_camel_case_keys() {
        let stored = StoredRecord {
            domain: "a.eth".to_owned(),
            encrypted_ip: "FHE-x".to_owned(),
            timestamp: 1,
            owner: "0x1".to_owned(),
            status: RecordStatus::Verified,
        };
        let value = serde_json::to_value(&stored).unwrap();
        assert_eq!(value["encryptedIp"], "FHE-x");
        assert_eq!(value["status"], "verified");
        assert!(value.get("id").is_none());
    }

    #[test]
    fn wallet_address_matches_ignoring_case() {
        let addr = WalletAddress("0xAbCdEf".to_owned());
        assert!(addr.matches("0xabcdef"));
        assert!(!addr.matches("0xabcdee"));
        assert!(!WalletAddress(String::new()).matches(""));
    }

    #[test]
    fn stats_tally_counts_each_status() {
        let mk = |id: &str, status| DomainRecord {
            id: id.to_owned(),
            domain: "d".to_owned(),
            encrypted_ip: String::new(),
            timestamp: 0,
            owner: String::new(),
            status,
        };
        let records = vec![
            mk("1", RecordStatus::Pending),
            mk("2", RecordStatus::Verified),
            mk("3", RecordStatus::Verified),
            mk("4", RecordStatus::Rejected),
        ];
        let stats = RecordStats::tally(&records);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.verified, 2);
        assert_eq!(stats.rejected, 1);
    }
}
