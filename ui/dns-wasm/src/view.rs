//! Pure view model.
//!
//! Everything here is a function of loaded records plus UI state, with no DOM
//! access, so it runs under plain `cargo test`.

use crate::i18n::Language;
use pd_api_types::{DomainRecord, RecordStats, RecordStatus, WalletAddress};
use pd_record_store::{can_moderate, filter_records};
use std::cell::Cell;

/// Unconditional pause before a verify/reject touches the contract.
pub const FHE_DELAY_MS: u32 = 3_000;
pub const SUCCESS_DISMISS_MS: u32 = 2_000;
pub const ERROR_DISMISS_MS: u32 = 3_000;

const USER_REJECTED: &str = "user rejected transaction";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordAction {
    Submit,
    Verify,
    Reject,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TxPhase {
    #[default]
    Pending,
    Success,
    Error,
}

impl TxPhase {
    pub fn css_class(&self) -> &'static str {
        match self {
            TxPhase::Pending => "pending",
            TxPhase::Success => "success",
            TxPhase::Error => "error",
        }
    }
}

/// Transaction-status overlay. `seq` increments on every show so a stale
/// auto-dismiss timer can tell it no longer owns the overlay.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TxOverlay {
    pub visible: bool,
    pub phase: TxPhase,
    pub message: String,
    pub seq: u32,
}

impl TxOverlay {
    pub fn show(&mut self, phase: TxPhase, message: impl Into<String>) -> u32 {
        self.seq = self.seq.wrapping_add(1);
        self.visible = true;
        self.phase = phase;
        self.message = message.into();
        self.seq
    }

    /// Hide only if nothing newer has been shown since `seq`.
    pub fn dismiss(&mut self, seq: u32) -> bool {
        if !self.visible || self.seq != seq {
            return false;
        }
        self.visible = false;
        self.phase = TxPhase::Pending;
        self.message.clear();
        true
    }
}

/// Set-once flag for page-lifetime listeners such as `accountsChanged`.
#[derive(Debug, Default)]
pub struct Latch(Cell<bool>);

impl Latch {
    pub const fn new() -> Self {
        Self(Cell::new(false))
    }

    /// True for the first caller only, until [`Latch::release`].
    pub fn claim(&self) -> bool {
        !self.0.replace(true)
    }

    pub fn release(&self) {
        self.0.set(false);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowView {
    pub id: String,
    pub domain: String,
    pub owner_short: String,
    pub timestamp: u64,
    pub status: RecordStatus,
    pub can_act: bool,
}

/// Table rows for the filtered list. Verify/reject are offered only to the
/// owner of a pending record.
pub fn table_rows(records: &[DomainRecord], search: &str, caller: &WalletAddress) -> Vec<RowView> {
    filter_records(records, search)
        .into_iter()
        .map(|record| RowView {
            can_act: can_moderate(&record, caller),
            owner_short: shorten_owner(&record.owner),
            id: record.id,
            domain: record.domain,
            timestamp: record.timestamp,
            status: record.status,
        })
        .collect()
}

/// Dashboard counts always cover every loaded record, ignoring the search.
pub fn dashboard(records: &[DomainRecord]) -> RecordStats {
    RecordStats::tally(records)
}

/// `0x1234...` followed by whatever sits past character 38 (the last four
/// hex digits of a 42-character address).
pub fn shorten_owner(owner: &str) -> String {
    let head: String = owner.chars().take(6).collect();
    let tail: String = owner.chars().skip(38).collect();
    format!("{head}...{tail}")
}

/// Dev ledger root: the typed value without trailing slashes, or the page
/// host on port 8080.
pub fn ledger_base_url(typed: Option<&str>, protocol: Option<&str>, host: Option<&str>) -> String {
    if let Some(value) = typed.map(str::trim).filter(|v| !v.is_empty()) {
        return value.trim_end_matches('/').to_owned();
    }
    format!(
        "{}//{}:8080",
        protocol.unwrap_or("http:"),
        host.unwrap_or("localhost")
    )
}

pub fn pending_message(lang: Language, action: RecordAction) -> &'static str {
    match (action, lang) {
        (RecordAction::Submit, Language::En) => "Encrypting domain mapping with Zama FHE...",
        (RecordAction::Submit, Language::Zh) => "使用Zama FHE加密域名映射...",
        (_, Language::En) => "Processing encrypted data with FHE...",
        (_, Language::Zh) => "使用FHE处理加密数据...",
    }
}

pub fn success_message(lang: Language, action: RecordAction) -> &'static str {
    match (action, lang) {
        (RecordAction::Submit, Language::En) => "Encrypted domain mapping submitted!",
        (RecordAction::Submit, Language::Zh) => "加密域名映射已提交！",
        (RecordAction::Verify, Language::En) => "FHE verification completed!",
        (RecordAction::Verify, Language::Zh) => "FHE验证已完成！",
        (RecordAction::Reject, Language::En) => "Rejection completed!",
        (RecordAction::Reject, Language::Zh) => "拒绝操作已完成！",
    }
}

/// Localized overlay text for a failed action. Only submissions single out a
/// wallet-side rejection.
pub fn failure_message(lang: Language, action: RecordAction, error: &str) -> String {
    if action == RecordAction::Submit && error.contains(USER_REJECTED) {
        return match lang {
            Language::En => "Transaction rejected".to_owned(),
            Language::Zh => "交易被拒绝".to_owned(),
        };
    }

    let detail = match (error.trim().is_empty(), lang) {
        (true, Language::En) => "Unknown error",
        (true, Language::Zh) => "未知错误",
        (false, _) => error,
    };
    let prefix = match (action, lang) {
        (RecordAction::Submit, Language::En) => "Submission failed: ",
        (RecordAction::Submit, Language::Zh) => "提交失败: ",
        (RecordAction::Verify, Language::En) => "Verification failed: ",
        (RecordAction::Verify, Language::Zh) => "验证失败: ",
        (RecordAction::Reject, Language::En) => "Rejection failed: ",
        (RecordAction::Reject, Language::Zh) => "拒绝失败: ",
    };
    format!("{prefix}{detail}")
}

pub fn status_label(lang: Language, status: RecordStatus) -> &'static str {
    let strings = lang.strings();
    match status {
        RecordStatus::Pending => strings.pending,
        RecordStatus::Verified => strings.verified,
        RecordStatus::Rejected => strings.rejected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ME: &str = "0x1234567890abcdef1234567890abcdef12345678";
    const YOU: &str = "0x9999999999999999999999999999999999999999";

    fn record(id: &str, domain: &str, owner: &str, status: RecordStatus) -> DomainRecord {
        DomainRecord {
            id: id.to_owned(),
            domain: domain.to_owned(),
            encrypted_ip: "FHE-MS4xLjEuMQ==".to_owned(),
            timestamp: 1_700_000_000,
            owner: owner.to_owned(),
            status,
        }
    }

    #[test]
    fn actions_hidden_for_records_owned_by_someone_else() {
        let records = vec![
            record("1", "mine.com", ME, RecordStatus::Pending),
            record("2", "yours.com", YOU, RecordStatus::Pending),
            record("3", "done.com", ME, RecordStatus::Verified),
        ];
        let caller = WalletAddress(ME.to_uppercase().replacen("0X", "0x", 1));

        let rows = table_rows(&records, "", &caller);
        let acting: Vec<&str> = rows
            .iter()
            .filter(|row| row.can_act)
            .map(|row| row.id.as_str())
            .collect();
        assert_eq!(acting, vec!["1"]);

        let disconnected = table_rows(&records, "", &WalletAddress(String::new()));
        assert!(disconnected.iter().all(|row| !row.can_act));
    }

    #[test]
    fn search_narrows_rows_but_not_dashboard() {
        let records = vec![
            record("1", "Shop.EXAMPLE.com", ME, RecordStatus::Pending),
            record("2", "blog.org", ME, RecordStatus::Rejected),
            record("3", "api.example.io", YOU, RecordStatus::Verified),
        ];

        let rows = table_rows(&records, "Example", &WalletAddress(ME.to_owned()));
        let ids: Vec<&str> = rows.iter().map(|row| row.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);

        let stats = dashboard(&records);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.verified, 1);
        assert_eq!(stats.rejected, 1);
    }

    #[test]
    fn owner_is_shortened_like_the_table_expects() {
        assert_eq!(shorten_owner(ME), "0x1234...5678");
        assert_eq!(shorten_owner("0xabc"), "0xabc...");
    }

    #[test]
    fn submit_rejection_is_called_out() {
        let msg = failure_message(
            Language::En,
            RecordAction::Submit,
            "ethers: user rejected transaction (code=ACTION_REJECTED)",
        );
        assert_eq!(msg, "Transaction rejected");
        assert_eq!(
            failure_message(Language::Zh, RecordAction::Submit, "user rejected transaction"),
            "交易被拒绝"
        );
    }

    #[test]
    fn other_failures_are_prefixed_per_action() {
        assert_eq!(
            failure_message(Language::En, RecordAction::Verify, "Record not found"),
            "Verification failed: Record not found"
        );
        assert_eq!(
            failure_message(Language::En, RecordAction::Reject, "user rejected transaction"),
            "Rejection failed: user rejected transaction"
        );
        assert_eq!(
            failure_message(Language::Zh, RecordAction::Submit, ""),
            "提交失败: 未知错误"
        );
    }

    #[test]
    fn stale_dismiss_leaves_newer_overlay_visible() {
        let mut overlay = TxOverlay::default();
        let first = overlay.show(TxPhase::Pending, "working");
        let second = overlay.show(TxPhase::Error, "failed");

        assert!(!overlay.dismiss(first));
        assert!(overlay.visible);
        assert_eq!(overlay.message, "failed");

        assert!(overlay.dismiss(second));
        assert!(!overlay.visible);
        assert!(!overlay.dismiss(second));
    }

    #[test]
    fn ledger_base_prefers_typed_value() {
        assert_eq!(
            ledger_base_url(Some(" http://ledger.test:9000/ "), Some("https:"), Some("app.test")),
            "http://ledger.test:9000"
        );
        assert_eq!(
            ledger_base_url(Some("   "), Some("https:"), Some("app.test")),
            "https://app.test:8080"
        );
        assert_eq!(ledger_base_url(None, None, None), "http://localhost:8080");
    }

    #[test]
    fn latch_admits_one_claim_until_released() {
        let latch = Latch::new();
        assert!(latch.claim());
        assert!(!latch.claim());
        assert!(!latch.claim());

        latch.release();
        assert!(latch.claim());
    }

    #[test]
    fn status_labels_follow_language() {
        assert_eq!(status_label(Language::En, RecordStatus::Verified), "Verified");
        assert_eq!(status_label(Language::Zh, RecordStatus::Rejected), "已拒绝");
    }
}
