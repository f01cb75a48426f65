//! Global application state.
//!
//! `thread_local!` + `RefCell` storage; wasm is single-threaded. Accessors
//! clone out so no borrow is ever held across an `.await`.

use crate::contract::BrowserGateway;
use crate::i18n::Language;
use crate::view::{TxOverlay, TxPhase};
use pd_api_types::WalletAddress;
use pd_record_store::RecordStore;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Draft {
    pub domain: String,
    pub ip_address: String,
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub account: String,
    /// Set once a provider answered `eth_requestAccounts`, even with no accounts.
    pub connected: bool,
    pub language: Language,
    pub search: String,
    /// Only true until the first load finishes.
    pub loading: bool,
    pub refreshing: bool,
    pub creating: bool,
    pub modal_open: bool,
    pub faq_open: bool,
    pub draft: Draft,
    pub overlay: TxOverlay,
}

thread_local! {
    static STATE: RefCell<AppState> = RefCell::new(AppState {
        loading: true,
        ..AppState::default()
    });
    static STORE: Rc<RecordStore<BrowserGateway>> = Rc::new(RecordStore::new(BrowserGateway));
}

pub fn with<F, R>(f: F) -> R
where
    F: FnOnce(&AppState) -> R,
{
    STATE.with(|s| f(&s.borrow()))
}

pub fn with_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut AppState) -> R,
{
    STATE.with(|s| f(&mut s.borrow_mut()))
}

pub fn store() -> Rc<RecordStore<BrowserGateway>> {
    STORE.with(Rc::clone)
}

pub fn snapshot() -> AppState {
    with(AppState::clone)
}

pub fn caller() -> WalletAddress {
    with(|s| WalletAddress(s.account.clone()))
}

pub fn language() -> Language {
    with(|s| s.language)
}

pub fn is_connected() -> bool {
    with(|s| s.connected)
}

pub fn set_account(account: String) {
    with_mut(|s| {
        s.account = account;
        s.connected = true;
    });
}

pub fn disconnect() {
    with_mut(|s| {
        s.account.clear();
        s.connected = false;
    });
}

pub fn show_overlay(phase: TxPhase, message: impl Into<String>) -> u32 {
    with_mut(|s| s.overlay.show(phase, message))
}

pub fn dismiss_overlay(seq: u32) -> bool {
    with_mut(|s| s.overlay.dismiss(seq))
}
