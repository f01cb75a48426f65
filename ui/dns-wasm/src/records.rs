//! Record actions: refresh, submit, verify, reject.
//!
//! Each action runs as its own `spawn_local` task. Overlapping actions are
//! not serialized; the store performs plain read-modify-write.

use crate::dom::{self, Elements};
use crate::render;
use crate::state;
use crate::view::{self, RecordAction, TxPhase};
use gloo_timers::callback::Timeout;
use gloo_timers::future::TimeoutFuture;
use pd_crypto::RecordStamp;

/// Rebuild the list from the contract. The first call also clears the
/// loading screen.
pub async fn load_records(els: &Elements) {
    state::with_mut(|s| s.refreshing = true);
    render::render(els);

    state::store().load_records().await;

    state::with_mut(|s| {
        s.refreshing = false;
        s.loading = false;
    });
    render::render(els);
}

pub async fn on_refresh(els: &Elements) {
    load_records(els).await;
}

pub async fn on_submit(els: &Elements) {
    let strings = state::language().strings();
    if !state::is_connected() {
        dom::alert(strings.connect_wallet);
        return;
    }

    let draft = state::with(|s| s.draft.clone());
    if draft.domain.trim().is_empty() || draft.ip_address.trim().is_empty() {
        dom::alert(&strings.fields_required());
        return;
    }

    let lang = state::language();
    state::with_mut(|s| s.creating = true);
    state::show_overlay(TxPhase::Pending, view::pending_message(lang, RecordAction::Submit));
    render::render(els);

    let stamp = RecordStamp::new(js_sys::Date::now() as u64, js_sys::Math::random());
    let result = state::store()
        .submit_record(&state::caller(), &draft.domain, &draft.ip_address, stamp)
        .await;

    match result {
        Ok(record) => {
            gloo_console::log!(format!("submitted record {}", record.id));
            // The store already reloaded after its index write.
            let seq = state::show_overlay(TxPhase::Success, view::success_message(lang, RecordAction::Submit));
            let els = els.clone();
            Timeout::new(view::SUCCESS_DISMISS_MS, move || {
                state::dismiss_overlay(seq);
                state::with_mut(|s| {
                    s.modal_open = false;
                    s.draft = state::Draft::default();
                });
                render::render(&els);
            })
            .forget();
        }
        Err(err) => {
            let message = view::failure_message(lang, RecordAction::Submit, &err.to_string());
            let seq = state::show_overlay(TxPhase::Error, message);
            schedule_dismiss(els, seq, view::ERROR_DISMISS_MS);
        }
    }

    state::with_mut(|s| s.creating = false);
    render::render(els);
}

pub async fn on_verify(els: &Elements, id: String) {
    change_status(els, id, RecordAction::Verify).await;
}

pub async fn on_reject(els: &Elements, id: String) {
    change_status(els, id, RecordAction::Reject).await;
}

async fn change_status(els: &Elements, id: String, action: RecordAction) {
    let lang = state::language();
    if !state::is_connected() {
        dom::alert(lang.strings().connect_wallet);
        return;
    }

    state::show_overlay(TxPhase::Pending, view::pending_message(lang, action));
    render::render(els);

    TimeoutFuture::new(view::FHE_DELAY_MS).await;

    let store = state::store();
    let caller = state::caller();
    let result = match action {
        RecordAction::Reject => store.reject_record(&caller, &id).await,
        _ => store.verify_record(&caller, &id).await,
    };

    match result {
        Ok(_) => {
            let seq = state::show_overlay(TxPhase::Success, view::success_message(lang, action));
            schedule_dismiss(els, seq, view::SUCCESS_DISMISS_MS);
        }
        Err(err) => {
            let message = view::failure_message(lang, action, &err.to_string());
            let seq = state::show_overlay(TxPhase::Error, message);
            schedule_dismiss(els, seq, view::ERROR_DISMISS_MS);
        }
    }
    render::render(els);
}

fn schedule_dismiss(els: &Elements, seq: u32, millis: u32) {
    let els = els.clone();
    Timeout::new(millis, move || {
        if state::dismiss_overlay(seq) {
            render::render(&els);
        }
    })
    .forget();
}
