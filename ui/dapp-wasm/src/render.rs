//! Paints a `ViewState` into the page.
//!
//! Rendering is a full redraw of the dynamic parts; the lists are small.

use chrono::Local;
use wv_api_types::{AppKind, Candidate, TxState, WaveMessage, format_date_in};
use wv_contract::{ContractInterface, VotingApp, WavePortal};
use wv_view::ViewState;

use crate::dom::{self, Elements};

pub const SELECT_PLACEHOLDER: &str = "Select a candidate";

/// Page-specific parts of a render.
pub trait PageRender: ContractInterface {
    const APP: AppKind;

    fn count_label(count: u64) -> String;
    fn render_records(els: &Elements, records: &[Self::Record]);
}

impl PageRender for WavePortal {
    const APP: AppKind = AppKind::Wave;

    fn count_label(count: u64) -> String {
        format!("Total waves: {count}")
    }

    fn render_records(els: &Elements, records: &[WaveMessage]) {
        dom::clear(&els.record_list);
        for wave in records {
            let Some(item) = dom::create_element("li") else {
                return;
            };
            item.set_class_name("record wave");
            let parts = [
                dom::text_element("span", "wave-address", &wave.address.to_string()),
                dom::text_element("span", "wave-date", &format_date_in(wave.timestamp, &Local)),
                dom::text_element("p", "wave-message", &wave.message),
            ];
            for part in parts.into_iter().flatten() {
                let _ = item.append_child(&part);
            }
            let _ = els.record_list.append_child(&item);
        }
    }
}

impl PageRender for VotingApp {
    const APP: AppKind = AppKind::Vote;

    fn count_label(count: u64) -> String {
        format!("Candidates: {count}")
    }

    fn render_records(els: &Elements, records: &[Candidate]) {
        dom::clear(&els.record_list);
        for (index, candidate) in records.iter().enumerate() {
            let Some(item) = dom::create_element("li") else {
                return;
            };
            item.set_class_name("record candidate");
            let parts = [
                dom::text_element("span", "candidate-rank", &(index + 1).to_string()),
                dom::text_element("span", "candidate-name", &candidate.name),
                dom::text_element("span", "candidate-votes", &candidate.votes.to_string()),
            ];
            for part in parts.into_iter().flatten() {
                let _ = item.append_child(&part);
            }
            let _ = els.record_list.append_child(&item);
        }
        render_candidate_options(els, records);
    }
}

/// Rebuilds the vote picker, keeping the current choice when it still exists.
fn render_candidate_options(els: &Elements, candidates: &[Candidate]) {
    let select = &els.candidate_select;
    let current = select.value();
    dom::clear(select);

    if let Some(placeholder) = dom::create_option("", SELECT_PLACEHOLDER, current.is_empty()) {
        let _ = select.append_child(&placeholder);
    }
    for candidate in candidates {
        let value = candidate.id.to_string();
        if let Some(option) = dom::create_option(&value, &candidate.name, value == current) {
            let _ = select.append_child(&option);
        }
    }
}

fn tx_label(tx: &TxState) -> String {
    match tx {
        TxState::Idle => String::new(),
        TxState::Submitting => "Confirm the transaction in your wallet...".to_owned(),
        TxState::Pending { tx_hash } => format!("Mining {tx_hash}..."),
        TxState::Confirmed { tx_hash } => format!("Mined {tx_hash}"),
        TxState::Failed { reason } => format!("Failed: {reason}"),
    }
}

pub fn render<C: PageRender>(els: &Elements, view: &ViewState<C::Record>) {
    dom::set_visible(&els.connect_btn, view.show_connect_button);
    dom::set_visible(&els.connect_hint, view.show_connect_button);
    dom::set_visible(els.form_for(C::APP), view.show_form);

    let account = view
        .account
        .as_ref()
        .map(|a| format!("Connected: {}", a.short()))
        .unwrap_or_default();
    dom::set_text(&els.account, &account);

    let count = view.count.map(C::count_label).unwrap_or_default();
    dom::set_text(&els.record_count, &count);

    dom::set_text(&els.tx_status, &tx_label(&view.tx));
    dom::toggle_class(&els.tx_status, "loading", view.is_loading());

    for button in els.submit_buttons(C::APP) {
        button.set_disabled(!view.submit_enabled);
    }

    C::render_records(els, &view.records);
}
