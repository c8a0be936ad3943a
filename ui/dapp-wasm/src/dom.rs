//! DOM element bindings.
//!
//! Every element the page touches is resolved once at startup. Both forms
//! live in the same document; the one for the other app stays hidden.

use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, HtmlButtonElement, HtmlInputElement, HtmlOptionElement,
    HtmlSelectElement, HtmlTextAreaElement,
};
use wv_api_types::AppKind;

pub const HIDDEN: &str = "hidden";

// ── Helpers ──

fn doc() -> Option<Document> {
    web_sys::window()?.document()
}

pub fn by_id(id: &str) -> Option<Element> {
    doc()?.get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn create_element(tag: &str) -> Option<Element> {
    doc()?.create_element(tag).ok()
}

pub fn create_option(value: &str, text: &str, selected: bool) -> Option<HtmlOptionElement> {
    let opt: HtmlOptionElement = create_element("option")?.dyn_into().ok()?;
    opt.set_value(value);
    opt.set_text_content(Some(text));
    opt.set_selected(selected);
    Some(opt)
}

/// `<tag class="class">text</tag>`; text is never parsed as markup.
pub fn text_element(tag: &str, class: &str, text: &str) -> Option<Element> {
    let el = create_element(tag)?;
    el.set_class_name(class);
    el.set_text_content(Some(text));
    Some(el)
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn clear(el: &Element) {
    el.set_text_content(None);
}

pub fn toggle_class(el: &Element, cls: &str, force: bool) {
    let _ = el.class_list().toggle_with_force(cls, force);
}

pub fn set_visible(el: &Element, visible: bool) {
    toggle_class(el, HIDDEN, !visible);
}

// ── Elements struct ──

/// All DOM element references used by the page.
#[derive(Clone)]
pub struct Elements {
    pub title: Element,
    pub connect_btn: HtmlButtonElement,
    pub connect_hint: Element,
    pub account: Element,
    pub record_count: Element,
    pub tx_status: Element,
    pub record_list: Element,
    pub toasts: Element,

    // Wave portal
    pub wave_form: Element,
    pub message_input: HtmlTextAreaElement,
    pub wave_btn: HtmlButtonElement,

    // Voting
    pub vote_form: Element,
    pub candidate_name: HtmlInputElement,
    pub add_candidate_btn: HtmlButtonElement,
    pub candidate_select: HtmlSelectElement,
    pub vote_btn: HtmlButtonElement,
}

macro_rules! get_el {
    ($id:expr) => {
        by_id($id).ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

macro_rules! get_typed {
    ($ty:ty, $id:expr) => {
        by_id_typed::<$ty>($id).ok_or_else(|| {
            JsValue::from_str(&format!("missing {} #{}", stringify!($ty), $id))
        })?
    };
}

impl Elements {
    /// Resolve all DOM references. Call once the document is parsed.
    pub fn bind() -> Result<Elements, JsValue> {
        Ok(Elements {
            title: get_el!("appTitle"),
            connect_btn: get_typed!(HtmlButtonElement, "connectBtn"),
            connect_hint: get_el!("connectHint"),
            account: get_el!("account"),
            record_count: get_el!("recordCount"),
            tx_status: get_el!("txStatus"),
            record_list: get_el!("recordList"),
            toasts: get_el!("toasts"),

            wave_form: get_el!("waveForm"),
            message_input: get_typed!(HtmlTextAreaElement, "messageInput"),
            wave_btn: get_typed!(HtmlButtonElement, "waveBtn"),

            vote_form: get_el!("voteForm"),
            candidate_name: get_typed!(HtmlInputElement, "candidateName"),
            add_candidate_btn: get_typed!(HtmlButtonElement, "addCandidateBtn"),
            candidate_select: get_typed!(HtmlSelectElement, "candidateSelect"),
            vote_btn: get_typed!(HtmlButtonElement, "voteBtn"),
        })
    }

    /// The form section belonging to `app`.
    pub fn form_for(&self, app: AppKind) -> &Element {
        match app {
            AppKind::Wave => &self.wave_form,
            AppKind::Vote => &self.vote_form,
        }
    }

    pub fn submit_buttons(&self, app: AppKind) -> Vec<&HtmlButtonElement> {
        match app {
            AppKind::Wave => vec![&self.wave_btn],
            AppKind::Vote => vec![&self.add_candidate_btn, &self.vote_btn],
        }
    }
}
