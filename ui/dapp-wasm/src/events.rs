//! Event binding.
//!
//! Wires the page's listeners to the controller. Async work is spawned via
//! `wasm_bindgen_futures::spawn_local`; closures live for the whole page
//! and are leaked with `forget`.

use std::rc::Rc;
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;
use wv_contract::{ContractInterface, VotingApp, WavePortal};
use wv_reconciler::Reduce;
use wv_view::{
    DappController, Notifier, ValidationError, add_candidate_form, vote_form, wave_form,
};

use crate::contract_bridge::EthersContract;
use crate::dom::Elements;
use crate::ethereum::InjectedProvider;
use crate::state;

type Controller<C> = DappController<C, InjectedProvider, EthersContract>;

fn on_click(el: &HtmlElement, mut handler: impl FnMut() + 'static) {
    let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| handler())
        as Box<dyn FnMut(web_sys::MouseEvent)>);
    if let Err(err) = el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref()) {
        warn!("cannot bind click handler: {:?}", err);
    }
    cb.forget();
}

fn bind_connect<C>(els: &Elements, controller: &Rc<Controller<C>>)
where
    C: ContractInterface,
    C::Event: Reduce<C::Record>,
{
    let controller = Rc::clone(controller);
    on_click(&els.connect_btn, move || {
        let controller = Rc::clone(&controller);
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(err) = controller.connect().await {
                debug!("connect ended without an account: {}", err);
            }
        });
    });
}

/// Validates synchronously, then hands the write to the controller.
/// `on_success` runs after confirmation, typically to clear the input.
fn submit_on_click<C, F>(
    button: &HtmlElement,
    controller: &Rc<Controller<C>>,
    notifier: &Rc<dyn Notifier>,
    read_form: F,
    on_success: impl Fn() + Clone + 'static,
) where
    C: ContractInterface,
    C::Event: Reduce<C::Record>,
    F: Fn() -> Result<C::Action, ValidationError> + 'static,
{
    let controller = Rc::clone(controller);
    let notifier = Rc::clone(notifier);
    on_click(button, move || {
        let action = match read_form() {
            Ok(action) => action,
            Err(err) => {
                notifier.alert(&err.to_string());
                return;
            }
        };
        let controller = Rc::clone(&controller);
        let on_success = on_success.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match controller.submit(action).await {
                Ok(_) => on_success(),
                Err(err) => debug!("write not completed: {}", err),
            }
        });
    });
}

pub fn bind_wave(
    els: &Elements,
    controller: &Rc<Controller<WavePortal>>,
    notifier: &Rc<dyn Notifier>,
) {
    bind_connect(els, controller);

    let input = els.message_input.clone();
    let cleared = els.message_input.clone();
    submit_on_click(
        &els.wave_btn,
        controller,
        notifier,
        move || wave_form(&input.value()),
        move || cleared.set_value(""),
    );
}

pub fn bind_vote(
    els: &Elements,
    controller: &Rc<Controller<VotingApp>>,
    notifier: &Rc<dyn Notifier>,
) {
    bind_connect(els, controller);

    let name = els.candidate_name.clone();
    let cleared = els.candidate_name.clone();
    submit_on_click(
        &els.add_candidate_btn,
        controller,
        notifier,
        move || add_candidate_form(&name.value()),
        move || cleared.set_value(""),
    );

    let select = els.candidate_select.clone();
    submit_on_click(
        &els.vote_btn,
        controller,
        notifier,
        move || vote_form(&select.value()),
        || {},
    );
}

/// Detaches contract listeners when the page goes away.
pub fn bind_page_exit() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let cb = Closure::wrap(Box::new(move |_: web_sys::Event| {
        if let Some(page) = state::take() {
            page.unmount();
        }
    }) as Box<dyn FnMut(web_sys::Event)>);
    let bound = window.add_event_listener_with_callback("pagehide", cb.as_ref().unchecked_ref());
    if let Err(err) = bound {
        warn!("cannot bind pagehide handler: {:?}", err);
    }
    cb.forget();
}
