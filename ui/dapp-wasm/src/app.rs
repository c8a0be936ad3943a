//! Boot sequence: config, DOM, wallet, contract, controller.

use anyhow::{Result, anyhow};
use std::rc::Rc;
use tracing::info;
use wasm_bindgen::JsValue;
use wv_api_types::{AppKind, DappConfig};
use wv_contract::{ContractClient, VotingApp, WavePortal};
use wv_reconciler::Reduce;
use wv_view::{DappController, LocalTask, Notifier, Spawner};
use wv_wallet::WalletConnector;

use crate::config::{self, QueryOverrides};
use crate::contract_bridge::EthersContract;
use crate::dom::{self, Elements};
use crate::ethereum::InjectedProvider;
use crate::events;
use crate::render::{self, PageRender};
use crate::state::{self, Page};
use crate::toast::ToastNotifier;

/// Runs event-triggered follow-ups on the browser's microtask queue.
pub struct LocalSpawner;

impl Spawner for LocalSpawner {
    fn spawn(&self, task: LocalTask) {
        wasm_bindgen_futures::spawn_local(task);
    }
}

fn js_error(err: JsValue) -> anyhow::Error {
    anyhow!("{err:?}")
}

pub async fn boot(overrides: QueryOverrides) -> Result<()> {
    let config = config::load(&overrides)?;
    let els = Elements::bind().map_err(js_error)?;

    dom::set_text(&els.title, &config.title);
    for app in [AppKind::Wave, AppKind::Vote] {
        dom::set_visible(els.form_for(app), false);
    }

    let notifier: Rc<dyn Notifier> = Rc::new(ToastNotifier::new(els.toasts.clone()));
    let provider = InjectedProvider::detect();
    if provider.is_none() {
        info!("no injected wallet; install one from {}", config.wallet_install_url);
    }

    match config.app {
        AppKind::Wave => {
            let controller = build::<WavePortal>(&config, provider, &notifier)?;
            events::bind_wave(&els, &controller, &notifier);
            mount(&els, &controller).await;
            state::install(Page::Wave(controller));
        }
        AppKind::Vote => {
            let controller = build::<VotingApp>(&config, provider, &notifier)?;
            events::bind_vote(&els, &controller, &notifier);
            mount(&els, &controller).await;
            state::install(Page::Vote(controller));
        }
    }
    events::bind_page_exit();
    Ok(())
}

type Controller<C> = DappController<C, InjectedProvider, EthersContract>;

fn build<C>(
    config: &DappConfig,
    provider: Option<InjectedProvider>,
    notifier: &Rc<dyn Notifier>,
) -> Result<Rc<Controller<C>>>
where
    C: PageRender,
    C::Event: Reduce<C::Record>,
{
    let backend = EthersContract::connect(provider.as_ref().map(InjectedProvider::as_js), config)
        .map_err(js_error)?;
    let client = ContractClient::new(Rc::new(backend)).with_gas_limit(config.gas_limit);

    Ok(DappController::new(
        WalletConnector::new(provider),
        client,
        Rc::clone(notifier),
        Rc::new(LocalSpawner),
    ))
}

async fn mount<C>(els: &Elements, controller: &Rc<Controller<C>>)
where
    C: PageRender,
    C::Event: Reduce<C::Record>,
{
    {
        let els = els.clone();
        let weak = Rc::downgrade(controller);
        controller.observe(move || {
            if let Some(controller) = weak.upgrade() {
                render::render::<C>(&els, &controller.view());
            }
        });
    }
    render::render::<C>(els, &controller.view());
    controller.mount().await;
}
