//! One dApp page: the connected account, the mirrored record list and the
//! write in flight, wired to the wallet, the contract and its events.
//!
//! Records only ever enter the list through a bulk read or a contract event;
//! a confirmed write does not touch the list itself.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use thiserror::Error;
use tracing::{info, warn};
use wv_api_types::{Notification, TxState, WalletAddress};
use wv_contract::{
    ContractBackend, ContractClient, ContractError, ContractInterface, EventSource, TxReceipt,
};
use wv_reconciler::{EventReconciler, Msg, ReconcilerHooks, Reduce, Store};
use wv_wallet::{ConnectError, ProviderError, WalletConnector, WalletProvider};

use crate::model::ViewState;
use crate::notify::Notifier;
use crate::spawn::Spawner;

const CONNECTED: &str = "Wallet Connected";
const CONNECT_FAILURE: &str = "Could not connect";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("connect a wallet first")]
    NotConnected,
    #[error("a transaction is already in flight")]
    Busy,
    #[error(transparent)]
    Contract(#[from] ContractError),
}

pub struct DappController<C, P, B>
where
    C: ContractInterface,
    B: ContractBackend + EventSource,
{
    wallet: WalletConnector<P>,
    client: ContractClient<C, Rc<B>>,
    store: Rc<Store<C::Record>>,
    reconciler: RefCell<EventReconciler<C, Rc<B>>>,
    account: RefCell<Option<WalletAddress>>,
    tx: RefCell<TxState>,
    count: Cell<Option<u64>>,
    notifier: Rc<dyn Notifier>,
    spawner: Rc<dyn Spawner>,
    observers: RefCell<Vec<Rc<dyn Fn()>>>,
}

impl<C, P, B> DappController<C, P, B>
where
    C: ContractInterface,
    C::Event: Reduce<C::Record>,
    P: WalletProvider + 'static,
    B: ContractBackend + EventSource + 'static,
{
    pub fn new(
        wallet: WalletConnector<P>,
        client: ContractClient<C, Rc<B>>,
        notifier: Rc<dyn Notifier>,
        spawner: Rc<dyn Spawner>,
    ) -> Rc<Self> {
        let store = Rc::new(Store::default());
        let reconciler = EventReconciler::new(Rc::clone(client.backend()), Rc::clone(&store));
        Rc::new(Self {
            wallet,
            client,
            store,
            reconciler: RefCell::new(reconciler),
            account: RefCell::new(None),
            tx: RefCell::new(TxState::Idle),
            count: Cell::new(None),
            notifier,
            spawner,
            observers: RefCell::new(Vec::new()),
        })
    }

    pub fn store(&self) -> &Rc<Store<C::Record>> {
        &self.store
    }

    pub fn account(&self) -> Option<WalletAddress> {
        self.account.borrow().clone()
    }

    pub fn tx_state(&self) -> TxState {
        self.tx.borrow().clone()
    }

    pub fn view(&self) -> ViewState<C::Record> {
        let records = self.store.snapshot();
        let held = records.len() as u64;
        // Events that land after the count read still move the count.
        let count = match C::COUNT {
            Some(_) => self.count.get().map(|count| count.max(held)),
            None => Some(held),
        };
        ViewState::derive(self.account(), records, self.tx_state(), count)
    }

    /// Called after every change to anything `view` reports.
    pub fn observe(&self, observer: impl Fn() + 'static) {
        let observer: Rc<dyn Fn()> = Rc::new(observer);
        let forwarded = Rc::clone(&observer);
        self.store.observe(move || forwarded());
        self.observers.borrow_mut().push(observer);
    }

    /// Picks up an account the wallet already authorized for this origin,
    /// without prompting.
    pub async fn mount(self: &Rc<Self>) {
        match self.wallet.get_authorized_account().await {
            Some(account) => {
                self.set_account(account);
                self.sync().await;
            }
            None => info!("{}: no authorized account, waiting for connect", C::NAME),
        }
    }

    pub async fn connect(self: &Rc<Self>) -> Result<WalletAddress, ConnectError> {
        match self.wallet.request_connection().await {
            Ok(account) => {
                self.notifier.notify(Notification::success(CONNECTED));
                self.set_account(account.clone());
                self.sync().await;
                Ok(account)
            }
            Err(err) => {
                self.report_connect_failure(&err);
                Err(err)
            }
        }
    }

    /// Re-reads every record. Failures are logged and leave the current
    /// state in place.
    pub async fn refresh(&self) {
        match self.client.read_all().await {
            Ok(records) => {
                info!("{}: loaded {} records", C::NAME, records.len());
                self.store.dispatch::<C::Event>(Msg::Snapshot(records));
            }
            Err(err) => warn!("{}: cannot load records: {}", C::NAME, err),
        }

        if C::COUNT.is_some() {
            match self.client.get_count().await {
                Ok(count) => {
                    self.count.set(Some(count));
                    self.changed();
                }
                Err(err) => warn!("{}: cannot load count: {}", C::NAME, err),
            }
        }
    }

    pub async fn submit(&self, action: C::Action) -> Result<TxReceipt, SubmitError> {
        if self.account.borrow().is_none() {
            return Err(SubmitError::NotConnected);
        }
        if self.tx.borrow().in_flight() {
            warn!("{}: ignoring {:?}, a write is in flight", C::NAME, action);
            return Err(SubmitError::Busy);
        }

        self.set_tx(TxState::Submitting);
        match self.write(&action).await {
            Ok(receipt) => {
                self.set_tx(TxState::Confirmed {
                    tx_hash: receipt.tx_hash.to_string(),
                });
                self.notifier
                    .notify(Notification::success(C::success_message(&action)));
                Ok(receipt)
            }
            Err(err) => {
                let message = err.user_message(C::failure_message(&action));
                warn!("{}: {:?} failed: {}", C::NAME, action, err);
                self.set_tx(TxState::Failed {
                    reason: message.clone(),
                });
                self.notifier.notify(Notification::error(message));
                Err(SubmitError::Contract(err))
            }
        }
    }

    /// Stops listening for events. A write already in flight still settles.
    pub fn unmount(&self) {
        self.reconciler.borrow_mut().detach();
        info!("{}: unmounted", C::NAME);
    }

    async fn write(&self, action: &C::Action) -> Result<TxReceipt, ContractError> {
        let pending = self.client.send_action(action).await?;
        self.set_tx(TxState::Pending {
            tx_hash: pending.tx_hash().to_string(),
        });
        pending.confirm().await
    }

    /// Listens before reading, so events emitted while the read is in
    /// flight are merged into its result instead of lost.
    async fn sync(self: &Rc<Self>) {
        self.listen();
        self.refresh().await;
    }

    fn listen(self: &Rc<Self>) {
        let hooks = self.hooks();
        let mut reconciler = self.reconciler.borrow_mut();
        if reconciler.is_attached() {
            return;
        }
        if let Err(err) = reconciler.attach(&hooks) {
            warn!("{}: live updates unavailable: {}", C::NAME, err);
        }
    }

    fn hooks(self: &Rc<Self>) -> ReconcilerHooks {
        let notifier = Rc::clone(&self.notifier);
        let spawner = Rc::clone(&self.spawner);
        let this: Weak<Self> = Rc::downgrade(self);

        ReconcilerHooks {
            on_notice: Rc::new(move |notice: Notification| notifier.notify(notice)),
            on_refetch: Rc::new(move || {
                let this = this.clone();
                spawner.spawn(Box::pin(async move {
                    if let Some(controller) = this.upgrade() {
                        controller.refresh().await;
                    }
                }));
            }),
        }
    }

    fn report_connect_failure(&self, err: &ConnectError) {
        match err {
            ConnectError::WalletUnavailable => {
                warn!("{}: no wallet provider", C::NAME);
                self.notifier.alert(&err.to_string());
            }
            err if err.is_user_rejection() => {
                info!("{}: connection request rejected in wallet", C::NAME)
            }
            ConnectError::Provider(ProviderError::Rpc { message, .. })
                if !message.trim().is_empty() =>
            {
                warn!("{}: connect failed: {}", C::NAME, err);
                self.notifier.notify(Notification::error(message.trim()));
            }
            _ => {
                warn!("{}: connect failed: {}", C::NAME, err);
                self.notifier.notify(Notification::error(CONNECT_FAILURE));
            }
        }
    }

    fn set_account(&self, account: WalletAddress) {
        *self.account.borrow_mut() = Some(account);
        self.changed();
    }

    fn set_tx(&self, state: TxState) {
        *self.tx.borrow_mut() = state;
        self.changed();
    }

    fn changed(&self) {
        let observers: Vec<Rc<dyn Fn()>> = self.observers.borrow().clone();
        for observer in observers {
            observer();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;
    use crate::spawn::QueueSpawner;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use wv_api_types::{Candidate, NotificationKind, RecordId, WaveMessage};
    use wv_contract::{
        EventHandler, InMemoryBackend, ListenerId, SendOutcome, TxHash, TxOverrides, VoteAction,
        VotingApp, WaveAction, WavePortal,
    };
    use wv_wallet::StaticWalletProvider;

    const ALICE: &str = "0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B";

    struct Harness<C, B>
    where
        C: ContractInterface,
        B: ContractBackend + EventSource,
    {
        controller: Rc<DappController<C, StaticWalletProvider, B>>,
        backend: Rc<B>,
        notifier: Rc<RecordingNotifier>,
        spawner: Rc<QueueSpawner>,
    }

    fn harness<C, B>(provider: Option<StaticWalletProvider>, backend: B) -> Harness<C, B>
    where
        C: ContractInterface,
        C::Event: Reduce<C::Record>,
        B: ContractBackend + EventSource + 'static,
    {
        let backend = Rc::new(backend);
        let notifier = Rc::new(RecordingNotifier::default());
        let spawner = Rc::new(QueueSpawner::default());
        let controller = DappController::new(
            WalletConnector::new(provider),
            ContractClient::new(Rc::clone(&backend)),
            Rc::clone(&notifier) as Rc<dyn Notifier>,
            Rc::clone(&spawner) as Rc<dyn Spawner>,
        );
        Harness {
            controller,
            backend,
            notifier,
            spawner,
        }
    }

    fn authorized() -> Option<StaticWalletProvider> {
        Some(StaticWalletProvider::authorized(vec![ALICE.to_owned()]))
    }

    fn first_wave() -> WaveMessage {
        WaveMessage {
            address: WalletAddress(ALICE.to_owned()),
            timestamp: 10,
            message: "first".to_owned(),
        }
    }

    fn wave_backend() -> InMemoryBackend {
        let backend = InMemoryBackend::default();
        backend.set_read(
            "getAllWaves",
            json!([{ "waver": ALICE, "timestamp": { "_hex": "0x0a" }, "message": "first" }]),
        );
        backend.set_read("getTotalWaves", json!({ "_hex": "0x01" }));
        backend
    }

    fn vote_backend() -> InMemoryBackend {
        let backend = InMemoryBackend::default();
        backend.set_read("getAllCandidates", json!([[0, "Ada", 2], [1, "Grace", 0]]));
        backend
    }

    fn wave(message: &str) -> WaveAction {
        WaveAction::Wave {
            message: message.to_owned(),
        }
    }

    /// Lets other futures run between the wallet accepting a write and the
    /// hash coming back.
    struct YieldingBackend(InMemoryBackend);

    #[async_trait(?Send)]
    impl ContractBackend for YieldingBackend {
        async fn call(&self, method: &str, args: &[Value]) -> Result<Value, ContractError> {
            self.0.call(method, args).await
        }

        async fn send(
            &self,
            method: &str,
            args: &[Value],
            overrides: &TxOverrides,
        ) -> Result<TxHash, ContractError> {
            tokio::task::yield_now().await;
            self.0.send(method, args, overrides).await
        }

        async fn wait(&self, tx_hash: &TxHash) -> Result<TxReceipt, ContractError> {
            self.0.wait(tx_hash).await
        }
    }

    impl EventSource for YieldingBackend {
        fn on(&self, event: &str, handler: EventHandler) -> Result<ListenerId, ContractError> {
            self.0.on(event, handler)
        }

        fn off(&self, listener: ListenerId) {
            self.0.off(listener)
        }
    }

    /// Delivers one event while a chosen read is in flight, before the read
    /// returns what the backend held when it started.
    struct RacingBackend {
        inner: InMemoryBackend,
        race: RefCell<Option<(&'static str, &'static str, Vec<Value>)>>,
    }

    impl RacingBackend {
        fn new(inner: InMemoryBackend) -> Self {
            Self {
                inner,
                race: RefCell::new(None),
            }
        }

        fn during(&self, method: &'static str, event: &'static str, payload: Vec<Value>) {
            *self.race.borrow_mut() = Some((method, event, payload));
        }
    }

    #[async_trait(?Send)]
    impl ContractBackend for RacingBackend {
        async fn call(&self, method: &str, args: &[Value]) -> Result<Value, ContractError> {
            let raced = {
                let mut race = self.race.borrow_mut();
                let hit = race.as_ref().is_some_and(|(read, ..)| *read == method);
                if hit { race.take() } else { None }
            };
            if let Some((_, event, payload)) = raced {
                self.inner.emit(event, payload);
            }
            self.inner.call(method, args).await
        }

        async fn send(
            &self,
            method: &str,
            args: &[Value],
            overrides: &TxOverrides,
        ) -> Result<TxHash, ContractError> {
            self.inner.send(method, args, overrides).await
        }

        async fn wait(&self, tx_hash: &TxHash) -> Result<TxReceipt, ContractError> {
            self.inner.wait(tx_hash).await
        }
    }

    impl EventSource for RacingBackend {
        fn on(&self, event: &str, handler: EventHandler) -> Result<ListenerId, ContractError> {
            self.inner.on(event, handler)
        }

        fn off(&self, listener: ListenerId) {
            self.inner.off(listener)
        }
    }

    fn messages(view: &ViewState<WaveMessage>) -> Vec<&str> {
        view.records.iter().map(|w| w.message.as_str()).collect()
    }

    #[tokio::test]
    async fn authorized_account_shows_the_form() {
        let h = harness::<WavePortal, _>(authorized(), wave_backend());
        h.controller.mount().await;

        let view = h.controller.view();
        assert_eq!(view.account, Some(WalletAddress(ALICE.to_owned())));
        assert!(view.show_form);
        assert!(!view.show_connect_button);
        assert!(view.submit_enabled);
        assert_eq!(view.records, vec![first_wave()]);
        assert_eq!(view.count, Some(1));
        assert_eq!(h.backend.listener_count("NewWave"), 1);
    }

    #[tokio::test]
    async fn unauthorized_mount_waits_for_connect() {
        let provider = StaticWalletProvider::new(vec![ALICE.to_owned()]);
        let h = harness::<WavePortal, _>(Some(provider), wave_backend());
        h.controller.mount().await;

        let view = h.controller.view();
        assert!(view.show_connect_button);
        assert!(!view.show_form);
        assert_eq!(h.backend.read_calls(), 0);
        assert_eq!(h.backend.listener_count("NewWave"), 0);
    }

    #[tokio::test]
    async fn missing_wallet_alerts_and_keeps_the_account() {
        let h = harness::<WavePortal, _>(None, wave_backend());

        let result = h.controller.connect().await;

        assert_eq!(result, Err(ConnectError::WalletUnavailable));
        assert_eq!(h.notifier.alerts(), vec!["Get MetaMask!".to_owned()]);
        assert!(h.notifier.notifications().is_empty());
        assert_eq!(h.controller.account(), None);
        assert!(h.controller.view().show_connect_button);
    }

    #[tokio::test]
    async fn rejected_connection_is_only_logged() {
        let provider = StaticWalletProvider::new(vec![ALICE.to_owned()]);
        provider.reject_connections(true);
        let h = harness::<WavePortal, _>(Some(provider), wave_backend());

        let err = match h.controller.connect().await {
            Err(err) => err,
            Ok(account) => panic!("connected as {account}"),
        };

        assert!(err.is_user_rejection());
        assert!(h.notifier.notifications().is_empty());
        assert!(h.notifier.alerts().is_empty());
        assert_eq!(h.controller.account(), None);
    }

    #[tokio::test]
    async fn connect_loads_records_and_listens() {
        let provider = StaticWalletProvider::new(vec![ALICE.to_owned()]);
        let h = harness::<WavePortal, _>(Some(provider), wave_backend());

        let account = h.controller.connect().await.expect("connect");

        assert_eq!(account, WalletAddress(ALICE.to_owned()));
        assert_eq!(
            h.notifier.notifications(),
            vec![Notification::success("Wallet Connected")]
        );
        let view = h.controller.view();
        assert!(view.show_form);
        assert_eq!(view.records, vec![first_wave()]);
        assert_eq!(h.backend.listener_count("NewWave"), 1);
    }

    #[tokio::test]
    async fn submit_is_disabled_until_each_write_settles() {
        let h = harness::<WavePortal, _>(authorized(), wave_backend());
        h.controller.mount().await;

        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let seen = Rc::clone(&seen);
            let controller = Rc::downgrade(&h.controller);
            h.controller.observe(move || {
                if let Some(controller) = controller.upgrade() {
                    seen.borrow_mut().push(controller.view().submit_enabled);
                }
            });
        }

        h.controller.submit(wave("one")).await.expect("first write");
        h.backend
            .push_send_outcome(SendOutcome::Reject(ContractError::Reverted { reason: None }));
        assert!(h.controller.submit(wave("two")).await.is_err());

        // Submitting, Pending, Confirmed, then Submitting, Failed.
        assert_eq!(*seen.borrow(), vec![false, false, true, false, true]);
    }

    #[tokio::test]
    async fn second_submit_while_in_flight_is_rejected() {
        let h = harness::<WavePortal, _>(authorized(), YieldingBackend(wave_backend()));
        h.controller.mount().await;

        let (first, second) = tokio::join!(
            h.controller.submit(wave("one")),
            h.controller.submit(wave("two"))
        );

        assert!(first.is_ok());
        assert_eq!(second.err(), Some(SubmitError::Busy));
        assert_eq!(h.backend.0.sent().len(), 1);
        assert!(h.controller.view().submit_enabled);
    }

    #[tokio::test]
    async fn successful_wave_is_announced_then_appended_by_its_event() {
        let h = harness::<WavePortal, _>(authorized(), wave_backend());
        h.controller.mount().await;

        let receipt = h.controller.submit(wave("hello")).await.expect("submit");

        let sent = h.backend.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, "wave");
        assert_eq!(sent[0].args, vec![json!("hello")]);
        assert_eq!(sent[0].overrides.gas_limit, Some(300_000));
        assert_eq!(
            h.controller.tx_state(),
            TxState::Confirmed {
                tx_hash: receipt.tx_hash.to_string()
            }
        );
        assert_eq!(
            h.notifier.notifications(),
            vec![Notification::success("Wave sent")]
        );
        assert_eq!(h.controller.view().records, vec![first_wave()]);

        h.backend
            .emit("NewWave", vec![json!(ALICE), json!(20), json!("hello")]);

        let records = h.controller.view().records;
        assert_eq!(records.len(), 2);
        assert_eq!(records.last().map(|w| w.message.as_str()), Some("hello"));
    }

    #[tokio::test]
    async fn revert_reason_reaches_the_user_and_records_stay() {
        let h = harness::<WavePortal, _>(authorized(), wave_backend());
        h.controller.mount().await;
        let before = h.controller.view().records;

        let payload = json!({
            "code": -32603,
            "data": { "message": "execution reverted: insufficient funds" }
        });
        h.backend
            .push_send_outcome(SendOutcome::Reject(ContractError::from_write_error(&payload)));
        let err = match h.controller.submit(wave("hello")).await {
            Err(err) => err,
            Ok(receipt) => panic!("unexpected receipt {receipt:?}"),
        };

        assert_eq!(
            err,
            SubmitError::Contract(ContractError::Reverted {
                reason: Some("insufficient funds".to_owned())
            })
        );
        let last = h.notifier.notifications().pop().expect("notified");
        assert_eq!(last.kind, NotificationKind::Error);
        assert!(last.message.contains("insufficient funds"));

        let view = h.controller.view();
        assert_eq!(view.records, before);
        assert_eq!(
            view.tx,
            TxState::Failed {
                reason: "insufficient funds".to_owned()
            }
        );
        assert!(view.submit_enabled);
    }

    #[tokio::test]
    async fn failure_without_reason_uses_the_action_fallback() {
        let h = harness::<VotingApp, _>(authorized(), vote_backend());
        h.controller.mount().await;

        h.backend.push_send_outcome(SendOutcome::RevertOnChain);
        let result = h
            .controller
            .submit(VoteAction::AddCandidate {
                name: "Linus".to_owned(),
            })
            .await;

        assert!(result.is_err());
        assert_eq!(
            h.notifier.notifications(),
            vec![Notification::error("Could not add new candidate")]
        );
    }

    #[tokio::test]
    async fn vote_for_an_unknown_candidate_refetches_in_the_background() {
        let h = harness::<VotingApp, _>(authorized(), vote_backend());
        h.controller.mount().await;
        assert_eq!(h.controller.view().count, Some(2));

        h.backend.set_read(
            "getAllCandidates",
            json!([[0, "Ada", 2], [1, "Grace", 0], [2, "Linus", 1]]),
        );
        h.backend
            .emit("NewVote", vec![json!("Linus"), json!(2), json!(1)]);

        assert_eq!(h.spawner.pending(), 1);
        assert_eq!(h.controller.view().records.len(), 2);

        h.spawner.run_all().await;

        let view = h.controller.view();
        assert_eq!(view.count, Some(3));
        assert_eq!(
            view.records.last(),
            Some(&Candidate {
                id: RecordId(2),
                name: "Linus".to_owned(),
                votes: 1
            })
        );
        assert!(h
            .notifier
            .notifications()
            .contains(&Notification::info("New vote")));
    }

    #[tokio::test]
    async fn read_failures_leave_state_alone() {
        let backend = InMemoryBackend::default();
        backend.fail_read("getAllWaves", ContractError::Provider("timeout".to_owned()));
        backend.fail_read("getTotalWaves", ContractError::Provider("timeout".to_owned()));
        let h = harness::<WavePortal, _>(authorized(), backend);

        h.controller.mount().await;

        let view = h.controller.view();
        assert!(view.show_form);
        assert!(view.records.is_empty());
        assert_eq!(view.count, None);
        assert!(h.notifier.notifications().is_empty());
    }

    #[tokio::test]
    async fn unmount_stops_event_updates() {
        let h = harness::<WavePortal, _>(authorized(), wave_backend());
        h.controller.mount().await;

        h.controller.unmount();
        h.backend
            .emit("NewWave", vec![json!(ALICE), json!(20), json!("late")]);

        assert_eq!(h.backend.listener_count("NewWave"), 0);
        assert_eq!(h.controller.view().records, vec![first_wave()]);
    }

    #[tokio::test]
    async fn submit_requires_an_account() {
        let h = harness::<WavePortal, _>(Some(StaticWalletProvider::default()), wave_backend());

        let result = h.controller.submit(wave("hello")).await;

        assert_eq!(result.err(), Some(SubmitError::NotConnected));
        assert!(h.backend.sent().is_empty());
    }

    #[tokio::test]
    async fn wave_emitted_during_the_bulk_read_is_kept() {
        let backend = RacingBackend::new(wave_backend());
        backend.during(
            "getAllWaves",
            "NewWave",
            vec![json!(ALICE), json!(20), json!("raced")],
        );
        let h = harness::<WavePortal, _>(authorized(), backend);

        h.controller.mount().await;

        let view = h.controller.view();
        assert_eq!(messages(&view), vec!["first", "raced"]);
        assert_eq!(view.count, Some(2));
    }

    #[tokio::test]
    async fn wave_emitted_during_the_count_read_is_kept() {
        let backend = RacingBackend::new(wave_backend());
        backend.during(
            "getTotalWaves",
            "NewWave",
            vec![json!(ALICE), json!(20), json!("raced")],
        );
        let h = harness::<WavePortal, _>(authorized(), backend);

        h.controller.mount().await;

        let view = h.controller.view();
        assert_eq!(messages(&view), vec!["first", "raced"]);
        assert_eq!(view.count, Some(2));
    }

    #[tokio::test]
    async fn vote_during_a_refetch_keeps_the_newer_tally() {
        let h = harness::<VotingApp, _>(authorized(), RacingBackend::new(vote_backend()));
        h.controller.mount().await;

        // The refetch reads Ada's tally from before her third vote.
        h.backend.inner.set_read(
            "getAllCandidates",
            json!([[0, "Ada", 2], [1, "Grace", 0], [2, "Linus", 1]]),
        );
        h.backend.during(
            "getAllCandidates",
            "NewVote",
            vec![json!("Ada"), json!(0), json!(3)],
        );
        h.backend
            .inner
            .emit("NewVote", vec![json!("Linus"), json!(2), json!(1)]);
        h.spawner.run_all().await;

        let tallies: Vec<(String, u64)> = h
            .controller
            .view()
            .records
            .into_iter()
            .map(|c| (c.name, c.votes))
            .collect();
        assert_eq!(
            tallies,
            vec![
                ("Ada".to_owned(), 3),
                ("Grace".to_owned(), 0),
                ("Linus".to_owned(), 1),
            ]
        );
    }

    #[tokio::test]
    async fn identical_waves_from_the_read_are_all_listed() {
        let backend = InMemoryBackend::default();
        backend.set_read("getAllWaves", json!([[ALICE, 10, "gm"], [ALICE, 10, "gm"]]));
        backend.set_read("getTotalWaves", json!(2));
        let h = harness::<WavePortal, _>(authorized(), backend);

        h.controller.mount().await;

        let view = h.controller.view();
        assert_eq!(messages(&view), vec!["gm", "gm"]);
        assert_eq!(view.count, Some(2));
    }

    #[tokio::test]
    async fn wave_count_follows_later_events() {
        let h = harness::<WavePortal, _>(authorized(), wave_backend());
        h.controller.mount().await;
        assert_eq!(h.controller.view().count, Some(1));

        h.backend
            .emit("NewWave", vec![json!(ALICE), json!(20), json!("second")]);

        let view = h.controller.view();
        assert_eq!(view.records.len(), 2);
        assert_eq!(view.count, Some(2));
    }
}
