use wv_api_types::{TxState, WalletAddress};

/// Everything a render needs, derived in one place so the visibility rules
/// cannot drift between pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState<R> {
    pub account: Option<WalletAddress>,
    pub show_connect_button: bool,
    pub show_form: bool,
    pub records: Vec<R>,
    pub submit_enabled: bool,
    pub tx: TxState,
    pub count: Option<u64>,
}

impl<R> ViewState<R> {
    pub fn derive(
        account: Option<WalletAddress>,
        records: Vec<R>,
        tx: TxState,
        count: Option<u64>,
    ) -> Self {
        let connected = account.is_some();
        Self {
            show_connect_button: !connected,
            show_form: connected,
            submit_enabled: connected && !tx.in_flight(),
            account,
            records,
            tx,
            count,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.tx.in_flight()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Option<WalletAddress> {
        Some(WalletAddress("0xAbC0000000000000000000000000000000000001".into()))
    }

    #[test]
    fn connect_button_and_form_are_exclusive() {
        let disconnected: ViewState<()> = ViewState::derive(None, vec![], TxState::Idle, None);
        assert!(disconnected.show_connect_button);
        assert!(!disconnected.show_form);
        assert!(!disconnected.submit_enabled);

        let connected: ViewState<()> = ViewState::derive(alice(), vec![], TxState::Idle, None);
        assert!(!connected.show_connect_button);
        assert!(connected.show_form);
        assert!(connected.submit_enabled);
    }

    #[test]
    fn in_flight_writes_disable_submit() {
        let states = [
            (TxState::Submitting, false),
            (
                TxState::Pending {
                    tx_hash: "0x01".into(),
                },
                false,
            ),
            (
                TxState::Confirmed {
                    tx_hash: "0x01".into(),
                },
                true,
            ),
            (
                TxState::Failed {
                    reason: "nope".into(),
                },
                true,
            ),
        ];
        for (tx, enabled) in states {
            let view: ViewState<()> = ViewState::derive(alice(), vec![], tx.clone(), None);
            assert_eq!(view.submit_enabled, enabled, "{tx:?}");
            assert_eq!(view.is_loading(), !enabled);
        }
    }
}
