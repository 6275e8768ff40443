use super::TokenService;
use crate::request::{FetchState, RequestSlot};
use std::sync::Arc;
use suitrump_domain::entities::TokenInfo;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Token list of the selected account.
///
/// Switching accounts replaces the fetch in flight; a response for an
/// account that is no longer selected never reaches the state.
pub struct WalletView {
    tokens: Arc<TokenService>,
    slot: RequestSlot,
    owner: RwLock<Option<String>>,
    state: RwLock<FetchState<Vec<TokenInfo>>>,
}

impl WalletView {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self {
            tokens,
            slot: RequestSlot::new(),
            owner: RwLock::new(None),
            state: RwLock::new(FetchState::Idle),
        }
    }

    pub async fn state(&self) -> FetchState<Vec<TokenInfo>> {
        self.state.read().await.clone()
    }

    pub async fn owner(&self) -> Option<String> {
        self.owner.read().await.clone()
    }

    /// Selects `owner` and loads its tokens.
    ///
    /// Resolves once this fetch finishes or is superseded by a later call.
    pub async fn select_account(&self, owner: &str) {
        let tokens = self.tokens.clone();
        let account = owner.to_string();
        let handle = self
            .slot
            .spawn(async move { tokens.wallet_tokens(&account).await })
            .await;
        let ticket = handle.ticket();

        {
            let mut state = self.state.write().await;
            if !self.slot.is_current(ticket) {
                return;
            }
            *self.owner.write().await = Some(owner.to_string());
            *state = FetchState::Loading;
        }

        let Some(result) = handle.result().await else {
            return;
        };
        let mut state = self.state.write().await;
        if !self.slot.is_current(ticket) {
            debug!(owner = owner, "Discarding tokens for deselected account");
            return;
        }
        *state = match result {
            Ok(list) => {
                info!(owner = owner, count = list.len(), "Wallet tokens loaded");
                FetchState::Ready(list)
            }
            Err(e) => FetchState::Failed(e.to_string()),
        };
    }

    /// Clears the selection and aborts the fetch in flight.
    pub async fn disconnect(&self) {
        let mut state = self.state.write().await;
        self.slot.cancel().await;
        *self.owner.write().await = None;
        *state = FetchState::Idle;
    }
}
