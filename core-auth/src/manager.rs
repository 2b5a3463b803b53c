//! # Credential Manager
//!
//! Owns the single live access token of a gallery session.
//!
//! ## Overview
//!
//! The `CredentialManager` lazily obtains an access token through a
//! [`RefreshTokenExchange`] and hands out clones of it to every index and
//! resolve operation. When a downstream call reports the token invalid, the
//! caller hands the rejected token back through
//! [`refresh_rejected`](CredentialManager::refresh_rejected), which replaces it
//! at most once no matter how many callers saw the same rejection.
//!
//! ## Concurrency
//!
//! The credential slot sits behind one async mutex that is held across the
//! exchange. Callers arriving during an exchange wait for it and then observe
//! its result instead of starting their own. A failed exchange leaves the slot
//! empty and remembers the token it was meant to replace: callers still holding
//! that rejected token receive the same failure rather than a second exchange,
//! while a plain [`get_credential`](CredentialManager::get_credential) starts a
//! new one.
//!
//! ## Usage
//!
//! ```no_run
//! use core_auth::{CredentialManager, RefreshCredentials, RefreshTokenExchange};
//! use core_runtime::events::EventBus;
//! use std::sync::Arc;
//!
//! # async fn example() -> core_auth::Result<()> {
//! # use bridge_traits::http::HttpClient;
//! # let http_client: Arc<dyn HttpClient> = todo!();
//! let exchange = RefreshTokenExchange::new(
//!     RefreshCredentials::new("refresh-token", "app-key", "app-secret"),
//!     "https://api.dropbox.com/oauth2/token",
//!     http_client,
//! );
//! let manager = CredentialManager::new(exchange).with_event_bus(EventBus::default());
//!
//! let token = manager.get_credential().await?;
//! // ... provider rejects `token` ...
//! let fresh = manager.refresh_rejected(&token).await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthError, Result};
use crate::oauth::RefreshTokenExchange;
use crate::types::AccessToken;
use core_runtime::events::{AuthEvent, CoreEvent, EventBus};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument};

#[derive(Default)]
struct CredentialSlot {
    token: Option<AccessToken>,
    /// Rejected token whose replacement failed, and the failure.
    failed: Option<(AccessToken, AuthError)>,
}

/// Cached access token with single-flight refresh.
pub struct CredentialManager {
    exchange: RefreshTokenExchange,
    slot: Mutex<CredentialSlot>,
    event_bus: Option<EventBus>,
    exchanges: AtomicU64,
}

impl CredentialManager {
    pub fn new(exchange: RefreshTokenExchange) -> Self {
        Self {
            exchange,
            slot: Mutex::new(CredentialSlot::default()),
            event_bus: None,
            exchanges: AtomicU64::new(0),
        }
    }

    /// Emit auth events on `event_bus`.
    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    /// Returns the cached token, performing the exchange if none is cached.
    #[instrument(skip(self))]
    pub async fn get_credential(&self) -> Result<AccessToken> {
        let mut slot = self.slot.lock().await;

        if let Some(token) = slot.token.as_ref() {
            return Ok(token.clone());
        }

        self.refresh_locked(&mut slot, None, "initial").await
    }

    /// Discards the cached token and performs a fresh exchange.
    #[instrument(skip(self))]
    pub async fn invalidate_and_refresh(&self) -> Result<AccessToken> {
        let mut slot = self.slot.lock().await;
        slot.token = None;
        self.refresh_locked(&mut slot, None, "forced").await
    }

    /// Replaces `rejected` with a fresh token.
    ///
    /// If the cached token already differs from `rejected`, another caller has
    /// refreshed since `rejected` was handed out and the cached token is
    /// returned without a new exchange. If an exchange replacing `rejected`
    /// already failed, that failure is returned without a new exchange.
    #[instrument(skip(self, rejected))]
    pub async fn refresh_rejected(&self, rejected: &AccessToken) -> Result<AccessToken> {
        let mut slot = self.slot.lock().await;

        match (&slot.token, &slot.failed) {
            (Some(current), _) if current != rejected => {
                debug!("Credential already refreshed by another caller");
                return Ok(current.clone());
            }
            (None, Some((token, error))) if token == rejected => {
                debug!("Refresh for this credential already failed");
                return Err(error.clone());
            }
            _ => {}
        }

        slot.token = None;
        self.refresh_locked(&mut slot, Some(rejected), "rejected")
            .await
    }

    /// Drops the cached token. The next request performs an exchange.
    pub async fn clear(&self) {
        let mut slot = self.slot.lock().await;
        slot.token = None;
        slot.failed = None;
    }

    /// Whether a token is currently cached.
    pub async fn has_credential(&self) -> bool {
        self.slot.lock().await.token.is_some()
    }

    /// Number of exchanges attempted over the manager's lifetime.
    pub fn exchange_count(&self) -> u64 {
        self.exchanges.load(Ordering::SeqCst)
    }

    async fn refresh_locked(
        &self,
        slot: &mut CredentialSlot,
        rejected: Option<&AccessToken>,
        reason: &str,
    ) -> Result<AccessToken> {
        self.exchanges.fetch_add(1, Ordering::SeqCst);
        info!(reason, "Refreshing access token");
        self.emit(AuthEvent::TokenRefreshing {
            reason: reason.to_string(),
        });

        match self.exchange.exchange().await {
            Ok(token) => {
                self.emit(AuthEvent::TokenRefreshed {
                    expires_in: token.expires_in(),
                });
                slot.token = Some(token.clone());
                slot.failed = None;
                Ok(token)
            }
            Err(e) => {
                error!(error = %e, "Token refresh failed");
                self.emit(AuthEvent::AuthError {
                    message: e.to_string(),
                    recoverable: e.is_recoverable(),
                });
                if let Some(rejected) = rejected {
                    slot.failed = Some((rejected.clone(), e.clone()));
                }
                Err(e)
            }
        }
    }

    fn emit(&self, event: AuthEvent) {
        if let Some(bus) = &self.event_bus {
            let _ = bus.emit(CoreEvent::Auth(event));
        }
    }
}
