//! `Authenticator`: mints API keys for an app and validates presented keys.
//!
//! Every failure path collapses to a single deny outcome rather than a bag
//! of partially-specific errors, so callers can't accidentally branch on
//! the wrong one.

use std::sync::Arc;
use thiserror::Error;

use logcore::{AppId, ServerId, Tenant};
use logcrypto::Crypto;
use tenant_registry::TenantRegistry;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("no server is registered for this application")]
    NoServerRegistered,

    #[error("presented API key is invalid")]
    Invalid,

    #[error("tenant registry is unavailable")]
    RegistryUnavailable,
}

/// Issues and validates API keys bound to exactly one `(app_id, server_id)`
/// pair, backed by a [`TenantRegistry`] and a [`Crypto`] key.
pub struct Authenticator<R: TenantRegistry> {
    crypto: Arc<Crypto>,
    registry: R,
}

impl<R: TenantRegistry> Authenticator<R> {
    pub fn new(crypto: Arc<Crypto>, registry: R) -> Self {
        Self { crypto, registry }
    }

    /// Mint a fresh API key for `app_id`, bound to any currently-registered
    /// server of that app (spec §4.3: "implementation may pick the first").
    pub async fn issue(&self, app_id: AppId) -> Result<String, AuthError> {
        let servers = self
            .registry
            .servers_of(app_id)
            .await
            .map_err(|_| AuthError::RegistryUnavailable)?;

        let server_id = servers
            .into_iter()
            .next()
            .ok_or(AuthError::NoServerRegistered)?;

        let plaintext = format!("{app_id}:{server_id}");
        let api_key = self
            .crypto
            .encrypt(&plaintext)
            .map_err(|_| AuthError::Invalid)?;

        self.registry
            .record_issued_key(app_id, &api_key)
            .await
            .map_err(|_| AuthError::RegistryUnavailable)?;

        Ok(api_key)
    }

    /// Validate a presented API key, resolving it to its tenant.
    ///
    /// Never panics or propagates an adapter error as anything other than
    /// [`AuthError::Invalid`] / [`AuthError::RegistryUnavailable`] — per
    /// spec §4.3, `validate` must never throw.
    pub async fn validate(&self, api_key: &str) -> Result<Tenant, AuthError> {
        if api_key.is_empty() {
            return Err(AuthError::Invalid);
        }

        let plaintext = self.crypto.decrypt(api_key).map_err(|_| AuthError::Invalid)?;

        let (app_raw, server_raw) = split_exactly_one_colon(&plaintext).ok_or(AuthError::Invalid)?;

        let app_id: AppId = app_raw.parse().map_err(|_| AuthError::Invalid)?;
        let server_id = ServerId::new(server_raw);

        if !self
            .registry
            .app_exists(app_id)
            .await
            .map_err(|_| AuthError::RegistryUnavailable)?
        {
            return Err(AuthError::Invalid);
        }

        let issued = self
            .registry
            .api_key_issued(app_id, api_key)
            .await
            .map_err(|_| AuthError::RegistryUnavailable)?;

        if issued {
            return Ok(Tenant::new(app_id, server_id));
        }

        // Legacy fallback (spec §4.3 policy b): the issuance row may be gone
        // while the (app, server) relation still holds.
        let servers = self
            .registry
            .servers_of(app_id)
            .await
            .map_err(|_| AuthError::RegistryUnavailable)?;

        if servers.contains(&server_id) {
            Ok(Tenant::new(app_id, server_id))
        } else {
            Err(AuthError::Invalid)
        }
    }
}

/// Split `"a:b"` into `("a", "b")`, requiring exactly one separator.
fn split_exactly_one_colon(s: &str) -> Option<(&str, &str)> {
    let mut parts = s.splitn(2, ':');
    let first = parts.next()?;
    let rest = parts.next()?;
    if rest.contains(':') {
        return None;
    }
    Some((first, rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use logcore::AppId;
    use tenant_registry::InMemoryTenantRegistry;

    fn authenticator() -> Authenticator<InMemoryTenantRegistry> {
        let crypto = Arc::new(Crypto::new(&[7u8; 32]).unwrap());
        Authenticator::new(crypto, InMemoryTenantRegistry::new())
    }

    #[tokio::test]
    async fn issued_key_validates_back_to_its_tenant() {
        let auth = authenticator();
        let app = AppId::new();
        auth.registry.register_server(app, ServerId::new("srv-1"));

        let key = auth.issue(app).await.unwrap();
        let tenant = auth.validate(&key).await.unwrap();

        assert_eq!(tenant.app_id, app);
        assert_eq!(tenant.server_id, ServerId::new("srv-1"));
    }

    #[tokio::test]
    async fn random_string_is_invalid() {
        let auth = authenticator();
        assert_eq!(auth.validate("not-a-real-token").await, Err(AuthError::Invalid));
    }

    #[tokio::test]
    async fn empty_key_is_invalid() {
        let auth = authenticator();
        assert_eq!(auth.validate("").await, Err(AuthError::Invalid));
    }

    #[tokio::test]
    async fn key_minted_under_a_different_crypto_key_is_invalid() {
        let auth = authenticator();
        let app = AppId::new();
        auth.registry.register_server(app, ServerId::new("srv-1"));

        let other_crypto = Crypto::new(&[9u8; 32]).unwrap();
        let foreign_key = other_crypto.encrypt(&format!("{app}:srv-1")).unwrap();

        assert_eq!(auth.validate(&foreign_key).await, Err(AuthError::Invalid));
    }

    #[tokio::test]
    async fn legacy_key_validates_when_issuance_row_was_deleted() {
        let auth = authenticator();
        let app = AppId::new();
        auth.registry.register_server(app, ServerId::new("srv-1"));

        let key = auth.issue(app).await.unwrap();
        auth.registry.forget_issued_key(app, &key);

        let tenant = auth.validate(&key).await.unwrap();
        assert_eq!(tenant.server_id, ServerId::new("srv-1"));
    }

    #[tokio::test]
    async fn rejects_plaintext_with_no_colon_separator() {
        let auth = authenticator();
        let app = AppId::new();
        auth.registry.register_server(app, ServerId::new("srv-1"));

        let bad = auth.crypto.encrypt(&app.to_string()).unwrap();
        assert_eq!(auth.validate(&bad).await, Err(AuthError::Invalid));
    }
}
