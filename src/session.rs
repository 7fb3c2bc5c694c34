//! Login gate and the single kiosk session.

use crate::error::AuthError;
use crate::models::Identity;
use crate::store::JsonStore;

/// Checks credentials against the user document.
#[derive(Debug, Clone)]
pub struct AuthGate {
    store: JsonStore,
}

impl AuthGate {
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    /// Validate `identifier`/`secret`. The secret is compared byte-for-byte and
    /// the same error is returned whether the account or the secret is wrong.
    pub fn authenticate(&self, identifier: &str, secret: &str) -> Result<Identity, AuthError> {
        let doc = self.store.load_users()?;
        match doc.users.get(identifier) {
            Some(record) if record.password == secret => {
                tracing::info!(user = identifier, "login succeeded");
                Ok(Identity::new(identifier))
            }
            _ => {
                tracing::warn!("login rejected");
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}

/// Who is currently using the kiosk, if anyone.
#[derive(Debug, Default)]
pub struct Session {
    identity: Option<Identity>,
}

impl Session {
    /// Authenticate and, on success, replace the current identity. A failed
    /// attempt leaves the session logged out.
    pub fn login(
        &mut self,
        gate: &AuthGate,
        identifier: &str,
        secret: &str,
    ) -> Result<&Identity, AuthError> {
        self.identity = None;
        let identity = gate.authenticate(identifier, secret)?;
        Ok(self.identity.insert(identity))
    }

    pub fn logout(&mut self) -> Option<Identity> {
        let identity = self.identity.take();
        if let Some(identity) = &identity {
            tracing::info!(user = identity.as_str(), "logged out");
        }
        identity
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}
