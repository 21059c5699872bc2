use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use logcore::{AppId, ServerId};

use crate::trait_::{RegistryError, TenantRegistry};

/// In-memory tenant registry for tests and local development.
#[derive(Debug, Default)]
pub struct InMemoryTenantRegistry {
    servers: RwLock<HashMap<AppId, HashSet<ServerId>>>,
    issued_keys: RwLock<HashSet<(AppId, String)>>,
}

impl InMemoryTenantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `server_id` as belonging to `app_id` (test/seed helper).
    pub fn register_server(&self, app_id: AppId, server_id: ServerId) {
        self.servers
            .write()
            .expect("tenant registry lock poisoned")
            .entry(app_id)
            .or_default()
            .insert(server_id);
    }

    /// Remove an issued `(app_id, api_key)` row while leaving the server
    /// registration intact (simulates the legacy-key scenario in spec §8
    /// scenario 6).
    pub fn forget_issued_key(&self, app_id: AppId, api_key: &str) {
        self.issued_keys
            .write()
            .expect("tenant registry lock poisoned")
            .remove(&(app_id, api_key.to_string()));
    }
}

#[async_trait::async_trait]
impl TenantRegistry for InMemoryTenantRegistry {
    async fn app_exists(&self, app_id: AppId) -> Result<bool, RegistryError> {
        Ok(self
            .servers
            .read()
            .expect("tenant registry lock poisoned")
            .contains_key(&app_id))
    }

    async fn servers_of(&self, app_id: AppId) -> Result<HashSet<ServerId>, RegistryError> {
        Ok(self
            .servers
            .read()
            .expect("tenant registry lock poisoned")
            .get(&app_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn api_key_issued(&self, app_id: AppId, api_key: &str) -> Result<bool, RegistryError> {
        Ok(self
            .issued_keys
            .read()
            .expect("tenant registry lock poisoned")
            .contains(&(app_id, api_key.to_string())))
    }

    async fn record_issued_key(&self, app_id: AppId, api_key: &str) -> Result<(), RegistryError> {
        self.issued_keys
            .write()
            .expect("tenant registry lock poisoned")
            .insert((app_id, api_key.to_string()));
        Ok(())
    }
}
