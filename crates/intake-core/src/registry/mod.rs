//! Plugin-based backend registry
//!
//! The registry maps backend type names to factories, so record stores and
//! CRM integrations are chosen from configuration instead of hardcoded
//! if-else chains.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use intake_core::registry::BackendRegistry;
//! use intake_core::config::StoreConfig;
//!
//! let registry = BackendRegistry::with_builtins();
//! intake_http::register(&registry);
//!
//! let store = registry.create_store(&StoreConfig::default())?;
//! ```
//!
//! ## Registration
//!
//! Backend crates expose a `register()` function:
//!
//! ```rust,ignore
//! pub fn register(registry: &BackendRegistry) {
//!     registry.register_store("http", Box::new(HttpStoreFactory));
//!     registry.register_integration("http", Box::new(HttpIntegrationFactory));
//! }
//! ```

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::backend::{DisabledIntegrationFactory, MemoryStoreFactory};
use crate::config::{IntegrationConfig, StoreConfig};
use crate::error::{Error, Result};
use crate::traits::{CrmIntegration, CrmIntegrationFactory, RecordStore, RecordStoreFactory};

/// Registry of record store and CRM integration factories
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct BackendRegistry {
    /// Registered record store factories
    stores: RwLock<HashMap<String, Box<dyn RecordStoreFactory>>>,

    /// Registered CRM integration factories
    integrations: RwLock<HashMap<String, Box<dyn CrmIntegrationFactory>>>,
}

impl BackendRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the in-process backends (`memory`, `disabled`)
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        registry.register_store("memory", Box::new(MemoryStoreFactory));
        registry.register_integration("disabled", Box::new(DisabledIntegrationFactory));
        registry
    }

    /// Register a record store factory under `name`
    pub fn register_store(&self, name: impl Into<String>, factory: Box<dyn RecordStoreFactory>) {
        self.stores
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), factory);
    }

    /// Register a CRM integration factory under `name`
    pub fn register_integration(
        &self,
        name: impl Into<String>,
        factory: Box<dyn CrmIntegrationFactory>,
    ) {
        self.integrations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), factory);
    }

    /// Create a record store from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn RecordStore>)`: Created store instance
    /// - `Err(Error)`: If the store type is not registered or creation fails
    pub fn create_store(&self, config: &StoreConfig) -> Result<Box<dyn RecordStore>> {
        let store_type = config.type_name();
        let stores = self.stores.read().unwrap_or_else(PoisonError::into_inner);

        let factory = stores
            .get(store_type)
            .ok_or_else(|| Error::config(format!("Unknown record store type: {}", store_type)))?;

        factory.create(config)
    }

    /// Create a CRM integration from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn CrmIntegration>)`: Created integration instance
    /// - `Err(Error)`: If the integration type is not registered or creation fails
    pub fn create_integration(
        &self,
        config: &IntegrationConfig,
    ) -> Result<Box<dyn CrmIntegration>> {
        let integration_type = config.type_name();
        let integrations = self
            .integrations
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let factory = integrations.get(integration_type).ok_or_else(|| {
            Error::config(format!("Unknown CRM integration type: {}", integration_type))
        })?;

        factory.create(config)
    }

    /// List all registered record store types
    pub fn list_stores(&self) -> Vec<String> {
        let stores = self.stores.read().unwrap_or_else(PoisonError::into_inner);
        stores.keys().cloned().collect()
    }

    /// List all registered CRM integration types
    pub fn list_integrations(&self) -> Vec<String> {
        let integrations = self
            .integrations
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        integrations.keys().cloned().collect()
    }

    pub fn has_store(&self, name: &str) -> bool {
        let stores = self.stores.read().unwrap_or_else(PoisonError::into_inner);
        stores.contains_key(name)
    }

    pub fn has_integration(&self, name: &str) -> bool {
        let integrations = self
            .integrations
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        integrations.contains_key(name)
    }
}
