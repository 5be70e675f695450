//! Proveedor de cuentas nombradas.
//!
//! Asocia roles lógicos (`deployer`, `endpointv2`, ...) a direcciones
//! concretas de una red. Se entrega al orquestador ya construido: el core no
//! lee entorno ni configuración global.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::ResolveError;
use crate::model::Address;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedAccounts {
    network: String,
    roles: BTreeMap<String, Address>,
}

impl NamedAccounts {
    pub fn new(network: impl Into<String>) -> Self {
        Self { network: network.into(),
               roles: BTreeMap::new() }
    }

    pub fn with(mut self, role: impl Into<String>, address: Address) -> Self {
        self.insert(role, address);
        self
    }

    pub fn insert(&mut self, role: impl Into<String>, address: Address) {
        self.roles.insert(role.into(), address);
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    pub fn get(&self, role: &str) -> Option<&Address> {
        self.roles.get(role)
    }

    /// Igual que `get`, pero falla con `MissingNamedAccount` si el rol no
    /// está definido para la red activa.
    pub fn require(&self, role: &str) -> Result<&Address, ResolveError> {
        self.roles.get(role).ok_or_else(|| ResolveError::MissingNamedAccount { role: role.to_string(),
                                                                                network: self.network.clone() })
    }

    pub fn roles(&self) -> impl Iterator<Item = (&str, &Address)> {
        self.roles.iter().map(|(k, v)| (k.as_str(), v))
    }
}
