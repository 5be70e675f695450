//! Registro de artifacts: descripción estática del DAG a desplegar.
//!
//! El registro se valida completo al construirse (nombres duplicados,
//! dependencias desconocidas, ciclos) y calcula una única vez el orden
//! topológico. Después es inmutable.

mod order;

pub use order::topological_order;

use std::collections::BTreeSet;

use serde_json::json;

use crate::errors::RegistryError;
use crate::hashing::hash_value;
use crate::model::ArtifactSpec;

#[derive(Debug, Clone)]
pub struct Registry {
    specs: Vec<ArtifactSpec>,
    order: Vec<usize>,
    registry_hash: String,
}

impl Registry {
    /// Valida `specs` (en orden de registro) y construye el registro.
    pub fn new(specs: Vec<ArtifactSpec>) -> Result<Self, RegistryError> {
        let order = topological_order(&specs)?;
        let ordered: Vec<serde_json::Value> = order.iter().map(|&i| json!(specs[i])).collect();
        let registry_hash = hash_value(&json!(ordered));
        Ok(Self { specs, order, registry_hash })
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Specs en orden de dependencias: cada uno aparece después de todos los
    /// artifacts de los que depende. Entre independientes se respeta el orden
    /// de registro.
    pub fn topological_order(&self) -> impl Iterator<Item = &ArtifactSpec> {
        self.order.iter().map(|&i| &self.specs[i])
    }

    /// Specs en orden de registro.
    pub fn specs(&self) -> &[ArtifactSpec] {
        &self.specs
    }

    pub fn get(&self, name: &str) -> Option<&ArtifactSpec> {
        self.specs.iter().find(|s| s.name == name)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Hash del DAG completo (specs canonicalizados en orden topológico).
    pub fn registry_hash(&self) -> &str {
        &self.registry_hash
    }

    /// Todos los roles de cuentas nombradas que referencia algún argumento.
    pub fn account_roles(&self) -> BTreeSet<&str> {
        self.specs.iter().flat_map(|s| s.account_roles()).collect()
    }

    /// Sub-registro con los specs que llevan alguno de `tags` más sus
    /// dependencias transitivas, preservando el orden de registro.
    pub fn select_tags<S: AsRef<str>>(&self, tags: &[S]) -> Result<Self, RegistryError> {
        for t in tags {
            let tag = t.as_ref();
            if !self.specs.iter().any(|s| s.tags.contains(tag)) {
                return Err(RegistryError::UnknownTag(tag.to_string()));
            }
        }
        let mut selected: BTreeSet<&str> = BTreeSet::new();
        let mut pending: Vec<&str> = self.specs
                                         .iter()
                                         .filter(|s| tags.iter().any(|t| s.tags.contains(t.as_ref())))
                                         .map(|s| s.name.as_str())
                                         .collect();
        while let Some(name) = pending.pop() {
            if !selected.insert(name) {
                continue;
            }
            if let Some(spec) = self.get(name) {
                pending.extend(spec.ordering_edges());
            }
        }
        let specs = self.specs.iter().filter(|s| selected.contains(s.name.as_str())).cloned().collect();
        Self::new(specs)
    }
}

/// Acumula specs en orden de registro.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    specs: Vec<ArtifactSpec>,
}

impl RegistryBuilder {
    pub fn register(mut self, spec: ArtifactSpec) -> Self {
        self.specs.push(spec);
        self
    }

    pub fn build(self) -> Result<Registry, RegistryError> {
        Registry::new(self.specs)
    }
}
