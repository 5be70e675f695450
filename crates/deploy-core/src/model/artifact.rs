//! Especificación declarativa de un artifact desplegable.
//!
//! Un `ArtifactSpec` es dato puro: nombre, bytecode a publicar, argumentos de
//! constructor, librerías enlazadas (rol -> nombre de artifact) y la semilla
//! de la salt determinista. El registro los ordena; el orquestador los
//! recorre.
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Argumento de constructor.
///
/// - `Value`: literal JSON.
/// - `Account`: rol de cuenta nombrada, resuelto por red en tiempo de publicación.
/// - `AddressOf`: ubicación publicada de otro artifact. Impone orden, pero no
///   es un enlace de librería.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ConstructorArg {
    Value(Value),
    Account(String),
    AddressOf(String),
}

impl ConstructorArg {
    pub fn value(v: impl Into<Value>) -> Self {
        Self::Value(v.into())
    }

    pub fn account(role: impl Into<String>) -> Self {
        Self::Account(role.into())
    }

    pub fn address_of(artifact: impl Into<String>) -> Self {
        Self::AddressOf(artifact.into())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactSpec {
    pub name: String,
    /// Artifact compilado a publicar (por defecto, el propio nombre).
    pub bytecode_ref: String,
    pub constructor_args: Vec<ConstructorArg>,
    /// Rol de enlace -> nombre del artifact del que depende.
    pub dependencies: BTreeMap<String, String>,
    pub salt_seed: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl ArtifactSpec {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self { bytecode_ref: name.clone(),
               salt_seed: name.clone(),
               name,
               constructor_args: Vec::new(),
               dependencies: BTreeMap::new(),
               tags: BTreeSet::new() }
    }

    pub fn bytecode(mut self, bytecode_ref: impl Into<String>) -> Self {
        self.bytecode_ref = bytecode_ref.into();
        self
    }

    pub fn arg(mut self, arg: ConstructorArg) -> Self {
        self.constructor_args.push(arg);
        self
    }

    pub fn args<I>(mut self, args: I) -> Self
        where I: IntoIterator<Item = ConstructorArg>
    {
        self.constructor_args.extend(args);
        self
    }

    pub fn library(mut self, role: impl Into<String>, artifact: impl Into<String>) -> Self {
        self.dependencies.insert(role.into(), artifact.into());
        self
    }

    pub fn salt_seed(mut self, seed: impl Into<String>) -> Self {
        self.salt_seed = seed.into();
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Artifacts que deben estar publicados antes que éste: librerías
    /// enlazadas más los `AddressOf` de los argumentos.
    pub fn ordering_edges(&self) -> impl Iterator<Item = &str> {
        self.dependencies
            .values()
            .map(String::as_str)
            .chain(self.constructor_args.iter().filter_map(|a| match a {
                                                   ConstructorArg::AddressOf(name) => Some(name.as_str()),
                                                   _ => None,
                                               }))
    }

    /// Roles de cuentas nombradas referenciados por los argumentos.
    pub fn account_roles(&self) -> impl Iterator<Item = &str> {
        self.constructor_args.iter().filter_map(|a| match a {
                                        ConstructorArg::Account(role) => Some(role.as_str()),
                                        _ => None,
                                    })
    }
}
