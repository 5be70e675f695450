//! Resolver de ubicaciones.
//!
//! Funciones puras, sin I/O:
//! - `ResolvedInputs::resolve`: concreta argumentos y enlaces de un spec a
//!   partir de las ubicaciones ya publicadas y las cuentas nombradas.
//! - `deterministic_salt`: salt estable de `(name, salt_seed)`.
//! - `compute_target_location`: dirección objetivo estilo CREATE2 derivada de
//!   la salt y de la codificación canónica de las entradas.

mod salt;

pub use salt::deterministic_salt;

use std::collections::BTreeMap;

use serde_json::{json, Value};

use crate::accounts::NamedAccounts;
use crate::constants::CREATE2_PREFIX;
use crate::errors::ResolveError;
use crate::hashing::{blake3_digest, to_canonical_json};
use crate::model::{Address, ArtifactSpec, ConstructorArg, LibraryBindings, PublishedRecord};

/// Entradas concretas de una publicación.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedInputs {
    pub constructor_args: Vec<Value>,
    pub libraries: LibraryBindings,
}

impl ResolvedInputs {
    pub fn resolve(spec: &ArtifactSpec,
                   locations: &BTreeMap<String, Address>,
                   accounts: &NamedAccounts)
                   -> Result<Self, ResolveError> {
        let location_of = |dependency: &str| {
            locations.get(dependency)
                     .cloned()
                     .ok_or_else(|| ResolveError::UnresolvedDependency { artifact: spec.name.clone(),
                                                                         dependency: dependency.to_string() })
        };

        let mut libraries = LibraryBindings::new();
        for (role, dependency) in &spec.dependencies {
            libraries.insert(role.clone(), location_of(dependency)?);
        }

        let mut constructor_args = Vec::with_capacity(spec.constructor_args.len());
        for arg in &spec.constructor_args {
            let v = match arg {
                ConstructorArg::Value(v) => v.clone(),
                ConstructorArg::Account(role) => Value::String(accounts.require(role)?.to_string()),
                ConstructorArg::AddressOf(dependency) => Value::String(location_of(dependency)?.to_string()),
            };
            constructor_args.push(v);
        }

        Ok(Self { constructor_args, libraries })
    }

    /// ¿Fue `record` publicado con exactamente estas entradas? Compara todo
    /// lo que entra en `compute_target_location`: bytecode, salt, argumentos
    /// y enlaces.
    pub fn matches(&self, spec: &ArtifactSpec, record: &PublishedRecord) -> bool {
        record.bytecode_ref == spec.bytecode_ref
        && record.salt == deterministic_salt(&spec.name, &spec.salt_seed)
        && record.constructor_args_used == self.constructor_args
        && record.libraries_used == self.libraries
    }
}

/// Dirección objetivo de `spec` con las entradas dadas.
///
/// `address = last20(BLAKE3(0xff ‖ salt ‖ BLAKE3(canonical init code)))`.
/// Falla con `UnresolvedDependency` si falta el enlace de algún rol que el
/// spec declara; el orquestador nunca debería llegar a ese caso.
pub fn compute_target_location(spec: &ArtifactSpec, inputs: &ResolvedInputs) -> Result<Address, ResolveError> {
    for (role, dependency) in &spec.dependencies {
        if !inputs.libraries.contains_key(role) {
            return Err(ResolveError::UnresolvedDependency { artifact: spec.name.clone(),
                                                            dependency: dependency.clone() });
        }
    }

    let init_code = json!({
        "bytecode": spec.bytecode_ref,
        "constructor_args": inputs.constructor_args,
        "libraries": inputs.libraries,
    });
    let init_hash = blake3_digest(&[to_canonical_json(&init_code).as_bytes()]);
    let salt = deterministic_salt(&spec.name, &spec.salt_seed);
    let prefix: &[u8] = &[CREATE2_PREFIX];
    let digest = blake3_digest(&[prefix, salt.as_bytes(), init_hash.as_slice()]);

    let mut tail = [0u8; 20];
    tail.copy_from_slice(&digest[12..]);
    Ok(Address::from_bytes(&tail))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accounts() -> NamedAccounts {
        NamedAccounts::new("hardhat").with("deployer", Address::from_bytes(&[0xd0; 20]))
    }

    #[test]
    fn resolve_threads_locations_and_accounts() {
        let spec = ArtifactSpec::new("Crucible").library("IngotSpecLib", "Ingot")
                                                .arg(ConstructorArg::account("deployer"))
                                                .arg(ConstructorArg::address_of("Fee"))
                                                .arg(ConstructorArg::value(7));
        let mut locations = BTreeMap::new();
        locations.insert("Ingot".to_string(), Address::from_bytes(&[1; 20]));
        locations.insert("Fee".to_string(), Address::from_bytes(&[2; 20]));

        let inputs = ResolvedInputs::resolve(&spec, &locations, &accounts()).expect("resolvable");
        assert_eq!(inputs.libraries.get("IngotSpecLib"), Some(&Address::from_bytes(&[1; 20])));
        assert_eq!(inputs.constructor_args,
                   vec![json!(Address::from_bytes(&[0xd0; 20]).to_string()),
                        json!(Address::from_bytes(&[2; 20]).to_string()),
                        json!(7)]);
    }

    #[test]
    fn resolve_reports_missing_pieces() {
        let spec = ArtifactSpec::new("B").library("base", "A");
        assert_eq!(ResolvedInputs::resolve(&spec, &BTreeMap::new(), &accounts()),
                   Err(ResolveError::UnresolvedDependency { artifact: "B".into(),
                                                            dependency: "A".into() }));

        let spec = ArtifactSpec::new("C").arg(ConstructorArg::account("endpointv2"));
        assert!(matches!(ResolvedInputs::resolve(&spec, &BTreeMap::new(), &accounts()),
                         Err(ResolveError::MissingNamedAccount { .. })));
    }

    #[test]
    fn target_location_requires_every_binding() {
        let spec = ArtifactSpec::new("B").library("base", "A");
        let inputs = ResolvedInputs { constructor_args: vec![],
                                      libraries: LibraryBindings::new() };
        assert_eq!(compute_target_location(&spec, &inputs),
                   Err(ResolveError::UnresolvedDependency { artifact: "B".into(),
                                                            dependency: "A".into() }));
    }

    #[test]
    fn matches_tracks_every_addressing_input() {
        let spec = ArtifactSpec::new("Token").salt_seed("v1").arg(ConstructorArg::value(1));
        let inputs = ResolvedInputs::resolve(&spec, &BTreeMap::new(), &accounts()).expect("resolvable");
        let record = PublishedRecord { name: "Token".into(),
                                       location: compute_target_location(&spec, &inputs).expect("target"),
                                       bytecode_ref: spec.bytecode_ref.clone(),
                                       constructor_args_used: inputs.constructor_args.clone(),
                                       libraries_used: inputs.libraries.clone(),
                                       salt: deterministic_salt("Token", "v1"),
                                       transaction_ref: None,
                                       published_at: chrono::Utc::now(),
                                       verified: false };
        assert!(inputs.matches(&spec, &record));

        let reseeded = spec.clone().salt_seed("v2");
        assert!(!inputs.matches(&reseeded, &record));
        let rebuilt = spec.clone().bytecode("TokenV2");
        assert!(!inputs.matches(&rebuilt, &record));
    }

    #[test]
    fn target_location_depends_on_libraries() {
        let spec = ArtifactSpec::new("B").library("base", "A");
        let mut libs_a = LibraryBindings::new();
        libs_a.insert("base".into(), Address::from_bytes(&[1; 20]));
        let mut libs_b = LibraryBindings::new();
        libs_b.insert("base".into(), Address::from_bytes(&[2; 20]));

        let a = compute_target_location(&spec, &ResolvedInputs { constructor_args: vec![], libraries: libs_a });
        let b = compute_target_location(&spec, &ResolvedInputs { constructor_args: vec![], libraries: libs_b });
        assert_ne!(a.expect("ok"), b.expect("ok"));
    }
}
