//! Crucible y sus librerías.
//!
//! `NuggetSpecLib` -> `IngotSpecLib` -> `Crucible`, más la calculadora de
//! fees cuya dirección recibe el constructor de `Crucible`.
use deploy_core::constants::DEPLOYER_ROLE;
use deploy_core::{ArtifactSpec, ConstructorArg};
use serde_json::json;

pub const TAG: &str = "Crucible";

pub fn specs() -> Vec<ArtifactSpec> {
    vec![ArtifactSpec::new("NuggetSpecLib").tag(TAG),
         ArtifactSpec::new("IngotSpecLib").library("NuggetSpecLib", "NuggetSpecLib").tag(TAG),
         ArtifactSpec::new("NativeFixedFeeCalculator").args([json!(0), json!(0), json!(0)].map(ConstructorArg::value))
                                                      .tag(TAG),
         ArtifactSpec::new("Crucible").library("IngotSpecLib", "IngotSpecLib")
                                      .args([ConstructorArg::account("endpointv2"),
                                             ConstructorArg::account(DEPLOYER_ROLE),
                                             ConstructorArg::address_of("NativeFixedFeeCalculator"),
                                             ConstructorArg::account(DEPLOYER_ROLE)])
                                      .tag(TAG)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use deploy_core::Registry;

    #[test]
    fn crucible_is_ordered_after_its_library_and_calculator() {
        let registry = Registry::new(specs()).expect("registry");
        let names: Vec<&str> = registry.topological_order().map(|s| s.name.as_str()).collect();
        assert_eq!(names,
                   vec!["NuggetSpecLib", "IngotSpecLib", "NativeFixedFeeCalculator", "Crucible"]);
        let roles = registry.account_roles();
        assert!(roles.contains("endpointv2"));
        assert!(roles.contains("deployer"));
    }
}
