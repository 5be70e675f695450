//! Registros de despliegue incluidos en la herramienta.

pub mod crucible;
pub mod mocks;

use clap::ValueEnum;
use deploy_core::{Registry, RegistryError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum RegistrySelection {
    Crucible,
    Mocks,
    #[default]
    All,
}

/// Registro completo para `selection`, opcionalmente filtrado por tags
/// (con cierre transitivo de dependencias).
pub fn registry(selection: RegistrySelection, tags: &[String]) -> Result<Registry, RegistryError> {
    let specs = match selection {
        RegistrySelection::Crucible => crucible::specs(),
        RegistrySelection::Mocks => mocks::specs(),
        RegistrySelection::All => crucible::specs().into_iter().chain(mocks::specs()).collect(),
    };
    let registry = Registry::new(specs)?;
    if tags.is_empty() {
        Ok(registry)
    } else {
        registry.select_tags(tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_select_a_single_family() {
        let registry = registry(RegistrySelection::All, &["Mocks".to_string()]).expect("registry");
        let names: Vec<&str> = registry.topological_order().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["ERC20Mock", "ERC721Mock", "ERC1155Mock"]);
    }

    #[test]
    fn unknown_tag_is_a_registry_error() {
        let err = registry(RegistrySelection::Crucible, &["Mocks".to_string()]).unwrap_err();
        assert_eq!(err, RegistryError::UnknownTag("Mocks".into()));
    }
}
