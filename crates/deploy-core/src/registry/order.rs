//! Orden topológico estable (Kahn) sobre los specs registrados.
//!
//! Entre specs listos en el mismo momento se elige siempre el de menor
//! índice de registro, de modo que el orden es reproducible y los logs de
//! dos runs son comparables línea a línea.
use std::collections::{BTreeSet, HashMap};

use crate::errors::RegistryError;
use crate::model::ArtifactSpec;

/// Devuelve los índices de `specs` en orden de dependencias.
///
/// Falla con `DuplicateArtifact`, `UnknownDependency` (antes de buscar
/// ciclos) o `CycleDetected` listando, en orden de registro, los specs que
/// no pudieron ordenarse.
pub fn topological_order(specs: &[ArtifactSpec]) -> Result<Vec<usize>, RegistryError> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(specs.len());
    for (i, s) in specs.iter().enumerate() {
        if index.insert(s.name.as_str(), i).is_some() {
            return Err(RegistryError::DuplicateArtifact(s.name.clone()));
        }
    }

    let mut in_degree = vec![0usize; specs.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); specs.len()];
    for (i, s) in specs.iter().enumerate() {
        for dep in s.ordering_edges() {
            let j = *index.get(dep).ok_or_else(|| RegistryError::UnknownDependency { artifact: s.name.clone(),
                                                                                     dependency: dep.to_string() })?;
            in_degree[i] += 1;
            dependents[j].push(i);
        }
    }

    let mut ready: BTreeSet<usize> = (0..specs.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(specs.len());
    while let Some(i) = ready.pop_first() {
        order.push(i);
        for &d in &dependents[i] {
            in_degree[d] -= 1;
            if in_degree[d] == 0 {
                ready.insert(d);
            }
        }
    }

    if order.len() < specs.len() {
        let involved = specs.iter()
                            .zip(in_degree.iter())
                            .filter(|&(_, &deg)| deg > 0)
                            .map(|(s, _)| s.name.clone())
                            .collect();
        return Err(RegistryError::CycleDetected { involved });
    }
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(specs: &[ArtifactSpec], order: &[usize]) -> Vec<String> {
        order.iter().map(|&i| specs[i].name.clone()).collect()
    }

    #[test]
    fn dependents_come_after_dependencies_even_if_registered_first() {
        let specs = vec![ArtifactSpec::new("Contract").library("lib", "LibB"),
                         ArtifactSpec::new("LibB").library("base", "LibA"),
                         ArtifactSpec::new("LibA"),];
        let order = topological_order(&specs).expect("acyclic");
        assert_eq!(names(&specs, &order), vec!["LibA", "LibB", "Contract"]);
    }

    #[test]
    fn independent_specs_keep_registration_order() {
        let specs = vec![ArtifactSpec::new("C"), ArtifactSpec::new("A"), ArtifactSpec::new("B")];
        let order = topological_order(&specs).expect("acyclic");
        assert_eq!(names(&specs, &order), vec!["C", "A", "B"]);
    }

    #[test]
    fn cycle_is_reported_with_members() {
        let specs = vec![ArtifactSpec::new("Free"),
                         ArtifactSpec::new("X").library("y", "Y"),
                         ArtifactSpec::new("Y").library("x", "X"),];
        assert_eq!(topological_order(&specs),
                   Err(RegistryError::CycleDetected { involved: vec!["X".into(), "Y".into()] }));
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let specs = vec![ArtifactSpec::new("Loop").library("me", "Loop")];
        assert!(matches!(topological_order(&specs), Err(RegistryError::CycleDetected { .. })));
    }

    #[test]
    fn unknown_dependency_and_duplicates_fail() {
        let specs = vec![ArtifactSpec::new("A").library("ghost", "Ghost")];
        assert_eq!(topological_order(&specs),
                   Err(RegistryError::UnknownDependency { artifact: "A".into(),
                                                          dependency: "Ghost".into() }));

        let specs = vec![ArtifactSpec::new("A"), ArtifactSpec::new("A")];
        assert_eq!(topological_order(&specs), Err(RegistryError::DuplicateArtifact("A".into())));
    }
}
