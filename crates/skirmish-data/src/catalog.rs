//! The content catalog: every unit definition a game mode ships.

use std::collections::BTreeMap;
use std::path::Path;

use crate::UnitDefinition;

/// Errors raised while loading catalog data.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog JSON is malformed or has the wrong shape.
    #[error("failed to parse catalog data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A read-only, id-indexed registry of unit definitions.
///
/// Loaded once at startup; the simulation only ever reads it. Backed by
/// a `BTreeMap` so iteration order is stable, which keeps seeded bot
/// rosters and shop rolls reproducible.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    units: BTreeMap<String, UnitDefinition>,
}

impl Catalog {
    /// Builds a catalog from already-loaded definitions.
    pub fn new(definitions: Vec<UnitDefinition>) -> Self {
        let units = definitions
            .into_iter()
            .map(|def| (def.id.clone(), def))
            .collect();
        Self { units }
    }

    /// Parses a catalog from a JSON array of unit definitions.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let definitions: Vec<UnitDefinition> = serde_json::from_str(json)?;
        tracing::info!(units = definitions.len(), "catalog loaded");
        Ok(Self::new(definitions))
    }

    /// Reads and parses a catalog file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Looks up a definition by id.
    pub fn get(&self, id: &str) -> Option<&UnitDefinition> {
        self.units.get(id)
    }

    /// Looks up a definition by display name.
    pub fn get_by_name(&self, name: &str) -> Option<&UnitDefinition> {
        self.units.values().find(|def| def.name == name)
    }

    /// All definitions, in stable (id) order.
    pub fn all(&self) -> impl Iterator<Item = &UnitDefinition> {
        self.units.values()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(id: &str, name: &str) -> UnitDefinition {
        UnitDefinition {
            id: id.into(),
            name: name.into(),
            cost: 1,
            max_health: vec![100],
            max_mana: vec![0],
            attack_damage: vec![10],
            ability_power: vec![],
            armor: vec![],
            magic_resist: vec![],
            attack_speed: vec![1.0],
            range: vec![1],
            traits: vec![],
            ability: None,
        }
    }

    #[test]
    fn test_catalog_lookup_by_id_and_name() {
        let catalog = Catalog::new(vec![def("a", "Archer"), def("b", "Bruiser")]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("a").unwrap().name, "Archer");
        assert_eq!(catalog.get_by_name("Bruiser").unwrap().id, "b");
        assert!(catalog.get("missing").is_none());
    }

    #[test]
    fn test_catalog_iteration_is_id_ordered() {
        let catalog = Catalog::new(vec![def("c", "C"), def("a", "A"), def("b", "B")]);
        let ids: Vec<&str> = catalog.all().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_catalog_parses_json_array() {
        let json = r#"[{
            "id": "u1",
            "name": "Unit",
            "cost": 1,
            "max_health": [100],
            "attack_damage": [10],
            "attack_speed": [1.0],
            "range": [1]
        }]"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_catalog_rejects_malformed_json() {
        assert!(matches!(
            Catalog::from_json("not json"),
            Err(CatalogError::Parse(_))
        ));
    }
}
