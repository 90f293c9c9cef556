//! Bill-of-materials projection of dependency records

use crate::dependency::Dependency;
use serde::{Deserialize, Serialize};

/// A bill-of-materials entry describing one installed dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BomEntry {
    /// Dependency identity
    pub name: String,
    pub metadata: BomMetadata,
}

/// What was installed and where it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BomMetadata {
    pub version: String,
    pub licenses: Vec<String>,
    pub name: String,
    pub sha256: String,
    pub stacks: Vec<String>,
    pub uri: String,
}

/// Turns dependency records into bill-of-materials entries
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanRefinery;

impl PlanRefinery {
    pub fn new() -> Self {
        Self
    }

    /// Project a record into a BOM entry; the license list starts empty
    pub fn bill_of_materials(&self, dependency: &Dependency) -> BomEntry {
        BomEntry {
            name: dependency.id.clone(),
            metadata: BomMetadata {
                version: dependency.version.clone(),
                licenses: Vec::new(),
                name: dependency.name.clone(),
                sha256: dependency.sha256.clone(),
                stacks: dependency.stacks.clone(),
                uri: dependency.uri.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_a_refined_entry() {
        let entry = PlanRefinery::new().bill_of_materials(&Dependency {
            id: "some-id".to_string(),
            name: "some-name".to_string(),
            version: "some-version".to_string(),
            sha256: "some-sha".to_string(),
            uri: "some-uri".to_string(),
            stacks: vec!["some-stack".to_string()],
            licenses: vec!["MIT".to_string()],
        });

        assert_eq!(
            entry,
            BomEntry {
                name: "some-id".to_string(),
                metadata: BomMetadata {
                    version: "some-version".to_string(),
                    licenses: vec![],
                    name: "some-name".to_string(),
                    sha256: "some-sha".to_string(),
                    stacks: vec!["some-stack".to_string()],
                    uri: "some-uri".to_string(),
                },
            }
        );
    }

    #[test]
    fn serializes_as_toml_table() {
        let entry = PlanRefinery::new().bill_of_materials(&Dependency {
            id: "dep".to_string(),
            version: "0.5.4".to_string(),
            sha256: "abc".to_string(),
            ..Dependency::default()
        });

        let toml = toml::to_string(&entry).unwrap();
        assert!(toml.contains("name = \"dep\""));
        assert!(toml.contains("[metadata]"));
        assert!(toml.contains("sha256 = \"abc\""));
    }
}
