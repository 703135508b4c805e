//! Model documents read by the CLI.

use ormbind_core::{
    BinderConfig, EntityDescriptor, InMemoryConstraints, InMemoryOverrides, MappingOverride,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Errors loading a model document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid model document.
    #[error("invalid model document {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Two descriptors share an identity.
    #[error("entity {0} is declared more than once")]
    DuplicateEntity(String),
}

/// Entities, overrides, constraints and binder configuration in one JSON file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelDocument {
    /// Entity descriptors, in binding order.
    pub entities: Vec<EntityDescriptor>,
    /// Mapping overrides keyed by entity.
    pub overrides: HashMap<String, MappingOverride>,
    /// Validation constraints keyed by entity, then property.
    pub constraints: InMemoryConstraints,
    /// Binder configuration.
    pub config: Option<BinderConfig>,
}

impl ModelDocument {
    /// Load and validate a document.
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: display.clone(),
            source,
        })?;
        let document: ModelDocument =
            serde_json::from_str(&content).map_err(|source| DocumentError::Parse {
                path: display,
                source,
            })?;
        document.validate()?;
        Ok(document)
    }

    fn validate(&self) -> Result<(), DocumentError> {
        let mut seen = std::collections::HashSet::new();
        for entity in &self.entities {
            if !seen.insert(entity.name.as_str()) {
                return Err(DocumentError::DuplicateEntity(entity.name.clone()));
            }
        }
        Ok(())
    }

    /// Binder configuration, with the datasource replaced if one is given.
    pub fn binder_config(&self, datasource: Option<&str>) -> BinderConfig {
        let config = self.config.clone().unwrap_or_default();
        match datasource {
            Some(datasource) => config.with_datasource(datasource),
            None => config,
        }
    }

    /// Override source built from the document.
    pub fn override_source(&self) -> InMemoryOverrides {
        InMemoryOverrides::from(self.overrides.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_document(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_document() {
        let file = write_document(
            r#"{
                "entities": [
                    {
                        "name": "Book",
                        "properties": [
                            {"name": "title", "value_type": "string", "association": "none"}
                        ]
                    }
                ],
                "overrides": {"Book": {"table": {"name": "books"}}},
                "constraints": {"Book": {"title": {"max_size": 80}}},
                "config": {"default_schema": "library"}
            }"#,
        );

        let document = ModelDocument::load(file.path()).unwrap();

        assert_eq!(document.entities.len(), 1);
        assert_eq!(document.entities[0].properties[0].name, "title");
        assert!(document.overrides.contains_key("Book"));
        let config = document.binder_config(Some("reporting"));
        assert_eq!(config.datasource, "reporting");
        assert_eq!(config.default_schema.as_deref(), Some("library"));
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let file = write_document("{}");

        let document = ModelDocument::load(file.path()).unwrap();

        assert!(document.entities.is_empty());
        assert_eq!(document.binder_config(None), BinderConfig::default());
    }

    #[test]
    fn test_duplicate_entity_rejected() {
        let file = write_document(r#"{"entities": [{"name": "Book"}, {"name": "Book"}]}"#);

        let err = ModelDocument::load(file.path()).unwrap_err();

        assert!(matches!(err, DocumentError::DuplicateEntity(name) if name == "Book"));
    }

    #[test]
    fn test_invalid_json() {
        let file = write_document("{ not json");

        assert!(matches!(
            ModelDocument::load(file.path()),
            Err(DocumentError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();

        assert!(matches!(
            ModelDocument::load(&dir.path().join("missing.json")),
            Err(DocumentError::Io { .. })
        ));
    }
}
