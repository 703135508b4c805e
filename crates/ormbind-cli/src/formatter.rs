//! Output formatters for bound models.

use clap::ValueEnum;
use comfy_table::{Cell, Table};
use ormbind_core::schema::{CollectionMapping, Column, MappingKind, PersistentMapping};
use ormbind_core::{BindWarning, RelationalSchemaModel};

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format
    Table,
    /// JSON format
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Trait for formatting output.
pub trait Formatter: Send + Sync {
    /// Format a bound model together with the warnings of the run.
    fn format_model(&self, model: &RelationalSchemaModel, warnings: &[BindWarning]) -> String;

    /// Format an error message.
    fn format_error(&self, error: &str) -> String;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Table formatter using comfy-table.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_model(&self, model: &RelationalSchemaModel, warnings: &[BindWarning]) -> String {
        let mut sections = Vec::new();

        if !model.mappings.is_empty() {
            sections.push(format_mappings(model.mappings.values()));
        }
        for table in model.tables.values() {
            let mut output = format!("Table {}", table.name);
            if !table.primary_key.is_empty() {
                output.push_str(&format!(" (primary key: {})", table.primary_key.join(", ")));
            }
            output.push('\n');
            output.push_str(&format_columns(&table.columns));
            for fk in &table.foreign_keys {
                output.push_str(&format!(
                    "\n  {}: ({}) -> {} ({})",
                    fk.name,
                    fk.columns.join(", "),
                    fk.referenced_table,
                    fk.referenced_columns.join(", ")
                ));
            }
            sections.push(output);
        }
        if !model.collections.is_empty() {
            sections.push(format_collections(model.collections.values()));
        }
        if !warnings.is_empty() {
            let lines: Vec<String> = warnings.iter().map(|w| format!("warning: {}", w)).collect();
            sections.push(lines.join("\n"));
        }

        if sections.is_empty() {
            "No entities bound".to_string()
        } else {
            sections.join("\n\n")
        }
    }

    fn format_error(&self, error: &str) -> String {
        format!("Error: {}", error)
    }
}

fn format_mappings<'a>(mappings: impl Iterator<Item = &'a PersistentMapping>) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Entity", "Table", "Kind", "Discriminator", "Properties"]);

    for mapping in mappings {
        let kind = match &mapping.kind {
            MappingKind::Root(root) => match root.inheritance {
                Some(strategy) => format!("root ({:?})", strategy),
                None => "root".to_string(),
            },
            MappingKind::Subclass(subclass) => format!("{:?} of {}", subclass.strategy, subclass.parent),
        };
        table.add_row(vec![
            Cell::new(&mapping.entity),
            Cell::new(mapping.table.to_string()),
            Cell::new(kind),
            Cell::new(mapping.discriminator_value.as_deref().unwrap_or("")),
            Cell::new(mapping.properties.len()),
        ]);
    }

    table.to_string()
}

fn format_columns(columns: &[Column]) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Column", "Type", "Length", "Nullable", "Unique"]);

    for column in columns {
        let sql_type = column
            .sql_type_override
            .clone()
            .unwrap_or_else(|| format!("{:?}", column.sql_type));
        let length = match (column.length, column.precision, column.scale) {
            (Some(length), _, _) => length.to_string(),
            (None, Some(precision), Some(scale)) => format!("{},{}", precision, scale),
            _ => String::new(),
        };
        table.add_row(vec![
            Cell::new(&column.name),
            Cell::new(sql_type),
            Cell::new(length),
            Cell::new(if column.nullable { "yes" } else { "no" }),
            Cell::new(if column.unique { "yes" } else { "" }),
        ]);
    }

    table.to_string()
}

fn format_collections<'a>(collections: impl Iterator<Item = &'a CollectionMapping>) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Role", "Kind", "Table", "Key", "Inverse", "Cascade"]);

    for collection in collections {
        let key = collection
            .key
            .as_ref()
            .map(|k| k.columns.join(", "))
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(&collection.role),
            Cell::new(format!("{:?}", collection.kind)),
            Cell::new(
                collection
                    .table
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
            ),
            Cell::new(key),
            Cell::new(if collection.inverse { "yes" } else { "no" }),
            Cell::new(format!("{:?}", collection.cascade)),
        ]);
    }

    table.to_string()
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_model(&self, model: &RelationalSchemaModel, warnings: &[BindWarning]) -> String {
        let warnings: Vec<String> = warnings.iter().map(ToString::to_string).collect();
        let output = serde_json::json!({
            "model": model,
            "warnings": warnings,
        });
        serde_json::to_string_pretty(&output).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }

    fn format_error(&self, error: &str) -> String {
        serde_json::json!({ "error": error }).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ormbind_core::{Binder, BinderConfig, EntityDescriptor, PropertyDescriptor, ValueType};

    fn sample_model() -> RelationalSchemaModel {
        let book = EntityDescriptor::new("Book")
            .with_property(PropertyDescriptor::basic("title", ValueType::String));
        let mut binder = Binder::new(BinderConfig::default());
        binder.bind(&[book]).unwrap().clone()
    }

    #[test]
    fn test_table_formatter_lists_tables() {
        let output = TableFormatter.format_model(&sample_model(), &[]);

        assert!(output.contains("Table book"));
        assert!(output.contains("title"));
        assert!(!output.contains("warning:"));
    }

    #[test]
    fn test_table_formatter_empty_model() {
        let output = TableFormatter.format_model(&RelationalSchemaModel::new(), &[]);

        assert_eq!(output, "No entities bound");
    }

    #[test]
    fn test_json_formatter_includes_warnings() {
        let warning = BindWarning::AmbiguousSortToken {
            entity: "Book".into(),
            property: "pages".into(),
            token: "bogus".into(),
        };

        let output = JsonFormatter.format_model(&sample_model(), &[warning]);
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert!(parsed["model"]["tables"]["book"].is_object());
        assert_eq!(parsed["warnings"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_format_error() {
        assert_eq!(TableFormatter.format_error("boom"), "Error: boom");
        assert_eq!(JsonFormatter.format_error("boom"), r#"{"error":"boom"}"#);
    }
}
