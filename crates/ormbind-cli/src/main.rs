//! ORMBind Command-Line Client
//!
//! Binds a JSON model document and prints the resulting relational schema.

mod document;
mod formatter;

use clap::{Parser, Subcommand};
use document::ModelDocument;
use formatter::{Formatter, OutputFormat};
use ormbind_core::Binder;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// ORMBind Command-Line Client
#[derive(Parser, Debug)]
#[command(name = "ormbind")]
#[command(version, about = "Bind domain models to a relational schema")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Bind a model document and print the schema
    Bind {
        /// Model document (JSON)
        model: PathBuf,

        /// Datasource whose naming strategy applies
        #[arg(long)]
        datasource: Option<String>,

        /// Output format
        #[arg(long, default_value = "table", value_enum)]
        format: OutputFormat,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ormbind=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(message) = run(args) {
        eprintln!("{}", message);
        std::process::exit(1);
    }
}

/// Run a command, rendering any failure with the selected formatter.
fn run(args: Args) -> Result<(), String> {
    match args.command {
        Command::Bind {
            model,
            datasource,
            format,
        } => {
            let formatter = formatter::create_formatter(format);
            let output = run_bind(&model, datasource.as_deref(), formatter.as_ref())
                .map_err(|e| formatter.format_error(&e.to_string()))?;
            println!("{}", output);
            Ok(())
        }
    }
}

/// Bind a document and render the model.
fn run_bind(
    path: &Path,
    datasource: Option<&str>,
    formatter: &dyn Formatter,
) -> Result<String, Box<dyn std::error::Error>> {
    let document = ModelDocument::load(path)?;

    let mut binder = Binder::new(document.binder_config(datasource))
        .with_overrides(Arc::new(document.override_source()))
        .with_constraints(Arc::new(document.constraints.clone()));

    info!(path = %path.display(), entities = document.entities.len(), "binding model");
    binder.bind(&document.entities)?;
    Ok(formatter.format_model(binder.model(), binder.warnings()))
}
