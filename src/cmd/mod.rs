pub(crate) mod diagram;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;

#[derive(Parser)]
#[command(name = "schema-diagram")]
#[command(version)]
#[command(about = "Generate Mermaid and PlantUML ER diagrams from database metadata", long_about = None)]
pub struct Cli {
    /// Verbose logging (same as RUST_LOG=schema_diagram=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate an ER diagram from a metadata snapshot
    Diagram(diagram::DiagramArgs),

    /// Print JSON schemas for the snapshot input and --json output
    Schema {
        /// Schema to print (snapshot, diagram); prints all when omitted
        name: Option<String>,

        /// List available schema names
        #[arg(long)]
        list: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Diagram(args) => diagram::run(args),
        Commands::Schema { name, list } => run_schema(name, list),
        Commands::Completions { shell } => {
            generate(
                shell,
                &mut Cli::command(),
                "schema-diagram",
                &mut io::stdout(),
            );
            Ok(())
        }
    }
}

fn run_schema(name: Option<String>, list: bool) -> anyhow::Result<()> {
    use crate::json_schema;

    if list {
        for name in json_schema::schema_names() {
            println!("{}", name);
        }
        return Ok(());
    }

    match name {
        Some(name) => {
            let schema = json_schema::get_schema(&name).ok_or_else(|| {
                anyhow::anyhow!(
                    "unknown schema: {}. Available: {}",
                    name,
                    json_schema::schema_names().join(", ")
                )
            })?;
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        None => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json_schema::all_schemas())?
            );
        }
    }
    Ok(())
}
