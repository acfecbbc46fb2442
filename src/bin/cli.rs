//! Querysmith CLI - compile GraphQL documents from an introspection schema.
//!
//! Usage:
//!   querysmith type <NAME>                          # Show a type
//!   querysmith query --path actor --field entities  # Compile a query
//!   querysmith mutation <NAME> --override k=Sig     # Compile a mutation
//!   querysmith args --type Actor --path entities    # Arguments for a field
//!   querysmith inputs --path actor,account          # Required inputs on a path
//!   querysmith generate --config querysmith.yml     # Compile a whole config

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use querysmith::config::{Config, DEFAULT_LOG_LEVEL};
use querysmith::{generate, Schema};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter.
const LOG_ENV: &str = "QUERYSMITH_LOG";

#[derive(Parser)]
#[command(name = "querysmith")]
#[command(about = "Querysmith - GraphQL documents from introspection schemas", long_about = None)]
struct Cli {
    /// Introspection schema file
    #[arg(short, long, default_value = "schema.json", global = true)]
    schema: PathBuf,

    /// Log at debug level unless QUERYSMITH_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a named type as JSON
    Type {
        name: String,
    },

    /// Compile a query for an endpoint under a field path
    Query {
        /// Field path from the query root, comma separated
        #[arg(short, long, value_delimiter = ',')]
        path: Vec<String>,

        /// Endpoint field at the end of the path
        #[arg(short, long)]
        field: String,

        /// Object nesting levels to expand
        #[arg(short, long, default_value = "1")]
        depth: usize,

        /// Arguments to include instead of the required ones
        #[arg(short, long = "include-arg")]
        include_args: Vec<String>,
    },

    /// Compile a mutation
    Mutation {
        name: String,

        /// Object nesting levels to expand
        #[arg(short, long, default_value = "1")]
        depth: usize,

        /// Signature override, as name=Signature
        #[arg(short, long = "override", value_parser = parse_override)]
        overrides: Vec<(String, String)>,
    },

    /// Print the arguments surfaced for a field
    Args {
        /// Type to start from
        #[arg(short = 't', long = "type")]
        type_name: String,

        /// Field path from that type, comma separated
        #[arg(short, long, value_delimiter = ',')]
        path: Vec<String>,

        /// Arguments to include instead of the required ones
        #[arg(short, long = "include-arg")]
        include_args: Vec<String>,
    },

    /// Print the required inputs along a query path
    Inputs {
        #[arg(short, long, value_delimiter = ',')]
        path: Vec<String>,
    },

    /// Compile every document listed in a config file
    Generate {
        #[arg(short, long, default_value = "querysmith.yml")]
        config: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Generate { config } => {
            let cfg = Config::load(&config)?;
            init_tracing(cli.verbose, &cfg.log_level);
            generate_cmd(&config, &cfg)
        }
        command => {
            init_tracing(cli.verbose, DEFAULT_LOG_LEVEL);
            let schema = load_schema(&cli.schema)?;
            schema_cmd(&schema, command)
        }
    }
}

fn schema_cmd(schema: &Schema, command: Commands) -> Result<()> {
    match command {
        Commands::Type { name } => {
            let t = schema.lookup_type_by_name(&name)?;
            println!("{}", serde_json::to_string_pretty(t)?);
        }

        Commands::Query {
            path,
            field,
            depth,
            include_args,
        } => {
            let types = schema.lookup_query_types_by_field_path(path.as_slice())?;
            let doc = schema.get_query_string_for_endpoint(
                &types,
                path.as_slice(),
                &field,
                depth,
                include_args.as_slice(),
            )?;
            println!("{}", doc);
        }

        Commands::Mutation { name, depth, overrides } => {
            let field = schema.lookup_mutation_by_name(&name)?;
            let overrides: HashMap<String, String> = overrides.into_iter().collect();
            println!("{}", schema.get_query_string_for_mutation(field, depth, &overrides)?);
        }

        Commands::Args {
            type_name,
            path,
            include_args,
        } => {
            let start = schema.lookup_type_by_name(&type_name)?;
            let args = schema.build_query_args_for_endpoint(
                start,
                path.as_slice(),
                include_args.as_slice(),
            )?;
            println!("{}", serde_json::to_string_pretty(&args)?);
        }

        Commands::Inputs { path } => {
            let inputs = schema.get_input_fields_for_query_path(path.as_slice())?;
            println!("{}", serde_json::to_string_pretty(&inputs)?);
        }

        Commands::Generate { config } => {
            bail!("generate takes a config file, not a schema: {}", config.display());
        }
    }

    Ok(())
}

fn generate_cmd(config_path: &Path, cfg: &Config) -> Result<()> {
    let schema = load_schema(&cfg.schema_path(config_path))?;
    let out = generate(&schema, cfg)?;
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn load_schema(path: &Path) -> Result<Schema> {
    Schema::load(path).with_context(|| format!("loading schema {}", path.display()))
}

/// Logs go to stderr so stdout carries only documents.
fn init_tracing(verbose: bool, fallback: &str) {
    let fallback = if verbose { "debug" } else { fallback };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn parse_override(s: &str) -> Result<(String, String)> {
    let Some((name, signature)) = s.split_once('=') else {
        bail!("expected name=Signature, got '{}'", s);
    };
    if name.is_empty() || signature.is_empty() {
        bail!("expected name=Signature, got '{}'", s);
    }
    Ok((name.to_string(), signature.to_string()))
}
