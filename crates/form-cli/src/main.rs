use clap::{Parser, Subcommand};
use form_spec::{FormDefinition, RequestData, definition_schema, input_schema, slugify};
use serde_json::Value;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "HTML form builder CLI",
    long_about = "Renders JSON form definitions to HTML, derives field slugs, and prints the definition schema"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a form definition to HTML.
    Render {
        /// Path to the form definition JSON.
        #[arg(long, value_name = "SPEC")]
        spec: PathBuf,
        /// Optional JSON object of submitted values used to repopulate fields.
        #[arg(long, value_name = "REQUEST")]
        request: Option<PathBuf>,
        /// Write the markup to this file instead of stdout.
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
        /// Override a form setting after loading (value parsed as JSON, else taken as text).
        #[arg(long = "set", value_name = "KEY=VALUE")]
        settings: Vec<String>,
    },
    /// Print the slug derived from a label.
    Slug {
        /// Human-readable label.
        label: String,
    },
    /// Print the JSON Schema for form definitions.
    Schema {
        /// Print the schema of input override maps instead.
        #[arg(long)]
        inputs: bool,
    },
}

fn main() -> CliResult<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Render {
            spec,
            request,
            out,
            settings,
        } => run_render(spec, request, out, settings),
        Command::Slug { label } => {
            println!("{}", slugify(&label));
            Ok(())
        }
        Command::Schema { inputs } => {
            let schema = if inputs {
                input_schema()
            } else {
                definition_schema()
            };
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_render(
    spec_path: PathBuf,
    request_path: Option<PathBuf>,
    out: Option<PathBuf>,
    settings: Vec<String>,
) -> CliResult<()> {
    let mut builder = FormDefinition::load(&spec_path)?.into_builder()?;
    for raw in &settings {
        let (key, value) = parse_setting(raw)?;
        if !builder.set(&key, value) {
            return Err(format!("setting '{}' was rejected", raw).into());
        }
    }

    let request = match request_path {
        Some(path) => RequestData::load(&path)?,
        None => RequestData::new(),
    };
    tracing::info!(
        spec = %spec_path.display(),
        fields = builder.len(),
        "rendering form"
    );

    match out {
        Some(path) => {
            fs::write(&path, builder.render(&request))?;
            println!("Wrote form to {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            builder.emit(&request, &mut stdout)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}

fn parse_setting(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("setting '{}' has an empty key", raw));
    }
    let value =
        serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}
