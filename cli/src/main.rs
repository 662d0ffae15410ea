mod commands;

use clap::{Parser, Subcommand};
use commands::{
    blocks, fields, inspect, normalize, validate, NormalizeArgs, SettingsArgs, TemplateArgs,
    ValidateArgs,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Template Builder - inspect, validate, and normalize form/document templates
#[derive(Parser, Debug)]
#[command(name = "template-builder")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding settings.json
    #[arg(long, global = true, default_value = ".")]
    settings_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the element tree as an indented outline
    Inspect(TemplateArgs),

    /// List the form's leaf fields, initial values, and validation rules
    Fields(TemplateArgs),

    /// Check a JSON object of form values against the template's fields
    Validate(ValidateArgs),

    /// Print the document content as resolved, ordered blocks
    Blocks(TemplateArgs),

    /// Re-export a template in canonical form
    Normalize(NormalizeArgs),

    /// Show or change the saved builder settings
    Settings(SettingsArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let settings = commands::load_settings(cli.settings_dir.clone()).await?;

    match cli.command {
        Command::Inspect(args) => inspect(args, &settings).await,
        Command::Fields(args) => fields(args, &settings).await,
        Command::Validate(args) => validate(args, &settings).await,
        Command::Blocks(args) => blocks(args, &settings).await,
        Command::Normalize(args) => normalize(args, &settings).await,
        Command::Settings(args) => commands::settings(cli.settings_dir, args).await,
    }
}
