use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use notemark::{Config, LoadedNote};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "notemark")]
#[command(about = "Convert notes between markup and editable document trees")]
struct Cli {
    /// Config file (TOML); compiled-in defaults otherwise
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output file (defaults to stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Split a persisted note into title and body
    Split { input: PathBuf },
    /// Parse a note body into blocks
    Parse { input: PathBuf },
    /// Load a persisted note into its title and editable tree
    Render { input: PathBuf },
    /// Save a title and edited tree (as printed by `render`) back to markup
    Save {
        input: PathBuf,
        /// Replace the title stored in the input
        #[arg(short, long)]
        title: Option<String>,
    },
    /// Load and save a note without edits
    Roundtrip { input: PathBuf },
    /// Convert a CommonMark file to note markup (one way)
    Import {
        input: PathBuf,
        #[arg(short, long, default_value = "")]
        title: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match Config::try_load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        None => Config::compiled_default(),
    };

    env_logger::Builder::new()
        .filter_level(config.log.level_filter())
        .parse_default_env()
        .init();

    let output = match run(&cli.command, &config) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    match &cli.output {
        Some(path) => {
            if let Err(e) = fs::write(path, output) {
                eprintln!("Error writing {}: {}", path.display(), e);
                std::process::exit(1);
            }
            log::info!("wrote {}", path.display());
        }
        None => println!("{}", output),
    }
}

fn run(command: &Command, config: &Config) -> notemark::Result<String> {
    match command {
        Command::Split { input } => to_json(&notemark::split(&read(input)?)),
        Command::Parse { input } => to_json(&notemark::parse(&read(input)?)),
        Command::Render { input } => to_json(&notemark::load_with_config(&read(input)?, config)),
        Command::Save { input, title } => {
            let note: LoadedNote = serde_json::from_str(&read(input)?)?;
            let title = title.as_deref().unwrap_or(&note.title);
            Ok(notemark::save_with_config(title, &note.tree, config))
        }
        Command::Roundtrip { input } => {
            let note = notemark::load_with_config(&read(input)?, config);
            Ok(notemark::save_with_config(&note.title, &note.tree, config))
        }
        Command::Import { input, title } => {
            let blocks = notemark::import_markdown(&read(input)?);
            let tree = notemark::render_with_config(&blocks, config);
            let body = notemark::serialize_with_config(&tree, config);
            Ok(notemark::combine(title, &body))
        }
    }
}

fn read(path: &Path) -> notemark::Result<String> {
    fs::read_to_string(path).map_err(|source| notemark::Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn to_json<T: Serialize>(value: &T) -> notemark::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
