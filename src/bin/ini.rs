//! `ini` command line tool - inspect, query and reformat INI files

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use ini_parser::{Document, IniError, ParserConfig, Status, read_file_with_config, writer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ini")]
#[command(version)]
#[command(about = "Inspect, query and reformat INI files", long_about = None)]
#[command(after_help = "Exit status: 0 success, 2 unreadable source, 3 unwritable \
destination, 4 syntax error (--strict), 5 missing key or section, or a value of the \
wrong type")]
struct Cli {
    /// Report malformed input instead of recovering from it
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every entry of a file
    Dump {
        /// Input file
        file: PathBuf,

        /// Print the document as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a single value
    Get {
        /// Input file
        file: PathBuf,

        /// Key to look up
        key: String,

        /// Section holding the key (defaults to the top-level entries)
        #[arg(short, long)]
        section: Option<String>,
    },

    /// Rewrite a file in canonical layout
    Fmt {
        /// Input file
        file: PathBuf,

        /// Write output to FILE instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ini=warn,ini_parser=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = ParserConfig::new().with_strict(cli.strict);

    match run(cli.command, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(exit_code(&error))
        }
    }
}

/// Maps an error onto the process exit status
fn exit_code(error: &IniError) -> u8 {
    if let IniError::Access(_) = error {
        return 5;
    }
    match error.status() {
        Status::Ok => 0,
        Status::Unreadable => 2,
        Status::Unwritable => 3,
        Status::SyntaxError => 4,
    }
}

fn run(command: Commands, config: ParserConfig) -> Result<(), IniError> {
    match command {
        Commands::Dump { file, json } => {
            let doc = read_file_with_config(&file, config)?;
            if json {
                let rendered = serde_json::to_string_pretty(&doc)
                    .map_err(|e| IniError::Write(e.into()))?;
                println!("{rendered}");
            } else {
                dump(&doc);
            }
        }
        Commands::Get { file, key, section } => {
            let doc = read_file_with_config(&file, config)?;
            let entries = match &section {
                Some(name) => doc.section(name)?,
                None => doc.entries(),
            };
            println!("{}", entries.get(&key)?);
        }
        Commands::Fmt { file, output } => {
            let doc = read_file_with_config(&file, config)?;
            match output {
                Some(path) => writer::write_file(path, &doc)?,
                None => print!("{}", writer::to_string(&doc)),
            }
        }
    }
    Ok(())
}

fn dump(doc: &Document) {
    for (key, value) in doc.entries().iter() {
        println!("{key} ({}) = {value}", value.kind());
    }
    for (name, entries) in doc.sections() {
        println!("[{name}]");
        for (key, value) in entries.iter() {
            println!("  {key} ({}) = {value}", value.kind());
        }
    }
}
