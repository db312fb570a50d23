use crate::config::Overrides;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use toxiguard_core::Label;
use toxiguard_reporting::ExportFormat;

#[derive(Parser, Debug)]
#[command(name = "toxiguard")]
#[command(author, version, about = "Toxic comment detection and moderation")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path (defaults to ./toxiguard.yaml when present)
    #[arg(short, long, global = true, env = "TOXIGUARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Comment store file, overriding the configured path
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Frozen model artifact; switches to the linear classifier
    #[arg(long, global = true)]
    pub model: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Overrides shared by every subcommand
    pub fn overrides(&self) -> Overrides {
        let (listen, port) = match &self.command {
            Commands::Serve { listen, port } => (listen.clone(), *port),
            _ => (None, None),
        };

        Overrides {
            listen,
            port,
            store: self.store.clone(),
            model: self.model.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API
    Serve {
        /// Listen address
        #[arg(short, long)]
        listen: Option<String>,

        /// Listen port
        #[arg(short = 'P', long)]
        port: Option<u16>,
    },

    /// Classify and submit a single comment
    Submit {
        /// Comment text
        text: String,

        /// Author name; a random profile is used when omitted
        #[arg(short, long)]
        author: Option<String>,

        /// Save the comment even if it is flagged as toxic
        #[arg(long)]
        accept_anyway: bool,
    },

    /// Print counts, user activity and top toxic terms
    Report {
        /// Number of toxic terms to list
        #[arg(long, default_value = "10")]
        top: usize,
    },

    /// Export stored comments
    Export {
        /// Output format: csv, json or jsonl
        #[arg(short, long, default_value = "csv", value_parser = parse_format)]
        format: ExportFormat,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only export comments with this label
        #[arg(long, value_parser = parse_label)]
        label: Option<Label>,
    },

    /// Hash an admin password for the configuration file
    HashPassword {
        /// Password; read from stdin when omitted
        password: Option<String>,
    },
}

fn parse_format(s: &str) -> Result<ExportFormat, String> {
    s.parse().map_err(|e: toxiguard_core::Error| e.to_string())
}

fn parse_label(s: &str) -> Result<Label, String> {
    s.parse()
}
