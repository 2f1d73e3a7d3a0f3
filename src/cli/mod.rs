//! CLI Module
//!
//! Command-line interface for the layered configuration store.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Layered configuration store - scoped JSON settings on disk
#[derive(Parser, Debug)]
#[command(name = "layercfg")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Root directory of the store
    #[arg(long, global = true, env = "LAYERCFG_ROOT", default_value = ".")]
    pub root: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a layer directory and its document
    #[command(name = "init")]
    Init {
        /// Layer path relative to the root ("." for the root itself)
        layer: String,

        /// Initial document as a JSON object
        #[arg(short, long)]
        document: Option<String>,

        /// Create the directory without a config.json
        #[arg(long, conflicts_with = "document")]
        no_document: bool,

        /// Remove the layer and all its sub-layers first
        #[arg(long)]
        reset: bool,
    },

    /// Print the value of a key
    #[command(name = "get")]
    Get {
        /// Layer path
        layer: String,

        /// Key to read
        key: String,

        /// Value printed when the key is missing (JSON, or a plain string)
        #[arg(short, long)]
        default: Option<String>,
    },

    /// Set the value of a key
    #[command(name = "set")]
    Set {
        /// Layer path
        layer: String,

        /// Key to write
        key: String,

        /// New value (JSON, or a plain string)
        value: String,
    },

    /// Print a layer's whole document
    #[command(name = "show")]
    Show {
        /// Layer path
        layer: String,
    },

    /// Print the directory of a layer
    #[command(name = "dir")]
    Dir {
        /// Layer path
        layer: String,

        /// Do not require the directory to exist
        #[arg(long)]
        no_check: bool,
    },

    /// List the sub-layers of the root or of a layer
    #[command(name = "list")]
    List {
        /// Layer whose sub-layers are listed (defaults to the root)
        layer: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_set() {
        let cli = Cli::try_parse_from([
            "layercfg", "--root", "LWConfig", "set", "project/A", "name", "123",
        ])
        .unwrap();

        assert_eq!(cli.root, PathBuf::from("LWConfig"));
        match cli.command {
            Some(Commands::Set { layer, key, value }) => {
                assert_eq!(layer, "project/A");
                assert_eq!(key, "name");
                assert_eq!(value, "123");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_init_flags() {
        let cli = Cli::try_parse_from(["layercfg", "init", "global", "--reset", "-v"]).unwrap();

        assert!(cli.verbose);
        match cli.command {
            Some(Commands::Init {
                layer,
                document,
                no_document,
                reset,
            }) => {
                assert_eq!(layer, "global");
                assert!(document.is_none());
                assert!(!no_document);
                assert!(reset);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_document_conflicts_with_no_document() {
        let result = Cli::try_parse_from([
            "layercfg",
            "init",
            "global",
            "--document",
            "{}",
            "--no-document",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_list_layer_is_optional() {
        let cli = Cli::try_parse_from(["layercfg", "list"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::List { layer: None })));
    }
}
