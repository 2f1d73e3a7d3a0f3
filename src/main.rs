//! layercfg CLI
//!
//! Command-line interface for the layered configuration store.

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::debug;

use layercfg::cli::{commands, Cli, Commands};
use layercfg::{LayerError, LayerStore};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(filter)).init();

    debug!("layercfg v{}", env!("CARGO_PKG_VERSION"));

    let store = LayerStore::new(&cli.root);

    match cli.command {
        Some(cmd) => {
            let label = command_label(&cmd);
            handle_command(&store, cmd)
                .map_err(|e| {
                    print_suggestions(&e);
                    anyhow::Error::new(e)
                })
                .with_context(|| format!("{} failed (root: {})", label, cli.root.display()))
        }
        None => {
            println!("layercfg v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(store: &LayerStore, cmd: Commands) -> layercfg::Result<()> {
    match cmd {
        Commands::Init {
            layer,
            document,
            no_document,
            reset,
        } => commands::init(store, &layer, document.as_deref(), no_document, reset),
        Commands::Get {
            layer,
            key,
            default,
        } => commands::get(store, &layer, &key, default.as_deref()),
        Commands::Set { layer, key, value } => commands::set(store, &layer, &key, &value),
        Commands::Show { layer } => commands::show(store, &layer),
        Commands::Dir { layer, no_check } => commands::dir(store, &layer, no_check),
        Commands::List { layer } => commands::list(store, layer.as_deref()),
    }
}

fn command_label(cmd: &Commands) -> &'static str {
    match cmd {
        Commands::Init { .. } => "init",
        Commands::Get { .. } => "get",
        Commands::Set { .. } => "set",
        Commands::Show { .. } => "show",
        Commands::Dir { .. } => "dir",
        Commands::List { .. } => "list",
    }
}

fn print_suggestions(err: &LayerError) {
    for suggestion in err.recovery_suggestions() {
        eprintln!("hint: {}", suggestion);
    }
}
