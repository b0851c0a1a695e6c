use std::io::Read;
use std::process::exit;

use clap::{CommandFactory, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, DecompileArgs, Input, TopLevel};

mod cli;

const DEFAULT_LOG_FILTER: &str = "warn";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}

fn read_input(source: &Input) -> (Vec<u8>, &DecompileArgs) {
    match source {
        Input::File { path, args } => match std::fs::read(path) {
            Ok(bytes) => {
                debug!(?path, len = bytes.len(), "read input");
                (bytes, args)
            }
            Err(e) => {
                eprintln!("failed to read {path:?}: {e}");
                exit(1);
            }
        },
        Input::Stdin { args } => {
            let mut bytes = Vec::new();
            if let Err(e) = std::io::stdin().read_to_end(&mut bytes) {
                eprintln!("failed to read stdin: {e}");
                exit(1);
            }
            debug!(len = bytes.len(), "read stdin");
            (bytes, args)
        }
    }
}

fn decompile(source: Input) {
    let (bytes, args) = read_input(&source);

    let out = match jsxbin_lib::decompile_with_options(&bytes, args.options()) {
        Ok(out) => out,
        Err(e) => {
            eprintln!("decompile error: {e}");
            exit(1);
        }
    };

    match &args.output {
        Some(dest) => {
            if let Err(e) = std::fs::write(dest, out) {
                eprintln!("failed to write {dest:?}: {e}");
                exit(1);
            }
        }
        None => println!("{out}"),
    }
}

fn main() {
    init_tracing();

    match Cli::parse().command {
        Some(TopLevel::Decompile { source }) => decompile(source),
        Some(TopLevel::Completion { shell }) => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
        }
        None => {
            let _ = Cli::command().print_help();
        }
    }
}
