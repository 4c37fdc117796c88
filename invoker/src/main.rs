//! Command-line front end for `wasm-invoker`.
//!
//! `wasm-invoker run <module> <function> [args...]` prints the integer result
//! of the exported function on stdout. Exit codes are listed in
//! [`wasm_invoker::exit_codes`].

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use wasm_invoker::io::config::{load_config, render_config};
use wasm_invoker::{InvokeError, WasmLoader, exit_codes, logging};

#[derive(Parser)]
#[command(
    name = "wasm-invoker",
    version,
    about = "Run an exported WebAssembly function through an installed engine"
)]
struct Cli {
    /// Configuration file. Defaults apply when it does not exist.
    #[arg(long, global = true, default_value = "wasm-invoker.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Call an exported function and print its integer result.
    Run {
        /// Path to the compiled `.wasm` module.
        module: PathBuf,
        /// Name of the exported function.
        function: String,
        /// Integer arguments, passed in order.
        #[arg(allow_negative_numbers = true)]
        args: Vec<String>,
        /// Override the configured timeout.
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Print a JSON object instead of plain text.
        #[arg(long)]
        json: bool,
    },
    /// Print the path of the engine that would be used.
    Locate,
    /// Print the effective configuration as TOML.
    Config,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum Report<'a> {
    Result(&'a str),
    Error { kind: &'a str, message: String },
}

fn main() {
    logging::init();
    let cli = Cli::parse();
    let code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            exit_codes::FAILED
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<i32> {
    let mut config = load_config(&cli.config).context("load config")?;
    match cli.command {
        Command::Run {
            module,
            function,
            args,
            timeout_ms,
            json,
        } => {
            if let Some(timeout_ms) = timeout_ms {
                config.timeout_ms = timeout_ms;
                config.validate().context("--timeout-ms")?;
            }
            cmd_run(WasmLoader::from_config(&config), module, function, args, json)
        }
        Command::Locate => cmd_locate(WasmLoader::from_config(&config)),
        Command::Config => {
            print!("{}", render_config(&config)?);
            Ok(exit_codes::OK)
        }
    }
}

fn cmd_run(
    loader: WasmLoader,
    module: PathBuf,
    function: String,
    args: Vec<String>,
    json: bool,
) -> Result<i32> {
    let loader = Arc::new(loader);
    debug!(module = %module.display(), function = %function, "invoking");
    let outcome = loader.execute_wasm_function(module, function, args).wait();

    match outcome {
        Ok(result) => {
            if json {
                print_json(&Report::Result(result.as_str()))?;
            } else {
                println!("{result}");
            }
            Ok(exit_codes::OK)
        }
        Err(err) => {
            if json {
                print_json(&Report::Error {
                    kind: err.kind(),
                    message: err.to_string(),
                })?;
            } else {
                eprintln!("error: {err}");
            }
            Ok(exit_code_for(&err))
        }
    }
}

fn cmd_locate(loader: WasmLoader) -> Result<i32> {
    match loader.runtime() {
        Ok(runtime) => {
            println!("{}", runtime.path().display());
            Ok(exit_codes::OK)
        }
        Err(err) => {
            eprintln!("error: {err}");
            Ok(exit_code_for(&err))
        }
    }
}

fn exit_code_for(err: &InvokeError) -> i32 {
    match err {
        InvokeError::RuntimeNotFound { .. } => exit_codes::NO_ENGINE,
        err if err.is_request_error() => exit_codes::INVALID_REQUEST,
        _ => exit_codes::FAILED,
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string(value).context("serialize json")?;
    println!("{payload}");
    Ok(())
}
