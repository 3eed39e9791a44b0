//! chat-cli: scripted driver for the in-memory chat store.
//!
//! Reads one command per line and prints one result per command. The store
//! lives only for the duration of the run.
//!
//! Run:
//! ```bash
//! # pretty logs on stderr, text results on stdout
//! cargo run -p chat-cli -- demo.chat
//!
//! # JSON everything, stop at the first failing command
//! LOG_FORMAT=json OUTPUT_FORMAT=json CHAT_STRICT=1 cargo run -p chat-cli < demo.chat
//! ```
//!
//! Configuration: See `config.rs` for all environment variables.

mod config;
mod render;
mod script;
mod session;

use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::process;

use domain::adapters::clock::SystemClock;
use domain::Store;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{Config, OutputFormat};
use crate::session::Session;

fn print_usage() {
    eprintln!(
        "{}\n\nUsage:\n  chat-cli [<script>]\n\nCommands (one per line, '#' starts a comment):\n  user <name> <contact>\n  group <contact> <contact> [<contact>...]\n  send <group-id> <contact> <content>\n  admin <group-id> <approver> <user>\n  remove <contact>\n  find <start-rfc3339> <end-rfc3339> <k>\n  groups\n\nNotes:\n  - A script argument takes precedence over CHAT_SCRIPT.\n  - Without a script path (argument or CHAT_SCRIPT) commands are read from stdin.",
        domain::about()
    );
}

fn init_tracing(cfg: &Config) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);
    match cfg.log_format {
        config::LogFormat::Json => {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_timer(fmt::time::SystemTime)
                        .with_writer(io::stderr),
                )
                .init();
        }
        config::LogFormat::Pretty => {
            registry
                .with(fmt::layer().pretty().with_target(true).with_writer(io::stderr))
                .init();
        }
    }
}

/// The positional argument wins over `CHAT_SCRIPT`.
fn script_source(configured: Option<&Path>, arg: Option<String>) -> Option<String> {
    match (configured, arg) {
        (Some(env_path), Some(arg)) => {
            warn!(
                argument = %arg,
                chat_script = %env_path.display(),
                "both a script argument and CHAT_SCRIPT are set; using the argument"
            );
            Some(arg)
        }
        (_, Some(arg)) => Some(arg),
        (Some(env_path), None) => Some(env_path.display().to_string()),
        (None, None) => None,
    }
}

fn read_script(cfg: &Config, arg: Option<String>) -> Result<String, String> {
    match script_source(cfg.script_path.as_deref(), arg) {
        Some(path) => {
            fs::read_to_string(&path).map_err(|e| format!("cannot read {}: {}", path, e))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("cannot read stdin: {}", e))?;
            Ok(buf)
        }
    }
}

fn run() -> Result<(), String> {
    let arg = env::args().nth(1);
    if matches!(arg.as_deref(), Some("-h") | Some("--help")) {
        print_usage();
        return Ok(());
    }

    let cfg = Config::from_env().map_err(|e| e.to_string())?;
    init_tracing(&cfg);
    cfg.log_summary();

    let script = read_script(&cfg, arg)?;
    let mut session = Session::new(Store::new(SystemClock));
    let mut executed = 0usize;
    let mut failures = 0usize;

    for (idx, line) in script.lines().enumerate() {
        let lineno = idx + 1;
        let command = match script::parse_line(line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(msg) => {
                failures += 1;
                warn!(line = lineno, error = %msg, "unparseable command");
                match cfg.output_format {
                    OutputFormat::Json => {
                        println!("{}", render::json_error_with_message("bad_command", &msg))
                    }
                    OutputFormat::Text => println!("error[bad_command]: {}", msg),
                }
                if cfg.strict {
                    return Err(format!("line {}: {}", lineno, msg));
                }
                continue;
            }
        };

        executed += 1;
        match session.execute(command) {
            Ok(outcome) => match cfg.output_format {
                OutputFormat::Json => println!("{}", render::outcome_json(&outcome)),
                OutputFormat::Text => println!("{}", render::outcome_text(&outcome)),
            },
            Err(err) => {
                failures += 1;
                match cfg.output_format {
                    OutputFormat::Json => println!("{}", render::error_json(&err)),
                    OutputFormat::Text => println!("{}", render::error_text(&err)),
                }
                if cfg.strict {
                    return Err(format!("line {}: {}", lineno, err));
                }
            }
        }
    }

    let users = session.store().users().len();
    let groups = session.store().groups().len();
    if failures > 0 {
        warn!(executed, failures, users, groups, "script finished with failures");
    } else {
        info!(executed, users, groups, "script finished");
    }
    Ok(())
}

fn main() {
    if let Err(msg) = run() {
        eprintln!("error: {}", msg);
        process::exit(1);
    }
}
