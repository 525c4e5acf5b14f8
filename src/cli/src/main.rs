use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, FromArgMatches, Parser};
use later_core::{
    write_usage, Command, CommandRouter, LaterConfig, LocationOverrides, RecordStore, SqliteStore,
};

/// Keep short task notes for later.
#[derive(Parser, Debug)]
#[command(name = "later", version, about)]
struct Cli {
    /// Base directory holding the dedicated `.later` store directory
    #[arg(long, value_name = "DIR", env = "LATER_HOME")]
    home: Option<PathBuf>,

    /// Explicit database file; takes precedence over --home
    #[arg(long, value_name = "FILE", env = "LATER_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Config file (default: <config dir>/later/config.toml)
    #[arg(long, value_name = "FILE", env = "LATER_CONFIG")]
    config: Option<PathBuf>,

    /// Command followed by its arguments
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    args: Vec<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_filter())
        .with_writer(io::stderr)
        .init();

    let matches = Cli::command().after_help(usage_text()).get_matches();
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    let stdout = io::stdout();
    let stderr = io::stderr();
    let status = invoke(&cli, &mut stdout.lock(), &mut stderr.lock());
    ExitCode::from(status)
}

/// One invocation of the binary. Returns the process exit status.
fn invoke<O: Write, E: Write>(cli: &Cli, out: &mut O, err: &mut E) -> u8 {
    if cli.args.is_empty() {
        let _ = writeln!(err, "no command provided");
        print_usage(err);
        return 1;
    }

    match run(cli, out, err) {
        Ok(()) => 0,
        Err(e) => {
            let _ = writeln!(err, "{e}");
            print_usage(err);
            1
        }
    }
}

/// Validate, open the store, run one command, close the store.
fn run<O: Write, E: Write>(cli: &Cli, out: &mut O, err: &mut E) -> Result<(), String> {
    let command = Command::parse(cli.args.as_slice())
        .map_err(|e| format!("command error: {e}"))?;

    let config =
        LaterConfig::load(cli.config.as_deref()).map_err(|e| format!("config error: {e}"))?;
    let overrides = LocationOverrides {
        base_dir: cli.home.clone(),
        db_path: cli.db_path.clone(),
    };
    let location = config
        .store_location(&overrides)
        .map_err(|e| format!("config error: {e}"))?;
    tracing::debug!(path = %location.db_path().display(), "store location resolved");

    let store = SqliteStore::open(&location).map_err(|e| e.to_string())?;
    execute_and_close(&command, &store, out, err)
}

/// A close failure is reported on `err` but does not fail the command.
fn execute_and_close<O: Write, E: Write>(
    command: &Command,
    store: &dyn RecordStore,
    out: &mut O,
    err: &mut E,
) -> Result<(), String> {
    let result = CommandRouter::new(store).execute(command, out);

    if let Err(e) = store.close() {
        tracing::warn!(error = %e, "close failed");
        let _ = writeln!(err, "storage can not be closed, error: {e}");
    }

    result.map_err(|e| format!("command error: {e}"))
}

fn usage_text() -> String {
    let mut buf = b"Commands:\n".to_vec();
    // Writing into a Vec can not fail.
    let _ = write_usage(&mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

fn print_usage<E: Write>(err: &mut E) {
    let _ = writeln!(err, "list of supported commands:");
    let _ = write_usage(err);
}

fn tracing_filter() -> tracing_subscriber::EnvFilter {
    let explicit = env::var("LATER_LOG").or_else(|_| env::var("RUST_LOG")).ok();
    if let Some(filter) = explicit {
        return tracing_subscriber::EnvFilter::new(filter);
    }
    if matches!(
        env::var("LATER_DEBUG").as_deref(),
        Ok("1" | "true" | "TRUE" | "yes" | "YES")
    ) {
        return tracing_subscriber::EnvFilter::new("debug");
    }
    tracing_subscriber::EnvFilter::new("warn")
}
