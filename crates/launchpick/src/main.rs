//! Binary entrypoint for the Launchpick macOS app.
use std::{
    path::{Path, PathBuf},
    process,
};

use clap::{Parser, Subcommand};
use config::Settings;
use tracing::{error, info, warn};

/// Run loop wiring the engine to the OS.
#[cfg(target_os = "macos")]
mod app;
/// Log-only switcher and launcher hooks.
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
mod ui;

#[derive(Parser, Debug)]
#[command(name = "launchpick", about = "A macOS launcher and window switcher", version)]
/// Command-line interface for the `launchpick` binary.
struct Cli {
    /// Optional subcommand.
    #[command(subcommand)]
    command: Option<Command>,

    /// Logging controls
    #[command(flatten)]
    log: logging::LogArgs,

    /// Optional path to the config file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
/// Top-level CLI subcommands.
enum Command {
    /// Load and validate the configuration then exit.
    Check {
        /// Path to configuration file to check (defaults to ~/.config/launchpick/config.json)
        path: Option<PathBuf>,

        /// Dump the effective settings as JSON to stdout
        #[arg(long)]
        dump: bool,
    },
}

/// The config file to use: explicit, else the per-user default.
fn resolve_config_path(explicit: Option<&Path>) -> config::Result<PathBuf> {
    match explicit {
        Some(p) => Ok(p.to_path_buf()),
        None => config::default_path(),
    }
}

/// Validate a config file, optionally printing the effective settings.
fn check(path: &Path, dump: bool) -> i32 {
    let settings = match config::load(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{e}");
            return 1;
        }
    };
    if !dump {
        println!("OK");
        return 0;
    }
    match serde_json::to_string_pretty(&settings) {
        Ok(json) => {
            println!("{json}");
            0
        }
        Err(e) => {
            eprintln!("Failed to serialize settings: {e}");
            1
        }
    }
}

/// Log which capabilities are missing; prompt for Accessibility if needed.
fn report_permissions() {
    let status = permissions::check_permissions();
    info!(
        accessibility = status.accessibility_ok,
        input_monitoring = status.input_ok,
        "permissions"
    );
    if !status.accessibility_ok {
        warn!("Accessibility not granted; the switcher stays off until it is");
        permissions::request_accessibility();
    }
}

#[cfg(target_os = "macos")]
/// Start the app proper.
fn run(settings: Settings, config_path: PathBuf) -> i32 {
    app::run(settings, config_path)
}

#[cfg(not(target_os = "macos"))]
/// Launchpick drives macOS-only APIs.
fn run(_settings: Settings, _config_path: PathBuf) -> i32 {
    error!("launchpick requires macOS");
    1
}

fn main() {
    let cli = Cli::parse();
    logging::init(&cli.log);

    if let Some(Command::Check { path, dump }) = &cli.command {
        let explicit = path.as_deref().or(cli.config.as_deref());
        let code = match resolve_config_path(explicit) {
            Ok(p) => check(&p, *dump),
            Err(e) => {
                eprintln!("{e}");
                1
            }
        };
        process::exit(code);
    }

    let config_path = match resolve_config_path(cli.config.as_deref()) {
        Ok(p) => p,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };
    let settings = config::load_or_default(&config_path);
    report_permissions();
    process::exit(run(settings, config_path));
}

#[cfg(test)]
mod tests {
    use std::{env, fs};

    use super::*;

    #[test]
    fn cli_parses_check_and_log_flags() {
        let cli = Cli::parse_from(["launchpick", "--debug", "check", "/tmp/x.json", "--dump"]);
        assert!(cli.log.debug);
        match cli.command {
            Some(Command::Check { path, dump }) => {
                assert_eq!(path, Some(PathBuf::from("/tmp/x.json")));
                assert!(dump);
            }
            None => panic!("expected check"),
        }
    }

    #[test]
    fn explicit_config_path_wins() {
        let p = resolve_config_path(Some(Path::new("/etc/lp.json"))).unwrap();
        assert_eq!(p, PathBuf::from("/etc/lp.json"));
    }

    #[test]
    fn check_reports_parse_errors() {
        let dir = env::temp_dir().join(format!("launchpick-check-{}", process::id()));
        fs::create_dir_all(&dir).unwrap();
        let good = dir.join("good.json");
        fs::write(&good, r#"{"switcherShortcut": "cmd+tab"}"#).unwrap();
        let bad = dir.join("bad.json");
        fs::write(&bad, "{ nope").unwrap();
        assert_eq!(check(&good, false), 0);
        assert_eq!(check(&good, true), 0);
        assert_eq!(check(&bad, false), 1);
        fs::remove_dir_all(&dir).unwrap();
    }
}
