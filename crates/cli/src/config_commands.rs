use std::path::Path;

use {
    anyhow::{Result, bail},
    clap::Subcommand,
};

use sendtick_config::{
    loader,
    validate::{self, Severity},
};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors/warnings.
    Check {
        /// Show informational diagnostics in addition to errors and warnings.
        #[arg(long)]
        verbose: bool,
    },
    /// Print where configuration is looked up.
    Path,
}

pub fn handle_config(action: ConfigAction, path: Option<&Path>) -> Result<()> {
    match action {
        ConfigAction::Check { verbose } => check(path, verbose),
        ConfigAction::Path => {
            match path.map(Path::to_path_buf).or_else(loader::find_config_file) {
                Some(found) => println!("{}", found.display()),
                None => println!("no config file found"),
            }
            if let Some(dir) = loader::config_dir() {
                println!("user config directory: {}", dir.display());
            }
            Ok(())
        },
    }
}

const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn label(severity: Severity) -> (&'static str, &'static str) {
    match severity {
        Severity::Error => (RED, "error"),
        Severity::Warning => (YELLOW, "warning"),
        Severity::Info => (CYAN, "info"),
    }
}

fn check(path: Option<&Path>, verbose: bool) -> Result<()> {
    let result = validate::validate(path);
    match &result.config_path {
        Some(path) => eprintln!("Checking {}", path.display()),
        None => eprintln!("No config file found; checking defaults and environment"),
    }

    for d in result
        .diagnostics
        .iter()
        .filter(|d| verbose || d.severity != Severity::Info)
    {
        let (color, label) = label(d.severity);
        let location = if d.path.is_empty() {
            String::new()
        } else {
            format!("{}: ", d.path)
        };
        eprintln!("  {BOLD}{color}{label}{RESET} {location}{}", d.message);
    }

    let errors = result.count(Severity::Error);
    let warnings = result.count(Severity::Warning);
    if errors > 0 {
        bail!("configuration has {errors} error(s), {warnings} warning(s)");
    }
    if warnings > 0 {
        eprintln!("{warnings} warning(s)");
    } else {
        eprintln!("No issues found.");
    }
    Ok(())
}
