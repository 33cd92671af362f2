use std::env;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use forge::menu::{append_exit_item, build_menu, load_catalog, MenuEntry};
use forge::resolver::ScriptResolver;
use forge::runner::ProcessExecutor;
use forge::session::SessionController;

#[derive(Parser, Debug)]
#[command(
    name = "forge",
    version,
    about = "Full-screen setup menu: pick a task, run its script, return cleanly"
)]
struct Cli {
    /// Path to a task catalog (TOML/YAML/JSON); defaults to the built-in list
    #[arg(long, value_name = "CATALOG")]
    menu: Option<PathBuf>,

    /// Directory searched first when resolving script identifiers
    #[arg(long, value_name = "DIR", default_value = "scripts")]
    scripts_dir: PathBuf,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let is_json = matches!(
        env::var("FORGE_LOG_FORMAT").ok().as_deref(),
        Some("json") | Some("JSON")
    );
    if is_json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() {
    init_tracing();
    let code = match cli_main() {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "forge error");
            1
        }
    };
    std::process::exit(code);
}

fn cli_main() -> Result<i32> {
    let cli = Cli::parse();

    let entries = match &cli.menu {
        Some(path) => load_catalog(path)?,
        None => builtin_catalog(),
    };
    let mut menu = build_menu(&entries, true)?;
    append_exit_item(&mut menu);

    let root = env::current_dir()?;
    let resolver = ScriptResolver::new(cli.scripts_dir, root);
    let controller = SessionController::new(menu, resolver, ProcessExecutor);
    controller.run()
}

/// Default task list shipped with the assistant; each identifier names a
/// script under the scripts directory.
fn builtin_catalog() -> Vec<MenuEntry> {
    let raw: &[(&str, &str, &str)] = &[
        ("Install APT packages", "Base package set via apt", "apt_install"),
        (
            "Install external packages",
            "Third-party installers (optional)",
            "external_install",
        ),
        ("Remove unwanted APT packages", "Trim the default install", "apt_remove"),
        ("Install Flatpaks", "Applications from Flathub", "flatpak_install"),
        (
            "Install user themes",
            "GTK, icon and cursor themes",
            "themes_install",
        ),
        ("Configure drivers", "Hardware driver setup", "drivers"),
        ("Run distro script", "Distribution-specific tweaks", "distroscript_install"),
    ];
    raw.iter()
        .map(|(label, desc, script)| MenuEntry {
            label: (*label).to_string(),
            desc: Some((*desc).to_string()),
            script: (*script).to_string(),
        })
        .collect()
}
