//! CLI command definitions and dispatch.

mod inspect;
mod unpack;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use modpack_core::config::ModpackConfig;
use modpack_runtime::{
    extract_buildpacks, extract_extensions, BuildModule, OciLayoutPackage, Package,
};
use serde::Serialize;

/// Modpack: inspect and unpack buildpackages.
#[derive(Parser)]
#[command(name = "modpack", version, about)]
pub struct Cli {
    /// Configuration file (YAML or JSON); defaults to ~/.modpack/config.yaml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Command {
    /// List the build modules in a buildpackage
    Inspect(inspect::InspectArgs),
    /// Unpack every build module's layer into a directory
    Unpack(unpack::UnpackArgs),
}

/// Role of a module within its package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Role {
    Main,
    Dependency,
    Extension,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Main => write!(f, "main"),
            Self::Dependency => write!(f, "dependency"),
            Self::Extension => write!(f, "extension"),
        }
    }
}

/// Return the path to the default config file (~/.modpack/config.yaml).
pub(crate) fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".modpack"))
        .unwrap_or_else(|| PathBuf::from(".modpack"))
        .join("config.yaml")
}

/// Load the configuration.
///
/// An explicit path must exist; the default path is used only when present.
pub fn load_config(path: Option<&Path>) -> Result<ModpackConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(ModpackConfig::load(path)?),
        None => {
            let default = default_config_path();
            if default.is_file() {
                Ok(ModpackConfig::load(&default)?)
            } else {
                Ok(ModpackConfig::default())
            }
        }
    }
}

/// Open a buildpackage stored as an OCI image layout.
pub(crate) fn open_package(path: &Path) -> Result<Arc<dyn Package>, Box<dyn std::error::Error>> {
    let pkg = OciLayoutPackage::from_path(path)?;
    Ok(Arc::new(pkg))
}

/// Extract the modules of a package, tagged with their role.
pub(crate) fn package_modules(
    pkg: Arc<dyn Package>,
    extensions: bool,
) -> Result<Vec<(Role, BuildModule)>, Box<dyn std::error::Error>> {
    if extensions {
        let modules = extract_extensions(pkg)?;
        return Ok(modules.into_iter().map(|m| (Role::Extension, m)).collect());
    }

    let extracted = extract_buildpacks(pkg)?;
    let main = extracted.main.into_iter().map(|m| (Role::Main, m));
    let deps = extracted.dependencies.into_iter().map(|m| (Role::Dependency, m));
    Ok(main.chain(deps).collect())
}

/// Dispatch a parsed CLI to the appropriate command handler.
pub fn dispatch(cli: Cli, config: &ModpackConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Inspect(args) => inspect::execute(args),
        Command::Unpack(args) => unpack::execute(args, config),
    }
}
