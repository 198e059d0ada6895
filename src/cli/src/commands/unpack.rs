//! `modpack unpack` command.

use std::path::PathBuf;

use clap::Args;
use modpack_core::config::ModpackConfig;
use modpack_runtime::unpack_module;

use super::{open_package, package_modules};

#[derive(Args)]
pub struct UnpackArgs {
    /// Path to the buildpackage's OCI image layout
    pub layout: PathBuf,

    /// Directory to unpack module layers into
    pub dest: PathBuf,

    /// Treat the package as an extension package
    #[arg(long)]
    pub extensions: bool,

    /// Refuse to replace files that already exist in the destination
    #[arg(long)]
    pub no_overwrite: bool,
}

pub fn execute(args: UnpackArgs, config: &ModpackConfig) -> Result<(), Box<dyn std::error::Error>> {
    let pkg = open_package(&args.layout)?;
    let modules = package_modules(pkg, args.extensions)?;

    let mut unpack_config = config.unpack.clone();
    if args.no_overwrite {
        unpack_config.overwrite = false;
    }

    for (role, module) in &modules {
        unpack_module(module, &args.dest, &unpack_config)?;
        println!("{} {} ({})", role, module.info(), module.kind());
    }

    println!(
        "Unpacked {} module(s) into {}",
        modules.len(),
        args.dest.display()
    );
    Ok(())
}
