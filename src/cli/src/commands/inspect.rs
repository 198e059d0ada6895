//! `modpack inspect` command.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::output;

use super::{open_package, package_modules, Role};

#[derive(Args)]
pub struct InspectArgs {
    /// Path to the buildpackage's OCI image layout
    pub layout: PathBuf,

    /// Treat the package as an extension package
    #[arg(long)]
    pub extensions: bool,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// One row of `inspect` output.
#[derive(Debug, Serialize)]
struct ModuleRow {
    role: Role,
    kind: String,
    id: String,
    version: String,
    name: String,
    api: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stacks: Vec<String>,
}

pub fn execute(args: InspectArgs) -> Result<(), Box<dyn std::error::Error>> {
    let pkg = open_package(&args.layout)?;
    let modules = package_modules(pkg, args.extensions)?;

    let mut rows: Vec<ModuleRow> = modules
        .iter()
        .map(|(role, module)| {
            let info = module.info();
            let stacks = module
                .descriptor()
                .as_buildpack()
                .map(|d| d.stacks.iter().map(|s| s.id.clone()).collect())
                .unwrap_or_default();
            ModuleRow {
                role: *role,
                kind: module.kind().to_string(),
                id: info.id.clone(),
                version: info.version.clone(),
                name: info.name.clone(),
                api: module.descriptor().api().to_string(),
                stacks,
            }
        })
        .collect();

    // Main first, then by ID
    rows.sort_by(|a, b| (a.role, &a.id, &a.version).cmp(&(b.role, &b.id, &b.version)));

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let mut table = output::new_table(&["ROLE", "ID", "VERSION", "NAME", "API"]);
    for row in &rows {
        let role = row.role.to_string();
        table.add_row([
            role.as_str(),
            row.id.as_str(),
            output::or_dash(&row.version),
            output::or_dash(&row.name),
            output::or_dash(&row.api),
        ]);
    }
    println!("{table}");

    Ok(())
}
