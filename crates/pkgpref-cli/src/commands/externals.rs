//! Externals and buildable command implementations

use colored::Colorize;
use pkgpref_spec::{ExternalLocation, Spec};
use serde_json::json;

use super::Session;
use crate::error::{CliError, Result};

fn named_spec(input: &str) -> Result<Spec> {
    let spec = Spec::parse(input)?;
    if spec.name.is_none() {
        return Err(CliError::user(format!("spec '{input}' does not name a package")));
    }
    Ok(spec)
}

/// Run the externals command
pub fn run_externals(session: &Session, input: &str, json: bool) -> Result<()> {
    let target = named_spec(input)?;
    let context = session.context();
    let externals = context.external_candidates(&target)?;

    if json {
        let output: Vec<_> = externals
            .iter()
            .map(|spec| {
                let location = spec.external.as_ref();
                json!({
                    "spec": spec.to_string(),
                    "path": location.and_then(ExternalLocation::path).map(|p| p.display().to_string()),
                    "module": location.and_then(ExternalLocation::module),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if externals.is_empty() {
        println!("{}", format!("No external installations of {target}").dimmed());
        return Ok(());
    }
    for spec in &externals {
        let location = spec
            .external
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        println!("  {}  {}", spec.to_string().green(), location.dimmed());
    }
    Ok(())
}

/// Run the buildable command
pub fn run_buildable(session: &Session, input: &str, json: bool) -> Result<()> {
    let target = named_spec(input)?;
    let context = session.context();
    let buildable = context.is_buildable(&target)?;

    if json {
        let output = json!({
            "package": target.name(),
            "buildable": buildable,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if buildable {
        println!("{} {} may be built from source", "yes".green().bold(), target);
    } else {
        println!("{} {} must use an external installation", "no".yellow().bold(), target);
    }
    Ok(())
}
