//! Check command implementation

use colored::Colorize;
use pkgpref_core::{Category, PreferenceContext};
use pkgpref_spec::Spec;
use serde_json::json;

use super::Session;
use crate::error::Result;

/// Run the check command
///
/// Loads every scope, rejects virtual package entries, and compiles every
/// preference list and external spec in the configuration.
pub fn run_check(session: &Session, json: bool) -> Result<()> {
    let loader = session.loader();
    let context = session.context();
    let config = context.packages_config()?;

    let mut lists = 0;
    for (name, entry) in config.iter() {
        for category in [Category::Version, Category::Compiler, Category::Variants, Category::Architecture] {
            lists += compiled_len(&context, name, category, None)?.min(1);
        }
        for vpkg in entry.providers.keys() {
            lists += compiled_len(&context, name, Category::Providers, Some(vpkg))?.min(1);
        }
        context.external_candidates(&Spec::named(name))?;
    }

    if json {
        let output = json!({
            "valid": true,
            "scopes": loader.scopes().iter().map(|s| json!({
                "name": s.name,
                "path": s.path.display().to_string(),
                "exists": s.path.is_file(),
            })).collect::<Vec<_>>(),
            "packages": config.package_names().collect::<Vec<_>>(),
            "preference_lists": lists,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for scope in loader.scopes() {
        let marker = if scope.path.is_file() {
            "loaded".green()
        } else {
            "missing".dimmed()
        };
        println!("  {:<8} {} ({})", marker, scope.name, scope.path.display().to_string().dimmed());
    }
    println!(
        "{} {} packages, {} preference lists",
        "OK".green().bold(),
        config.len(),
        lists
    );
    Ok(())
}

/// Compile one list and return its length.
fn compiled_len(context: &PreferenceContext, package: &str, category: Category, sub_key: Option<&str>) -> Result<usize> {
    Ok(context.index(package, category, sub_key)?.len())
}
