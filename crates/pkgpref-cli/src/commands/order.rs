//! Order and rank command implementations

use std::fmt::Display;

use colored::Colorize;
use pkgpref_core::{Candidate, Category, PreferenceIndex, Rank};
use pkgpref_spec::{CompilerSpec, Spec, VersionList};
use serde_json::json;

use super::Session;
use crate::error::{CliError, Result};

fn parse_category(category: &str, provider: Option<&str>) -> Result<Category> {
    let category: Category = category.parse()?;
    if category == Category::Providers && provider.is_none() {
        return Err(CliError::user("the providers category needs --provider <VPKG>"));
    }
    Ok(category)
}

/// Run the order command
pub fn run_order(
    session: &Session,
    package: &str,
    category: &str,
    provider: Option<&str>,
    no_wildcard: bool,
    json: bool,
) -> Result<()> {
    let category = parse_category(category, provider)?;
    let context = session.context();
    let order = context.order_for(package, category, provider, !no_wildcard)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&order)?);
        return Ok(());
    }

    if order.is_empty() {
        println!("{}", format!("No {category} preferences for {package}").dimmed());
        return Ok(());
    }
    for (position, entry) in order.iter().enumerate() {
        println!("  {:>3}  {}", position.to_string().dimmed(), entry.green());
    }
    Ok(())
}

/// Run the rank command
///
/// Candidates are parsed as the category's constraint type and printed in
/// rank order; equal ranks keep their command-line order.
pub fn run_rank(
    session: &Session,
    package: &str,
    category: &str,
    provider: Option<&str>,
    candidates: &[String],
    json: bool,
) -> Result<()> {
    let category = parse_category(category, provider)?;
    let context = session.context();
    let index = context.index(package, category, provider)?;

    let ranked = match category {
        Category::Version => rank_all(&index, candidates, VersionList::parse)?,
        Category::Compiler => rank_all(&index, candidates, CompilerSpec::parse)?,
        Category::Variants | Category::Architecture | Category::Providers => {
            rank_all(&index, candidates, Spec::parse)?
        }
    };

    if json {
        let output: Vec<_> = ranked
            .iter()
            .map(|(rank, candidate)| {
                json!({
                    "candidate": candidate,
                    "rank": rank.value(),
                    "ranked": *rank < index.unranked(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for (rank, candidate) in &ranked {
        if *rank < index.unranked() {
            println!("  {:>3}  {}", rank.to_string().cyan(), candidate);
        } else {
            println!("  {:>3}  {} {}", rank.to_string().dimmed(), candidate, "(unranked)".dimmed());
        }
    }
    Ok(())
}

fn rank_all<C, F>(index: &PreferenceIndex, inputs: &[String], parse: F) -> Result<Vec<(Rank, String)>>
where
    C: Candidate + Display,
    F: Fn(&str) -> pkgpref_spec::Result<C>,
{
    let mut candidates = inputs
        .iter()
        .map(|input| parse(input))
        .collect::<pkgpref_spec::Result<Vec<C>>>()?;
    index.sort(&mut candidates);
    Ok(candidates
        .iter()
        .map(|candidate| (index.rank(candidate), candidate.to_string()))
        .collect())
}
