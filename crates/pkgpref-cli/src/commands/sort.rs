//! Sort command implementation

use pkgpref_spec::Spec;

use super::Session;
use crate::error::Result;

/// Run the sort command
pub fn run_sort(session: &Session, inputs: &[String], json: bool) -> Result<()> {
    let mut specs = inputs
        .iter()
        .map(|input| Spec::parse(input))
        .collect::<pkgpref_spec::Result<Vec<_>>>()?;

    let context = session.context();
    context.comparator().sort_specs(&mut specs)?;

    let sorted: Vec<String> = specs.iter().map(Spec::to_string).collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&sorted)?);
    } else {
        for spec in sorted {
            println!("{spec}");
        }
    }
    Ok(())
}
