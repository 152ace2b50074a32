//! Reachability command.

use anyhow::Result;
use serde::Serialize;

use super::Loaded;
use crate::output::{self, Format};
use crate::{OutputFormat, SearchArgs};

#[derive(Serialize)]
struct ReachOutput<'a> {
    from: &'a str,
    to: &'a str,
    reachable: bool,
}

/// Run the reach command.
pub fn run(args: &SearchArgs, from: &str, to: &str, format: OutputFormat, quiet: bool) -> Result<()> {
    let loaded = Loaded::open(args)?;
    let (start, target) = (loaded.vertex(from)?, loaded.vertex(to)?);
    let reachable = loaded
        .evaluator()
        .is_reachable(&loaded.automaton, start, target)?;

    let output = ReachOutput { from, to, reachable };
    let fmt: Format = format.into();
    match fmt {
        Format::Json => output::print_json(&output, quiet)?,
        Format::Table => {
            let items = [
                ("From", from.to_string()),
                ("To", to.to_string()),
                ("Reachable", reachable.to_string()),
            ];
            output::print_key_value_table(&items, fmt, quiet)?;
        }
    }
    Ok(())
}
