//! Path verification command.

use anyhow::{Result, bail};
use greql_engine::Path;
use serde::Serialize;

use super::Loaded;
use crate::output::{self, Format};
use crate::{OutputFormat, SearchArgs};

#[derive(Serialize)]
struct MatchesOutput {
    path: String,
    length: usize,
    matches: bool,
}

/// Builds a path from alternating vertex and edge names.
fn parse_path(loaded: &Loaded, tokens: &[String]) -> Result<Path> {
    if tokens.len() % 2 == 0 {
        bail!("a path alternates vertices and edges and needs an odd number of names, got {}", tokens.len());
    }
    let mut path = Path::new(loaded.vertex(&tokens[0])?);
    for pair in tokens[1..].chunks(2) {
        path.append(loaded.graph.edge(&pair[0])?, loaded.vertex(&pair[1])?);
    }
    Ok(path)
}

/// Run the matches command.
pub fn run(args: &SearchArgs, tokens: &[String], format: OutputFormat, quiet: bool) -> Result<()> {
    let loaded = Loaded::open(args)?;
    let path = parse_path(&loaded, tokens)?;
    let matches = loaded.evaluator().matches(&loaded.automaton, &path)?;

    let output = MatchesOutput {
        path: loaded.describe(&path),
        length: path.length(),
        matches,
    };
    let fmt: Format = format.into();
    match fmt {
        Format::Json => output::print_json(&output, quiet)?,
        Format::Table => {
            let items = [
                ("Path", output.path.clone()),
                ("Length", output.length.to_string()),
                ("Matches", output.matches.to_string()),
            ];
            output::print_key_value_table(&items, fmt, quiet)?;
        }
    }
    Ok(())
}
