use std::io::Write;

use anyhow::{Context, Result};

use rusty_neo::data::loader::{load_approaches, load_neos};
use rusty_neo::data::writer::write_results;
use rusty_neo::{limit, FilterSet, NeoDatabase};

use crate::cli::{Cli, Command, InspectArgs, QueryArgs};

/// Results printed to stdout when no limit is given.
const DEFAULT_PRINT_LIMIT: usize = 10;

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Load both exports, link them, and run the requested subcommand.
pub fn run(cli: Cli) -> Result<()> {
    let neos = load_neos(&cli.neofile)?;
    let approaches = load_approaches(&cli.cadfile)?;
    let db = NeoDatabase::new(neos, approaches).with_context(|| {
        format!(
            "linking {} to {}",
            cli.cadfile.display(),
            cli.neofile.display()
        )
    })?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match &cli.command {
        Command::Inspect(args) => inspect(&db, args, &mut out).map(|_| ()),
        Command::Query(args) => query(&db, args, &mut out),
    }
}

// ---------------------------------------------------------------------------
// Subcommands
// ---------------------------------------------------------------------------

/// Print one NEO, and with `--verbose` its close approaches.
/// Returns whether the NEO was found.
pub fn inspect<W: Write>(db: &NeoDatabase, args: &InspectArgs, out: &mut W) -> Result<bool> {
    let neo = match (&args.pdes, &args.name) {
        (Some(pdes), _) => db.get_neo_by_designation(pdes),
        (None, Some(name)) => db.get_neo_by_name(name),
        (None, None) => None,
    };

    let Some(neo) = neo else {
        writeln!(out, "No matching NEOs exist in the database.")?;
        return Ok(false);
    };

    writeln!(out, "{neo}")?;
    if args.verbose {
        for ca in db.approaches_of(neo) {
            writeln!(out, "- {ca}")?;
        }
    }
    Ok(true)
}

/// Filter close approaches; print them, or export them when an outfile is set.
pub fn query<W: Write>(db: &NeoDatabase, args: &QueryArgs, out: &mut W) -> Result<()> {
    let filters = FilterSet::from_criteria(&args.criteria());
    log::debug!("Query predicates: {:?}", filters.predicates());

    match &args.outfile {
        Some(path) => {
            write_results(limit(db.query(&filters), args.limit), path)?;
        }
        None => {
            let n = args.limit.filter(|n| *n > 0).unwrap_or(DEFAULT_PRINT_LIMIT);
            for ca in limit(db.query(&filters), Some(n)) {
                writeln!(out, "{ca}")?;
            }
        }
    }
    Ok(())
}
