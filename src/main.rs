// intercom-panel: Generate printable intercom panel pages from an
// apartment register (one page per entrance).

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod compose;
mod error;
mod ident;
mod ingest;
mod layout;
mod slots;

use compose::PageComposer;
use error::AppError;
use ingest::ApartmentRecord;
use layout::LayoutConfig;

/// CLI Arguments
#[derive(Parser, Debug)]
#[command(version, about = "Generate printable intercom panel pages from an apartment register")]
struct Args {
    /// Apartment register: delimited text with section ids and resident names
    input: PathBuf,

    /// Output PDF path
    output: PathBuf,
}

fn main() {
    init_logging();
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("intercom_panel=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .compact(),
        )
        .init();
}

fn run() -> Result<(), AppError> {
    let args = Args::parse();

    let records = ingest::ingest(&args.input)?;
    let by_entrance = group_by_entrance(records);
    info!(entrances = by_entrance.len(), "grouped register by entrance");

    let mut composer = PageComposer::new(LayoutConfig::default())?;
    for (entrance, records) in &by_entrance {
        let boxes = slots::assign(records);
        if boxes.is_empty() {
            continue;
        }
        composer.add_entrance_page(entrance, &boxes);
    }
    if composer.pages() == 0 {
        // Nothing usable in the register: still emit a labeled sheet so
        // the run has a visible result.
        composer.add_entrance_page("?", &[]);
    }

    let pages = composer.pages();
    composer.save(&args.output)?;

    println!("✓ Generated: {}", args.output.display());
    println!("  Pages: {}", pages);

    Ok(())
}

/// Group records by entrance letter, sorted in natural string order.
fn group_by_entrance(records: Vec<ApartmentRecord>) -> BTreeMap<String, Vec<ApartmentRecord>> {
    let mut map: BTreeMap<String, Vec<ApartmentRecord>> = BTreeMap::new();
    for r in records {
        map.entry(r.entrance.clone()).or_default().push(r);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use ident::Side;

    fn rec(entrance: &str) -> ApartmentRecord {
        ApartmentRecord {
            section_id: format!("{entrance}|H0101"),
            entrance: entrance.to_string(),
            floor: 1,
            unit: "01".to_string(),
            side: Side::Left,
            display: "X".to_string(),
        }
    }

    #[test]
    fn grouping_sorts_entrances() {
        let grouped = group_by_entrance(vec![rec("C"), rec("A"), rec("B"), rec("A")]);
        let keys: Vec<_> = grouped.keys().cloned().collect();
        assert_eq!(keys, ["A", "B", "C"]);
        assert_eq!(grouped["A"].len(), 2);
    }
}
