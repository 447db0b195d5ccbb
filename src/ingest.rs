// Register ingestion: delimited text in, ApartmentRecords out.

use std::path::Path;

use tracing::{debug, warn};

use crate::error::Result;
use crate::ident::{self, Side};

/// Header names accepted for the section identifier column, in priority
/// order. Registers exported from different systems disagree on naming.
const ID_HEADERS: [&str; 3] = ["leilighetsnummer", "seksjonsid", "apt"];

/// Header names accepted for the resident name column.
const NAME_HEADERS: [&str; 2] = ["navn", "name"];

/// One register row, resolved and ready for placement.
#[derive(Debug, Clone)]
pub struct ApartmentRecord {
    pub section_id: String,
    pub entrance: String,
    pub floor: u8,
    pub unit: String,
    pub side: Side,
    /// Uppercased resident name, or the unit code when the register has no
    /// name on file. Never empty.
    pub display: String,
}

/// Read a register file and build records for every usable row.
///
/// A row with a malformed identifier fails the whole ingestion; a partial
/// panel silently missing apartments is worse than no panel.
pub fn ingest(path: &Path) -> Result<Vec<ApartmentRecord>> {
    let raw = std::fs::read(path)?;
    let text = String::from_utf8_lossy(&raw);
    ingest_str(text.strip_prefix('\u{feff}').unwrap_or(&text))
}

/// Core of [`ingest`], split out so tests can feed text directly.
pub fn ingest_str(text: &str) -> Result<Vec<ApartmentRecord>> {
    let delimiter = sniff_delimiter(text);
    debug!(delimiter = %(delimiter as char), "detected field delimiter");

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();
    let id_col = find_column(&headers, &ID_HEADERS);
    let name_col = find_column(&headers, &NAME_HEADERS);
    if id_col.is_none() {
        warn!(
            "no identifier column found (expected one of {:?}); register yields no apartments",
            ID_HEADERS
        );
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let section_id = field(&row, id_col).trim();
        if section_id.is_empty() {
            continue;
        }
        let parsed = ident::parse(section_id)?;

        let name = field(&row, name_col).trim();
        let display = if name.is_empty() {
            // No name on file: show the unit code (everything after the
            // separator) so the slot is still identifiable on the panel.
            section_id.split_once('|').map(|(_, unit)| unit).unwrap_or(section_id)
        } else {
            name
        }
        .to_uppercase();

        records.push(ApartmentRecord {
            section_id: section_id.to_string(),
            entrance: parsed.entrance,
            floor: parsed.floor,
            unit: parsed.unit,
            side: parsed.side,
            display,
        });
    }
    debug!(rows = records.len(), "ingested register");
    Ok(records)
}

/// Pick the most frequent of `;`, `,`, tab in the first few non-blank
/// lines. Ties go to the earlier candidate; all-zero defaults to comma.
fn sniff_delimiter(text: &str) -> u8 {
    let sample: String = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(5)
        .collect::<Vec<_>>()
        .join("\n");

    let candidates = [b';', b',', b'\t'];
    let counts = candidates.map(|c| sample.bytes().filter(|&b| b == c).count());
    let mut best = 0;
    for i in 1..candidates.len() {
        if counts[i] > counts[best] {
            best = i;
        }
    }
    if counts[best] == 0 {
        b','
    } else {
        candidates[best]
    }
}

fn find_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    aliases
        .iter()
        .find_map(|a| headers.iter().position(|h| h == a))
}

fn field<'a>(row: &'a csv::StringRecord, col: Option<usize>) -> &'a str {
    col.and_then(|i| row.get(i)).unwrap_or("")
}
