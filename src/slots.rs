// Slot assignment: maps an entrance's apartments onto the fixed 8-slot
// panel grid, then groups the grid into display boxes.

use tracing::warn;

use crate::ident::Side;
use crate::ingest::ApartmentRecord;

/// One panel rectangle: a column/band pair holding up to 4 lines.
///
/// `order` 1 is the top band (floors 8 down to 5 before compaction),
/// order 2 the bottom band. Empty line slots keep their position so a
/// missing floor leaves a visible gap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayBox {
    pub column: Side,
    pub order: u8,
    pub lines: [Option<String>; 4],
}

/// Compute the display boxes for one entrance.
///
/// The grid is 8 slots top to bottom per side, floor 8 at slot 0 down to
/// floor 1 at slot 7. Entrances missing low floors are compacted: each
/// floor in 1-4 absent from the whole entrance shifts every slot down by
/// one, so the panel bottom-aligns instead of leaving dead rows (entrance
/// A has no first floor, for instance). An entrance with exactly one
/// apartment on floor 8 puts it on the right, whatever its unit suffix
/// says; that is how the physical panels are wired.
///
/// Records are placed in input order and later rows overwrite earlier
/// ones at the same cell.
pub fn assign(records: &[ApartmentRecord]) -> Vec<DisplayBox> {
    if records.is_empty() {
        return Vec::new();
    }

    let mut present = [false; 9];
    for r in records {
        if (1..=8).contains(&r.floor) {
            present[r.floor as usize] = true;
        }
    }
    let offset = (1..=4).filter(|&f| !present[f]).count();

    let single_floor8 = records.iter().filter(|r| r.floor == 8).count() == 1;

    // 16 cells, indexed [band * 2 + side][position], in box output order:
    // L-TOP, R-TOP, L-BOT, R-BOT.
    let mut cells: [[Option<String>; 4]; 4] = Default::default();

    for r in records {
        if !(1..=8).contains(&r.floor) {
            warn!(section_id = %r.section_id, floor = r.floor, "floor outside 1-8, not placed");
            continue;
        }
        let side = if r.floor == 8 && single_floor8 {
            Side::Right
        } else {
            r.side
        };
        let slot = (8 - r.floor) as usize + offset;
        if slot > 7 {
            warn!(
                section_id = %r.section_id,
                floor = r.floor,
                "compacted below the visible 8-slot window, not placed"
            );
            continue;
        }
        let band = slot / 4;
        let column = match side {
            Side::Left => 0,
            Side::Right => 1,
        };
        cells[band * 2 + column][slot % 4] = Some(r.display.clone());
    }

    let placements = [
        (Side::Left, 1),
        (Side::Right, 1),
        (Side::Left, 2),
        (Side::Right, 2),
    ];
    cells
        .into_iter()
        .zip(placements)
        .filter(|(lines, _)| lines.iter().any(Option::is_some))
        .map(|(lines, (column, order))| DisplayBox { column, order, lines })
        .collect()
}
