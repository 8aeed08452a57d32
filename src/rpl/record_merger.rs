/// Row Pair Merger
///
/// RPL exports spread each surveyed position over two physical rows. Rows are
/// paired (0,1), (2,3), ... and each pair collapses into one row where, per
/// column, the first row's value wins and blanks are filled from the second.
use tracing::debug;

use crate::rpl::models::{is_blank, RawRow};

/// Merge consecutive row pairs. A trailing unpaired row is kept as-is.
pub fn merge_row_pairs(rows: Vec<RawRow>) -> Vec<RawRow> {
    let input_len = rows.len();
    let mut merged = Vec::with_capacity(input_len.div_ceil(2));
    let mut rows = rows.into_iter();

    while let Some(first) = rows.next() {
        match rows.next() {
            Some(second) => merged.push(combine_first(first, &second)),
            None => {
                debug!("Trailing unpaired row {} kept unmerged", first.source_row);
                merged.push(first);
            }
        }
    }

    debug!("Merged {} physical rows into {} records", input_len, merged.len());
    merged
}

/// Fill every blank cell of `first` with the matching cell of `second`
fn combine_first(mut first: RawRow, second: &RawRow) -> RawRow {
    for (cell, fallback) in first.cells_mut().iter_mut().zip(second.cells()) {
        if is_blank(cell) && !is_blank(fallback) {
            *cell = fallback.clone();
        }
    }
    first
}
