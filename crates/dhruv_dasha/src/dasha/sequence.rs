//! Cyclic rotation of the dasha sequence.

use rust_decimal::Decimal;

use crate::error::DashaError;
use crate::graha::Graha;

use super::weights::WeightTable;

/// `len` entries of the table's graha order, starting at `start` and
/// wrapping around as many times as needed.
pub fn rotated_sequence(
    table: &WeightTable,
    start: Graha,
    len: usize,
) -> Result<Vec<(Graha, Decimal)>, DashaError> {
    let entries = table.entries();
    let n = entries.len();
    let start_pos = table.position(start)?;
    Ok((0..len)
        .map(|i| {
            let e = entries[(start_pos + i) % n];
            (e.graha, e.years)
        })
        .collect())
}

/// One full cycle starting at `start`.
pub fn cycle_from(table: &WeightTable, start: Graha) -> Result<Vec<(Graha, Decimal)>, DashaError> {
    rotated_sequence(table, start, table.len())
}
