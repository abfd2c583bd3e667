// =============================================================================
// WALKGRID.RS — Tile layer to walkability rows
//
// A tile layer arrives as one flat, row-major list of tile ids. The path grid
// wants one string per row with a single symbol per column, so the walkable
// flag can be set per symbol afterwards.
// =============================================================================

use crate::error::LoadFailure;

/// Symbol used for a tile id: `0`-`9`, then `a`-`z` for ids 10 to 35.
pub fn tile_symbol(id: u32) -> Result<char, LoadFailure> {
    char::from_digit(id, 36).ok_or(LoadFailure::SymbolOutOfRange { id })
}

/// Split a flat tile-id list into rows of `width` symbols.
///
/// A new row starts whenever the flat index is a non-zero multiple of
/// `width`; the row being built when the scan ends is always appended. The
/// length of `ids` is not checked against `width`: a short final row is the
/// caller's problem.
pub fn build_rows(ids: &[u32], width: usize) -> Result<Vec<String>, LoadFailure> {
    if width == 0 {
        return Err(LoadFailure::ZeroWidth);
    }

    let mut rows = Vec::with_capacity(ids.len() / width + 1);
    let mut row = String::with_capacity(width);
    for (position, &id) in ids.iter().enumerate() {
        if position % width == 0 && position > 0 {
            rows.push(std::mem::take(&mut row));
        }
        row.push(tile_symbol(id)?);
    }
    rows.push(row);

    Ok(rows)
}
