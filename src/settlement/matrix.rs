//! Tile matrix - the row profile of a settlement footprint
//!
//! A matrix is a list of `(width, offset)` rows stored top to bottom: index 0
//! holds the largest offset, i.e. the highest world row. Each row covers
//! `width` tiles centred on the settlement's column, and `offset` is the row
//! distance from the settlement's center row. Exactly one row has offset 0.
//!
//! Footprints grow one row per size step, alternating between the top and
//! the bottom of the matrix, which produces the tapered diamond shape of a
//! patch of alternating triangles.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::{CivError, Result};
use crate::core::types::PopulationCenterSize;

/// One row of a tile matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileMatrixRow {
    pub width: i32,
    pub offset: i32,
}

impl TileMatrixRow {
    pub const fn new(width: i32, offset: i32) -> Self {
        Self { width, offset }
    }

    /// Columns covered by the row run from `-divider` to `divider`
    #[inline]
    pub fn divider(&self) -> i32 {
        self.width / 2
    }
}

/// A single tile position implied by a matrix, relative to the center
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixCell {
    pub row_index: usize,
    pub offset: i32,
    pub col: i32,
    pub divider: i32,
}

impl MatrixCell {
    #[inline]
    pub fn is_leftmost(&self) -> bool {
        self.col == -self.divider
    }

    #[inline]
    pub fn is_rightmost(&self) -> bool {
        self.col == self.divider
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileMatrix {
    rows: Vec<TileMatrixRow>,
}

impl TileMatrix {
    /// The single-tile matrix every footprint grows from
    pub fn seed() -> Self {
        Self {
            rows: vec![TileMatrixRow::new(1, 0)],
        }
    }

    pub fn from_rows(rows: Vec<TileMatrixRow>) -> Result<Self> {
        if rows.is_empty() {
            return Err(CivError::EmptyTileMatrix);
        }
        Ok(Self { rows })
    }

    /// Build the footprint of a settlement of `size` around a center tile
    /// with the given orientation.
    pub fn generate(size: PopulationCenterSize, is_center_upward: bool) -> Self {
        let mut rows = vec![TileMatrixRow::new(1, 0)];
        let mut zero = 0usize;

        for _ in 1..=size.ordinal() {
            let prepend = (rows.len() + 1) % 2 == 0;
            let provisional = TileMatrixRow::new(0, 0);
            if prepend {
                rows.insert(0, provisional);
                zero += 1;
            } else {
                rows.push(provisional);
            }

            rows[zero].width += 2;
            let zero_width = rows[zero].width;

            for (idx, row) in rows.iter_mut().enumerate() {
                row.offset = zero as i32 - idx as i32;

                let mirrors_zero = (prepend && idx == zero + 1) || (!prepend && idx + 1 == zero);
                if mirrors_zero {
                    row.width = zero_width;
                } else if idx != zero {
                    let ahead = (prepend && idx > zero) || (!prepend && idx < zero);
                    let distance = (idx as i32 - zero as i32).abs() - i32::from(ahead);
                    row.width = zero_width - 2 * distance;
                }
            }
        }

        // An upward center tile grows with the opposite asymmetry
        if is_center_upward {
            rows.reverse();
            for row in &mut rows {
                row.offset = -row.offset;
            }
        }

        Self { rows }
    }

    /// Grow the matrix outward into the outskirts footprint.
    ///
    /// Returns the outskirts radius, or 0 (leaving the matrix untouched) for
    /// settlements too small to have outskirts.
    pub fn expand(&mut self, size: PopulationCenterSize) -> i32 {
        if !size.has_outskirts() {
            return 0;
        }

        let radius = i32::from(size.ordinal()) * 2;
        for _ in 0..radius / 2 {
            if let Some(first) = self.rows.first().copied() {
                self.rows
                    .insert(0, TileMatrixRow::new(first.width - 2, first.offset + 1));
            }
            if let Some(last) = self.rows.last().copied() {
                self.rows
                    .push(TileMatrixRow::new(last.width - 2, last.offset - 1));
            }
        }

        for row in &mut self.rows {
            row.width += radius * 2;
        }

        radius
    }

    pub fn rows(&self) -> &[TileMatrixRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn zero_row_index(&self) -> Option<usize> {
        self.rows.iter().position(|row| row.offset == 0)
    }

    pub fn tile_count(&self) -> usize {
        self.rows.iter().map(|row| row.width.max(0) as usize).sum()
    }

    /// Every cell of the matrix, top row first, left to right
    pub fn cells(&self) -> impl Iterator<Item = MatrixCell> + '_ {
        self.rows.iter().enumerate().flat_map(|(row_index, row)| {
            let row = *row;
            let divider = row.divider();
            (-divider..=divider).map(move |col| MatrixCell {
                row_index,
                offset: row.offset,
                col,
                divider,
            })
        })
    }

    /// Cells of an expanded matrix that lie in the outskirts ring: the
    /// `radius / 2` rows added at either end, plus `radius` columns at both
    /// ends of every row.
    pub fn outskirts_cells(&self, radius: i32) -> impl Iterator<Item = MatrixCell> + '_ {
        let band = (radius / 2) as usize;
        let rows = self.rows.len();
        self.cells().filter(move |cell| {
            cell.row_index < band
                || cell.row_index + band >= rows
                || cell.col < -cell.divider + radius
                || cell.col > cell.divider - radius
        })
    }
}

impl fmt::Display for TileMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Tile Matrix ---")?;
        for row in &self.rows {
            writeln!(f, "{} : {}", row.width, row.offset)?;
        }
        write!(f, "-------------------")
    }
}
