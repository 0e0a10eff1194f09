//! Border tracing - ordered outline of a tile matrix footprint
//!
//! The tracer visits every cell of a matrix and keeps the surface corners
//! that lie on the footprint's edge. Corners are gathered into four runs
//! (top, right, bottom, left) and joined clockwise:
//! `top ++ right ++ reverse(bottom) ++ reverse(left)`.

use glam::Vec3;

use crate::core::error::{CivError, Result};
use crate::core::types::Location;
use crate::settlement::matrix::{MatrixCell, TileMatrix};
use crate::world::grid::TileLookup;
use crate::world::tile::SurfacePoint;

/// Corners closer than this are the same corner reached from two tiles
pub const DUPLICATE_EPSILON: f32 = 0.01;

#[derive(Debug, Default)]
struct OutlineRuns {
    top: Vec<Vec3>,
    right: Vec<Vec3>,
    bottom: Vec<Vec3>,
    left: Vec<Vec3>,
}

impl OutlineRuns {
    fn join(self) -> Vec<Vec3> {
        let mut outline =
            Vec::with_capacity(self.top.len() + self.right.len() + self.bottom.len() + self.left.len());
        outline.extend(self.top);
        outline.extend(self.right);
        outline.extend(self.bottom.into_iter().rev());
        outline.extend(self.left.into_iter().rev());
        outline
    }
}

/// Trace the outline of `matrix` placed around `center`.
///
/// Orientation is looked up on the wrapped column while corners are placed
/// on the unwrapped one, so outlines crossing the column seam stay
/// continuous.
pub fn trace_border<G: TileLookup + ?Sized>(
    grid: &G,
    matrix: &TileMatrix,
    center: Location,
) -> Result<Vec<Vec3>> {
    if matrix.is_empty() {
        return Err(CivError::EmptyTileMatrix);
    }

    let rows = matrix.rows();
    let n = rows.len();
    let mut runs = OutlineRuns::default();

    for cell in matrix.cells() {
        let row = center.row + cell.offset;
        let col = center.col + cell.col;
        let upward = grid.is_upward(grid.resolve(row, col)?)?;
        let corner = |which: SurfacePoint| grid.surface_point(row, col, which);

        let i = cell.row_index;
        if i == 0 || i == n - 1 {
            if i == 0 {
                trace_top(&mut runs.top, &cell, n, upward, &corner)?;
            }
            if i == n - 1 {
                trace_bottom(&mut runs.bottom, &cell, n, upward, &corner)?;
            }
            continue;
        }

        let width = rows[i].width;
        let step = n == 3
            || (width != rows[i - 1].width && i != 1)
            || (width != rows[i + 1].width && i != n - 2);

        if cell.is_leftmost() {
            trace_side(&mut runs.left, i, n, step, upward, SurfacePoint::Pivot, &corner)?;
        }
        if cell.is_rightmost() {
            trace_side(&mut runs.right, i, n, step, upward, SurfacePoint::Remaining, &corner)?;
        }
    }

    Ok(dedup_closed(runs.join()))
}

fn trace_top<F>(top: &mut Vec<Vec3>, cell: &MatrixCell, n: usize, upward: bool, corner: &F) -> Result<()>
where
    F: Fn(SurfacePoint) -> Result<Vec3>,
{
    if cell.is_leftmost() {
        if n == 2 && upward {
            top.push(corner(SurfacePoint::Pivot)?);
        }
        top.push(corner(if upward { SurfacePoint::Bisector } else { SurfacePoint::Pivot })?);
    }
    if cell.is_rightmost() {
        top.push(corner(if upward { SurfacePoint::Bisector } else { SurfacePoint::Remaining })?);
        if n == 2 && !upward {
            top.push(corner(SurfacePoint::Bisector)?);
        }
    }
    if !cell.is_leftmost() && !cell.is_rightmost() && upward {
        top.push(corner(SurfacePoint::Bisector)?);
    }
    Ok(())
}

fn trace_bottom<F>(
    bottom: &mut Vec<Vec3>,
    cell: &MatrixCell,
    n: usize,
    upward: bool,
    corner: &F,
) -> Result<()>
where
    F: Fn(SurfacePoint) -> Result<Vec3>,
{
    if cell.is_leftmost() {
        if n == 2 && !upward {
            bottom.push(corner(SurfacePoint::Pivot)?);
        }
        bottom.push(corner(if upward { SurfacePoint::Pivot } else { SurfacePoint::Bisector })?);
    }
    if cell.is_rightmost() {
        bottom.push(corner(if upward { SurfacePoint::Remaining } else { SurfacePoint::Bisector })?);
        if n == 2 && upward {
            bottom.push(corner(SurfacePoint::Bisector)?);
        }
    }
    if !cell.is_leftmost() && !cell.is_rightmost() && !upward {
        bottom.push(corner(SurfacePoint::Bisector)?);
    }
    Ok(())
}

/// Side corners of an interior row. `flank` is the pivot on the left side
/// and the remaining corner on the right.
fn trace_side<F>(
    side: &mut Vec<Vec3>,
    i: usize,
    n: usize,
    step: bool,
    upward: bool,
    flank: SurfacePoint,
    corner: &F,
) -> Result<()>
where
    F: Fn(SurfacePoint) -> Result<Vec3>,
{
    if i == 1 && upward {
        side.push(corner(SurfacePoint::Bisector)?);
    }
    if step {
        side.push(corner(flank)?);
    }
    if i == n - 2 && !upward {
        side.push(corner(SurfacePoint::Bisector)?);
    }
    Ok(())
}

/// Drop consecutive repeated corners, including the wrap from last to first
fn dedup_closed(points: Vec<Vec3>) -> Vec<Vec3> {
    let mut outline: Vec<Vec3> = Vec::with_capacity(points.len());
    for point in points {
        match outline.last() {
            Some(last) if last.abs_diff_eq(point, DUPLICATE_EPSILON) => {}
            _ => outline.push(point),
        }
    }
    while outline.len() > 1 {
        match (outline.first(), outline.last()) {
            (Some(first), Some(last)) if first.abs_diff_eq(*last, DUPLICATE_EPSILON) => {
                outline.pop();
            }
            _ => break,
        }
    }
    outline
}
