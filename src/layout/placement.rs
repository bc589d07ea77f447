//! Collision-aware auto-placement of boxes.
//!
//! The pad is discretised into cells of [`COLLIDE_CELL_PIXELS`]. For every drawn
//! primitive the grid is filled with all *other* primitives and the four
//! tick-band exclusion rectangles, and the first free window of the box size is
//! searched inside the frame, rows top-down, columns right-to-left. The
//! [`PlacementStrategy`] decides which of these per-primitive candidates wins.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{Footprint, NdcRect, PadGeometry};

/// Cell size of the collision grid in pixels.
pub const COLLIDE_CELL_PIXELS: f64 = 10.0;

/// Inset of the fallback position from the frame corner, in pad NDC.
pub const PLACEMENT_INSET: f64 = 0.02;

/// Which candidate of the per-primitive searches is used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementStrategy {
    /// Every successful search overwrites the previous one.
    #[default]
    LastCandidate,
    /// The first successful search wins.
    FirstCandidate,
}

/// Area occupied by a drawn primitive, in pad NDC.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Union of rectangles (histogram bars, boxes, palettes).
    Rects(Vec<NdcRect>),
    /// Connected line segments (graphs, functions).
    Polyline(Vec<(f64, f64)>),
}

/// Occupancy of the pad on a regular grid.
#[derive(Debug, Clone)]
pub struct CollisionGrid {
    columns: usize,
    rows: usize,
    cell_width: f64,
    cell_height: f64,
    /// Row-major, row 0 at the bottom of the pad.
    occupied: Vec<bool>,
}

impl CollisionGrid {
    /// Empty grid covering the pad of `geometry`.
    pub fn new(geometry: &PadGeometry) -> Self {
        let columns = (geometry.pixel_width() / COLLIDE_CELL_PIXELS).ceil().max(1.0) as usize;
        let rows = (geometry.pixel_height() / COLLIDE_CELL_PIXELS).ceil().max(1.0) as usize;
        Self {
            columns,
            rows,
            cell_width: 1.0 / columns as f64,
            cell_height: 1.0 / rows as f64,
            occupied: vec![false; columns * rows],
        }
    }

    /// Number of columns and rows.
    pub const fn size(&self) -> (usize, usize) {
        (self.columns, self.rows)
    }

    /// Whether the cell at `(column, row)` is occupied.
    pub fn is_occupied(&self, column: usize, row: usize) -> bool {
        self.occupied[row * self.columns + column]
    }

    fn column_of(&self, x: f64) -> usize {
        (cell_floor(x / self.cell_width).max(0.0) as usize).min(self.columns - 1)
    }

    fn row_of(&self, y: f64) -> usize {
        (cell_floor(y / self.cell_height).max(0.0) as usize).min(self.rows - 1)
    }

    /// Mark every cell sharing area with `rect`.
    pub fn mark_rect(&mut self, rect: &NdcRect) {
        if rect.x_up <= 0.0 || rect.y_up <= 0.0 || rect.x_low >= 1.0 || rect.y_low >= 1.0 {
            return;
        }
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return;
        }
        let first_column = self.column_of(rect.x_low);
        let last_column =
            (cell_ceil(rect.x_up / self.cell_width).max(1.0) as usize - 1).min(self.columns - 1);
        let first_row = self.row_of(rect.y_low);
        let last_row =
            (cell_ceil(rect.y_up / self.cell_height).max(1.0) as usize - 1).min(self.rows - 1);
        for row in first_row..=last_row {
            for column in first_column..=last_column {
                self.occupied[row * self.columns + column] = true;
            }
        }
    }

    /// Mark every cell crossed by the polyline.
    pub fn mark_polyline(&mut self, points: &[(f64, f64)]) {
        let step = 0.5 * self.cell_width.min(self.cell_height);
        let mut mark = |x: f64, y: f64| {
            if (0.0..=1.0).contains(&x) && (0.0..=1.0).contains(&y) {
                let (column, row) = (self.column_of(x), self.row_of(y));
                self.occupied[row * self.columns + column] = true;
            }
        };
        if let [(x, y)] = points {
            mark(*x, *y);
        }
        for segment in points.windows(2) {
            let Some(((x0, y0), (x1, y1))) = clip_to_unit(segment[0], segment[1]) else {
                continue;
            };
            let length = (x1 - x0).hypot(y1 - y0);
            let samples = (length / step).ceil().max(1.0) as usize;
            for i in 0..=samples {
                let t = i as f64 / samples as f64;
                mark(x0 + t * (x1 - x0), y0 + t * (y1 - y0));
            }
        }
    }

    /// Mark a shape.
    pub fn mark(&mut self, shape: &Shape) {
        match shape {
            Shape::Rects(rects) => rects.iter().for_each(|rect| self.mark_rect(rect)),
            Shape::Polyline(points) => self.mark_polyline(points),
        }
    }

    /// Lower-left corner of the first free `footprint`-sized window inside `frame`.
    ///
    /// Rows are scanned top-down and columns right-to-left.
    pub fn find_free(&self, footprint: Footprint, frame: &NdcRect) -> Option<(f64, f64)> {
        let width = cell_ceil(footprint.width / self.cell_width).max(1.0) as usize;
        let height = cell_ceil(footprint.height / self.cell_height).max(1.0) as usize;
        let first_column = cell_ceil(frame.x_low / self.cell_width).max(0.0) as usize;
        let end_column = (cell_floor(frame.x_up / self.cell_width).max(0.0) as usize).min(self.columns);
        let first_row = cell_ceil(frame.y_low / self.cell_height).max(0.0) as usize;
        let end_row = (cell_floor(frame.y_up / self.cell_height).max(0.0) as usize).min(self.rows);
        if end_column < first_column + width || end_row < first_row + height {
            return None;
        }

        let sums = self.prefix_sums();
        let occupied_in = |column: usize, row: usize| -> usize {
            let stride = self.columns + 1;
            let at = |c: usize, r: usize| sums[r * stride + c];
            at(column + width, row + height) + at(column, row)
                - at(column, row + height)
                - at(column + width, row)
        };

        for row in (first_row..=end_row - height).rev() {
            for column in (first_column..=end_column - width).rev() {
                if occupied_in(column, row) == 0 {
                    return Some((column as f64 * self.cell_width, row as f64 * self.cell_height));
                }
            }
        }
        None
    }

    /// Summed-area table with a zero border, `(columns + 1) x (rows + 1)`.
    fn prefix_sums(&self) -> Vec<usize> {
        let stride = self.columns + 1;
        let mut sums = vec![0; stride * (self.rows + 1)];
        for row in 0..self.rows {
            for column in 0..self.columns {
                let cell = usize::from(self.is_occupied(column, row));
                sums[(row + 1) * stride + column + 1] = cell
                    + sums[row * stride + column + 1]
                    + sums[(row + 1) * stride + column]
                    - sums[row * stride + column];
            }
        }
        sums
    }
}

/// Part of the segment inside `[0, 1]²` (Liang-Barsky), if any.
fn clip_to_unit(start: (f64, f64), end: (f64, f64)) -> Option<((f64, f64), (f64, f64))> {
    let (x0, y0) = start;
    let (dx, dy) = (end.0 - x0, end.1 - y0);
    if ![x0, y0, dx, dy].iter().all(|v| v.is_finite()) {
        return None;
    }
    let (mut enter, mut leave) = (0.0_f64, 1.0_f64);
    for (p, q) in [(-dx, x0), (dx, 1.0 - x0), (-dy, y0), (dy, 1.0 - y0)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let t = q / p;
            if p < 0.0 {
                enter = enter.max(t);
            } else {
                leave = leave.min(t);
            }
        }
    }
    if enter > leave {
        return None;
    }
    let at = |t: f64| (x0 + t * dx, y0 + t * dy);
    Some((at(enter), at(leave)))
}

/// Tolerance for coordinates that fall on a cell border up to rounding.
const CELL_EPSILON: f64 = 1e-6;

fn cell_floor(cells: f64) -> f64 {
    (cells + CELL_EPSILON).floor()
}

fn cell_ceil(cells: f64) -> f64 {
    (cells - CELL_EPSILON).ceil()
}

/// The four bands along the frame edges that hold the ticks.
///
/// `tick_x` and `tick_y` are the tick lengths of the x and y axes in pad NDC.
pub fn exclusion_rects(frame: &NdcRect, tick_x: f64, tick_y: f64) -> [NdcRect; 4] {
    let band_height = tick_x.min(0.5 * frame.height());
    let band_width = tick_y.min(0.5 * frame.width());
    [
        NdcRect::new(frame.x_low, frame.y_low, frame.x_up, frame.y_low + band_height),
        NdcRect::new(frame.x_low, frame.y_up - band_height, frame.x_up, frame.y_up),
        NdcRect::new(frame.x_low, frame.y_low, frame.x_low + band_width, frame.y_up),
        NdcRect::new(frame.x_up - band_width, frame.y_low, frame.x_up, frame.y_up),
    ]
}

/// Result of an auto-placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Box rectangle in pad NDC.
    pub rect: NdcRect,
    /// No free area was found and the frame corner was used.
    pub fallback: bool,
}

/// Find a position for a box of size `footprint` among the drawn `shapes`.
///
/// `exclusions` are added to every search. Without a free area the box is
/// anchored at the top-right frame corner, inset by [`PLACEMENT_INSET`].
pub fn auto_place(
    shapes: &[Shape],
    exclusions: &[NdcRect],
    footprint: Footprint,
    frame: &NdcRect,
    geometry: &PadGeometry,
    strategy: PlacementStrategy,
) -> Placement {
    let search = |skip: Option<usize>| {
        let mut grid = CollisionGrid::new(geometry);
        exclusions.iter().for_each(|rect| grid.mark_rect(rect));
        for (index, shape) in shapes.iter().enumerate() {
            if Some(index) != skip {
                grid.mark(shape);
            }
        }
        grid.find_free(footprint, frame)
    };

    let mut chosen = None;
    if shapes.is_empty() {
        chosen = search(None);
    }
    for index in 0..shapes.len() {
        if let Some(corner) = search(Some(index)) {
            trace!(primitive = index, x = corner.0, y = corner.1, "placement candidate");
            chosen = Some(corner);
            if strategy == PlacementStrategy::FirstCandidate {
                break;
            }
        }
    }

    match chosen {
        Some((x, y)) => Placement {
            rect: NdcRect::from_corner(x, y, footprint.width, footprint.height),
            fallback: false,
        },
        None => Placement {
            rect: NdcRect::new(
                frame.x_up - PLACEMENT_INSET - footprint.width,
                frame.y_up - PLACEMENT_INSET - footprint.height,
                frame.x_up - PLACEMENT_INSET,
                frame.y_up - PLACEMENT_INSET,
            ),
            fallback: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Margins;
    use approx_eq::assert_approx_eq;

    /// 200 x 200 pixel pad: a 20 x 20 grid of 0.05 NDC cells.
    fn geometry() -> PadGeometry {
        PadGeometry {
            rect: NdcRect::UNIT,
            margins: Margins::new(0.1, 0.1, 0.1, 0.1),
            canvas_width: 200,
            canvas_height: 200,
        }
    }

    fn footprint() -> Footprint {
        Footprint {
            width: 0.2,
            height: 0.1,
        }
    }

    #[test]
    fn test_empty_pad_places_top_right() {
        let geometry = geometry();
        let frame = geometry.frame();
        let placement = auto_place(&[], &[], footprint(), &frame, &geometry, PlacementStrategy::default());
        assert!(!placement.fallback);
        assert_approx_eq!(placement.rect.x_up, 0.9, 1e-9);
        assert_approx_eq!(placement.rect.y_up, 0.9, 1e-9);
    }

    #[test]
    fn test_exclusion_bands_push_box_inwards() {
        let geometry = geometry();
        let frame = geometry.frame();
        let bands = exclusion_rects(&frame, 0.05, 0.05);
        let placement = auto_place(&[], &bands, footprint(), &frame, &geometry, PlacementStrategy::default());
        // bands are 0.05 wide: one cell
        assert_approx_eq!(placement.rect.x_up, 0.85, 1e-9);
        assert_approx_eq!(placement.rect.y_up, 0.85, 1e-9);
    }

    #[test]
    fn test_last_and_first_candidate_differ() {
        let geometry = geometry();
        let frame = geometry.frame();
        // A blocks the top-right corner, B the top-left one.
        let a = Shape::Rects(vec![NdcRect::new(0.5, 0.5, 0.9, 0.9)]);
        let b = Shape::Rects(vec![NdcRect::new(0.1, 0.5, 0.5, 0.9)]);
        let shapes = [a, b];

        // ignoring A: free top-right corner
        let first = auto_place(&shapes, &[], footprint(), &frame, &geometry, PlacementStrategy::FirstCandidate);
        assert_approx_eq!(first.rect.x_up, 0.9, 1e-9);
        assert_approx_eq!(first.rect.y_up, 0.9, 1e-9);

        // ignoring B: top-left corner, the last search wins
        let last = auto_place(&shapes, &[], footprint(), &frame, &geometry, PlacementStrategy::LastCandidate);
        assert_approx_eq!(last.rect.x_up, 0.5, 1e-9);
        assert_approx_eq!(last.rect.y_up, 0.9, 1e-9);
    }

    #[test]
    fn test_full_pad_falls_back_to_corner() {
        let geometry = geometry();
        let frame = geometry.frame();
        let everything = Shape::Rects(vec![NdcRect::UNIT]);
        let shapes = [everything.clone(), everything];
        let placement = auto_place(&shapes, &[], footprint(), &frame, &geometry, PlacementStrategy::default());
        assert!(placement.fallback);
        assert_approx_eq!(placement.rect.x_up, 0.9 - PLACEMENT_INSET, 1e-9);
        assert_approx_eq!(placement.rect.y_low, 0.9 - PLACEMENT_INSET - 0.1, 1e-9);
    }

    #[test]
    fn test_polyline_far_outside_is_clipped() {
        let mut grid = CollisionGrid::new(&geometry());
        // rises from (0.1, 0.25) to y = 1e12 and comes back down at x = 0.9
        grid.mark_polyline(&[(0.1, 0.25), (0.5, 1e12), (0.9, 0.5)]);
        assert!(grid.is_occupied(2, 5));
        assert!(grid.is_occupied(2, 19));
        assert!(grid.is_occupied(18, 12));
        assert!(grid.is_occupied(18, 19));
        assert!(!grid.is_occupied(10, 10));
        assert!(!grid.is_occupied(10, 19));
    }

    #[test]
    fn test_clip_to_unit() {
        assert_eq!(clip_to_unit((2.0, 2.0), (3.0, 5.0)), None);
        assert_eq!(clip_to_unit((0.5, 0.5), (0.5, f64::NAN)), None);
        let ((x0, y0), (x1, y1)) = clip_to_unit((-1.0, 0.5), (3.0, 0.5)).expect("crosses the square");
        assert_eq!((x0, x1), (0.0, 1.0));
        assert_approx_eq!(y0, 0.5, 1e-12);
        assert_approx_eq!(y1, 0.5, 1e-12);
    }

    #[test]
    fn test_polyline_marks_crossed_cells() {
        let mut grid = CollisionGrid::new(&geometry());
        assert_eq!(grid.size(), (20, 20));
        grid.mark_polyline(&[(0.0, 0.0), (0.99, 0.99)]);
        assert!(grid.is_occupied(0, 0));
        assert!(grid.is_occupied(10, 10));
        assert!(grid.is_occupied(19, 19));
        assert!(!grid.is_occupied(19, 0));
    }
}
