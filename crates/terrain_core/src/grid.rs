//! Row-major 2-D grid shared by the region and tile stages.
//!
//! Every accessor is bounds-checked: reads outside the grid return
//! `None` and writes outside the grid are dropped. The cellular passes
//! rely on this to treat the map edge as "no neighbour".

use crate::error::{Result, TerrainError};

/// Offsets of the 4-connected neighbourhood.
pub const ORTHOGONAL: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Offsets of the 8-connected neighbourhood, x-outer / y-inner.
pub const MOORE: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Dense grid of small values stored in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid<T> {
    width: u32,
    height: u32,
    cells: Vec<T>,
}

impl<T: Copy + PartialEq> Grid<T> {
    /// Allocate a `width x height` grid with every cell set to `fill`.
    ///
    /// Fails on zero extents, on dimension overflow, and when the
    /// allocator cannot satisfy the request.
    pub fn try_new(width: u32, height: u32, fill: T) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(TerrainError::NonPositive {
                name: "grid",
                message: format!("{width}x{height} has zero area"),
            });
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or(TerrainError::DimensionOverflow {
                width: width as u64,
                height: height as u64,
            })?;

        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|source| TerrainError::Allocation {
                width,
                height,
                source,
            })?;
        cells.resize(len, fill);

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Grid width in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(x, y) {
            Some((y as usize) * (self.width as usize) + (x as usize))
        } else {
            None
        }
    }

    /// Check if signed coordinates fall inside the grid.
    #[inline]
    #[must_use]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Value at `(x, y)`, or `None` outside the grid.
    #[inline]
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Option<T> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Set `(x, y)` to `value`. Out-of-bounds writes are ignored.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, value: T) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = value;
        }
    }

    /// Count 8-connected neighbours of `(x, y)` equal to `value`.
    ///
    /// Cells beyond the edge never match.
    #[must_use]
    pub fn touching(&self, x: i32, y: i32, value: T) -> usize {
        MOORE
            .iter()
            .filter(|(dx, dy)| self.get(x + dx, y + dy) == Some(value))
            .count()
    }

    /// Set `(x, y)` and its 4-connected neighbours to `value`.
    pub fn surround(&mut self, x: i32, y: i32, value: T) {
        self.set(x, y, value);
        for (dx, dy) in ORTHOGONAL {
            self.set(x + dx, y + dy, value);
        }
    }

    /// Number of cells equal to `value`.
    #[must_use]
    pub fn count(&self, value: T) -> usize {
        self.cells.iter().filter(|&&c| c == value).count()
    }

    /// All cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    /// Replace every cell using `f`.
    pub fn map_in_place(&mut self, mut f: impl FnMut(T) -> T) {
        for cell in &mut self.cells {
            *cell = f(*cell);
        }
    }

    /// Coordinates in pipeline scan order: x outer, y inner.
    pub fn scan_order(&self) -> impl Iterator<Item = (i32, i32)> {
        let (w, h) = (self.width as i32, self.height as i32);
        (0..w).flat_map(move |x| (0..h).map(move |y| (x, y)))
    }
}
