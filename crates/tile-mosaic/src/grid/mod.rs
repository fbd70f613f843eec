//! The tile grid: derived geometry and rearrangeable placement state.
//!
//! A [`TileGrid`] partitions the dithered canvas into uniform rectangular
//! tiles. Every tile carries a fixed *home* position (where it samples the
//! canvas from, assigned once at build time) and a mutable *grid* position
//! (where it is currently displayed). All moves are pairwise swaps or
//! permutations over selected tiles, so the grid positions are always a
//! permutation of the home positions: no cell is ever empty or doubly
//! occupied.
//!
//! The grid is rebuilt from scratch whenever the tile-count parameter or
//! the canvas changes -- a deliberate reset, not an incremental resize.

pub mod history;
pub mod selection;

use rand::Rng;

use crate::error::MosaicError;
use history::TilePlacement;
use selection::{Rect, SelectionRegion};

/// Height/width ratio of every tile, a page-like portrait aspect.
pub const TILE_ASPECT: f32 = 1.41;

/// Columns per unit of the tile-count parameter.
const COLS_PER_COUNT: u32 = 4;

/// One tile of the mosaic.
///
/// `home_*` never change after the grid is built; `grid_*` move under
/// swaps, shuffles, and history restores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub home_col: u32,
    pub home_row: u32,
    pub grid_col: u32,
    pub grid_row: u32,
    pub is_selected: bool,
}

/// A rows x cols partition of the canvas with per-tile placement state.
#[derive(Debug, Clone)]
pub struct TileGrid {
    cols: u32,
    rows: u32,
    tile_width: f32,
    tile_height: f32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Derive a fresh grid from the tile-count parameter and canvas size.
    ///
    /// `cols = tile_count * 4`; the tile width follows from the canvas
    /// width, the tile height from the fixed [`TILE_ASPECT`], and the row
    /// count from how many whole tiles fit the canvas height. Every tile
    /// starts at its home position with selection cleared.
    pub fn build(tile_count: u32, canvas_width: u32, canvas_height: u32) -> Result<Self, MosaicError> {
        if tile_count < 1 {
            return Err(MosaicError::InvalidParameter {
                name: "tile_count",
                value: tile_count as i64,
                allowed: ">= 1",
            });
        }
        if canvas_width == 0 || canvas_height == 0 {
            return Err(MosaicError::EmptyBuffer {
                width: canvas_width,
                height: canvas_height,
            });
        }

        let cols = tile_count * COLS_PER_COUNT;
        let tile_width = canvas_width as f32 / cols as f32;
        let tile_height = tile_width * TILE_ASPECT;
        let rows = (canvas_height as f32 / tile_height).floor() as u32;

        let mut tiles = Vec::with_capacity((cols * rows) as usize);
        for y in 0..rows {
            for x in 0..cols {
                tiles.push(Tile {
                    home_col: x,
                    home_row: y,
                    grid_col: x,
                    grid_row: y,
                    is_selected: false,
                });
            }
        }

        tracing::debug!(cols, rows, tile_width, tile_height, "tile grid built");
        Ok(Self {
            cols,
            rows,
            tile_width,
            tile_height,
            tiles,
        })
    }

    #[inline]
    pub fn cols(&self) -> u32 {
        self.cols
    }

    #[inline]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    #[inline]
    pub fn tile_width(&self) -> f32 {
        self.tile_width
    }

    #[inline]
    pub fn tile_height(&self) -> f32 {
        self.tile_height
    }

    #[inline]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// The screen rectangle a tile currently occupies.
    pub fn tile_rect(&self, tile: &Tile) -> Rect {
        let x0 = tile.grid_col as f32 * self.tile_width;
        let y0 = tile.grid_row as f32 * self.tile_height;
        Rect {
            x0,
            y0,
            x1: x0 + self.tile_width,
            y1: y0 + self.tile_height,
        }
    }

    /// Index of the tile whose current rectangle strictly contains (x, y).
    ///
    /// Points on a tile border, or outside the tiled area, yield `None`;
    /// interaction handlers treat that as a no-op.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<usize> {
        self.tiles.iter().position(|tile| {
            let rect = self.tile_rect(tile);
            x > rect.x0 && x < rect.x1 && y > rect.y0 && y < rect.y1
        })
    }

    /// Exchange the grid positions of two tiles. A tile swapped with itself
    /// is a no-op.
    pub fn swap(&mut self, a: usize, b: usize) {
        debug_assert!(a < self.tiles.len() && b < self.tiles.len());
        if a == b {
            return;
        }
        let a_pos = (self.tiles[a].grid_col, self.tiles[a].grid_row);
        let b_pos = (self.tiles[b].grid_col, self.tiles[b].grid_row);
        self.tiles[a].grid_col = b_pos.0;
        self.tiles[a].grid_row = b_pos.1;
        self.tiles[b].grid_col = a_pos.0;
        self.tiles[b].grid_row = a_pos.1;
    }

    /// Mark exactly the tiles whose current rectangle intersects the
    /// region as selected; everything else is deselected.
    pub fn set_selection(&mut self, region: &SelectionRegion) {
        let rect = region.to_rect();
        for i in 0..self.tiles.len() {
            let tile_rect = self.tile_rect(&self.tiles[i]);
            self.tiles[i].is_selected = tile_rect.intersects(&rect);
        }
    }

    /// Number of currently selected tiles.
    pub fn selected_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_selected).count()
    }

    /// Apply a uniform random permutation to the grid positions of the
    /// selected tiles; unselected tiles never move.
    ///
    /// With zero or one tile selected there is nothing visible to permute,
    /// but callers still snapshot beforehand -- every mutating action does.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        let selected: Vec<usize> = (0..self.tiles.len())
            .filter(|&i| self.tiles[i].is_selected)
            .collect();

        let mut positions: Vec<(u32, u32)> = selected
            .iter()
            .map(|&i| (self.tiles[i].grid_col, self.tiles[i].grid_row))
            .collect();

        // Fisher-Yates with an inclusive upper bound each step.
        for i in (1..positions.len()).rev() {
            let j = rng.gen_range(0..=i);
            positions.swap(i, j);
        }

        for (&tile_idx, &(col, row)) in selected.iter().zip(positions.iter()) {
            self.tiles[tile_idx].grid_col = col;
            self.tiles[tile_idx].grid_row = row;
        }
    }

    /// Snapshot of every tile's mutable placement state, in stable grid
    /// order.
    pub fn placements(&self) -> Vec<TilePlacement> {
        self.tiles
            .iter()
            .map(|t| TilePlacement {
                grid_col: t.grid_col,
                grid_row: t.grid_row,
                is_selected: t.is_selected,
            })
            .collect()
    }

    /// Restore placements captured by [`placements`](Self::placements).
    ///
    /// Snapshots from a differently-sized grid are ignored; the editor
    /// clears history on rebuild, so this only guards against misuse.
    pub fn apply_placements(&mut self, placements: &[TilePlacement]) {
        debug_assert_eq!(placements.len(), self.tiles.len(), "snapshot from another grid");
        if placements.len() != self.tiles.len() {
            return;
        }
        for (tile, placement) in self.tiles.iter_mut().zip(placements.iter()) {
            tile.grid_col = placement.grid_col;
            tile.grid_row = placement.grid_row;
            tile.is_selected = placement.is_selected;
        }
    }
}
