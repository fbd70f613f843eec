//! Linear undo/redo over tile placements.
//!
//! [`HistoryManager`] keeps two stacks of grid-placement snapshots aligned
//! by tile index. The initiator of a mutating action snapshots *before*
//! mutating, so undo always restores the pre-action state. Every new
//! snapshot clears the redo stack -- the history is linear, never branching.

use super::TileGrid;

/// One tile's mutable placement state, as captured in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TilePlacement {
    pub grid_col: u32,
    pub grid_row: u32,
    pub is_selected: bool,
}

/// Undo/redo stacks of whole-grid placement snapshots.
#[derive(Debug, Default)]
pub struct HistoryManager {
    undo_stack: Vec<Vec<TilePlacement>>,
    redo_stack: Vec<Vec<TilePlacement>>,
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the grid's current placements onto the undo stack and clear
    /// the redo stack. Call this immediately *before* a mutating action.
    pub fn snapshot(&mut self, grid: &TileGrid) {
        self.undo_stack.push(grid.placements());
        self.redo_stack.clear();
    }

    /// Restore the most recent snapshot; the current state moves to the
    /// redo stack. Returns `false` (and does nothing) when there is no
    /// snapshot to restore.
    pub fn undo(&mut self, grid: &mut TileGrid) -> bool {
        match self.undo_stack.pop() {
            Some(previous) => {
                self.redo_stack.push(grid.placements());
                grid.apply_placements(&previous);
                true
            }
            None => false,
        }
    }

    /// Inverse of [`undo`](Self::undo). Returns `false` when the redo stack
    /// is empty.
    pub fn redo(&mut self, grid: &mut TileGrid) -> bool {
        match self.redo_stack.pop() {
            Some(next) => {
                self.undo_stack.push(grid.placements());
                grid.apply_placements(&next);
                true
            }
            None => false,
        }
    }

    /// Drop all history. Used when the grid is rebuilt, since snapshots
    /// from a previous grid no longer align with the new tiles.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    #[inline]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    #[inline]
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn small_grid() -> TileGrid {
        // tile_count 1 on a 400x565 canvas: 4 cols, 4 rows.
        TileGrid::build(1, 400, 565).unwrap()
    }

    #[test]
    fn test_undo_on_empty_stack_is_noop() {
        let mut grid = small_grid();
        let before = grid.placements();
        let mut history = HistoryManager::new();

        assert!(!history.undo(&mut grid));
        assert_eq!(grid.placements(), before);
    }

    #[test]
    fn test_redo_on_empty_stack_is_noop() {
        let mut grid = small_grid();
        let before = grid.placements();
        let mut history = HistoryManager::new();

        assert!(!history.redo(&mut grid));
        assert_eq!(grid.placements(), before);
    }

    #[test]
    fn test_undo_restores_pre_mutation_state() {
        let mut grid = small_grid();
        let mut history = HistoryManager::new();

        let before = grid.placements();
        history.snapshot(&grid);
        grid.swap(0, 5);

        assert_ne!(grid.placements(), before);
        assert!(history.undo(&mut grid));
        assert_eq!(grid.placements(), before);
    }

    #[test]
    fn test_redo_reapplies_undone_mutation() {
        let mut grid = small_grid();
        let mut history = HistoryManager::new();

        history.snapshot(&grid);
        grid.swap(0, 5);
        let after = grid.placements();

        history.undo(&mut grid);
        assert!(history.redo(&mut grid));
        assert_eq!(grid.placements(), after);
    }

    #[test]
    fn test_new_snapshot_clears_redo() {
        let mut grid = small_grid();
        let mut history = HistoryManager::new();

        history.snapshot(&grid);
        grid.swap(0, 1);
        history.undo(&mut grid);
        assert_eq!(history.redo_depth(), 1);

        history.snapshot(&grid);
        grid.swap(2, 3);

        assert_eq!(history.redo_depth(), 0);
        assert!(!history.redo(&mut grid));
    }

    #[test]
    fn test_deep_undo_redo_round_trip() {
        let mut grid = small_grid();
        let mut history = HistoryManager::new();

        let initial = grid.placements();
        let swaps = [(0usize, 1usize), (2, 3), (4, 7), (1, 6), (0, 15)];
        let mut states = Vec::new();

        for &(a, b) in &swaps {
            history.snapshot(&grid);
            grid.swap(a, b);
            states.push(grid.placements());
        }

        for _ in 0..swaps.len() {
            assert!(history.undo(&mut grid));
        }
        assert_eq!(grid.placements(), initial);

        for state in &states {
            assert!(history.redo(&mut grid));
            assert_eq!(&grid.placements(), state);
        }
    }

    #[test]
    fn test_snapshot_includes_selection_flags() {
        use crate::grid::selection::SelectionRegion;

        let mut grid = small_grid();
        let mut history = HistoryManager::new();

        history.snapshot(&grid);
        grid.set_selection(&SelectionRegion::new((-1.0, -1.0), (1000.0, 1000.0)));
        assert!(grid.tiles().iter().all(|t| t.is_selected));

        assert!(history.undo(&mut grid));
        assert!(grid.tiles().iter().all(|t| !t.is_selected));
    }
}
