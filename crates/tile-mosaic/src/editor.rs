//! The mosaic editor context.
//!
//! [`MosaicEditor`] owns everything the original interactive surface kept in
//! ambient globals: the current source frame, processing parameters, the
//! dithered canvas, the tile grid, undo history, and the in-flight pointer
//! gesture. Staleness is tracked with two explicit generation counters --
//! one for the pipeline (canvas), one for the grid -- which a host loop can
//! compare against cached values instead of guessing from dirty flags.
//!
//! The whole editor is single-threaded and pull-based: nothing recomputes
//! until [`refresh`](MosaicEditor::refresh) is called, and a refresh always
//! runs to completion.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::buffer::PixelBuffer;
use crate::compositor;
use crate::error::MosaicError;
use crate::grid::history::HistoryManager;
use crate::grid::selection::SelectionRegion;
use crate::grid::TileGrid;
use crate::pipeline::{ProcessingParameters, ProcessingPipeline};

/// Default scale factor for high-resolution export.
pub const DEFAULT_EXPORT_SCALE: u32 = 6;

/// Default live-frame cadence: only every Nth submitted frame is processed.
pub const DEFAULT_FRAME_SKIP: u32 = 10;

/// Default tile-count parameter (cols = tile_count * 4).
pub const DEFAULT_TILE_COUNT: u32 = 2;

/// The pointer gesture currently in flight.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    /// A tile was picked up and will swap with the tile under the release
    /// point.
    DragTile(usize),
    /// A rubber-band selection is being drawn.
    SelectRegion { start: (f32, f32), end: (f32, f32) },
}

/// Owner of the full mosaic editing state.
pub struct MosaicEditor {
    pipeline: ProcessingPipeline,
    params: ProcessingParameters,
    tile_count: u32,
    source: Option<PixelBuffer>,
    canvas: Option<PixelBuffer>,
    grid: Option<TileGrid>,
    history: HistoryManager,
    rng: StdRng,
    gesture: Gesture,
    show_selection: bool,
    pipeline_dirty: bool,
    grid_dirty: bool,
    pipeline_generation: u64,
    grid_generation: u64,
    frame_skip: u32,
    frame_counter: u64,
}

impl Default for MosaicEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl MosaicEditor {
    /// Editor with default parameters and an entropy-seeded shuffle RNG.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Editor whose shuffles are reproducible from the given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            pipeline: ProcessingPipeline::new(),
            params: ProcessingParameters::default(),
            tile_count: DEFAULT_TILE_COUNT,
            source: None,
            canvas: None,
            grid: None,
            history: HistoryManager::new(),
            rng,
            gesture: Gesture::Idle,
            show_selection: true,
            pipeline_dirty: false,
            grid_dirty: false,
            pipeline_generation: 0,
            grid_generation: 0,
            frame_skip: DEFAULT_FRAME_SKIP,
            frame_counter: 0,
        }
    }

    // ------------------------------------------------------------------
    // Inputs
    // ------------------------------------------------------------------

    /// Replace the source image. The pipeline and grid are both marked
    /// stale; nothing recomputes until the next [`refresh`](Self::refresh).
    pub fn set_source(&mut self, source: PixelBuffer) {
        self.source = Some(source);
        self.pipeline_dirty = true;
        self.grid_dirty = true;
    }

    /// Submit a live frame, honoring the frame-skip cadence. Returns `true`
    /// when the frame was accepted as the new source.
    ///
    /// Unlike [`set_source`](Self::set_source), an accepted frame does not
    /// force a grid rebuild: the canvas geometry is fixed, so tile
    /// placements survive across frames.
    pub fn submit_frame(&mut self, frame: PixelBuffer) -> bool {
        self.frame_counter += 1;
        if self.frame_counter % self.frame_skip as u64 != 0 {
            return false;
        }
        let first_source = self.source.is_none();
        self.source = Some(frame);
        self.pipeline_dirty = true;
        if first_source {
            self.grid_dirty = true;
        }
        true
    }

    /// Replace the processing parameters, marking the pipeline stale.
    pub fn set_parameters(&mut self, params: ProcessingParameters) {
        if self.params != params {
            self.params = params;
            self.pipeline_dirty = true;
        }
    }

    /// Replace the tile-count parameter, marking the grid stale. The next
    /// refresh discards all placement state and history.
    pub fn set_tile_count(&mut self, tile_count: u32) -> Result<(), MosaicError> {
        if tile_count < 1 {
            return Err(MosaicError::InvalidParameter {
                name: "tile_count",
                value: tile_count as i64,
                allowed: ">= 1",
            });
        }
        if self.tile_count != tile_count {
            self.tile_count = tile_count;
            self.grid_dirty = true;
        }
        Ok(())
    }

    /// Change how many submitted frames are skipped between pipeline runs.
    pub fn set_frame_skip(&mut self, frame_skip: u32) -> Result<(), MosaicError> {
        if frame_skip < 1 {
            return Err(MosaicError::InvalidParameter {
                name: "frame_skip",
                value: frame_skip as i64,
                allowed: ">= 1",
            });
        }
        self.frame_skip = frame_skip;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Recomputation
    // ------------------------------------------------------------------

    /// Re-run whichever stages are stale.
    ///
    /// With no source available the pipeline run is skipped and any prior
    /// canvas is retained. A grid rebuild replaces all placement state and
    /// clears the history, since old snapshots no longer align.
    pub fn refresh(&mut self) -> Result<(), MosaicError> {
        if self.pipeline_dirty {
            match &self.source {
                Some(source) => {
                    self.canvas = Some(self.pipeline.run(source, &self.params));
                    self.pipeline_dirty = false;
                    self.pipeline_generation += 1;
                }
                None => {
                    tracing::debug!("refresh skipped: no source image");
                }
            }
        }

        if self.grid_dirty {
            if let Some(canvas) = &self.canvas {
                let grid = TileGrid::build(self.tile_count, canvas.width(), canvas.height())?;
                tracing::info!(
                    cols = grid.cols(),
                    rows = grid.rows(),
                    generation = self.grid_generation + 1,
                    "tile grid rebuilt"
                );
                self.grid = Some(grid);
                self.history.clear();
                self.gesture = Gesture::Idle;
                self.grid_dirty = false;
                self.grid_generation += 1;
            }
        }

        Ok(())
    }

    /// True when a refresh would recompute something.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.pipeline_dirty || self.grid_dirty
    }

    /// Monotonic counter bumped on every completed pipeline run.
    #[inline]
    pub fn pipeline_generation(&self) -> u64 {
        self.pipeline_generation
    }

    /// Monotonic counter bumped on every grid rebuild.
    #[inline]
    pub fn grid_generation(&self) -> u64 {
        self.grid_generation
    }

    // ------------------------------------------------------------------
    // Pointer interaction
    // ------------------------------------------------------------------

    /// Begin a gesture. With `select` the gesture is a rubber-band
    /// selection; otherwise the tile under the pointer (if any) is picked
    /// up for a swap. Without a grid this is a no-op.
    pub fn pointer_down(&mut self, x: f32, y: f32, select: bool) {
        let Some(grid) = &self.grid else { return };

        self.gesture = if select {
            Gesture::SelectRegion {
                start: (x, y),
                end: (x, y),
            }
        } else {
            match grid.hit_test(x, y) {
                Some(index) => Gesture::DragTile(index),
                None => Gesture::Idle,
            }
        };
    }

    /// Extend the gesture in flight. Only selection rubber-bands track the
    /// pointer; a picked-up tile resolves at release.
    pub fn pointer_drag(&mut self, x: f32, y: f32) {
        if let Gesture::SelectRegion { end, .. } = &mut self.gesture {
            *end = (x, y);
        }
    }

    /// Finish the gesture: resolve a selection region, or swap the dragged
    /// tile with the tile under the release point.
    pub fn pointer_up(&mut self, x: f32, y: f32) {
        let gesture = std::mem::replace(&mut self.gesture, Gesture::Idle);
        let Some(grid) = &mut self.grid else { return };

        match gesture {
            Gesture::Idle => {}
            Gesture::SelectRegion { start, .. } => {
                grid.set_selection(&SelectionRegion::new(start, (x, y)));
                tracing::debug!(selected = grid.selected_count(), "selection updated");
            }
            Gesture::DragTile(source_index) => {
                if let Some(target_index) = grid.hit_test(x, y) {
                    if target_index != source_index {
                        self.history.snapshot(grid);
                        grid.swap(source_index, target_index);
                    }
                }
            }
        }
    }

    /// The tile currently under (x, y), if any -- a pure query for host
    /// hover indicators.
    pub fn hovered_tile(&self, x: f32, y: f32) -> Option<usize> {
        self.grid.as_ref().and_then(|grid| grid.hit_test(x, y))
    }

    /// The tile picked up by the gesture in flight, if any.
    pub fn dragged_tile(&self) -> Option<usize> {
        match self.gesture {
            Gesture::DragTile(index) => Some(index),
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    /// Shuffle the selected tiles. Snapshots first, even when 0 or 1 tiles
    /// are selected and nothing visibly moves. No-op without a grid.
    pub fn request_shuffle(&mut self) {
        let Some(grid) = &mut self.grid else { return };
        self.history.snapshot(grid);
        grid.shuffle(&mut self.rng);
        tracing::debug!(selected = grid.selected_count(), "shuffled selection");
    }

    /// Undo the most recent mutating action. Silent no-op on empty history
    /// or without a grid.
    pub fn request_undo(&mut self) {
        if let Some(grid) = &mut self.grid {
            self.history.undo(grid);
        }
    }

    /// Redo the most recently undone action. Silent no-op on empty redo
    /// history or without a grid.
    pub fn request_redo(&mut self) {
        if let Some(grid) = &mut self.grid {
            self.history.redo(grid);
        }
    }

    /// Toggle the selection overlay in previews.
    pub fn toggle_selection_visibility(&mut self) {
        self.show_selection = !self.show_selection;
    }

    #[inline]
    pub fn selection_visible(&self) -> bool {
        self.show_selection
    }

    // ------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------

    /// Render the current arrangement at scale 1, with the selection
    /// overlay when visible.
    pub fn preview(&self) -> Result<PixelBuffer, MosaicError> {
        let canvas = self.canvas.as_ref().ok_or(MosaicError::EmptySource)?;
        let grid = self.grid.as_ref().ok_or(MosaicError::GridNotBuilt)?;
        compositor::render_preview(grid, canvas, self.show_selection)
    }

    /// Render the current arrangement into an independent buffer at the
    /// given scale, without any overlay. Neither the canvas nor the grid
    /// is touched.
    pub fn request_export(&self, scale: u32) -> Result<PixelBuffer, MosaicError> {
        let canvas = self.canvas.as_ref().ok_or(MosaicError::EmptySource)?;
        let grid = self.grid.as_ref().ok_or(MosaicError::GridNotBuilt)?;
        let output = compositor::render(grid, canvas, scale)?;
        tracing::info!(
            scale,
            width = output.width(),
            height = output.height(),
            "exported mosaic"
        );
        Ok(output)
    }

    // ------------------------------------------------------------------
    // State queries
    // ------------------------------------------------------------------

    #[inline]
    pub fn parameters(&self) -> &ProcessingParameters {
        &self.params
    }

    #[inline]
    pub fn tile_count(&self) -> u32 {
        self.tile_count
    }

    #[inline]
    pub fn canvas(&self) -> Option<&PixelBuffer> {
        self.canvas.as_ref()
    }

    #[inline]
    pub fn grid(&self) -> Option<&TileGrid> {
        self.grid.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dither::DitherMode;
    use pretty_assertions::assert_eq;

    fn gradient_source() -> PixelBuffer {
        let mut source = PixelBuffer::new(80, 113).unwrap();
        for y in 0..113 {
            for x in 0..80 {
                let v = ((x * 255) / 80) as u8;
                source.set_rgba(x, y, [v, v, v, 255]);
            }
        }
        source
    }

    fn ready_editor() -> MosaicEditor {
        let mut editor = MosaicEditor::with_seed(11);
        editor.set_source(gradient_source());
        editor.set_tile_count(1).unwrap();
        editor.refresh().unwrap();
        editor
    }

    #[test]
    fn test_refresh_without_source_keeps_state() {
        let mut editor = MosaicEditor::with_seed(1);
        editor.refresh().unwrap();
        assert!(editor.canvas().is_none());
        assert_eq!(editor.pipeline_generation(), 0);
        assert_eq!(editor.grid_generation(), 0);
    }

    #[test]
    fn test_refresh_builds_canvas_and_grid() {
        let editor = ready_editor();
        assert!(editor.canvas().is_some());
        let grid = editor.grid().unwrap();
        assert_eq!(grid.cols(), 4);
        assert_eq!(editor.pipeline_generation(), 1);
        assert_eq!(editor.grid_generation(), 1);
        assert!(!editor.is_dirty());
    }

    #[test]
    fn test_parameter_change_bumps_pipeline_generation_only() {
        let mut editor = ready_editor();
        let params =
            ProcessingParameters::new(100, 2, DitherMode::OrderedThreshold).unwrap();
        editor.set_parameters(params);
        assert!(editor.is_dirty());

        editor.refresh().unwrap();
        assert_eq!(editor.pipeline_generation(), 2);
        assert_eq!(editor.grid_generation(), 1);
    }

    #[test]
    fn test_setting_identical_parameters_is_clean() {
        let mut editor = ready_editor();
        let same = *editor.parameters();
        editor.set_parameters(same);
        assert!(!editor.is_dirty());
    }

    #[test]
    fn test_tile_count_change_rebuilds_grid_and_clears_history() {
        let mut editor = ready_editor();
        // Make an undoable action first.
        editor.pointer_down(50.0, 70.0, false);
        editor.pointer_up(150.0, 200.0);
        assert_ne!(
            editor.grid().unwrap().tiles()[0].grid_col,
            editor.grid().unwrap().tiles()[0].home_col
        );

        editor.set_tile_count(2).unwrap();
        editor.refresh().unwrap();

        let grid = editor.grid().unwrap();
        assert_eq!(grid.cols(), 8);
        assert_eq!(editor.grid_generation(), 2);
        // History from the old grid is gone: undo changes nothing.
        let before = grid.placements();
        editor.request_undo();
        assert_eq!(editor.grid().unwrap().placements(), before);
    }

    #[test]
    fn test_invalid_tile_count_rejected_and_state_kept() {
        let mut editor = ready_editor();
        assert!(editor.set_tile_count(0).is_err());
        assert_eq!(editor.tile_count(), 1);
        assert!(!editor.is_dirty());
    }

    #[test]
    fn test_drag_swap_is_undoable() {
        let mut editor = ready_editor();
        let initial = editor.grid().unwrap().placements();

        editor.pointer_down(50.0, 70.0, false);
        editor.pointer_drag(120.0, 180.0);
        editor.pointer_up(150.0, 200.0);

        let swapped = editor.grid().unwrap().placements();
        assert_ne!(initial, swapped);

        editor.request_undo();
        assert_eq!(editor.grid().unwrap().placements(), initial);

        editor.request_redo();
        assert_eq!(editor.grid().unwrap().placements(), swapped);
    }

    #[test]
    fn test_drag_released_over_same_tile_does_nothing() {
        let mut editor = ready_editor();
        let initial = editor.grid().unwrap().placements();

        editor.pointer_down(50.0, 70.0, false);
        editor.pointer_up(55.0, 75.0);

        assert_eq!(editor.grid().unwrap().placements(), initial);
        // No snapshot was taken either: undo is a no-op.
        editor.request_undo();
        assert_eq!(editor.grid().unwrap().placements(), initial);
    }

    #[test]
    fn test_drag_released_outside_grid_is_noop() {
        let mut editor = ready_editor();
        let initial = editor.grid().unwrap().placements();

        editor.pointer_down(50.0, 70.0, false);
        editor.pointer_up(-20.0, -20.0);

        assert_eq!(editor.grid().unwrap().placements(), initial);
    }

    #[test]
    fn test_select_gesture_sets_selection() {
        let mut editor = ready_editor();

        editor.pointer_down(10.0, 10.0, true);
        editor.pointer_drag(150.0, 100.0);
        editor.pointer_up(190.0, 130.0);

        // Region (10,10)-(190,130) overlaps tiles (0,0) and (1,0).
        assert_eq!(editor.grid().unwrap().selected_count(), 2);
    }

    #[test]
    fn test_shuffle_snapshots_even_when_nothing_selected() {
        let mut editor = ready_editor();
        let initial = editor.grid().unwrap().placements();

        editor.request_shuffle();
        assert_eq!(editor.grid().unwrap().placements(), initial);

        // The snapshot is still there; undo restores the same state.
        editor.request_undo();
        assert_eq!(editor.grid().unwrap().placements(), initial);
    }

    #[test]
    fn test_pointer_ops_before_first_refresh_are_noops() {
        let mut editor = MosaicEditor::with_seed(5);
        editor.pointer_down(10.0, 10.0, false);
        editor.pointer_drag(20.0, 20.0);
        editor.pointer_up(30.0, 30.0);
        editor.request_shuffle();
        editor.request_undo();
        editor.request_redo();
        assert!(editor.grid().is_none());
    }

    #[test]
    fn test_export_before_pipeline_fails_cleanly() {
        let editor = MosaicEditor::with_seed(2);
        assert_eq!(
            editor.request_export(2).unwrap_err(),
            MosaicError::EmptySource
        );
    }

    #[test]
    fn test_export_does_not_disturb_editor_state() {
        let mut editor = ready_editor();
        editor.pointer_down(50.0, 70.0, false);
        editor.pointer_up(150.0, 200.0);
        let placements = editor.grid().unwrap().placements();
        let canvas = editor.canvas().unwrap().clone();

        let export = editor.request_export(DEFAULT_EXPORT_SCALE).unwrap();
        assert_eq!(export.width(), canvas.width() * DEFAULT_EXPORT_SCALE);
        assert_eq!(export.height(), canvas.height() * DEFAULT_EXPORT_SCALE);

        assert_eq!(editor.grid().unwrap().placements(), placements);
        assert_eq!(editor.canvas().unwrap(), &canvas);
    }

    #[test]
    fn test_frame_cadence_skips_intermediate_frames() {
        let mut editor = MosaicEditor::with_seed(9);
        editor.set_frame_skip(3).unwrap();

        assert!(!editor.submit_frame(gradient_source()));
        assert!(!editor.submit_frame(gradient_source()));
        assert!(editor.submit_frame(gradient_source()));
        assert!(editor.is_dirty());

        editor.refresh().unwrap();
        assert_eq!(editor.pipeline_generation(), 1);
        assert_eq!(editor.grid_generation(), 1);
    }

    #[test]
    fn test_accepted_frames_keep_placements() {
        let mut editor = ready_editor();
        editor.set_frame_skip(1).unwrap();
        editor.pointer_down(50.0, 70.0, false);
        editor.pointer_up(150.0, 200.0);
        let placements = editor.grid().unwrap().placements();

        assert!(editor.submit_frame(gradient_source()));
        editor.refresh().unwrap();

        assert_eq!(editor.pipeline_generation(), 2);
        assert_eq!(editor.grid_generation(), 1);
        assert_eq!(editor.grid().unwrap().placements(), placements);
    }

    #[test]
    fn test_toggle_selection_visibility() {
        let mut editor = MosaicEditor::with_seed(0);
        assert!(editor.selection_visible());
        editor.toggle_selection_visibility();
        assert!(!editor.selection_visible());
        editor.toggle_selection_visibility();
        assert!(editor.selection_visible());
    }

    #[test]
    fn test_preview_matches_canvas_dimensions() {
        let editor = ready_editor();
        let preview = editor.preview().unwrap();
        let canvas = editor.canvas().unwrap();
        assert_eq!(preview.width(), canvas.width());
        assert_eq!(preview.height(), canvas.height());
    }
}
