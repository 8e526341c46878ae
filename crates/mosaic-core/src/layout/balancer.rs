//! Greedy shortest-column masonry packing

use serde::Serialize;

use crate::gallery::{Item, ItemId};

/// Tile rendered height as a fraction of its declared height
pub const HEIGHT_SCALE: f64 = 0.5;

/// Position and size of a tile in track-local units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TileRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl TileRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// An item placed in the grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridItem {
    /// Position of the item in the caller's list
    pub index: usize,
    pub id: ItemId,
    pub column: usize,
    pub rect: TileRect,
}

/// Accumulated height of every column after a layout pass
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ColumnState {
    heights: Vec<f64>,
}

impl ColumnState {
    fn new(column_count: usize) -> Self {
        Self {
            heights: vec![0.0; column_count],
        }
    }

    /// Lowest-index column among the shortest ones
    fn shortest(&self) -> usize {
        self.heights
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map(|(idx, _)| idx)
            .unwrap_or(0)
    }

    pub fn heights(&self) -> &[f64] {
        &self.heights
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    pub fn max(&self) -> f64 {
        self.heights.iter().copied().fold(0.0, f64::max)
    }

    pub fn min(&self) -> f64 {
        self.heights.iter().copied().reduce(f64::min).unwrap_or(0.0)
    }
}

/// Result of one layout pass
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MasonryLayout {
    /// Tiles in input order
    pub tiles: Vec<GridItem>,
    pub columns: ColumnState,
    pub column_width: f64,
}

impl MasonryLayout {
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Total height of the grid (tallest column)
    pub fn content_height(&self) -> f64 {
        self.columns.max()
    }

    pub fn tile(&self, id: &ItemId) -> Option<&GridItem> {
        self.tiles.iter().find(|t| &t.id == id)
    }

    /// Tile under a point in track-local units
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&GridItem> {
        self.tiles.iter().find(|t| t.rect.contains(x, y))
    }
}

/// Rendered height of an item
pub fn rendered_height(item: &Item) -> f64 {
    item.declared_height.max(0.0) * HEIGHT_SCALE
}

/// Pack items into `column_count` columns across `track_width`
///
/// Each item goes to the currently shortest column, ties resolved towards
/// the left. Output keeps the input order. A track that has not been
/// measured yet (zero width) yields an empty layout.
pub fn layout(items: &[Item], column_count: usize, track_width: f64) -> MasonryLayout {
    if !track_width.is_finite() || track_width <= 0.0 {
        return MasonryLayout::default();
    }

    let column_count = column_count.max(1);
    let column_width = track_width / column_count as f64;
    let mut columns = ColumnState::new(column_count);
    let mut tiles = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let column = columns.shortest();
        let height = rendered_height(item);
        let rect = TileRect::new(
            column as f64 * column_width,
            columns.heights[column],
            column_width,
            height,
        );
        columns.heights[column] += height;

        tiles.push(GridItem {
            index,
            id: item.id.clone(),
            column,
            rect,
        });
    }

    MasonryLayout {
        tiles,
        columns,
        column_width,
    }
}
