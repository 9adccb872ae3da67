//! Pixel-grid mode constants.

/// Device pixels per source pixel in pixel-grid mode
pub const GRID_CELL_SIZE: u32 = 64;
/// Source pixels per tile edge
pub const GRID_TILE_SIZE: u32 = 16;
/// Built tiles kept in the LRU cache
pub const GRID_CACHE_TILES: usize = 200;
/// Label font size in device pixels
pub const GRID_FONT_PX: f32 = 12.0;
/// Gap between label lines
pub const GRID_LINE_GAP: f32 = 3.0;
/// Top padding of the first label line in a color cell
pub const GRID_PADDING: f32 = 5.0;
/// Extra tiles built around the visible area
pub const GRID_TILE_MARGIN: u32 = 1;
/// Luminance above which labels are drawn black
pub const GRID_INK_LUMINANCE: f32 = 140.0;
/// Grid line color (RGBA, 0-1)
pub const GRID_LINE_COLOR: [f32; 4] = [100.0 / 255.0, 100.0 / 255.0, 100.0 / 255.0, 120.0 / 255.0];
