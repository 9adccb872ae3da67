//! Pixel-grid mode: every source pixel becomes a labeled cell.
//!
//! Cells are built per tile of `tile_size x tile_size` source pixels.
//! Visible tiles are kept alive while on screen; built tiles are also
//! kept in an LRU cache so panning back does not rebuild them.

use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec2;

use crate::config::GridSettings;
use crate::constants::GRID_TILE_MARGIN;
use crate::image_buffer::{ImageBuffer, Ink};
use crate::tile_cache::TileCache;
use crate::view::{ImageRect, ViewTransform, Viewport};

pub type TileKey = (u32, u32);

/// Floats per cell instance: position (2) + color (3)
pub const INSTANCE_STRIDE: usize = 5;

/// Inclusive range of tile indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRange {
    pub tx0: u32,
    pub tx1: u32,
    pub ty0: u32,
    pub ty1: u32,
}

impl TileRange {
    pub fn contains(&self, (tx, ty): TileKey) -> bool {
        (self.tx0..=self.tx1).contains(&tx) && (self.ty0..=self.ty1).contains(&ty)
    }

    pub fn keys(&self) -> impl Iterator<Item = TileKey> + '_ {
        (self.ty0..=self.ty1).flat_map(move |ty| (self.tx0..=self.tx1).map(move |tx| (tx, ty)))
    }
}

/// Tiles intersecting the viewport, widened by `margin` tiles and clamped
/// to the image.
pub fn visible_tile_range(
    view: &ViewTransform,
    viewport: Viewport,
    image: (u32, u32),
    tile_size: u32,
    margin: u32,
) -> Option<TileRange> {
    let (iw, ih) = (image.0 as i64, image.1 as i64);
    if iw == 0 || ih == 0 || tile_size == 0 {
        return None;
    }
    let rect = view.visible_image_rect(viewport);
    let left = (rect.min.x.floor() as i64).max(0);
    let top = (rect.min.y.floor() as i64).max(0);
    let right = (rect.max.x.ceil() as i64).min(iw - 1);
    let bottom = (rect.max.y.ceil() as i64).min(ih - 1);
    if right < left || bottom < top {
        return None;
    }

    let (t, m) = (tile_size as i64, margin as i64);
    let tx0 = (left / t - m).max(0);
    let ty0 = (top / t - m).max(0);
    let tx1 = ((iw - 1) / t).min(right / t + m);
    let ty1 = ((ih - 1) / t).min(bottom / t + m);

    Some(TileRange {
        tx0: tx0 as u32,
        tx1: tx1 as u32,
        ty0: ty0 as u32,
        ty1: ty1 as u32,
    })
}

/// Text printed inside one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellLabel {
    /// Source pixel
    pub x: u32,
    pub y: u32,
    pub ink: Ink,
    /// (text, vertical center offset from the cell top in device pixels)
    pub lines: Vec<(String, f32)>,
}

#[derive(Debug, Clone)]
pub struct PixelTile {
    pub key: TileKey,
    /// Source pixels covered
    pub width: u32,
    pub height: u32,
    /// Interleaved `INSTANCE_STRIDE` floats per cell
    pub instances: Vec<f32>,
    pub labels: Vec<CellLabel>,
}

impl PixelTile {
    pub fn build(image: &ImageBuffer, key: TileKey, settings: &GridSettings) -> Option<Self> {
        let (tx, ty) = key;
        let (iw, ih) = image.size();
        let x0 = tx.checked_mul(settings.tile_size)?;
        let y0 = ty.checked_mul(settings.tile_size)?;
        if x0 >= iw || y0 >= ih {
            return None;
        }
        let width = settings.tile_size.min(iw - x0);
        let height = settings.tile_size.min(ih - y0);

        let cell = settings.cell_size as f32;
        let line_height = settings.font_px;
        let cells = width as usize * height as usize;
        let mut instances = Vec::with_capacity(cells * INSTANCE_STRIDE);
        let mut labels = Vec::with_capacity(cells);

        for y in y0..y0 + height {
            for x in x0..x0 + width {
                let Some(rgb) = image.pixel(x as i64, y as i64) else {
                    continue;
                };
                let [r, g, b] = rgb;
                instances.extend_from_slice(&[
                    x as f32,
                    y as f32,
                    r as f32 / 255.0,
                    g as f32 / 255.0,
                    b as f32 / 255.0,
                ]);

                let lines = if image.is_grayscale() {
                    vec![(r.to_string(), cell * 0.5)]
                } else {
                    [r, g, b]
                        .iter()
                        .enumerate()
                        .map(|(i, v)| {
                            let center = settings.padding
                                + i as f32 * (line_height + settings.line_gap)
                                + line_height * 0.5;
                            (v.to_string(), center)
                        })
                        .collect()
                };
                labels.push(CellLabel {
                    x,
                    y,
                    ink: Ink::for_rgb(rgb),
                    lines,
                });
            }
        }

        Some(Self {
            key,
            width,
            height,
            instances,
            labels,
        })
    }

    /// Image-space area covered by this tile.
    pub fn image_rect(&self, tile_size: u32) -> ImageRect {
        let min = Vec2::new(
            (self.key.0 * tile_size) as f32,
            (self.key.1 * tile_size) as f32,
        );
        ImageRect {
            min,
            max: min + Vec2::new(self.width as f32, self.height as f32),
        }
    }

    #[cfg(test)]
    pub fn cell_count(&self) -> usize {
        self.instances.len() / INSTANCE_STRIDE
    }
}

pub struct PixelGrid {
    settings: GridSettings,
    cache: TileCache<TileKey, Rc<PixelTile>>,
    visible: HashMap<TileKey, Rc<PixelTile>>,
}

impl PixelGrid {
    pub fn new(settings: GridSettings) -> Self {
        Self {
            cache: TileCache::new(settings.cache_tiles),
            settings,
            visible: HashMap::new(),
        }
    }

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    /// Sync the visible tile set with the viewport: drop tiles that left
    /// it, reuse cached tiles, build the rest.
    pub fn update(&mut self, view: &ViewTransform, viewport: Viewport, image: &ImageBuffer) {
        puffin::profile_function!();

        let range = visible_tile_range(
            view,
            viewport,
            image.size(),
            self.settings.tile_size,
            GRID_TILE_MARGIN,
        );
        let Some(range) = range else {
            self.visible.clear();
            return;
        };

        self.visible.retain(|key, _| range.contains(*key));

        for key in range.keys() {
            if self.visible.contains_key(&key) {
                continue;
            }
            let tile = match self.cache.get(&key).cloned() {
                Some(tile) => tile,
                None => {
                    let Some(tile) = PixelTile::build(image, key, &self.settings) else {
                        continue;
                    };
                    let tile = Rc::new(tile);
                    self.cache.put(key, Rc::clone(&tile));
                    tile
                }
            };
            self.visible.insert(key, tile);
        }
    }

    /// Leave pixel-grid mode; built tiles stay cached.
    pub fn clear(&mut self) {
        self.visible.clear();
    }

    /// Forget everything (new image).
    pub fn reset(&mut self) {
        self.clear();
        self.cache.clear();
    }

    pub fn visible_tiles(&self) -> impl Iterator<Item = &PixelTile> {
        self.visible.values().map(|tile| tile.as_ref())
    }

    #[cfg(test)]
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    #[cfg(test)]
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    /// All visible cell instances, ready for upload.
    pub fn instance_data(&self) -> Vec<f32> {
        let total = self.visible.values().map(|t| t.instances.len()).sum();
        let mut data = Vec::with_capacity(total);
        for tile in self.visible.values() {
            data.extend_from_slice(&tile.instances);
        }
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use image::{Rgb, RgbImage};

    fn settings() -> GridSettings {
        GridSettings::default()
    }

    fn gray(w: u32, h: u32) -> ImageBuffer {
        ImageBuffer::from_image(RgbImage::from_fn(w, h, |x, _| {
            let v = (x % 256) as u8;
            Rgb([v, v, v])
        }))
    }

    fn color(w: u32, h: u32) -> ImageBuffer {
        ImageBuffer::from_image(RgbImage::from_fn(w, h, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 200])
        }))
    }

    fn pixel_view(origin: Vec2) -> ViewTransform {
        // Image point `origin` at the top-left of the viewport, 64 px cells
        ViewTransform {
            scale: 64.0,
            offset: -origin * 64.0,
        }
    }

    #[test]
    fn test_tile_range_with_margin() {
        // Viewport 640x320 at 64 px/cell shows pixels 32..42 x 48..53
        let view = pixel_view(Vec2::new(32.0, 48.0));
        let range = visible_tile_range(&view, Viewport::new(640.0, 320.0), (100, 100), 16, 1).unwrap();
        assert_eq!(
            range,
            TileRange {
                tx0: 1,
                tx1: 3,
                ty0: 2,
                ty1: 4,
            }
        );
    }

    #[test]
    fn test_tile_range_clamped_to_image() {
        let view = pixel_view(Vec2::new(0.0, 0.0));
        let range = visible_tile_range(&view, Viewport::new(6400.0, 6400.0), (20, 20), 16, 1).unwrap();
        assert_eq!((range.tx0, range.tx1, range.ty0, range.ty1), (0, 1, 0, 1));
    }

    #[test]
    fn test_tile_range_outside_image() {
        let view = pixel_view(Vec2::new(500.0, 500.0));
        assert!(visible_tile_range(&view, Viewport::new(64.0, 64.0), (20, 20), 16, 1).is_none());
        assert!(visible_tile_range(&view, Viewport::new(64.0, 64.0), (0, 20), 16, 1).is_none());
    }

    #[test]
    fn test_edge_tile_is_partial() {
        let tile = PixelTile::build(&gray(20, 18), (1, 1), &settings()).unwrap();
        assert_eq!((tile.width, tile.height), (4, 2));
        assert_eq!(tile.cell_count(), 8);
        let rect = tile.image_rect(16);
        assert_eq!((rect.min, rect.max), (Vec2::new(16.0, 16.0), Vec2::new(20.0, 18.0)));
        assert!(PixelTile::build(&gray(20, 18), (2, 0), &settings()).is_none());
    }

    #[test]
    fn test_gray_labels_single_centered_line() {
        let tile = PixelTile::build(&gray(16, 16), (0, 0), &settings()).unwrap();
        let label = &tile.labels[5];
        assert_eq!((label.x, label.y), (5, 0));
        assert_eq!(label.lines, vec![("5".to_string(), 32.0)]);
        assert_eq!(label.ink, Ink::White);
    }

    #[test]
    fn test_color_labels_three_lines() {
        let tile = PixelTile::build(&color(16, 16), (0, 0), &settings()).unwrap();
        let label = tile.labels.iter().find(|l| l.x == 3 && l.y == 7).unwrap();
        let texts: Vec<&str> = label.lines.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(texts, ["3", "7", "200"]);
        // padding 5, line height 12, gap 3
        let centers: Vec<f32> = label.lines.iter().map(|(_, c)| *c).collect();
        assert_eq!(centers, [11.0, 26.0, 41.0]);
    }

    #[test]
    fn test_instances_carry_position_and_color() {
        let tile = PixelTile::build(&color(20, 20), (1, 0), &settings()).unwrap();
        assert_eq!(&tile.instances[..5], &[16.0, 0.0, 16.0 / 255.0, 0.0, 200.0 / 255.0]);
    }

    #[test]
    fn test_update_reuses_cache() {
        let image = color(64, 64);
        let mut grid = PixelGrid::new(settings());
        let view = pixel_view(Vec2::ZERO);
        let viewport = Viewport::new(640.0, 640.0);

        grid.update(&view, viewport, &image);
        // pixels 0..10 -> tiles 0, plus margin -> 0..=1 on both axes
        assert_eq!(grid.visible_count(), 4);
        assert_eq!(grid.cached_count(), 4);
        assert_eq!(grid.instance_data().len(), 4 * 256 * INSTANCE_STRIDE);

        grid.clear();
        assert_eq!(grid.visible_count(), 0);
        assert_eq!(grid.cached_count(), 4);

        grid.update(&view, viewport, &image);
        assert_eq!(grid.visible_count(), 4);

        grid.reset();
        assert_eq!(grid.cached_count(), 0);
    }

    #[test]
    fn test_update_drops_tiles_that_scrolled_away() {
        let image = color(128, 16);
        let mut grid = PixelGrid::new(settings());
        let viewport = Viewport::new(640.0, 64.0);

        grid.update(&pixel_view(Vec2::ZERO), viewport, &image);
        assert!(grid.visible_tiles().any(|t| t.key == (0, 0)));

        grid.update(&pixel_view(Vec2::new(100.0, 0.0)), viewport, &image);
        assert!(!grid.visible_tiles().any(|t| t.key == (0, 0)));
        assert!(grid.visible_tiles().any(|t| t.key == (7, 0)));
    }

    #[test]
    fn test_small_cache_keeps_visible_tiles() {
        let image = color(64, 64);
        let mut grid = PixelGrid::new(GridSettings {
            cache_tiles: 1,
            ..settings()
        });
        grid.update(&pixel_view(Vec2::ZERO), Viewport::new(640.0, 640.0), &image);
        assert_eq!(grid.visible_count(), 4);
        assert_eq!(grid.cached_count(), 1);
    }
}
