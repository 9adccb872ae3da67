//! The image canvas: the regular texture-backed view, pixel-grid labels and
//! the navigation hotspot glyphs.
//!
//! Positions coming out of the viewer are canvas-local physical pixels;
//! egui wants logical points, so everything here is divided by
//! `pixels_per_point` and offset by the canvas origin.

use egui::{Color32, ColorImage, FontId, LayerId, Pos2, Rect, TextureHandle, TextureOptions};
use glam::Vec2;
use image::imageops::{self, FilterType};

use crate::image_buffer::{ImageBuffer, Ink};
use crate::viewer::{HoverSide, ImageView};

/// Texture for the current image, re-uploaded when the image or the
/// filtering mode changes.
#[derive(Default)]
pub struct ImageCanvas {
    texture: Option<TextureHandle>,
    uploaded: Option<(u64, bool)>,
}

impl ImageCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    fn sync_texture(&mut self, ctx: &egui::Context, view: &ImageView) {
        let Some(image) = view.image() else {
            self.texture = None;
            self.uploaded = None;
            return;
        };
        let key = (view.generation(), view.smooth_filtering());
        if self.texture.is_some() && self.uploaded == Some(key) {
            return;
        }

        puffin::profile_scope!("upload_image_texture");
        let max_side = ctx.input(|i| i.max_texture_side);
        let color_image = display_image(image, max_side);
        let options = if key.1 {
            TextureOptions::LINEAR
        } else {
            TextureOptions::NEAREST
        };
        match &mut self.texture {
            Some(texture) if self.uploaded.map(|(g, _)| g) == Some(key.0) => {
                texture.set(color_image, options);
            }
            _ => {
                self.texture = Some(ctx.load_texture("image", color_image, options));
            }
        }
        self.uploaded = Some(key);
    }

    /// Draw the image (regular mode) or the cell labels (pixel mode).
    pub fn draw(&mut self, ctx: &egui::Context, canvas: Rect, view: &ImageView) {
        self.sync_texture(ctx, view);
        let Some(image) = view.image() else {
            return;
        };

        let painter = ctx
            .layer_painter(LayerId::background())
            .with_clip_rect(canvas);
        let ppp = ctx.pixels_per_point();
        let to_points = |p: Vec2| canvas.min + egui::vec2(p.x / ppp, p.y / ppp);

        if view.is_pixel_mode() {
            draw_cell_labels(ctx, canvas, view);
        } else if let Some(texture) = &self.texture {
            let (w, h) = image.size();
            let min = to_points(view.view().image_to_screen(Vec2::ZERO));
            let max = to_points(view.view().image_to_screen(Vec2::new(w as f32, h as f32)));
            painter.image(
                texture.id(),
                Rect::from_min_max(min, max),
                Rect::from_min_max(Pos2::ZERO, egui::pos2(1.0, 1.0)),
                Color32::WHITE,
            );
        }

        if let Some(side) = view.hover() {
            draw_hotspot(ctx, canvas, view, side);
        }
    }
}

/// Color image for upload, downscaled when a side exceeds the GPU limit.
pub fn display_image(image: &ImageBuffer, max_side: usize) -> ColorImage {
    let (w, h) = image.size();
    let longest = w.max(h) as usize;
    if longest <= max_side || max_side == 0 {
        return ColorImage::from_rgb([w as usize, h as usize], image.raw().as_raw());
    }

    let factor = max_side as f64 / longest as f64;
    let nw = ((w as f64 * factor).floor() as u32).max(1);
    let nh = ((h as f64 * factor).floor() as u32).max(1);
    log::debug!("downscaling {w}x{h} to {nw}x{nh} for display");
    let scaled = imageops::resize(image.raw(), nw, nh, FilterType::Triangle);
    ColorImage::from_rgb([nw as usize, nh as usize], scaled.as_raw())
}

fn draw_cell_labels(ctx: &egui::Context, canvas: Rect, view: &ImageView) {
    puffin::profile_function!();

    let painter = ctx
        .layer_painter(LayerId::new(egui::Order::Background, egui::Id::new("cell_labels")))
        .with_clip_rect(canvas);
    let ppp = ctx.pixels_per_point();
    let settings = view.grid().settings();
    let cell = settings.cell_size as f32;
    let font = FontId::monospace(settings.font_px / ppp);
    let viewport = view.viewport();

    let visible = view.view().visible_image_rect(viewport);

    for tile in view.grid().visible_tiles() {
        // Margin tiles just outside the canvas
        let bounds = tile.image_rect(settings.tile_size);
        if bounds.max.x <= visible.min.x
            || bounds.max.y <= visible.min.y
            || bounds.min.x >= visible.max.x
            || bounds.min.y >= visible.max.y
        {
            continue;
        }
        for label in &tile.labels {
            let top_left = view
                .view()
                .image_to_screen(Vec2::new(label.x as f32, label.y as f32));
            if top_left.x + cell < 0.0
                || top_left.y + cell < 0.0
                || top_left.x > viewport.width
                || top_left.y > viewport.height
            {
                continue;
            }

            let color = match label.ink {
                Ink::Black => Color32::BLACK,
                Ink::White => Color32::WHITE,
            };
            for (text, center_y) in &label.lines {
                let pos = canvas.min
                    + egui::vec2((top_left.x + cell * 0.5) / ppp, (top_left.y + center_y) / ppp);
                painter.text(pos, egui::Align2::CENTER_CENTER, text, font.clone(), color);
            }
        }
    }
}

/// Large « / » inside the hovered strip, black with a white outline.
fn draw_hotspot(ctx: &egui::Context, canvas: Rect, view: &ImageView, side: HoverSide) {
    let painter = ctx
        .layer_painter(LayerId::new(egui::Order::Background, egui::Id::new("hotspots")))
        .with_clip_rect(canvas);
    let ppp = ctx.pixels_per_point();
    let strip = view.hotspot_width();
    let viewport = view.viewport();

    let (glyph, center_x) = match side {
        HoverSide::Left => ("«", strip * 0.5 - 10.0),
        HoverSide::Right => ("»", viewport.width - strip * 0.5 + 10.0),
    };
    let center = canvas.min + egui::vec2(center_x / ppp, viewport.height * 0.5 / ppp);
    let font = FontId::proportional((strip * 0.9).max(12.0) / ppp);

    for dx in -2..=2 {
        for dy in -2..=2 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let offset = egui::vec2(dx as f32, dy as f32) / ppp;
            painter.text(
                center + offset,
                egui::Align2::CENTER_CENTER,
                glyph,
                font.clone(),
                Color32::WHITE,
            );
        }
    }
    painter.text(center, egui::Align2::CENTER_CENTER, glyph, font, Color32::BLACK);
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn test_small_image_uploaded_as_is() {
        let image = ImageBuffer::from_image(RgbImage::new(30, 20));
        let color = display_image(&image, 2048);
        assert_eq!(color.size, [30, 20]);
    }

    #[test]
    fn test_oversized_image_is_downscaled() {
        let image = ImageBuffer::from_image(RgbImage::new(400, 100));
        let color = display_image(&image, 200);
        assert_eq!(color.size, [200, 50]);
        assert_eq!(color.pixels.len(), 200 * 50);
    }
}
