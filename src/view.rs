//! View transform: maps image pixels to viewport pixels.
//!
//! `screen = image * scale + offset`, y pointing down, in physical pixels
//! relative to the top-left corner of the canvas.

use crate::constants::VIEW_MIN_FIT_SCALE;
use glam::{Mat4, Vec2};

/// Size of the canvas area in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.y >= 0.0 && point.x < self.width && point.y < self.height
    }
}

/// Axis-aligned rectangle in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageRect {
    pub min: Vec2,
    pub max: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub scale: f32,
    pub offset: Vec2,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
        }
    }
}

impl ViewTransform {
    pub fn image_to_screen(&self, image: Vec2) -> Vec2 {
        image * self.scale + self.offset
    }

    pub fn screen_to_image(&self, screen: Vec2) -> Vec2 {
        (screen - self.offset) / self.scale
    }

    /// Scale that shows the whole image inside the viewport.
    pub fn fit_scale(image: (u32, u32), viewport: Viewport) -> f32 {
        let (iw, ih) = (image.0 as f32, image.1 as f32);
        if iw == 0.0 || ih == 0.0 {
            return 1.0;
        }
        let vw = viewport.width.max(1.0);
        let vh = viewport.height.max(1.0);

        let mut s = (vw / iw).min(vh / ih);
        // Stay one pixel short so rounding never produces a scroll range.
        if iw * s > vw {
            s = (vw - 1.0) / iw;
        }
        if ih * s > vh {
            s = s.min((vh - 1.0) / ih);
        }
        s.max(VIEW_MIN_FIT_SCALE)
    }

    /// Fit-to-window: fit scale, centered.
    pub fn fit(image: (u32, u32), viewport: Viewport) -> Self {
        let mut view = Self {
            scale: Self::fit_scale(image, viewport),
            offset: Vec2::ZERO,
        };
        view.constrain(image, viewport);
        view
    }

    /// Set an absolute scale keeping the image point under `anchor` fixed.
    pub fn set_scale_about(&mut self, anchor: Vec2, scale: f32) {
        let image_point = self.screen_to_image(anchor);
        self.scale = scale;
        self.offset = anchor - image_point * scale;
    }

    /// Multiply the scale by `factor`, clamped to `[min, max]`, keeping the
    /// image point under `anchor` fixed. Returns the new scale.
    pub fn zoom_about(&mut self, anchor: Vec2, factor: f32, min: f32, max: f32) -> f32 {
        let scale = (self.scale * factor).clamp(min, max);
        self.set_scale_about(anchor, scale);
        scale
    }

    /// Place `image_point` under `anchor` without changing the scale.
    pub fn pin(&mut self, image_point: Vec2, anchor: Vec2) {
        self.offset = anchor - image_point * self.scale;
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.offset += Vec2::new(dx, dy);
    }

    /// Keep the image addressable: an axis smaller than the viewport is
    /// centered, a larger one must cover the viewport edge to edge.
    pub fn constrain(&mut self, image: (u32, u32), viewport: Viewport) {
        self.offset.x = constrain_axis(self.offset.x, image.0 as f32 * self.scale, viewport.width);
        self.offset.y = constrain_axis(self.offset.y, image.1 as f32 * self.scale, viewport.height);
    }

    /// Image-space rectangle covered by the viewport.
    pub fn visible_image_rect(&self, viewport: Viewport) -> ImageRect {
        ImageRect {
            min: self.screen_to_image(Vec2::ZERO),
            max: self.screen_to_image(viewport.size()),
        }
    }

    /// Orthographic projection from image space to clip space for the
    /// canvas viewport (y down).
    pub fn projection_matrix(&self, viewport: Viewport) -> Mat4 {
        let rect = self.visible_image_rect(viewport);
        Mat4::orthographic_rh(rect.min.x, rect.max.x, rect.max.y, rect.min.y, -1.0, 1.0)
    }
}

fn constrain_axis(offset: f32, content: f32, available: f32) -> f32 {
    if content <= available {
        (available - content) * 0.5
    } else {
        offset.clamp(available - content, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_fit_scale_long_side() {
        // Width-limited: 800/400 = 2.0 but 400*2 == 800, allowed
        let s = ViewTransform::fit_scale((400, 100), Viewport::new(800.0, 600.0));
        assert!(approx(s, 2.0));
        // Height-limited
        let s = ViewTransform::fit_scale((100, 300), Viewport::new(800.0, 600.0));
        assert!(approx(s, 2.0));
    }

    #[test]
    fn test_fit_scale_degenerate() {
        assert_eq!(ViewTransform::fit_scale((0, 10), Viewport::new(100.0, 100.0)), 1.0);
        let s = ViewTransform::fit_scale((100_000_000, 1), Viewport::new(1.0, 1.0));
        assert_eq!(s, VIEW_MIN_FIT_SCALE);
        // Zero viewport is treated as 1x1
        let s = ViewTransform::fit_scale((4, 4), Viewport::new(0.0, 0.0));
        assert!(approx(s, 0.25));
    }

    #[test]
    fn test_fit_centers_image() {
        let view = ViewTransform::fit((400, 100), Viewport::new(800.0, 600.0));
        assert!(approx(view.offset.x, 0.0));
        assert!(approx(view.offset.y, 200.0));
        let center = view.image_to_screen(Vec2::new(200.0, 50.0));
        assert!(approx(center.x, 400.0));
        assert!(approx(center.y, 300.0));
    }

    #[test]
    fn test_round_trip_coordinates() {
        let view = ViewTransform {
            scale: 3.0,
            offset: Vec2::new(-10.0, 7.0),
        };
        let p = Vec2::new(12.5, 4.0);
        let back = view.screen_to_image(view.image_to_screen(p));
        assert!(approx(back.x, p.x) && approx(back.y, p.y));
    }

    #[test]
    fn test_zoom_keeps_anchor_fixed() {
        let mut view = ViewTransform {
            scale: 2.0,
            offset: Vec2::new(5.0, 5.0),
        };
        let anchor = Vec2::new(100.0, 80.0);
        let before = view.screen_to_image(anchor);
        let scale = view.zoom_about(anchor, 1.5, 0.05, 64.0);
        assert!(approx(scale, 3.0));
        let after = view.screen_to_image(anchor);
        assert!(approx(before.x, after.x) && approx(before.y, after.y));
    }

    #[test]
    fn test_zoom_clamps() {
        let mut view = ViewTransform::default();
        assert_eq!(view.zoom_about(Vec2::ZERO, 1000.0, 0.05, 64.0), 64.0);
        assert_eq!(view.zoom_about(Vec2::ZERO, 0.0, 0.05, 64.0), 0.05);
    }

    #[test]
    fn test_constrain_large_image_covers_viewport() {
        let viewport = Viewport::new(100.0, 100.0);
        let mut view = ViewTransform {
            scale: 10.0,
            offset: Vec2::new(50.0, -5000.0),
        };
        view.constrain((50, 50), viewport);
        // 500 px of content in 100 px: offset within [-400, 0]
        assert_eq!(view.offset, Vec2::new(0.0, -400.0));
    }

    #[test]
    fn test_constrain_small_image_centered() {
        let mut view = ViewTransform {
            scale: 1.0,
            offset: Vec2::new(-300.0, 900.0),
        };
        view.constrain((20, 40), Viewport::new(100.0, 100.0));
        assert_eq!(view.offset, Vec2::new(40.0, 30.0));
    }

    #[test]
    fn test_pan_then_constrain_never_loses_image() {
        let viewport = Viewport::new(200.0, 150.0);
        let mut view = ViewTransform {
            scale: 4.0,
            offset: Vec2::ZERO,
        };
        view.pan(-1e6, 1e6);
        view.constrain((100, 100), viewport);
        let rect = view.visible_image_rect(viewport);
        assert!(rect.min.x >= 0.0 && rect.max.x <= 100.0 + 1e-3);
        assert!(rect.min.y >= 0.0 && rect.max.y <= 100.0 + 1e-3);
    }

    #[test]
    fn test_visible_rect() {
        let view = ViewTransform {
            scale: 2.0,
            offset: Vec2::new(-20.0, -40.0),
        };
        let rect = view.visible_image_rect(Viewport::new(100.0, 60.0));
        assert_eq!(rect.min, Vec2::new(10.0, 20.0));
        assert_eq!(rect.max, Vec2::new(60.0, 50.0));
    }

    #[test]
    fn test_projection_maps_top_left_to_clip_corner() {
        let view = ViewTransform {
            scale: 2.0,
            offset: Vec2::new(-20.0, -40.0),
        };
        let viewport = Viewport::new(100.0, 60.0);
        let clip = view.projection_matrix(viewport) * glam::Vec4::new(10.0, 20.0, 0.0, 1.0);
        assert!(approx(clip.x, -1.0));
        assert!(approx(clip.y, 1.0));
    }
}
