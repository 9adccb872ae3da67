//! Interactive image view.
//!
//! Owns the image, the view transform and the pixel grid, and turns pointer
//! and wheel input into view changes. Knows nothing about windows or GL;
//! `main.rs` feeds it events in canvas-local physical pixels and the UI
//! reads its state back every frame.

use glam::Vec2;

use crate::config::{GridSettings, ViewSettings};
use crate::constants::WHEEL_NOTCH;
use crate::image_buffer::{ImageBuffer, PixelValue};
use crate::pixel_grid::PixelGrid;
use crate::view::{ViewTransform, Viewport};

/// Playlist step requested through a hotspot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigate {
    Prev,
    Next,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverSide {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorShape {
    Default,
    Grabbing,
    PointingHand,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
}

/// Pixel under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelInfo {
    pub x: u32,
    pub y: u32,
    pub value: PixelValue,
}

pub struct ImageView {
    settings: ViewSettings,
    image: Option<ImageBuffer>,
    /// Bumped on every load so the UI can re-upload textures
    generation: u64,
    view: ViewTransform,
    viewport: Viewport,
    grid: PixelGrid,
    pixel_mode: bool,
    /// Scale to restore when leaving pixel-grid mode
    saved_scale: Option<f32>,
    auto_fit: bool,
    panning: bool,
    pointer: Option<Vec2>,
    hover: Option<HoverSide>,
    pixel_info: Option<PixelInfo>,
}

impl ImageView {
    pub fn new(settings: ViewSettings, grid: GridSettings) -> Self {
        Self {
            settings,
            image: None,
            generation: 0,
            view: ViewTransform::default(),
            viewport: Viewport::new(1.0, 1.0),
            grid: PixelGrid::new(grid),
            pixel_mode: false,
            saved_scale: None,
            auto_fit: true,
            panning: false,
            pointer: None,
            hover: None,
            pixel_info: None,
        }
    }

    pub fn image(&self) -> Option<&ImageBuffer> {
        self.image.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn grid(&self) -> &PixelGrid {
        &self.grid
    }

    pub fn is_pixel_mode(&self) -> bool {
        self.pixel_mode
    }

    #[cfg(test)]
    pub fn is_auto_fit(&self) -> bool {
        self.auto_fit
    }

    pub fn hover(&self) -> Option<HoverSide> {
        self.hover
    }

    pub fn pixel_info(&self) -> Option<PixelInfo> {
        self.pixel_info
    }

    pub fn hotspot_width(&self) -> f32 {
        self.settings.hotspot_width
    }

    /// Linear filtering while zoomed out, nearest once pixels get big.
    pub fn smooth_filtering(&self) -> bool {
        self.view.scale <= self.settings.smooth_threshold
    }

    pub fn cursor(&self) -> CursorShape {
        if self.panning {
            CursorShape::Grabbing
        } else if self.hover.is_some() {
            CursorShape::PointingHand
        } else {
            CursorShape::Default
        }
    }

    /// Show a new image fit to the window.
    pub fn load(&mut self, image: ImageBuffer) {
        self.grid.reset();
        self.pixel_mode = false;
        self.saved_scale = None;
        self.panning = false;
        self.image = Some(image);
        self.generation += 1;
        self.fit();
        self.refresh_pixel_info();
    }

    pub fn resize(&mut self, viewport: Viewport) {
        if self.viewport == viewport {
            return;
        }
        self.viewport = viewport;
        if self.auto_fit && !self.pixel_mode {
            self.fit();
        } else {
            self.view_changed();
        }
    }

    /// Fit-to-window and re-enable auto-fit.
    pub fn fit(&mut self) {
        if let Some(image) = &self.image {
            self.view = ViewTransform::fit(image.size(), self.viewport);
        }
        self.auto_fit = true;
    }

    /// Handle a wheel step. `delta` is in wheel-angle units (120 per notch).
    /// Returns whether the view changed.
    pub fn wheel(&mut self, delta: f32, modifiers: Modifiers, pos: Vec2) -> bool {
        if delta == 0.0 {
            return false;
        }

        if modifiers.ctrl || modifiers.shift {
            let step = (-delta / WHEEL_NOTCH * self.settings.scroll_step).trunc();
            if modifiers.ctrl {
                self.view.pan(0.0, -step);
            } else {
                self.view.pan(-step, 0.0);
            }
            self.view_changed();
            return self.image.is_some();
        }

        if self.image.is_none() {
            return false;
        }

        if self.pixel_mode {
            // Cells stay at exactly cell_size until the grid is left
            if delta > 0.0 {
                return false;
            }
            self.exit_pixel_mode(pos);
            return true;
        }

        let factor = 1.0 + self.settings.zoom_rate * delta;
        let scale = self.view.zoom_about(
            pos,
            factor,
            self.settings.min_scale,
            self.settings.max_scale,
        );
        self.auto_fit = false;

        let cell = self.grid.settings().cell_size as f32;
        if scale >= cell - 1.0 && delta > 0.0 {
            self.enter_pixel_mode(pos);
        } else {
            self.view_changed();
        }
        true
    }

    /// Snap to one cell per source pixel and start drawing the grid.
    pub fn enter_pixel_mode(&mut self, anchor: Vec2) {
        if self.image.is_none() || self.pixel_mode {
            return;
        }
        self.saved_scale = Some(self.view.scale);
        let cell = self.grid.settings().cell_size as f32;
        self.view.set_scale_about(anchor, cell);
        self.pixel_mode = true;
        self.auto_fit = false;
        log::debug!("entering pixel grid at {:?}", self.view.screen_to_image(anchor));
        self.view_changed();
    }

    /// Return to the scale used before pixel-grid mode, keeping the pixel
    /// under `anchor` in place.
    pub fn exit_pixel_mode(&mut self, anchor: Vec2) {
        if !self.pixel_mode {
            return;
        }
        let Some(image) = &self.image else {
            return;
        };
        let image_point = self.view.screen_to_image(anchor);
        self.grid.clear();
        self.pixel_mode = false;

        match self.saved_scale.take() {
            Some(scale) => {
                self.view.scale = scale;
                self.view.pin(image_point, anchor);
            }
            None => {
                self.view = ViewTransform::fit(image.size(), self.viewport);
            }
        }
        log::debug!("left pixel grid at scale {:.3}", self.view.scale);
        self.view_changed();
    }

    /// Left button pressed. Hotspots navigate, anything else starts a pan.
    pub fn pointer_pressed(&mut self, pos: Vec2) -> Option<Navigate> {
        self.image.as_ref()?;
        if let Some(side) = self.hotspot_at(pos) {
            return Some(navigation(side));
        }
        self.panning = true;
        self.pointer = Some(pos);
        self.refresh_pixel_info();
        None
    }

    pub fn pointer_released(&mut self) {
        self.panning = false;
    }

    pub fn pointer_moved(&mut self, pos: Vec2) {
        let last = self.pointer.replace(pos);
        if self.image.is_none() {
            self.hover = None;
            self.pixel_info = None;
            return;
        }
        self.hover = self.hotspot_at(pos);

        if self.panning {
            if let Some(last) = last {
                let delta = pos - last;
                self.view.pan(delta.x, delta.y);
                self.view_changed();
                return;
            }
        }
        self.refresh_pixel_info();
    }

    /// Pointer left the canvas.
    pub fn pointer_left(&mut self) {
        self.pointer = None;
        self.hover = None;
        self.pixel_info = None;
    }

    /// Double-click: hotspots navigate, elsewhere reset to fit-to-window.
    pub fn double_click(&mut self, pos: Vec2) -> Option<Navigate> {
        self.image.as_ref()?;
        if let Some(side) = self.hotspot_at(pos) {
            return Some(navigation(side));
        }
        self.exit_pixel_mode(pos);
        self.fit();
        self.refresh_pixel_info();
        None
    }

    fn hotspot_at(&self, pos: Vec2) -> Option<HoverSide> {
        let width = self.settings.hotspot_width;
        if pos.x <= width {
            Some(HoverSide::Left)
        } else if pos.x >= self.viewport.width - width {
            Some(HoverSide::Right)
        } else {
            None
        }
    }

    /// Re-establish invariants after any transform change.
    fn view_changed(&mut self) {
        let Some(image) = &self.image else {
            return;
        };
        self.view.constrain(image.size(), self.viewport);
        if self.pixel_mode {
            self.grid.update(&self.view, self.viewport, image);
        }
        self.refresh_pixel_info();
    }

    fn refresh_pixel_info(&mut self) {
        self.pixel_info = match (&self.image, self.pointer) {
            (Some(image), Some(pos)) => {
                let p = self.view.screen_to_image(pos);
                let (x, y) = (p.x.floor() as i64, p.y.floor() as i64);
                image.value_at(x, y).map(|value| PixelInfo {
                    x: x as u32,
                    y: y as u32,
                    value,
                })
            }
            _ => None,
        };
    }
}

fn navigation(side: HoverSide) -> Navigate {
    match side {
        HoverSide::Left => Navigate::Prev,
        HoverSide::Right => Navigate::Next,
    }
}
