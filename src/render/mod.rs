//! Rendering context - owns GL resources separate from viewer state.

use std::sync::Arc;

use crate::error::Result;
use crate::renderer::{CanvasRect, Renderer};
use crate::viewer::ImageView;

/// Rendering resources - lives in the application shell (main.rs).
pub struct RenderContext {
    pub renderer: Renderer,
}

impl RenderContext {
    pub fn new(gl: Arc<glow::Context>) -> Result<Self> {
        Ok(Self {
            renderer: Renderer::new(gl)?,
        })
    }

    /// Clear the window and draw the GL part of the frame. In regular mode
    /// the image itself is an egui texture, so only the clear happens here.
    pub fn render_frame(
        &mut self,
        view: &ImageView,
        canvas: CanvasRect,
        window_size: (u32, u32),
        show_grid_lines: bool,
    ) {
        puffin::profile_function!();

        self.renderer.clear(window_size.0, window_size.1);

        let Some(image) = view.image() else {
            return;
        };
        if view.is_pixel_mode() {
            puffin::profile_scope!("render_pixel_grid");
            self.renderer.render_pixel_grid(
                view.view(),
                canvas,
                window_size.1,
                view.grid(),
                image.size(),
                show_grid_lines,
            );
        }

        // Restore the full window for egui
        self.renderer.reset_viewport(window_size.0, window_size.1);
    }
}
