//! Application window and OpenGL context management.
//!
//! Window creation, OpenGL context setup and the egui integration. Keeps
//! platform and graphics plumbing away from the viewer logic.

use std::ffi::CString;
use std::num::NonZeroU32;
use std::sync::Arc;

use glutin::config::ConfigTemplateBuilder;
use glutin::context::{ContextApi, ContextAttributesBuilder, Version};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{SurfaceAttributesBuilder, WindowSurface};
use glutin_winit::DisplayBuilder;
use raw_window_handle::HasWindowHandle;
use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

use egui_glow::EguiGlow;

use crate::config::Settings;
use crate::constants::WINDOW_TITLE;
use crate::error::{Result, ViewerError};

/// Result of window and GL context creation.
pub struct WindowContext {
    pub window: Window,
    pub gl_surface: glutin::surface::Surface<WindowSurface>,
    pub gl_context: glutin::context::PossiblyCurrentContext,
    pub gl: Arc<glow::Context>,
    pub egui_glow: EguiGlow,
}

/// Create a window with OpenGL context and egui integration.
pub fn create_window(event_loop: &ActiveEventLoop, settings: &Settings) -> Result<WindowContext> {
    let window_attrs = WindowAttributes::default()
        .with_title(WINDOW_TITLE)
        .with_inner_size(PhysicalSize::new(settings.window_width, settings.window_height))
        .with_resizable(true);

    let template = ConfigTemplateBuilder::new().with_alpha_size(8);
    let display_builder = DisplayBuilder::new().with_window_attributes(Some(window_attrs));

    let (window, gl_config) = display_builder
        .build(event_loop, template, |configs| {
            configs
                .reduce(|accum, config| {
                    if config.num_samples() > accum.num_samples() {
                        config
                    } else {
                        accum
                    }
                })
                .expect("display offered no GL configs")
        })
        .map_err(|e| ViewerError::Render(format!("failed to create window: {e}")))?;

    let window = window.ok_or_else(|| ViewerError::Render("no window was created".into()))?;
    let window_handle = window
        .window_handle()
        .map_err(|e| ViewerError::Render(format!("window handle unavailable: {e}")))?;
    let gl_display = gl_config.display();

    let context_attrs = ContextAttributesBuilder::new()
        .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
        .build(Some(window_handle.as_raw()));

    let gl_context = unsafe {
        gl_display
            .create_context(&gl_config, &context_attrs)
            .map_err(|e| ViewerError::Render(format!("failed to create OpenGL context: {e}")))?
    };

    let size = window.inner_size();
    let surface_attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
        window_handle.as_raw(),
        non_zero(size.width),
        non_zero(size.height),
    );

    let gl_surface = unsafe {
        gl_display
            .create_window_surface(&gl_config, &surface_attrs)
            .map_err(|e| ViewerError::Render(format!("failed to create surface: {e}")))?
    };

    let gl_context = gl_context
        .make_current(&gl_surface)
        .map_err(|e| ViewerError::Render(format!("failed to make context current: {e}")))?;

    let gl = Arc::new(unsafe {
        glow::Context::from_loader_function(|s| {
            let s = CString::new(s).unwrap_or_default();
            gl_display.get_proc_address(&s) as *const _
        })
    });

    let egui_glow = EguiGlow::new(event_loop, gl.clone(), None, None, false);
    {
        let ctx = &egui_glow.egui_ctx;
        ctx.set_fonts(crate::ui::style::load_fonts());
        ctx.set_style(crate::ui::style::viewer_style());
    }

    log::info!(
        "window {}x{} created with OpenGL 3.3",
        size.width,
        size.height
    );

    Ok(WindowContext {
        window,
        gl_surface,
        gl_context,
        gl,
        egui_glow,
    })
}

/// Resize the GL surface to match the window size.
pub fn resize_surface(
    gl_surface: &glutin::surface::Surface<WindowSurface>,
    gl_context: &glutin::context::PossiblyCurrentContext,
    width: u32,
    height: u32,
) {
    if width > 0 && height > 0 {
        gl_surface.resize(gl_context, non_zero(width), non_zero(height));
    }
}

fn non_zero(value: u32) -> NonZeroU32 {
    NonZeroU32::new(value).unwrap_or(NonZeroU32::MIN)
}
