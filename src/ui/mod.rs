//! UI rendering using egui.
//!
//! Toolbar, status bar, the image canvas and the load-error modal. The UI
//! never mutates the viewer; it reports what the user asked for through
//! [`UiActions`] and the main loop applies it.

pub mod canvas;
pub mod status_bar;
pub mod style;
pub mod toolbar;

use egui::{CursorIcon, Rect};

use crate::viewer::{CursorShape, ImageView};
use canvas::ImageCanvas;
use toolbar::ToolbarData;

/// Actions the UI wants to perform (returned to the main loop)
#[derive(Debug, Default, PartialEq, Eq)]
pub struct UiActions {
    pub open_image: bool,
    pub open_folder: bool,
    pub prev_image: bool,
    pub next_image: bool,
    pub toggle_grid_lines: bool,
}

/// UI state that outlives a single frame.
pub struct UiState {
    pub canvas: ImageCanvas,
    /// Last load failure, shown until dismissed
    pub load_error: Option<String>,
    pub show_grid_lines: bool,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            canvas: ImageCanvas::new(),
            load_error: None,
            show_grid_lines: true,
        }
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

/// Draw one frame of UI. Returns the requested actions and the canvas
/// rectangle in points (the area left between the panels).
pub fn draw_ui(
    ctx: &egui::Context,
    state: &mut UiState,
    view: &ImageView,
    position: Option<(usize, usize)>,
    pointer_in_canvas: bool,
) -> (UiActions, Rect) {
    let mut actions = UiActions::default();

    let file_name = view
        .image()
        .and_then(|image| image.path())
        .and_then(|path| path.file_name())
        .and_then(|name| name.to_str());
    let toolbar = ToolbarData {
        position,
        file_name,
        pixel_mode: view.is_pixel_mode(),
        show_grid_lines: state.show_grid_lines,
    };
    toolbar::draw_toolbar(ctx, &toolbar, &mut actions);
    status_bar::draw_status_bar(ctx, view);

    let canvas_rect = ctx.available_rect();
    state.canvas.draw(ctx, canvas_rect, view);

    draw_error_modal(ctx, &mut state.load_error);

    if pointer_in_canvas {
        ctx.set_cursor_icon(cursor_icon(view.cursor()));
    }

    (actions, canvas_rect)
}

pub fn cursor_icon(shape: CursorShape) -> CursorIcon {
    match shape {
        CursorShape::Default => CursorIcon::Default,
        CursorShape::Grabbing => CursorIcon::Grabbing,
        CursorShape::PointingHand => CursorIcon::PointingHand,
    }
}

fn draw_error_modal(ctx: &egui::Context, error: &mut Option<String>) {
    let Some(message) = error.as_deref() else {
        return;
    };

    let mut dismissed = false;
    egui::Window::new("Failed to open image")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .frame(style::modal_frame())
        .show(ctx, |ui| {
            ui.label(egui::RichText::new("Failed to open image").strong().color(style::colors::ERROR));
            ui.add_space(4.0);
            ui.label(message);
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });

    if dismissed {
        *error = None;
    }
}
