//! Status bar: pixel readout under the pointer, image size and zoom.

use egui::RichText;

use super::style::colors;
use crate::image_buffer::PixelValue;
use crate::viewer::{ImageView, PixelInfo};

pub const NO_PIXEL_TEXT: &str = "Pos: -   Val: -";

/// Plain-text readout for the pixel under the pointer.
pub fn status_text(info: Option<PixelInfo>) -> String {
    match info {
        Some(PixelInfo { x, y, value }) => format!("Pos: {x}, {y}   Val: {value}"),
        None => NO_PIXEL_TEXT.to_string(),
    }
}

/// Zoom and size summary shown on the right.
pub fn view_summary(view: &ImageView) -> Option<String> {
    let image = view.image()?;
    let mut text = format!(
        "{} x {}   {:.0}%",
        image.width(),
        image.height(),
        view.view().scale * 100.0
    );
    if view.is_pixel_mode() {
        text.push_str("   grid");
    }
    Some(text)
}

pub fn draw_status_bar(ctx: &egui::Context, view: &ImageView) {
    egui::TopBottomPanel::bottom("status_bar")
        .exact_height(24.0)
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                ui.spacing_mut().item_spacing.x = 0.0;
                match view.pixel_info() {
                    Some(PixelInfo {
                        x,
                        y,
                        value: PixelValue::Rgb(r, g, b),
                    }) => {
                        ui.label(RichText::new(format!("Pos: {x}, {y}   Val: RGB=")).monospace());
                        channel(ui, format!("{r}, "), colors::CHANNEL_RED);
                        channel(ui, format!("{g}, "), colors::CHANNEL_GREEN);
                        channel(ui, b.to_string(), colors::CHANNEL_BLUE);
                    }
                    info => {
                        ui.label(RichText::new(status_text(info)).monospace());
                    }
                }

                if let Some(summary) = view_summary(view) {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(RichText::new(summary).color(colors::TEXT_MUTED));
                    });
                }
            });
        });
}

fn channel(ui: &mut egui::Ui, text: String, color: egui::Color32) {
    ui.label(RichText::new(text).monospace().strong().color(color));
}
