//! Top toolbar: open buttons, playlist navigation and the current file.

use egui::RichText;

use super::style::colors;
use super::UiActions;

pub struct ToolbarData<'a> {
    /// 1-based playlist position and length
    pub position: Option<(usize, usize)>,
    pub file_name: Option<&'a str>,
    pub pixel_mode: bool,
    pub show_grid_lines: bool,
}

pub fn draw_toolbar(ctx: &egui::Context, data: &ToolbarData, actions: &mut UiActions) {
    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if ui.button("Open Image").clicked() {
                actions.open_image = true;
            }
            if ui.button("Open Folder").clicked() {
                actions.open_folder = true;
            }
            ui.separator();

            let has_playlist = data.position.is_some();
            if ui
                .add_enabled(has_playlist, egui::Button::new("Previous"))
                .on_hover_text("Left arrow")
                .clicked()
            {
                actions.prev_image = true;
            }
            if ui
                .add_enabled(has_playlist, egui::Button::new("Next"))
                .on_hover_text("Right arrow")
                .clicked()
            {
                actions.next_image = true;
            }

            if data.pixel_mode {
                ui.separator();
                let label = if data.show_grid_lines { "Grid: on" } else { "Grid: off" };
                if ui.button(label).on_hover_text("G").clicked() {
                    actions.toggle_grid_lines = true;
                }
            }

            if let Some(text) = position_text(data.position, data.file_name) {
                ui.separator();
                ui.label(RichText::new(text).color(colors::TEXT_MUTED));
            }
        });
    });
}

/// "3 / 12  name.png", either part may be missing.
pub fn position_text(position: Option<(usize, usize)>, file_name: Option<&str>) -> Option<String> {
    match (position, file_name) {
        (Some((index, total)), Some(name)) => Some(format!("{index} / {total}  {name}")),
        (Some((index, total)), None) => Some(format!("{index} / {total}")),
        (None, Some(name)) => Some(name.to_string()),
        (None, None) => None,
    }
}
