//! Neutral egui styling for the viewer.
//!
//! Flat gray panels so nothing competes with the image colors, and a
//! monospace face for numeric readouts.

use egui::epaint::Shadow;
use egui::style::{WidgetVisuals, Widgets};
use egui::{Color32, FontData, FontDefinitions, FontFamily, Frame, Margin, Rounding, Stroke, Style, Visuals};

pub mod colors {
    use egui::Color32;

    // Panels
    pub const PANEL_BG: Color32 = Color32::from_rgb(38, 38, 40);
    pub const PANEL_BORDER: Color32 = Color32::from_rgb(62, 62, 66);
    pub const CANVAS_BG: Color32 = Color32::from_rgb(30, 30, 30);

    // Buttons
    pub const BUTTON_BG: Color32 = Color32::from_rgb(52, 52, 56);
    pub const BUTTON_HOVER: Color32 = Color32::from_rgb(66, 66, 72);
    pub const BUTTON_ACTIVE: Color32 = Color32::from_rgb(80, 80, 88);
    pub const BUTTON_BORDER: Color32 = Color32::from_rgb(90, 90, 96);

    // Text
    pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(225, 225, 225);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(150, 150, 155);
    pub const TEXT_ACCENT: Color32 = Color32::from_rgb(110, 160, 220);

    // Channel readouts
    pub const CHANNEL_RED: Color32 = Color32::from_rgb(204, 0, 0);
    pub const CHANNEL_GREEN: Color32 = Color32::from_rgb(0, 136, 0);
    pub const CHANNEL_BLUE: Color32 = Color32::from_rgb(60, 90, 230);

    pub const ERROR: Color32 = Color32::from_rgb(230, 90, 80);
}

pub const BORDER_WIDTH: f32 = 1.0;

pub fn viewer_visuals() -> Visuals {
    let mut visuals = Visuals::dark();

    visuals.window_rounding = Rounding::same(2.0);
    visuals.menu_rounding = Rounding::same(2.0);
    visuals.window_shadow = Shadow::NONE;
    visuals.popup_shadow = Shadow::NONE;

    visuals.window_fill = colors::PANEL_BG;
    visuals.window_stroke = Stroke::new(BORDER_WIDTH, colors::PANEL_BORDER);
    visuals.panel_fill = colors::PANEL_BG;
    visuals.extreme_bg_color = colors::CANVAS_BG;

    visuals.widgets = viewer_widgets();
    visuals.selection.stroke = Stroke::new(1.0, colors::TEXT_ACCENT);
    visuals.override_text_color = Some(colors::TEXT_PRIMARY);

    visuals
}

fn viewer_widgets() -> Widgets {
    let widget = |bg: Color32, border: Stroke| WidgetVisuals {
        bg_fill: bg,
        weak_bg_fill: bg,
        bg_stroke: border,
        rounding: Rounding::same(2.0),
        fg_stroke: Stroke::new(1.0, colors::TEXT_PRIMARY),
        expansion: 0.0,
    };

    let mut noninteractive = widget(colors::PANEL_BG, Stroke::new(BORDER_WIDTH, colors::PANEL_BORDER));
    noninteractive.fg_stroke = Stroke::new(1.0, colors::TEXT_MUTED);

    Widgets {
        noninteractive,
        inactive: widget(colors::BUTTON_BG, Stroke::new(BORDER_WIDTH, colors::BUTTON_BORDER)),
        hovered: widget(colors::BUTTON_HOVER, Stroke::new(BORDER_WIDTH, colors::TEXT_ACCENT)),
        active: widget(colors::BUTTON_ACTIVE, Stroke::new(2.0, colors::TEXT_ACCENT)),
        open: widget(colors::BUTTON_ACTIVE, Stroke::new(BORDER_WIDTH, colors::BUTTON_BORDER)),
    }
}

/// Use Hack for monospace text when the system has it.
pub fn load_fonts() -> FontDefinitions {
    let mut fonts = FontDefinitions::default();

    if let Ok(font_data) = std::fs::read("/usr/share/fonts/TTF/Hack-Regular.ttf") {
        fonts
            .font_data
            .insert("hack".to_owned(), FontData::from_owned(font_data));
        fonts
            .families
            .entry(FontFamily::Monospace)
            .or_default()
            .insert(0, "hack".to_owned());
    } else {
        log::debug!("Hack font not found, using egui's monospace font");
    }

    fonts
}

/// Frame for the error modal
pub fn modal_frame() -> Frame {
    Frame::none()
        .fill(colors::PANEL_BG)
        .stroke(Stroke::new(BORDER_WIDTH, colors::PANEL_BORDER))
        .inner_margin(Margin::same(12.0))
}

/// Style with immediate tooltips
pub fn viewer_style() -> Style {
    let mut style = Style::default();
    style.visuals = viewer_visuals();
    style.interaction.tooltip_delay = 0.0;
    style.interaction.show_tooltips_only_when_still = false;
    style
}
