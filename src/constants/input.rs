//! Pointer input constants.

/// Width of the prev/next hotspot strips at the viewport edges
pub const HOTSPOT_WIDTH: f32 = 40.0;
/// Maximum delay between two presses of a double-click (seconds)
pub const DOUBLE_CLICK_INTERVAL: f32 = 0.4;
/// Maximum pointer travel between two presses of a double-click (pixels)
pub const DOUBLE_CLICK_DISTANCE: f32 = 5.0;
