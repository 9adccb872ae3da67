//! View transform constants.

/// Smallest allowed scale (device pixels per image pixel)
pub const VIEW_MIN_SCALE: f32 = 0.05;
/// Largest allowed scale; pixel-grid mode snaps to `GRID_CELL_SIZE`
pub const VIEW_MAX_SCALE: f32 = 64.0;
/// Scale change per wheel-angle unit (120 units per notch)
pub const VIEW_ZOOM_RATE: f32 = 0.0015;
/// Pixels scrolled per wheel notch with Ctrl/Shift held
pub const VIEW_SCROLL_STEP: f32 = 30.0;
/// Wheel-angle units in one notch
pub const WHEEL_NOTCH: f32 = 120.0;
/// Above this scale the image is sampled with nearest filtering
pub const VIEW_SMOOTH_THRESHOLD: f32 = 2.5;
/// Lower bound for a computed fit scale
pub const VIEW_MIN_FIT_SCALE: f32 = 0.0001;
