//! UI and window constants.

/// Default window width
pub const WINDOW_DEFAULT_WIDTH: u32 = 1200;
/// Default window height
pub const WINDOW_DEFAULT_HEIGHT: u32 = 800;
/// Window title
pub const WINDOW_TITLE: &str = "pixelscope";

/// Grayscale detection samples at most this many points per axis
pub const GRAYSCALE_SAMPLE_GRID: u32 = 100;

/// Extensions listed when opening a folder
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "tif", "tiff", "webp"];
