mod app;
mod cli;
mod config;
mod constants;
mod error;
mod gallery;
mod image_buffer;
mod input;
mod pixel_grid;
mod render;
mod renderer;
mod tile_cache;
mod ui;
mod view;
mod viewer;

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;
use glam::Vec2;
use glutin::prelude::*;
use glutin::surface::WindowSurface;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Fullscreen, Window, WindowId};

use egui_glow::EguiGlow;

use config::Settings;
use constants::{IMAGE_EXTENSIONS, WHEEL_NOTCH, WINDOW_TITLE};
use error::ViewerError;
use gallery::Gallery;
use image_buffer::ImageBuffer;
use render::RenderContext;
use renderer::CanvasRect;
use viewer::{ImageView, Navigate};

const PROFILER_ADDR: &str = "127.0.0.1:8585";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = cli::Args::parse();
    let settings = Settings::load(args.config.as_deref())?;

    let _profiler = if args.profile {
        puffin::set_scopes_on(true);
        let server = puffin_http::Server::new(PROFILER_ADDR)?;
        log::info!("serving profile data on {PROFILER_ADDR}");
        Some(server)
    } else {
        None
    };

    let event_loop = EventLoop::new()?;
    let mut app = App::new(settings, args.path);
    event_loop.run_app(&mut app)?;

    match app.startup_error.take() {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

struct App {
    settings: Settings,
    initial_path: Option<PathBuf>,
    state: Option<AppState>,
    startup_error: Option<ViewerError>,
}

struct AppState {
    // Window and GL
    window: Window,
    gl_surface: glutin::surface::Surface<WindowSurface>,
    gl_context: glutin::context::PossiblyCurrentContext,
    egui_glow: EguiGlow,

    // Rendering
    render: RenderContext,
    /// Canvas placement in physical window pixels
    canvas: CanvasRect,

    // Viewer state
    viewer: ImageView,
    gallery: Gallery,

    // UI state
    ui_state: ui::UiState,

    // Input state
    input: input::InputState,
}

impl App {
    fn new(settings: Settings, initial_path: Option<PathBuf>) -> Self {
        Self {
            settings,
            initial_path,
            state: None,
            startup_error: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        match AppState::new(event_loop, &self.settings) {
            Ok(mut state) => {
                if let Some(path) = self.initial_path.take() {
                    state.open_path(&path);
                }
                state.window.request_redraw();
                self.state = Some(state);
            }
            Err(err) => {
                log::error!("startup failed: {err}");
                self.startup_error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let state = match &mut self.state {
            Some(s) => s,
            None => return,
        };

        // Let egui handle the event first
        let egui_response = state.egui_glow.on_window_event(&state.window, &event);
        if egui_response.repaint {
            state.window.request_redraw();
        }
        let consumed = egui_response.consumed;

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                app::resize_surface(&state.gl_surface, &state.gl_context, size.width, size.height);
                state.window.request_redraw();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if consumed {
                    return;
                }
                if let PhysicalKey::Code(key) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => {
                            if key == KeyCode::Escape {
                                event_loop.exit();
                                return;
                            }
                            state.input.keys_pressed.insert(key);
                            state.handle_keyboard();
                        }
                        ElementState::Released => {
                            state.input.keys_pressed.remove(&key);
                        }
                    }
                }
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                let mods = modifiers.state();
                state.input.modifiers = viewer::Modifiers {
                    ctrl: mods.control_key(),
                    shift: mods.shift_key(),
                };
            }
            WindowEvent::CursorMoved { position, .. } => {
                state.input.mouse_pos = Vec2::new(position.x as f32, position.y as f32);
                state.pointer_moved();
            }
            WindowEvent::CursorLeft { .. } => {
                state.input.in_canvas = false;
                state.viewer.pointer_left();
                state.window.request_redraw();
            }
            WindowEvent::MouseInput {
                state: button_state,
                button: MouseButton::Left,
                ..
            } => match button_state {
                ElementState::Pressed => {
                    if !consumed && state.input.in_canvas {
                        state.pointer_pressed();
                    }
                }
                ElementState::Released => {
                    state.input.mouse_down = false;
                    state.viewer.pointer_released();
                    state.window.request_redraw();
                }
            },
            WindowEvent::MouseWheel { delta, .. } => {
                if consumed || !state.input.in_canvas {
                    return;
                }
                let delta = match delta {
                    MouseScrollDelta::LineDelta(x, y) => {
                        if y != 0.0 {
                            y * WHEEL_NOTCH
                        } else {
                            x * WHEEL_NOTCH
                        }
                    }
                    MouseScrollDelta::PixelDelta(pos) => {
                        if pos.y != 0.0 {
                            pos.y as f32
                        } else {
                            pos.x as f32
                        }
                    }
                };
                let local = state.canvas_local(state.input.mouse_pos);
                if state.viewer.wheel(delta, state.input.modifiers, local) {
                    state.window.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => {
                state.redraw();
            }
            _ => {}
        }
    }
}

impl AppState {
    fn new(event_loop: &ActiveEventLoop, settings: &Settings) -> error::Result<Self> {
        let app::WindowContext {
            window,
            gl_surface,
            gl_context,
            gl,
            egui_glow,
        } = app::create_window(event_loop, settings)?;

        let render = RenderContext::new(gl)?;

        // Until the first frame lays out the panels, the canvas is the window
        let size = window.inner_size();
        let canvas = CanvasRect {
            x: 0.0,
            y: 0.0,
            width: size.width as f32,
            height: size.height as f32,
        };
        let mut viewer = ImageView::new(settings.view.clone(), settings.grid.clone());
        viewer.resize(canvas.viewport());

        Ok(Self {
            window,
            gl_surface,
            gl_context,
            egui_glow,
            render,
            canvas,
            viewer,
            gallery: Gallery::new(),
            ui_state: ui::UiState::new(),
            input: input::InputState::new(),
        })
    }

    fn canvas_local(&self, window_pos: Vec2) -> Vec2 {
        window_pos - Vec2::new(self.canvas.x, self.canvas.y)
    }

    fn canvas_contains(&self, window_pos: Vec2) -> bool {
        let local = self.canvas_local(window_pos);
        self.canvas.viewport().contains(local)
    }

    fn pointer_moved(&mut self) {
        let pos = self.input.mouse_pos;
        let inside = self.canvas_contains(pos);
        // A drag keeps panning after leaving the canvas
        if inside || self.input.mouse_down {
            self.viewer.pointer_moved(self.canvas_local(pos));
        } else if self.input.in_canvas {
            self.viewer.pointer_left();
        }
        self.input.in_canvas = inside;
        self.window.request_redraw();
    }

    fn pointer_pressed(&mut self) {
        let pos = self.input.mouse_pos;
        let local = self.canvas_local(pos);
        self.input.mouse_down = true;

        let request = if self.input.register_press(Instant::now(), pos) {
            self.viewer.double_click(local)
        } else {
            self.viewer.pointer_pressed(local)
        };
        if let Some(step) = request {
            self.input.mouse_down = false;
            self.viewer.pointer_released();
            self.navigate(step);
        }
        self.window.request_redraw();
    }

    fn handle_keyboard(&mut self) {
        let result = input::process_keyboard(&mut self.input);

        if result.toggle_fullscreen {
            let fullscreen = if self.window.fullscreen().is_some() {
                None
            } else {
                Some(Fullscreen::Borderless(None))
            };
            self.window.set_fullscreen(fullscreen);
        }
        if result.toggle_grid_lines {
            self.toggle_grid_lines();
        }
        if result.prev_image {
            self.navigate(Navigate::Prev);
        }
        if result.next_image {
            self.navigate(Navigate::Next);
        }
        self.window.request_redraw();
    }

    fn toggle_grid_lines(&mut self) {
        self.ui_state.show_grid_lines = !self.ui_state.show_grid_lines;
        log::debug!("grid lines {}", if self.ui_state.show_grid_lines { "on" } else { "off" });
    }

    /// A file opens on its own, a folder becomes the playlist.
    fn open_path(&mut self, path: &Path) {
        if path.is_dir() {
            self.open_folder(path);
        } else {
            self.gallery.open_single();
            self.load_image(path);
        }
    }

    fn open_folder(&mut self, dir: &Path) {
        match self.gallery.open_folder(dir) {
            Ok(Some(first)) => {
                let first = first.to_path_buf();
                self.load_image(&first);
            }
            Ok(None) => log::info!("no images in {}", dir.display()),
            Err(err) => self.report_load_error(err),
        }
    }

    fn load_image(&mut self, path: &Path) {
        match ImageBuffer::open(path) {
            Ok(image) => {
                self.viewer.load(image);
                self.ui_state.load_error = None;
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                self.window.set_title(&format!("{name} - {WINDOW_TITLE}"));
            }
            Err(err) => self.report_load_error(err),
        }
    }

    fn report_load_error(&mut self, err: ViewerError) {
        log::warn!("{err}");
        self.ui_state.load_error = Some(err.to_string());
    }

    fn navigate(&mut self, step: Navigate) {
        let next = match step {
            Navigate::Prev => self.gallery.prev(),
            Navigate::Next => self.gallery.next(),
        }
        .map(Path::to_path_buf);

        match next {
            Some(path) => {
                log::info!("{:?} -> {}", step, path.display());
                self.load_image(&path);
            }
            None => log::debug!("{step:?} ignored, no folder open"),
        }
    }

    fn process_ui_actions(&mut self, actions: ui::UiActions) {
        if actions.open_image {
            let picked = rfd::FileDialog::new()
                .set_title("Open Image")
                .add_filter("Images", IMAGE_EXTENSIONS)
                .pick_file();
            if let Some(path) = picked {
                self.gallery.open_single();
                self.load_image(&path);
            }
        }
        if actions.open_folder {
            if let Some(dir) = rfd::FileDialog::new().set_title("Open Folder").pick_folder() {
                self.open_folder(&dir);
            }
        }
        if actions.prev_image {
            self.navigate(Navigate::Prev);
        }
        if actions.next_image {
            self.navigate(Navigate::Next);
        }
        if actions.toggle_grid_lines {
            self.toggle_grid_lines();
        }
        if actions != ui::UiActions::default() {
            self.window.request_redraw();
        }
    }

    fn redraw(&mut self) {
        puffin::GlobalProfiler::lock().new_frame();
        puffin::profile_function!();

        let (ui_actions, rect) = self.run_ui();

        // Panels decide where the canvas is; follow them
        let ppp = self.egui_glow.egui_ctx.pixels_per_point();
        let canvas = CanvasRect {
            x: rect.min.x * ppp,
            y: rect.min.y * ppp,
            width: rect.width() * ppp,
            height: rect.height() * ppp,
        };
        if canvas != self.canvas {
            self.canvas = canvas;
            self.viewer.resize(canvas.viewport());
            self.window.request_redraw();
        }

        self.process_ui_actions(ui_actions);

        let size = self.window.inner_size();
        self.render.render_frame(
            &self.viewer,
            self.canvas,
            (size.width, size.height),
            self.ui_state.show_grid_lines,
        );

        self.egui_glow.paint(&self.window);

        if let Err(err) = self.gl_surface.swap_buffers(&self.gl_context) {
            log::error!("swap_buffers failed: {err}");
        }
    }

    fn run_ui(&mut self) -> (ui::UiActions, egui::Rect) {
        let position = self.gallery.position();
        let pointer_in_canvas = self.input.in_canvas;
        let viewer = &self.viewer;
        let ui_state = &mut self.ui_state;
        let mut output = (ui::UiActions::default(), egui::Rect::NOTHING);

        self.egui_glow.run(&self.window, |ctx| {
            output = ui::draw_ui(ctx, ui_state, viewer, position, pointer_in_canvas);
        });

        output
    }
}
