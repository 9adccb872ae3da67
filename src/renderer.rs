//! GL rendering for pixel-grid mode: one instanced quad per source pixel
//! plus the cell grid lines. The regular image is drawn through egui.

use std::mem;
use std::sync::Arc;

use glow::*;

use crate::constants::GRID_LINE_COLOR;
use crate::error::{Result, ViewerError};
use crate::pixel_grid::{PixelGrid, INSTANCE_STRIDE};
use crate::view::{ViewTransform, Viewport};

const CELL_VERTEX_SHADER: &str = r#"#version 330 core
layout (location = 0) in vec2 aPos;
layout (location = 1) in vec2 aInstancePos;
layout (location = 2) in vec3 aInstanceColor;

uniform mat4 uProjection;

out vec3 vColor;

void main() {
    vec2 imagePos = aInstancePos + aPos;
    gl_Position = uProjection * vec4(imagePos, 0.0, 1.0);
    vColor = aInstanceColor;
}
"#;

const CELL_FRAGMENT_SHADER: &str = r#"#version 330 core
in vec3 vColor;
out vec4 FragColor;

void main() {
    FragColor = vec4(vColor, 1.0);
}
"#;

const GRID_LINE_VERTEX_SHADER: &str = r#"#version 330 core
layout (location = 0) in vec2 aPos;

uniform mat4 uProjection;

void main() {
    gl_Position = uProjection * vec4(aPos, 0.0, 1.0);
}
"#;

const GRID_LINE_FRAGMENT_SHADER: &str = r#"#version 330 core
uniform vec4 uColor;
out vec4 FragColor;

void main() {
    FragColor = uColor;
}
"#;

/// Canvas placement inside the window, physical pixels, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CanvasRect {
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }
}

pub struct Renderer {
    gl: Arc<glow::Context>,
    program: NativeProgram,
    vao: NativeVertexArray,
    vbo: NativeBuffer,
    instance_vbo: NativeBuffer,
    projection_loc: NativeUniformLocation,
    // Grid line rendering
    grid_program: NativeProgram,
    grid_vao: NativeVertexArray,
    grid_vbo: NativeBuffer,
    grid_projection_loc: NativeUniformLocation,
    grid_color_loc: NativeUniformLocation,
}

impl Renderer {
    pub fn new(gl: Arc<glow::Context>) -> Result<Self> {
        unsafe {
            let program = link_program(&gl, CELL_VERTEX_SHADER, CELL_FRAGMENT_SHADER)?;
            let projection_loc = gl
                .get_uniform_location(program, "uProjection")
                .ok_or_else(|| render_error("missing uProjection uniform"))?;

            // Unit quad (0,0 to 1,1), offset per instance
            let vertices: [f32; 12] = [
                0.0, 0.0, //
                1.0, 0.0, //
                1.0, 1.0, //
                0.0, 0.0, //
                1.0, 1.0, //
                0.0, 1.0, //
            ];

            let vao = gl.create_vertex_array().map_err(ViewerError::Render)?;
            gl.bind_vertex_array(Some(vao));

            let vbo = gl.create_buffer().map_err(ViewerError::Render)?;
            gl.bind_buffer(ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(ARRAY_BUFFER, as_u8_slice(&vertices), STATIC_DRAW);
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 2, FLOAT, false, 8, 0);

            let instance_vbo = gl.create_buffer().map_err(ViewerError::Render)?;
            gl.bind_buffer(ARRAY_BUFFER, Some(instance_vbo));
            let stride = (INSTANCE_STRIDE * mem::size_of::<f32>()) as i32;

            // Position attribute (2 floats)
            gl.enable_vertex_attrib_array(1);
            gl.vertex_attrib_pointer_f32(1, 2, FLOAT, false, stride, 0);
            gl.vertex_attrib_divisor(1, 1);

            // Color attribute (3 floats)
            gl.enable_vertex_attrib_array(2);
            gl.vertex_attrib_pointer_f32(2, 3, FLOAT, false, stride, 8);
            gl.vertex_attrib_divisor(2, 1);

            gl.bind_vertex_array(None);

            let grid_program = link_program(&gl, GRID_LINE_VERTEX_SHADER, GRID_LINE_FRAGMENT_SHADER)?;
            let grid_projection_loc = gl
                .get_uniform_location(grid_program, "uProjection")
                .ok_or_else(|| render_error("missing grid uProjection uniform"))?;
            let grid_color_loc = gl
                .get_uniform_location(grid_program, "uColor")
                .ok_or_else(|| render_error("missing grid uColor uniform"))?;

            let grid_vao = gl.create_vertex_array().map_err(ViewerError::Render)?;
            gl.bind_vertex_array(Some(grid_vao));
            let grid_vbo = gl.create_buffer().map_err(ViewerError::Render)?;
            gl.bind_buffer(ARRAY_BUFFER, Some(grid_vbo));
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 2, FLOAT, false, 8, 0);
            gl.bind_vertex_array(None);

            Ok(Self {
                gl,
                program,
                vao,
                vbo,
                instance_vbo,
                projection_loc,
                grid_program,
                grid_vao,
                grid_vbo,
                grid_projection_loc,
                grid_color_loc,
            })
        }
    }

    pub fn clear(&self, window_width: u32, window_height: u32) {
        unsafe {
            self.gl.viewport(0, 0, window_width as i32, window_height as i32);
            self.gl.clear_color(0.12, 0.12, 0.12, 1.0);
            self.gl.clear(COLOR_BUFFER_BIT);
        }
    }

    pub fn reset_viewport(&self, window_width: u32, window_height: u32) {
        unsafe {
            self.gl.viewport(0, 0, window_width as i32, window_height as i32);
        }
    }

    /// Draw the visible pixel-grid cells into the canvas area.
    pub fn render_pixel_grid(
        &mut self,
        view: &ViewTransform,
        canvas: CanvasRect,
        window_height: u32,
        grid: &PixelGrid,
        image_size: (u32, u32),
        show_grid_lines: bool,
    ) {
        puffin::profile_function!();

        let instance_data = grid.instance_data();
        if instance_data.is_empty() || canvas.width < 1.0 || canvas.height < 1.0 {
            return;
        }
        let viewport = canvas.viewport();
        let projection = view.projection_matrix(viewport);

        unsafe {
            // GL origin is bottom-left
            let gl_x = canvas.x.round() as i32;
            let gl_y = (window_height as f32 - canvas.y - canvas.height).round() as i32;
            let (w, h) = (canvas.width.round() as i32, canvas.height.round() as i32);
            self.gl.viewport(gl_x, gl_y, w, h);
            self.gl.enable(SCISSOR_TEST);
            self.gl.scissor(gl_x, gl_y, w, h);

            self.gl.use_program(Some(self.program));
            self.gl.bind_vertex_array(Some(self.vao));
            self.gl.bind_buffer(ARRAY_BUFFER, Some(self.instance_vbo));
            self.gl
                .buffer_data_u8_slice(ARRAY_BUFFER, as_u8_slice(&instance_data), DYNAMIC_DRAW);
            self.gl.uniform_matrix_4_f32_slice(
                Some(&self.projection_loc),
                false,
                projection.as_ref(),
            );
            let instance_count = instance_data.len() / INSTANCE_STRIDE;
            self.gl.draw_arrays_instanced(TRIANGLES, 0, 6, instance_count as i32);
            self.gl.bind_vertex_array(None);
        }

        if show_grid_lines {
            self.render_grid_lines(view, viewport, &projection, image_size);
        }

        unsafe {
            self.gl.disable(SCISSOR_TEST);
        }
    }

    fn render_grid_lines(
        &self,
        view: &ViewTransform,
        viewport: Viewport,
        projection: &glam::Mat4,
        image_size: (u32, u32),
    ) {
        let line_vertices = grid_line_vertices(view, viewport, image_size);
        if line_vertices.is_empty() {
            return;
        }

        unsafe {
            self.gl.enable(BLEND);
            self.gl.blend_func(SRC_ALPHA, ONE_MINUS_SRC_ALPHA);
            self.gl.use_program(Some(self.grid_program));
            self.gl.bind_vertex_array(Some(self.grid_vao));
            self.gl.uniform_matrix_4_f32_slice(
                Some(&self.grid_projection_loc),
                false,
                projection.as_ref(),
            );
            let [r, g, b, a] = GRID_LINE_COLOR;
            self.gl.uniform_4_f32(Some(&self.grid_color_loc), r, g, b, a);

            self.gl.bind_buffer(ARRAY_BUFFER, Some(self.grid_vbo));
            self.gl
                .buffer_data_u8_slice(ARRAY_BUFFER, as_u8_slice(&line_vertices), DYNAMIC_DRAW);
            self.gl.draw_arrays(LINES, 0, (line_vertices.len() / 2) as i32);
            self.gl.bind_vertex_array(None);
            self.gl.disable(BLEND);
        }
    }
}

/// Line segments (x0, y0, x1, y1 ...) on every pixel boundary inside the
/// visible part of the image.
pub fn grid_line_vertices(view: &ViewTransform, viewport: Viewport, image_size: (u32, u32)) -> Vec<f32> {
    let (iw, ih) = (image_size.0 as f32, image_size.1 as f32);
    let rect = view.visible_image_rect(viewport);
    let min_x = rect.min.x.floor().max(0.0) as u32;
    let max_x = rect.max.x.ceil().min(iw) as u32;
    let min_y = rect.min.y.floor().max(0.0) as u32;
    let max_y = rect.max.y.ceil().min(ih) as u32;
    if max_x < min_x || max_y < min_y {
        return Vec::new();
    }

    let mut vertices = Vec::with_capacity(((max_x - min_x + 1) + (max_y - min_y + 1)) as usize * 4);
    for x in min_x..=max_x {
        vertices.extend_from_slice(&[x as f32, min_y as f32, x as f32, max_y as f32]);
    }
    for y in min_y..=max_y {
        vertices.extend_from_slice(&[min_x as f32, y as f32, max_x as f32, y as f32]);
    }
    vertices
}

unsafe fn link_program(gl: &glow::Context, vertex_src: &str, fragment_src: &str) -> Result<NativeProgram> {
    let vertex_shader = compile_shader(gl, VERTEX_SHADER, vertex_src)?;
    let fragment_shader = compile_shader(gl, FRAGMENT_SHADER, fragment_src)?;

    let program = gl.create_program().map_err(ViewerError::Render)?;
    gl.attach_shader(program, vertex_shader);
    gl.attach_shader(program, fragment_shader);
    gl.link_program(program);
    let linked = gl.get_program_link_status(program);

    gl.delete_shader(vertex_shader);
    gl.delete_shader(fragment_shader);

    if !linked {
        return Err(ViewerError::Render(gl.get_program_info_log(program)));
    }
    Ok(program)
}

unsafe fn compile_shader(gl: &glow::Context, kind: u32, source: &str) -> Result<NativeShader> {
    let shader = gl.create_shader(kind).map_err(ViewerError::Render)?;
    gl.shader_source(shader, source);
    gl.compile_shader(shader);
    if !gl.get_shader_compile_status(shader) {
        return Err(ViewerError::Render(gl.get_shader_info_log(shader)));
    }
    Ok(shader)
}

fn render_error(message: &str) -> ViewerError {
    ViewerError::Render(message.to_string())
}

impl Drop for Renderer {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_program(self.program);
            self.gl.delete_vertex_array(self.vao);
            self.gl.delete_buffer(self.vbo);
            self.gl.delete_buffer(self.instance_vbo);
            self.gl.delete_program(self.grid_program);
            self.gl.delete_vertex_array(self.grid_vao);
            self.gl.delete_buffer(self.grid_vbo);
        }
    }
}

fn as_u8_slice<T>(data: &[T]) -> &[u8] {
    unsafe { std::slice::from_raw_parts(data.as_ptr() as *const u8, mem::size_of_val(data)) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_grid_lines_cover_visible_pixels() {
        // 2x1 pixels visible at 64 px per cell
        let view = ViewTransform {
            scale: 64.0,
            offset: Vec2::ZERO,
        };
        let lines = grid_line_vertices(&view, Viewport::new(128.0, 64.0), (10, 10));
        // 3 vertical + 2 horizontal segments, 4 floats each
        assert_eq!(lines.len(), 5 * 4);
        assert_eq!(&lines[..4], &[0.0, 0.0, 0.0, 1.0]);
        assert_eq!(&lines[12..16], &[0.0, 0.0, 2.0, 0.0]);
    }

    #[test]
    fn test_grid_lines_stop_at_image_edge() {
        let view = ViewTransform {
            scale: 64.0,
            offset: Vec2::ZERO,
        };
        let lines = grid_line_vertices(&view, Viewport::new(640.0, 640.0), (2, 1));
        // x in 0..=2, y in 0..=1
        assert_eq!(lines.len(), (3 + 2) * 4);
        assert!(lines.iter().all(|v| *v <= 2.0));
    }

    #[test]
    fn test_as_u8_slice_length() {
        let data = [1.0f32, 2.0, 3.0];
        assert_eq!(as_u8_slice(&data).len(), 12);
    }
}
