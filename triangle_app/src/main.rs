//! Triangle demo application
//!
//! Opens a window and draws a single colored triangle whose tint cycles over
//! time. Space pauses the animation, Escape closes the window.

mod shader;

use game_window::config::{AppConfig, Config};
use game_window::foundation::{logging, time::FrameTime};
use game_window::{Game, GameContext, GameError, GameLoop};
use glfw::{Action, Key, WindowEvent};
use glow::HasContext as _;

const CONFIG_PATH: &str = "triangle.toml";

const VERTEX_SHADER: &str = r"#version 330 core
layout (location = 0) in vec2 a_position;
layout (location = 1) in vec3 a_color;
out vec3 v_color;
void main() {
    v_color = a_color;
    gl_Position = vec4(a_position, 0.0, 1.0);
}
";

const FRAGMENT_SHADER: &str = r"#version 330 core
in vec3 v_color;
uniform vec3 u_tint;
out vec4 frag_color;
void main() {
    frag_color = vec4(v_color * u_tint, 1.0);
}
";

/// Interleaved position (xy) and color (rgb)
#[rustfmt::skip]
const VERTICES: [f32; 15] = [
    -0.5, -0.5,   1.0, 0.2, 0.2,
     0.5, -0.5,   0.2, 1.0, 0.2,
     0.0,  0.5,   0.2, 0.2, 1.0,
];

/// How often the title shows a fresh FPS reading, in seconds
const TITLE_INTERVAL: f64 = 1.0;

#[derive(Default)]
struct TriangleGame {
    program: Option<glow::Program>,
    vertex_array: Option<glow::VertexArray>,
    vertex_buffer: Option<glow::Buffer>,
    tint_location: Option<glow::UniformLocation>,
    tint: [f32; 3],
    hue: f32,
    paused: bool,
    base_title: String,
    next_title_update: f64,
}

impl Game for TriangleGame {
    #[allow(unsafe_code)]
    fn load(&mut self, ctx: &mut GameContext<'_>) -> Result<(), GameError> {
        let gl = ctx.gl()?;
        let program = shader::link_program(gl, VERTEX_SHADER, FRAGMENT_SHADER)?;

        // SAFETY: hooks run with the window's context current.
        unsafe {
            let vertex_array = gl.create_vertex_array().map_err(GameError::Gl)?;
            let vertex_buffer = gl.create_buffer().map_err(GameError::Gl)?;

            gl.bind_vertex_array(Some(vertex_array));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vertex_buffer));
            gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, bytemuck::cast_slice(&VERTICES), glow::STATIC_DRAW);

            let stride = (5 * std::mem::size_of::<f32>()) as i32;
            gl.vertex_attrib_pointer_f32(0, 2, glow::FLOAT, false, stride, 0);
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(1, 3, glow::FLOAT, false, stride, 2 * std::mem::size_of::<f32>() as i32);
            gl.enable_vertex_attrib_array(1);

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);

            self.tint_location = gl.get_uniform_location(program, "u_tint");
            self.vertex_array = Some(vertex_array);
            self.vertex_buffer = Some(vertex_buffer);
        }
        self.program = Some(program);
        self.tint = [1.0; 3];
        self.base_title = ctx.window().title();

        log::info!("Triangle loaded");
        Ok(())
    }

    fn start(&mut self, ctx: &mut GameContext<'_>) -> Result<(), GameError> {
        let (width, height) = ctx.framebuffer_size();
        log::info!("Starting with a {width}x{height} framebuffer");
        Ok(())
    }

    fn tick(&mut self, ctx: &mut GameContext<'_>, time: FrameTime) -> Result<(), GameError> {
        if !self.paused {
            self.hue = (self.hue + time.delta * 0.25).fract();
            self.tint = hue_to_rgb(self.hue);
        }

        if time.elapsed >= self.next_title_update {
            let fps = if time.clock_delta > 0.0 { 1.0 / time.clock_delta } else { 0.0 };
            let title = format!("{} - {fps:.0} fps", self.base_title);
            ctx.set_title(&title);
            self.next_title_update = time.elapsed + TITLE_INTERVAL;
        }
        Ok(())
    }

    #[allow(unsafe_code)]
    fn render(&mut self, ctx: &mut GameContext<'_>, _time: FrameTime) -> Result<(), GameError> {
        let (Some(program), Some(vertex_array)) = (self.program, self.vertex_array) else {
            return Ok(());
        };
        let gl = ctx.gl()?;
        let [r, g, b] = self.tint;

        // SAFETY: hooks run with the window's context current.
        unsafe {
            gl.use_program(Some(program));
            gl.uniform_3_f32(self.tint_location.as_ref(), r, g, b);
            gl.bind_vertex_array(Some(vertex_array));
            gl.draw_arrays(glow::TRIANGLES, 0, 3);
            gl.bind_vertex_array(None);
        }
        Ok(())
    }

    fn event(&mut self, _ctx: &mut GameContext<'_>, event: &WindowEvent) -> Result<(), GameError> {
        if let WindowEvent::Key(Key::Space, _, Action::Press, _) = event {
            self.paused = !self.paused;
            log::info!("Animation {}", if self.paused { "paused" } else { "resumed" });
        }
        Ok(())
    }

    fn resized(&mut self, _ctx: &mut GameContext<'_>, width: u32, height: u32) -> Result<(), GameError> {
        log::debug!("Viewport now {width}x{height}");
        Ok(())
    }

    #[allow(unsafe_code)]
    fn closed(&mut self, ctx: &mut GameContext<'_>) {
        let Ok(gl) = ctx.gl() else { return };

        // SAFETY: the window and its context outlive the `closed` hook.
        unsafe {
            if let Some(program) = self.program.take() {
                gl.delete_program(program);
            }
            if let Some(vertex_array) = self.vertex_array.take() {
                gl.delete_vertex_array(vertex_array);
            }
            if let Some(vertex_buffer) = self.vertex_buffer.take() {
                gl.delete_buffer(vertex_buffer);
            }
        }
        log::info!("Triangle resources released");
    }
}

/// Fully saturated color for a hue in `0..1`
fn hue_to_rgb(hue: f32) -> [f32; 3] {
    let channel = |offset: f32| {
        let k = (hue * 6.0 + offset) % 6.0;
        1.0 - (k.min(4.0 - k).clamp(0.0, 1.0))
    };
    [channel(5.0), channel(3.0), channel(1.0)]
}

fn main() -> Result<(), GameError> {
    logging::init();

    let config = AppConfig::load_or_default(CONFIG_PATH)?;
    let mut game_loop = GameLoop::open(&config)?;
    let stats = game_loop.run(&mut TriangleGame::default())?;

    log::info!("Rendered {} frames, average {:.1} fps", stats.frames, stats.average_fps);
    Ok(())
}
