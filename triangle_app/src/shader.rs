//! GLSL program helpers

#![allow(unsafe_code)]

use game_window::GameError;
use glow::HasContext as _;

/// Compile and link a vertex + fragment program
///
/// Shader objects are detached and deleted once linking finished, whether
/// it succeeded or not.
pub fn link_program(gl: &glow::Context, vertex: &str, fragment: &str) -> Result<glow::Program, GameError> {
    // SAFETY: called from a hook, so the window's context is current.
    unsafe {
        let program = gl.create_program().map_err(GameError::Gl)?;

        let mut shaders = Vec::with_capacity(2);
        for (kind, source) in [(glow::VERTEX_SHADER, vertex), (glow::FRAGMENT_SHADER, fragment)] {
            match compile(gl, kind, source) {
                Ok(shader) => {
                    gl.attach_shader(program, shader);
                    shaders.push(shader);
                }
                Err(err) => {
                    for shader in shaders {
                        gl.delete_shader(shader);
                    }
                    gl.delete_program(program);
                    return Err(err);
                }
            }
        }

        gl.link_program(program);
        let linked = gl.get_program_link_status(program);

        for shader in shaders {
            gl.detach_shader(program, shader);
            gl.delete_shader(shader);
        }

        if !linked {
            let info = gl.get_program_info_log(program);
            gl.delete_program(program);
            return Err(GameError::Gl(format!("program link failed: {info}")));
        }

        log::debug!("Linked shader program {program:?}");
        Ok(program)
    }
}

unsafe fn compile(gl: &glow::Context, kind: u32, source: &str) -> Result<glow::Shader, GameError> {
    let shader = gl.create_shader(kind).map_err(GameError::Gl)?;
    gl.shader_source(shader, source);
    gl.compile_shader(shader);

    if gl.get_shader_compile_status(shader) {
        Ok(shader)
    } else {
        let info = gl.get_shader_info_log(shader);
        gl.delete_shader(shader);
        let stage = if kind == glow::VERTEX_SHADER { "vertex" } else { "fragment" };
        Err(GameError::Gl(format!("{stage} shader compile failed: {info}")))
    }
}
