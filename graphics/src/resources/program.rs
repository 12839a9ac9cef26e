//! Linked GPU program and its uniform table.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use crate::backend::GlBackend;
use crate::device::GraphicsDevice;
use crate::error::GraphicsError;
use crate::resources::Shader;
use crate::types::ShaderStage;

/// Reflection data of one active uniform.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformInfo<L> {
    /// Location used for uploads.
    pub location: L,
    /// Array length, 1 for non-array uniforms.
    pub size: i32,
    /// GL type enumerant.
    pub utype: u32,
}

/// A vertex and a fragment shader linked into one program.
///
/// Every active uniform is reflected once at link time, so
/// [`get_uniform_location`](Self::get_uniform_location) is a table lookup and
/// never queries the driver.
///
/// # Example
///
/// ```ignore
/// let program = Program::create(&device, &vertex, &fragment)?;
/// program.set_uniform_i32("u_texture", 0)?;
/// ```
pub struct Program<B: GlBackend> {
    device: GraphicsDevice<B>,
    handle: B::Program,
    vertex: Arc<Shader<B>>,
    fragment: Arc<Shader<B>>,
    uniforms: HashMap<String, UniformInfo<B::UniformLocation>>,
}

impl<B: GlBackend> Program<B> {
    /// Link `vertex` and `fragment` and reflect the active uniforms.
    ///
    /// # Errors
    ///
    /// - [`GraphicsError::InvalidParameter`] if the shaders are not a vertex
    ///   and a fragment shader, in that order
    /// - [`GraphicsError::AllocationFailed`] if no program object was handed out
    /// - [`GraphicsError::LinkFailed`] with the linker's info log
    /// - [`GraphicsError::InvalidUniform`] if the driver reports a nameless,
    ///   duplicated or location-less active uniform
    pub fn create(
        device: &GraphicsDevice<B>,
        vertex: &Arc<Shader<B>>,
        fragment: &Arc<Shader<B>>,
    ) -> Result<Self, GraphicsError> {
        expect_stage(vertex, ShaderStage::Vertex)?;
        expect_stage(fragment, ShaderStage::Fragment)?;

        let backend = device.backend();
        let handle = backend
            .create_program()
            .map_err(|err| GraphicsError::AllocationFailed(format!("program object: {err}")))?;

        let mut program = Self {
            device: device.clone(),
            handle,
            vertex: Arc::clone(vertex),
            fragment: Arc::clone(fragment),
            uniforms: HashMap::new(),
        };

        backend.attach_shader(handle, vertex.id());
        backend.attach_shader(handle, fragment.id());
        backend.link_program(handle);

        if !backend.program_link_status(handle) {
            let log = backend.program_info_log(handle);
            return Err(GraphicsError::LinkFailed {
                log: log.trim_end().to_string(),
            });
        }

        program.uniforms = reflect_uniforms(backend, handle)?;

        log::debug!(
            "Linked program {handle:?} with {} active uniform(s)",
            program.uniforms.len()
        );
        Ok(program)
    }

    /// The linked program object.
    pub fn id(&self) -> B::Program {
        self.handle
    }

    /// Location of an active uniform, `None` if the program has none by that
    /// name.
    ///
    /// Array uniforms are found under their bare name.
    pub fn get_uniform_location(&self, name: &str) -> Option<&B::UniformLocation> {
        self.uniforms.get(name).map(|info| &info.location)
    }

    /// Reflection data of an active uniform.
    pub fn uniform(&self, name: &str) -> Option<&UniformInfo<B::UniformLocation>> {
        self.uniforms.get(name)
    }

    /// Iterate over all active uniforms.
    pub fn uniforms(&self) -> impl Iterator<Item = (&str, &UniformInfo<B::UniformLocation>)> {
        self.uniforms.iter().map(|(name, info)| (name.as_str(), info))
    }

    /// Number of active uniforms.
    pub fn uniform_count(&self) -> usize {
        self.uniforms.len()
    }

    /// The vertex stage.
    pub fn vertex_shader(&self) -> &Arc<Shader<B>> {
        &self.vertex
    }

    /// The fragment stage.
    pub fn fragment_shader(&self) -> &Arc<Shader<B>> {
        &self.fragment
    }

    /// Install this program for subsequent draws.
    pub fn bind(&self) {
        self.device.backend().use_program(Some(self.handle));
    }

    /// Bind the program and upload an integer (or sampler unit) uniform.
    pub fn set_uniform_i32(&self, name: &str, value: i32) -> Result<(), GraphicsError> {
        let location = self.require_location(name)?;
        self.bind();
        self.device.backend().uniform_1_i32(location, value);
        Ok(())
    }

    /// Bind the program and upload a float uniform.
    pub fn set_uniform_f32(&self, name: &str, value: f32) -> Result<(), GraphicsError> {
        let location = self.require_location(name)?;
        self.bind();
        self.device.backend().uniform_1_f32(location, value);
        Ok(())
    }

    fn require_location(&self, name: &str) -> Result<&B::UniformLocation, GraphicsError> {
        self.get_uniform_location(name).ok_or_else(|| {
            GraphicsError::InvalidUniform(format!("program has no active uniform '{name}'"))
        })
    }
}

fn expect_stage<B: GlBackend>(
    shader: &Shader<B>,
    expected: ShaderStage,
) -> Result<(), GraphicsError> {
    if shader.stage() == expected {
        Ok(())
    } else {
        Err(GraphicsError::InvalidParameter(format!(
            "expected a {expected} shader, got a {} shader",
            shader.stage()
        )))
    }
}

fn reflect_uniforms<B: GlBackend>(
    backend: &B,
    program: B::Program,
) -> Result<HashMap<String, UniformInfo<B::UniformLocation>>, GraphicsError> {
    let count = backend.active_uniform_count(program);
    let mut uniforms = HashMap::with_capacity(count as usize);

    for index in 0..count {
        let active = backend.active_uniform(program, index).ok_or_else(|| {
            GraphicsError::InvalidUniform(format!("no data reported for active uniform #{index}"))
        })?;
        if active.name.is_empty() {
            return Err(GraphicsError::InvalidUniform(format!(
                "active uniform #{index} has an empty name"
            )));
        }

        let location = backend
            .uniform_location(program, &active.name)
            .ok_or_else(|| {
                GraphicsError::InvalidUniform(format!(
                    "active uniform '{}' has no location",
                    active.name
                ))
            })?;

        let name = active
            .name
            .strip_suffix("[0]")
            .unwrap_or(&active.name)
            .to_string();

        match uniforms.entry(name) {
            Entry::Occupied(entry) => {
                return Err(GraphicsError::InvalidUniform(format!(
                    "active uniform '{}' reported more than once",
                    entry.key()
                )));
            }
            Entry::Vacant(entry) => {
                log::trace!(
                    "Uniform '{}' at {location:?} (type {:#06x}, size {})",
                    entry.key(),
                    active.utype,
                    active.size
                );
                entry.insert(UniformInfo {
                    location,
                    size: active.size,
                    utype: active.utype,
                });
            }
        }
    }

    Ok(uniforms)
}

impl<B: GlBackend> Drop for Program<B> {
    fn drop(&mut self) {
        log::trace!("Releasing program {:?}", self.handle);
        self.device.backend().delete_program(self.handle);
    }
}

impl<B: GlBackend> std::fmt::Debug for Program<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.uniforms.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Program")
            .field("handle", &self.handle)
            .field("vertex", &self.vertex.id())
            .field("fragment", &self.fragment.id())
            .field("uniforms", &names)
            .finish()
    }
}

#[cfg(all(test, feature = "dummy"))]
mod tests {
    use super::*;
    use crate::backend::dummy::DummyBackend;

    static_assertions::assert_impl_all!(Program<DummyBackend>: Send, Sync);

    const VERTEX: &str = "#version 300 es
uniform mat4 u_mvp;
in vec4 a_position;
void main() { gl_Position = u_mvp * a_position; }
";

    const FRAGMENT: &str = "#version 300 es
precision mediump float;
uniform float u_lights[3];
out vec4 o_color;
void main() { o_color = vec4(u_lights[0] + u_lights[2]); }
";

    #[test]
    fn test_array_uniform_uses_bare_name() {
        let device = GraphicsDevice::dummy();
        let vertex = device.create_shader(ShaderStage::Vertex, VERTEX).unwrap();
        let fragment = device
            .create_shader(ShaderStage::Fragment, FRAGMENT)
            .unwrap();
        let program = Program::create(&device, &vertex, &fragment).unwrap();

        let lights = program.uniform("u_lights").unwrap();
        assert_eq!(lights.size, 3);
        assert_eq!(lights.utype, glow::FLOAT);
        assert!(program.get_uniform_location("u_lights[0]").is_none());
    }

    #[test]
    fn test_program_debug_lists_uniforms() {
        let device = GraphicsDevice::dummy();
        let vertex = device.create_shader(ShaderStage::Vertex, VERTEX).unwrap();
        let fragment = device
            .create_shader(ShaderStage::Fragment, FRAGMENT)
            .unwrap();
        let program = Program::create(&device, &vertex, &fragment).unwrap();

        let debug = format!("{program:?}");
        assert!(debug.contains("u_lights"));
        assert!(debug.contains("u_mvp"));
    }
}
