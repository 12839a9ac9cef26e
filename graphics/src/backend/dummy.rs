//! Dummy GL backend for testing and development.
//!
//! This backend doesn't talk to a GPU. It keeps the object state a GL ES 3.0
//! driver would keep for the calls the resource wrappers make, so the whole
//! resource lifecycle can be exercised without a context:
//!
//! - shader "compilation" checks for a `#version` directive, a `main` entry
//!   point, balanced braces and `#error` directives, and produces a
//!   driver-style info log;
//! - linking reflects `uniform` declarations that are referenced outside of
//!   their declaration, merging the vertex and fragment stages;
//! - sampler parameters and immutable texture storage are recorded and can be
//!   inspected;
//! - failures go through the sticky error flag exactly like a real driver.
//!
//! [`DummyFault`] injects the failures a healthy driver never produces, so
//! every error path of the resource wrappers can be tested.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::num::NonZeroU32;

use parking_lot::Mutex;

use crate::device::DeviceCapabilities;
use crate::types::TextureFormat;

use super::{ActiveUniform, GlBackend};

/// Number of texture units exposed by the dummy driver.
pub const MAX_TEXTURE_UNITS: u32 = 32;

macro_rules! dummy_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(NonZeroU32);

        impl $name {
            /// The raw object name.
            pub fn raw(&self) -> u32 {
                self.0.get()
            }
        }
    };
}

dummy_handle!(
    /// Shader object name.
    DummyShader
);
dummy_handle!(
    /// Program object name.
    DummyProgram
);
dummy_handle!(
    /// Sampler object name.
    DummySampler
);
dummy_handle!(
    /// Texture object name.
    DummyTexture
);

/// Uniform location within a dummy program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DummyUniformLocation(u32);

impl DummyUniformLocation {
    /// The raw location index.
    pub fn raw(&self) -> u32 {
        self.0
    }
}

/// Failures the dummy driver can be told to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DummyFault {
    /// Every `create_*` call fails as if the driver ran out of object names.
    AllocationFailure,
    /// `tex_storage_*` raises `OUT_OF_MEMORY` instead of allocating.
    StorageFailure,
    /// Reflection reports the first active uniform a second time.
    DuplicateUniform,
    /// `uniform_location` finds nothing.
    HiddenUniformLocation,
    /// Reflection reports the first active uniform with an empty name.
    BlankUniformName,
}

/// Immutable storage recorded for a texture object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DummyTextureStorage {
    /// Target the storage was allocated through.
    pub target: u32,
    /// Number of mip levels.
    pub levels: u32,
    /// Sized internal format.
    pub internal_format: u32,
    pub width: u32,
    pub height: u32,
    /// Depth or layer count; 1 for `tex_storage_2d` allocations.
    pub depth: u32,
}

/// Value last uploaded to a uniform location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DummyUniformValue {
    Int(i32),
    Float(f32),
}

/// Number of live objects per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DummyObjectCounts {
    pub shaders: usize,
    pub programs: usize,
    pub samplers: usize,
    pub textures: usize,
}

impl DummyObjectCounts {
    /// Total number of live objects.
    pub fn total(&self) -> usize {
        self.shaders + self.programs + self.samplers + self.textures
    }
}

#[derive(Debug)]
struct ShaderObject {
    stage: u32,
    source: String,
    compiled: bool,
    info_log: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ReflectedUniform {
    name: String,
    is_array: bool,
    size: i32,
    utype: u32,
    location: u32,
}

impl ReflectedUniform {
    fn reported_name(&self) -> String {
        if self.is_array {
            format!("{}[0]", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Resolve `name`, `name[0]` or `name[i]` to a location.
    fn location_of(&self, query: &str) -> Option<u32> {
        if query == self.name {
            return Some(self.location);
        }
        if !self.is_array {
            return None;
        }
        let index = query
            .strip_prefix(self.name.as_str())?
            .strip_prefix('[')?
            .strip_suffix(']')?
            .parse::<u32>()
            .ok()?;
        (index < self.size as u32).then_some(self.location + index)
    }
}

#[derive(Debug, Default)]
struct ProgramObject {
    attached: Vec<u32>,
    linked: bool,
    info_log: String,
    uniforms: Vec<ReflectedUniform>,
    values: HashMap<u32, DummyUniformValue>,
}

#[derive(Debug, Default)]
struct SamplerObject {
    int_params: HashMap<u32, i32>,
    float_params: HashMap<u32, f32>,
}

#[derive(Debug, Default)]
struct TextureObject {
    target: Option<u32>,
    storage: Option<DummyTextureStorage>,
    params: HashMap<u32, i32>,
    uploaded_levels: BTreeSet<u32>,
    mipmaps_generated: bool,
}

#[derive(Debug, Default)]
struct DummyState {
    next_name: u32,
    error: Option<u32>,
    shaders: HashMap<u32, ShaderObject>,
    programs: HashMap<u32, ProgramObject>,
    samplers: HashMap<u32, SamplerObject>,
    textures: HashMap<u32, TextureObject>,
    active_unit: u32,
    texture_bindings: HashMap<(u32, u32), u32>,
    sampler_bindings: HashMap<u32, u32>,
    current_program: Option<u32>,
    faults: HashSet<DummyFault>,
    invalid_deletes: usize,
}

impl DummyState {
    fn record_error(&mut self, error: u32, call: &str) {
        log::trace!("DummyBackend: {call} raised {error:#06x}");
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    fn allocate_name(&mut self, kind: &str) -> Result<NonZeroU32, String> {
        if self.faults.contains(&DummyFault::AllocationFailure) {
            log::trace!("DummyBackend: injected allocation failure for {kind}");
            return Err(format!("out of memory while allocating {kind}"));
        }
        self.next_name = self.next_name.wrapping_add(1);
        NonZeroU32::new(self.next_name).ok_or_else(|| format!("{kind} names exhausted"))
    }

    fn bound_texture_name(&self, target: u32) -> Option<u32> {
        self.texture_bindings
            .get(&(self.active_unit, binding_target(target)))
            .copied()
    }

    fn bound_texture_mut(&mut self, target: u32, call: &str) -> Option<&mut TextureObject> {
        let Some(name) = self.bound_texture_name(target) else {
            self.record_error(glow::INVALID_OPERATION, call);
            return None;
        };
        self.textures.get_mut(&name)
    }

    fn program_mut(&mut self, program: DummyProgram, call: &str) -> Option<&mut ProgramObject> {
        if !self.programs.contains_key(&program.raw()) {
            self.record_error(glow::INVALID_VALUE, call);
        }
        self.programs.get_mut(&program.raw())
    }

    fn link(&mut self, program: DummyProgram) {
        let Some(object) = self.programs.get(&program.raw()) else {
            self.record_error(glow::INVALID_VALUE, "link_program");
            return;
        };

        let stages: Vec<(u32, bool, String)> = object
            .attached
            .iter()
            .filter_map(|name| self.shaders.get(name))
            .map(|shader| (shader.stage, shader.compiled, shader.source.clone()))
            .collect();

        let result = link_stages(&stages);

        if let Some(object) = self.programs.get_mut(&program.raw()) {
            object.values.clear();
            match result {
                Ok(uniforms) => {
                    object.linked = true;
                    object.info_log.clear();
                    object.uniforms = uniforms;
                }
                Err(log) => {
                    object.linked = false;
                    object.info_log = log;
                    object.uniforms.clear();
                }
            }
        }
    }

    fn store_uniform(&mut self, location: DummyUniformLocation, value: DummyUniformValue) {
        let Some(current) = self.current_program else {
            self.record_error(glow::INVALID_OPERATION, "uniform_1");
            return;
        };
        let known = self.programs.get(&current).is_some_and(|program| {
            program.uniforms.iter().any(|uniform| {
                (uniform.location..uniform.location + uniform.size as u32).contains(&location.0)
            })
        });
        if !known {
            self.record_error(glow::INVALID_OPERATION, "uniform_1");
            return;
        }
        if let Some(program) = self.programs.get_mut(&current) {
            program.values.insert(location.0, value);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn tex_storage(
        &mut self,
        call: &str,
        target: u32,
        levels: u32,
        internal_format: u32,
        width: u32,
        height: u32,
        depth: u32,
    ) {
        let volumetric = call == "tex_storage_3d";
        let target_ok = if volumetric {
            matches!(target, glow::TEXTURE_3D | glow::TEXTURE_2D_ARRAY)
        } else {
            matches!(target, glow::TEXTURE_2D | glow::TEXTURE_CUBE_MAP)
        };
        if !target_ok {
            self.record_error(glow::INVALID_ENUM, call);
            return;
        }
        let Ok(format) = TextureFormat::try_from(internal_format) else {
            self.record_error(glow::INVALID_ENUM, call);
            return;
        };
        if self.faults.contains(&DummyFault::StorageFailure) {
            self.record_error(glow::OUT_OF_MEMORY, call);
            return;
        }
        if levels == 0 || width == 0 || height == 0 || depth == 0 {
            self.record_error(glow::INVALID_VALUE, call);
            return;
        }
        if target == glow::TEXTURE_CUBE_MAP && width != height {
            self.record_error(glow::INVALID_VALUE, call);
            return;
        }
        let largest = if target == glow::TEXTURE_3D {
            width.max(height).max(depth)
        } else {
            width.max(height)
        };
        if levels > u32::BITS - largest.leading_zeros() {
            self.record_error(glow::INVALID_OPERATION, call);
            return;
        }
        if format.is_compressed() && target == glow::TEXTURE_3D {
            self.record_error(glow::INVALID_OPERATION, call);
            return;
        }

        let Some(texture) = self.bound_texture_mut(target, call) else {
            return;
        };
        if texture.storage.is_some() {
            self.record_error(glow::INVALID_OPERATION, call);
            return;
        }
        texture.storage = Some(DummyTextureStorage {
            target,
            levels,
            internal_format,
            width,
            height,
            depth,
        });
        log::trace!(
            "DummyBackend: {call} allocated {levels} level(s) of {format} ({width}x{height}x{depth})"
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn tex_sub_image(
        &mut self,
        call: &str,
        target: u32,
        level: u32,
        extent: [u32; 3],
        format: u32,
        ty: u32,
        data_len: usize,
    ) {
        let volumetric = call == "tex_sub_image_3d";
        let target_ok = if volumetric {
            matches!(target, glow::TEXTURE_3D | glow::TEXTURE_2D_ARRAY)
        } else {
            target == glow::TEXTURE_2D || is_cube_face(target)
        };
        if !target_ok {
            self.record_error(glow::INVALID_ENUM, call);
            return;
        }

        let Some(texture) = self.bound_texture_mut(target, call) else {
            return;
        };
        let Some(storage) = texture.storage else {
            self.record_error(glow::INVALID_OPERATION, call);
            return;
        };
        if level >= storage.levels {
            self.record_error(glow::INVALID_VALUE, call);
            return;
        }

        let level_depth = if storage.target == glow::TEXTURE_3D {
            (storage.depth >> level).max(1)
        } else {
            storage.depth
        };
        let level_extent = [
            (storage.width >> level).max(1),
            (storage.height >> level).max(1),
            level_depth,
        ];
        if extent.iter().zip(level_extent).any(|(&given, max)| given > max) {
            self.record_error(glow::INVALID_VALUE, call);
            return;
        }

        let Ok(texture_format) = TextureFormat::try_from(storage.internal_format) else {
            self.record_error(glow::INVALID_OPERATION, call);
            return;
        };
        let layout_matches = texture_format
            .transfer_layout()
            .is_some_and(|layout| layout.format == format && layout.ty == ty);
        if !layout_matches {
            self.record_error(glow::INVALID_OPERATION, call);
            return;
        }

        let needed = extent.iter().map(|&axis| axis as u64).product::<u64>()
            * texture_format.block_size() as u64;
        if (data_len as u64) < needed {
            self.record_error(glow::INVALID_OPERATION, call);
            return;
        }

        if let Some(texture) = self.bound_texture_mut(target, call) {
            texture.uploaded_levels.insert(level);
        }
    }
}

/// Software GL driver.
#[derive(Debug)]
pub struct DummyBackend {
    capabilities: DeviceCapabilities,
    state: Mutex<DummyState>,
}

impl DummyBackend {
    /// Create a new dummy backend with generous limits and every optional
    /// format available.
    pub fn new() -> Self {
        Self::with_capabilities(DeviceCapabilities {
            max_texture_dimension: 16384,
            max_3d_texture_dimension: 2048,
            max_cube_map_dimension: 16384,
            max_array_layers: 2048,
            max_texture_units: MAX_TEXTURE_UNITS,
            texture_norm16: true,
            texture_compression_bc1: true,
            texture_compression_bc1_srgb: true,
        })
    }

    /// Create a dummy backend reporting the given capabilities.
    pub fn with_capabilities(capabilities: DeviceCapabilities) -> Self {
        Self {
            capabilities,
            state: Mutex::new(DummyState::default()),
        }
    }

    /// Make the driver produce `fault` until it is cleared.
    pub fn inject_fault(&self, fault: DummyFault) {
        log::trace!("DummyBackend: injecting {fault:?}");
        self.state.lock().faults.insert(fault);
    }

    /// Stop producing `fault`.
    pub fn clear_fault(&self, fault: DummyFault) {
        self.state.lock().faults.remove(&fault);
    }

    /// Stop producing any injected fault.
    pub fn clear_faults(&self) {
        self.state.lock().faults.clear();
    }

    /// Number of live objects per kind.
    pub fn live_objects(&self) -> DummyObjectCounts {
        let state = self.state.lock();
        DummyObjectCounts {
            shaders: state.shaders.len(),
            programs: state.programs.len(),
            samplers: state.samplers.len(),
            textures: state.textures.len(),
        }
    }

    /// Number of delete calls that named an object which did not exist.
    pub fn invalid_deletes(&self) -> usize {
        self.state.lock().invalid_deletes
    }

    /// Integer parameter last set on a sampler.
    pub fn sampler_int_parameter(&self, sampler: DummySampler, name: u32) -> Option<i32> {
        let state = self.state.lock();
        state.samplers.get(&sampler.raw())?.int_params.get(&name).copied()
    }

    /// Float parameter last set on a sampler.
    pub fn sampler_float_parameter(&self, sampler: DummySampler, name: u32) -> Option<f32> {
        let state = self.state.lock();
        state.samplers.get(&sampler.raw())?.float_params.get(&name).copied()
    }

    /// Storage allocated for a texture, if any.
    pub fn texture_storage(&self, texture: DummyTexture) -> Option<DummyTextureStorage> {
        self.state.lock().textures.get(&texture.raw())?.storage
    }

    /// Parameter last set on a texture.
    pub fn texture_parameter(&self, texture: DummyTexture, name: u32) -> Option<i32> {
        let state = self.state.lock();
        state.textures.get(&texture.raw())?.params.get(&name).copied()
    }

    /// Levels that received texel data, in ascending order.
    pub fn uploaded_levels(&self, texture: DummyTexture) -> Vec<u32> {
        let state = self.state.lock();
        state
            .textures
            .get(&texture.raw())
            .map(|texture| texture.uploaded_levels.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Whether `generate_mipmap` succeeded on a texture.
    pub fn mipmaps_generated(&self, texture: DummyTexture) -> bool {
        let state = self.state.lock();
        state
            .textures
            .get(&texture.raw())
            .is_some_and(|texture| texture.mipmaps_generated)
    }

    /// Texture bound to `target` on texture unit `unit`.
    pub fn bound_texture(&self, unit: u32, target: u32) -> Option<DummyTexture> {
        let state = self.state.lock();
        let name = state.texture_bindings.get(&(unit, target))?;
        NonZeroU32::new(*name).map(DummyTexture)
    }

    /// Sampler bound to texture unit `unit`.
    pub fn bound_sampler(&self, unit: u32) -> Option<DummySampler> {
        let state = self.state.lock();
        let name = state.sampler_bindings.get(&unit)?;
        NonZeroU32::new(*name).map(DummySampler)
    }

    /// Program installed by `use_program`.
    pub fn current_program(&self) -> Option<DummyProgram> {
        let state = self.state.lock();
        state.current_program.and_then(NonZeroU32::new).map(DummyProgram)
    }

    /// Value last uploaded to `location` of `program`.
    pub fn uniform_value(
        &self,
        program: DummyProgram,
        location: DummyUniformLocation,
    ) -> Option<DummyUniformValue> {
        let state = self.state.lock();
        state.programs.get(&program.raw())?.values.get(&location.0).copied()
    }
}

impl GlBackend for DummyBackend {
    type Shader = DummyShader;
    type Program = DummyProgram;
    type Sampler = DummySampler;
    type Texture = DummyTexture;
    type UniformLocation = DummyUniformLocation;

    fn name(&self) -> &'static str {
        "Dummy Backend"
    }

    fn query_capabilities(&self) -> DeviceCapabilities {
        self.capabilities
    }

    fn get_error(&self) -> u32 {
        self.state.lock().error.take().unwrap_or(glow::NO_ERROR)
    }

    fn create_shader(&self, stage: u32) -> Result<Self::Shader, String> {
        let mut state = self.state.lock();
        if !matches!(stage, glow::VERTEX_SHADER | glow::FRAGMENT_SHADER) {
            state.record_error(glow::INVALID_ENUM, "create_shader");
            return Err(format!("unsupported shader type {stage:#06x}"));
        }
        let name = state.allocate_name("shader")?;
        state.shaders.insert(
            name.get(),
            ShaderObject {
                stage,
                source: String::new(),
                compiled: false,
                info_log: String::new(),
            },
        );
        log::trace!("DummyBackend: created shader {name}");
        Ok(DummyShader(name))
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        let mut state = self.state.lock();
        match state.shaders.get_mut(&shader.raw()) {
            Some(object) => object.source = source.to_owned(),
            None => state.record_error(glow::INVALID_VALUE, "shader_source"),
        }
    }

    fn compile_shader(&self, shader: Self::Shader) {
        let mut state = self.state.lock();
        let Some(object) = state.shaders.get_mut(&shader.raw()) else {
            state.record_error(glow::INVALID_VALUE, "compile_shader");
            return;
        };
        let errors = validate_glsl(&object.source);
        object.compiled = errors.is_empty();
        object.info_log = errors.join("\n");
        log::trace!(
            "DummyBackend: compiled shader {} ({})",
            shader.raw(),
            if object.compiled { "ok" } else { "failed" }
        );
    }

    fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        let state = self.state.lock();
        state.shaders.get(&shader.raw()).is_some_and(|object| object.compiled)
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        let state = self.state.lock();
        state
            .shaders
            .get(&shader.raw())
            .map(|object| object.info_log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: Self::Shader) {
        let mut state = self.state.lock();
        if state.shaders.remove(&shader.raw()).is_none() {
            state.invalid_deletes += 1;
            state.record_error(glow::INVALID_VALUE, "delete_shader");
            return;
        }
        log::trace!("DummyBackend: deleted shader {}", shader.raw());
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        let mut state = self.state.lock();
        let name = state.allocate_name("program")?;
        state.programs.insert(name.get(), ProgramObject::default());
        log::trace!("DummyBackend: created program {name}");
        Ok(DummyProgram(name))
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        let mut state = self.state.lock();
        if !state.shaders.contains_key(&shader.raw()) {
            state.record_error(glow::INVALID_VALUE, "attach_shader");
            return;
        }
        let Some(object) = state.program_mut(program, "attach_shader") else {
            return;
        };
        if object.attached.contains(&shader.raw()) {
            state.record_error(glow::INVALID_OPERATION, "attach_shader");
            return;
        }
        object.attached.push(shader.raw());
    }

    fn link_program(&self, program: Self::Program) {
        self.state.lock().link(program);
    }

    fn program_link_status(&self, program: Self::Program) -> bool {
        let state = self.state.lock();
        state.programs.get(&program.raw()).is_some_and(|object| object.linked)
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        let state = self.state.lock();
        state
            .programs
            .get(&program.raw())
            .map(|object| object.info_log.clone())
            .unwrap_or_default()
    }

    fn active_uniform_count(&self, program: Self::Program) -> u32 {
        let state = self.state.lock();
        let count = state
            .programs
            .get(&program.raw())
            .map_or(0, |object| object.uniforms.len() as u32);
        if count > 0 && state.faults.contains(&DummyFault::DuplicateUniform) {
            count + 1
        } else {
            count
        }
    }

    fn active_uniform(&self, program: Self::Program, index: u32) -> Option<ActiveUniform> {
        let state = self.state.lock();
        let uniforms = &state.programs.get(&program.raw())?.uniforms;

        let duplicate = state.faults.contains(&DummyFault::DuplicateUniform);
        let reflected = match uniforms.get(index as usize) {
            Some(uniform) => uniform,
            None if duplicate && index as usize == uniforms.len() => uniforms.first()?,
            None => return None,
        };

        let name = if index == 0 && state.faults.contains(&DummyFault::BlankUniformName) {
            String::new()
        } else {
            reflected.reported_name()
        };

        Some(ActiveUniform {
            name,
            size: reflected.size,
            utype: reflected.utype,
        })
    }

    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        let mut state = self.state.lock();
        if state.faults.contains(&DummyFault::HiddenUniformLocation) {
            return None;
        }
        let object = state.program_mut(program, "uniform_location")?;
        if !object.linked {
            state.record_error(glow::INVALID_OPERATION, "uniform_location");
            return None;
        }
        object
            .uniforms
            .iter()
            .find_map(|uniform| uniform.location_of(name))
            .map(DummyUniformLocation)
    }

    fn use_program(&self, program: Option<Self::Program>) {
        let mut state = self.state.lock();
        match program {
            Some(program) => match state.programs.get(&program.raw()) {
                Some(object) if object.linked => state.current_program = Some(program.raw()),
                Some(_) => state.record_error(glow::INVALID_OPERATION, "use_program"),
                None => state.record_error(glow::INVALID_VALUE, "use_program"),
            },
            None => state.current_program = None,
        }
    }

    fn uniform_1_i32(&self, location: &Self::UniformLocation, value: i32) {
        self.state
            .lock()
            .store_uniform(*location, DummyUniformValue::Int(value));
    }

    fn uniform_1_f32(&self, location: &Self::UniformLocation, value: f32) {
        self.state
            .lock()
            .store_uniform(*location, DummyUniformValue::Float(value));
    }

    fn delete_program(&self, program: Self::Program) {
        let mut state = self.state.lock();
        if state.programs.remove(&program.raw()).is_none() {
            state.invalid_deletes += 1;
            state.record_error(glow::INVALID_VALUE, "delete_program");
            return;
        }
        if state.current_program == Some(program.raw()) {
            state.current_program = None;
        }
        log::trace!("DummyBackend: deleted program {}", program.raw());
    }

    fn create_sampler(&self) -> Result<Self::Sampler, String> {
        let mut state = self.state.lock();
        let name = state.allocate_name("sampler")?;
        state.samplers.insert(name.get(), SamplerObject::default());
        log::trace!("DummyBackend: created sampler {name}");
        Ok(DummySampler(name))
    }

    fn sampler_parameter_i32(&self, sampler: Self::Sampler, name: u32, value: i32) {
        let mut state = self.state.lock();
        if !is_sampler_int_parameter(name) {
            state.record_error(glow::INVALID_ENUM, "sampler_parameter_i32");
            return;
        }
        match state.samplers.get_mut(&sampler.raw()) {
            Some(object) => {
                object.int_params.insert(name, value);
            }
            None => state.record_error(glow::INVALID_OPERATION, "sampler_parameter_i32"),
        }
    }

    fn sampler_parameter_f32(&self, sampler: Self::Sampler, name: u32, value: f32) {
        let mut state = self.state.lock();
        if !matches!(name, glow::TEXTURE_MIN_LOD | glow::TEXTURE_MAX_LOD) {
            state.record_error(glow::INVALID_ENUM, "sampler_parameter_f32");
            return;
        }
        match state.samplers.get_mut(&sampler.raw()) {
            Some(object) => {
                object.float_params.insert(name, value);
            }
            None => state.record_error(glow::INVALID_OPERATION, "sampler_parameter_f32"),
        }
    }

    fn bind_sampler(&self, unit: u32, sampler: Option<Self::Sampler>) {
        let mut state = self.state.lock();
        if unit >= MAX_TEXTURE_UNITS {
            state.record_error(glow::INVALID_VALUE, "bind_sampler");
            return;
        }
        match sampler {
            Some(sampler) if state.samplers.contains_key(&sampler.raw()) => {
                state.sampler_bindings.insert(unit, sampler.raw());
            }
            Some(_) => state.record_error(glow::INVALID_OPERATION, "bind_sampler"),
            None => {
                state.sampler_bindings.remove(&unit);
            }
        }
    }

    fn delete_sampler(&self, sampler: Self::Sampler) {
        let mut state = self.state.lock();
        if state.samplers.remove(&sampler.raw()).is_none() {
            state.invalid_deletes += 1;
            state.record_error(glow::INVALID_VALUE, "delete_sampler");
            return;
        }
        state
            .sampler_bindings
            .retain(|_, bound| *bound != sampler.raw());
        log::trace!("DummyBackend: deleted sampler {}", sampler.raw());
    }

    fn create_texture(&self) -> Result<Self::Texture, String> {
        let mut state = self.state.lock();
        let name = state.allocate_name("texture")?;
        state.textures.insert(name.get(), TextureObject::default());
        log::trace!("DummyBackend: created texture {name}");
        Ok(DummyTexture(name))
    }

    fn active_texture(&self, unit: u32) {
        let mut state = self.state.lock();
        if unit >= MAX_TEXTURE_UNITS {
            state.record_error(glow::INVALID_ENUM, "active_texture");
            return;
        }
        state.active_unit = unit;
    }

    fn bind_texture(&self, target: u32, texture: Option<Self::Texture>) {
        let mut state = self.state.lock();
        if !matches!(
            target,
            glow::TEXTURE_2D | glow::TEXTURE_2D_ARRAY | glow::TEXTURE_3D | glow::TEXTURE_CUBE_MAP
        ) {
            state.record_error(glow::INVALID_ENUM, "bind_texture");
            return;
        }
        let unit = state.active_unit;
        let Some(texture) = texture else {
            state.texture_bindings.remove(&(unit, target));
            return;
        };
        let Some(object) = state.textures.get_mut(&texture.raw()) else {
            state.record_error(glow::INVALID_OPERATION, "bind_texture");
            return;
        };
        match object.target {
            Some(existing) if existing != target => {
                state.record_error(glow::INVALID_OPERATION, "bind_texture");
            }
            _ => {
                object.target = Some(target);
                state.texture_bindings.insert((unit, target), texture.raw());
            }
        }
    }

    fn tex_storage_2d(
        &self,
        target: u32,
        levels: u32,
        internal_format: u32,
        width: u32,
        height: u32,
    ) {
        self.state.lock().tex_storage(
            "tex_storage_2d",
            target,
            levels,
            internal_format,
            width,
            height,
            1,
        );
    }

    fn tex_storage_3d(
        &self,
        target: u32,
        levels: u32,
        internal_format: u32,
        width: u32,
        height: u32,
        depth: u32,
    ) {
        self.state.lock().tex_storage(
            "tex_storage_3d",
            target,
            levels,
            internal_format,
            width,
            height,
            depth,
        );
    }

    fn tex_parameter_i32(&self, target: u32, name: u32, value: i32) {
        let mut state = self.state.lock();
        if let Some(texture) = state.bound_texture_mut(target, "tex_parameter_i32") {
            texture.params.insert(name, value);
        }
    }

    fn tex_sub_image_2d(
        &self,
        target: u32,
        level: u32,
        width: u32,
        height: u32,
        format: u32,
        ty: u32,
        data: &[u8],
    ) {
        self.state.lock().tex_sub_image(
            "tex_sub_image_2d",
            target,
            level,
            [width, height, 1],
            format,
            ty,
            data.len(),
        );
    }

    fn tex_sub_image_3d(
        &self,
        target: u32,
        level: u32,
        width: u32,
        height: u32,
        depth: u32,
        format: u32,
        ty: u32,
        data: &[u8],
    ) {
        self.state.lock().tex_sub_image(
            "tex_sub_image_3d",
            target,
            level,
            [width, height, depth],
            format,
            ty,
            data.len(),
        );
    }

    fn generate_mipmap(&self, target: u32) {
        let mut state = self.state.lock();
        let Some(texture) = state.bound_texture_mut(target, "generate_mipmap") else {
            return;
        };
        let renderable = texture.storage.and_then(|storage| {
            TextureFormat::try_from(storage.internal_format)
                .ok()
                .filter(|format| !format.is_compressed() && !format.is_integer())
                .map(|_| storage.levels)
        });
        match renderable {
            Some(levels) => {
                texture.mipmaps_generated = true;
                texture.uploaded_levels.extend(0..levels);
            }
            None => state.record_error(glow::INVALID_OPERATION, "generate_mipmap"),
        }
    }

    fn delete_texture(&self, texture: Self::Texture) {
        let mut state = self.state.lock();
        if state.textures.remove(&texture.raw()).is_none() {
            state.invalid_deletes += 1;
            state.record_error(glow::INVALID_VALUE, "delete_texture");
            return;
        }
        state
            .texture_bindings
            .retain(|_, bound| *bound != texture.raw());
        log::trace!("DummyBackend: deleted texture {}", texture.raw());
    }
}

impl Default for DummyBackend {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// GLSL checks
// ============================================================================

fn is_cube_face(target: u32) -> bool {
    (glow::TEXTURE_CUBE_MAP_POSITIVE_X..=glow::TEXTURE_CUBE_MAP_NEGATIVE_Z).contains(&target)
}

fn binding_target(target: u32) -> u32 {
    if is_cube_face(target) {
        glow::TEXTURE_CUBE_MAP
    } else {
        target
    }
}

fn is_sampler_int_parameter(name: u32) -> bool {
    matches!(
        name,
        glow::TEXTURE_WRAP_S
            | glow::TEXTURE_WRAP_T
            | glow::TEXTURE_WRAP_R
            | glow::TEXTURE_MIN_FILTER
            | glow::TEXTURE_MAG_FILTER
            | glow::TEXTURE_COMPARE_MODE
            | glow::TEXTURE_COMPARE_FUNC
    )
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Whether `ident` occurs in `text` as a whole identifier.
fn contains_identifier(text: &str, ident: &str) -> bool {
    !ident.is_empty()
        && text.match_indices(ident).any(|(start, _)| {
            let before = text[..start].chars().next_back();
            let after = text[start + ident.len()..].chars().next();
            !before.is_some_and(is_identifier_char) && !after.is_some_and(is_identifier_char)
        })
}

fn strip_line_comment(line: &str) -> &str {
    line.split_once("//").map_or(line, |(code, _)| code)
}

/// Compile-time checks; returns one driver-style log line per problem.
fn validate_glsl(source: &str) -> Vec<String> {
    let mut errors = Vec::new();

    let has_version = source
        .lines()
        .find(|line| !line.trim().is_empty())
        .is_some_and(|line| line.trim_start().starts_with("#version"));
    if !has_version {
        errors.push("ERROR: 0:1: '' : missing #version directive".to_string());
    }

    let mut depth = 0usize;
    let mut line_count = 1;
    for (index, line) in source.lines().enumerate() {
        let number = index + 1;
        line_count = number;
        let code = strip_line_comment(line);

        if let Some(message) = code.trim_start().strip_prefix("#error") {
            errors.push(format!("ERROR: 0:{number}: '#error' : {}", message.trim()));
        }

        for c in code.chars() {
            match c {
                '{' => depth += 1,
                '}' if depth == 0 => {
                    errors.push(format!("ERROR: 0:{number}: '}}' : syntax error"));
                }
                '}' => depth -= 1,
                _ => {}
            }
        }
    }
    if depth > 0 {
        errors.push(format!(
            "ERROR: 0:{line_count}: '' : unexpected end of file, missing '}}'"
        ));
    }

    let code: String = source
        .lines()
        .map(strip_line_comment)
        .collect::<Vec<_>>()
        .join("\n");
    if !contains_identifier(&code, "main") {
        errors.push(format!(
            "ERROR: 0:{line_count}: 'main' : missing entry point"
        ));
    }

    errors
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct UniformDeclaration {
    name: String,
    glsl_type: String,
    is_array: bool,
    size: i32,
}

/// Split source into uniform declarations and everything else, with comments
/// and preprocessor lines removed.
fn parse_uniforms(source: &str) -> (Vec<UniformDeclaration>, String) {
    let code: String = source
        .lines()
        .map(strip_line_comment)
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n");

    let mut declarations = Vec::new();
    let mut body = String::new();

    for statement in code.split(';') {
        // A function body ends in '}' without a ';', so the next declaration
        // shares a statement with it.
        let (prefix, tail) = match statement.rfind('}') {
            Some(end) => statement.split_at(end + 1),
            None => ("", statement),
        };

        let mut tokens = tail.split_whitespace();
        if tokens.next() != Some("uniform") {
            body.push_str(statement);
            body.push(';');
            continue;
        }
        body.push_str(prefix);
        body.push(';');

        let mut tokens = tokens.skip_while(|token| matches!(*token, "lowp" | "mediump" | "highp"));
        let Some(glsl_type) = tokens.next() else {
            continue;
        };
        let declarators: String = tokens.collect::<Vec<_>>().join(" ");

        for declarator in declarators.split(',') {
            let declarator = declarator.trim();
            let (name, size, is_array) = match declarator.split_once('[') {
                Some((name, rest)) => {
                    let size = rest
                        .trim_end_matches(']')
                        .trim()
                        .parse::<i32>()
                        .unwrap_or(1);
                    (name.trim(), size, true)
                }
                None => (declarator, 1, false),
            };
            if name.is_empty() {
                continue;
            }
            declarations.push(UniformDeclaration {
                name: name.to_string(),
                glsl_type: glsl_type.to_string(),
                is_array,
                size,
            });
        }
    }

    (declarations, body)
}

fn uniform_type(glsl_type: &str) -> Option<u32> {
    Some(match glsl_type {
        "float" => glow::FLOAT,
        "vec2" => glow::FLOAT_VEC2,
        "vec3" => glow::FLOAT_VEC3,
        "vec4" => glow::FLOAT_VEC4,
        "int" => glow::INT,
        "ivec2" => glow::INT_VEC2,
        "ivec3" => glow::INT_VEC3,
        "ivec4" => glow::INT_VEC4,
        "uint" => glow::UNSIGNED_INT,
        "uvec2" => glow::UNSIGNED_INT_VEC2,
        "uvec3" => glow::UNSIGNED_INT_VEC3,
        "uvec4" => glow::UNSIGNED_INT_VEC4,
        "bool" => glow::BOOL,
        "mat2" => glow::FLOAT_MAT2,
        "mat3" => glow::FLOAT_MAT3,
        "mat4" => glow::FLOAT_MAT4,
        "sampler2D" => glow::SAMPLER_2D,
        "sampler3D" => glow::SAMPLER_3D,
        "samplerCube" => glow::SAMPLER_CUBE,
        "sampler2DArray" => glow::SAMPLER_2D_ARRAY,
        "sampler2DShadow" => glow::SAMPLER_2D_SHADOW,
        "samplerCubeShadow" => glow::SAMPLER_CUBE_SHADOW,
        "isampler2D" => glow::INT_SAMPLER_2D,
        "usampler2D" => glow::UNSIGNED_INT_SAMPLER_2D,
        _ => return None,
    })
}

/// Link attached `(stage, compiled, source)` triples into the active uniform
/// table, or return the linker log.
fn link_stages(stages: &[(u32, bool, String)]) -> Result<Vec<ReflectedUniform>, String> {
    if stages.iter().any(|(_, compiled, _)| !compiled) {
        return Err("ERROR: One or more attached shaders not successfully compiled".to_string());
    }

    let count = |stage: u32| stages.iter().filter(|(s, _, _)| *s == stage).count();
    if count(glow::VERTEX_SHADER) != 1 || count(glow::FRAGMENT_SHADER) != 1 {
        return Err(
            "ERROR: Linking requires exactly one vertex and one fragment shader".to_string(),
        );
    }

    let ordered = [glow::VERTEX_SHADER, glow::FRAGMENT_SHADER]
        .into_iter()
        .filter_map(|stage| stages.iter().find(|(s, _, _)| *s == stage));

    let mut declared: Vec<(UniformDeclaration, bool)> = Vec::new();
    for (_, _, source) in ordered {
        let (declarations, body) = parse_uniforms(source);
        for declaration in declarations {
            let active = contains_identifier(&body, &declaration.name);
            match declared
                .iter_mut()
                .find(|(existing, _)| existing.name == declaration.name)
            {
                Some((existing, existing_active)) => {
                    if existing.glsl_type != declaration.glsl_type
                        || existing.size != declaration.size
                    {
                        return Err(format!(
                            "ERROR: Uniform '{}' differs on type between shader stages ('{}' and '{}')",
                            declaration.name, existing.glsl_type, declaration.glsl_type
                        ));
                    }
                    *existing_active |= active;
                }
                None => declared.push((declaration, active)),
            }
        }
    }

    let mut uniforms = Vec::new();
    let mut next_location = 0u32;
    for (declaration, active) in declared {
        if !active {
            continue;
        }
        let utype = uniform_type(&declaration.glsl_type).ok_or_else(|| {
            format!(
                "ERROR: Uniform '{}' has unsupported type '{}'",
                declaration.name, declaration.glsl_type
            )
        })?;
        uniforms.push(ReflectedUniform {
            name: declaration.name,
            is_array: declaration.is_array,
            size: declaration.size,
            utype,
            location: next_location,
        });
        next_location += declaration.size.max(1) as u32;
    }

    Ok(uniforms)
}
