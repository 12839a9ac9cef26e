//! Immutable GPU texture resource.

use crate::backend::GlBackend;
use crate::device::GraphicsDevice;
use crate::error::GraphicsError;
use crate::types::{Extent3d, TextureFormat, TextureTarget, TextureType};

/// A texture with immutable storage.
///
/// Storage is allocated once at creation with a fixed format, extent and
/// level count. Texel contents may be replaced afterwards, the storage never
/// is.
///
/// The full mip chain of the extents is always derived, even when fewer
/// levels are materialized: a `single_mip` texture of 64x64 stores one level
/// but still reports the seven-entry chain through [`Texture::mip_chain`].
///
/// # Example
///
/// ```ignore
/// let texture = Texture::create_immutable_2d(
///     &device,
///     false,
///     TextureFormat::Rgba8Unorm,
///     [256, 256],
///     1,
///     None,
/// )?;
/// assert_eq!(texture.mip_level_count(), 9);
/// ```
pub struct Texture<B: GlBackend> {
    device: GraphicsDevice<B>,
    handle: B::Texture,
    texture_type: TextureType,
    target: TextureTarget,
    format: TextureFormat,
    extents: Extent3d,
    mip_chain: Vec<Extent3d>,
    mip_level_count: u32,
}

impl<B: GlBackend> Texture<B> {
    /// Create a 2D texture, or a 2D array texture when `n_layers > 1`.
    ///
    /// `mip_count` overrides the number of stored levels when `single_mip`
    /// is false; by default the whole chain is stored.
    pub fn create_immutable_2d(
        device: &GraphicsDevice<B>,
        single_mip: bool,
        format: TextureFormat,
        extents: [u32; 2],
        n_layers: u32,
        mip_count: Option<u32>,
    ) -> Result<Self, GraphicsError> {
        let [width, height] = extents;
        Self::create(
            device,
            TextureType::Texture2d,
            single_mip,
            format,
            Extent3d::new_3d(width, height, n_layers),
            mip_count,
        )
    }

    /// Create a 3D texture.
    pub fn create_immutable_3d(
        device: &GraphicsDevice<B>,
        single_mip: bool,
        format: TextureFormat,
        extents: [u32; 3],
        mip_count: Option<u32>,
    ) -> Result<Self, GraphicsError> {
        Self::create(
            device,
            TextureType::Texture3d,
            single_mip,
            format,
            Extent3d::from(extents),
            mip_count,
        )
    }

    /// Create a cube map with square faces of `edge` texels.
    pub fn create_immutable_cube(
        device: &GraphicsDevice<B>,
        single_mip: bool,
        format: TextureFormat,
        edge: u32,
        mip_count: Option<u32>,
    ) -> Result<Self, GraphicsError> {
        Self::create(
            device,
            TextureType::Cube,
            single_mip,
            format,
            Extent3d::new_3d(edge, edge, 6),
            mip_count,
        )
    }

    fn create(
        device: &GraphicsDevice<B>,
        texture_type: TextureType,
        single_mip: bool,
        format: TextureFormat,
        extents: Extent3d,
        mip_count: Option<u32>,
    ) -> Result<Self, GraphicsError> {
        if extents.is_empty() {
            return Err(GraphicsError::InvalidParameter(format!(
                "{texture_type} texture extents must be non-zero, got {extents}"
            )));
        }
        check_limits(device, texture_type, extents)?;
        device.capabilities().check_format(format)?;
        if format.is_compressed() && texture_type == TextureType::Texture3d {
            return Err(GraphicsError::FeatureNotSupported(format!(
                "{format} cannot back a 3D texture"
            )));
        }

        let target = texture_type.target(extents);
        let mip_chain = extents.mip_chain();
        let mip_level_count = stored_level_count(target, &mip_chain, single_mip, mip_count)?;

        let backend = device.backend();
        let handle = backend
            .create_texture()
            .map_err(|err| GraphicsError::AllocationFailed(format!("texture object: {err}")))?;

        let texture = Self {
            device: device.clone(),
            handle,
            texture_type,
            target,
            format,
            extents,
            mip_chain,
            mip_level_count,
        };

        device.discard_stale_errors();

        let gl_target = target.gl_enum();
        let internal_format = format.gl_internal_format();
        backend.bind_texture(gl_target, Some(handle));
        if target.is_volumetric() {
            backend.tex_storage_3d(
                gl_target,
                mip_level_count,
                internal_format,
                extents.width,
                extents.height,
                extents.depth,
            );
        } else {
            backend.tex_storage_2d(
                gl_target,
                mip_level_count,
                internal_format,
                extents.width,
                extents.height,
            );
        }

        if let Some(error) = device.take_error() {
            backend.bind_texture(gl_target, None);
            return Err(GraphicsError::StorageFailed(error));
        }

        backend.tex_parameter_i32(gl_target, glow::TEXTURE_MIN_FILTER, glow::NEAREST as i32);
        backend.tex_parameter_i32(gl_target, glow::TEXTURE_MAG_FILTER, glow::NEAREST as i32);
        backend.bind_texture(gl_target, None);

        log::debug!(
            "Created {texture_type} texture {handle:?}: {extents} {format}, {mip_level_count} of {} level(s)",
            texture.mip_chain.len()
        );
        Ok(texture)
    }

    /// The texture object.
    pub fn id(&self) -> B::Texture {
        self.handle
    }

    /// The kind of texture requested at creation.
    pub fn texture_type(&self) -> TextureType {
        self.texture_type
    }

    /// The GL bind target.
    pub fn target(&self) -> TextureTarget {
        self.target
    }

    /// The texel format.
    pub fn format(&self) -> TextureFormat {
        self.format
    }

    /// Extents of level 0; the depth axis holds the layer count for 2D
    /// arrays and 6 for cube maps.
    pub fn extents(&self) -> Extent3d {
        self.extents
    }

    /// Number of levels allocated in storage.
    pub fn mip_level_count(&self) -> u32 {
        self.mip_level_count
    }

    /// The full derived mip chain, from the base extents down to 1x1x1,
    /// regardless of how many levels are stored.
    pub fn mip_chain(&self) -> &[Extent3d] {
        &self.mip_chain
    }

    /// Size of a level of the derived mip chain, stored or not.
    ///
    /// # Errors
    ///
    /// [`GraphicsError::InvalidMipLevel`] if `level` is past the end of the
    /// chain.
    pub fn get_mip_size(&self, level: u32) -> Result<Extent3d, GraphicsError> {
        self.mip_chain
            .get(level as usize)
            .copied()
            .ok_or(GraphicsError::InvalidMipLevel {
                level,
                level_count: self.mip_chain.len() as u32,
            })
    }

    /// Replace every texel of a stored level.
    ///
    /// `data` must hold the whole level, tightly packed in the format's
    /// [transfer layout](TextureFormat::transfer_layout): all layers for 2D
    /// arrays, all six faces in `+X, -X, +Y, -Y, +Z, -Z` order for cube maps.
    ///
    /// # Errors
    ///
    /// - [`GraphicsError::InvalidMipLevel`] if `level` is not stored
    /// - [`GraphicsError::FeatureNotSupported`] for compressed formats
    /// - [`GraphicsError::InvalidParameter`] if `data` has the wrong length
    /// - [`GraphicsError::Backend`] if the driver rejects the upload
    pub fn write_level(&self, level: u32, data: &[u8]) -> Result<(), GraphicsError> {
        self.check_level(level)?;
        let layout = self.format.transfer_layout().ok_or_else(|| {
            GraphicsError::FeatureNotSupported(format!(
                "texel upload for block-compressed format {}",
                self.format
            ))
        })?;

        let size = self.level_storage_extent(level);
        let expected = self.format.level_byte_size(size);
        if data.len() as u64 != expected {
            return Err(GraphicsError::InvalidParameter(format!(
                "level {level} of a {} {} texture needs {expected} bytes, got {}",
                self.extents,
                self.format,
                data.len()
            )));
        }

        let backend = self.device.backend();
        let gl_target = self.target.gl_enum();
        self.device.discard_stale_errors();
        backend.bind_texture(gl_target, Some(self.handle));

        match self.target {
            TextureTarget::Texture2d => backend.tex_sub_image_2d(
                gl_target,
                level,
                size.width,
                size.height,
                layout.format,
                layout.ty,
                data,
            ),
            TextureTarget::CubeMap => {
                let face_len = data.len() / 6;
                for (face, texels) in data.chunks_exact(face_len).enumerate() {
                    backend.tex_sub_image_2d(
                        glow::TEXTURE_CUBE_MAP_POSITIVE_X + face as u32,
                        level,
                        size.width,
                        size.height,
                        layout.format,
                        layout.ty,
                        texels,
                    );
                }
            }
            TextureTarget::Texture2dArray | TextureTarget::Texture3d => backend.tex_sub_image_3d(
                gl_target,
                level,
                size.width,
                size.height,
                size.depth,
                layout.format,
                layout.ty,
                data,
            ),
        }

        let error = self.device.take_error();
        backend.bind_texture(gl_target, None);
        match error {
            Some(error) => Err(GraphicsError::Backend(format!(
                "texel upload to level {level} failed with GL error {error:#06x}"
            ))),
            None => Ok(()),
        }
    }

    /// Regenerate every level below the base level from level 0.
    ///
    /// # Errors
    ///
    /// [`GraphicsError::FeatureNotSupported`] for compressed and integer
    /// formats, [`GraphicsError::Backend`] if the driver rejects the call.
    pub fn generate_mipmaps(&self) -> Result<(), GraphicsError> {
        if self.format.is_compressed() || self.format.is_integer() {
            return Err(GraphicsError::FeatureNotSupported(format!(
                "mipmap generation for {}",
                self.format
            )));
        }

        let backend = self.device.backend();
        let gl_target = self.target.gl_enum();
        self.device.discard_stale_errors();
        backend.bind_texture(gl_target, Some(self.handle));
        backend.generate_mipmap(gl_target);
        let error = self.device.take_error();
        backend.bind_texture(gl_target, None);

        match error {
            Some(error) => Err(GraphicsError::Backend(format!(
                "mipmap generation failed with GL error {error:#06x}"
            ))),
            None => Ok(()),
        }
    }

    /// Bind to texture unit `unit`.
    pub fn bind(&self, unit: u32) {
        let backend = self.device.backend();
        backend.active_texture(unit);
        backend.bind_texture(self.target.gl_enum(), Some(self.handle));
    }

    fn check_level(&self, level: u32) -> Result<(), GraphicsError> {
        if level < self.mip_level_count {
            Ok(())
        } else {
            Err(GraphicsError::InvalidMipLevel {
                level,
                level_count: self.mip_level_count,
            })
        }
    }

    /// Texels stored for `level`: layers and faces are not halved.
    fn level_storage_extent(&self, level: u32) -> Extent3d {
        let derived = self.mip_chain[level as usize];
        let depth = match self.target {
            TextureTarget::Texture3d => derived.depth,
            TextureTarget::Texture2d => 1,
            TextureTarget::Texture2dArray | TextureTarget::CubeMap => self.extents.depth,
        };
        Extent3d::new_3d(derived.width, derived.height, depth)
    }
}

fn check_limits<B: GlBackend>(
    device: &GraphicsDevice<B>,
    texture_type: TextureType,
    extents: Extent3d,
) -> Result<(), GraphicsError> {
    let caps = device.capabilities();
    let (max_size, max_depth) = match texture_type {
        TextureType::Texture2d => (caps.max_texture_dimension, caps.max_array_layers),
        TextureType::Texture3d => (caps.max_3d_texture_dimension, caps.max_3d_texture_dimension),
        TextureType::Cube => (caps.max_cube_map_dimension, 6),
    };
    if extents.width > max_size || extents.height > max_size || extents.depth > max_depth {
        return Err(GraphicsError::InvalidParameter(format!(
            "{texture_type} texture extents {extents} exceed the device limit of \
             {max_size}x{max_size}x{max_depth}"
        )));
    }
    Ok(())
}

/// Number of levels to allocate.
///
/// Array layers and cube faces are not filtered between levels, so GL caps
/// those targets at the chain length of their 2D footprint.
fn stored_level_count(
    target: TextureTarget,
    mip_chain: &[Extent3d],
    single_mip: bool,
    mip_count: Option<u32>,
) -> Result<u32, GraphicsError> {
    let base = mip_chain[0];
    let max_levels = match target {
        TextureTarget::Texture2dArray | TextureTarget::CubeMap => {
            Extent3d::new_2d(base.width, base.height).mip_level_count()
        }
        TextureTarget::Texture2d | TextureTarget::Texture3d => mip_chain.len() as u32,
    };

    if single_mip {
        if mip_count.is_some_and(|count| count != 1) {
            log::warn!("Ignoring mip count override {mip_count:?} for a single-mip texture");
        }
        return Ok(1);
    }

    match mip_count {
        None => Ok(max_levels),
        Some(count) if (1..=max_levels).contains(&count) => Ok(count),
        Some(count) => Err(GraphicsError::InvalidParameter(format!(
            "mip count {count} outside of 1..={max_levels} for {base}"
        ))),
    }
}

impl<B: GlBackend> Drop for Texture<B> {
    fn drop(&mut self) {
        log::trace!("Releasing texture {:?}", self.handle);
        self.device.backend().delete_texture(self.handle);
    }
}

impl<B: GlBackend> std::fmt::Debug for Texture<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("handle", &self.handle)
            .field("type", &self.texture_type)
            .field("format", &self.format)
            .field("extents", &self.extents)
            .field("mip_level_count", &self.mip_level_count)
            .finish()
    }
}
