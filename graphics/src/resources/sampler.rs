//! GPU sampler resource.

use crate::backend::GlBackend;
use crate::device::GraphicsDevice;
use crate::error::GraphicsError;
use crate::types::SamplerDescriptor;

/// A GL sampler object.
///
/// All parameters are applied once at creation and never change afterwards.
///
/// # Example
///
/// ```ignore
/// let sampler = device.create_sampler(&SamplerDescriptor::linear())?;
/// sampler.bind(0);
/// ```
pub struct Sampler<B: GlBackend> {
    device: GraphicsDevice<B>,
    handle: B::Sampler,
    descriptor: SamplerDescriptor,
}

impl<B: GlBackend> Sampler<B> {
    /// Create a sampler object and apply every parameter of `descriptor`.
    ///
    /// # Errors
    ///
    /// - [`GraphicsError::InvalidParameter`] for a non-finite or inverted LOD
    ///   range, or if the driver rejects a parameter
    /// - [`GraphicsError::AllocationFailed`] if no sampler object was handed out
    pub fn create(
        device: &GraphicsDevice<B>,
        descriptor: &SamplerDescriptor,
    ) -> Result<Self, GraphicsError> {
        descriptor.validate()?;

        let backend = device.backend();
        let handle = backend
            .create_sampler()
            .map_err(|err| GraphicsError::AllocationFailed(format!("sampler object: {err}")))?;

        let sampler = Self {
            device: device.clone(),
            handle,
            descriptor: descriptor.clone(),
        };

        device.discard_stale_errors();

        let int_params = [
            (glow::TEXTURE_WRAP_S, descriptor.wrap_s.gl_enum()),
            (glow::TEXTURE_WRAP_T, descriptor.wrap_t.gl_enum()),
            (glow::TEXTURE_WRAP_R, descriptor.wrap_r.gl_enum()),
            (glow::TEXTURE_MIN_FILTER, descriptor.min_filter.gl_enum()),
            (glow::TEXTURE_MAG_FILTER, descriptor.mag_filter.gl_enum()),
        ];
        for (name, value) in int_params {
            backend.sampler_parameter_i32(handle, name, value as i32);
        }
        backend.sampler_parameter_f32(handle, glow::TEXTURE_MIN_LOD, descriptor.min_lod);
        backend.sampler_parameter_f32(handle, glow::TEXTURE_MAX_LOD, descriptor.max_lod);

        match descriptor.compare {
            Some(function) => {
                backend.sampler_parameter_i32(
                    handle,
                    glow::TEXTURE_COMPARE_MODE,
                    glow::COMPARE_REF_TO_TEXTURE as i32,
                );
                backend.sampler_parameter_i32(
                    handle,
                    glow::TEXTURE_COMPARE_FUNC,
                    function.gl_enum() as i32,
                );
            }
            None => {
                backend.sampler_parameter_i32(
                    handle,
                    glow::TEXTURE_COMPARE_MODE,
                    glow::NONE as i32,
                );
            }
        }

        if let Some(error) = device.take_error() {
            return Err(GraphicsError::InvalidParameter(format!(
                "sampler parameters rejected with GL error {error:#06x}"
            )));
        }

        log::debug!(
            "Created sampler {handle:?} {:?} ({:?}/{:?})",
            descriptor.label,
            descriptor.min_filter,
            descriptor.mag_filter
        );
        Ok(sampler)
    }

    /// The sampler object.
    pub fn id(&self) -> B::Sampler {
        self.handle
    }

    /// Get the sampler descriptor.
    pub fn descriptor(&self) -> &SamplerDescriptor {
        &self.descriptor
    }

    /// Get the sampler label, if set.
    pub fn label(&self) -> Option<&str> {
        self.descriptor.label.as_deref()
    }

    /// Bind to texture unit `unit`.
    pub fn bind(&self, unit: u32) {
        self.device.backend().bind_sampler(unit, Some(self.handle));
    }
}

impl<B: GlBackend> Drop for Sampler<B> {
    fn drop(&mut self) {
        log::trace!("Releasing sampler {:?}", self.handle);
        self.device.backend().delete_sampler(self.handle);
    }
}

impl<B: GlBackend> std::fmt::Debug for Sampler<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sampler")
            .field("handle", &self.handle)
            .field("mag_filter", &self.descriptor.mag_filter)
            .field("min_filter", &self.descriptor.min_filter)
            .field("label", &self.descriptor.label)
            .finish()
    }
}

#[cfg(all(test, feature = "dummy"))]
mod tests {
    use super::*;
    use crate::backend::dummy::DummyBackend;

    // Ensure Sampler is Send + Sync
    static_assertions::assert_impl_all!(Sampler<DummyBackend>: Send, Sync);

    #[test]
    fn test_sampler_debug() {
        let device = GraphicsDevice::dummy();
        let sampler = Sampler::create(&device, &SamplerDescriptor::linear()).unwrap();
        let debug = format!("{:?}", sampler);
        assert!(debug.contains("Sampler"));
        assert!(debug.contains("Linear"));
    }

    #[test]
    fn test_sampler_label() {
        let device = GraphicsDevice::dummy();
        let desc = SamplerDescriptor::nearest().with_label("test_sampler");
        let sampler = Sampler::create(&device, &desc).unwrap();
        assert_eq!(sampler.label(), Some("test_sampler"));
    }

    #[test]
    fn test_inverted_lod_range_allocates_nothing() {
        let device = GraphicsDevice::dummy();
        let desc = SamplerDescriptor::default().with_lod_range(2.0, 1.0);
        let err = Sampler::create(&device, &desc).unwrap_err();
        assert!(matches!(err, GraphicsError::InvalidParameter(_)));
        assert_eq!(device.backend().live_objects().samplers, 0);
    }
}
