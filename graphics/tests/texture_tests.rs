//! Texture and sampler integration tests.
//!
//! # Test Categories
//!
//! - **Mip Chain Tests**: derived chains and stored level counts per texture kind
//! - **Validation Tests**: extents, device limits and optional formats
//! - **Upload Tests**: level uploads, cube faces and mipmap generation
//! - **Sampler Tests**: per-axis state applied to the sampler object
//!
//! ```bash
//! cargo test -p esframe-graphics --test texture_tests
//! ```

mod common;

use rstest::rstest;

use common::{texel_pattern, TestContext};
use esframe_graphics::backend::dummy::DummyFault;
use esframe_graphics::glow;
use esframe_graphics::{
    CompareFunction, DeviceCapabilities, Extent3d, GlBackend, GraphicsError, MagFilter,
    MinFilter, SamplerDescriptor, Texture, TextureFormat, TextureTarget, WrapMode,
};

// ============================================================================
// Mip Chain Tests
// ============================================================================

#[test]
fn test_mip_chain_8x8() {
    let ctx = TestContext::new();
    let texture = ctx
        .device
        .create_texture_2d(false, TextureFormat::Rgba8Unorm, [8, 8], 1)
        .unwrap();

    assert_eq!(texture.mip_level_count(), 4);
    assert_eq!(
        texture.mip_chain(),
        &[
            Extent3d::new_2d(8, 8),
            Extent3d::new_2d(4, 4),
            Extent3d::new_2d(2, 2),
            Extent3d::new_2d(1, 1),
        ]
    );
    assert_eq!(texture.get_mip_size(3), Ok(Extent3d::UNIT));
}

#[test]
fn test_single_mip_keeps_full_chain() {
    let ctx = TestContext::new();
    let texture = ctx
        .device
        .create_texture_2d(true, TextureFormat::Rgba8Unorm, [64, 64], 1)
        .unwrap();

    assert_eq!(texture.mip_level_count(), 1);
    assert_eq!(texture.mip_chain().len(), 7);
    for (level, edge) in [64, 32, 16, 8, 4, 2, 1].into_iter().enumerate() {
        assert_eq!(
            texture.get_mip_size(level as u32),
            Ok(Extent3d::new_2d(edge, edge))
        );
    }
    assert_eq!(
        texture.get_mip_size(7),
        Err(GraphicsError::InvalidMipLevel {
            level: 7,
            level_count: 7,
        })
    );
}

#[test]
fn test_array_reports_sizes_beyond_stored_levels() {
    let ctx = TestContext::new();
    let texture = ctx
        .device
        .create_texture_2d(false, TextureFormat::Rgba8Unorm, [4, 4], 16)
        .unwrap();

    assert_eq!(texture.mip_level_count(), 3);
    assert_eq!(texture.mip_chain().len(), 5);
    assert_eq!(texture.get_mip_size(4), Ok(Extent3d::UNIT));
    assert!(matches!(
        texture.get_mip_size(5),
        Err(GraphicsError::InvalidMipLevel { level: 5, .. })
    ));
    // Unstored levels still cannot be written.
    assert!(matches!(
        texture.write_level(3, &[0; 4 * 16]),
        Err(GraphicsError::InvalidMipLevel { level: 3, level_count: 3 })
    ));
}

#[test]
fn test_cube_extents_and_levels() {
    let ctx = TestContext::new();
    let texture = ctx
        .device
        .create_texture_cube(false, TextureFormat::Rgba8Unorm, 4)
        .unwrap();

    assert_eq!(texture.extents(), Extent3d::new_3d(4, 4, 6));
    assert_eq!(texture.target(), TextureTarget::CubeMap);
    assert_eq!(texture.mip_level_count(), 3);
    assert_eq!(
        texture.mip_chain(),
        &[
            Extent3d::new_3d(4, 4, 6),
            Extent3d::new_3d(2, 2, 3),
            Extent3d::UNIT,
        ]
    );
}

#[rstest]
#[case::single_layer([16, 8], 1, TextureTarget::Texture2d, 5)]
#[case::array([16, 8], 3, TextureTarget::Texture2dArray, 5)]
#[case::deep_array([4, 4], 64, TextureTarget::Texture2dArray, 3)]
fn test_2d_target_and_levels(
    #[case] extents: [u32; 2],
    #[case] layers: u32,
    #[case] target: TextureTarget,
    #[case] levels: u32,
) {
    let ctx = TestContext::new();
    let texture = ctx
        .device
        .create_texture_2d(false, TextureFormat::Rgba8Unorm, extents, layers)
        .unwrap();

    assert_eq!(texture.target(), target);
    assert_eq!(texture.mip_level_count(), levels);

    let storage = ctx.backend().texture_storage(texture.id()).unwrap();
    assert_eq!(storage.target, target.gl_enum());
    assert_eq!(storage.levels, levels);
    assert_eq!(storage.depth, layers);
}

#[test]
fn test_3d_storage() {
    let ctx = TestContext::new();
    let texture = ctx
        .device
        .create_texture_3d(false, TextureFormat::R16Float, [8, 4, 2])
        .unwrap();

    assert_eq!(texture.mip_level_count(), 4);
    assert_eq!(texture.get_mip_size(1), Ok(Extent3d::new_3d(4, 2, 1)));

    let storage = ctx.backend().texture_storage(texture.id()).unwrap();
    assert_eq!(storage.target, glow::TEXTURE_3D);
    assert_eq!(storage.internal_format, glow::R16F);
    assert_eq!((storage.width, storage.height, storage.depth), (8, 4, 2));
}

#[test]
fn test_creation_leaves_nearest_filtering_and_unbinds() {
    let ctx = TestContext::new();
    let texture = ctx
        .device
        .create_texture_2d(false, TextureFormat::Rgba8Unorm, [8, 8], 1)
        .unwrap();

    for name in [glow::TEXTURE_MIN_FILTER, glow::TEXTURE_MAG_FILTER] {
        assert_eq!(
            ctx.backend().texture_parameter(texture.id(), name),
            Some(glow::NEAREST as i32)
        );
    }
    assert_eq!(ctx.backend().bound_texture(0, glow::TEXTURE_2D), None);
}

#[rstest]
#[case::override_applies(Some(2), Ok(2))]
#[case::full_chain(Some(4), Ok(4))]
#[case::zero(Some(0), Err(()))]
#[case::longer_than_chain(Some(5), Err(()))]
fn test_mip_count_override(#[case] mip_count: Option<u32>, #[case] expected: Result<u32, ()>) {
    let ctx = TestContext::new();
    let result = Texture::create_immutable_2d(
        &ctx.device,
        false,
        TextureFormat::Rgba8Unorm,
        [8, 8],
        1,
        mip_count,
    );

    match expected {
        Ok(levels) => assert_eq!(result.unwrap().mip_level_count(), levels),
        Err(()) => {
            assert!(matches!(result, Err(GraphicsError::InvalidParameter(_))));
            assert_eq!(ctx.live_objects().textures, 0);
        }
    }
}

// ============================================================================
// Validation Tests
// ============================================================================

#[rstest]
#[case::zero_width([0, 8])]
#[case::zero_height([8, 0])]
#[case::over_limit([4096, 16])]
fn test_invalid_extents(#[case] extents: [u32; 2]) {
    let ctx = TestContext::with_capabilities(DeviceCapabilities::default());
    let err = ctx
        .device
        .create_texture_2d(false, TextureFormat::Rgba8Unorm, extents, 1)
        .unwrap_err();

    assert!(matches!(err, GraphicsError::InvalidParameter(_)), "{err:?}");
    assert_eq!(ctx.live_objects().textures, 0);
}

#[test]
fn test_zero_layers_rejected() {
    let ctx = TestContext::new();
    let err = ctx
        .device
        .create_texture_2d(false, TextureFormat::Rgba8Unorm, [8, 8], 0)
        .unwrap_err();
    assert!(matches!(err, GraphicsError::InvalidParameter(_)));
}

#[rstest]
#[case::norm16(TextureFormat::R16Unorm)]
#[case::bc1(TextureFormat::Bc1RgbaUnorm)]
#[case::bc1_srgb(TextureFormat::Bc1RgbaUnormSrgb)]
fn test_optional_formats_need_capabilities(#[case] format: TextureFormat) {
    let ctx = TestContext::with_capabilities(DeviceCapabilities::default());
    let err = ctx
        .device
        .create_texture_2d(true, format, [8, 8], 1)
        .unwrap_err();
    assert!(matches!(err, GraphicsError::FeatureNotSupported(_)), "{err:?}");

    let ctx = TestContext::new();
    assert!(ctx.device.create_texture_2d(true, format, [8, 8], 1).is_ok());
}

#[test]
fn test_compressed_3d_rejected() {
    let ctx = TestContext::new();
    let err = ctx
        .device
        .create_texture_3d(true, TextureFormat::Bc1RgbaUnorm, [8, 8, 8])
        .unwrap_err();
    assert!(matches!(err, GraphicsError::FeatureNotSupported(_)));
    assert_eq!(ctx.live_objects().textures, 0);
}

#[test]
fn test_storage_failure_releases_texture() {
    let ctx = TestContext::new();
    ctx.backend().inject_fault(DummyFault::StorageFailure);

    let err = ctx
        .device
        .create_texture_cube(false, TextureFormat::Rgba8Unorm, 16)
        .unwrap_err();
    assert_eq!(err, GraphicsError::StorageFailed(glow::OUT_OF_MEMORY));
    assert_eq!(ctx.live_objects().textures, 0);
    assert_eq!(ctx.device.take_error(), None);
}

#[test]
fn test_stale_error_does_not_fail_creation() {
    let ctx = TestContext::new();
    // Raises INVALID_ENUM on the driver.
    ctx.backend().active_texture(1000);

    let texture = ctx
        .device
        .create_texture_2d(false, TextureFormat::Rgba8Unorm, [4, 4], 1);
    assert!(texture.is_ok());
}

// ============================================================================
// Upload Tests
// ============================================================================

#[test]
fn test_write_level() {
    let ctx = TestContext::new();
    let texture = ctx
        .device
        .create_texture_2d(false, TextureFormat::Rgba8Unorm, [8, 8], 1)
        .unwrap();

    texture.write_level(1, &texel_pattern(4 * 4 * 4)).unwrap();
    assert_eq!(ctx.backend().uploaded_levels(texture.id()), vec![1]);

    let err = texture.write_level(0, &texel_pattern(10)).unwrap_err();
    assert!(matches!(err, GraphicsError::InvalidParameter(_)));

    let err = texture.write_level(4, &[0]).unwrap_err();
    assert_eq!(
        err,
        GraphicsError::InvalidMipLevel {
            level: 4,
            level_count: 4,
        }
    );
}

#[test]
fn test_write_cube_level_uploads_every_face() {
    let ctx = TestContext::new();
    let texture = ctx
        .device
        .create_texture_cube(false, TextureFormat::Rgba8Unorm, 4)
        .unwrap();

    texture.write_level(0, &texel_pattern(4 * 4 * 4 * 6)).unwrap();
    texture.write_level(1, &texel_pattern(2 * 2 * 4 * 6)).unwrap();
    assert_eq!(ctx.backend().uploaded_levels(texture.id()), vec![0, 1]);
    assert_eq!(ctx.device.take_error(), None);
}

#[test]
fn test_write_array_level_covers_all_layers() {
    let ctx = TestContext::new();
    let texture = ctx
        .device
        .create_texture_2d(false, TextureFormat::R8Unorm, [4, 4], 3)
        .unwrap();

    // Layers are not halved between levels.
    texture.write_level(1, &texel_pattern(2 * 2 * 3)).unwrap();
    assert_eq!(ctx.backend().uploaded_levels(texture.id()), vec![1]);
}

#[test]
fn test_write_compressed_level_unsupported() {
    let ctx = TestContext::new();
    let texture = ctx
        .device
        .create_texture_2d(true, TextureFormat::Bc1RgbaUnorm, [8, 8], 1)
        .unwrap();

    let err = texture.write_level(0, &texel_pattern(32)).unwrap_err();
    assert!(matches!(err, GraphicsError::FeatureNotSupported(_)));
}

#[rstest]
#[case::unorm(TextureFormat::Rgba8Unorm, true)]
#[case::float(TextureFormat::Rgba16Float, true)]
#[case::integer(TextureFormat::R8Uint, false)]
#[case::compressed(TextureFormat::Bc1RgbaUnorm, false)]
fn test_generate_mipmaps(#[case] format: TextureFormat, #[case] supported: bool) {
    let ctx = TestContext::new();
    let texture = ctx
        .device
        .create_texture_2d(false, format, [16, 16], 1)
        .unwrap();

    let result = texture.generate_mipmaps();
    if supported {
        assert!(result.is_ok());
        assert!(ctx.backend().mipmaps_generated(texture.id()));
        assert_eq!(ctx.backend().uploaded_levels(texture.id()).len(), 5);
    } else {
        assert!(matches!(result, Err(GraphicsError::FeatureNotSupported(_))));
        assert!(!ctx.backend().mipmaps_generated(texture.id()));
    }
}

#[test]
fn test_bind_texture_and_sampler_to_unit() {
    let ctx = TestContext::new();
    let texture = ctx
        .device
        .create_texture_cube(true, TextureFormat::Rgba8Unorm, 8)
        .unwrap();
    let sampler = ctx.device.create_sampler(&SamplerDescriptor::linear()).unwrap();

    texture.bind(3);
    sampler.bind(3);

    assert_eq!(
        ctx.backend().bound_texture(3, glow::TEXTURE_CUBE_MAP),
        Some(texture.id())
    );
    assert_eq!(ctx.backend().bound_sampler(3), Some(sampler.id()));
}

#[test]
fn test_textures_released_exactly_once() {
    let ctx = TestContext::new();
    let textures: Vec<_> = (1..=4)
        .map(|size| {
            ctx.device
                .create_texture_2d(false, TextureFormat::Rgba8Unorm, [size, size], 1)
                .unwrap()
        })
        .collect();
    assert_eq!(ctx.live_objects().textures, 4);

    drop(textures);
    assert_eq!(ctx.live_objects().textures, 0);
    assert_eq!(ctx.backend().invalid_deletes(), 0);
}

// ============================================================================
// Sampler Tests
// ============================================================================

#[test]
fn test_sampler_applies_per_axis_state() {
    let ctx = TestContext::new();
    let descriptor = SamplerDescriptor::new(
        WrapMode::ClampToEdge,
        WrapMode::MirroredRepeat,
        WrapMode::Repeat,
        MinFilter::LinearMipmapNearest,
        MagFilter::Nearest,
        0.5,
        4.0,
    );
    let sampler = ctx.device.create_sampler(&descriptor).unwrap();
    let backend = ctx.backend();

    let int = |name| backend.sampler_int_parameter(sampler.id(), name);
    assert_eq!(int(glow::TEXTURE_WRAP_S), Some(glow::CLAMP_TO_EDGE as i32));
    assert_eq!(int(glow::TEXTURE_WRAP_T), Some(glow::MIRRORED_REPEAT as i32));
    assert_eq!(int(glow::TEXTURE_WRAP_R), Some(glow::REPEAT as i32));
    assert_eq!(
        int(glow::TEXTURE_MIN_FILTER),
        Some(glow::LINEAR_MIPMAP_NEAREST as i32)
    );
    assert_eq!(int(glow::TEXTURE_MAG_FILTER), Some(glow::NEAREST as i32));
    assert_eq!(int(glow::TEXTURE_COMPARE_MODE), Some(glow::NONE as i32));

    let float = |name| backend.sampler_float_parameter(sampler.id(), name);
    assert_eq!(float(glow::TEXTURE_MIN_LOD), Some(0.5));
    assert_eq!(float(glow::TEXTURE_MAX_LOD), Some(4.0));
}

#[rstest]
#[case::less(CompareFunction::Less, glow::LESS)]
#[case::greater_equal(CompareFunction::GreaterEqual, glow::GEQUAL)]
fn test_sampler_compare_mode(#[case] function: CompareFunction, #[case] expected: u32) {
    let ctx = TestContext::new();
    let descriptor = SamplerDescriptor::linear().with_compare(function);
    let sampler = ctx.device.create_sampler(&descriptor).unwrap();
    let backend = ctx.backend();

    assert_eq!(
        backend.sampler_int_parameter(sampler.id(), glow::TEXTURE_COMPARE_MODE),
        Some(glow::COMPARE_REF_TO_TEXTURE as i32)
    );
    assert_eq!(
        backend.sampler_int_parameter(sampler.id(), glow::TEXTURE_COMPARE_FUNC),
        Some(expected as i32)
    );
}

#[rstest]
#[case::inverted(2.0, 1.0)]
#[case::nan(f32::NAN, 1.0)]
#[case::infinite(0.0, f32::INFINITY)]
fn test_sampler_rejects_bad_lod_range(#[case] min_lod: f32, #[case] max_lod: f32) {
    let ctx = TestContext::new();
    let descriptor = SamplerDescriptor::default().with_lod_range(min_lod, max_lod);

    let err = ctx.device.create_sampler(&descriptor).unwrap_err();
    assert!(matches!(err, GraphicsError::InvalidParameter(_)));
    assert_eq!(ctx.live_objects().samplers, 0);
}

#[test]
fn test_wrap_mode_from_raw_value() {
    assert_eq!(WrapMode::try_from(glow::REPEAT), Ok(WrapMode::Repeat));
    assert_eq!(
        WrapMode::try_from(0x1234),
        Err(GraphicsError::InvalidEnumerant {
            kind: "wrap mode",
            value: 0x1234,
        })
    );
}
