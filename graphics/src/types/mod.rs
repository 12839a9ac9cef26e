//! Common types and descriptors for graphics resources.
//!
//! This module contains the enumerations handed to the GL backend (stages,
//! formats, filters, wrap modes) and the descriptor structs used to create
//! resources.

/// Generates the GL translation for a closed enumeration: `gl_enum()` maps a
/// variant to its GL constant, `TryFrom<u32>` maps a raw constant back and
/// fails with [`GraphicsError::InvalidEnumerant`](crate::GraphicsError) for
/// anything outside the list.
macro_rules! gl_enum {
    ($ty:ident, $kind:literal, { $($variant:ident => $gl:expr),+ $(,)? }) => {
        impl $ty {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// The GL constant for this value.
            pub const fn gl_enum(self) -> u32 {
                match self {
                    $($ty::$variant => $gl,)+
                }
            }
        }

        impl TryFrom<u32> for $ty {
            type Error = crate::error::GraphicsError;

            fn try_from(value: u32) -> Result<Self, Self::Error> {
                $(
                    if value == $gl {
                        return Ok($ty::$variant);
                    }
                )+
                Err(crate::error::GraphicsError::InvalidEnumerant { kind: $kind, value })
            }
        }
    };
}

mod common;
mod sampler;
mod shader;
mod texture;

pub use common::Extent3d;
pub use sampler::{CompareFunction, MagFilter, MinFilter, SamplerDescriptor, WrapMode};
pub use shader::ShaderStage;
pub use texture::{TextureFormat, TextureTarget, TextureType, TransferLayout};
