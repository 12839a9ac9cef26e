//! Common types shared across the graphics system.

// ============================================================================
// Extent3d
// ============================================================================

/// 3D extent for textures.
///
/// 2D textures use the depth axis for their layer count and cube maps for
/// their six faces, so every texture kind shares one three-axis
/// representation and one mip-chain derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Extent3d {
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
    /// Depth in texels, or layer count for 2D arrays and cube maps.
    pub depth: u32,
}

impl Extent3d {
    /// The smallest non-empty extent, which terminates every mip chain.
    pub const UNIT: Self = Self {
        width: 1,
        height: 1,
        depth: 1,
    };

    /// Create a new 2D extent.
    pub fn new_2d(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            depth: 1,
        }
    }

    /// Create a new 3D extent.
    pub fn new_3d(width: u32, height: u32, depth: u32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Whether every axis equals one.
    pub fn is_unit(&self) -> bool {
        *self == Self::UNIT
    }

    /// Whether any axis is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.depth == 0
    }

    /// Total number of texels.
    pub fn texel_count(&self) -> u64 {
        self.width as u64 * self.height as u64 * self.depth as u64
    }

    /// The extent of the next mip level: every axis halved, rounded down,
    /// never below one.
    pub fn halved(&self) -> Self {
        Self {
            width: (self.width / 2).max(1),
            height: (self.height / 2).max(1),
            depth: (self.depth / 2).max(1),
        }
    }

    /// Derive the full mip chain for this extent.
    ///
    /// The chain starts with `self` and ends with [`Extent3d::UNIT`]; each
    /// entry is [`halved`](Self::halved) from the previous one. Its length is
    /// governed by whichever axis reaches one last.
    pub fn mip_chain(&self) -> Vec<Extent3d> {
        let mut chain = Vec::with_capacity(self.mip_level_count() as usize);
        chain.push(*self);

        while let Some(last) = chain.last().copied() {
            if last.is_unit() {
                break;
            }
            chain.push(last.halved());
        }

        chain
    }

    /// Length of [`mip_chain`](Self::mip_chain), computed without building it.
    pub fn mip_level_count(&self) -> u32 {
        let largest = self.width.max(self.height).max(self.depth).max(1);
        u32::BITS - largest.leading_zeros()
    }

    /// The axes as `[width, height, depth]`.
    pub fn to_array(self) -> [u32; 3] {
        [self.width, self.height, self.depth]
    }
}

impl From<[u32; 3]> for Extent3d {
    fn from([width, height, depth]: [u32; 3]) -> Self {
        Self::new_3d(width, height, depth)
    }
}

impl From<[u32; 2]> for Extent3d {
    fn from([width, height]: [u32; 2]) -> Self {
        Self::new_2d(width, height)
    }
}

impl std::fmt::Display for Extent3d {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mip_chain_8x8() {
        let chain = Extent3d::new_2d(8, 8).mip_chain();
        assert_eq!(
            chain,
            vec![
                Extent3d::new_3d(8, 8, 1),
                Extent3d::new_3d(4, 4, 1),
                Extent3d::new_3d(2, 2, 1),
                Extent3d::UNIT,
            ]
        );
    }

    #[test]
    fn test_mip_chain_64x64_has_seven_levels() {
        assert_eq!(Extent3d::new_2d(64, 64).mip_chain().len(), 7);
    }

    #[test]
    fn test_mip_chain_cube_depth_collapses_first() {
        let chain = Extent3d::new_3d(16, 16, 6).mip_chain();
        let depths: Vec<u32> = chain.iter().map(|e| e.depth).collect();
        assert_eq!(depths, vec![6, 3, 1, 1, 1]);
        assert_eq!(chain.last(), Some(&Extent3d::UNIT));
    }

    #[test]
    fn test_mip_chain_non_power_of_two() {
        let chain = Extent3d::new_3d(5, 3, 1).mip_chain();
        assert_eq!(
            chain,
            vec![
                Extent3d::new_3d(5, 3, 1),
                Extent3d::new_3d(2, 1, 1),
                Extent3d::UNIT
            ]
        );
    }

    #[test]
    fn test_mip_chain_unit_extent() {
        assert_eq!(Extent3d::UNIT.mip_chain(), vec![Extent3d::UNIT]);
    }

    #[test]
    fn test_mip_chain_halving_rule_holds_everywhere() {
        for width in 1..=40 {
            for height in [1, 2, 3, 7, 64, 100] {
                for depth in [1, 6, 9] {
                    let extent = Extent3d::new_3d(width, height, depth);
                    let chain = extent.mip_chain();

                    assert_eq!(chain.first(), Some(&extent));
                    assert_eq!(chain.last(), Some(&Extent3d::UNIT));
                    assert_eq!(chain.len() as u32, extent.mip_level_count());
                    for pair in chain.windows(2) {
                        assert_eq!(pair[1].width, (pair[0].width / 2).max(1));
                        assert_eq!(pair[1].height, (pair[0].height / 2).max(1));
                        assert_eq!(pair[1].depth, (pair[0].depth / 2).max(1));
                    }
                }
            }
        }
    }

    #[test]
    fn test_texel_count_and_display() {
        let extent = Extent3d::new_3d(4, 2, 6);
        assert_eq!(extent.texel_count(), 48);
        assert_eq!(extent.to_string(), "4x2x6");
        assert!(Extent3d::new_2d(0, 4).is_empty());
    }
}
