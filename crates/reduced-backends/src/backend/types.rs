//! Launch configuration types for group-cooperative reductions

use std::fmt;

/// Grid dimensions for a group launch
///
/// Defines the 3D iteration space of groups. Group-cooperative kernels in this
/// workspace only use the `x` dimension (one group per output row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridDim {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl GridDim {
    /// Create new grid dimensions
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// Create 1D grid
    pub const fn linear(size: u32) -> Self {
        Self { x: size, y: 1, z: 1 }
    }

    /// Get total number of groups
    pub const fn total_groups(&self) -> u64 {
        self.x as u64 * self.y as u64 * self.z as u64
    }
}

impl Default for GridDim {
    fn default() -> Self {
        Self { x: 1, y: 1, z: 1 }
    }
}

impl fmt::Display for GridDim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Block dimensions
///
/// Defines the arrangement of lanes within a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockDim {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl BlockDim {
    /// Create new block dimensions
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// Create 1D block
    pub const fn linear(size: u32) -> Self {
        Self { x: size, y: 1, z: 1 }
    }

    /// Get total number of lanes per group
    pub const fn total_lanes(&self) -> u32 {
        self.x * self.y * self.z
    }
}

impl Default for BlockDim {
    fn default() -> Self {
        Self { x: 1, y: 1, z: 1 }
    }
}

impl fmt::Display for BlockDim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Launch configuration for a group-cooperative reduction
///
/// Specifies the iteration space (grid × block). Each group produces exactly
/// one committed value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LaunchConfig {
    /// Grid dimensions (number of groups in each dimension)
    pub grid: GridDim,

    /// Block dimensions (number of lanes per group in each dimension)
    pub block: BlockDim,
}

impl LaunchConfig {
    /// Create new launch configuration
    pub const fn new(grid: GridDim, block: BlockDim) -> Self {
        Self { grid, block }
    }

    /// One group per output slot with `lanes` cooperating lanes each
    pub const fn groups(groups: u32, lanes: u32) -> Self {
        Self {
            grid: GridDim::linear(groups),
            block: BlockDim::linear(lanes),
        }
    }

    /// Get total number of groups
    pub const fn total_groups(&self) -> u64 {
        self.grid.total_groups()
    }

    /// Get total number of lanes across all groups
    pub const fn total_lanes(&self) -> u64 {
        self.grid.total_groups() * self.block.total_lanes() as u64
    }

    /// Check the configuration against the output slice it will fill.
    pub fn validate(&self, outputs: usize) -> crate::Result<()> {
        if self.block.total_lanes() == 0 {
            return Err(crate::BackendError::invalid_launch(format!(
                "group size must be at least one lane ({self})"
            )));
        }
        let groups = self.total_groups();
        if groups != outputs as u64 {
            return Err(crate::BackendError::SizeMismatch {
                expected: usize::try_from(groups).unwrap_or(usize::MAX),
                actual: outputs,
            });
        }
        Ok(())
    }
}

impl fmt::Display for LaunchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "grid={}, block={}", self.grid, self.block)
    }
}

/// Execution context handed to every lane of a group reduction
///
/// Provides positional information so a lane can pick its strided slice of
/// the group's work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupContext {
    /// Linear group index (also the output slot)
    pub group_id: usize,

    /// Lane index within the group
    pub lane_id: usize,

    /// Number of lanes in the group
    pub group_size: usize,
}

impl GroupContext {
    /// Create new group context
    pub const fn new(group_id: usize, lane_id: usize, group_size: usize) -> Self {
        Self {
            group_id,
            lane_id,
            group_size,
        }
    }

    /// Indices `lane_id, lane_id + group_size, ...` below `len`.
    ///
    /// Lanes of one group together visit every index in `[0, len)` exactly once.
    pub fn strided(&self, len: usize) -> impl Iterator<Item = usize> {
        (self.lane_id..len).step_by(self.group_size.max(1))
    }
}

// ================================================================================================
// Tests
// ================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BackendError;

    #[test]
    fn test_grid_dim() {
        let grid = GridDim::new(2, 3, 4);
        assert_eq!(grid.total_groups(), 24);
        assert_eq!(grid.to_string(), "(2, 3, 4)");
        assert_eq!(GridDim::linear(10).total_groups(), 10);
    }

    #[test]
    fn test_block_dim() {
        let block = BlockDim::new(8, 8, 1);
        assert_eq!(block.total_lanes(), 64);
        assert_eq!(block.to_string(), "(8, 8, 1)");
        assert_eq!(BlockDim::linear(256).total_lanes(), 256);
    }

    #[test]
    fn test_launch_config() {
        let config = LaunchConfig::groups(4, 64);
        assert_eq!(config.total_groups(), 4);
        assert_eq!(config.total_lanes(), 256);
        assert_eq!(config.to_string(), "grid=(4, 1, 1), block=(64, 1, 1)");
    }

    #[test]
    fn test_validate_rejects_empty_group() {
        let config = LaunchConfig::groups(4, 0);
        assert!(matches!(config.validate(4), Err(BackendError::InvalidLaunchConfig(_))));
    }

    #[test]
    fn test_validate_rejects_output_mismatch() {
        let config = LaunchConfig::groups(4, 32);
        assert!(matches!(
            config.validate(3),
            Err(BackendError::SizeMismatch { expected: 4, actual: 3 })
        ));
        assert!(config.validate(4).is_ok());
    }

    #[test]
    fn test_strided_lanes_partition_range() {
        let group_size = 3;
        let mut seen: Vec<usize> = (0..group_size)
            .flat_map(|lane| GroupContext::new(0, lane, group_size).strided(10))
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..10).collect::<Vec<_>>());
    }
}
