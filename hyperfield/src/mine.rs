use std::ops::{Add, AddAssign, Sub};

use itertools::zip_eq;

/// Two independent hint accumulators.
///
/// Keeping the channels separate lets "counting" mines and "coloring" mines
/// coexist on one field and be summed independently.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub struct MineConfig {
    pub number: i32,
    pub color_number: i32,
}

impl MineConfig {
    pub const ZERO: Self = Self::splat(0);

    /// A config carrying the same value on both channels.
    ///
    /// Bare numbers in contribution rules are treated as configs where both
    /// fields equal the number.
    pub const fn splat(value: i32) -> Self {
        Self {
            number: value,
            color_number: value,
        }
    }
}

impl Add for MineConfig {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            number: self.number + rhs.number,
            color_number: self.color_number + rhs.color_number,
        }
    }
}

impl AddAssign for MineConfig {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for MineConfig {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            number: self.number - rhs.number,
            color_number: self.color_number - rhs.color_number,
        }
    }
}

/// The closed catalog of mine variants.
///
/// Each variant carries a pure, displacement-based contribution rule; there
/// is no runtime dispatch beyond this enum.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum MineType {
    /// Contributes 1 to every neighbor.
    Regular,
    /// Contributes 2 to every neighbor.
    Big,
    /// Contributes 1 only to orthogonal neighbors.
    Cardinal,
    /// Contributes 1 only to pure diagonal neighbors.
    Diagonal,
    /// Contributes 1 on the numeric channel only.
    Number,
    /// Contributes 1 on the color channel only.
    Color,
}

impl MineType {
    /// Every mine variant, in catalog order.
    pub const ALL: [Self; 6] = [
        Self::Regular,
        Self::Big,
        Self::Cardinal,
        Self::Diagonal,
        Self::Number,
        Self::Color,
    ];

    /// The contribution a mine at `origin` adds to the hint of the cell at
    /// `observer`.
    ///
    /// Evaluated once per (mine, observing neighbor) pair. Direction-sensitive
    /// variants only look at which axes differ, so they behave the same under
    /// toroidal wrap.
    ///
    /// # Panics
    ///
    /// Panics if `origin` and `observer` have different lengths.
    pub fn contribution(self, origin: &[usize], observer: &[usize]) -> MineConfig {
        match self {
            Self::Regular => MineConfig::splat(1),
            Self::Big => MineConfig::splat(2),
            Self::Cardinal => {
                let differing = zip_eq(origin, observer).filter(|(a, b)| a != b).count();
                MineConfig::splat((differing == 1).into())
            }
            Self::Diagonal => {
                let all_differ = zip_eq(origin, observer).all(|(a, b)| a != b);
                MineConfig::splat(all_differ.into())
            }
            Self::Number => MineConfig {
                number: 1,
                color_number: 0,
            },
            Self::Color => MineConfig {
                number: 0,
                color_number: 1,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardinal_counts_orthogonal_neighbors_only() {
        let origin = [2, 2, 2];
        for observer in [
            [2, 1, 2],
            [2, 3, 2],
            [1, 2, 2],
            [3, 2, 2],
            [2, 2, 1],
            [2, 2, 3],
        ] {
            assert_eq!(
                MineType::Cardinal.contribution(&origin, &observer),
                MineConfig::splat(1)
            );
        }
        for observer in [[1, 1, 2], [3, 3, 2], [1, 2, 1], [2, 3, 3], [3, 3, 3]] {
            assert_eq!(
                MineType::Cardinal.contribution(&origin, &observer),
                MineConfig::ZERO
            );
        }
    }

    #[test]
    fn diagonal_counts_fully_displaced_neighbors_only() {
        let origin = [2, 2, 2];
        assert_eq!(
            MineType::Diagonal.contribution(&origin, &[1, 3, 1]),
            MineConfig::splat(1)
        );
        assert_eq!(
            MineType::Diagonal.contribution(&origin, &[1, 2, 1]),
            MineConfig::ZERO
        );
    }

    #[test]
    fn unconditional_variants() {
        assert_eq!(
            MineType::Regular.contribution(&[0], &[1]),
            MineConfig::splat(1)
        );
        assert_eq!(MineType::Big.contribution(&[0], &[1]), MineConfig::splat(2));
        assert_eq!(
            MineType::Number.contribution(&[0], &[1]),
            MineConfig {
                number: 1,
                color_number: 0
            }
        );
        assert_eq!(
            MineType::Color.contribution(&[0], &[1]),
            MineConfig {
                number: 0,
                color_number: 1
            }
        );
    }

    #[test]
    fn config_arithmetic_is_component_wise() {
        let a = MineConfig {
            number: 3,
            color_number: 1,
        };
        let b = MineConfig::splat(2);
        assert_eq!(
            a + b,
            MineConfig {
                number: 5,
                color_number: 3
            }
        );
        assert_eq!(
            a - b,
            MineConfig {
                number: 1,
                color_number: -1
            }
        );
    }
}
