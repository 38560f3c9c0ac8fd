use std::collections::BTreeSet;

use thiserror::Error;

use crate::{
    density::allowed_density,
    hint::HintStep,
    mine::MineType,
};

/// Adjacency fan-out grows with 3^d, so the axis count is capped.
pub const MAX_DIMENSIONS: usize = 6;

/// Known-good configurations, from the classic 2D boards up to a 3^6
/// hypercube.
pub const PRESETS: [(&[usize], usize); 6] = [
    (&[8, 8], 10),
    (&[16, 16], 40),
    (&[16, 30], 99),
    (&[3, 3, 3], 5),
    (&[3, 3, 3, 3], 10),
    (&[3, 3, 3, 3, 3, 3], 15),
];

/// How (and whether) the hint pipeline lies.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub enum LieMode {
    #[default]
    Truthful,
    /// Both channels take the same random offset.
    Uniform,
    /// Each channel lies independently.
    PerChannel,
}

/// The full configuration of a game.
///
/// Immutable once a game starts; the engine clones it into each new field.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// One size per axis, innermost axis last.
    pub dimensions: Vec<usize>,
    /// Parallel to `dimensions`; a missing tail means no wrap on those axes.
    pub wrap: Vec<bool>,
    pub mines: usize,
    /// Defer mine placement until the first reveal, making it safe.
    pub lazy_init: bool,
    /// The subset of the catalog placement picks from, uniformly at random.
    pub mines_to_place: Vec<MineType>,
    pub chording: bool,
    pub fail_on_wrong_flag: bool,
    /// Subtract the contribution of flagged neighbors from displayed hints.
    pub remove_flagged_mines: bool,
    pub lie_mode: LieMode,
}

impl Default for Settings {
    fn default() -> Self {
        let (dimensions, mines) = PRESETS[0];
        Self {
            dimensions: dimensions.to_vec(),
            wrap: Vec::new(),
            mines,
            lazy_init: true,
            mines_to_place: vec![MineType::Regular],
            chording: true,
            fail_on_wrong_flag: true,
            remove_flagged_mines: false,
            lie_mode: LieMode::Truthful,
        }
    }
}

/// Why a proposed configuration was rejected.
///
/// A rejection leaves the previously applied configuration untouched.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("at least one dimension is required")]
    NoDimensions,
    #[error("too many dimensions: {0}, at most {MAX_DIMENSIONS} are supported")]
    TooManyDimensions(usize),
    #[error("dimension sizes must be at least 1")]
    EmptyAxis,
    #[error("at least one axis must have size 3 or greater")]
    NoUsableAxis,
    #[error("wrap configuration has more axes than the dimension vector")]
    WrapTooLong,
    #[error("mine density too high: {density:.2}, at most {max:.2} is allowed")]
    DensityTooHigh { density: f64, max: f64 },
    #[error("mine density too low: {density:.2}, at least {min:.2} is required")]
    DensityTooLow { density: f64, min: f64 },
    #[error("at least one mine type must be selected")]
    NoMineTypes,
    #[error("duplicate mine types are not allowed")]
    DuplicateMineTypes,
}

impl Settings {
    pub fn total_cells(&self) -> usize {
        self.dimensions.iter().product()
    }

    /// Checks the whole record against the density policy and the structural
    /// limits of the engine.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dimensions.is_empty() {
            return Err(ConfigError::NoDimensions);
        }
        if self.dimensions.len() > MAX_DIMENSIONS {
            return Err(ConfigError::TooManyDimensions(self.dimensions.len()));
        }
        if self.dimensions.contains(&0) {
            return Err(ConfigError::EmptyAxis);
        }
        if !self.dimensions.iter().any(|&size| size >= 3) {
            return Err(ConfigError::NoUsableAxis);
        }
        if self.wrap.len() > self.dimensions.len() {
            return Err(ConfigError::WrapTooLong);
        }

        let bounds = allowed_density(&self.dimensions);
        let density = self.mines as f64 / self.total_cells() as f64;
        if density > bounds.max {
            return Err(ConfigError::DensityTooHigh {
                density,
                max: bounds.max,
            });
        }
        if density < bounds.min {
            return Err(ConfigError::DensityTooLow {
                density,
                min: bounds.min,
            });
        }

        validate_mine_selection(&self.mines_to_place)
    }

    /// The hint pipeline this configuration asks for.
    pub fn hint_chain(&self) -> Vec<HintStep> {
        let mut chain = vec![HintStep::Sum];
        match self.lie_mode {
            LieMode::Truthful => {}
            LieMode::Uniform => chain.push(HintStep::Liar { per_channel: false }),
            LieMode::PerChannel => chain.push(HintStep::Liar { per_channel: true }),
        }
        chain
    }
}

pub(crate) fn validate_mine_selection(selection: &[MineType]) -> Result<(), ConfigError> {
    if selection.is_empty() {
        return Err(ConfigError::NoMineTypes);
    }
    let unique: BTreeSet<_> = selection.iter().collect();
    if unique.len() != selection.len() {
        return Err(ConfigError::DuplicateMineTypes);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(dimensions: &[usize], mines: usize) -> Settings {
        Settings {
            dimensions: dimensions.to_vec(),
            mines,
            ..Settings::default()
        }
    }

    #[test]
    fn the_default_and_all_presets_validate() {
        assert_eq!(Settings::default().validate(), Ok(()));
        for (dimensions, mines) in PRESETS {
            assert_eq!(settings(dimensions, mines).validate(), Ok(()));
        }
    }

    #[test]
    fn density_bounds_are_enforced() {
        assert_eq!(settings(&[8, 8], 10).validate(), Ok(()));
        assert!(matches!(
            settings(&[8, 8], 60).validate(),
            Err(ConfigError::DensityTooHigh { .. })
        ));
        assert!(matches!(
            settings(&[8, 8], 1).validate(),
            Err(ConfigError::DensityTooLow { .. })
        ));
    }

    #[test]
    fn the_axis_count_is_capped() {
        assert_eq!(
            settings(&[1, 1, 1, 1, 1, 1, 1], 1).validate(),
            Err(ConfigError::TooManyDimensions(7))
        );
    }

    #[test]
    fn structural_errors_are_reported() {
        assert_eq!(settings(&[], 1).validate(), Err(ConfigError::NoDimensions));
        assert_eq!(
            settings(&[3, 0], 1).validate(),
            Err(ConfigError::EmptyAxis)
        );
        assert_eq!(
            settings(&[2, 2], 1).validate(),
            Err(ConfigError::NoUsableAxis)
        );

        let mut wrapped = settings(&[8, 8], 10);
        wrapped.wrap = vec![true, false, true];
        assert_eq!(wrapped.validate(), Err(ConfigError::WrapTooLong));
    }

    #[test]
    fn a_shorter_wrap_vector_is_allowed() {
        let mut wrapped = settings(&[8, 8], 10);
        wrapped.wrap = vec![true];
        assert_eq!(wrapped.validate(), Ok(()));
    }

    #[test]
    fn the_mine_selection_must_be_unique_and_non_empty() {
        assert_eq!(
            validate_mine_selection(&[]),
            Err(ConfigError::NoMineTypes)
        );
        assert_eq!(
            validate_mine_selection(&[MineType::Regular, MineType::Regular]),
            Err(ConfigError::DuplicateMineTypes)
        );
        assert_eq!(validate_mine_selection(&MineType::ALL), Ok(()));
    }

    #[test]
    fn lie_modes_extend_the_hint_chain() {
        let mut config = Settings::default();
        assert_eq!(config.hint_chain(), [HintStep::Sum]);
        config.lie_mode = LieMode::PerChannel;
        assert_eq!(
            config.hint_chain(),
            [HintStep::Sum, HintStep::Liar { per_channel: true }]
        );
    }
}
