use rand::Rng;

use crate::{grid::Grid, mine::MineConfig};

/// The accumulator threaded through the hint pipeline.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub enum Hint {
    /// Nothing is known about the cell; distinct from [`Hint::NoHint`].
    Unknown,
    /// There are no mines nearby and no hint should be displayed.
    #[default]
    NoHint,
    Value(MineConfig),
}

/// One link of the hint pipeline.
///
/// Each step is an isolated, independently testable transformation over the
/// accumulator; the cell being hinted knows nothing about which steps are
/// active.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum HintStep {
    /// Folds every adjacent mine's contribution into a running config.
    ///
    /// Never yields [`Hint::NoHint`]; a cell without adjacent mines sums to
    /// the zero config.
    Sum,
    /// Perturbs a truthful sum by a random offset so the displayed hint lies.
    ///
    /// A zero-valued channel is nudged to exactly 1, nonzero channels move by
    /// ±1, so the lie can never look identical to the truth. With
    /// `per_channel` the two channels lie independently; otherwise both take
    /// the offset picked for the numeric channel. Without any adjacent mine
    /// there is nothing to lie about and the result is [`Hint::NoHint`].
    Liar { per_channel: bool },
}

/// Walks the chain left to right, threading the accumulator.
///
/// `neighbors` are arena indices of the observing cell's neighbors and
/// `coordinates` is the observing cell's position.
pub fn evaluate(
    chain: &[HintStep],
    grid: &Grid,
    neighbors: &[usize],
    coordinates: &[usize],
    rng: &mut impl Rng,
) -> Hint {
    chain.iter().fold(Hint::default(), |accumulator, step| {
        step.apply(grid, neighbors, coordinates, accumulator, rng)
    })
}

impl HintStep {
    fn apply(
        self,
        grid: &Grid,
        neighbors: &[usize],
        coordinates: &[usize],
        accumulator: Hint,
        rng: &mut impl Rng,
    ) -> Hint {
        match self {
            Self::Sum => {
                let sum = neighbors
                    .iter()
                    .filter_map(|&neighbor| {
                        let cell = grid.cell(neighbor);
                        cell.mine()
                            .map(|mine| mine.contribution(cell.coordinates(), coordinates))
                    })
                    .fold(MineConfig::ZERO, |sum, contribution| sum + contribution);
                Hint::Value(sum)
            }
            Self::Liar { per_channel } => {
                if neighbors
                    .iter()
                    .all(|&neighbor| !grid.cell(neighbor).is_mine())
                {
                    return Hint::NoHint;
                }
                let Hint::Value(sum) = accumulator else {
                    return accumulator;
                };
                let offset = if per_channel {
                    MineConfig {
                        number: lie_offset(sum.number, rng),
                        color_number: lie_offset(sum.color_number, rng),
                    }
                } else {
                    MineConfig::splat(lie_offset(sum.number, rng))
                };
                Hint::Value(sum + offset)
            }
        }
    }
}

fn lie_offset(channel: i32, rng: &mut impl Rng) -> i32 {
    if channel == 0 {
        1
    } else if rng.gen() {
        1
    } else {
        -1
    }
}
