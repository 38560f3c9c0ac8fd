/// The allowed range for the ratio of mines to total cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DensityBounds {
    pub min: f64,
    pub max: f64,
}

impl DensityBounds {
    /// Whether the given density lies within the allowed range.
    pub fn contains(&self, density: f64) -> bool {
        (self.min..=self.max).contains(&density)
    }
}

/// Computes the allowed mine density for the given axis sizes.
///
/// Every axis of size 3 or greater multiplies the neighbor fan-out per cell,
/// so each such axis shrinks both bounds; axes of size 1 or 2 are ignored.
pub fn allowed_density(dimensions: &[usize]) -> DensityBounds {
    let axes = dimensions.iter().filter(|&&size| size > 2).count() as i32;
    DensityBounds {
        min: (0.2 * 0.5f64.powi(axes)).clamp(0.0, 0.2),
        max: 0.6f64.powi(axes).min(0.6),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-12,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn two_large_axes() {
        let bounds = allowed_density(&[8, 8]);
        assert_close(bounds.min, 0.05);
        assert_close(bounds.max, 0.36);
    }

    #[test]
    fn small_axes_do_not_tighten_the_bounds() {
        let bounds = allowed_density(&[2, 2]);
        assert_close(bounds.min, 0.2);
        assert_close(bounds.max, 0.6);
        assert_eq!(allowed_density(&[2, 2]), allowed_density(&[1, 2, 1]));
    }

    #[test]
    fn six_large_axes() {
        let bounds = allowed_density(&[3, 3, 3, 3, 3, 3]);
        assert_close(bounds.min, 0.2 * 0.015625);
        assert_close(bounds.max, 0.6f64.powi(6));
    }

    #[test]
    fn classic_beginner_board_is_within_bounds() {
        assert!(allowed_density(&[8, 8]).contains(10.0 / 64.0));
        assert!(!allowed_density(&[8, 8]).contains(60.0 / 64.0));
    }
}
