use crate::core::constants::SCALE_FACTOR;

/// Circle radius in meters for an earthquake of `magnitude`.
///
/// Linear and unclamped: zero and negative magnitudes give zero and
/// negative radii. Flooring is left to the encoder's options.
pub fn scale_magnitude(magnitude: f64) -> f64 {
    magnitude * SCALE_FACTOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_scaling() {
        assert_eq!(scale_magnitude(5.0), 50_000.0);
        assert_eq!(scale_magnitude(0.0), 0.0);
        assert_eq!(scale_magnitude(-1.2), -12_000.0);
    }

    #[test]
    fn test_strictly_increasing() {
        let magnitudes = [0.0, 0.01, 0.5, 1.0, 2.35, 4.9, 5.0, 6.7, 9.5];
        for pair in magnitudes.windows(2) {
            assert!(scale_magnitude(pair[0]) < scale_magnitude(pair[1]));
        }
    }
}
