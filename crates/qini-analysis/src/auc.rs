use uplift_core::QiniCurve;

/// Trapezoidal integral of `y` over `x` (sample points may be unevenly spaced).
///
/// Only the common prefix of the two slices is used. Fewer than two
/// points integrate to 0.
pub fn trapezoid(y: &[f64], x: &[f64]) -> f64 {
    let n = y.len().min(x.len());
    if n < 2 {
        return 0.0;
    }

    (1..n)
        .map(|i| (x[i] - x[i - 1]) * (y[i] + y[i - 1]) / 2.0)
        .sum()
}

/// Area under the Qini curve over the population fractions it covers.
pub fn calculate_qini_auc(curve: &QiniCurve) -> f64 {
    trapezoid(&curve.uplift_values(), &curve.population_fractions())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use uplift_core::QiniPoint;

    fn point(x: f64, y: f64) -> QiniPoint {
        QiniPoint {
            population_fraction: x,
            uplift_value: y,
        }
    }

    #[test]
    fn test_degenerate_curves() {
        assert_eq!(calculate_qini_auc(&QiniCurve::default()), 0.0);
        assert_eq!(calculate_qini_auc(&QiniCurve::new(vec![point(0.5, 3.0)])), 0.0);
        assert_eq!(trapezoid(&[], &[]), 0.0);
        assert_eq!(trapezoid(&[4.0], &[1.0]), 0.0);
    }

    #[test]
    fn test_two_point_curve() {
        let curve = QiniCurve::new(vec![point(0.5, 1.0), point(1.0, 0.0)]);
        assert_relative_eq!(calculate_qini_auc(&curve), 0.25);
    }

    #[test]
    fn test_uneven_spacing() {
        // Segments: [0,0.1] avg 1.0, [0.1,0.6] avg 2.5 -> 0.1 + 1.25
        let y = [0.0, 2.0, 3.0];
        let x = [0.0, 0.1, 0.6];
        assert_relative_eq!(trapezoid(&y, &x), 1.35, epsilon = 1e-12);
    }

    #[test]
    fn test_curve_with_negative_segment() {
        // 0.2*(1.0-0.5)/2 + 0.2*(-0.5+2.0)/2 + 0.2*(2.0+4.0)/2 = 0.05 + 0.15 + 0.6
        let curve = QiniCurve::new(vec![
            point(0.2, 1.0),
            point(0.4, -0.5),
            point(0.6, 2.0),
            point(0.8, 4.0),
        ]);
        assert_relative_eq!(calculate_qini_auc(&curve), 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_mismatched_lengths_use_common_prefix() {
        assert_relative_eq!(trapezoid(&[1.0, 1.0, 9.0], &[0.0, 1.0]), 1.0);
    }
}
