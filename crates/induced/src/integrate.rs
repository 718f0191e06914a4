//! Globally adaptive Gauss-Kronrod (7, 15) quadrature of smooth integrands on a finite interval.
use crate::errors::{InducedError, Result};
use log::warn;
use ndarray::{Array1, Zip};

/// Max number of subintervals of the adaptive quadrature
pub const QUADRATURE_SUBINTERVAL_LIMIT: usize = 100;

// Kronrod abscissae on [0, 1), odd entries are the 7-point Gauss abscissae
const XGK: [f64; 8] = [
    0.991_455_371_120_812_639_206_854_697_526_329,
    0.949_107_912_342_758_524_526_189_684_047_851,
    0.864_864_423_359_769_072_789_712_788_640_926,
    0.741_531_185_599_394_439_863_864_773_280_788,
    0.586_087_235_467_691_130_294_144_845_693_013,
    0.405_845_151_377_397_166_906_606_412_076_961,
    0.207_784_955_007_898_467_600_689_403_773_245,
    0.,
];

const WGK: [f64; 8] = [
    0.022_935_322_010_529_224_963_732_008_058_970,
    0.063_092_092_629_978_553_290_700_663_189_204,
    0.104_790_010_322_250_183_839_876_322_541_518,
    0.140_653_259_715_525_918_745_189_590_510_238,
    0.169_004_726_639_267_902_826_583_426_598_550,
    0.190_350_578_064_785_409_913_256_402_421_014,
    0.204_432_940_075_298_892_414_161_999_234_649,
    0.209_482_141_084_727_828_012_999_174_891_714,
];

const WG: [f64; 4] = [
    0.129_484_966_168_869_693_270_611_432_679_082,
    0.279_705_391_489_276_667_901_467_771_423_780,
    0.381_830_050_505_118_944_950_369_775_488_975,
    0.417_959_183_673_469_387_755_102_040_816_327,
];

#[derive(Clone, Copy, Debug)]
struct Segment {
    lower: f64,
    upper: f64,
    value: f64,
    error: f64,
}

/// Applies the 15-point Kronrod rule on `[lower, upper]` and estimates its error
/// against the embedded 7-point Gauss rule
fn gauss_kronrod_15<F>(f: &mut F, lower: f64, upper: f64) -> Result<Segment>
where
    F: FnMut(&Array1<f64>) -> Result<Array1<f64>>,
{
    let center = 0.5 * (lower + upper);
    let half_length = 0.5 * (upper - lower);

    // center, then the 7 left and the 7 right abscissae
    let mut x = Array1::from_elem(15, center);
    for j in 0..7 {
        x[1 + j] = center - half_length * XGK[j];
        x[8 + j] = center + half_length * XGK[j];
    }
    let fx = f(&x)?;
    if fx.len() != 15 {
        return Err(InducedError::ConfigurationError(format!(
            "integrand returned {} values for 15 points",
            fx.len()
        )));
    }

    let mut kronrod = WGK[7] * fx[0];
    let mut gauss = WG[3] * fx[0];
    for j in 0..7 {
        let pair = fx[1 + j] + fx[8 + j];
        kronrod += WGK[j] * pair;
        if j % 2 == 1 {
            gauss += WG[j / 2] * pair;
        }
    }
    Ok(Segment {
        lower,
        upper,
        value: kronrod * half_length,
        error: ((kronrod - gauss) * half_length).abs(),
    })
}

/// Integrates `f` on `[lower, upper]` by bisecting the subinterval of largest error estimate
/// until the total error estimate is below `max(epsabs, epsrel * |integral|)`.
///
/// The integrand is evaluated on batches of points and returns the values at those points.
/// When the subinterval budget `limit` is exhausted the current estimate is returned and
/// the degeneracy is logged.
///
/// # Returns
///
/// * the integral estimate and its error estimate
pub fn adaptive_quadrature<F>(
    mut f: F,
    lower: f64,
    upper: f64,
    epsabs: f64,
    epsrel: f64,
    limit: usize,
) -> Result<(f64, f64)>
where
    F: FnMut(&Array1<f64>) -> Result<Array1<f64>>,
{
    if !lower.is_finite() || !upper.is_finite() {
        return Err(InducedError::ConfigurationError(format!(
            "integration bounds should be finite, got [{lower}, {upper}]"
        )));
    }
    if lower == upper {
        return Ok((0., 0.));
    }
    if lower > upper {
        let (value, error) = adaptive_quadrature(f, upper, lower, epsabs, epsrel, limit)?;
        return Ok((-value, error));
    }

    let mut segments = vec![gauss_kronrod_15(&mut f, lower, upper)?];
    loop {
        let value: f64 = segments.iter().map(|s| s.value).sum();
        let error: f64 = segments.iter().map(|s| s.error).sum();
        if !value.is_finite() {
            return Err(InducedError::ConfigurationError(format!(
                "integrand is not finite on [{lower}, {upper}]"
            )));
        }
        if error <= epsabs.max(epsrel * value.abs()) {
            return Ok((value, error));
        }
        if segments.len() >= limit.max(1) {
            warn!(
                "Numerical degeneracy: quadrature on [{lower}, {upper}] reached {} subintervals \
                 with error {error:e}",
                segments.len()
            );
            return Ok((value, error));
        }

        let (worst, _) = segments
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |(iw, ew), (i, s)| {
                if s.error > ew {
                    (i, s.error)
                } else {
                    (iw, ew)
                }
            });
        let segment = segments.swap_remove(worst);
        let middle = 0.5 * (segment.lower + segment.upper);
        if middle <= segment.lower || middle >= segment.upper {
            warn!(
                "Numerical degeneracy: quadrature subinterval [{}, {}] cannot be bisected",
                segment.lower, segment.upper
            );
            segments.push(segment);
            let value: f64 = segments.iter().map(|s| s.value).sum();
            let error: f64 = segments.iter().map(|s| s.error).sum();
            return Ok((value, error));
        }
        segments.push(gauss_kronrod_15(&mut f, segment.lower, middle)?);
        segments.push(gauss_kronrod_15(&mut f, middle, segment.upper)?);
    }
}

/// Scalar convenience wrapper of [adaptive_quadrature]
pub fn adaptive_quadrature_scalar(
    f: impl Fn(f64) -> f64,
    lower: f64,
    upper: f64,
    tol: f64,
) -> Result<f64> {
    let batch = |x: &Array1<f64>| -> Result<Array1<f64>> {
        let mut fx = Array1::zeros(x.len());
        Zip::from(&mut fx).and(x).for_each(|v, &xi| *v = f(xi));
        Ok(fx)
    };
    let (value, _) =
        adaptive_quadrature(batch, lower, upper, tol, tol, QUADRATURE_SUBINTERVAL_LIMIT)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_polynomial_is_exact_on_one_interval() {
        // degree 20 < 23, the 15-point Kronrod rule is exact
        let mut calls = 0;
        let f = |x: &Array1<f64>| -> Result<Array1<f64>> {
            calls += 1;
            Ok(x.mapv(|v| v.powi(20)))
        };
        let (value, _) = adaptive_quadrature(f, -1., 1., 1e-10, 1e-10, 100).unwrap();
        assert_abs_diff_eq!(value, 2. / 21., epsilon = 1e-14);
        assert!(calls >= 1);
    }

    #[test]
    fn test_smooth_integrands() {
        let value = adaptive_quadrature_scalar(|x| x.sin(), 0., std::f64::consts::PI, 1e-12).unwrap();
        assert_abs_diff_eq!(value, 2., epsilon = 1e-12);
        let value = adaptive_quadrature_scalar(|x| (-0.5 * x * x).exp(), -12., 12., 1e-12).unwrap();
        assert_abs_diff_eq!(value, (2. * std::f64::consts::PI).sqrt(), epsilon = 1e-11);
        // reversed bounds
        let value = adaptive_quadrature_scalar(|x| x, 1., 0., 1e-12).unwrap();
        assert_abs_diff_eq!(value, -0.5, epsilon = 1e-14);
        assert_abs_diff_eq!(adaptive_quadrature_scalar(|x| x, 1., 1., 1e-12).unwrap(), 0.);
    }

    #[test]
    fn test_endpoint_singularity() {
        let value = adaptive_quadrature_scalar(|x| x.sqrt(), 0., 1., 1e-10).unwrap();
        assert_abs_diff_eq!(value, 2. / 3., epsilon = 1e-9);
    }

    #[test]
    fn test_subinterval_limit() {
        // a kink cannot be integrated to machine precision with 2 subintervals
        let f = |x: &Array1<f64>| -> Result<Array1<f64>> { Ok(x.mapv(|v| (v - 0.3).abs())) };
        let (value, error) = adaptive_quadrature(f, 0., 1., 1e-15, 1e-15, 2).unwrap();
        assert!(error > 0.);
        assert_abs_diff_eq!(value, 0.29, epsilon = 1e-2);
    }

    #[test]
    fn test_invalid_bounds() {
        assert!(adaptive_quadrature_scalar(|x| x, 0., f64::INFINITY, 1e-10).is_err());
    }
}
