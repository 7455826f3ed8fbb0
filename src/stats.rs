use rand::Rng;

// ---------------------------------------------------------------------------
// Histogram binning
// ---------------------------------------------------------------------------

/// How bar heights are normalised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinScale {
    /// Raw number of values per bin.
    Count,
    /// Count / (total · bin width), so the bars integrate to 1.
    Density,
}

/// One histogram bar covering `[lo, hi)` (the last bin is closed).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub lo: f64,
    pub hi: f64,
    pub count: usize,
    pub height: f64,
}

impl Bin {
    pub fn center(&self) -> f64 {
        (self.lo + self.hi) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }
}

/// Largest number of bins ever allocated. Larger requests are drawn with
/// this many bins; callers keep the requested value for display.
pub const MAX_BINS: usize = 1_000;

/// Number of bins used when 0 is requested (Sturges' rule).
pub fn auto_bin_count(n: usize) -> usize {
    if n <= 1 {
        return 1;
    }
    ((n as f64).log2().ceil() as usize) + 1
}

/// Split `values` into equal-width bins spanning `[min, max]`.
///
/// `requested == 0` picks the bin count automatically and anything above
/// [`MAX_BINS`] is clamped to it. A constant series
/// gets a unit-wide range centred on its value. Non-finite values are
/// ignored; an input with no finite values yields no bins.
pub fn histogram(values: &[f64], requested: usize, scale: BinScale) -> Vec<Bin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return Vec::new();
    }

    let n_bins = if requested == 0 {
        auto_bin_count(finite.len())
    } else {
        requested.min(MAX_BINS)
    };

    let mut min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let mut max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (max - min).abs() < f64::EPSILON {
        min -= 0.5;
        max += 0.5;
    }
    let width = (max - min) / n_bins as f64;

    let mut counts = vec![0usize; n_bins];
    for v in &finite {
        let idx = (((v - min) / width) as usize).min(n_bins - 1);
        counts[idx] += 1;
    }

    let total = finite.len() as f64;
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let height = match scale {
                BinScale::Count => count as f64,
                BinScale::Density => count as f64 / (total * width),
            };
            Bin {
                lo: min + i as f64 * width,
                hi: min + (i + 1) as f64 * width,
                count,
                height,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Kernel density estimate
// ---------------------------------------------------------------------------

/// Scott's rule bandwidth for a Gaussian kernel.
pub fn scott_bandwidth(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    if n < 2.0 {
        return 1.0;
    }
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let bw = var.sqrt() * n.powf(-1.0 / 5.0);
    if bw > 0.0 { bw } else { 1.0 }
}

/// Gaussian KDE evaluated at `points` evenly spaced samples over the data
/// range extended by three bandwidths. Each y is multiplied by `scale`
/// (1.0 for a density, `n · bin_width` to overlay a count histogram).
pub fn gaussian_kde(values: &[f64], points: usize, scale: f64) -> Vec<[f64; 2]> {
    if values.is_empty() || points < 2 {
        return Vec::new();
    }
    let bw = scott_bandwidth(values);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min) - 3.0 * bw;
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max) + 3.0 * bw;
    let step = (max - min) / (points - 1) as f64;
    let norm = 1.0 / (values.len() as f64 * bw * (2.0 * std::f64::consts::PI).sqrt());

    (0..points)
        .map(|i| {
            let x = min + i as f64 * step;
            let density: f64 = values
                .iter()
                .map(|v| (-0.5 * ((x - v) / bw).powi(2)).exp())
                .sum::<f64>()
                * norm;
            [x, density * scale]
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Standard normal sampling
// ---------------------------------------------------------------------------

/// Draw `n` standard-normal values from `rng` (Box-Muller transform).
pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<f64> {
    (0..n)
        .map(|_| {
            let u1: f64 = rng.gen::<f64>().max(1e-15);
            let u2: f64 = rng.gen();
            (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_histogram_counts() {
        let values = [1.0, 2.0, 2.5, 3.0, 4.0, f64::NAN];
        let bins = histogram(&values, 3, BinScale::Count);
        assert_eq!(bins.len(), 3);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 5);
        assert_eq!(bins[0].lo, 1.0);
        assert_eq!(bins[2].hi, 4.0);
        // the max lands in the closed last bin
        assert_eq!(bins[2].count, 2);
    }

    #[test]
    fn test_density_integrates_to_one() {
        let mut rng = StdRng::seed_from_u64(7);
        let values = standard_normal(&mut rng, 800);
        let bins = histogram(&values, 25, BinScale::Density);
        let area: f64 = bins.iter().map(|b| b.height * b.width()).sum();
        assert!((area - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_bins_is_automatic() {
        let values: Vec<f64> = (0..344).map(|i| i as f64).collect();
        assert_eq!(histogram(&values, 0, BinScale::Count).len(), auto_bin_count(344));
        assert_eq!(auto_bin_count(344), 10);
    }

    #[test]
    fn test_huge_request_is_clamped() {
        let values = [1.0, 2.0, 3.0];
        let bins = histogram(&values, usize::MAX, BinScale::Count);
        assert_eq!(bins.len(), MAX_BINS);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 3);
        assert_eq!(histogram(&values, MAX_BINS, BinScale::Count).len(), MAX_BINS);
    }

    #[test]
    fn test_constant_and_empty_input() {
        let bins = histogram(&[5.0, 5.0, 5.0], 4, BinScale::Count);
        assert_eq!(bins.len(), 4);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 3);
        assert!(histogram(&[], 10, BinScale::Count).is_empty());
        assert!(histogram(&[f64::NAN], 10, BinScale::Count).is_empty());
    }

    #[test]
    fn test_kde_scaled_area() {
        let values: Vec<f64> = (0..100).map(|i| (i % 17) as f64).collect();
        let curve = gaussian_kde(&values, 400, 100.0);
        assert_eq!(curve.len(), 400);
        let dx = curve[1][0] - curve[0][0];
        let area: f64 = curve.iter().map(|p| p[1] * dx).sum();
        assert!((area - 100.0).abs() < 2.0, "area was {area}");
    }

    #[test]
    fn test_standard_normal_seeded() {
        let a = standard_normal(&mut StdRng::seed_from_u64(42), 800);
        let b = standard_normal(&mut StdRng::seed_from_u64(42), 800);
        assert_eq!(a.len(), 800);
        assert_eq!(a, b);
        let mean = a.iter().sum::<f64>() / a.len() as f64;
        assert!(mean.abs() < 0.15);
    }
}
