use share_core::Series;

/// One histogram bin, `[lo, hi)` (the last bin also includes `hi`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub lo: f64,
    pub hi: f64,
    pub count: usize,
    /// `count / (total * width)`; bars of a histogram integrate to 1.
    pub density: f64,
}

/// Equal-width density histogram.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Histogram {
    bins: Vec<Bin>,
}

impl Histogram {
    /// Bin `series` into `bins` equal-width buckets.
    ///
    /// With `range = None` the bins span the finite data, widened by 0.5 on
    /// each side when every sample is equal. Samples outside an explicit
    /// range and non-finite samples are dropped.
    pub fn compute(series: &Series, bins: usize, range: Option<(f64, f64)>) -> Self {
        if bins == 0 {
            return Self::default();
        }

        let Some((lo, hi)) = range.or_else(|| series.min_max()) else {
            return Self::default();
        };
        let (lo, hi) = if lo < hi { (lo, hi) } else { (lo - 0.5, lo + 0.5) };

        let width = (hi - lo) / bins as f64;
        let mut counts = vec![0usize; bins];
        for &v in series.samples().iter().filter(|v| (lo..=hi).contains(*v)) {
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        let total: usize = counts.iter().sum();
        let norm = if total == 0 { 0.0 } else { 1.0 / (total as f64 * width) };
        let edge = |i: usize| if i == bins { hi } else { lo + width * i as f64 };

        Self {
            bins: counts
                .into_iter()
                .enumerate()
                .map(|(i, count)| Bin {
                    lo: edge(i),
                    hi: edge(i + 1),
                    count,
                    density: count as f64 * norm,
                })
                .collect(),
        }
    }

    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// `(lo, hi)` spanned by the bins.
    pub fn range(&self) -> Option<(f64, f64)> {
        Some((self.bins.first()?.lo, self.bins.last()?.hi))
    }

    /// Tallest bar.
    pub fn max_density(&self) -> f64 {
        self.bins.iter().map(|b| b.density).fold(0.0, f64::max)
    }
}
