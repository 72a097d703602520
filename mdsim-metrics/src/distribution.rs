//! Empirical distributions over queue-length categories.
//!
//! Categories are the integers `0..num_categories`. A [`Pmf`] holds relative
//! frequencies, a [`Cdf`] their prefix sums, and [`ks_statistic`] the largest
//! absolute gap between two CDFs over the same categories.

use crate::error::StatsError;
use crate::event_log::EventLog;
use serde::Serialize;

/// Category count large enough for every value in every given log: one more
/// than the largest value observed in any of them.
pub fn num_categories(logs: &[&EventLog]) -> usize {
    logs.iter()
        .filter_map(|log| log.max())
        .max()
        .map_or(1, |max| max + 1)
}

/// Relative frequency of each category in one log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pmf {
    frequencies: Vec<f64>,
    total: usize,
}

impl Pmf {
    /// Count each category in `log` and divide by the number of entries.
    ///
    /// Fails on an empty log, and on any value outside `0..num_categories`.
    pub fn build(log: &EventLog, num_categories: usize) -> Result<Self, StatsError> {
        if log.is_empty() {
            return Err(StatsError::EmptyLog {
                log: log.name().to_string(),
            });
        }

        let mut counts = vec![0u64; num_categories];
        for &value in log.values() {
            let slot = counts.get_mut(value).ok_or_else(|| StatsError::OutOfRange {
                log: log.name().to_string(),
                value,
                categories: num_categories,
            })?;
            *slot += 1;
        }

        let total = log.len();
        let frequencies = counts
            .into_iter()
            .map(|count| count as f64 / total as f64)
            .collect();
        Ok(Self { frequencies, total })
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Number of log entries the frequencies were computed from
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of categories
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }
}

/// Cumulative distribution: prefix sums of a [`Pmf`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cdf {
    values: Vec<f64>,
}

impl Cdf {
    pub fn from_pmf(pmf: &Pmf) -> Self {
        let values = pmf
            .frequencies()
            .iter()
            .scan(0.0, |acc, f| {
                *acc += f;
                Some(*acc)
            })
            .collect();
        Self { values }
    }

    pub fn build(log: &EventLog, num_categories: usize) -> Result<Self, StatsError> {
        Pmf::build(log, num_categories).map(|pmf| Self::from_pmf(&pmf))
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Cumulative mass at the last category (1.0 up to rounding)
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Kolmogorov-Smirnov statistic: `max_i |a[i] - b[i]|`.
pub fn ks_statistic(a: &Cdf, b: &Cdf) -> Result<f64, StatsError> {
    if a.len() != b.len() {
        return Err(StatsError::CategoryMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(a.values()
        .iter()
        .zip(b.values())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max))
}

/// Probability of a KS statistic at least `d` for a sample of size `n`.
///
/// Uses the asymptotic Kolmogorov distribution with Stephens' finite-sample
/// correction. Returns 1.0 for an empty sample.
pub fn ks_p_value(d: f64, n: usize) -> f64 {
    if n == 0 || !d.is_finite() || d <= 0.0 {
        return 1.0;
    }
    let en = (n as f64).sqrt();
    let lambda = (en + 0.12 + 0.11 / en) * d;
    kolmogorov_survival(lambda).clamp(0.0, 1.0)
}

/// `Q(λ) = 2 Σ_{j≥1} (-1)^{j-1} exp(-2 j² λ²)`
fn kolmogorov_survival(lambda: f64) -> f64 {
    const EPS_TERM: f64 = 1e-3;
    const EPS_SUM: f64 = 1e-8;

    let a2 = -2.0 * lambda * lambda;
    let mut fac = 2.0;
    let mut sum = 0.0;
    let mut previous = 0.0;
    for j in 1..=100 {
        let j = j as f64;
        let term = fac * (a2 * j * j).exp();
        sum += term;
        if term.abs() <= EPS_TERM * previous || term.abs() <= EPS_SUM * sum {
            return sum;
        }
        fac = -fac;
        previous = term.abs();
    }
    // The series did not converge: λ is tiny and the tail probability is 1.
    1.0
}

/// Comparison of the queue lengths seen by tagged arrivals against all arrivals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionReport {
    pub categories: usize,
    pub all_count: usize,
    pub tagged_count: usize,
    pub pmf_all: Vec<f64>,
    pub pmf_tagged: Vec<f64>,
    pub cdf_all: Vec<f64>,
    pub cdf_tagged: Vec<f64>,
    pub ks_statistic: f64,
    pub p_value: f64,
}

impl DistributionReport {
    /// Build both distributions over a shared category range and compare them.
    pub fn compare(all: &EventLog, tagged: &EventLog) -> Result<Self, StatsError> {
        let categories = num_categories(&[all, tagged]);
        let pmf_all = Pmf::build(all, categories)?;
        let pmf_tagged = Pmf::build(tagged, categories)?;
        let cdf_all = Cdf::from_pmf(&pmf_all);
        let cdf_tagged = Cdf::from_pmf(&pmf_tagged);
        let ks = ks_statistic(&cdf_all, &cdf_tagged)?;

        Ok(Self {
            categories,
            all_count: pmf_all.total(),
            tagged_count: pmf_tagged.total(),
            p_value: ks_p_value(ks, pmf_tagged.total()),
            pmf_all: pmf_all.frequencies,
            pmf_tagged: pmf_tagged.frequencies,
            cdf_all: cdf_all.values,
            cdf_tagged: cdf_tagged.values,
            ks_statistic: ks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn log(values: &[usize]) -> EventLog {
        EventLog::from_values("test", values.to_vec())
    }

    #[test]
    fn pmf_counts_relative_frequencies() {
        let pmf = Pmf::build(&log(&[0, 1, 1, 3]), 5).unwrap();
        assert_eq!(pmf.frequencies(), &[0.25, 0.5, 0.0, 0.25, 0.0]);
        assert_eq!(pmf.total(), 4);
        assert_eq!(pmf.len(), 5);
    }

    #[test]
    fn pmf_sums_to_one() {
        let values: Vec<usize> = (0..997).map(|i| (i * 7919) % 13).collect();
        let pmf = Pmf::build(&log(&values), 13).unwrap();
        let sum: f64 = pmf.frequencies().iter().sum();
        assert!((sum - 1.0).abs() < EPS);
        assert!(pmf.frequencies().iter().all(|f| *f >= 0.0));
    }

    #[test]
    fn empty_log_is_an_error() {
        let err = Pmf::build(&EventLog::from_values("tagged", vec![]), 3).unwrap_err();
        assert!(matches!(err, StatsError::EmptyLog { ref log } if log == "tagged"));
    }

    #[test]
    fn out_of_range_value_is_an_error() {
        let err = Pmf::build(&log(&[0, 2, 5]), 5).unwrap_err();
        assert!(matches!(
            err,
            StatsError::OutOfRange { value: 5, categories: 5, .. }
        ));
    }

    #[test]
    fn cdf_is_non_decreasing_and_ends_at_one() {
        let values: Vec<usize> = (0..500).map(|i| (i * i) % 17).collect();
        let cdf = Cdf::build(&log(&values), 17).unwrap();
        assert!(cdf.values().windows(2).all(|w| w[1] >= w[0]));
        assert!((cdf.last().unwrap() - 1.0).abs() < EPS);
    }

    #[test]
    fn cdf_of_single_category() {
        let cdf = Cdf::build(&log(&[0, 0, 0]), 1).unwrap();
        assert_eq!(cdf.values(), &[1.0]);
    }

    #[test]
    fn ks_is_symmetric_and_zero_on_itself() {
        let a = Cdf::build(&log(&[0, 0, 1, 2, 3, 3]), 4).unwrap();
        let b = Cdf::build(&log(&[1, 2, 2, 3]), 4).unwrap();

        assert_eq!(ks_statistic(&a, &a).unwrap(), 0.0);
        assert_eq!(ks_statistic(&a, &b).unwrap(), ks_statistic(&b, &a).unwrap());
        // a = [1/3, 1/2, 2/3, 1], b = [0, 1/4, 3/4, 1]
        assert!((ks_statistic(&a, &b).unwrap() - 1.0 / 3.0).abs() < EPS);
    }

    #[test]
    fn ks_requires_matching_categories() {
        let a = Cdf::build(&log(&[0, 1]), 2).unwrap();
        let b = Cdf::build(&log(&[0, 1]), 3).unwrap();
        assert!(matches!(
            ks_statistic(&a, &b),
            Err(StatsError::CategoryMismatch { left: 2, right: 3 })
        ));
    }

    #[test]
    fn num_categories_covers_every_log() {
        let all = log(&[0, 1, 2]);
        let tagged = log(&[4]);
        assert_eq!(num_categories(&[&all, &tagged]), 5);
        assert_eq!(num_categories(&[&all]), 3);
        assert_eq!(num_categories(&[&log(&[])]), 1);
    }

    #[test]
    fn p_value_behaviour() {
        assert_eq!(ks_p_value(0.0, 100), 1.0);
        assert_eq!(ks_p_value(0.3, 0), 1.0);
        assert!(ks_p_value(1.0, 100) < 1e-6);

        // Q(1.36) is the classic 5% critical value.
        let p = ks_p_value(1.36 / 100.0, 10_000);
        assert!((0.045..0.055).contains(&p), "p = {p}");

        let ps: Vec<f64> = [0.01, 0.05, 0.1, 0.2].iter().map(|d| ks_p_value(*d, 400)).collect();
        assert!(ps.windows(2).all(|w| w[1] <= w[0]));
        assert!(ps.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn report_uses_shared_category_range() {
        // The tagged maximum exceeds the all-arrivals maximum here; no mass may be lost.
        let all = EventLog::from_values("all", vec![0, 0, 1, 1]);
        let tagged = EventLog::from_values("tagged", vec![0, 3]);
        let report = DistributionReport::compare(&all, &tagged).unwrap();

        assert_eq!(report.categories, 4);
        assert_eq!(report.pmf_tagged, vec![0.5, 0.0, 0.0, 0.5]);
        assert!((report.cdf_tagged.last().unwrap() - 1.0).abs() < EPS);
        assert!((report.ks_statistic - 0.5).abs() < EPS);
        assert_eq!(report.all_count, 4);
        assert_eq!(report.tagged_count, 2);
    }

    #[test]
    fn report_rejects_empty_tagged_log() {
        let all = EventLog::from_values("all", vec![0, 1]);
        let tagged = EventLog::from_values("tagged", vec![]);
        assert!(matches!(
            DistributionReport::compare(&all, &tagged),
            Err(StatsError::EmptyLog { .. })
        ));
    }
}
