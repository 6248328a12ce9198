//! Synthetic offline datasets.
//!
//! `--offline` runs the dashboard without a data host: each category gets a
//! deterministic random-walk dataset whose columns mirror the crawler's series
//! map, including occasional missing observations so the mixed-frequency
//! blanks of the real files show up too.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::{Local, Months, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::data::DataSource;
use crate::domain::{Category, Record};
use crate::error::AppError;

/// Shape of one synthetic series: starting level, monthly drift, noise scale.
struct SeriesShape {
    name: &'static str,
    start: f64,
    drift: f64,
    vol: f64,
}

/// Probability that a given month has no observation for a series.
const GAP_PROB: f64 = 0.04;

pub struct SampleSource {
    end: NaiveDate,
    months: u32,
    seed: u64,
}

impl SampleSource {
    /// Ten years of monthly data ending this month.
    pub fn new(seed: u64) -> Self {
        Self::with_end(seed, Local::now().date_naive())
    }

    pub fn with_end(seed: u64, end: NaiveDate) -> Self {
        Self {
            end,
            months: 120,
            seed,
        }
    }

    fn shapes(category: &Category) -> Vec<SeriesShape> {
        let shape = |name, start, drift, vol| SeriesShape {
            name,
            start,
            drift,
            vol,
        };
        match category.key {
            "Inflation" => vec![
                shape("CPI_headline", 258.0, 0.65, 0.45),
                shape("CPI_core", 264.0, 0.60, 0.30),
                shape("PCE_headline", 110.0, 0.25, 0.18),
                shape("PCE_core", 112.0, 0.22, 0.12),
                shape("PPI_headline", 198.0, 0.55, 0.90),
            ],
            "Labor" => vec![
                shape("NFP_payrolls", 150_000.0, 180.0, 220.0),
                shape("Unemployment_rate", 3.9, 0.0, 0.12),
            ],
            "Rates" => vec![
                shape("Treasury_2Y", 2.5, 0.01, 0.22),
                shape("Treasury_10Y", 2.9, 0.01, 0.18),
            ],
            "Policy" => vec![shape("Fed_funds_rate", 2.4, 0.0, 0.25)],
            "Financial_Conditions" => vec![
                shape("FCI_NFCI", -0.45, 0.0, 0.08),
                shape("FCI_ANFCI", -0.30, 0.0, 0.07),
            ],
            // Unknown category: one generic series so the dashboard still
            // renders something sensible.
            _ => vec![shape("value", 100.0, 0.1, 1.0)],
        }
    }

    fn series_seed(&self, category: &Category) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        category.key.hash(&mut hasher);
        hasher.finish()
    }
}

impl DataSource for SampleSource {
    fn fetch(&self, category: &Category) -> Result<Vec<Record>, AppError> {
        let start = self
            .end
            .checked_sub_months(Months::new(self.months.saturating_sub(1)))
            .ok_or_else(|| AppError::data("Synthetic date range underflow."))?;

        let mut rng = StdRng::seed_from_u64(self.series_seed(category));
        let noise = Normal::new(0.0, 1.0)
            .map_err(|e| AppError::data(format!("Noise distribution error: {e}")))?;

        let shapes = Self::shapes(category);
        let mut levels: Vec<f64> = shapes.iter().map(|s| s.start).collect();

        let mut records = Vec::with_capacity(self.months as usize);
        for i in 0..self.months {
            let date = start
                .checked_add_months(Months::new(i))
                .ok_or_else(|| AppError::data("Synthetic date range overflow."))?;

            let mut fields = Vec::with_capacity(shapes.len());
            for (level, s) in levels.iter_mut().zip(&shapes) {
                *level += s.drift + s.vol * noise.sample(&mut rng);
                let value = if rng.gen_bool(GAP_PROB) {
                    None
                } else {
                    Some((*level * 100.0).round() / 100.0)
                };
                fields.push((s.name.to_string(), value));
            }
            records.push(Record::new(date, fields));
        }

        Ok(records)
    }

    fn describe(&self) -> String {
        format!("synthetic (seed {})", self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CATEGORIES;

    fn fixed_source() -> SampleSource {
        SampleSource::with_end(42, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
    }

    #[test]
    fn generation_is_deterministic_per_category() {
        let source = fixed_source();
        let a = source.fetch(&CATEGORIES[0]).unwrap();
        let b = source.fetch(&CATEGORIES[0]).unwrap();
        assert_eq!(a, b);

        let other = source.fetch(&CATEGORIES[1]).unwrap();
        assert_ne!(a, other);
    }

    #[test]
    fn every_category_gets_a_full_monthly_history() {
        let source = fixed_source();
        for category in &CATEGORIES {
            let records = source.fetch(category).unwrap();
            assert_eq!(records.len(), 120);
            assert!(records.windows(2).all(|w| w[0].date < w[1].date));
            assert!(records[0].field_names().count() >= 1);
        }
    }

    #[test]
    fn inflation_columns_mirror_the_crawler_series() {
        let source = fixed_source();
        let records = source.fetch(&CATEGORIES[0]).unwrap();
        let names: Vec<&str> = records[0].field_names().collect();
        assert_eq!(
            names,
            vec![
                "CPI_headline",
                "CPI_core",
                "PCE_headline",
                "PCE_core",
                "PPI_headline"
            ]
        );
    }

    #[test]
    fn gaps_occur_but_are_rare() {
        let source = fixed_source();
        let records = source.fetch(&CATEGORIES[0]).unwrap();
        let (mut present, mut missing) = (0usize, 0usize);
        for r in &records {
            for (_, v) in r.fields() {
                match v {
                    Some(_) => present += 1,
                    None => missing += 1,
                }
            }
        }
        assert!(missing > 0, "expected at least one synthetic gap");
        assert!(present > missing * 5, "gaps should stay rare");
    }
}
