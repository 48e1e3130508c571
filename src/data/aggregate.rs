use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use super::filter::SalesView;

// ---------------------------------------------------------------------------
// Result rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityGenderCount {
    pub city: String,
    pub gender: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductMixCount {
    pub city: String,
    pub gender: String,
    pub product_line: String,
    pub count: usize,
}

/// Marginal product-line distribution, as drawn by the donut chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductShare {
    pub product_line: String,
    pub count: usize,
    /// Fraction of all counted rows, in `0.0..=1.0`.
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyTotal {
    pub iso_year: i32,
    pub iso_week: u32,
    pub city: String,
    pub total: f64,
    /// Monday of the ISO week.
    pub week_start: NaiveDate,
}

// ---------------------------------------------------------------------------
// Indicators
// ---------------------------------------------------------------------------

/// Number of unique invoice ids in the view.
pub fn count_distinct_invoices(view: &SalesView<'_>) -> usize {
    view.iter()
        .map(|r| r.invoice_id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Mean rating rounded to two decimals, `None` for an empty view.
pub fn average_rating(view: &SalesView<'_>) -> Option<f64> {
    if view.is_empty() {
        return None;
    }
    let sum: f64 = view.iter().map(|r| r.rating).sum();
    Some(round2(sum / view.len() as f64))
}

/// Relative change of `value` against the `total` of the view's first row.
///
/// `None` when the view is empty or that reference total is zero.
pub fn purchases_delta(value: f64, view: &SalesView<'_>) -> Option<f64> {
    let reference = view.first()?.total;
    if reference == 0.0 {
        return None;
    }
    Some((value - reference) / reference)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Grouped aggregates
// ---------------------------------------------------------------------------

/// Row count per `(city, gender)`, sorted by key.
///
/// Counts rows, not distinct invoices.
pub fn purchases_by_city_and_gender(view: &SalesView<'_>) -> Vec<CityGenderCount> {
    let mut groups: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for r in view.iter() {
        *groups.entry((r.city.as_str(), r.gender.as_str())).or_default() += 1;
    }
    groups
        .into_iter()
        .map(|((city, gender), count)| CityGenderCount {
            city: city.to_string(),
            gender: gender.to_string(),
            count,
        })
        .collect()
}

/// Row count per `(city, gender, product_line)`, sorted by key.
pub fn product_mix_by_city_gender_line(view: &SalesView<'_>) -> Vec<ProductMixCount> {
    let mut groups: BTreeMap<(&str, &str, &str), usize> = BTreeMap::new();
    for r in view.iter() {
        *groups
            .entry((r.city.as_str(), r.gender.as_str(), r.product_line.as_str()))
            .or_default() += 1;
    }
    groups
        .into_iter()
        .map(|((city, gender, product_line), count)| ProductMixCount {
            city: city.to_string(),
            gender: gender.to_string(),
            product_line: product_line.to_string(),
            count,
        })
        .collect()
}

/// Collapse the three-way mix to its product-line marginal.
pub fn product_line_share(mix: &[ProductMixCount]) -> Vec<ProductShare> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for m in mix {
        *counts.entry(m.product_line.as_str()).or_default() += m.count;
    }
    let grand: usize = counts.values().sum();
    counts
        .into_iter()
        .map(|(product_line, count)| ProductShare {
            product_line: product_line.to_string(),
            count,
            share: if grand == 0 {
                0.0
            } else {
                count as f64 / grand as f64
            },
        })
        .collect()
}

/// Sum of `total` per `(ISO year, ISO week, city)`, sorted by key.
pub fn weekly_totals_by_city(view: &SalesView<'_>) -> Vec<WeeklyTotal> {
    let mut groups: BTreeMap<(i32, u32, &str), f64> = BTreeMap::new();
    for r in view.iter() {
        let week = r.date.iso_week();
        *groups
            .entry((week.year(), week.week(), r.city.as_str()))
            .or_default() += r.total;
    }
    groups
        .into_iter()
        .filter_map(|((iso_year, iso_week, city), total)| {
            let week_start = NaiveDate::from_isoywd_opt(iso_year, iso_week, Weekday::Mon)?;
            Some(WeeklyTotal {
                iso_year,
                iso_week,
                city: city.to_string(),
                total,
                week_start,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::FilterState;
    use crate::data::model::fixtures::{record, small_table};
    use crate::data::model::{Dimension, SalesTable};

    fn city(value: &str) -> FilterState {
        let mut f = FilterState::new();
        f.insert(Dimension::City, [value.to_string()].into());
        f
    }

    #[test]
    fn distinct_invoices_not_rows() {
        let table = small_table();
        let view = SalesView::all(&table);
        assert_eq!(view.len(), 5);
        assert_eq!(count_distinct_invoices(&view), 4);
    }

    #[test]
    fn average_rating_rounds_and_handles_empty() {
        let table = small_table();
        let yangon = SalesView::filtered(&table, &city("Yangon"));
        assert_eq!(average_rating(&yangon), Some(5.75));

        let all = SalesView::all(&table);
        // (7.5 + 9.0 + 4.0 + 6.1 + 8.2) / 5 = 6.96
        assert_eq!(average_rating(&all), Some(6.96));

        let none = SalesView::filtered(&table, &city("Nowhere"));
        assert_eq!(average_rating(&none), None);
        assert_eq!(count_distinct_invoices(&none), 0);
    }

    #[test]
    fn delta_uses_first_row_total() {
        let table = small_table();
        let view = SalesView::filtered(&table, &city("Mandalay"));
        // first Mandalay row has total 50
        let delta = purchases_delta(2.0, &view).unwrap();
        assert!((delta - (2.0 - 50.0) / 50.0).abs() < 1e-12);
    }

    #[test]
    fn delta_undefined_on_empty_or_zero_reference() {
        let table = small_table();
        let none = SalesView::filtered(&table, &city("Nowhere"));
        assert_eq!(purchases_delta(0.0, &none), None);

        let zero = SalesTable::new(vec![record("Z", "Yangon", "Male", "X", 0.0, 5.0, (2019, 3, 1))]);
        assert_eq!(purchases_delta(1.0, &SalesView::all(&zero)), None);
    }

    #[test]
    fn purchases_count_rows_per_city_gender() {
        let table = small_table();
        let groups = purchases_by_city_and_gender(&SalesView::all(&table));
        let flat: Vec<(&str, &str, usize)> = groups
            .iter()
            .map(|g| (g.city.as_str(), g.gender.as_str(), g.count))
            .collect();
        assert_eq!(
            flat,
            vec![
                ("Mandalay", "Female", 1),
                ("Mandalay", "Male", 1),
                ("Naypyitaw", "Female", 1),
                ("Yangon", "Female", 1),
                ("Yangon", "Male", 1),
            ]
        );
    }

    #[test]
    fn product_share_is_marginal_over_product_line() {
        let table = small_table();
        let mix = product_mix_by_city_gender_line(&SalesView::all(&table));
        assert_eq!(mix.len(), 5);

        let share = product_line_share(&mix);
        let health = share
            .iter()
            .find(|s| s.product_line == "Health and beauty")
            .unwrap();
        assert_eq!(health.count, 2);
        assert!((health.share - 0.4).abs() < 1e-12);
        let total: f64 = share.iter().map(|s| s.share).sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert!(product_line_share(&[]).is_empty());
    }

    #[test]
    fn weekly_totals_conserve_grand_total() {
        let table = small_table();
        let view = SalesView::all(&table);
        let weekly = weekly_totals_by_city(&view);
        let grouped: f64 = weekly.iter().map(|w| w.total).sum();
        let direct: f64 = view.iter().map(|r| r.total).sum();
        assert!((grouped - direct).abs() < 1e-9);
    }

    #[test]
    fn year_boundary_follows_iso_weeks() {
        let table = small_table();
        let weekly = weekly_totals_by_city(&SalesView::filtered(&table, &city("Naypyitaw")));
        // 2018-12-31 is a Monday belonging to week 1 of 2019
        assert_eq!(weekly.len(), 1);
        let w = &weekly[0];
        assert_eq!((w.iso_year, w.iso_week), (2019, 1));
        assert_eq!(w.week_start, NaiveDate::from_ymd_opt(2018, 12, 31).unwrap());

        // 2019-01-01 (Mandalay) falls in the same ISO week
        let mandalay = weekly_totals_by_city(&SalesView::filtered(&table, &city("Mandalay")));
        assert_eq!((mandalay[0].iso_year, mandalay[0].iso_week), (2019, 1));
        assert_eq!((mandalay[1].iso_year, mandalay[1].iso_week), (2019, 2));
    }

    #[test]
    fn weekly_groups_sorted_by_week_then_city() {
        let table = small_table();
        let weekly = weekly_totals_by_city(&SalesView::all(&table));
        let keys: Vec<(i32, u32, &str)> = weekly
            .iter()
            .map(|w| (w.iso_year, w.iso_week, w.city.as_str()))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }
}
