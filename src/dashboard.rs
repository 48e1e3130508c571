use serde::Serialize;

use crate::data::aggregate::{
    self, CityGenderCount, ProductMixCount, ProductShare, WeeklyTotal,
};
use crate::data::filter::SalesView;

/// Headline purchase count with its relative delta.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseIndicator {
    pub count: usize,
    /// `total` of the first row of the view.
    pub reference: Option<f64>,
    /// `None` renders as "no data".
    pub delta: Option<f64>,
}

/// Everything the view layer draws for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub rows: usize,
    pub purchases: PurchaseIndicator,
    pub average_rating: Option<f64>,
    pub by_city_gender: Vec<CityGenderCount>,
    pub product_mix: Vec<ProductMixCount>,
    pub product_share: Vec<ProductShare>,
    pub weekly_totals: Vec<WeeklyTotal>,
}

impl Dashboard {
    /// Run every indicator and grouped query over `view`.
    pub fn compute(view: &SalesView<'_>) -> Self {
        let count = aggregate::count_distinct_invoices(view);
        let product_mix = aggregate::product_mix_by_city_gender_line(view);
        Dashboard {
            rows: view.len(),
            purchases: PurchaseIndicator {
                count,
                reference: view.first().map(|r| r.total),
                delta: aggregate::purchases_delta(count as f64, view),
            },
            average_rating: aggregate::average_rating(view),
            by_city_gender: aggregate::purchases_by_city_and_gender(view),
            product_share: aggregate::product_line_share(&product_mix),
            product_mix,
            weekly_totals: aggregate::weekly_totals_by_city(view),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::FilterState;
    use crate::data::model::fixtures::small_table;
    use crate::data::model::Dimension;

    #[test]
    fn compute_over_full_table() {
        let table = small_table();
        let d = Dashboard::compute(&SalesView::all(&table));
        assert_eq!(d.rows, 5);
        assert_eq!(d.purchases.count, 4);
        assert_eq!(d.purchases.reference, Some(100.0));
        assert_eq!(d.purchases.delta, Some((4.0 - 100.0) / 100.0));
        assert_eq!(d.average_rating, Some(6.96));
        assert_eq!(d.product_share.len(), 3);
        assert!(!d.weekly_totals.is_empty());
    }

    #[test]
    fn empty_view_degrades_to_no_data() {
        let table = small_table();
        let mut filters = FilterState::new();
        filters.insert(Dimension::City, ["Yangon".to_string()].into());
        filters.insert(Dimension::Gender, ["Other".to_string()].into());
        let d = Dashboard::compute(&SalesView::filtered(&table, &filters));
        assert!(d.is_empty());
        assert_eq!(d.purchases.count, 0);
        assert_eq!(d.purchases.delta, None);
        assert_eq!(d.average_rating, None);
        assert!(d.by_city_gender.is_empty());
        assert!(d.product_share.is_empty());
        assert!(d.weekly_totals.is_empty());
    }
}
