use std::collections::{BTreeMap, BTreeSet};

use super::model::{Dimension, Record, SalesTable};

// ---------------------------------------------------------------------------
// Filter predicate: which values are selected per dimension
// ---------------------------------------------------------------------------

/// Per-dimension selection state: maps dimension → set of selected values.
/// If a dimension is absent or its set is empty, it means "no filter" (show all).
pub type FilterState = BTreeMap<Dimension, BTreeSet<String>>;

/// Whether a record passes every active dimension filter.
pub fn matches(record: &Record, filters: &FilterState) -> bool {
    filters
        .iter()
        .filter(|(_, selected)| !selected.is_empty())
        .all(|(dim, selected)| selected.contains(dim.value_of(record)))
}

// ---------------------------------------------------------------------------
// SalesView – a filtered, borrowed subset of the table
// ---------------------------------------------------------------------------

/// Records of a [`SalesTable`] matching a [`FilterState`], in source order.
#[derive(Debug, Clone)]
pub struct SalesView<'a> {
    rows: Vec<&'a Record>,
}

impl<'a> SalesView<'a> {
    /// View over every record of the table.
    pub fn all(table: &'a SalesTable) -> Self {
        SalesView {
            rows: table.records().iter().collect(),
        }
    }

    /// Filter the full table. Always starts from the unfiltered records.
    pub fn filtered(table: &'a SalesTable, filters: &FilterState) -> Self {
        SalesView {
            rows: table
                .records()
                .iter()
                .filter(|r| matches(r, filters))
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.rows.iter().copied()
    }

    /// First row in source order.
    pub fn first(&self) -> Option<&'a Record> {
        self.rows.first().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::small_table;

    fn select(dim: Dimension, values: &[&str]) -> FilterState {
        let mut filters = FilterState::new();
        filters.insert(dim, values.iter().map(|v| v.to_string()).collect());
        filters
    }

    #[test]
    fn empty_selection_means_no_filter() {
        let table = small_table();
        let mut filters = FilterState::new();
        filters.insert(Dimension::City, BTreeSet::new());
        assert_eq!(SalesView::filtered(&table, &filters).len(), table.len());
    }

    #[test]
    fn filters_combine_across_dimensions() {
        let table = small_table();
        let mut filters = select(Dimension::City, &["Yangon", "Mandalay"]);
        filters.insert(Dimension::Gender, ["Female".to_string()].into());
        let view = SalesView::filtered(&table, &filters);
        let ids: Vec<&str> = view.iter().map(|r| r.invoice_id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);
    }

    #[test]
    fn city_and_its_complement_partition_the_table() {
        let table = small_table();
        let others: Vec<String> = table
            .unique_values(Dimension::City)
            .into_iter()
            .filter(|c| c != "Yangon")
            .collect();
        let others: Vec<&str> = others.iter().map(String::as_str).collect();

        let yangon = SalesView::filtered(&table, &select(Dimension::City, &["Yangon"]));
        let rest = SalesView::filtered(&table, &select(Dimension::City, &others));

        assert_eq!(yangon.len() + rest.len(), table.len());
        for r in yangon.iter() {
            assert!(!rest.iter().any(|o| std::ptr::eq(o, r)));
        }
        let mut union: Vec<*const Record> = yangon
            .iter()
            .chain(rest.iter())
            .map(|r| r as *const Record)
            .collect();
        let mut original: Vec<*const Record> =
            table.records().iter().map(|r| r as *const Record).collect();
        union.sort();
        original.sort();
        assert_eq!(union, original);
    }

    #[test]
    fn unknown_value_yields_empty_view() {
        let table = small_table();
        let view = SalesView::filtered(&table, &select(Dimension::Gender, &["Other"]));
        assert!(view.is_empty());
        assert!(view.first().is_none());
    }
}
