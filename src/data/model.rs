use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Record – one transaction line
// ---------------------------------------------------------------------------

/// A single line item of the sales dataset.
///
/// Several records may share an `invoice_id`; the id is not a primary key.
/// Columns no indicator reads keep the raw cell text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub invoice_id: String,
    pub branch: String,
    pub city: String,
    pub customer_type: String,
    pub gender: String,
    pub product_line: String,
    pub unit_price: String,
    pub quantity: String,
    pub tax: String,
    pub total: f64,
    pub date: NaiveDate,
    /// Time of day, carried through untouched.
    pub time: String,
    pub payment: String,
    pub cogs: String,
    pub gross_margin: String,
    pub gross_income: String,
    pub rating: f64,
}

// ---------------------------------------------------------------------------
// Dimension – categorical columns used for filtering and colouring
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    City,
    Gender,
    ProductLine,
}

impl Dimension {
    /// Dimensions exposed as filter controls, in display order.
    pub const FILTERABLE: [Dimension; 2] = [Dimension::City, Dimension::Gender];

    /// The record's value for this dimension.
    pub fn value_of<'r>(&self, record: &'r Record) -> &'r str {
        match self {
            Dimension::City => &record.city,
            Dimension::Gender => &record.gender,
            Dimension::ProductLine => &record.product_line,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Dimension::City => "City",
            Dimension::Gender => "Gender",
            Dimension::ProductLine => "Product line",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// SalesTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full table, in source order. Never mutated after loading.
#[derive(Debug, Clone)]
pub struct SalesTable {
    records: Vec<Record>,
}

impl SalesTable {
    pub fn new(records: Vec<Record>) -> Self {
        SalesTable { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted distinct values present in the table for a dimension.
    pub fn unique_values(&self, dimension: Dimension) -> BTreeSet<String> {
        self.records
            .iter()
            .map(|r| dimension.value_of(r).to_string())
            .collect()
    }

    /// Distinct values in order of first appearance.
    pub fn values_in_source_order(&self, dimension: Dimension) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.records
            .iter()
            .map(|r| dimension.value_of(r))
            .filter(|v| seen.insert(*v))
            .map(str::to_string)
            .collect()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::small_table;
    use super::*;

    #[test]
    fn unique_values_are_sorted_and_distinct() {
        let table = small_table();
        let cities: Vec<String> = table.unique_values(Dimension::City).into_iter().collect();
        assert_eq!(cities, vec!["Mandalay", "Naypyitaw", "Yangon"]);
    }

    #[test]
    fn source_order_keeps_first_appearance() {
        let table = small_table();
        assert_eq!(
            table.values_in_source_order(Dimension::City),
            vec!["Yangon", "Mandalay", "Naypyitaw"]
        );
    }
}
