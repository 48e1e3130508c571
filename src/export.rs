use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::color::{to_hex, CategoryColors};
use crate::dashboard::Dashboard;
use crate::data::filter::FilterState;
use crate::data::model::Dimension;

/// JSON document written by "Export summary…".
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub source: String,
    pub filters: &'a FilterState,
    pub dashboard: &'a Dashboard,
    /// dimension → value → `#RRGGBB`
    pub colors: BTreeMap<Dimension, BTreeMap<String, String>>,
}

impl<'a> Snapshot<'a> {
    pub fn new(
        source: &Path,
        filters: &'a FilterState,
        dashboard: &'a Dashboard,
        colors: &CategoryColors,
    ) -> Self {
        let colors: BTreeMap<_, _> = [Dimension::City, Dimension::Gender, Dimension::ProductLine]
            .into_iter()
            .map(|dim| {
                let entries: BTreeMap<String, String> = colors
                    .get(dim)
                    .legend_entries()
                    .into_iter()
                    .map(|(value, c)| (value, to_hex(c)))
                    .collect();
                (dim, entries)
            })
            .collect();
        Snapshot {
            source: source.display().to_string(),
            filters,
            dashboard,
            colors,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serializing dashboard snapshot")
    }
}

pub fn write_snapshot(path: &Path, snapshot: &Snapshot<'_>) -> Result<()> {
    let json = snapshot.to_json()?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Exported dashboard snapshot to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::SalesView;
    use crate::data::model::fixtures::small_table;

    #[test]
    fn snapshot_json_shape() {
        let table = small_table();
        let mut filters = FilterState::new();
        filters.insert(Dimension::City, ["Yangon".to_string()].into());
        let dashboard = Dashboard::compute(&SalesView::filtered(&table, &filters));
        let colors = CategoryColors::for_table(&table);

        let snap = Snapshot::new(Path::new("sales.csv"), &filters, &dashboard, &colors);
        let value: serde_json::Value = serde_json::from_str(&snap.to_json().unwrap()).unwrap();

        assert_eq!(value["source"], "sales.csv");
        assert_eq!(value["filters"]["city"][0], "Yangon");
        assert_eq!(value["dashboard"]["purchases"]["count"], 1);
        assert_eq!(value["dashboard"]["average_rating"], 5.75);
        assert_eq!(value["dashboard"]["weekly_totals"][0]["week_start"], "2018-12-31");
        assert_eq!(value["colors"]["gender"]["Male"], "#4A90E2");
    }
}
