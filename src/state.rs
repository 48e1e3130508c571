use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::color::CategoryColors;
use crate::dashboard::Dashboard;
use crate::data::filter::{FilterState, SalesView};
use crate::data::model::{Dimension, SalesTable};

// ---------------------------------------------------------------------------
// Filter events
// ---------------------------------------------------------------------------

/// A change to one of the filter controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEvent {
    /// Add the value to the selection, or remove it if already selected.
    Toggle { dimension: Dimension, value: String },
    /// Drop the selection for one dimension ("all").
    Clear(Dimension),
    ClearAll,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded table. Replaced wholesale, never edited.
    pub table: SalesTable,

    /// Where `table` came from.
    pub source: PathBuf,

    /// Per-dimension filter selections.
    pub filters: FilterState,

    /// Filter options, derived from the table.
    pub options: Vec<(Dimension, BTreeSet<String>)>,

    /// Outputs for the current selection.
    pub dashboard: Dashboard,

    pub colors: CategoryColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(table: SalesTable, source: PathBuf) -> Self {
        let dashboard = Dashboard::compute(&SalesView::all(&table));
        let mut state = Self {
            options: Vec::new(),
            colors: CategoryColors::for_table(&table),
            table,
            source,
            filters: FilterState::default(),
            dashboard,
            status_message: None,
        };
        state.rebuild_options();
        state
    }

    /// Ingest a newly loaded table, reset filters and colours.
    pub fn set_table(&mut self, table: SalesTable, source: &Path) {
        self.colors = CategoryColors::for_table(&table);
        self.table = table;
        self.source = source.to_path_buf();
        self.filters.clear();
        self.rebuild_options();
        self.status_message = None;
        self.recompute();
    }

    fn rebuild_options(&mut self) {
        self.options = Dimension::FILTERABLE
            .iter()
            .map(|dim| (*dim, self.table.unique_values(*dim)))
            .collect();
    }

    /// Apply a filter change and recompute every output before returning.
    pub fn handle(&mut self, event: FilterEvent) {
        match event {
            FilterEvent::Toggle { dimension, value } => {
                let selected = self.filters.entry(dimension).or_default();
                if !selected.remove(&value) {
                    selected.insert(value);
                }
                if selected.is_empty() {
                    self.filters.remove(&dimension);
                }
            }
            FilterEvent::Clear(dimension) => {
                self.filters.remove(&dimension);
            }
            FilterEvent::ClearAll => self.filters.clear(),
        }
        self.recompute();
    }

    /// Rebuild the dashboard from the unfiltered table.
    pub fn recompute(&mut self) {
        let view = SalesView::filtered(&self.table, &self.filters);
        log::debug!(
            "Recomputing dashboard: {} of {} rows, filters {:?}",
            view.len(),
            self.table.len(),
            self.filters
        );
        self.dashboard = Dashboard::compute(&view);
    }

    pub fn is_selected(&self, dimension: Dimension, value: &str) -> bool {
        self.filters
            .get(&dimension)
            .is_some_and(|s| s.contains(value))
    }

    /// Number of selected values for a dimension; zero means unfiltered.
    pub fn selected_count(&self, dimension: Dimension) -> usize {
        self.filters.get(&dimension).map_or(0, BTreeSet::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::small_table;

    fn state() -> AppState {
        AppState::new(small_table(), PathBuf::from("fixture.csv"))
    }

    fn toggle(dimension: Dimension, value: &str) -> FilterEvent {
        FilterEvent::Toggle {
            dimension,
            value: value.to_string(),
        }
    }

    #[test]
    fn starts_unfiltered_with_options_from_table() {
        let s = state();
        assert_eq!(s.dashboard.rows, 5);
        let (dim, cities) = &s.options[0];
        assert_eq!(*dim, Dimension::City);
        assert_eq!(cities.len(), 3);
        assert_eq!(s.options[1].1.len(), 2);
    }

    #[test]
    fn toggle_recomputes_synchronously() {
        let mut s = state();
        s.handle(toggle(Dimension::City, "Yangon"));
        assert!(s.is_selected(Dimension::City, "Yangon"));
        assert_eq!(s.dashboard.rows, 2);
        assert_eq!(s.dashboard.average_rating, Some(5.75));

        s.handle(toggle(Dimension::City, "Mandalay"));
        assert_eq!(s.selected_count(Dimension::City), 2);
        assert_eq!(s.dashboard.rows, 4);

        s.handle(toggle(Dimension::Gender, "Male"));
        assert_eq!(s.dashboard.rows, 2);
    }

    #[test]
    fn deselecting_last_value_means_no_filter() {
        let mut s = state();
        s.handle(toggle(Dimension::Gender, "Female"));
        assert_eq!(s.dashboard.rows, 3);
        s.handle(toggle(Dimension::Gender, "Female"));
        assert_eq!(s.selected_count(Dimension::Gender), 0);
        assert_eq!(s.dashboard.rows, 5);
    }

    #[test]
    fn clear_events() {
        let mut s = state();
        s.handle(toggle(Dimension::City, "Naypyitaw"));
        s.handle(toggle(Dimension::Gender, "Male"));
        assert!(s.dashboard.is_empty());
        assert_eq!(s.dashboard.purchases.delta, None);

        s.handle(FilterEvent::Clear(Dimension::Gender));
        assert_eq!(s.dashboard.rows, 1);
        s.handle(FilterEvent::ClearAll);
        assert_eq!(s.dashboard.rows, 5);
    }

    #[test]
    fn set_table_resets_filters() {
        let mut s = state();
        s.handle(toggle(Dimension::City, "Yangon"));
        s.set_table(small_table(), Path::new("other.csv"));
        assert!(s.filters.is_empty());
        assert_eq!(s.dashboard.rows, 5);
        assert_eq!(s.source, PathBuf::from("other.csv"));
    }
}
