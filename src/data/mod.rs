/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  positional columns → SalesTable
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ SalesTable │  Vec<Record>, source order, read-only
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  city / gender membership → SalesView
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  indicators and grouped series
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
