/// Data layer: loading, filtering, reshaping and ranking.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  text rows → IndexedTable (year → cells)
///   └──────────┘
///        │            ┌──────────┐
///        ├──────────▶ │ classify  │  headers → RoleColumnSet
///        ▼            └──────────┘
///   ┌──────────┐
///   │  filter   │  FilterSelection → FilteredTable
///   └──────────┘
///        │
///        ├──────────────┬───────────────┐
///        ▼              ▼               ▼
///   ┌──────────┐  ┌───────────┐   raw table view
///   │ reshape   │  │ aggregate  │
///   └──────────┘  └───────────┘
///   series view    ranked totals
/// ```
///
/// `pipeline::run` ties filter, reshape and aggregate together.

pub mod aggregate;
pub mod classify;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod reshape;
