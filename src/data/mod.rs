/// Data layer: core types, loading, statistics, and filtering.
///
/// Architecture:
/// ```text
///  .csv (Influx/Grafana export)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + normalize → GasSeries
///   └──────────┘
///        │
///        ├──────────────────┐
///        ▼                  ▼
///   ┌──────────┐      ┌──────────┐
///   │ summary   │      │  filter   │
///   │ stats /   │      │ above /   │
///   │ classify  │      │ below /   │
///   └──────────┘      │ export    │
///                      └──────────┘
/// ```
///
/// Everything here is pure data; rendering lives in `crate::ui`.
pub mod filter;
pub mod loader;
pub mod model;
pub mod summary;
