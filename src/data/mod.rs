/// Data layer: city table, loading, and the shaping pipeline behind every view.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → CityTable (schema checked)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ CityTable  │  Vec<CityRecord> + display columns, immutable
///   └───────────┘
///        │
///        ├──▶ map      classify + label   → MapRow
///        ├──▶ ranking  top-n tables       → RankedRow
///        ▼
///   ┌──────────┐
///   │  filter   │  continent → country cascade
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ reshape   │  melt / aggregate → long-form series
///   └──────────┘
/// ```
///
/// `view::build_view` ties the cascade and the reshapers together for one
/// [`view::ViewConfig`].

pub mod error;
pub mod filter;
pub mod loader;
pub mod map;
pub mod model;
pub mod ranking;
pub mod reshape;
pub mod view;
