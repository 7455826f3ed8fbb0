/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → PenguinDataset
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ PenguinDataset │  Vec<Penguin>, species index
///   └───────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  species equality / membership → row indices
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
