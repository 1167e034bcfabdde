/// Data layer: article tables, loading, and preprocessing.
///
/// Architecture:
/// ```text
///  .parquet / .json[l] / .csv  (optionally .gz)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawTable
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ preprocess  │  drop missing, merge text, parse dates,
///   └────────────┘  keep 2007–2009, sort → ArticleTable
/// ```

pub mod dates;
pub mod loader;
pub mod model;
pub mod preprocess;
