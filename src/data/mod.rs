/// Data layer: core types, acquisition, and the analyses shown on the page.
///
/// Architecture:
/// ```text
///  upload (.csv / .xlsx)   built-in sample
///        │                      │
///        ▼                      ▼
///   ┌──────────┐          ┌──────────┐
///   │  loader   │◄─────────│  sample   │  parse bytes → Dataset
///   └──────────┘          └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  polars DataFrame + semantic column types
///   └──────────┘
///        │
///        ├──► summary       shape, dtypes, describe, missing
///        ├──► correlation   pairwise Pearson over numeric columns
///        ├──► distribution  30-bin histogram + box summary
///        └──► export        CSV bytes
/// ```

pub mod correlation;
pub mod distribution;
pub mod export;
pub mod loader;
pub mod model;
pub mod sample;
pub mod summary;
