/// Data layer: core types, loading, the dataset store and filtering.
///
/// Architecture:
/// ```text
///  .csv / .xlsx
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (typed columns)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ DatasetStore  │  name → Dataset
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  predicate over one column → every dataset re-bound
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod store;

pub use filter::{FilterOutcome, FilterSpec, Operator};
pub use model::{Column, ColumnKind, Dataset, Value};
pub use store::DatasetStore;
