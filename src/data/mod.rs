/// Data layer: entities, loading, linking, filtering and export.
///
/// Architecture:
/// ```text
///  neos.csv        cad.json
///     │               │
///     ▼               ▼
///   ┌───────────────────┐
///   │      loader       │  rows → NearEarthObject / CloseApproach
///   └───────────────────┘
///            │
///            ▼
///   ┌───────────────────┐
///   │    NeoDatabase    │  arenas, designation/name indices, back-references
///   └───────────────────┘
///            │
///            ▼
///   ┌───────────────────┐
///   │  filter + limit   │  lazy predicate conjunction → LinkedApproach stream
///   └───────────────────┘
///            │
///            ▼
///   ┌───────────────────┐
///   │      writer       │  .csv / .json
///   └───────────────────┘
/// ```

pub mod database;
pub mod filter;
pub mod loader;
pub mod model;
pub mod writer;
