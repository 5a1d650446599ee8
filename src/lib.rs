//! # rusty-neo
//!
//! Links NASA/JPL near-Earth object and close-approach exports into one
//! in-memory dataset and answers filtered queries over it.
//!
//! ```rust
//! use rusty_neo::{CloseApproach, Criteria, FilterSet, NearEarthObject, NeoDatabase};
//! use rusty_neo::data::model::parse_cad_time;
//!
//! # fn main() -> rusty_neo::Result<()> {
//! let neos = vec![NearEarthObject::new("433", Some("Eros"), Some(16.84), false)];
//! let approaches = vec![CloseApproach::new(
//!     "433",
//!     parse_cad_time("1900-Dec-27 01:30").ok(),
//!     Some(0.15),
//!     Some(5.5),
//! )];
//! let db = NeoDatabase::new(neos, approaches)?;
//!
//! let filters = FilterSet::from_criteria(&Criteria {
//!     diameter_min: Some(10.0),
//!     ..Default::default()
//! });
//! assert_eq!(db.query(&filters).count(), 1);
//! # Ok(())
//! # }
//! ```

pub mod data;
pub mod error;

pub use data::database::NeoDatabase;
pub use data::filter::{limit, Comparison, Criteria, FilterSet, Predicate};
pub use data::model::{ApproachId, CloseApproach, LinkedApproach, NearEarthObject, NeoId};
pub use error::{Error, Result};
