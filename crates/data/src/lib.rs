//! [ecochart]'s data library.
//!
//! Retrieves raw JSON datasets and reshapes them into normalized items or
//! value trees ready for scaling and layout.
//!
//! [ecochart]: https://github.com/nelusnegur/ecochart

pub mod dataset;
pub mod error;
pub mod filter;
pub mod item;
pub mod key;
pub mod source;
pub mod transform;

pub use crate::dataset::RawDataset;
pub use crate::dataset::RawRecord;
pub use crate::filter::FieldMatch;
pub use crate::filter::FilterSpec;
pub use crate::item::Component;
pub use crate::item::HierarchicalNode;
pub use crate::item::Normalized;
pub use crate::item::NormalizedItem;
pub use crate::source::DataSource;
pub use crate::transform::Transformer;
