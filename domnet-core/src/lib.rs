pub mod data;
pub mod enrich;
pub mod error;
pub mod extract;
pub mod identity;
pub mod map;
pub mod model;
pub mod registry;
pub mod report;
pub mod select;
pub mod source;
pub mod stats;
pub mod style;

pub use error::{GraphError, Result};
pub use extract::{SkipReason, SourceRow};
pub use map::{MapBuilder, NetworkMap};
pub use model::{DomainRole, Edge, EdgeType, Entity};
pub use registry::NodeRegistry;
pub use select::SelectionLimits;
pub use stats::Statistics;
pub use style::StyleTable;
