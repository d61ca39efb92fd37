//! Collector
//!
//! Turns the flat resource lists of one project into Server records:
//! fetch the shared lists once, join each instance against them, and
//! stream everything out as typed records.

pub mod error;
pub mod filter;
pub mod join;
pub mod membership;
pub mod orchestrator;
pub mod record;
pub mod region;
pub mod resources;
pub mod zone;

pub use error::{CollectError, ErrorKind, JoinError};
pub use filter::InstanceQuery;
pub use orchestrator::{CollectOptions, Collector};
pub use record::Record;
pub use resources::GlobalResources;
