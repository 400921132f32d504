//! Transformation module.
//!
//! - Expander: validated rows to bulk sheet records
//! - Ids / Clock: injectable identifier and date sources
//! - Pipeline: parse, validate, expand

pub mod clock;
pub mod expander;
pub mod ids;
pub mod pipeline;

pub use clock::{Clock, FixedClock, SystemClock};
pub use expander::{campaign_name, expand, expand_row};
pub use ids::{IdGenerator, RandomIdGenerator};
pub use pipeline::*;
