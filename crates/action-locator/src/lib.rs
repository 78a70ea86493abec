//! Resilient locator resolution
//!
//! Chooses the first workable selection strategy from an ordered list:
//! - primary strategy is preferred whenever it matches at least one element
//! - fallbacks are tried in order only when the primary matches nothing
//! - resolution never fails; an all-zero spec degrades to the primary with
//!   count 0 so the caller's next assertion can report a precise failure

pub mod errors;
pub mod resolver;
pub mod strategies;
pub mod types;

pub use errors::*;
pub use resolver::*;
pub use strategies::*;
pub use types::*;
