//! The dashboard page served for every request.

pub mod page;

pub use page::{PageRenderer, RESPONSE_CAPACITY, WATER_LEVEL_PLACEHOLDER};
