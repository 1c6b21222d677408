//! Small shared helpers.

mod timing;

pub use timing::{format_duration, ScopedTimer};
