//! Calendar intervals: composable grids of instants (every minute, every
//! Sunday, every third month, ...) evaluated in the timezone of the instants they
//! are given.

pub mod custom;
pub mod filter;
pub mod interval;
pub mod local;
pub mod units;

pub use custom::{build_interval, CustomInterval};
pub use filter::FilteredInterval;
pub use interval::TimeInterval;
pub use units::CalendarUnit;
