//! Time axis ticks: pick a calendar granularity for a span, place ticks on its
//! boundaries in a display timezone, and label them.

pub mod axis;
pub mod config;
pub mod error;
pub mod format;
pub mod planner;
pub mod step;

pub use axis::TimeAxis;
pub use config::{parse_timezone, TickConfig};
pub use error::TickError;
pub use format::{label_granularity, tick_format, LabelGranularity, TickFormats};
pub use planner::{
    generate_ticks_for_range, select_tick_interval, ticks, ticks_in_timezone, TickCandidate,
    TickInterval, TICK_INTERVALS,
};
pub use step::{tick_increment, tick_step};
