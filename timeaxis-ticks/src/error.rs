#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TickError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Timestamp out of range: {0}")]
    TimestampOutOfRange(i64),

    #[error("Invalid tick label format: {0:?}")]
    InvalidFormat(String),
}
