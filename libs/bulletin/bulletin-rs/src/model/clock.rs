use chrono::Utc;

/// Milliseconds since the unix epoch; record ids and asset names are derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(pub i64);

pub fn get_time() -> Timestamp {
    Timestamp(Utc::now().timestamp_millis())
}
