use chrono::{DateTime, SubsecRound, Utc};

/// Timestamp taken at the instant of a store write.
///
/// Truncated to microseconds so the value survives a round trip through
/// both SQLite (text) and Postgres (`timestamptz`) unchanged.
pub fn store_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Human readable "hours worked" label, e.g. `2h 05m`.
pub fn format_duration(duration: chrono::Duration) -> String {
    let total_minutes = duration.num_minutes().max(0);
    format!("{}h {:02}m", total_minutes / 60, total_minutes % 60)
}
