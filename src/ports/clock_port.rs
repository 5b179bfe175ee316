//! Source of the current time for appended price points and trades.

pub trait ClockPort {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;
}
