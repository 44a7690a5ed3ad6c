use chrono::Utc;
use rand::Rng;

/// Timestamp format used across the whole stack (UTC, millisecond precision).
///
/// Fixed-width, so lexicographic comparison on TEXT columns matches
/// chronological order. Repository date-range filters rely on this.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Current UTC time as an ISO-8601 string.
pub fn now_iso() -> String {
    Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Current UTC date (`YYYY-MM-DD`), used for commission delivery dates.
pub fn today_iso() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms, collision-free at this scale)
pub fn snowflake_id() -> i64 {
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = Utc::now().timestamp_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    (ts << 12) | rand_bits
}

/// Generate a human-readable dispatch order number.
///
/// Time-derived with a random suffix, e.g. `DSP20260829T1130457321`.
/// The UNIQUE constraint on `dispatch_order.order_no` is the backstop
/// against the (unlikely) same-second collision.
pub fn order_number() -> String {
    let stamp = Utc::now().format("%Y%m%dT%H%M%S");
    let suffix: u16 = rand::thread_rng().gen_range(0..10_000);
    format!("DSP{stamp}{suffix:04}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_are_lexicographically_ordered() {
        let a = now_iso();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let b = now_iso();
        assert!(a < b);
    }

    #[test]
    fn order_number_shape() {
        let n = order_number();
        assert!(n.starts_with("DSP"));
        assert_eq!(n.len(), "DSP".len() + 15 + 4);
    }
}
