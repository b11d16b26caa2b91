/// Urgency lost per tile of distance.
pub const DISTANCE_PENALTY: u32 = 2;

/// Heuristic healing need in `[0, 100]`.
///
/// `clamp(100 - hp_pct) - 2 * distance`, clamped to `[0, 100]`. Rises as health
/// drops, falls with distance.
pub fn urgency(hp_pct: u8, distance: u32) -> u8 {
    let need = 100u32.saturating_sub(u32::from(hp_pct));
    let score = need.saturating_sub(distance.saturating_mul(DISTANCE_PENALTY));
    score.min(100) as u8
}
