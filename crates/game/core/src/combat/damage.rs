//! Damage calculation.

use crate::event::HitKind;

/// Final damage of one hit.
///
/// # Formula
///
/// ```text
/// blocked      → 0
/// dealt        = max(raw − defense, 1)
/// critical hit → dealt × 2
/// ```
pub fn calculate_damage(raw: u32, defense: u32, blocked: bool, critical: bool) -> (u32, HitKind) {
    if blocked {
        return (0, HitKind::Blocked);
    }
    let dealt = raw.saturating_sub(defense).max(1);
    if critical {
        (dealt.saturating_mul(2), HitKind::Critical)
    } else {
        (dealt, HitKind::Normal)
    }
}
