//! Combat resolver.
//!
//! Casting is validated in three ordered phases before it commits:
//!
//! 1. **Self**: caster alive, skill learned, enough mana, off cooldown.
//! 2. **Target**: validates the selection and corrects it where the skill
//!    allows (friendly and self skills fall back to the caster). Correction
//!    happens before any distance check.
//! 3. **Distance**: in range, or a point to walk to before retrying.
//!
//! On completion the skill's effect is applied to the corrected target.
//! A killing blow pays the killer immediately; the victim processes its own
//! death on its next tick.

mod checks;
mod damage;
mod death;
mod effects;

pub use checks::{CastError, CastTarget, Reach, check_distance, check_self, check_target, target_lost};
pub use damage::calculate_damage;
pub(crate) use death::apply_death;
pub(crate) use effects::{apply_skill, heal};
