#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure needs decay and urgency engine.
//!
//! The model only reports "I need X"; discovering and consuming resources is
//! the behavior system's job. Thresholds reproduce the legacy integer math
//! exactly: a boundary like 25% of `MAX_HUNGER` is computed as
//! `MAX_HUNGER / 100 * 25`, never `MAX_HUNGER * 25 / 100`.

use pet_haven_core::{
    NeedKind, Needs, TargetSelector, MAX_ENERGY, MAX_HUNGER, MAX_THIRST, SLEEP_RECOVERY,
};

/// Percentage below which a need triggers route planning toward a source.
pub const URGENT_THRESHOLD_PERCENT: i32 = 25;

/// Percentage below which a need is "low" and consumed opportunistically
/// when the animal already stands on a source.
pub const LOW_THRESHOLD_PERCENT: i32 = 70;

/// Percentage below which the animal's speed collapses to one.
pub const SLOW_THRESHOLD_PERCENT: i32 = 10;

/// Effects of one awake tick reported back to the behavior system.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NeedsEffects {
    /// The animal's speed must be forced to one until a need is satisfied.
    pub slowed: bool,
    /// Target worth routing toward; hunger outranks thirst.
    pub urgent_seek: Option<TargetSelector>,
    /// Energy dropped below the sleep threshold.
    pub sleepy: bool,
}

/// Decays hunger, thirst, and energy by one and computes urgency flags.
///
/// Counters never drop below their floor of one.
pub fn tick_awake(needs: &mut Needs) -> NeedsEffects {
    needs.set_hunger(needs.hunger() - 1);
    needs.set_thirst(needs.thirst() - 1);
    needs.set_energy(needs.energy() - 1);

    NeedsEffects {
        slowed: is_slowed(needs),
        urgent_seek: urgent_target(needs),
        sleepy: is_sleepy(needs),
    }
}

/// Regains energy for one sleeping tick, capping at the maximum.
///
/// Returns `true` once the animal is fully rested.
pub fn tick_asleep(needs: &mut Needs) -> bool {
    needs.set_energy(needs.energy() + SLEEP_RECOVERY);
    needs.energy() >= MAX_ENERGY
}

/// Resets the provided need to its maximum after eating, drinking, or a
/// completed sleep.
pub fn satisfy(needs: &mut Needs, kind: NeedKind) {
    match kind {
        NeedKind::Hunger => needs.set_hunger(MAX_HUNGER),
        NeedKind::Thirst => needs.set_thirst(MAX_THIRST),
        NeedKind::Energy => needs.set_energy(MAX_ENERGY),
    }
}

/// Target worth routing toward, if any; hunger urgency outranks thirst.
#[must_use]
pub fn urgent_target(needs: &Needs) -> Option<TargetSelector> {
    if needs.hunger() < MAX_HUNGER / 100 * URGENT_THRESHOLD_PERCENT {
        return Some(TargetSelector::Food);
    }
    if needs.thirst() < MAX_THIRST / 100 * URGENT_THRESHOLD_PERCENT {
        return Some(TargetSelector::Water);
    }
    None
}

/// Reports whether energy has fallen below the sleep threshold.
#[must_use]
pub fn is_sleepy(needs: &Needs) -> bool {
    needs.energy() < MAX_ENERGY / 100 * URGENT_THRESHOLD_PERCENT
}

/// Reports whether hunger is low enough for opportunistic eating.
#[must_use]
pub fn is_hunger_low(needs: &Needs) -> bool {
    needs.hunger() < MAX_HUNGER / 100 * LOW_THRESHOLD_PERCENT
}

/// Reports whether thirst is low enough for opportunistic drinking.
#[must_use]
pub fn is_thirst_low(needs: &Needs) -> bool {
    needs.thirst() < MAX_THIRST / 100 * LOW_THRESHOLD_PERCENT
}

fn is_slowed(needs: &Needs) -> bool {
    needs.hunger() < MAX_HUNGER / 100 * SLOW_THRESHOLD_PERCENT
        || needs.thirst() < MAX_THIRST / 100 * SLOW_THRESHOLD_PERCENT
        || needs.energy() < MAX_ENERGY / 100 * SLOW_THRESHOLD_PERCENT
}

#[cfg(test)]
mod tests {
    use super::*;
    use pet_haven_core::{MIN_ENERGY, MIN_HUNGER, MIN_THIRST};

    #[test]
    fn decay_never_drops_below_the_floor() {
        let mut needs = Needs::new(MIN_HUNGER, MIN_THIRST, MIN_ENERGY);
        let _ = tick_awake(&mut needs);
        assert_eq!(needs.hunger(), MIN_HUNGER);
        assert_eq!(needs.thirst(), MIN_THIRST);
        assert_eq!(needs.energy(), MIN_ENERGY);
    }

    #[test]
    fn hunger_urgency_outranks_thirst() {
        let needs = Needs::new(1_000, 1_000, MAX_ENERGY);
        assert_eq!(urgent_target(&needs), Some(TargetSelector::Food));

        let needs = Needs::new(MAX_HUNGER, 1_000, MAX_ENERGY);
        assert_eq!(urgent_target(&needs), Some(TargetSelector::Water));

        let needs = Needs::full();
        assert_eq!(urgent_target(&needs), None);
    }

    #[test]
    fn urgency_boundary_matches_legacy_truncation() {
        // 30000 / 100 * 25 == 7500; exactly 7500 is not yet urgent.
        let needs = Needs::new(7_500, MAX_THIRST, MAX_ENERGY);
        assert_eq!(urgent_target(&needs), None);

        let needs = Needs::new(7_499, MAX_THIRST, MAX_ENERGY);
        assert_eq!(urgent_target(&needs), Some(TargetSelector::Food));
    }

    #[test]
    fn sleepiness_triggers_below_a_quarter_energy() {
        let rested = Needs::new(MAX_HUNGER, MAX_THIRST, 10_000);
        assert!(!is_sleepy(&rested));

        let tired = Needs::new(MAX_HUNGER, MAX_THIRST, 9_999);
        assert!(is_sleepy(&tired));
    }

    #[test]
    fn speed_collapses_below_ten_percent() {
        let mut needs = Needs::new(3_000, MAX_THIRST, MAX_ENERGY);
        let effects = tick_awake(&mut needs);
        assert!(effects.slowed, "2999 hunger is below ten percent");

        let mut needs = Needs::new(3_002, MAX_THIRST, MAX_ENERGY);
        let effects = tick_awake(&mut needs);
        assert!(!effects.slowed);
    }

    #[test]
    fn sleeping_recovers_energy_and_caps_at_max() {
        let mut needs = Needs::new(MAX_HUNGER, MAX_THIRST, MAX_ENERGY - 7);
        assert!(tick_asleep(&mut needs));
        assert_eq!(needs.energy(), MAX_ENERGY);

        let mut needs = Needs::new(MAX_HUNGER, MAX_THIRST, 5_000);
        assert!(!tick_asleep(&mut needs));
        assert_eq!(needs.energy(), 5_000 + SLEEP_RECOVERY);
    }

    #[test]
    fn satisfying_a_need_resets_it_to_max() {
        let mut needs = Needs::new(10, 10, 10);
        satisfy(&mut needs, NeedKind::Hunger);
        satisfy(&mut needs, NeedKind::Thirst);
        assert_eq!(needs.hunger(), MAX_HUNGER);
        assert_eq!(needs.thirst(), MAX_THIRST);
        assert_eq!(needs.energy(), 10, "satisfying one need leaves the others untouched");
    }
}
