use super::{DamageCalculator, HitContext};
use crate::damage::DamageEvent;
use crate::tag::GameplayTag;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Never critical, never reacts, raw damage in and out
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BaseDamageCalculator;

impl DamageCalculator for BaseDamageCalculator {
    fn is_critical_damage(&self, _event: &DamageEvent, _ctx: &HitContext<'_>, _rng: &mut dyn RngCore) -> bool {
        false
    }

    fn evaluate_hit_response_action(
        &self,
        _event: &DamageEvent,
        _ctx: &mut HitContext<'_>,
        _rng: &mut dyn RngCore,
    ) -> Option<GameplayTag> {
        None
    }

    fn calculate_final_damage(&self, event: &mut DamageEvent, _ctx: &HitContext<'_>, _rng: &mut dyn RngCore) -> f64 {
        event.final_damage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::Combatant;
    use crate::config::CombatSettings;
    use crate::damage::DamageTypeRegistry;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_passthrough() {
        let registry = DamageTypeRegistry::with_defaults();
        let settings = CombatSettings::default();
        let dealer = Combatant::new("player", "Player");
        let mut receiver = Combatant::new("enemy", "Enemy");
        let mut rng = StdRng::seed_from_u64(12345);

        let mut ctx = HitContext {
            dealer: Some(&dealer),
            receiver: Some(&mut receiver),
            damage_types: &registry,
            settings: &settings,
        };
        let mut event = DamageEvent::new(42.0).with_damage_type("DamageType.Melee");

        let calculator = BaseDamageCalculator;
        assert!(!calculator.is_critical_damage(&event, &ctx, &mut rng));
        assert_eq!(calculator.evaluate_hit_response_action(&event, &mut ctx, &mut rng), None);
        assert!((calculator.calculate_final_damage(&mut event, &ctx, &mut rng) - 42.0).abs() < f64::EPSILON);
        assert!(event.affected_attributes.is_empty());
    }
}
