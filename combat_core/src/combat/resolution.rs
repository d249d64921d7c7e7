//! Hit resolution - Run a calculator over one hit and apply the outcome

use super::result::CombatResult;
use super::Combatant;
use crate::config::CombatSettings;
use crate::damage::{DamageCalculator, DamageEvent, DamageTypeRegistry, HitContext};
use crate::stat_block::AttributeDelta;
use crate::status::StatusEffectRegistry;
use crate::tag::GameplayTag;
use crate::types::DamageZone;
use log::{debug, warn};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// A hit as it arrives from an attack, before any formula
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomingHit {
    pub damage: f64,
    pub damage_type: GameplayTag,
    #[serde(default)]
    pub zone: DamageZone,
    /// Status effects applied when the hit lands unguarded
    #[serde(default)]
    pub status_effects: Vec<GameplayTag>,
    #[serde(default)]
    pub context: Option<String>,
}

impl IncomingHit {
    pub fn new(damage: f64, damage_type: impl Into<GameplayTag>) -> Self {
        IncomingHit {
            damage,
            damage_type: damage_type.into(),
            zone: DamageZone::Normal,
            status_effects: Vec::new(),
            context: None,
        }
    }

    pub fn with_zone(mut self, zone: DamageZone) -> Self {
        self.zone = zone;
        self
    }

    pub fn with_status_effect(mut self, status: impl Into<GameplayTag>) -> Self {
        self.status_effects.push(status.into());
        self
    }
}

/// The shared rule set a hit is resolved under
#[derive(Clone, Copy)]
pub struct CombatRules<'a> {
    pub calculator: &'a dyn DamageCalculator,
    pub damage_types: &'a DamageTypeRegistry,
    pub status_effects: &'a StatusEffectRegistry,
    pub settings: &'a CombatSettings,
}

/// Resolve a hit using the thread RNG
pub fn resolve_hit(
    rules: CombatRules<'_>,
    dealer: Option<&Combatant>,
    receiver: &mut Combatant,
    hit: &IncomingHit,
) -> CombatResult {
    let mut rng = rand::thread_rng();
    resolve_hit_with_rng(rules, dealer, receiver, hit, &mut rng)
}

/// Resolve a hit with a provided RNG (for deterministic testing)
///
/// 1. Builds the damage event (direction from placements, damage tags)
/// 2. Rolls critical, picks the reaction, computes final damage
/// 3. Consumes side costs and health, triggers the reaction
/// 4. Detects death, then applies on-hit status effects
pub fn resolve_hit_with_rng(
    rules: CombatRules<'_>,
    dealer: Option<&Combatant>,
    receiver: &mut Combatant,
    hit: &IncomingHit,
    rng: &mut dyn RngCore,
) -> CombatResult {
    let settings = rules.settings;
    let mut result = CombatResult::new();
    result.raw_damage = hit.damage;
    result.health_before = receiver.health(settings);

    let mut event = DamageEvent::new(hit.damage)
        .with_receiver(receiver.id.clone())
        .with_damage_type(hit.damage_type.clone())
        .with_zone(hit.zone);
    event.context = hit.context.clone();
    if let Some(dealer) = dealer {
        event.dealer = Some(dealer.id.clone());
        if let (Some(own), Some(theirs)) = (receiver.placement, dealer.placement) {
            event.direction = own.direction_from(theirs.position);
        }
    }
    if let Some(damage_type) = rules.damage_types.get(&hit.damage_type) {
        event.damage_tags = damage_type.damage_tags.clone();
    }

    if !receiver.alive {
        result.ignored = true;
        result.health_after = result.health_before;
        result.event = event;
        return result;
    }

    {
        let mut ctx = HitContext {
            dealer,
            receiver: Some(&mut *receiver),
            damage_types: rules.damage_types,
            settings,
        };
        event.is_critical = rules.calculator.is_critical_damage(&event, &ctx, rng);
        event.hit_response = rules.calculator.evaluate_hit_response_action(&event, &mut ctx, rng);
        event.final_damage = rules.calculator.calculate_final_damage(&mut event, &ctx, rng);
    }

    receiver.apply_deltas(&event.affected_attributes);
    let damage = if receiver.immortal { 0.0 } else { event.final_damage };
    if damage != 0.0 {
        receiver.apply_deltas(&[AttributeDelta::new(settings.health.clone(), damage)]);
    }
    result.total_damage = damage;

    if let Some(reaction) = &event.hit_response {
        result.guarded = receiver.is_guard_reaction(reaction);
        receiver
            .actions
            .trigger_for(reaction.clone(), settings.reaction_priority, settings.reaction_duration);
    }
    if let Some(stance) = receiver.defense.as_mut() {
        result.stance_events = stance.drain_events();
    }

    if !receiver.immortal && receiver.is_health_depleted(settings) {
        receiver.die();
        result.is_killing_blow = true;
    }

    if receiver.alive && !result.guarded {
        let instigator = dealer.map(|d| d.id.clone());
        for status in &hit.status_effects {
            let Some(def) = rules.status_effects.get(status) else {
                warn!("hit carries unknown status effect {}", status);
                continue;
            };
            if receiver.add_status_effect(def, instigator.clone()) {
                result.applied_status_effects.push(status.clone());
            }
        }
    }

    result.health_after = receiver.health(settings);
    result.event = event;
    debug!("{} takes a hit: {}", receiver.name, result.summary());
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::damage::{BaseDamageCalculator, CalculatorTuning, HitResponseChance, StatDamageCalculator};
    use crate::defense::{BlockProfile, DamagedResource, DefenseStance, DefenseStanceConfig, Loadout};
    use crate::stat_block::{StatBlock, Statistic};
    use crate::types::{Direction, Placement};
    use glam::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Fixture {
        damage_types: DamageTypeRegistry,
        status_effects: StatusEffectRegistry,
        settings: CombatSettings,
    }

    impl Fixture {
        fn new() -> Self {
            Fixture {
                damage_types: DamageTypeRegistry::with_defaults(),
                status_effects: StatusEffectRegistry::with_defaults(),
                settings: CombatSettings::default(),
            }
        }

        fn rules<'a>(&'a self, calculator: &'a dyn DamageCalculator) -> CombatRules<'a> {
            CombatRules {
                calculator,
                damage_types: &self.damage_types,
                status_effects: &self.status_effects,
                settings: &self.settings,
            }
        }
    }

    fn make_test_rng() -> StdRng {
        StdRng::seed_from_u64(12345)
    }

    fn make_target(health: f64) -> Combatant {
        Combatant::new("enemy", "Enemy").with_stats(
            StatBlock::new()
                .with_statistic("Statistics.Health", Statistic::new(health))
                .with_statistic("Statistics.Stamina", Statistic::new(100.0))
                .with_attribute("Attributes.BlockDefense", 50.0),
        )
    }

    fn exact_stat_calculator() -> StatDamageCalculator {
        StatDamageCalculator {
            tuning: CalculatorTuning {
                random_deviation_percent: 0.0,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_basic_damage() {
        let fixture = Fixture::new();
        let dealer = Combatant::new("player", "Player");
        let mut receiver = make_target(100.0);
        let mut rng = make_test_rng();

        let result = resolve_hit_with_rng(
            fixture.rules(&BaseDamageCalculator),
            Some(&dealer),
            &mut receiver,
            &IncomingHit::new(30.0, "DamageType.Melee"),
            &mut rng,
        );

        assert!((result.total_damage - 30.0).abs() < f64::EPSILON);
        assert!((result.health_before - 100.0).abs() < f64::EPSILON);
        assert!((result.health_after - 70.0).abs() < f64::EPSILON);
        assert!(!result.is_killing_blow);
        assert_eq!(result.event.dealer, Some("player".into()));
    }

    #[test]
    fn test_killing_blow() {
        let fixture = Fixture::new();
        let dealer = Combatant::new("player", "Player");
        let mut receiver = make_target(20.0);
        let mut rng = make_test_rng();

        let hit = IncomingHit::new(50.0, "DamageType.Melee");
        let result = resolve_hit_with_rng(fixture.rules(&BaseDamageCalculator), Some(&dealer), &mut receiver, &hit, &mut rng);
        assert!(result.is_killing_blow);
        assert!(!receiver.is_alive());
        assert!((result.health_after - 0.0).abs() < f64::EPSILON);

        // can't die twice
        let again = resolve_hit_with_rng(fixture.rules(&BaseDamageCalculator), Some(&dealer), &mut receiver, &hit, &mut rng);
        assert!(again.ignored);
        assert!(!again.is_killing_blow);
    }

    #[test]
    fn test_immortal_reacts_without_losing_health() {
        let fixture = Fixture::new();
        let dealer = Combatant::new("player", "Player");
        let mut receiver = make_target(10.0).with_hit_response(HitResponseChance::new("Actions.Hit", 1.0).for_damage_type("DamageType"));
        receiver.immortal = true;
        let calculator = exact_stat_calculator();
        let mut rng = make_test_rng();

        let result = resolve_hit_with_rng(
            fixture.rules(&calculator),
            Some(&dealer),
            &mut receiver,
            &IncomingHit::new(500.0, "DamageType.Melee"),
            &mut rng,
        );
        assert!(!result.ignored);
        assert!((result.total_damage - 0.0).abs() < f64::EPSILON);
        assert!(receiver.is_alive());
        assert_eq!(receiver.actions.current_action(), Some(&GameplayTag::from("Actions.Hit")));
    }

    #[test]
    fn test_block_spends_stamina_and_halves_damage() {
        let fixture = Fixture::new();
        let dealer = Combatant::new("player", "Player");
        let stance = DefenseStance::new(
            DefenseStanceConfig {
                damaged_resource: DamagedResource::Statistic("Statistics.Stamina".into()),
                ..Default::default()
            },
            Loadout {
                off_hand: Some(BlockProfile::blocking("DamageType.Melee")),
                ..Default::default()
            },
        );
        let mut receiver = make_target(100.0).with_defense(stance);
        assert!(receiver.start_defending());
        let calculator = exact_stat_calculator();
        let mut rng = make_test_rng();

        let hit = IncomingHit::new(40.0, "DamageType.Melee").with_status_effect("Status.Burning");
        let result = resolve_hit_with_rng(fixture.rules(&calculator), Some(&dealer), &mut receiver, &hit, &mut rng);

        assert!(result.guarded);
        assert!((result.total_damage - 20.0).abs() < 1e-9);
        assert!((receiver.stats.statistic_current(&"Statistics.Stamina".into()) - 60.0).abs() < 1e-9);
        assert!(result.applied_status_effects.is_empty());
        assert!(result
            .stance_events
            .iter()
            .any(|e| matches!(e, crate::defense::StanceEvent::DamageBlocked { .. })));
    }

    #[test]
    fn test_unguarded_hit_applies_status() {
        let fixture = Fixture::new();
        let dealer = Combatant::new("player", "Player");
        let mut receiver = make_target(100.0);
        let mut rng = make_test_rng();

        let hit = IncomingHit::new(10.0, "DamageType.Spell").with_status_effect("Status.Burning");
        let result = resolve_hit_with_rng(fixture.rules(&BaseDamageCalculator), Some(&dealer), &mut receiver, &hit, &mut rng);

        assert_eq!(result.applied_status_effects, vec![GameplayTag::from("Status.Burning")]);
        assert!(receiver.status_effects.is_affected_by(&"Status.Burning".into()));
        let instigator = receiver
            .status_effects
            .get(&"Status.Burning".into())
            .and_then(|e| e.instigator.clone());
        assert_eq!(instigator, Some("player".into()));
    }

    #[test]
    fn test_direction_from_placements() {
        let fixture = Fixture::new();
        let dealer = Combatant::new("player", "Player").with_placement(Placement::new(Vec3::new(-2.0, 0.0, 0.0), Vec3::X));
        let mut receiver = make_target(100.0).with_placement(Placement::new(Vec3::ZERO, Vec3::X));
        let mut rng = make_test_rng();

        let result = resolve_hit_with_rng(
            fixture.rules(&BaseDamageCalculator),
            Some(&dealer),
            &mut receiver,
            &IncomingHit::new(1.0, "DamageType.Melee"),
            &mut rng,
        );
        assert_eq!(result.event.direction, Direction::Back);
    }
}
