//! The hit pipeline shared by the stat and ability calculators
//!
//! Both calculators run the same steps and differ only in where attributes are
//! read from. `AttributeSource` is that difference.

use super::{CalculatorTuning, HitContext};
use crate::combat::Combatant;
use crate::config::CombatSettings;
use crate::damage::calculation::{
    apply_random_deviation, extract_index_with_probability, reduce_damage_by_percentage, roll_percentage,
};
use crate::damage::{DamageEvent, DamageInfluences, DamageType, DamageTypeRegistry};
use crate::stat_block::AttributeDelta;
use crate::tag::GameplayTag;
use log::{debug, warn};
use rand::RngCore;

pub(super) trait AttributeSource {
    fn tuning(&self) -> &CalculatorTuning;

    /// The scaling table this source uses on a damage type
    fn scaling<'t>(&self, damage_type: &'t DamageType) -> &'t DamageInfluences;

    fn attribute(&self, combatant: &Combatant, attribute: &GameplayTag) -> f64;

    /// Crit chance in percent
    fn crit_chance(&self, dealer: &Combatant, damage_type: &DamageType, registry: &DamageTypeRegistry) -> f64;

    /// (current, max) stagger resistance, None when not tracked
    fn stagger_resistance(&self, receiver: &Combatant) -> Option<(f64, f64)>;

    /// Attribute that pays the stagger damage
    fn stagger_delta_tag(&self) -> Option<&GameplayTag>;

    /// Attribute that pays for a successful block
    fn block_damaged_tag(&self, receiver: &Combatant) -> Option<GameplayTag>;

    /// Percent of damage removed on a successful block
    fn block_defense(&self, receiver: &Combatant) -> f64;
}

/// Scaled, crit-multiplied and randomized damage before reactions and zones
pub(super) fn internal_damage<S: AttributeSource>(
    source: &S,
    event: &DamageEvent,
    damage_type: &DamageType,
    dealer: &Combatant,
    receiver: &Combatant,
    rng: &mut dyn RngCore,
) -> f64 {
    let scaling = source.scaling(damage_type);
    let mut damage = event.final_damage;

    for influence in &scaling.attack {
        damage += source.attribute(dealer, &influence.attribute) * influence.scaling_factor;
    }
    for influence in &scaling.defense {
        let percentage = source.attribute(receiver, &influence.attribute) * influence.scaling_factor;
        damage = reduce_damage_by_percentage(damage, percentage);
    }

    if event.is_critical {
        damage *= source.tuning().crit_multiplier;
    }
    apply_random_deviation(damage, source.tuning().random_deviation_percent, rng)
}

pub(super) fn is_critical<S: AttributeSource>(
    source: &S,
    event: &DamageEvent,
    ctx: &HitContext<'_>,
    rng: &mut dyn RngCore,
) -> bool {
    let damage_type = match ctx.resolve_damage_type(event) {
        Ok(damage_type) => damage_type,
        Err(err) => {
            debug!("skipping critical roll: {}", err);
            return false;
        }
    };
    let Some(dealer) = ctx.dealer else {
        return false;
    };
    let chance = source.crit_chance(dealer, damage_type, ctx.damage_types);
    roll_percentage(chance, rng)
}

pub(super) fn evaluate_hit_response<S: AttributeSource>(
    source: &S,
    event: &DamageEvent,
    ctx: &mut HitContext<'_>,
    rng: &mut dyn RngCore,
) -> Option<GameplayTag> {
    let damage_type = match ctx.resolve_damage_type(event) {
        Ok(damage_type) => damage_type,
        Err(err) => {
            debug!("no hit response: {}", err);
            return None;
        }
    };
    let registry = ctx.damage_types;
    let settings = ctx.settings;
    let dealer = ctx.dealer?;
    let receiver = ctx.receiver.as_deref_mut()?;

    let damage = internal_damage(source, event, damage_type, dealer, receiver, rng);
    let stagger_damage = damage * damage_type.stagger_multiplier;

    let attacker_position = dealer.placement.map(|p| p.position);
    if let Some((stance, mut defender)) = receiver.split_defense() {
        let outcome = stance.try_block_incoming_damage(event, damage, &mut defender, attacker_position, registry);
        if let Some(reaction) = outcome.reaction() {
            return Some(reaction.clone());
        }
        if let Some(counter) = stance.try_counter_attack(event, defender.actions, Some(dealer.alive), registry) {
            return Some(counter);
        }
    }

    let mut response = pick_reaction(event, receiver, registry, settings, rng);

    if let Some((current, max)) = source.stagger_resistance(receiver) {
        // Only the generic hit state is shrugged off; authored reactions still play
        if response.as_ref() == Some(&settings.default_hit_state) && current > stagger_damage {
            debug!(
                "{} shrugs off the hit ({:.1} resistance vs {:.1} stagger)",
                receiver.name, current, stagger_damage
            );
            return None;
        }
        if let Some(heavy) = source.tuning().heavy_hit_reaction() {
            if current < -source.tuning().heavy_hit_multiplier * max {
                response = Some(heavy.clone());
            }
        }
    }

    response
}

/// Weighted draw over the receiver's reactions that apply to this hit
fn pick_reaction(
    event: &DamageEvent,
    receiver: &Combatant,
    registry: &DamageTypeRegistry,
    settings: &CombatSettings,
    rng: &mut dyn RngCore,
) -> Option<GameplayTag> {
    if receiver.hit_responses.is_empty() {
        let fallback = &settings.default_hit_state;
        return Some(fallback.clone()).filter(|tag| receiver.actions.can_execute(tag));
    }

    let candidates: Vec<_> = receiver
        .hit_responses
        .iter()
        .filter(|c| receiver.actions.can_execute(&c.action) && c.applies_to(event, registry))
        .collect();
    let weights: Vec<f64> = candidates.iter().map(|c| c.weight).collect();

    extract_index_with_probability(&weights, rng).map(|index| candidates[index].action.clone())
}

pub(super) fn final_damage<S: AttributeSource>(
    source: &S,
    event: &mut DamageEvent,
    ctx: &HitContext<'_>,
    rng: &mut dyn RngCore,
) -> f64 {
    let damage_type = match ctx.resolve_damage_type(event) {
        Ok(damage_type) => damage_type,
        Err(err) => {
            warn!("invalid damage event, keeping raw damage: {}", err);
            return event.final_damage;
        }
    };
    let (Some(dealer), Some(receiver)) = (ctx.dealer, ctx.receiver.as_deref()) else {
        return event.final_damage;
    };

    let mut damage = internal_damage(source, event, damage_type, dealer, receiver, rng);
    let stagger_damage = damage * damage_type.stagger_multiplier;

    let blocked = receiver
        .defense
        .as_ref()
        .filter(|stance| event.is_hit_response(stance.block_action()));

    if let Some(stance) = blocked {
        if let Some(tag) = source.block_damaged_tag(receiver) {
            let cost = stagger_damage * stance.damaged_statistic_multiplier();
            event.affected_attributes.push(AttributeDelta::new(tag, cost));
        }
    }
    if stagger_damage > 0.0 {
        if let Some(tag) = source.stagger_delta_tag() {
            event.affected_attributes.push(AttributeDelta::new(tag.clone(), stagger_damage));
        }
    }
    if blocked.is_some() {
        damage = reduce_damage_by_percentage(damage, source.block_defense(receiver));
    }

    let tuning = source.tuning();
    damage *= tuning.zone_multiplier(event.zone);
    damage *= tuning.hit_response_multiplier(event.hit_response.as_ref());
    damage
}
