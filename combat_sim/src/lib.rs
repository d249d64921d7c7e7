//! combat_sim - Headless duels driven by TOML scenarios
//!
//! A scenario bundles the rule configuration (settings, calculator, damage
//! types, status effects), the combatants and a simple script for each
//! attacker. `run_duel` plays it out at a fixed tick rate.

use combat_core::combat::{Arena, CombatResult, IncomingHit};
use combat_core::config::{self, CombatSettings, CombatantTemplate, ConfigError, DamageTypesConfig, StatusEffectsConfig};
use combat_core::damage::CalculatorConfig;
use combat_core::status::StatusEvent;
use combat_core::tag::GameplayTag;
use combat_core::types::ActorId;
use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Scenario has no combatants")]
    NoCombatants,
    #[error("Behaviour references unknown combatant {0}")]
    UnknownCombatant(ActorId),
    #[error("Tick length must be positive, got {0}")]
    InvalidTick(f64),
}

/// One attacker's script: hit `target` every `attack_interval` seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Behaviour {
    pub actor: ActorId,
    pub target: ActorId,
    #[serde(default = "default_attack_interval")]
    pub attack_interval: f64,
    pub hit: IncomingHit,
    /// Keep the guard raised between attacks
    #[serde(default)]
    pub guard: bool,
}

fn default_attack_interval() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_tick_seconds")]
    pub tick_seconds: f64,
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u32,
    #[serde(default)]
    pub settings: CombatSettings,
    #[serde(default)]
    pub calculator: CalculatorConfig,
    #[serde(default = "default_damage_types")]
    pub damage_types: DamageTypesConfig,
    #[serde(default = "default_status_effects")]
    pub status_effects: StatusEffectsConfig,
    #[serde(default)]
    pub combatants: Vec<CombatantTemplate>,
    #[serde(default)]
    pub behaviours: Vec<Behaviour>,
}

fn default_tick_seconds() -> f64 {
    0.1
}

fn default_max_ticks() -> u32 {
    600
}

fn default_damage_types() -> DamageTypesConfig {
    DamageTypesConfig {
        include_defaults: true,
        damage_types: Vec::new(),
    }
}

fn default_status_effects() -> StatusEffectsConfig {
    StatusEffectsConfig {
        include_defaults: true,
        status_effects: Vec::new(),
    }
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, SimError> {
        Ok(config::load_toml(path)?)
    }

    pub fn parse(content: &str) -> Result<Self, SimError> {
        Ok(config::parse_toml(content)?)
    }

    /// Build the arena with every combatant spawned
    pub fn build_arena(&self) -> Result<Arena, SimError> {
        if self.tick_seconds <= 0.0 {
            return Err(SimError::InvalidTick(self.tick_seconds));
        }
        if self.combatants.is_empty() {
            return Err(SimError::NoCombatants);
        }

        let mut arena = Arena::new(
            self.calculator.clone().build(),
            self.damage_types.clone().into_registry()?,
            self.status_effects.clone().into_registry()?,
            self.settings.clone(),
        );
        for template in &self.combatants {
            template.validate()?;
            arena.spawn(template.build());
        }
        for behaviour in &self.behaviours {
            for id in [&behaviour.actor, &behaviour.target] {
                if arena.get(id).is_none() {
                    return Err(SimError::UnknownCombatant(id.clone()));
                }
            }
        }
        Ok(arena)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HitRecord {
    pub time: f64,
    pub dealer: ActorId,
    pub receiver: ActorId,
    pub result: CombatResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusRecord {
    pub time: f64,
    pub actor: ActorId,
    pub event: StatusEvent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatantSummary {
    pub id: ActorId,
    pub alive: bool,
    pub health: f64,
    pub status_effects: Vec<GameplayTag>,
}

/// Everything that happened in one duel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuelReport {
    pub seed: u64,
    pub ticks: u32,
    pub elapsed: f64,
    /// The last one standing, if the duel was decided
    pub winner: Option<ActorId>,
    pub hits: Vec<HitRecord>,
    pub status_events: Vec<StatusRecord>,
    pub deaths: Vec<ActorId>,
    pub combatants: Vec<CombatantSummary>,
}

impl DuelReport {
    pub fn summary(&self) -> String {
        let outcome = match &self.winner {
            Some(winner) => format!("{} wins", winner),
            None => "no winner".to_string(),
        };
        format!(
            "{} after {:.1}s ({} hits, {} deaths)",
            outcome,
            self.elapsed,
            self.hits.len(),
            self.deaths.len()
        )
    }
}

/// Play out a scenario
///
/// Each tick, every scripted attacker whose cooldown has run out and who is
/// not busy with a reaction lowers its guard and lands its hit. The arena then
/// advances by `tick_seconds`. Stops once at most one combatant stands or
/// `max_ticks` is reached.
pub fn run_duel(scenario: &Scenario, seed: u64, max_ticks: u32) -> Result<DuelReport, SimError> {
    let mut arena = scenario.build_arena()?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let dt = scenario.tick_seconds;

    let mut cooldowns: Vec<f64> = scenario.behaviours.iter().map(|b| b.attack_interval).collect();
    let mut hits = Vec::new();
    let mut status_events = Vec::new();
    let mut deaths = Vec::new();
    let mut ticks = 0;

    info!("duel starts with {} combatants (seed {})", arena.alive_count(), seed);

    while ticks < max_ticks && arena.alive_count() > 1 {
        for (behaviour, cooldown) in scenario.behaviours.iter().zip(cooldowns.iter_mut()) {
            let target_alive = arena.get(&behaviour.target).map(|c| c.is_alive()).unwrap_or(false);
            let Some(actor) = arena.get_mut(&behaviour.actor) else {
                continue;
            };
            if !actor.is_alive() || !target_alive {
                continue;
            }
            if behaviour.guard && !actor.is_defending() {
                actor.start_defending();
            }

            *cooldown -= dt;
            if *cooldown > 0.0 || actor.actions.is_performing_action() {
                continue;
            }
            actor.stop_defending();

            let time = arena.elapsed();
            if let Some(result) = arena.apply_hit(&behaviour.actor, &behaviour.target, &behaviour.hit, &mut rng) {
                debug!("{:.2}s {} -> {}: {}", time, behaviour.actor, behaviour.target, result.summary());
                if result.is_killing_blow {
                    deaths.push(behaviour.target.clone());
                }
                hits.push(HitRecord {
                    time,
                    dealer: behaviour.actor.clone(),
                    receiver: behaviour.target.clone(),
                    result,
                });
            }
            *cooldown += behaviour.attack_interval;
        }

        let report = arena.tick(dt);
        let time = arena.elapsed();
        for (actor, event) in report.status_events {
            status_events.push(StatusRecord { time, actor, event });
        }
        deaths.extend(report.deaths);
        ticks += 1;
    }

    let survivors: Vec<&ActorId> = arena.combatants().filter(|c| c.is_alive()).map(|c| &c.id).collect();
    let winner = match survivors.as_slice() {
        [only] => Some((*only).clone()),
        _ => None,
    };
    let combatants = arena
        .combatants()
        .map(|c| CombatantSummary {
            id: c.id.clone(),
            alive: c.is_alive(),
            health: c.health(arena.settings()),
            status_effects: c.status_effects.active_tags(),
        })
        .collect();

    let report = DuelReport {
        seed,
        ticks,
        elapsed: arena.elapsed(),
        winner,
        hits,
        status_events,
        deaths,
        combatants,
    };
    info!("{}", report.summary());
    Ok(report)
}
