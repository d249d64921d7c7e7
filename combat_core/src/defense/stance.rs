//! DefenseStance - Blocking, parrying and countering
//!
//! The stance is Idle or Defending. Two gates sit on top of it: the parry gate
//! (opened by `start_parry`) turns the next block into a parry, and the counter
//! window turns it into a counter attack. Whether a hit is blocked depends on
//! the equipped block profile, the hit's direction and damage class, what the
//! receiver is busy doing and how much of the damaged resource is left.

use super::block::{BlockProfile, GuardSlot, Loadout};
use crate::ability::AbilitySystem;
use crate::actions::ActionState;
use crate::damage::{DamageEvent, DamageTypeRegistry};
use crate::stat_block::{ModifierHandle, StatBlock};
use crate::tag::GameplayTag;
use crate::types::{ActionPriority, ActorId, Placement};
use glam::Vec3;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// The resource worn down while blocking
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "tag", rename_all = "snake_case")]
pub enum DamagedResource {
    #[default]
    None,
    /// A StatBlock statistic (stamina)
    Statistic(GameplayTag),
    /// An AbilitySystem attribute (posture)
    Attribute(GameplayTag),
}

impl DamagedResource {
    pub fn tag(&self) -> Option<&GameplayTag> {
        match self {
            DamagedResource::None => None,
            DamagedResource::Statistic(tag) | DamagedResource::Attribute(tag) => Some(tag),
        }
    }

    /// Current amount left, None when unconfigured or the owner lacks it
    pub fn value(&self, stats: &StatBlock, abilities: &AbilitySystem) -> Option<f64> {
        match self {
            DamagedResource::None => None,
            DamagedResource::Statistic(tag) => stats.statistic(tag).map(|s| s.current),
            DamagedResource::Attribute(tag) => abilities.try_numeric(tag),
        }
    }
}

/// Tunables of a defense stance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefenseStanceConfig {
    #[serde(default = "default_min_resource")]
    pub min_damaged_resource_to_start_blocking: f64,
    #[serde(default = "default_block_action")]
    pub block_action: GameplayTag,
    #[serde(default)]
    pub block_action_priority: ActionPriority,
    #[serde(default)]
    pub defense_break_action: GameplayTag,
    #[serde(default = "default_parry_action")]
    pub parry_action: GameplayTag,
    #[serde(default = "default_counter_action")]
    pub counter_action: GameplayTag,
    #[serde(default)]
    pub damaged_resource: DamagedResource,
}

fn default_min_resource() -> f64 {
    5.0
}

fn default_block_action() -> GameplayTag {
    GameplayTag::from("Actions.Block")
}

fn default_parry_action() -> GameplayTag {
    GameplayTag::from("Actions.Parry")
}

fn default_counter_action() -> GameplayTag {
    GameplayTag::from("Actions.Counter")
}

impl Default for DefenseStanceConfig {
    fn default() -> Self {
        DefenseStanceConfig {
            min_damaged_resource_to_start_blocking: default_min_resource(),
            block_action: default_block_action(),
            block_action_priority: ActionPriority::Medium,
            defense_break_action: GameplayTag::none(),
            parry_action: default_parry_action(),
            counter_action: default_counter_action(),
            damaged_resource: DamagedResource::None,
        }
    }
}

/// What happened to a hit that reached the stance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BlockOutcome {
    NotBlocked,
    Blocked(GameplayTag),
    Parried(GameplayTag),
    Countered(GameplayTag),
    /// The guard broke; carries the break reaction if one is configured
    DefenseBroken(Option<GameplayTag>),
}

impl BlockOutcome {
    /// The reaction action this outcome forces, if any
    pub fn reaction(&self) -> Option<&GameplayTag> {
        match self {
            BlockOutcome::NotBlocked | BlockOutcome::DefenseBroken(None) => None,
            BlockOutcome::Blocked(tag)
            | BlockOutcome::Parried(tag)
            | BlockOutcome::Countered(tag)
            | BlockOutcome::DefenseBroken(Some(tag)) => Some(tag),
        }
    }

    pub fn is_blocked(&self) -> bool {
        !matches!(self, BlockOutcome::NotBlocked)
    }
}

/// Notifications queued by the stance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StanceEvent {
    DefenseChanged(bool),
    DamageBlocked { dealer: Option<ActorId> },
    CounterTriggered { dealer: Option<ActorId> },
}

/// The parts of a combatant the stance reads and writes while checking a hit
pub struct Defender<'a> {
    pub stats: &'a mut StatBlock,
    pub abilities: &'a AbilitySystem,
    pub actions: &'a ActionState,
    pub placement: Option<Placement>,
}

/// Defense state of one combatant
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefenseStance {
    pub config: DefenseStanceConfig,
    #[serde(default)]
    loadout: Loadout,
    #[serde(skip)]
    defending: bool,
    #[serde(skip)]
    parry_gate: bool,
    #[serde(skip)]
    counter_gate: bool,
    /// Profile captured when defending started
    #[serde(skip)]
    current_profile: Option<BlockProfile>,
    #[serde(skip)]
    defending_modifier: Option<ModifierHandle>,
    #[serde(skip)]
    events: Vec<StanceEvent>,
}

impl DefenseStance {
    pub fn new(config: DefenseStanceConfig, loadout: Loadout) -> Self {
        DefenseStance {
            config,
            loadout,
            ..Default::default()
        }
    }

    pub fn loadout(&self) -> &Loadout {
        &self.loadout
    }

    pub fn is_defending(&self) -> bool {
        self.defending
    }

    pub fn is_parrying(&self) -> bool {
        self.parry_gate
    }

    pub fn is_counter_window_open(&self) -> bool {
        self.counter_gate
    }

    pub fn block_action(&self) -> &GameplayTag {
        &self.config.block_action
    }

    /// Profile in use: the one captured on start, else the best equipped
    pub fn active_profile(&self) -> Option<&BlockProfile> {
        self.current_profile.as_ref().or_else(|| self.loadout.best())
    }

    /// Multiplier applied to blocked damage before it hits the damaged resource
    pub fn damaged_statistic_multiplier(&self) -> f64 {
        self.active_profile()
            .map(|p| p.damaged_statistic_multiplier)
            .unwrap_or(1.0)
    }

    pub fn can_start_defending(&self, stats: &StatBlock, abilities: &AbilitySystem) -> bool {
        if self.loadout.best().is_none() {
            return false;
        }
        if self.parry_gate {
            return true;
        }
        match self.config.damaged_resource.value(stats, abilities) {
            Some(value) => value >= self.config.min_damaged_resource_to_start_blocking,
            None => true,
        }
    }

    /// Enter the defending state, applying the profile's defending modifier
    pub fn start_defending(&mut self, stats: &mut StatBlock, abilities: &AbilitySystem) -> bool {
        if self.defending {
            return true;
        }
        if !self.can_start_defending(stats, abilities) {
            return false;
        }
        let Some(profile) = self.loadout.best().cloned() else {
            return false;
        };

        if !profile.defending_modifier.is_empty() {
            self.defending_modifier = Some(stats.add_modifier(profile.defending_modifier.clone()));
        }
        self.current_profile = Some(profile);
        self.defending = true;
        self.events.push(StanceEvent::DefenseChanged(true));
        debug!("defense stance raised");
        true
    }

    pub fn stop_defending(&mut self, stats: &mut StatBlock) -> bool {
        if !self.defending {
            return false;
        }
        if let Some(handle) = self.defending_modifier.take() {
            stats.remove_modifier(handle);
        }
        self.current_profile = None;
        self.defending = false;
        self.events.push(StanceEvent::DefenseChanged(false));
        debug!("defense stance lowered");
        true
    }

    /// Whether a parry could start right now
    pub fn can_parry(&self, stats: &StatBlock, abilities: &AbilitySystem) -> bool {
        !self.parry_gate
            && self.loadout.best().map(|p| p.can_parry).unwrap_or(false)
            && self.can_start_defending(stats, abilities)
    }

    pub fn start_parry(&mut self, stats: &mut StatBlock, abilities: &AbilitySystem) -> bool {
        if !self.can_parry(stats, abilities) {
            return false;
        }
        self.parry_gate = true;
        self.start_defending(stats, abilities)
    }

    pub fn stop_parry(&mut self, stats: &mut StatBlock) {
        self.parry_gate = false;
        self.stop_defending(stats);
    }

    pub fn set_counter_window(&mut self, open: bool) {
        self.counter_gate = open;
    }

    /// Swap a block profile; defending stops so the new profile applies cleanly
    pub fn equip(&mut self, slot: GuardSlot, profile: Option<BlockProfile>, stats: &mut StatBlock) {
        self.loadout.set(slot, profile);
        self.stop_defending(stats);
    }

    /// Whether the stance can stop this hit at all
    pub fn can_block_damage(
        &self,
        event: &DamageEvent,
        defender: &Defender<'_>,
        attacker_position: Option<Vec3>,
        registry: &DamageTypeRegistry,
    ) -> bool {
        if !self.defending {
            return false;
        }
        let Some(profile) = self.current_profile.as_ref() else {
            return false;
        };
        if !profile.block_direction.allows(event.direction) {
            return false;
        }
        if let (Some(placement), Some(attacker)) = (defender.placement, attacker_position) {
            if placement.angle_to(attacker) > profile.max_block_angle_degrees {
                return false;
            }
        }
        if !defender.actions.can_execute(&self.config.block_action) {
            warn!("block action {} can't be executed", self.config.block_action);
            return false;
        }

        // Busy with something at least as important as blocking
        if let (Some(action), Some(priority)) =
            (defender.actions.current_action(), defender.actions.current_priority())
        {
            if action != &self.config.block_action
                && priority >= self.config.block_action_priority
                && !self.parry_gate
            {
                return false;
            }
        }

        match &event.damage_type {
            Some(damage_type) => registry.is_child_of_any(damage_type, &profile.blockable_damage_types),
            None => false,
        }
    }

    /// Try to stop an incoming hit of `damage`
    pub fn try_block_incoming_damage(
        &mut self,
        event: &DamageEvent,
        damage: f64,
        defender: &mut Defender<'_>,
        attacker_position: Option<Vec3>,
        registry: &DamageTypeRegistry,
    ) -> BlockOutcome {
        if !self.can_block_damage(event, defender, attacker_position, registry) {
            return BlockOutcome::NotBlocked;
        }

        let resource_cost = damage * self.damaged_statistic_multiplier();

        if self.parry_gate {
            self.events.push(StanceEvent::DamageBlocked {
                dealer: event.dealer.clone(),
            });
            return BlockOutcome::Parried(self.config.parry_action.clone());
        }
        if self.counter_gate {
            self.events.push(StanceEvent::DamageBlocked {
                dealer: event.dealer.clone(),
            });
            return BlockOutcome::Countered(self.config.counter_action.clone());
        }

        let holds = match self.config.damaged_resource.value(defender.stats, defender.abilities) {
            Some(left) => left > resource_cost,
            None => true,
        };
        if holds {
            self.events.push(StanceEvent::DamageBlocked {
                dealer: event.dealer.clone(),
            });
            return BlockOutcome::Blocked(self.config.block_action.clone());
        }

        debug!("guard broken by {:.1} damage", resource_cost);
        self.stop_defending(defender.stats);
        let reaction = Some(self.config.defense_break_action.clone()).filter(|t| t.is_valid());
        BlockOutcome::DefenseBroken(reaction)
    }

    /// Whether this hit should be answered with a counter attack
    ///
    /// `dealer_alive` is None when the dealer is unknown.
    pub fn can_counter_attack(
        &self,
        event: &DamageEvent,
        actions: &ActionState,
        dealer_alive: Option<bool>,
        registry: &DamageTypeRegistry,
    ) -> bool {
        if !self.counter_gate {
            return false;
        }
        let Some(profile) = self.active_profile() else {
            return false;
        };
        if !actions.can_execute(&self.config.counter_action) {
            return false;
        }
        let counterable = match &event.damage_type {
            Some(damage_type) => registry.is_child_of_any(damage_type, &profile.counterable_damage_types),
            None => false,
        };
        counterable && dealer_alive.unwrap_or(false)
    }

    /// Counter the hit if possible, returning the counter action
    pub fn try_counter_attack(
        &mut self,
        event: &DamageEvent,
        actions: &ActionState,
        dealer_alive: Option<bool>,
        registry: &DamageTypeRegistry,
    ) -> Option<GameplayTag> {
        if !self.can_counter_attack(event, actions, dealer_alive, registry) {
            return None;
        }
        self.events.push(StanceEvent::CounterTriggered {
            dealer: event.dealer.clone(),
        });
        Some(self.config.counter_action.clone())
    }

    pub fn drain_events(&mut self) -> Vec<StanceEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stat_block::{AttributeBonus, AttributeModifier, Statistic};
    use crate::types::{ActionDirection, Direction};

    fn stamina() -> GameplayTag {
        GameplayTag::from("Statistics.Stamina")
    }

    fn make_stance() -> DefenseStance {
        let config = DefenseStanceConfig {
            damaged_resource: DamagedResource::Statistic(stamina()),
            defense_break_action: "Actions.GuardBreak".into(),
            ..Default::default()
        };
        let loadout = Loadout {
            off_hand: Some(
                BlockProfile::blocking("DamageType.Melee")
                    .with_parry()
                    .with_counter("DamageType.Melee")
                    .with_direction(ActionDirection::Front),
            ),
            ..Default::default()
        };
        DefenseStance::new(config, loadout)
    }

    fn make_stats(stamina_left: f64) -> StatBlock {
        let mut stats = StatBlock::new().with_statistic("Statistics.Stamina", Statistic::new(100.0));
        stats.consume_statistic(&stamina(), 100.0 - stamina_left);
        stats
    }

    fn melee_front() -> DamageEvent {
        DamageEvent::new(20.0)
            .with_dealer("attacker")
            .with_receiver("defender")
            .with_damage_type("DamageType.Melee")
            .with_direction(Direction::Front)
    }

    fn block(stance: &mut DefenseStance, stats: &mut StatBlock, actions: &ActionState, event: &DamageEvent) -> BlockOutcome {
        let registry = DamageTypeRegistry::with_defaults();
        let abilities = AbilitySystem::new();
        let mut defender = Defender {
            stats,
            abilities: &abilities,
            actions,
            placement: None,
        };
        stance.try_block_incoming_damage(event, event.final_damage, &mut defender, None, &registry)
    }

    #[test]
    fn test_needs_resource_to_start() {
        let mut stance = make_stance();
        let abilities = AbilitySystem::new();

        let mut tired = make_stats(4.0);
        assert!(!stance.start_defending(&mut tired, &abilities));

        let mut rested = make_stats(50.0);
        assert!(stance.start_defending(&mut rested, &abilities));
        assert!(stance.is_defending());
        assert_eq!(stance.drain_events(), vec![StanceEvent::DefenseChanged(true)]);
    }

    #[test]
    fn test_no_profile_no_defense() {
        let mut stance = DefenseStance::new(DefenseStanceConfig::default(), Loadout::default());
        let mut stats = StatBlock::new();
        assert!(!stance.start_defending(&mut stats, &AbilitySystem::new()));
    }

    #[test]
    fn test_not_blocked_unless_defending() {
        let mut stance = make_stance();
        let mut stats = make_stats(100.0);
        let actions = ActionState::new();

        let outcome = block(&mut stance, &mut stats, &actions, &melee_front());
        assert_eq!(outcome, BlockOutcome::NotBlocked);
    }

    #[test]
    fn test_block_respects_direction_and_type() {
        let mut stance = make_stance();
        let mut stats = make_stats(100.0);
        let actions = ActionState::new();
        stance.start_defending(&mut stats, &AbilitySystem::new());

        let outcome = block(&mut stance, &mut stats, &actions, &melee_front());
        assert_eq!(outcome, BlockOutcome::Blocked("Actions.Block".into()));

        let from_behind = melee_front().with_direction(Direction::Back);
        assert_eq!(block(&mut stance, &mut stats, &actions, &from_behind), BlockOutcome::NotBlocked);

        let spell = melee_front().with_damage_type("DamageType.Spell");
        assert_eq!(block(&mut stance, &mut stats, &actions, &spell), BlockOutcome::NotBlocked);
    }

    #[test]
    fn test_block_angle_with_positions() {
        let mut stance = make_stance();
        let mut stats = make_stats(100.0);
        let abilities = AbilitySystem::new();
        let actions = ActionState::new();
        let registry = DamageTypeRegistry::with_defaults();
        stance.start_defending(&mut stats, &abilities);

        let mut defender = Defender {
            stats: &mut stats,
            abilities: &abilities,
            actions: &actions,
            placement: Some(Placement::new(Vec3::ZERO, Vec3::X)),
        };
        let event = melee_front();
        let behind = Some(Vec3::new(-3.0, 0.5, 0.0));
        let ahead = Some(Vec3::new(3.0, 0.5, 0.0));

        assert_eq!(
            stance.try_block_incoming_damage(&event, 20.0, &mut defender, behind, &registry),
            BlockOutcome::NotBlocked
        );
        assert!(stance
            .try_block_incoming_damage(&event, 20.0, &mut defender, ahead, &registry)
            .is_blocked());
    }

    #[test]
    fn test_busy_with_higher_priority_action() {
        let mut stance = make_stance();
        let mut stats = make_stats(100.0);
        stance.start_defending(&mut stats, &AbilitySystem::new());

        let mut actions = ActionState::new();
        actions.trigger("Actions.Attack".into(), ActionPriority::High);
        assert_eq!(block(&mut stance, &mut stats, &actions, &melee_front()), BlockOutcome::NotBlocked);

        actions.trigger("Actions.Block".into(), ActionPriority::High);
        assert!(block(&mut stance, &mut stats, &actions, &melee_front()).is_blocked());
    }

    #[test]
    fn test_parry_and_counter_gates() {
        let mut stance = make_stance();
        let mut stats = make_stats(100.0);
        let abilities = AbilitySystem::new();
        let actions = ActionState::new();

        assert!(stance.start_parry(&mut stats, &abilities));
        assert_eq!(
            block(&mut stance, &mut stats, &actions, &melee_front()),
            BlockOutcome::Parried("Actions.Parry".into())
        );
        stance.stop_parry(&mut stats);
        assert!(!stance.is_defending());

        stance.start_defending(&mut stats, &abilities);
        stance.set_counter_window(true);
        assert_eq!(
            block(&mut stance, &mut stats, &actions, &melee_front()),
            BlockOutcome::Countered("Actions.Counter".into())
        );
    }

    #[test]
    fn test_counter_reports_blocked_damage() {
        let mut stance = make_stance();
        let mut stats = make_stats(100.0);
        let actions = ActionState::new();
        stance.start_defending(&mut stats, &AbilitySystem::new());
        stance.set_counter_window(true);
        stance.drain_events();

        assert!(matches!(
            block(&mut stance, &mut stats, &actions, &melee_front()),
            BlockOutcome::Countered(_)
        ));
        assert_eq!(
            stance.drain_events(),
            vec![StanceEvent::DamageBlocked {
                dealer: Some("attacker".into())
            }]
        );
    }

    #[test]
    fn test_guard_breaks_when_resource_runs_out() {
        let mut stance = make_stance();
        let mut stats = make_stats(10.0);
        let actions = ActionState::new();
        stance.start_defending(&mut stats, &AbilitySystem::new());

        let outcome = block(&mut stance, &mut stats, &actions, &melee_front());
        assert_eq!(outcome, BlockOutcome::DefenseBroken(Some("Actions.GuardBreak".into())));
        assert!(!stance.is_defending());
    }

    #[test]
    fn test_defending_modifier_applied_and_removed() {
        let mut stance = make_stance();
        let mut stats = make_stats(100.0);
        let profile = BlockProfile::blocking("DamageType").with_modifier(
            AttributeModifier::new().with_bonus(AttributeBonus::flat("Attributes.BlockDefense", 40.0)),
        );
        stance.equip(GuardSlot::OffHand, Some(profile), &mut stats);

        stance.start_defending(&mut stats, &AbilitySystem::new());
        let defense = GameplayTag::from("Attributes.BlockDefense");
        assert!((stats.attribute_value(&defense) - 40.0).abs() < 1e-9);

        // swapping equipment drops the guard
        stance.equip(GuardSlot::OffHand, None, &mut stats);
        assert!(!stance.is_defending());
        assert!((stats.attribute_value(&defense) - 0.0).abs() < 1e-9);
        assert_eq!(stats.active_modifier_count(), 0);
    }

    #[test]
    fn test_counter_attack_requirements() {
        let mut stance = make_stance();
        let registry = DamageTypeRegistry::with_defaults();
        let mut actions = ActionState::new();
        let event = melee_front();

        assert_eq!(stance.try_counter_attack(&event, &actions, Some(true), &registry), None);

        stance.set_counter_window(true);
        assert_eq!(stance.try_counter_attack(&event, &actions, Some(false), &registry), None);
        assert_eq!(stance.try_counter_attack(&event, &actions, None, &registry), None);
        assert_eq!(
            stance.try_counter_attack(&event, &actions, Some(true), &registry),
            Some("Actions.Counter".into())
        );

        actions.lock("Actions.Counter".into());
        assert_eq!(stance.try_counter_attack(&event, &actions, Some(true), &registry), None);
    }
}
