//! Ally-healing selector.

use super::eligibility::{EligibilityReason, assess};
use super::rules::{HealReason, HealVerdict, evaluate, self_gate};
use super::urgency::urgency;
use super::cheapest_usable;
use crate::action::Action;
use crate::clock::Timestamp;
use crate::config::{AbilityTier, Configuration};
use crate::context::Context;
use crate::env::AgentEnv;
use crate::priority::PriorityArbiter;
use crate::resources::ResourceSnapshot;
use crate::tiers::{Tier, TierChain};
use crate::types::{CreatureRef, Point3};

/// An ally accepted by the rule table, with everything the remedy tiers need.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealCandidate {
    pub creature: CreatureRef,
    pub name: String,
    pub hp_pct: u8,
    /// Tiles between the agent and the ally.
    pub distance: u32,
    pub position: Point3,
    pub urgency: u8,
    pub eligibility: EligibilityReason,
    /// Custom hp threshold from the allow-list, if any.
    pub threshold: Option<u8>,
    pub needs_mana: bool,
    pub reason: HealReason,
}

/// Last scan's result, reused until it expires or an ally's health changes.
#[derive(Clone, Debug, Default)]
pub struct HealScanCache {
    best: Option<HealCandidate>,
    /// Distances of every ally the last scan accepted.
    accepted: Vec<u32>,
    scanned_at: Timestamp,
}

impl HealScanCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invalidate(&mut self) {
        if self.best.take().is_some() {
            tracing::trace!("heal scan cache invalidated");
        }
        self.accepted.clear();
    }

    pub fn best(&self) -> Option<&HealCandidate> {
        self.best.as_ref()
    }

    /// Number of accepted allies within `range` tiles at the last scan.
    pub fn accepted_within(&self, range: u32) -> usize {
        self.accepted.iter().filter(|&&d| d <= range).count()
    }

    fn fresh(&self, now: Timestamp, ttl_ms: u64) -> Option<&HealCandidate> {
        self.best
            .as_ref()
            .filter(|_| now.elapsed_since(self.scanned_at) < ttl_ms)
    }

    fn store(&mut self, best: Option<HealCandidate>, accepted: Vec<u32>, now: Timestamp) {
        self.best = best;
        self.accepted = accepted;
        self.scanned_at = now;
    }
}

/// Finds the most urgent eligible ally and picks a remedy for it.
#[derive(Clone, Debug)]
pub struct AllyHealSelector<'c> {
    config: &'c Configuration,
    arbiter: PriorityArbiter,
}

impl<'c> AllyHealSelector<'c> {
    pub fn new(config: &'c Configuration) -> Self {
        Self {
            config,
            arbiter: PriorityArbiter::new(config),
        }
    }

    /// Returns the ally most in need of healing, if the agent can afford to help.
    ///
    /// A candidate found within the last `rescan_interval_ms` is revalidated
    /// against fresh health data instead of rescanning. Creatures whose data
    /// cannot be resolved are skipped.
    pub fn find_best_target(
        &self,
        ctx: &mut Context,
        env: AgentEnv<'_>,
        snapshot: &ResourceSnapshot,
        now: Timestamp,
    ) -> Option<HealCandidate> {
        let thresholds = &self.config.thresholds;
        if let Some(reason) = self_gate(thresholds, snapshot.hp_pct) {
            tracing::debug!("ally heal declined: {} (self hp {}%)", reason, snapshot.hp_pct);
            return None;
        }
        let self_pos = env.entities.self_position()?;

        let ttl = self.config.heal.rescan_interval_ms;
        if let Some(cached) = ctx.heal_cache.fresh(now, ttl).cloned() {
            if let Some(candidate) = self.revalidate(cached, env, self_pos, snapshot.hp_pct) {
                return Some(candidate);
            }
            ctx.heal_cache.invalidate();
        }

        let (best, accepted) = self.scan(env, self_pos, snapshot.hp_pct);
        match &best {
            Some(candidate) => tracing::debug!(
                "heal target {} ({}) hp={}% urgency={} reason={}",
                candidate.name,
                candidate.creature,
                candidate.hp_pct,
                candidate.urgency,
                candidate.reason
            ),
            None => tracing::trace!("no ally needs healing"),
        }
        ctx.heal_cache.store(best.clone(), accepted, now);
        best
    }

    /// Picks a remedy for `candidate`.
    ///
    /// Tiers, first satisfied wins: custom, strong, standard, area, item, mana.
    /// Inside a tier the cheapest affordable, ready and in-range remedy is used.
    pub fn plan_heal(
        &self,
        candidate: &HealCandidate,
        ctx: &mut Context,
        env: AgentEnv<'_>,
        snapshot: &ResourceSnapshot,
        now: Timestamp,
    ) -> Option<Action> {
        if self_gate(&self.config.thresholds, snapshot.hp_pct).is_some() {
            return None;
        }
        if !self.arbiter.can_heal(&ctx.backoff, now) {
            tracing::debug!("heal concern backed off");
            return None;
        }

        let mut pass = RemedyPass {
            config: self.config,
            ctx,
            env,
            candidate,
            mana: snapshot.mp,
            now,
        };
        let tiers = [
            Tier::new("custom", custom_remedy),
            Tier::new("strong", strong_remedy),
            Tier::new("standard", standard_remedy),
            Tier::new("area", area_remedy),
            Tier::new("item", item_remedy),
            Tier::new("mana", mana_remedy),
        ];
        let (tier, action) = TierChain::new("ally_heal", &tiers).first_satisfied(&mut pass)?;
        tracing::debug!("ally heal via {} remedy: {}", tier, action);
        Some(action)
    }

    /// Convenience wrapper: best target, then its remedy.
    pub fn plan(
        &self,
        ctx: &mut Context,
        env: AgentEnv<'_>,
        snapshot: &ResourceSnapshot,
        now: Timestamp,
    ) -> Option<Action> {
        let candidate = self.find_best_target(ctx, env, snapshot, now)?;
        self.plan_heal(&candidate, ctx, env, snapshot, now)
    }

    fn scan(
        &self,
        env: AgentEnv<'_>,
        self_pos: Point3,
        self_hp: u8,
    ) -> (Option<HealCandidate>, Vec<u32>) {
        let mut best: Option<HealCandidate> = None;
        let mut accepted = Vec::new();

        for creature in env.entities.visible_creatures(self.config.heal.scan_radius) {
            let Some(candidate) = self.consider(env, creature, self_pos, self_hp) else {
                continue;
            };
            accepted.push(candidate.distance);
            if best
                .as_ref()
                .is_none_or(|current| candidate.urgency > current.urgency)
            {
                best = Some(candidate);
            }
        }

        (best, accepted)
    }

    /// Builds a candidate for `creature` if it is an eligible ally the rules accept.
    fn consider(
        &self,
        env: AgentEnv<'_>,
        creature: CreatureRef,
        self_pos: Point3,
        self_hp: u8,
    ) -> Option<HealCandidate> {
        let name = env.entities.name(creature)?;
        let eligibility = assess(&self.config.heal, env, creature, &name)?;
        let hp_pct = env.entities.health_percent(creature)?;
        let position = env.entities.position(creature)?;
        let distance = self_pos.distance(position)?;
        let score = urgency(hp_pct, distance);

        match evaluate(
            &self.config.thresholds,
            self_hp,
            hp_pct,
            eligibility.threshold,
            score,
        ) {
            HealVerdict::Heal(reason) => Some(HealCandidate {
                creature,
                name,
                hp_pct,
                distance,
                position,
                urgency: score,
                eligibility: eligibility.reason,
                threshold: eligibility.threshold,
                needs_mana: eligibility.restore_mana,
                reason,
            }),
            HealVerdict::Decline(reason) => {
                tracing::trace!("skipping {} ({}%): {}", name, hp_pct, reason);
                None
            }
        }
    }

    /// Refreshes a cached candidate's health and position and re-applies the rules.
    fn revalidate(
        &self,
        mut candidate: HealCandidate,
        env: AgentEnv<'_>,
        self_pos: Point3,
        self_hp: u8,
    ) -> Option<HealCandidate> {
        let hp_pct = env.entities.health_percent(candidate.creature)?;
        let position = env.entities.position(candidate.creature)?;
        let distance = self_pos.distance(position)?;
        if distance > self.config.heal.scan_radius {
            return None;
        }

        candidate.hp_pct = hp_pct;
        candidate.position = position;
        candidate.distance = distance;
        candidate.urgency = urgency(hp_pct, distance);

        match evaluate(
            &self.config.thresholds,
            self_hp,
            hp_pct,
            candidate.threshold,
            candidate.urgency,
        ) {
            HealVerdict::Heal(reason) => {
                candidate.reason = reason;
                Some(candidate)
            }
            HealVerdict::Decline(_) => None,
        }
    }
}

// ============================================================================
// Remedy tiers
// ============================================================================

struct RemedyPass<'p, 'e> {
    config: &'p Configuration,
    ctx: &'p mut Context,
    env: AgentEnv<'e>,
    candidate: &'p HealCandidate,
    mana: u32,
    now: Timestamp,
}

impl RemedyPass<'_, '_> {
    fn spell(&mut self, tier: AbilityTier) -> Option<Action> {
        let remedy = cheapest_usable(
            self.config,
            tier,
            &mut self.ctx.cooldowns,
            self.env.cooldowns,
            self.mana,
            Some(self.candidate.distance),
            self.now,
        )?;
        Some(Action::HealSpell {
            id: remedy.id,
            target_name: self.candidate.name.clone(),
            cost: remedy.cost,
        })
    }

    fn item(&mut self, tier: AbilityTier) -> Option<Action> {
        let remedy = cheapest_usable(
            self.config,
            tier,
            &mut self.ctx.cooldowns,
            self.env.cooldowns,
            self.mana,
            Some(self.candidate.distance),
            self.now,
        )?;
        Some(Action::HealItem {
            id: remedy.id,
            target: self.candidate.creature,
        })
    }
}

fn custom_remedy(pass: &mut RemedyPass<'_, '_>) -> Option<Action> {
    pass.candidate.threshold?;
    pass.spell(AbilityTier::CustomRemedy)
}

fn strong_remedy(pass: &mut RemedyPass<'_, '_>) -> Option<Action> {
    if pass.candidate.hp_pct >= pass.config.heal.strong_below_hp {
        return None;
    }
    pass.spell(AbilityTier::StrongRemedy)
}

fn standard_remedy(pass: &mut RemedyPass<'_, '_>) -> Option<Action> {
    pass.spell(AbilityTier::StandardRemedy)
}

fn area_remedy(pass: &mut RemedyPass<'_, '_>) -> Option<Action> {
    let needed = pass.config.heal.area_min_allies as usize;
    let mut remedies: Vec<_> = pass.config.abilities_in(AbilityTier::AreaRemedy).collect();
    remedies.sort_by_key(|remedy| remedy.cost);

    for remedy in remedies {
        if pass.ctx.heal_cache.accepted_within(remedy.range) < needed
            || remedy.cost > pass.mana
            || pass.candidate.distance > remedy.range
        {
            continue;
        }
        if pass
            .ctx
            .cooldowns
            .can_use(remedy.id, remedy.group, pass.env.cooldowns, pass.now)
        {
            return Some(Action::HealSpell {
                id: remedy.id,
                target_name: pass.candidate.name.clone(),
                cost: remedy.cost,
            });
        }
    }
    None
}

fn item_remedy(pass: &mut RemedyPass<'_, '_>) -> Option<Action> {
    let self_pos = pass.env.entities.self_position()?;
    if !pass
        .env
        .entities
        .has_line_of_effect(self_pos, pass.candidate.position)
    {
        return None;
    }
    pass.item(AbilityTier::ItemRemedy)
}

fn mana_remedy(pass: &mut RemedyPass<'_, '_>) -> Option<Action> {
    if !pass.candidate.needs_mana {
        return None;
    }
    pass.item(AbilityTier::ManaRemedy)
}
