//! Resource cache: memoized view of the agent's health and mana.

use crate::clock::Timestamp;
use crate::env::ResourceOracle;

/// Point-in-time view of the agent's health and mana.
///
/// Percentages are derived once per change, never at read time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceSnapshot {
    pub hp: u32,
    pub hp_max: u32,
    pub hp_pct: u8,
    pub mp: u32,
    pub mp_max: u32,
    pub mp_pct: u8,
    pub last_update: Timestamp,
}

impl ResourceSnapshot {
    /// Snapshot used before anything was observed: full health, full mana.
    pub const SAFE: Self = Self {
        hp: 0,
        hp_max: 0,
        hp_pct: 100,
        mp: 0,
        mp_max: 0,
        mp_pct: 100,
        last_update: Timestamp::ZERO,
    };
}

impl Default for ResourceSnapshot {
    fn default() -> Self {
        Self::SAFE
    }
}

/// `floor(current * 100 / max)`, capped at 100. A zero maximum reads as full.
pub fn percent(current: u32, max: u32) -> u8 {
    if max == 0 {
        return 100;
    }
    let pct = u64::from(current) * 100 / u64::from(max);
    pct.min(100) as u8
}

/// Owns the agent's [`ResourceSnapshot`].
///
/// Updated either by pushed events ([`set_health`](Self::set_health),
/// [`set_mana`](Self::set_mana)) or by [`refresh`](Self::refresh), which polls
/// the raw accessor at most once per staleness window.
#[derive(Clone, Debug)]
pub struct ResourceCache {
    snapshot: ResourceSnapshot,
    observed: bool,
    stale_after_ms: u64,
    revision: u64,
}

impl ResourceCache {
    pub fn new(stale_after_ms: u64) -> Self {
        Self {
            snapshot: ResourceSnapshot::SAFE,
            observed: false,
            stale_after_ms,
            revision: 0,
        }
    }

    pub fn snapshot(&self) -> ResourceSnapshot {
        self.snapshot
    }

    /// Returns true once real data has been seen.
    pub fn has_observed(&self) -> bool {
        self.observed
    }

    /// Number of times a percentage was recomputed.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_health(&mut self, hp: u32, hp_max: u32, now: Timestamp) {
        self.observed = true;
        self.snapshot.last_update = now;
        if self.snapshot.hp == hp && self.snapshot.hp_max == hp_max {
            return;
        }
        self.snapshot.hp = hp;
        self.snapshot.hp_max = hp_max;
        self.snapshot.hp_pct = percent(hp, hp_max);
        self.revision += 1;
    }

    pub fn set_mana(&mut self, mp: u32, mp_max: u32, now: Timestamp) {
        self.observed = true;
        self.snapshot.last_update = now;
        if self.snapshot.mp == mp && self.snapshot.mp_max == mp_max {
            return;
        }
        self.snapshot.mp = mp;
        self.snapshot.mp_max = mp_max;
        self.snapshot.mp_pct = percent(mp, mp_max);
        self.revision += 1;
    }

    /// Returns a snapshot no older than the staleness bound.
    ///
    /// Polls `oracle` only when the cached snapshot is stale. A failing oracle
    /// leaves the previous snapshot (or the safe default) in place.
    pub fn refresh(&mut self, oracle: &dyn ResourceOracle, now: Timestamp) -> ResourceSnapshot {
        if self.observed && now.elapsed_since(self.snapshot.last_update) < self.stale_after_ms {
            return self.snapshot;
        }

        match oracle.agent_health() {
            Ok((hp, hp_max)) => self.set_health(hp, hp_max, now),
            Err(err) => tracing::warn!(
                "health unavailable, keeping {}% from {}: {}",
                self.snapshot.hp_pct,
                self.snapshot.last_update,
                err
            ),
        }
        match oracle.agent_mana() {
            Ok((mp, mp_max)) => self.set_mana(mp, mp_max, now),
            Err(err) => tracing::warn!(
                "mana unavailable, keeping {}% from {}: {}",
                self.snapshot.mp_pct,
                self.snapshot.last_update,
                err
            ),
        }

        self.snapshot
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::env::ProviderError;

    struct Gauges {
        health: Mutex<Result<(u32, u32), ProviderError>>,
        mana: Mutex<Result<(u32, u32), ProviderError>>,
        calls: Mutex<u32>,
    }

    impl Gauges {
        fn new(health: (u32, u32), mana: (u32, u32)) -> Self {
            Self {
                health: Mutex::new(Ok(health)),
                mana: Mutex::new(Ok(mana)),
                calls: Mutex::new(0),
            }
        }

        fn offline() -> Self {
            let gauges = Self::new((0, 0), (0, 0));
            *gauges.health.lock().unwrap() = Err(ProviderError::Unavailable("health"));
            *gauges.mana.lock().unwrap() = Err(ProviderError::Unavailable("mana"));
            gauges
        }
    }

    impl ResourceOracle for Gauges {
        fn agent_health(&self) -> Result<(u32, u32), ProviderError> {
            *self.calls.lock().unwrap() += 1;
            self.health.lock().unwrap().clone()
        }

        fn agent_mana(&self) -> Result<(u32, u32), ProviderError> {
            self.mana.lock().unwrap().clone()
        }
    }

    #[test]
    fn percent_floors_and_caps() {
        assert_eq!(percent(333, 1000), 33);
        assert_eq!(percent(999, 1000), 99);
        assert_eq!(percent(1000, 1000), 100);
        assert_eq!(percent(1500, 1000), 100);
        assert_eq!(percent(0, 1000), 0);
        assert_eq!(percent(10, 0), 100);
        assert_eq!(percent(u32::MAX, u32::MAX), 100);
    }

    #[test]
    fn refresh_reads_oracle_once_per_window() {
        let mut cache = ResourceCache::new(50);
        let oracle = Gauges::new((400, 1000), (30, 60));

        let snap = cache.refresh(&oracle, Timestamp(0));
        assert_eq!(snap.hp_pct, 40);
        assert_eq!(snap.mp_pct, 50);

        cache.refresh(&oracle, Timestamp(49));
        assert_eq!(*oracle.calls.lock().unwrap(), 1);

        cache.refresh(&oracle, Timestamp(50));
        assert_eq!(*oracle.calls.lock().unwrap(), 2);
    }

    #[test]
    fn pushed_values_are_visible_immediately() {
        let mut cache = ResourceCache::new(50);
        let oracle = Gauges::new((1000, 1000), (100, 100));
        cache.refresh(&oracle, Timestamp(0));

        cache.set_health(150, 1000, Timestamp(10));
        let snap = cache.refresh(&oracle, Timestamp(20));
        assert_eq!(snap.hp_pct, 15);
        assert_eq!(snap.last_update, Timestamp(10));
    }

    #[test]
    fn unchanged_values_skip_recompute() {
        let mut cache = ResourceCache::new(50);
        cache.set_health(500, 1000, Timestamp(0));
        let rev = cache.revision();

        cache.set_health(500, 1000, Timestamp(5));
        assert_eq!(cache.revision(), rev);
        assert_eq!(cache.snapshot().last_update, Timestamp(5));

        cache.set_health(499, 1000, Timestamp(6));
        assert_eq!(cache.revision(), rev + 1);
        assert_eq!(cache.snapshot().hp_pct, 49);
    }

    #[test]
    fn unavailable_provider_keeps_safe_snapshot() {
        let mut cache = ResourceCache::new(50);
        let snap = cache.refresh(&Gauges::offline(), Timestamp(0));
        assert_eq!(snap.hp_pct, 100);
        assert_eq!(snap.mp_pct, 100);
        assert!(!cache.has_observed());
    }

    #[test]
    fn unavailable_provider_keeps_last_known() {
        let mut cache = ResourceCache::new(50);
        cache.refresh(&Gauges::new((300, 1000), (10, 100)), Timestamp(0));

        let snap = cache.refresh(&Gauges::offline(), Timestamp(100));
        assert_eq!(snap.hp_pct, 30);
        assert_eq!(snap.mp_pct, 10);
    }
}
