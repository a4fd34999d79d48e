// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

// The process-wide cache of compiled automata.
//
// A `Regex` takes its automaton out of the cache when it needs one
// and gives it back when the last handle sharing it goes away, so
// recompiling a recently used pattern is free. The lock only guards
// the cache itself, matching runs on an `Arc<Automaton>` without it.

use std::sync::{Arc, Mutex, MutexGuard};

use hashbrown::HashMap;
use log::debug;
use once_cell::sync::Lazy;

use crate::{automaton::Automaton, parser::compile, syntax::PatternSyntax};

pub const DEFAULT_MAX_COST: usize = 100;

/// Identifies a compiled automaton.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct EngineKey {
    pub pattern: String,
    pub syntax: PatternSyntax,
    pub case_sensitive: bool,
}

impl EngineKey {
    pub fn new(pattern: &str, syntax: PatternSyntax, case_sensitive: bool) -> Self {
        EngineKey {
            pattern: pattern.to_owned(),
            syntax,
            case_sensitive,
        }
    }

    /// Cache cost of the automaton, longer patterns weigh more.
    pub fn cost(&self) -> usize {
        4 + self.pattern.chars().count() / 4
    }
}

struct CacheEntry {
    automaton: Arc<Automaton>,
    cost: usize,
    last_used: u64,
}

/// A cost-bounded map that evicts the least recently used entries.
pub struct EngineCache {
    entries: HashMap<EngineKey, CacheEntry>,
    total_cost: usize,
    max_cost: usize,
    tick: u64,
}

impl EngineCache {
    pub fn new(max_cost: usize) -> Self {
        EngineCache {
            entries: HashMap::new(),
            total_cost: 0,
            max_cost,
            tick: 0,
        }
    }

    /// Removes the automaton of `key` from the cache.
    pub fn take(&mut self, key: &EngineKey) -> Option<Arc<Automaton>> {
        let entry = self.entries.remove(key)?;
        self.total_cost -= entry.cost;
        Some(entry.automaton)
    }

    /// Stores the automaton, returns `false` when it is too costly to be kept.
    pub fn insert(&mut self, key: EngineKey, automaton: Arc<Automaton>) -> bool {
        let cost = key.cost();
        if let Some(old) = self.entries.remove(&key) {
            self.total_cost -= old.cost;
        }

        if cost > self.max_cost {
            debug!("pattern {:?} is too costly to be cached", key.pattern);
            return false;
        }

        self.trim(self.max_cost - cost);

        self.tick += 1;
        self.total_cost += cost;
        self.entries.insert(
            key,
            CacheEntry {
                automaton,
                cost,
                last_used: self.tick,
            },
        );
        true
    }

    pub fn set_max_cost(&mut self, max_cost: usize) {
        self.max_cost = max_cost;
        self.trim(max_cost);
    }

    pub fn max_cost(&self) -> usize {
        self.max_cost
    }

    pub fn total_cost(&self) -> usize {
        self.total_cost
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &EngineKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.total_cost = 0;
    }

    // evicts the oldest entries until the total cost is at most `limit`
    fn trim(&mut self, limit: usize) {
        while self.total_cost > limit {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(key, _)| key.clone());

            let Some(key) = oldest else {
                break;
            };

            if let Some(entry) = self.entries.remove(&key) {
                debug!("evicting pattern {:?} from the engine cache", key.pattern);
                self.total_cost -= entry.cost;
            }
        }
    }
}

static GLOBAL_CACHE: Lazy<Mutex<EngineCache>> =
    Lazy::new(|| Mutex::new(EngineCache::new(DEFAULT_MAX_COST)));

fn lock() -> MutexGuard<'static, EngineCache> {
    GLOBAL_CACHE
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Returns the automaton for `key`, from the cache or freshly compiled.
pub fn acquire(key: &EngineKey) -> Arc<Automaton> {
    if let Some(automaton) = lock().take(key) {
        debug!("engine cache hit: {:?}", key.pattern);
        return automaton;
    }

    debug!("engine cache miss: {:?}", key.pattern);
    Arc::new(compile(key))
}

/// Called by a handle that is about to drop its reference, the automaton
/// is cached only if no other handle still shares it.
pub fn release(key: &EngineKey, automaton: &Arc<Automaton>) {
    let mut cache = lock();
    if Arc::strong_count(automaton) == 1 {
        cache.insert(key.clone(), Arc::clone(automaton));
    }
}

pub fn set_max_cost(max_cost: usize) {
    lock().set_max_cost(max_cost);
}

pub fn max_cost() -> usize {
    lock().max_cost()
}

pub fn clear() {
    lock().clear();
}

pub fn len() -> usize {
    lock().len()
}
