//! Memoization of the hot reduction steps.
//!
//! Generators and structure constants never change after construction,
//! so results keyed by monomial indices stay valid for the lifetime of
//! the algebra instance. Each instance owns its own maps, which keeps
//! cache keys of independently configured algebras from ever colliding.
//! The maps are append-only and read-mostly behind `RwLock`s.

use crate::element::Element;
use crate::index::MonomialIndex;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

/// A single generator mode `a^slot_(-part)`.
pub(crate) type Mode = (usize, u64);

/// Per-instance memo maps for the recursive engines.
#[derive(Debug, Default)]
pub(crate) struct KernelCache {
    /// Full bracket maps of single-mode pairs.
    pair_brackets: RwLock<HashMap<(Mode, Mode), Arc<BTreeMap<u64, Element>>>>,
    /// Results of applying one negative mode to a basis monomial.
    mode_apps: RwLock<HashMap<(Mode, MonomialIndex), Arc<Element>>>,
}

impl KernelCache {
    pub(crate) fn new() -> Self {
        KernelCache::default()
    }

    pub(crate) fn get_pair(&self, key: &(Mode, Mode)) -> Option<Arc<BTreeMap<u64, Element>>> {
        self.pair_brackets.read().unwrap().get(key).cloned()
    }

    pub(crate) fn put_pair(
        &self,
        key: (Mode, Mode),
        value: BTreeMap<u64, Element>,
    ) -> Arc<BTreeMap<u64, Element>> {
        let value = Arc::new(value);
        self.pair_brackets
            .write()
            .unwrap()
            .insert(key, Arc::clone(&value));
        value
    }

    pub(crate) fn get_mode(&self, key: &(Mode, MonomialIndex)) -> Option<Arc<Element>> {
        self.mode_apps.read().unwrap().get(key).cloned()
    }

    pub(crate) fn put_mode(&self, key: (Mode, MonomialIndex), value: Element) -> Arc<Element> {
        let value = Arc::new(value);
        self.mode_apps.write().unwrap().insert(key, Arc::clone(&value));
        value
    }

    /// Number of memoized entries `(pair brackets, mode applications)`.
    pub(crate) fn sizes(&self) -> (usize, usize) {
        (
            self.pair_brackets.read().unwrap().len(),
            self.mode_apps.read().unwrap().len(),
        )
    }

    /// Drop all memoized entries.
    pub(crate) fn clear(&self) {
        self.pair_brackets.write().unwrap().clear();
        self.mode_apps.write().unwrap().clear();
    }
}
