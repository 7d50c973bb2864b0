//! Monomial indices for the PBW basis: energy partition tuples.
//!
//! A PBW monomial is indexed by one partition per (non-central)
//! generator slot. A part `p ≥ 1` in slot `i` stands for the mode
//! `a^i_(-p)` of the `i`-th generator, and the monomial is the operator
//! word obtained by reading slots in increasing order, parts
//! non-increasing within each slot, applied to the vacuum. For an odd
//! generator the parts must be *strictly* decreasing.
//!
//! When the algebra is graded, a part `p` in a slot of conformal weight
//! `w` contributes energy `p + w - 1`, so the energy of a partition `λ`
//! is `|λ| + len(λ)·(w - 1)`. Graded pieces are finite-dimensional and
//! enumerable, which is what the singular-vector driver relies on.

use crate::scalar::{qi, Scalar};
use num_traits::{Signed, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

/// Index of a PBW basis monomial: one partition per generator slot.
///
/// Indices are immutable values ordered lexicographically (slot by
/// slot, then part by part); this is the order used for graded-piece
/// bases and for element term storage.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonomialIndex(Vec<Vec<u64>>);

impl MonomialIndex {
    /// The empty index on `n_slots` slots: the vacuum monomial.
    pub fn vacuum(n_slots: usize) -> Self {
        MonomialIndex(vec![Vec::new(); n_slots])
    }

    /// The single-mode index `a^slot_(-part)`.
    pub fn single(n_slots: usize, slot: usize, part: u64) -> Self {
        debug_assert!(slot < n_slots && part >= 1);
        let mut slots = vec![Vec::new(); n_slots];
        slots[slot].push(part);
        MonomialIndex(slots)
    }

    /// Build from raw per-slot part lists. The caller is responsible
    /// for ordering and regularity; the public validated path is
    /// [`crate::VertexAlgebra::element`].
    pub(crate) fn from_parts(slots: Vec<Vec<u64>>) -> Self {
        MonomialIndex(slots)
    }

    /// The per-slot partitions.
    pub fn slots(&self) -> &[Vec<u64>] {
        &self.0
    }

    /// Number of generator slots.
    pub fn n_slots(&self) -> usize {
        self.0.len()
    }

    /// Whether this is the vacuum index (no modes at all).
    pub fn is_vacuum(&self) -> bool {
        self.0.iter().all(|p| p.is_empty())
    }

    /// Total number of modes in the word (the PBW depth).
    pub fn depth(&self) -> usize {
        self.0.iter().map(|p| p.len()).sum()
    }

    /// Sum of all parts.
    pub fn size(&self) -> u64 {
        self.0.iter().flatten().sum()
    }

    /// Li filtration degree of the monomial: one unit for every shift
    /// beyond the minimal `(-1)` mode, i.e. `size - depth`.
    pub fn li_degree(&self) -> u64 {
        self.size() - self.depth() as u64
    }

    /// The leading (leftmost) mode of the word: first non-empty slot
    /// and its largest part. `None` for the vacuum.
    pub fn front(&self) -> Option<(usize, u64)> {
        self.0
            .iter()
            .enumerate()
            .find(|(_, p)| !p.is_empty())
            .map(|(i, p)| (i, p[0]))
    }

    /// Split off the leading mode: `(mode, remainder)`.
    pub fn peel_front(&self) -> Option<((usize, u64), MonomialIndex)> {
        let (slot, part) = self.front()?;
        let mut rest = self.0.clone();
        rest[slot].remove(0);
        Some(((slot, part), MonomialIndex(rest)))
    }

    /// Prepend a mode to a slot without checking normal order.
    pub(crate) fn with_front(&self, slot: usize, part: u64) -> Self {
        let mut slots = self.0.clone();
        slots[slot].insert(0, part);
        MonomialIndex(slots)
    }

    /// Structural classification used by the recursive engines. Each
    /// reduction rule matches exhaustively on this shape instead of
    /// inspecting the raw slots.
    pub fn shape(&self) -> Shape {
        match self.peel_front() {
            None => Shape::Vacuum,
            Some(((slot, part), rest)) => {
                if rest.is_vacuum() {
                    Shape::SingleMode { slot, part }
                } else {
                    Shape::Composite {
                        slot,
                        part,
                        rest,
                    }
                }
            }
        }
    }

    /// Conformal energy of the monomial given per-slot weights.
    pub fn energy(&self, weights: &[Scalar]) -> Scalar {
        let mut e = Scalar::zero();
        for (slot, parts) in self.0.iter().enumerate() {
            let shift = &weights[slot] - qi(1);
            for &p in parts {
                e += qi(p as i64) + shift.clone();
            }
        }
        e
    }
}

/// Structural shape of a monomial index: the vacuum, a bare generator
/// mode `a_(-part)`, or a word `a_(-part)·rest` with a non-trivial
/// remainder.
#[derive(Clone, Debug)]
pub enum Shape {
    /// No modes: the vacuum monomial.
    Vacuum,
    /// Exactly one mode.
    SingleMode {
        /// Generator slot of the mode.
        slot: usize,
        /// Part `p` of the mode `a_(-p)`.
        part: u64,
    },
    /// Leading mode followed by a non-empty remainder word.
    Composite {
        /// Generator slot of the leading mode.
        slot: usize,
        /// Part of the leading mode.
        part: u64,
        /// The remainder of the word.
        rest: MonomialIndex,
    },
}

/// All partitions of the given energy for one slot of weight `w`;
/// `strict` forbids repeated parts (odd generators).
pub(crate) fn partitions_of_energy(w: &Scalar, strict: bool, energy: &Scalar) -> Vec<Vec<u64>> {
    let mut out = Vec::new();
    let mut prefix = Vec::new();
    rec_exact(w, strict, energy, u64::MAX, &mut prefix, &mut out);
    out
}

fn rec_exact(
    w: &Scalar,
    strict: bool,
    remaining: &Scalar,
    max_part: u64,
    prefix: &mut Vec<u64>,
    out: &mut Vec<Vec<u64>>,
) {
    if remaining.is_zero() {
        out.push(prefix.clone());
        return;
    }
    if remaining.is_negative() {
        return;
    }
    // part energy is p + w - 1, so p ≤ remaining - w + 1
    let bound = (remaining - w + qi(1)).floor();
    let Some(bound) = bound.to_integer().to_u64() else {
        return;
    };
    let hi = bound.min(max_part);
    for p in (1..=hi).rev() {
        let rest = remaining - qi(p as i64) - w + qi(1);
        let next_max = if strict { p - 1 } else { p };
        prefix.push(p);
        rec_exact(w, strict, &rest, next_max, prefix, out);
        prefix.pop();
    }
}

/// All partitions of energy at most `budget`, together with their
/// energies. Used when convolving slots of a partition tuple.
fn partitions_up_to(w: &Scalar, strict: bool, budget: &Scalar) -> Vec<(Vec<u64>, Scalar)> {
    let mut out = Vec::new();
    let mut prefix = Vec::new();
    rec_up_to(w, strict, budget, u64::MAX, &Scalar::zero(), &mut prefix, &mut out);
    out
}

#[allow(clippy::too_many_arguments)]
fn rec_up_to(
    w: &Scalar,
    strict: bool,
    budget: &Scalar,
    max_part: u64,
    used: &Scalar,
    prefix: &mut Vec<u64>,
    out: &mut Vec<(Vec<u64>, Scalar)>,
) {
    out.push((prefix.clone(), used.clone()));
    let bound = (budget - w + qi(1)).floor();
    let Some(bound) = bound.to_integer().to_u64() else {
        return;
    };
    let hi = bound.min(max_part);
    for p in (1..=hi).rev() {
        let cost = qi(p as i64) + w - qi(1);
        let rest = budget - &cost;
        if rest.is_negative() {
            continue;
        }
        let next_max = if strict { p - 1 } else { p };
        prefix.push(p);
        rec_up_to(w, strict, &rest, next_max, &(used + &cost), prefix, out);
        prefix.pop();
    }
}

/// Enumerate every monomial index of the given total energy, sorted
/// lexicographically. `weights[i]` and `strict[i]` describe slot `i`.
pub(crate) fn indices_of_energy(
    weights: &[Scalar],
    strict: &[bool],
    energy: &Scalar,
) -> Vec<MonomialIndex> {
    if energy.is_negative() {
        return Vec::new();
    }
    let mut out = Vec::new();
    let mut chosen: Vec<Vec<u64>> = Vec::with_capacity(weights.len());
    rec_slots(weights, strict, 0, energy, &mut chosen, &mut out);
    out.sort();
    out
}

fn rec_slots(
    weights: &[Scalar],
    strict: &[bool],
    slot: usize,
    remaining: &Scalar,
    chosen: &mut Vec<Vec<u64>>,
    out: &mut Vec<MonomialIndex>,
) {
    if slot == weights.len() {
        if remaining.is_zero() {
            out.push(MonomialIndex::from_parts(chosen.clone()));
        }
        return;
    }
    if slot + 1 == weights.len() {
        // last slot must absorb the remainder exactly
        for parts in partitions_of_energy(&weights[slot], strict[slot], remaining) {
            chosen.push(parts);
            out.push(MonomialIndex::from_parts(chosen.clone()));
            chosen.pop();
        }
        return;
    }
    for (parts, used) in partitions_up_to(&weights[slot], strict[slot], remaining) {
        chosen.push(parts);
        rec_slots(weights, strict, slot + 1, &(remaining - &used), chosen, out);
        chosen.pop();
    }
}
