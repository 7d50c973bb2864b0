//! Structure constants: the λ-brackets of generator pairs.
//!
//! The caller describes the bracket `[a_λ b]` of every ordered pair of
//! generators as a polynomial in λ whose coefficients are linear
//! combinations of (divided-power) derivatives of generators:
//!
//! ```text
//! [a_λ b] = Σ_j λ^j/j! · Σ_t  c_t · T^(d_t) g_t
//! ```
//!
//! Pairs with zero bracket are simply omitted. Skew-symmetry and the
//! Jacobi identity are the caller's contract; the table is lifted once
//! at construction and never re-verified.
//!
//! At lift time every central generator `C` is replaced by
//! `central_parameter(C) · |0>` (and `T C` by zero), so the lifted
//! table lives entirely inside the enveloping algebra.

use crate::element::Element;
use crate::error::Result;
use crate::generator::{CentralParameters, GeneratorTable, NameRef};
use crate::index::MonomialIndex;
use crate::scalar::Scalar;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// One term `coeff · T^(derivs) gen` of a structure constant.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OpeTerm {
    /// Generator name.
    pub gen: String,
    /// Divided-power derivative order.
    pub derivs: u64,
    /// Coefficient.
    pub coeff: Scalar,
}

/// Raw structure-constant input, keyed by ordered generator-name pairs.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OpeData {
    entries: HashMap<(String, String), BTreeMap<u64, Vec<OpeTerm>>>,
}

impl OpeData {
    /// An empty table (all brackets zero: a commutative algebra).
    pub fn new() -> Self {
        OpeData::default()
    }

    /// Set the order-`pole` coefficient of `[a_λ b]` to the sum of the
    /// given `(generator, derivative order, coefficient)` terms.
    pub fn set(&mut self, a: &str, b: &str, pole: u64, terms: &[(&str, u64, Scalar)]) -> &mut Self {
        let entry = self
            .entries
            .entry((a.to_string(), b.to_string()))
            .or_default();
        entry.insert(
            pole,
            terms
                .iter()
                .map(|(g, d, c)| OpeTerm {
                    gen: g.to_string(),
                    derivs: *d,
                    coeff: c.clone(),
                })
                .collect(),
        );
        self
    }

    pub(crate) fn entries(
        &self,
    ) -> impl Iterator<Item = (&(String, String), &BTreeMap<u64, Vec<OpeTerm>>)> {
        self.entries.iter()
    }
}

/// The lifted structure-constant table: for each ordered pair of
/// non-central slots, a finite map from pole order to an algebra
/// element. Immutable after construction.
#[derive(Clone, Debug)]
pub(crate) struct OpeTable {
    pairs: HashMap<(usize, usize), BTreeMap<u64, Element>>,
}

impl OpeTable {
    pub(crate) fn lift(
        data: &OpeData,
        table: &GeneratorTable,
        central: &CentralParameters,
    ) -> Result<Self> {
        let n = table.n_slots();
        let mut pairs: HashMap<(usize, usize), BTreeMap<u64, Element>> = HashMap::new();
        for ((a, b), poles) in data.entries() {
            let (ra, rb) = (table.resolve(a)?, table.resolve(b)?);
            let (NameRef::Slot(sa), NameRef::Slot(sb)) = (ra, rb) else {
                // brackets out of a central generator vanish in the quotient
                tracing::debug!(a = %a, b = %b, "dropping structure constants of a central pair");
                continue;
            };
            let mut lifted: BTreeMap<u64, Element> = BTreeMap::new();
            for (pole, terms) in poles {
                let mut elt = Element::zero();
                for term in terms {
                    match table.resolve(&term.gen)? {
                        NameRef::Slot(slot) => {
                            // T^(d) g is the single mode g_(-d-1)
                            elt.add_term(
                                MonomialIndex::single(n, slot, term.derivs + 1),
                                term.coeff.clone(),
                            );
                        }
                        NameRef::Central(_) => {
                            // T kills central elements
                            if term.derivs == 0 {
                                elt.add_term(
                                    MonomialIndex::vacuum(n),
                                    &term.coeff * central.get(&term.gen),
                                );
                            }
                        }
                    }
                }
                if !elt.is_zero() {
                    lifted.insert(*pole, elt);
                }
            }
            if !lifted.is_empty() {
                pairs.insert((sa, sb), lifted);
            }
        }
        Ok(OpeTable { pairs })
    }

    /// The bracket table of an ordered slot pair, if non-zero.
    pub(crate) fn pair(&self, a: usize, b: usize) -> Option<&BTreeMap<u64, Element>> {
        self.pairs.get(&(a, b))
    }
}
