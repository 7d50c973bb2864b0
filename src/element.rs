//! Algebra elements: finite linear combinations of PBW monomials.
//!
//! An [`Element`] is a finite map from [`MonomialIndex`] to a non-zero
//! [`Scalar`] coefficient. The empty map is the additive zero; the map
//! `{vacuum ↦ 1}` is the multiplicative identity of the normal-ordered
//! product. Elements are immutable value types: every kernel operation
//! returns a new element and never mutates its arguments, so they can
//! be shared, cached and compared freely.

use crate::index::MonomialIndex;
use crate::scalar::Scalar;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::{Add, AddAssign, Neg, Sub};

/// A finite linear combination of PBW monomials with exact rational
/// coefficients. Zero coefficients are never stored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    terms: BTreeMap<MonomialIndex, Scalar>,
}

impl Element {
    /// The additive zero.
    pub fn zero() -> Self {
        Element {
            terms: BTreeMap::new(),
        }
    }

    /// The vacuum vector on `n_slots` generator slots.
    pub fn vacuum(n_slots: usize) -> Self {
        Element::monomial(MonomialIndex::vacuum(n_slots), Scalar::from_integer(1.into()))
    }

    /// A single monomial with the given coefficient (zero collapses to
    /// the zero element).
    pub fn monomial(index: MonomialIndex, coeff: Scalar) -> Self {
        let mut terms = BTreeMap::new();
        if !coeff.is_zero() {
            terms.insert(index, coeff);
        }
        Element { terms }
    }

    /// A monomial with coefficient one.
    pub fn of_index(index: MonomialIndex) -> Self {
        Element::monomial(index, Scalar::from_integer(1.into()))
    }

    /// Whether this is the zero element.
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Number of monomials with non-zero coefficient.
    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Iterate over `(index, coefficient)` pairs in index order.
    pub fn terms(&self) -> impl Iterator<Item = (&MonomialIndex, &Scalar)> {
        self.terms.iter()
    }

    /// The coefficient of a monomial, if present.
    pub fn coeff(&self, index: &MonomialIndex) -> Option<&Scalar> {
        self.terms.get(index)
    }

    /// Whether this element is a single monomial (or zero).
    pub fn is_monomial(&self) -> bool {
        self.terms.len() <= 1
    }

    /// Accumulate `coeff` onto `index`, dropping the entry if the sum
    /// cancels.
    pub fn add_term(&mut self, index: MonomialIndex, coeff: Scalar) {
        if coeff.is_zero() {
            return;
        }
        match self.terms.get_mut(&index) {
            Some(c) => {
                *c += coeff;
                if c.is_zero() {
                    self.terms.remove(&index);
                }
            }
            None => {
                self.terms.insert(index, coeff);
            }
        }
    }

    /// This element scaled by `c`.
    pub fn scaled(&self, c: &Scalar) -> Element {
        if c.is_zero() {
            return Element::zero();
        }
        Element {
            terms: self
                .terms
                .iter()
                .map(|(k, v)| (k.clone(), v * c))
                .collect(),
        }
    }

    /// PBW filtration degree: the maximal number of modes over the
    /// monomials, `-1` for the zero element (strictly below every
    /// non-negative degree).
    pub fn pbw_filtration_degree(&self) -> i64 {
        self.terms
            .keys()
            .map(|k| k.depth() as i64)
            .max()
            .unwrap_or(-1)
    }

    /// Li filtration degree: the minimal [`MonomialIndex::li_degree`]
    /// over the monomials; `None` (= +∞) for the zero element.
    pub fn li_filtration_degree(&self) -> Option<u64> {
        self.terms.keys().map(|k| k.li_degree()).min()
    }

    /// The part of this element sitting in the lowest Li stratum: the
    /// sub-sum of monomials attaining [`Self::li_filtration_degree`].
    pub fn li_leading_terms(&self) -> Element {
        let Some(d) = self.li_filtration_degree() else {
            return Element::zero();
        };
        Element {
            terms: self
                .terms
                .iter()
                .filter(|(k, _)| k.li_degree() == d)
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }
}

impl Add for &Element {
    type Output = Element;

    fn add(self, rhs: &Element) -> Element {
        let mut out = self.clone();
        out += rhs;
        out
    }
}

impl AddAssign<&Element> for Element {
    fn add_assign(&mut self, rhs: &Element) {
        for (k, v) in &rhs.terms {
            self.add_term(k.clone(), v.clone());
        }
    }
}

impl Sub for &Element {
    type Output = Element;

    fn sub(self, rhs: &Element) -> Element {
        let mut out = self.clone();
        for (k, v) in &rhs.terms {
            out.add_term(k.clone(), -v.clone());
        }
        out
    }
}

impl Neg for &Element {
    type Output = Element;

    fn neg(self) -> Element {
        Element {
            terms: self
                .terms
                .iter()
                .map(|(k, v)| (k.clone(), -v.clone()))
                .collect(),
        }
    }
}
