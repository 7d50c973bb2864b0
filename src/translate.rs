//! The translation operator `T`.
//!
//! `T` is the formal derivative of the state-field correspondence: it
//! kills the vacuum and acts on modes by `[T, a_(-p)] = p·a_(-p-1)`.
//! The public entry point returns the full power `T^n x`; the engines
//! use the divided power `T^(n) = T^n/n!`, which is the normalization
//! appearing in every reduction formula.

use crate::element::Element;
use crate::error::{Result, VoaError};
use crate::index::{MonomialIndex, Shape};
use crate::scalar::{factorial_q, qi};
use crate::VertexAlgebra;

impl VertexAlgebra {
    /// The `n`-th derivative `T^n x`.
    ///
    /// `translate(x, 0)` is `x`; negative orders are rejected.
    pub fn translate(&self, x: &Element, n: i64) -> Result<Element> {
        if n < 0 {
            return Err(VoaError::NegativeDerivativeOrder(n));
        }
        let mut out = x.clone();
        for _ in 0..n {
            out = self.t_once(&out);
        }
        Ok(out)
    }

    /// The divided power `T^(n) x = T^n x / n!`.
    pub(crate) fn translate_divided(&self, x: &Element, n: u64) -> Element {
        if n == 0 {
            return x.clone();
        }
        let mut out = x.clone();
        for _ in 0..n {
            out = self.t_once(&out);
        }
        out.scaled(&factorial_q(n).recip())
    }

    pub(crate) fn t_once(&self, x: &Element) -> Element {
        let mut out = Element::zero();
        for (ix, c) in x.terms() {
            out += &self.t_once_mono(ix).scaled(c);
        }
        out
    }

    fn t_once_mono(&self, ix: &MonomialIndex) -> Element {
        match ix.shape() {
            Shape::Vacuum => Element::zero(),
            Shape::SingleMode { slot, part } => Element::monomial(
                MonomialIndex::single(ix.n_slots(), slot, part + 1),
                qi(part as i64),
            ),
            Shape::Composite { slot, part, rest } => {
                // derivation over the word: shift the leading mode,
                // then recurse into the remainder
                let rest_elt = Element::of_index(rest);
                let shifted = self
                    .apply_mode(slot, part + 1, &rest_elt)
                    .scaled(&qi(part as i64));
                let inner = self.apply_mode(slot, part, &self.t_once(&rest_elt));
                &shifted + &inner
            }
        }
    }
}
