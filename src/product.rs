//! The normal-ordered product engine.
//!
//! `mul(x, y)` returns `:xy:` expressed in the PBW basis. The
//! reduction has two layers:
//!
//! - **single-mode application** `a_(-g)·y`: a direct front insertion
//!   when the slot/part order admits it (the cheap, associative path),
//!   otherwise a commutator correction swapping the two leading modes,
//!   `a_(-g)b_(-h) = ±b_(-h)a_(-g) + Σ_k C(-g,k)·(a_(k)b)_(-g-h-k)`,
//!   with the odd-square reduction when an odd generator meets its own
//!   equal part;
//! - **quasi-associativity** for a composite left word `x = g·rest`:
//!   `x·y = g·(rest·y) + Σ_j (T^(j+1)g)·(rest_(j)y)
//!   ± Σ_j (T^(j+1)rest)·(g_(j)y)`.
//!
//! Every branch strictly lowers the PBW filtration degree of the left
//! operand, so the recursion bottoms out at bare-mode insertions.

use crate::element::Element;
use crate::generator::Parity;
use crate::index::{MonomialIndex, Shape};
use crate::scalar::{binomial_signed, qq, Scalar};
use crate::VertexAlgebra;
use std::sync::Arc;

impl VertexAlgebra {
    /// The normal-ordered product `:xy:`.
    pub fn mul(&self, x: &Element, y: &Element) -> Element {
        let mut out = Element::zero();
        for (ix, cx) in x.terms() {
            for (iy, cy) in y.terms() {
                out += &self.mul_mono(ix, iy).scaled(&(cx * cy));
            }
        }
        out
    }

    /// The `n`-th product `x_(n)y` for an arbitrary integer `n`:
    /// non-negative orders come from the λ-bracket, negative orders
    /// from `x_(-d-1)y = (T^(d)x)·y`.
    pub fn nproduct(&self, x: &Element, y: &Element, n: i64) -> Element {
        self.nmode_apply(x, n, y)
    }

    pub(crate) fn nmode_apply(&self, u: &Element, n: i64, v: &Element) -> Element {
        if n >= 0 {
            self.bracket(u, v)
                .remove(&(n as u64))
                .unwrap_or_else(Element::zero)
        } else {
            let d = (-n - 1) as u64;
            self.mul(&self.translate_divided(u, d), v)
        }
    }

    fn mul_mono(&self, ix: &MonomialIndex, iy: &MonomialIndex) -> Element {
        match ix.shape() {
            Shape::Vacuum => Element::of_index(iy.clone()),
            Shape::SingleMode { slot, part } => (*self.apply_mode_mono(slot, part, iy)).clone(),
            Shape::Composite { slot, part, rest } => {
                if iy.is_vacuum() {
                    return Element::of_index(ix.clone());
                }
                // quasi-associativity: x = g·rest
                let g_elt =
                    Element::of_index(MonomialIndex::single(self.n_slots(), slot, part));
                let rest_elt = Element::of_index(rest.clone());
                let y_elt = Element::of_index(iy.clone());
                let mut out = self.apply_mode(slot, part, &self.mul(&rest_elt, &y_elt));
                let sgn = self.slot_index_sign(slot, &rest);
                for (j, w) in self.bracket(&rest_elt, &y_elt) {
                    out += &self.mul(&self.translate_divided(&g_elt, j + 1), &w);
                }
                for (j, w) in self.bracket(&g_elt, &y_elt) {
                    out += &self
                        .mul(&self.translate_divided(&rest_elt, j + 1), &w)
                        .scaled(&sgn);
                }
                out
            }
        }
    }

    /// Apply the mode `a^slot_(-part)` to an element.
    pub(crate) fn apply_mode(&self, slot: usize, part: u64, v: &Element) -> Element {
        let mut out = Element::zero();
        for (iy, c) in v.terms() {
            out += &self.apply_mode_mono(slot, part, iy).scaled(c);
        }
        out
    }

    fn apply_mode_mono(&self, slot: usize, part: u64, iy: &MonomialIndex) -> Arc<Element> {
        let key = ((slot, part), iy.clone());
        if let Some(hit) = self.cache.get_mode(&key) {
            return hit;
        }
        let result = self.apply_mode_uncached(slot, part, iy);
        self.cache.put_mode(key, result)
    }

    fn apply_mode_uncached(&self, slot: usize, part: u64, iy: &MonomialIndex) -> Element {
        let Some(((b, h), rest)) = iy.peel_front() else {
            return Element::of_index(MonomialIndex::single(self.n_slots(), slot, part));
        };
        let odd = self.table.parity(slot) == Parity::Odd;
        let square = odd && slot == b && part == h;
        if (slot < b || (slot == b && part >= h)) && !square {
            // normal order holds: plain front insertion
            return Element::of_index(iy.with_front(slot, part));
        }
        let rest_elt = Element::of_index(rest);
        if square {
            // odd square: a_(-g)a_(-g) = ½ Σ_k C(-g,k)·(a_(k)a)_(-2g-k)
            let mut out = Element::zero();
            let pb = self.pair_bracket((slot, 1), (slot, 1));
            for (k, u) in pb.iter() {
                let c = Scalar::from_integer(binomial_signed(-(part as i64), *k)) * qq(1, 2);
                let mode = -(2 * part as i64) - *k as i64;
                out += &self.nmode_apply(u, mode, &rest_elt).scaled(&c);
            }
            return out;
        }
        // order violated: commute the two leading modes
        let sgn = self.slot_pair_sign(slot, b);
        let inner = self.apply_mode(slot, part, &rest_elt);
        let mut out = self.apply_mode(b, h, &inner).scaled(&sgn);
        let pb = self.pair_bracket((slot, 1), (b, 1));
        for (k, u) in pb.iter() {
            let c = Scalar::from_integer(binomial_signed(-(part as i64), *k));
            let mode = -(part as i64) - h as i64 - *k as i64;
            out += &self.nmode_apply(u, mode, &rest_elt).scaled(&c);
        }
        out
    }
}
