//! The λ-bracket engine.
//!
//! `bracket(x, y)` returns the finite family `{ n ↦ x_(n)y }` of all
//! non-negative mode products with a non-zero result. Arbitrary
//! elements are reduced to the structure-constant table through four
//! structural rules, dispatched on the [`Shape`] of each monomial:
//!
//! 1. both sides bare modes — the structure-table combinatorial sum;
//! 2. left bare, right composite — the non-commutative Wick formula;
//! 3. left composite, right bare — skew-symmetry, flipping into 2;
//! 4. both composite — the normal-ordered-product mode expansion of
//!    the left word (negative modes realized through `T` and the
//!    product engine).
//!
//! Every recursive call strictly decreases the combined PBW filtration
//! degree of the pair, which is what guarantees termination.

use crate::cache::Mode;
use crate::element::Element;
use crate::index::{MonomialIndex, Shape};
use crate::scalar::{binomial, factorial_q, sign_pow, Scalar};
use crate::VertexAlgebra;
use std::collections::BTreeMap;
use std::sync::Arc;

fn add_entry(out: &mut BTreeMap<u64, Element>, n: u64, v: Element) {
    if v.is_zero() {
        return;
    }
    match out.get_mut(&n) {
        Some(e) => *e += &v,
        None => {
            out.insert(n, v);
        }
    }
}

fn prune(mut out: BTreeMap<u64, Element>) -> BTreeMap<u64, Element> {
    out.retain(|_, v| !v.is_zero());
    out
}

impl VertexAlgebra {
    /// The λ-bracket `{ n ↦ x_(n)y }` of two elements, as a finite map
    /// with no zero entries.
    pub fn bracket(&self, x: &Element, y: &Element) -> BTreeMap<u64, Element> {
        let mut out = BTreeMap::new();
        for (ix, cx) in x.terms() {
            for (iy, cy) in y.terms() {
                let c = cx * cy;
                for (n, v) in self.bracket_mono(ix, iy) {
                    add_entry(&mut out, n, v.scaled(&c));
                }
            }
        }
        prune(out)
    }

    fn bracket_mono(&self, ix: &MonomialIndex, iy: &MonomialIndex) -> BTreeMap<u64, Element> {
        match (ix.shape(), iy.shape()) {
            // non-negative modes of anything kill the vacuum, and the
            // vacuum has no non-negative modes
            (Shape::Vacuum, _) | (_, Shape::Vacuum) => BTreeMap::new(),
            (
                Shape::SingleMode { slot: a, part: g },
                Shape::SingleMode { slot: b, part: h },
            ) => (*self.pair_bracket((a, g), (b, h))).clone(),
            (Shape::SingleMode { slot, part }, Shape::Composite { .. }) => {
                self.wick(slot, part, iy)
            }
            (Shape::Composite { .. }, Shape::SingleMode { .. }) => self.skew(ix, iy),
            (Shape::Composite { slot, part, rest }, Shape::Composite { .. }) => {
                self.left_peel(slot, part, &rest, iy)
            }
        }
    }

    /// Bracket of two bare modes `T^(k)a` and `T^(m)b` via the
    /// structure-constant table:
    ///
    /// ```text
    /// (T^(k)a)_(l) T^(m)b
    ///   = (-1)^k/k! Σ_j  l!/((l-k-j)!·j!) · T^(m+k+j-l) s_ab[j]
    /// ```
    ///
    /// with `j` running over table keys between `l-m-k` and `l-k`.
    /// Memoized per instance.
    pub(crate) fn pair_bracket(&self, a: Mode, b: Mode) -> Arc<BTreeMap<u64, Element>> {
        let key = (a, b);
        if let Some(hit) = self.cache.get_pair(&key) {
            return hit;
        }
        let ((sa, ga), (sb, gb)) = (a, b);
        let (k, m) = (ga - 1, gb - 1);
        let mut out = BTreeMap::new();
        if let Some(s) = self.ope.pair(sa, sb) {
            let pole = *s.keys().next_back().expect("lifted table entries are non-empty");
            let front = sign_pow(k) / factorial_q(k);
            for l in 0..=(m + k + pole) {
                let mut acc = Element::zero();
                for (j, e) in s {
                    if *j + k > l || *j + m + k < l {
                        continue;
                    }
                    let d = m + k + j - l;
                    let w = factorial_q(l) / (factorial_q(l - k - j) * factorial_q(*j));
                    acc += &self.translate_divided(e, d).scaled(&w);
                }
                let acc = acc.scaled(&front);
                if !acc.is_zero() {
                    out.insert(l, acc);
                }
            }
        }
        self.cache.put_pair(key, out)
    }

    /// Non-commutative Wick formula for `x = a_(-g)` against the word
    /// `y = g'·rest`:
    ///
    /// ```text
    /// x_(n)y = (x_(n)g')·rest ± g'·(x_(n)rest)
    ///          + Σ_{k≥0} C(n, k+1)·(x_(n-k-1)g')_(k) rest
    /// ```
    fn wick(&self, slot: usize, part: u64, iy: &MonomialIndex) -> BTreeMap<u64, Element> {
        let ((b, h), rest) = iy.peel_front().expect("wick needs a composite right operand");
        let rest_elt = Element::of_index(rest);
        let bxg = self.pair_bracket((slot, part), (b, h));
        let mut out = BTreeMap::new();
        for (n, z) in bxg.iter() {
            add_entry(&mut out, *n, self.mul(z, &rest_elt));
        }
        let x_elt = Element::of_index(MonomialIndex::single(self.n_slots(), slot, part));
        let sgn = self.slot_pair_sign(slot, b);
        for (n, z) in self.bracket(&x_elt, &rest_elt) {
            add_entry(&mut out, n, self.apply_mode(b, h, &z).scaled(&sgn));
        }
        // the "integral" term of the Wick formula
        for (m, z) in bxg.iter() {
            for (k, v) in self.bracket(z, &rest_elt) {
                let c = Scalar::from_integer(binomial(m + k + 1, k + 1));
                add_entry(&mut out, m + k + 1, v.scaled(&c));
            }
        }
        prune(out)
    }

    /// Skew-symmetry: `x_(n)y = ±Σ_{i≥n} (-1)^{i+1} T^(i-n)(y_(i)x)`,
    /// used when `y` is a bare mode; the flipped call lands in the
    /// Wick case and is strictly smaller in PBW filtration.
    fn skew(&self, ix: &MonomialIndex, iy: &MonomialIndex) -> BTreeMap<u64, Element> {
        let sgn = self.index_pair_sign(ix, iy);
        let mut out = BTreeMap::new();
        for (i, v) in self.bracket_mono(iy, ix) {
            let c = &sgn * sign_pow(i + 1);
            for n in 0..=i {
                add_entry(&mut out, n, self.translate_divided(&v, i - n).scaled(&c));
            }
        }
        prune(out)
    }

    /// Mode expansion of the left word `x = g·rest` for a composite
    /// right operand:
    ///
    /// ```text
    /// x_(n)y = Σ_{j≥0} g_(-1-j)(rest_(n+j)y)
    ///          ± Σ_{j≥0} rest_(n-1-j)(g_(j)y)
    /// ```
    fn left_peel(
        &self,
        slot: usize,
        part: u64,
        rest: &MonomialIndex,
        iy: &MonomialIndex,
    ) -> BTreeMap<u64, Element> {
        let g_elt = Element::of_index(MonomialIndex::single(self.n_slots(), slot, part));
        let rest_elt = Element::of_index(rest.clone());
        let y_elt = Element::of_index(iy.clone());
        let mut out = BTreeMap::new();
        for (m, w) in self.bracket(&rest_elt, &y_elt) {
            for j in 0..=m {
                add_entry(
                    &mut out,
                    m - j,
                    self.mul(&self.translate_divided(&g_elt, j), &w),
                );
            }
        }
        let sgn = self.slot_index_sign(slot, rest);
        for (j, u) in self.bracket(&g_elt, &y_elt) {
            for (m, v) in self.bracket(&rest_elt, &u) {
                add_entry(&mut out, m + 1 + j, v.scaled(&sgn));
            }
            for d in 0..=j {
                add_entry(
                    &mut out,
                    j - d,
                    self.mul(&self.translate_divided(&rest_elt, d), &u).scaled(&sgn),
                );
            }
        }
        prune(out)
    }
}
