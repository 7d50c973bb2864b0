//! The grading and singularity layer: conformal weight, shifted
//! modes, the singular-vector test, and the degree-by-degree
//! singular-vector search.
//!
//! Everything here requires the algebra to be conformally graded; the
//! capability is resolved once at construction, and ungraded instances
//! fail these entry points with [`VoaError::NotGraded`].

use crate::element::Element;
use crate::error::{Result, VoaError};
use crate::index::{indices_of_energy, MonomialIndex};
use crate::linalg;
use crate::scalar::{qi, Scalar};
use crate::VertexAlgebra;
use num_traits::{Signed, ToPrimitive, Zero};
use std::collections::HashMap;

impl VertexAlgebra {
    /// The conformal weight of a homogeneous element.
    ///
    /// Fails on the zero element, on mixed-weight input, and on
    /// ungraded algebras.
    pub fn weight(&self, x: &Element) -> Result<Scalar> {
        if !self.table.is_graded() {
            return Err(VoaError::NotGraded);
        }
        let weights = self.table.weights();
        let mut it = x.terms();
        let Some((first, _)) = it.next() else {
            return Err(VoaError::NotHomogeneous(
                "the zero element has no conformal weight".to_string(),
            ));
        };
        let w = first.energy(&weights);
        for (idx, _) in it {
            if idx.energy(&weights) != w {
                return Err(VoaError::NotHomogeneous(format!(
                    "monomials of weight {} and {} are mixed",
                    w,
                    idx.energy(&weights)
                )));
            }
        }
        Ok(w)
    }

    /// Whether the element is homogeneous (the zero element is).
    pub fn is_homogeneous(&self, x: &Element) -> bool {
        x.is_zero() || self.weight(x).is_ok()
    }

    /// The shifted product `x_n y = x_(n + wt(x) - 1) y`, graded of
    /// degree `-n`. Zero when the underlying mode is not integral.
    pub fn shifted_product(&self, x: &Element, y: &Element, n: &Scalar) -> Result<Element> {
        let w = self.weight(x)?;
        let m = n + &w - qi(1);
        if !m.is_integer() {
            return Ok(Element::zero());
        }
        let m = m.to_integer().to_i64().expect("mode order out of range");
        Ok(self.nmode_apply(x, m, y))
    }

    /// Whether `x` is a singular vector: annihilated by every strictly
    /// positive shifted mode of every generator. Requires `x`
    /// homogeneous.
    pub fn is_singular(&self, x: &Element) -> Result<bool> {
        if x.is_zero() {
            return Ok(true);
        }
        self.weight(x)?;
        for slot in 0..self.table.n_slots() {
            let g = self.generator(slot);
            let threshold = self.table.weight(slot) - qi(1);
            for (m, v) in self.bracket(&g, x) {
                // mode m is the shifted mode m - wt + 1
                if qi(m as i64) > threshold && !v.is_zero() {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    /// The monomial basis of the weight-`n` graded piece, in
    /// lexicographic order.
    pub(crate) fn graded_basis(&self, n: &Scalar) -> Result<Vec<MonomialIndex>> {
        if !self.table.is_graded() {
            return Err(VoaError::NotGraded);
        }
        Ok(indices_of_energy(
            &self.table.weights(),
            &self.table.strict_flags(),
            n,
        ))
    }

    /// Dimension of the weight-`n` graded piece.
    pub fn graded_dimension(&self, n: &Scalar) -> Result<usize> {
        Ok(self.graded_basis(n)?.len())
    }

    /// Dimensions of the integer-weight graded pieces `0..=ord`.
    pub fn hilbert_series(&self, ord: u64) -> Result<Vec<usize>> {
        (0..=ord)
            .map(|t| self.graded_dimension(&qi(t as i64)))
            .collect()
    }

    /// A basis of the singular vectors of weight `n`.
    ///
    /// Builds the matrix of every strictly positive shifted generator
    /// mode from the weight-`n` piece into the lower pieces and
    /// returns its exact left kernel, lifted back to elements and
    /// echelonized (leading coefficient 1). Each call works degree by
    /// degree with no caching of graded pieces across calls.
    pub fn find_singular(&self, n: &Scalar) -> Result<Vec<Element>> {
        let basis = self.graded_basis(n)?;
        if basis.is_empty() {
            return Ok(Vec::new());
        }
        let mut rows: Vec<Vec<Scalar>> = vec![Vec::new(); basis.len()];
        for slot in 0..self.table.n_slots() {
            let g = self.generator(slot);
            let wg = self.table.weight(slot).clone();
            let brackets: Vec<_> = basis
                .iter()
                .map(|idx| self.bracket(&g, &Element::of_index(idx.clone())))
                .collect();
            // smallest integer mode that is a positive shifted mode
            let mut m = (&wg - qi(1)).floor().to_integer().to_i64().unwrap() + 1;
            loop {
                let target = n - (qi(m) - &wg + qi(1));
                if target.is_negative() {
                    break;
                }
                let tbasis = self.graded_basis(&target)?;
                if !tbasis.is_empty() {
                    let pos: HashMap<&MonomialIndex, usize> =
                        tbasis.iter().enumerate().map(|(i, k)| (k, i)).collect();
                    for (row, br) in rows.iter_mut().zip(brackets.iter()) {
                        let start = row.len();
                        row.extend(std::iter::repeat_with(Scalar::zero).take(tbasis.len()));
                        if let Some(img) = br.get(&(m as u64)) {
                            for (idx, c) in img.terms() {
                                let j = *pos.get(idx).expect("image escapes its graded piece");
                                row[start + j] = c.clone();
                            }
                        }
                    }
                }
                m += 1;
            }
        }
        tracing::debug!(
            dim = basis.len(),
            constraints = rows[0].len(),
            weight = %n,
            "singular vector elimination"
        );
        let kernel = linalg::left_kernel_basis(&rows);
        Ok(kernel
            .into_iter()
            .map(|coeffs| {
                let mut e = Element::zero();
                for (idx, c) in basis.iter().zip(coeffs) {
                    e.add_term(idx.clone(), c);
                }
                e
            })
            .collect())
    }
}
