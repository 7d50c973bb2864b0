//! Mode-notation rendering of elements, for diagnostics and demos.
//!
//! A part `p` in a slot of weight `w` prints as the shifted mode
//! `name_-(p+w-1)`, so the weight-2 Virasoro monomial `[[1, 1]]`
//! renders as `L_-2L_-2|0>`. Ungraded algebras fall back to the raw
//! mode order `name_(-p)`.

use crate::element::Element;
use crate::scalar::qi;
use crate::VertexAlgebra;
use num_traits::{One, Signed};

impl VertexAlgebra {
    /// Render an element in shifted-mode notation.
    pub fn fmt_element(&self, x: &Element) -> String {
        if x.is_zero() {
            return "0".to_string();
        }
        let mut out = String::new();
        for (i, (idx, c)) in x.terms().enumerate() {
            let neg = c.is_negative();
            let mag = if neg { -c.clone() } else { c.clone() };
            if i == 0 {
                if neg {
                    out.push('-');
                }
            } else {
                out.push_str(if neg { " - " } else { " + " });
            }
            let mono = self.fmt_monomial(idx);
            if mag.is_one() {
                out.push_str(&mono);
            } else {
                out.push_str(&format!("{}*{}", mag, mono));
            }
        }
        out
    }

    fn fmt_monomial(&self, idx: &crate::index::MonomialIndex) -> String {
        if idx.is_vacuum() {
            return "|0>".to_string();
        }
        let mut s = String::new();
        for (slot, parts) in idx.slots().iter().enumerate() {
            let name = self.table.slot_name(slot);
            for &p in parts {
                if self.table.is_graded() {
                    let mode = -(qi(p as i64) + self.table.weight(slot) - qi(1));
                    s.push_str(&format!("{}_{}", name, mode));
                } else {
                    s.push_str(&format!("{}_(-{})", name, p));
                }
            }
        }
        s.push_str("|0>");
        s
    }
}
