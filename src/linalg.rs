//! Exact linear algebra over ℚ for the singular-vector driver.

use crate::scalar::Scalar;
use num_traits::{One, Zero};

/// Basis of the left kernel `{ x : x·M = 0 }` of the matrix whose rows
/// are given, computed by exact Gaussian elimination on the tableau
/// `[M | I]`. The result is in reduced row echelon form (first
/// non-zero entry of each vector is 1).
pub(crate) fn left_kernel_basis(rows: &[Vec<Scalar>]) -> Vec<Vec<Scalar>> {
    let nrows = rows.len();
    if nrows == 0 {
        return Vec::new();
    }
    let ncols = rows[0].len();
    let mut tab: Vec<Vec<Scalar>> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| {
            debug_assert_eq!(r.len(), ncols);
            let mut row = r.clone();
            row.extend((0..nrows).map(|j| if i == j { Scalar::one() } else { Scalar::zero() }));
            row
        })
        .collect();
    let mut used = vec![false; nrows];
    for col in 0..ncols {
        let Some(p) = (0..nrows).find(|&r| !used[r] && !tab[r][col].is_zero()) else {
            continue;
        };
        used[p] = true;
        let inv = tab[p][col].clone().recip();
        for v in tab[p].iter_mut() {
            *v = &*v * &inv;
        }
        let pivot = tab[p].clone();
        for (r, row) in tab.iter_mut().enumerate() {
            if r == p || row[col].is_zero() {
                continue;
            }
            let f = row[col].clone();
            for (v, pv) in row.iter_mut().zip(pivot.iter()) {
                *v = &*v - &(pv * &f);
            }
        }
    }
    let mut kernel: Vec<Vec<Scalar>> = (0..nrows)
        .filter(|&r| !used[r])
        .map(|r| tab[r][ncols..].to_vec())
        .collect();
    rref(&mut kernel);
    kernel
}

/// Reduce to row echelon form in place, dropping zero rows.
pub(crate) fn rref(mat: &mut Vec<Vec<Scalar>>) {
    if mat.is_empty() {
        return;
    }
    let nrows = mat.len();
    let ncols = mat[0].len();
    let mut pivot_row = 0;
    for col in 0..ncols {
        if pivot_row == nrows {
            break;
        }
        let Some(p) = (pivot_row..nrows).find(|&r| !mat[r][col].is_zero()) else {
            continue;
        };
        mat.swap(pivot_row, p);
        let inv = mat[pivot_row][col].clone().recip();
        for v in mat[pivot_row].iter_mut() {
            *v = &*v * &inv;
        }
        let pivot = mat[pivot_row].clone();
        for (r, row) in mat.iter_mut().enumerate() {
            if r == pivot_row || row[col].is_zero() {
                continue;
            }
            let f = row[col].clone();
            for (v, pv) in row.iter_mut().zip(pivot.iter()) {
                *v = &*v - &(pv * &f);
            }
        }
        pivot_row += 1;
    }
    mat.retain(|row| row.iter().any(|v| !v.is_zero()));
}
