//! Exact rational scalars and the combinatorial helpers the reduction
//! formulas are built from.
//!
//! All kernel arithmetic is exact: coefficients live in ℚ with
//! arbitrary-precision integers, and every factorial, binomial and
//! falling-factorial weight is computed without rounding. There is no
//! floating point anywhere in the crate.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};

/// The coefficient ring: exact rationals over big integers.
pub type Scalar = BigRational;

/// The rational `n/1`.
pub fn qi(n: i64) -> Scalar {
    Scalar::from_integer(BigInt::from(n))
}

/// The rational `n/d`.
///
/// # Panics
///
/// Panics if `d` is zero.
pub fn qq(n: i64, d: i64) -> Scalar {
    Scalar::new(BigInt::from(n), BigInt::from(d))
}

/// `n!` as a big integer.
pub fn factorial(n: u64) -> BigInt {
    let mut acc = BigInt::one();
    for k in 2..=n {
        acc *= BigInt::from(k);
    }
    acc
}

/// `n!` as a scalar.
pub fn factorial_q(n: u64) -> Scalar {
    Scalar::from_integer(factorial(n))
}

/// The binomial coefficient `C(n, k)` for non-negative `n`.
pub fn binomial(n: u64, k: u64) -> BigInt {
    if k > n {
        return BigInt::zero();
    }
    num_integer::binomial(BigInt::from(n), BigInt::from(k))
}

/// The generalized binomial coefficient `C(a, k)` for integer `a`,
/// possibly negative: `a·(a-1)···(a-k+1) / k!`.
///
/// For negative `a` this equals `(-1)^k·C(-a+k-1, k)`, the weight
/// appearing in the commutator expansion of negative modes.
pub fn binomial_signed(a: i64, k: u64) -> BigInt {
    let mut num = BigInt::one();
    for t in 0..k as i64 {
        num *= BigInt::from(a - t);
    }
    num / factorial(k)
}

/// `(-1)^k` as a scalar.
pub fn sign_pow(k: u64) -> Scalar {
    if k % 2 == 0 {
        Scalar::one()
    } else {
        -Scalar::one()
    }
}
