use std::fmt;

use num_bigint::BigUint;

/// A value the tree can index, store and hash.
///
/// The arbitrary-precision integer returned by [`BigIntish::to_big_int`] is
/// the canonical representation: two values are the same node iff their
/// integers are equal.
pub trait BigIntish: Clone + PartialEq + fmt::Debug + fmt::Display {
    /// Canonical integer form of the value
    fn to_big_int(&self) -> BigUint;
}

impl BigIntish for BigUint {
    fn to_big_int(&self) -> BigUint {
        self.clone()
    }
}
