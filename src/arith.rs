// SPDX-License-Identifier: MIT OR Apache-2.0

//! Overflow-checked arithmetic for size and offset computations.
//!
//! Device path node lengths come from untrusted buffers, so every size
//! computation in this crate routes through these helpers rather than bare
//! `+`/`-`/`*`.

use crate::{Error, Result};

/// Checked addition.
pub fn add(a: usize, b: usize) -> Result<usize> {
    a.checked_add(b).ok_or(Error::ArithmeticOverflow)
}

/// Checked subtraction.
pub fn sub(a: usize, b: usize) -> Result<usize> {
    a.checked_sub(b).ok_or(Error::ArithmeticOverflow)
}

/// Checked multiplication.
pub fn mul(a: usize, b: usize) -> Result<usize> {
    a.checked_mul(b).ok_or(Error::ArithmeticOverflow)
}

/// Total node length for a payload of `payload` bytes, as the `u16` the
/// node header stores. Fails if the result does not fit.
pub(crate) fn node_len(payload: usize) -> Result<u16> {
    let total = add(payload, crate::path::HEADER_SIZE)?;
    u16::try_from(total).map_err(|_| Error::ArithmeticOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_ops() {
        assert_eq!(add(2, 3), Ok(5));
        assert_eq!(add(usize::MAX, 1), Err(Error::ArithmeticOverflow));
        assert_eq!(sub(3, 2), Ok(1));
        assert_eq!(sub(2, 3), Err(Error::ArithmeticOverflow));
        assert_eq!(mul(6, 7), Ok(42));
        assert_eq!(mul(usize::MAX, 2), Err(Error::ArithmeticOverflow));
    }

    #[test]
    fn test_node_len() {
        assert_eq!(node_len(2), Ok(6));
        assert_eq!(node_len(usize::from(u16::MAX)), Err(Error::ArithmeticOverflow));
    }
}
