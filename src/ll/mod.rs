// Copyright 2015 The Ramp Developers
//
//    Licensed under the Apache License, Version 2.0 (the "License");
//    you may not use this file except in compliance with the License.
//    You may obtain a copy of the License at
//
//        http://www.apache.org/licenses/LICENSE-2.0
//
//    Unless required by applicable law or agreed to in writing, software
//    distributed under the License is distributed on an "AS IS" BASIS,
//    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//    See the License for the specific language governing permissions and
//    limitations under the License.

//! Low-level limb-vector primitives.
//!
//! Every function here works over `&[Limb]`/`&mut [Limb]` in
//! least-significant-limb-first order (index 0 is the least significant
//! limb). This is the safe, slice-based re-architecture of the raw-pointer
//! `Limbs`/`LimbsMut` adapter the window algorithm descends from: lengths
//! are checked by the caller with `debug_assert!` rather than by a
//! recoverable error, matching the "corrupt input is an invariant
//! violation" policy for this crate.

use crate::limb::Limb;
use std::cmp::Ordering;

/// `w := x + y`, for equal-length `w`, `x`, `y`. Returns the carry out.
pub fn add_n(w: &mut [Limb], x: &[Limb], y: &[Limb]) -> Limb {
    debug_assert_eq!(w.len(), x.len());
    debug_assert_eq!(w.len(), y.len());
    let mut carry = false;
    for i in 0..w.len() {
        let (v, c) = x[i].add_with_carry(y[i], carry);
        w[i] = v;
        carry = c;
    }
    Limb(carry as u64)
}

/// `w := x - y`, for equal-length `w`, `x`, `y`. Returns the borrow out.
pub fn sub_n(w: &mut [Limb], x: &[Limb], y: &[Limb]) -> Limb {
    debug_assert_eq!(w.len(), x.len());
    debug_assert_eq!(w.len(), y.len());
    let mut borrow = false;
    for i in 0..w.len() {
        let (v, b) = x[i].sub_with_borrow(y[i], borrow);
        w[i] = v;
        borrow = b;
    }
    Limb(borrow as u64)
}

/// `w := x + y`, `y` a single limb added at position 0 and carried through
/// the rest of `w`. Returns the final carry out.
pub fn add_1(w: &mut [Limb], x: &[Limb], y: Limb) -> Limb {
    debug_assert_eq!(w.len(), x.len());
    if w.is_empty() {
        return y;
    }
    let (v, mut carry) = x[0].add_overflow(y);
    w[0] = v;
    for i in 1..w.len() {
        if !carry {
            if !std::ptr::eq(w.as_ptr(), x.as_ptr()) {
                w[i..].copy_from_slice(&x[i..]);
            }
            return Limb::ZERO;
        }
        let (v, c) = x[i].add_overflow(Limb(1));
        w[i] = v;
        carry = c;
    }
    Limb(carry as u64)
}

/// `w := x - y`, `y` a single limb subtracted at position 0 and borrowed
/// through the rest of `w`. Returns the final borrow out.
pub fn sub_1(w: &mut [Limb], x: &[Limb], y: Limb) -> Limb {
    debug_assert_eq!(w.len(), x.len());
    if w.is_empty() {
        return y;
    }
    let (v, mut borrow) = x[0].sub_overflow(y);
    w[0] = v;
    for i in 1..w.len() {
        if !borrow {
            if !std::ptr::eq(w.as_ptr(), x.as_ptr()) {
                w[i..].copy_from_slice(&x[i..]);
            }
            return Limb::ZERO;
        }
        let (v, b) = x[i].sub_overflow(Limb(1));
        w[i] = v;
        borrow = b;
    }
    Limb(borrow as u64)
}

/// Adds a small carry (0 or 1) into `w` in place, starting at limb 0 and
/// propagating until it is absorbed or `w` is exhausted. Returns whatever
/// carry falls off the top (used by callers that pre-reserved header bits
/// and know it cannot happen in practice, but still want the value to
/// assert against).
pub fn incr(w: &mut [Limb], mut carry: Limb) -> Limb {
    for limb in w.iter_mut() {
        if carry.is_zero() {
            return Limb::ZERO;
        }
        let (v, c) = limb.add_overflow(carry);
        *limb = v;
        carry = Limb(c as u64);
    }
    carry
}

/// Subtracts a small borrow (0 or 1) from `w` in place.
pub fn decr(w: &mut [Limb], mut borrow: Limb) -> Limb {
    for limb in w.iter_mut() {
        if borrow.is_zero() {
            return Limb::ZERO;
        }
        let (v, b) = limb.sub_overflow(borrow);
        *limb = v;
        borrow = Limb(b as u64);
    }
    borrow
}

/// Bitwise-complements `w` in place.
pub fn complement(w: &mut [Limb]) {
    for limb in w.iter_mut() {
        *limb = !*limb;
    }
}

/// Two's-complement negation of `w` in place: complement then add one.
pub fn neg(w: &mut [Limb]) {
    complement(w);
    incr(w, Limb(1));
}

/// Zero-fills `w`.
pub fn zero(w: &mut [Limb]) {
    for limb in w.iter_mut() {
        *limb = Limb::ZERO;
    }
}

/// Whether every limb of `x` is zero.
pub fn is_zero(x: &[Limb]) -> bool {
    x.iter().all(|l| l.is_zero())
}

/// Whether every limb of `x` equals `Limb::MAX` (the all-ones pattern).
pub fn is_all_ones(x: &[Limb]) -> bool {
    x.iter().all(|l| *l == Limb::MAX)
}

/// Whether the unsigned value represented by `x` has exactly one bit set.
pub fn is_single_bit(x: &[Limb]) -> bool {
    x.iter().map(|l| l.0.count_ones()).sum::<u32>() == 1
}

/// Unsigned comparison of two equal-length limb vectors, most significant
/// limb first.
pub fn cmp(x: &[Limb], y: &[Limb]) -> Ordering {
    debug_assert_eq!(x.len(), y.len());
    for i in (0..x.len()).rev() {
        match x[i].cmp(&y[i]) {
            Ordering::Equal => continue,
            ord => return ord,
        }
    }
    Ordering::Equal
}

/// Number of leading zero bits in the unsigned value represented by `x`
/// (most significant limb first), i.e. `x.len() * Limb::BITS` if `x` is
/// entirely zero.
pub fn count_leading_zeros(x: &[Limb]) -> u32 {
    for (i, limb) in x.iter().enumerate().rev() {
        if !limb.is_zero() {
            let higher = (x.len() - 1 - i) as u32 * Limb::BITS;
            return higher + limb.leading_zeros();
        }
    }
    x.len() as u32 * Limb::BITS
}

/// Number of leading bits of `x` (most significant limb first) that equal
/// the sign bit, when `x` is read as a two's-complement integer. Returns
/// `x.len() * Limb::BITS` if every bit equals the sign bit (`x` is exactly
/// `0` or exactly `-1`).
pub fn leading_sign_bits(x: &[Limb]) -> u32 {
    if x.is_empty() {
        return 0;
    }
    let sign = x[x.len() - 1].high_bit();
    let pattern: Limb = if sign { Limb::MAX } else { Limb::ZERO };
    for (i, limb) in x.iter().enumerate().rev() {
        if *limb != pattern {
            let higher = (x.len() - 1 - i) as u32 * Limb::BITS;
            let differing = if sign {
                (!*limb).leading_zeros()
            } else {
                limb.leading_zeros()
            };
            return higher + differing;
        }
    }
    x.len() as u32 * Limb::BITS
}

/// Copies `src` into `dst`, low limb first. Safe for any relative layout
/// since both are ordinary slices (no aliasing across disjoint borrows).
pub fn copy_forward(dst: &mut [Limb], src: &[Limb]) {
    debug_assert_eq!(dst.len(), src.len());
    dst.copy_from_slice(src);
}

/// Shifts `src` left by `shift` bits (`0 <= shift < Limb::BITS`) into `dst`
/// (same length), returning the bits shifted out of the top, right-aligned.
pub fn lshift(dst: &mut [Limb], src: &[Limb], shift: u32) -> Limb {
    debug_assert_eq!(dst.len(), src.len());
    debug_assert!(shift < Limb::BITS);
    if shift == 0 {
        dst.copy_from_slice(src);
        return Limb::ZERO;
    }
    let mut carry = Limb::ZERO;
    for i in 0..src.len() {
        let (v, out) = src[i].shl_with_overflow(shift);
        let (v, _) = v.add_overflow(carry);
        dst[i] = v;
        carry = out;
    }
    carry
}

/// Shifts `src` right by `shift` bits (`0 <= shift < Limb::BITS`) into
/// `dst` (same length), returning the bits shifted out of the bottom,
/// left-aligned.
pub fn rshift(dst: &mut [Limb], src: &[Limb], shift: u32) -> Limb {
    debug_assert_eq!(dst.len(), src.len());
    debug_assert!(shift < Limb::BITS);
    if shift == 0 {
        dst.copy_from_slice(src);
        return Limb::ZERO;
    }
    let mut carry = Limb::ZERO;
    for i in (0..src.len()).rev() {
        let (v, out) = src[i].shr_with_overflow(shift);
        let (v, _) = v.add_overflow(carry);
        dst[i] = v;
        carry = out;
    }
    carry
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_add_n_carries() {
        let x = [Limb(u64::MAX), Limb(0)];
        let y = [Limb(1), Limb(0)];
        let mut w = [Limb::ZERO; 2];
        let carry = add_n(&mut w, &x, &y);
        assert_eq!(w, [Limb(0), Limb(1)]);
        assert_eq!(carry, Limb(0));
    }

    #[test]
    fn test_leading_sign_bits_all_zero() {
        let x = [Limb(0), Limb(0)];
        assert_eq!(leading_sign_bits(&x), 128);
    }

    #[test]
    fn test_leading_sign_bits_partial() {
        // 0x4000...0 in the high limb: sign bit 0, one bit of headroom.
        let x = [Limb(0), Limb(1 << 62)];
        assert_eq!(leading_sign_bits(&x), 1);
    }

    #[test]
    fn test_leading_sign_bits_negative() {
        let x = [Limb::MAX, Limb::MAX];
        assert_eq!(leading_sign_bits(&x), 128);
    }

    #[test]
    fn test_cmp() {
        let x = [Limb(5), Limb(0)];
        let y = [Limb(6), Limb(0)];
        assert_eq!(cmp(&x, &y), Ordering::Less);
    }

    #[test]
    fn test_shift_roundtrip() {
        let src = [Limb(0x1), Limb(0x2)];
        let mut dst = [Limb::ZERO; 2];
        let out = lshift(&mut dst, &src, 4);
        assert_eq!(dst, [Limb(0x10), Limb(0x21)]);
        assert_eq!(out, Limb(0));
    }
}
