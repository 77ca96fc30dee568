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

//! A single machine word of a mantissa or accumulator window.

use std::ops::Not;

/// One limb of an arbitrary-precision mantissa.
///
/// `BITS` is fixed at 64 regardless of host pointer width: the window
/// algorithm's bit-exponent arithmetic is specified independent of the
/// platform, and tying it to `usize` would make the crate's numeric
/// behaviour vary by target.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default)]
pub struct Limb(pub u64);

impl Limb {
    pub const BITS: u32 = u64::BITS;
    pub const ZERO: Limb = Limb(0);
    pub const MAX: Limb = Limb(u64::MAX);

    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Bit `BITS - 1`, i.e. whether this limb's sign bit (interpreted as
    /// the most significant limb of a two's-complement integer) is set.
    #[inline]
    pub fn high_bit(self) -> bool {
        (self.0 >> (Limb::BITS - 1)) & 1 == 1
    }

    #[inline]
    pub fn leading_zeros(self) -> u32 {
        self.0.leading_zeros()
    }

    /// Adds `self + rhs`, returning the wrapped sum and whether it
    /// overflowed (carry out).
    #[inline]
    pub fn add_overflow(self, rhs: Limb) -> (Limb, bool) {
        let (v, carry) = self.0.overflowing_add(rhs.0);
        (Limb(v), carry)
    }

    /// `self + rhs + carry_in`, returning the sum and the carry out.
    #[inline]
    pub fn add_with_carry(self, rhs: Limb, carry_in: bool) -> (Limb, bool) {
        let (v1, c1) = self.0.overflowing_add(rhs.0);
        let (v2, c2) = v1.overflowing_add(carry_in as u64);
        (Limb(v2), c1 | c2)
    }

    /// Subtracts `self - rhs`, returning the wrapped difference and whether
    /// it borrowed.
    #[inline]
    pub fn sub_overflow(self, rhs: Limb) -> (Limb, bool) {
        let (v, borrow) = self.0.overflowing_sub(rhs.0);
        (Limb(v), borrow)
    }

    /// `self - rhs - borrow_in`, returning the difference and the borrow out.
    #[inline]
    pub fn sub_with_borrow(self, rhs: Limb, borrow_in: bool) -> (Limb, bool) {
        let (v1, b1) = self.0.overflowing_sub(rhs.0);
        let (v2, b2) = v1.overflowing_sub(borrow_in as u64);
        (Limb(v2), b1 | b2)
    }

    /// Shifts left by `n` bits (`0 <= n < BITS`), returning the result and
    /// the bits shifted out the top, right-aligned in the returned limb.
    #[inline]
    pub fn shl_with_overflow(self, n: u32) -> (Limb, Limb) {
        if n == 0 {
            (self, Limb::ZERO)
        } else {
            (Limb(self.0 << n), Limb(self.0 >> (Limb::BITS - n)))
        }
    }

    /// Shifts right by `n` bits (`0 <= n < BITS`), returning the result and
    /// the bits shifted out the bottom, left-aligned in the returned limb.
    #[inline]
    pub fn shr_with_overflow(self, n: u32) -> (Limb, Limb) {
        if n == 0 {
            (self, Limb::ZERO)
        } else {
            (Limb(self.0 >> n), Limb(self.0 << (Limb::BITS - n)))
        }
    }
}

impl Not for Limb {
    type Output = Limb;
    #[inline]
    fn not(self) -> Limb {
        Limb(!self.0)
    }
}
