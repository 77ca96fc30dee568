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

//! The `Number` value type: an arbitrary-precision binary floating-point
//! value with its own precision, sign, exponent and, for regular values, a
//! normalized multi-limb mantissa.

use crate::limb::Limb;
use num_integer::Integer;
use std::fmt;

/// Number of limbs needed to hold `precision` bits.
pub fn limbs_for_precision(precision: u32) -> usize {
    (precision as u64).div_ceil(&(Limb::BITS as u64)) as usize
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Sign {
    Pos,
    Neg,
}

impl Sign {
    #[inline]
    pub fn is_negative(self) -> bool {
        matches!(self, Sign::Neg)
    }

    #[inline]
    pub fn negate(self) -> Sign {
        match self {
            Sign::Pos => Sign::Neg,
            Sign::Neg => Sign::Pos,
        }
    }

    #[inline]
    pub fn of_bool(neg: bool) -> Sign {
        if neg {
            Sign::Neg
        } else {
            Sign::Pos
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Class {
    Nan,
    Inf,
    Zero,
    Regular,
}

/// A malformed call that can be rejected before any window arithmetic
/// starts. Never used for the internal cancellation/TMD ratchets, which are
/// local recoveries (see `SPEC_FULL.md` §7) and never surface as errors.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SumError {
    /// The requested target precision has zero bits; there is no such
    /// representable number.
    ZeroPrecision,
    /// The requested target precision is large enough that `logn`/`cq`
    /// header-bit arithmetic (§3) could not be guaranteed to fit in the
    /// window's own limb count; rejected rather than risking a silent
    /// overflow of the accumulator.
    PrecisionTooLarge { requested: u32 },
}

impl fmt::Display for SumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SumError::ZeroPrecision => write!(f, "target precision must be at least 1 bit"),
            SumError::PrecisionTooLarge { requested } => {
                write!(f, "target precision {requested} bits is too large for this crate's window arithmetic")
            }
        }
    }
}

impl std::error::Error for SumError {}

/// Precisions above this are rejected by `Number::with_precision`: large
/// enough that no realistic caller needs more, small enough that `logn`,
/// `cq` and limb-count arithmetic in `u32`/`i64` cannot overflow even with
/// the maximum supported input count.
const MAX_PRECISION: u32 = 1 << 24;

/// An arbitrary-precision binary floating-point value.
///
/// Regular values are stored sign-magnitude: `sign`, `exponent` (the value
/// lies in `[2^(exponent-1), 2^exponent)`), and a mantissa of
/// `limbs_for_precision(precision)` limbs, most-significant limb last,
/// normalized so the top mantissa bit is always 1.
#[derive(Clone, Debug)]
pub struct Number {
    class: Class,
    sign: Sign,
    precision: u32,
    exponent: i64,
    mantissa: Vec<Limb>,
}

impl Number {
    /// Allocates a zero-valued output number of the given target precision.
    /// This is the one fallible entry point in the crate (`SPEC_FULL.md`
    /// §4.G): `sum` itself cannot fail given a validly-constructed `out`.
    pub fn with_precision(precision: u32) -> Result<Number, SumError> {
        if precision == 0 {
            return Err(SumError::ZeroPrecision);
        }
        if precision > MAX_PRECISION {
            return Err(SumError::PrecisionTooLarge {
                requested: precision,
            });
        }
        Ok(Number {
            class: Class::Zero,
            sign: Sign::Pos,
            precision,
            exponent: 0,
            mantissa: vec![Limb::ZERO; limbs_for_precision(precision)],
        })
    }

    pub fn nan(precision: u32) -> Number {
        Number {
            class: Class::Nan,
            sign: Sign::Pos,
            precision,
            exponent: 0,
            mantissa: Vec::new(),
        }
    }

    pub fn infinity(sign: Sign, precision: u32) -> Number {
        Number {
            class: Class::Inf,
            sign,
            precision,
            exponent: 0,
            mantissa: Vec::new(),
        }
    }

    pub fn zero(sign: Sign, precision: u32) -> Number {
        Number {
            class: Class::Zero,
            sign,
            precision,
            exponent: 0,
            mantissa: Vec::new(),
        }
    }

    /// Builds a regular value from a normalized mantissa (top bit set,
    /// length `limbs_for_precision(precision)`).
    ///
    /// Panics in debug builds if the mantissa is not normalized: a
    /// de-normalized mantissa is a caller bug, not a runtime condition, per
    /// the invariant-violation policy of `SPEC_FULL.md` §7.
    pub fn regular(sign: Sign, exponent: i64, mantissa: Vec<Limb>, precision: u32) -> Number {
        debug_assert_eq!(mantissa.len(), limbs_for_precision(precision));
        debug_assert!(
            mantissa.last().is_some_and(|l| l.high_bit()),
            "regular mantissa must be normalized (top bit set)"
        );
        Number {
            class: Class::Regular,
            sign,
            precision,
            exponent,
            mantissa,
        }
    }

    /// The value `2^(exponent - 1)`, i.e. a mantissa with only the top bit
    /// set. Convenient for building test inputs of the `sign * 2^k` form
    /// used throughout `SPEC_FULL.md` §8's scenarios.
    pub fn power_of_two(sign: Sign, exponent: i64, precision: u32) -> Number {
        let mut mantissa = vec![Limb::ZERO; limbs_for_precision(precision)];
        *mantissa.last_mut().expect("precision >= 1 implies at least one limb") =
            Limb(1 << (Limb::BITS - 1));
        Number::regular(sign, exponent, mantissa, precision)
    }

    #[inline]
    pub fn is_nan(&self) -> bool {
        self.class == Class::Nan
    }

    #[inline]
    pub fn is_infinite(&self) -> bool {
        self.class == Class::Inf
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.class == Class::Zero
    }

    #[inline]
    pub fn is_regular(&self) -> bool {
        self.class == Class::Regular
    }

    #[inline]
    pub fn sign(&self) -> Sign {
        self.sign
    }

    #[inline]
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// The exponent of a regular value: it lies in `[2^(exponent-1),
    /// 2^exponent)`. Only meaningful when `is_regular()`.
    #[inline]
    pub fn exponent(&self) -> i64 {
        debug_assert!(self.is_regular());
        self.exponent
    }

    /// The normalized mantissa, most significant limb last. Only
    /// meaningful when `is_regular()`.
    #[inline]
    pub fn mantissa(&self) -> &[Limb] {
        debug_assert!(self.is_regular());
        &self.mantissa
    }

    pub(crate) fn set_nan(&mut self) {
        self.class = Class::Nan;
        self.mantissa.clear();
    }

    pub(crate) fn set_infinity(&mut self, sign: Sign) {
        self.class = Class::Inf;
        self.sign = sign;
        self.mantissa.clear();
    }

    pub(crate) fn set_zero(&mut self, sign: Sign) {
        self.class = Class::Zero;
        self.sign = sign;
        self.mantissa.clear();
    }

    /// Writes a regular result in place, resizing the mantissa storage to
    /// this number's own precision if it isn't already there (it always
    /// will be, via `with_precision`, but this keeps `set_regular` safe to
    /// call on any correctly-precisioned `Number`).
    pub(crate) fn set_regular(&mut self, sign: Sign, exponent: i64, mantissa: Vec<Limb>) {
        debug_assert_eq!(mantissa.len(), limbs_for_precision(self.precision));
        debug_assert!(mantissa.last().is_some_and(|l| l.high_bit()) || is_all_zero(&mantissa));
        self.class = Class::Regular;
        self.sign = sign;
        self.exponent = exponent;
        self.mantissa = mantissa;
    }
}

fn is_all_zero(mantissa: &[Limb]) -> bool {
    mantissa.iter().all(|l| l.is_zero())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_with_precision_rejects_zero() {
        assert_eq!(Number::with_precision(0), Err(SumError::ZeroPrecision));
    }

    #[test]
    fn test_power_of_two_is_normalized() {
        let n = Number::power_of_two(Sign::Pos, 1, 53);
        assert!(n.mantissa().last().unwrap().high_bit());
        assert_eq!(n.exponent(), 1);
    }

    #[test]
    fn test_limbs_for_precision() {
        assert_eq!(limbs_for_precision(1), 1);
        assert_eq!(limbs_for_precision(64), 1);
        assert_eq!(limbs_for_precision(65), 2);
        assert_eq!(limbs_for_precision(53), 1);
    }
}
