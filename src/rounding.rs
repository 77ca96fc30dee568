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

//! Rounding modes and the ternary return value.

use std::cmp::Ordering;

/// The rounded value's relation to the exact mathematical result:
/// `Ordering::Less` if the returned number is strictly below the exact
/// sum, `Ordering::Equal` if exact, `Ordering::Greater` if above.
///
/// This is exactly `std::cmp::Ordering`; the two concepts coincide (a
/// signed "which side of the exact value did we land on" indicator), so
/// there is no reason to invent a parallel three-valued type.
pub type Ternary = Ordering;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum RoundingMode {
    TowardNegative,
    TowardPositive,
    TowardZero,
    AwayFromZero,
    ToNearestEven,
}

impl RoundingMode {
    /// Whether the truncated magnitude should be incremented by one ULP,
    /// given:
    /// - `pos`: the sign recovered from the window's two's-complement MSB
    ///   (`true` for a non-negative accumulated value);
    /// - `rbit`/`sticky`: the bit immediately below the kept precision, and
    ///   whether any bit below *that* is set;
    /// - `halfway_round_up`: how to resolve an exact `ToNearestEven` tie
    ///   (`rbit` set, `sticky` clear) — the caller decides this from the
    ///   parity of the kept mantissa's last bit.
    ///
    /// Matches `SPEC_FULL.md` §4.E step 6 formula for formula.
    pub fn round_up(self, pos: bool, rbit: bool, sticky: bool, halfway_round_up: bool) -> bool {
        let inexact = rbit || sticky;
        match self {
            RoundingMode::TowardNegative => false,
            RoundingMode::TowardPositive => inexact,
            RoundingMode::TowardZero => inexact && !pos,
            RoundingMode::AwayFromZero => inexact && pos,
            RoundingMode::ToNearestEven => {
                if !rbit {
                    false
                } else if sticky {
                    true
                } else {
                    halfway_round_up
                }
            }
        }
    }

    /// The sign to assign to an exact zero result, per the all-zero-inputs
    /// policy of `SPEC_FULL.md` §4.B rule 4: the common sign if the inputs
    /// agreed, otherwise `-1` only for `TowardNegative`.
    pub fn zero_sign_on_disagreement(self) -> crate::number::Sign {
        if self == RoundingMode::TowardNegative {
            crate::number::Sign::Neg
        } else {
            crate::number::Sign::Pos
        }
    }
}
