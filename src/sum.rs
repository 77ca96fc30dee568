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

//! The public entry point: component F of `SPEC_FULL.md`.

use crate::classify::{classify, Classification};
use crate::limb::Limb;
use crate::mem::Scratch;
use crate::number::{limbs_for_precision, Number, Sign};
use crate::resolve::round_and_resolve;
use crate::rounding::{RoundingMode, Ternary};
use crate::sum_raw::{sum_raw, SumRawOutcome};
use crate::window::Window;
use std::cmp::Ordering;

/// Reserved header bits above the significant bits the window must track:
/// enough to absorb `rn` additions' worth of carry without overflowing the
/// accumulator, per `SPEC_FULL.md` §3 (`cq = logn + 1`).
fn header_bits(logn: u32) -> u32 {
    logn + 1
}

/// Sums `inputs` into `out` under rounding mode `mode`, returning the
/// ternary value of the rounding, per `SPEC_FULL.md` §4.F.
///
/// `out`'s own precision (set at construction via `Number::with_precision`)
/// is the target precision of the result; it is never inferred from
/// `inputs`.
pub fn sum(out: &mut Number, inputs: &[Number], mode: RoundingMode) -> Ternary {
    if inputs.is_empty() {
        out.set_zero(Sign::Pos);
        return Ordering::Equal;
    }

    match classify(inputs, mode) {
        Classification::HasNan | Classification::HasMixedInf => {
            out.set_nan();
            Ordering::Equal
        }
        Classification::Infinite(sign) => {
            out.set_infinity(sign);
            Ordering::Equal
        }
        Classification::AllZero(sign) => {
            out.set_zero(sign);
            Ordering::Equal
        }
        Classification::Generic { max_exp, .. } => {
            let regulars: Vec<&Number> = inputs.iter().filter(|x| x.is_regular()).collect();
            sum_generic(out, &regulars, max_exp, mode)
        }
    }
}

fn sum_generic(out: &mut Number, regulars: &[&Number], max_exp: i64, mode: RoundingMode) -> Ternary {
    let rn = regulars.len();
    debug_assert!(rn > 0, "Generic classification guarantees at least one regular input");

    let logn = if rn <= 1 {
        0
    } else {
        (usize::BITS - (rn - 1).leading_zeros()).max(1)
    };
    let cq = header_bits(logn);
    let sq = out.precision();
    // wq - cq >= sq + logn + 2, per SPEC_FULL.md §3; size the window to hit
    // that bound exactly.
    let ws_bits = sq + cq + logn + 2;
    let ws = limbs_for_precision(ws_bits);
    // Reserve `cq` header bits above `max_exp` so growing (non-cancelling)
    // sums have carry room, matching the re-home path in `sum_raw`.
    let minexp = max_exp + cq as i64 - ws as i64 * Limb::BITS as i64;

    let mut window = Window::new(ws, minexp);
    let mut scratch = Scratch::new();
    let prec = sq as i64 + 2;

    let outcome = sum_raw(&mut window, regulars, minexp, max_exp, logn, cq, prec, &mut scratch);

    match outcome {
        SumRawOutcome::ExactZero => {
            out.set_zero(mode.zero_sign_on_disagreement());
            Ordering::Equal
        }
        SumRawOutcome::Value { cancel, e, err } => {
            let resolved = round_and_resolve(
                &window, cancel, e, err, regulars, logn, cq, sq, mode, &mut scratch,
            );
            out.set_regular(resolved.sign, resolved.exponent, resolved.mantissa);
            resolved.ternary
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_sum_empty_is_zero() {
        let mut out = Number::with_precision(53).unwrap();
        let ternary = sum(&mut out, &[], RoundingMode::ToNearestEven);
        assert!(out.is_zero());
        assert_eq!(ternary, Ordering::Equal);
    }

    #[test]
    fn test_sum_single_nan_propagates() {
        let mut out = Number::with_precision(53).unwrap();
        let inputs = [Number::nan(53)];
        sum(&mut out, &inputs, RoundingMode::ToNearestEven);
        assert!(out.is_nan());
    }

    #[test]
    fn test_sum_mixed_infinity_is_nan() {
        let mut out = Number::with_precision(53).unwrap();
        let inputs = [
            Number::infinity(Sign::Pos, 53),
            Number::infinity(Sign::Neg, 53),
        ];
        sum(&mut out, &inputs, RoundingMode::ToNearestEven);
        assert!(out.is_nan());
    }

    #[test]
    fn test_sum_single_value_round_trips_exactly() {
        let mut out = Number::with_precision(64).unwrap();
        let inputs = [Number::power_of_two(Sign::Pos, 5, 64)];
        let ternary = sum(&mut out, &inputs, RoundingMode::ToNearestEven);
        assert!(out.is_regular());
        assert_eq!(out.exponent(), 5);
        assert_eq!(ternary, Ordering::Equal);
    }

    #[test]
    fn test_sum_exact_cancellation_is_zero() {
        let mut out = Number::with_precision(64).unwrap();
        let inputs = [
            Number::power_of_two(Sign::Pos, 5, 64),
            Number::power_of_two(Sign::Neg, 5, 64),
        ];
        let ternary = sum(&mut out, &inputs, RoundingMode::ToNearestEven);
        assert!(out.is_zero());
        assert_eq!(ternary, Ordering::Equal);
    }
}
