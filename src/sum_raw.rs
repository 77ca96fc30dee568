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

//! The truncated-sum loop: component D of `SPEC_FULL.md`.

use crate::ll;
use crate::mem::Scratch;
use crate::number::Number;
use crate::window::Window;

/// Outcome of `sum_raw`: either the truncated sum collapsed to an exact
/// zero (no rounding or error bound needed), or a non-zero truncated value
/// with its diagnosed cancellation count and error bound.
pub enum SumRawOutcome {
    ExactZero,
    Value {
        cancel: u32,
        e: i64,
        /// `None` means the truncated sum is exact (every input's mass was
        /// folded in); `Some(err)` bounds the exponent of whatever mass was
        /// left out.
        err: Option<i64>,
    },
}

/// Runs the fold/diagnose/retry loop of `SPEC_FULL.md` §4.D to a
/// settled truncated sum, leaving the result in `window`.
///
/// `minexp`/`maxexp` are the initial window base and fold ceiling (the
/// caller picks these from the target precision and the scan's maximum
/// exponent); `logn` is `ceil(log2(regulars.len()))`, used to bound the
/// accumulated folding error; `cq` is the window's reserved header-bit
/// count; `prec` is the number of significant bits the caller actually
/// needs (usually the output precision plus a couple of guard bits, or
/// `0` when only the sign of the residual matters, as in TMD resolution).
#[allow(clippy::too_many_arguments)]
pub fn sum_raw(
    window: &mut Window,
    regulars: &[&Number],
    mut minexp: i64,
    mut maxexp: i64,
    logn: u32,
    cq: u32,
    prec: i64,
    scratch: &mut Scratch,
) -> SumRawOutcome {
    loop {
        window.rebase(minexp);
        let mut maxexp2 = i64::MIN;
        for x in regulars {
            window.fold(x, maxexp, &mut maxexp2, scratch);
        }

        if ll::is_zero(window.limbs()) {
            if maxexp2 == i64::MIN {
                return SumRawOutcome::ExactZero;
            }
            log::trace!(
                "sum_raw: truncated value exactly zero with pending mass up to {}, re-homing",
                maxexp2
            );
            minexp = maxexp2 + cq as i64 - window.wq();
            maxexp = maxexp2;
            continue;
        }

        let cancel = window.leading_sign_bits();
        let wq = window.wq();
        let e = minexp + wq - cancel as i64;
        let err = if maxexp2 == i64::MIN {
            None
        } else {
            Some(maxexp2 + logn as i64)
        };

        let accept = match err {
            None => true,
            Some(err_v) => err_v <= e - prec,
        };
        if accept {
            return SumRawOutcome::Value { cancel, e, err };
        }

        let err_v = err.expect("err is Some on the excess-cancellation path");
        log::debug!(
            "sum_raw: excess cancellation (cancel={}, e={}, err={}), shifting window down",
            cancel,
            e,
            err_v
        );
        let shift = (cancel as i64 - 2 - (err_v - e).max(0)).max(1) as u32;
        minexp -= shift as i64;
        maxexp = maxexp2;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::number::Sign;

    #[test]
    fn test_sum_raw_single_positive_input_is_exact() {
        let x = Number::power_of_two(Sign::Pos, 1, 64);
        let regulars = [&x];
        let mut window = Window::new(4, -256);
        let mut scratch = Scratch::new();
        match sum_raw(&mut window, &regulars, -256, 256, 0, 2, 0, &mut scratch) {
            SumRawOutcome::Value { err, .. } => assert_eq!(err, None),
            SumRawOutcome::ExactZero => panic!("single nonzero input cannot sum to exact zero"),
        }
    }

    #[test]
    fn test_sum_raw_cancelling_pair_is_exact_zero() {
        let a = Number::power_of_two(Sign::Pos, 1, 64);
        let b = Number::power_of_two(Sign::Neg, 1, 64);
        let regulars = [&a, &b];
        let mut window = Window::new(4, -256);
        let mut scratch = Scratch::new();
        match sum_raw(&mut window, &regulars, -256, 256, 1, 2, 0, &mut scratch) {
            SumRawOutcome::ExactZero => {}
            SumRawOutcome::Value { .. } => panic!("a + (-a) must be exactly zero"),
        }
    }
}
