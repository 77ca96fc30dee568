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

//! Property-based tests: commutativity, NaN/infinity absorption, and
//! idempotence of a single exactly-representable input.

use crsum::limb::Limb;
use crsum::number::limbs_for_precision;
use crsum::{sum, Number, RoundingMode, Sign};
use ieee754::Ieee754;
use quickcheck_macros::quickcheck;
use rand::seq::SliceRandom;
use rand::thread_rng;

const PRECISION: u32 = 64;

fn to_numbers(exps: &[i8], signs: &[bool]) -> Vec<Number> {
    exps.iter()
        .zip(signs.iter())
        .map(|(&e, &s)| {
            let clamped = (e as i64).clamp(-60, 60);
            Number::power_of_two(Sign::of_bool(s), clamped, PRECISION)
        })
        .collect()
}

fn same_value(a: &Number, b: &Number) -> bool {
    if a.is_nan() || b.is_nan() {
        return a.is_nan() && b.is_nan();
    }
    if a.is_infinite() || b.is_infinite() {
        return a.is_infinite() && b.is_infinite() && a.sign() == b.sign();
    }
    if a.is_zero() || b.is_zero() {
        return a.is_zero() && b.is_zero() && a.sign() == b.sign();
    }
    a.sign() == b.sign() && a.exponent() == b.exponent() && a.mantissa() == b.mantissa()
}

#[quickcheck]
fn commutative_under_permutation(exps: Vec<i8>, signs: Vec<bool>) -> bool {
    let inputs = to_numbers(&exps, &signs);
    if inputs.is_empty() {
        return true;
    }

    let mut shuffled = inputs.clone();
    shuffled.shuffle(&mut thread_rng());

    let mut out_a = Number::with_precision(PRECISION).unwrap();
    let mut out_b = Number::with_precision(PRECISION).unwrap();
    let ternary_a = sum(&mut out_a, &inputs, RoundingMode::ToNearestEven);
    let ternary_b = sum(&mut out_b, &shuffled, RoundingMode::ToNearestEven);

    ternary_a == ternary_b && same_value(&out_a, &out_b)
}

#[quickcheck]
fn nan_absorbs_any_finite_company(exps: Vec<i8>, signs: Vec<bool>) -> bool {
    let mut inputs = to_numbers(&exps, &signs);
    inputs.push(Number::nan(PRECISION));

    let mut out = Number::with_precision(PRECISION).unwrap();
    sum(&mut out, &inputs, RoundingMode::ToNearestEven);
    out.is_nan()
}

#[quickcheck]
fn opposite_infinities_always_yield_nan(exps: Vec<i8>, signs: Vec<bool>) -> bool {
    let mut inputs = to_numbers(&exps, &signs);
    inputs.push(Number::infinity(Sign::Pos, PRECISION));
    inputs.push(Number::infinity(Sign::Neg, PRECISION));

    let mut out = Number::with_precision(PRECISION).unwrap();
    sum(&mut out, &inputs, RoundingMode::ToNearestEven);
    out.is_nan()
}

#[quickcheck]
fn single_input_round_trips_exactly(exp: i8, sign: bool) -> bool {
    let clamped = (exp as i64).clamp(-60, 60);
    let x = Number::power_of_two(Sign::of_bool(sign), clamped, PRECISION);
    let mut out = Number::with_precision(PRECISION).unwrap();
    let ternary = sum(&mut out, std::slice::from_ref(&x), RoundingMode::ToNearestEven);
    ternary == std::cmp::Ordering::Equal && same_value(&out, &x)
}

/// Builds a single-limb `Number` with exact integer value `v`.
fn int_to_number(v: i64, precision: u32) -> Number {
    if v == 0 {
        return Number::zero(Sign::Pos, precision);
    }
    let sign = Sign::of_bool(v < 0);
    let mag = v.unsigned_abs();
    let bit_len = 64 - mag.leading_zeros();
    let top = mag << (64 - bit_len);
    let mut mantissa = vec![Limb::ZERO; limbs_for_precision(precision)];
    *mantissa.last_mut().expect("precision >= 64 implies at least one limb") = Limb(top);
    Number::regular(sign, bit_len as i64, mantissa, precision)
}

/// Reads a regular, single-limb `Number` (precision <= 64) back to `f64`.
/// Exact for magnitudes this small relative to `f64`'s 53-bit mantissa.
fn to_f64(n: &Number) -> f64 {
    if n.is_zero() {
        return if n.sign().is_negative() { -0.0 } else { 0.0 };
    }
    let top = n.mantissa()[0].0;
    let frac = top as f64 / (u64::MAX as f64 + 1.0);
    let magnitude = frac * 2f64.powi(n.exponent() as i32);
    if n.sign().is_negative() {
        -magnitude
    } else {
        magnitude
    }
}

/// Rounding toward negative infinity never overshoots rounding toward
/// positive infinity, and when they disagree they are exactly one ULP
/// apart (checked with `ieee754`'s float-stepping helpers) for inputs
/// small enough that the `f64` conversion is itself exact.
#[quickcheck]
fn directed_roundings_bracket_the_exact_value(values: Vec<i16>) -> bool {
    let precision = 24;
    let inputs: Vec<Number> = values
        .iter()
        .take(12)
        .map(|&v| int_to_number(v as i64, precision))
        .collect();
    if inputs.is_empty() {
        return true;
    }

    let mut out_neg = Number::with_precision(precision).unwrap();
    let mut out_pos = Number::with_precision(precision).unwrap();
    sum(&mut out_neg, &inputs, RoundingMode::TowardNegative);
    sum(&mut out_pos, &inputs, RoundingMode::TowardPositive);

    let fneg = to_f64(&out_neg);
    let fpos = to_f64(&out_pos);
    if fneg == fpos {
        return true;
    }
    fneg < fpos && fneg.next() == fpos
}
