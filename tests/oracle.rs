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

//! Cross-checks the sum against an independent `num_bigint` exact-integer
//! oracle: every input here is a small integer, so the mathematically
//! exact sum (computed with unbounded-precision big integers) is always
//! exactly representable at 64 bits, and the crate's result must match it
//! bit for bit with an exact (`Equal`) ternary.

use crsum::limb::Limb;
use crsum::number::limbs_for_precision;
use crsum::{sum, Number, RoundingMode, Sign};
use num_bigint::BigInt;
use rand::Rng;
use std::cmp::Ordering;

const PRECISION: u32 = 64;

fn from_i64(v: i64, precision: u32) -> Number {
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

fn to_i64(n: &Number) -> i64 {
    assert!(n.is_regular());
    let top = n.mantissa().last().expect("regular mantissa is non-empty").0;
    let bit_len = n.exponent();
    let mag = top >> (64 - bit_len as u32);
    let v = mag as i64;
    if n.sign().is_negative() {
        -v
    } else {
        v
    }
}

#[test]
fn random_small_integer_sums_match_the_bigint_oracle() {
    let mut rng = rand::thread_rng();
    for _ in 0..200 {
        let count = rng.gen_range(1..20);
        let values: Vec<i64> = (0..count).map(|_| rng.gen_range(-1000..1000)).collect();

        let exact: BigInt = values.iter().map(|&v| BigInt::from(v)).sum();
        let exact_i64: i64 = exact
            .to_string()
            .parse()
            .expect("sum of <=20 values each |v|<1000 fits in i64");

        let inputs: Vec<Number> = values.iter().map(|&v| from_i64(v, PRECISION)).collect();
        let mut out = Number::with_precision(PRECISION).unwrap();
        let ternary = sum(&mut out, &inputs, RoundingMode::ToNearestEven);

        assert_eq!(ternary, Ordering::Equal, "exact small-integer sums must round exactly");
        if exact_i64 == 0 {
            assert!(out.is_zero());
        } else {
            assert_eq!(to_i64(&out), exact_i64);
        }
    }
}
