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

//! Rounding and Table Maker's Dilemma resolution: component E of
//! `SPEC_FULL.md`.

use crate::limb::Limb;
use crate::ll;
use crate::mem::Scratch;
use crate::number::{limbs_for_precision, Number, Sign};
use crate::rounding::{RoundingMode, Ternary};
use crate::sum_raw::{sum_raw, SumRawOutcome};
use crate::window::Window;
use std::cmp::Ordering;

/// Final, fully-resolved result of rounding a truncated sum.
pub struct Resolved {
    pub sign: Sign,
    pub exponent: i64,
    pub mantissa: Vec<Limb>,
    pub ternary: Ternary,
}

/// Extracts `n_bits` bits of `magnitude` (an unsigned value based at
/// `minexp`) starting at absolute bit position `lo`, top-aligned into a
/// `limbs_for_precision(n_bits)`-limb buffer so the result matches
/// `Number`'s normalized-mantissa convention (MSB of the top limb is the
/// mantissa's own most significant bit; any low padding bits, when
/// `n_bits` is not a multiple of `Limb::BITS`, are zero). Returns the
/// mantissa together with that padding width.
fn extract_bits(magnitude: &[Limb], minexp: i64, lo: i64, n_bits: u32, scratch: &mut Scratch) -> (Vec<Limb>, u32) {
    let n_limbs = limbs_for_precision(n_bits);
    let pad_bits = n_limbs as u32 * Limb::BITS - n_bits;

    let mut packed = vec![Limb::ZERO; n_limbs];
    let avail_from = minexp.max(lo);
    let underflow_bits = (avail_from - lo) as u64;
    let underflow_limbs = (underflow_bits / Limb::BITS as u64) as usize;
    let underflow_residual = (underflow_bits % Limb::BITS as u64) as u32;

    if underflow_limbs < n_limbs {
        let src_offset = (avail_from - minexp) as u64;
        let src_whole = (src_offset / Limb::BITS as u64) as usize;
        let src_bit = (src_offset % Limb::BITS as u64) as u32;
        if src_whole < magnitude.len() {
            let src_kept = &magnitude[src_whole..];
            let take_src = src_kept.len().min(n_limbs - underflow_limbs + 1);
            let area = scratch.take(take_src);
            ll::rshift(area, &src_kept[..take_src], src_bit);
            if underflow_residual == 0 {
                let n = area.len().min(n_limbs - underflow_limbs);
                packed[underflow_limbs..underflow_limbs + n].copy_from_slice(&area[..n]);
            } else {
                let mut shifted = vec![Limb::ZERO; area.len() + 1];
                let carry = ll::lshift(&mut shifted[..area.len()], area, underflow_residual);
                *shifted.last_mut().expect("non-empty by construction") = carry;
                let n = shifted.len().min(n_limbs - underflow_limbs);
                packed[underflow_limbs..underflow_limbs + n].copy_from_slice(&shifted[..n]);
            }
        }
    }

    if pad_bits == 0 {
        (packed, 0)
    } else {
        let mut aligned = vec![Limb::ZERO; n_limbs];
        ll::lshift(&mut aligned, &packed, pad_bits);
        (aligned, pad_bits)
    }
}

/// Reads a single bit of `magnitude` at absolute position `bit`, or
/// `false` for positions below `minexp`.
fn bit_at(magnitude: &[Limb], minexp: i64, bit: i64) -> bool {
    if bit < minexp {
        return false;
    }
    let offset = (bit - minexp) as u64;
    let limb = (offset / Limb::BITS as u64) as usize;
    let within = (offset % Limb::BITS as u64) as u32;
    magnitude
        .get(limb)
        .is_some_and(|l| (l.0 >> within) & 1 == 1)
}

/// Whether any bit of `magnitude` below absolute position `bit` is set
/// (the sticky bit for rounding).
fn sticky_below(magnitude: &[Limb], minexp: i64, bit: i64) -> bool {
    if bit <= minexp {
        return false;
    }
    let n_bits = (bit - minexp) as u64;
    let n_limbs = (n_bits / Limb::BITS as u64) as usize;
    let residual = (n_bits % Limb::BITS as u64) as u32;
    let full = &magnitude[..n_limbs.min(magnitude.len())];
    if full.iter().any(|l| !l.is_zero()) {
        return true;
    }
    if residual != 0 {
        if let Some(partial) = magnitude.get(n_limbs) {
            let mask = (1u64 << residual) - 1;
            if partial.0 & mask != 0 {
                return true;
            }
        }
    }
    false
}

/// Rounds the truncated-sum window to `sq` bits and resolves the Table
/// Maker's Dilemma if one is detected, per `SPEC_FULL.md` §4.E.
///
/// The window's raw two's-complement content is negated once up front when
/// its sign bit is set, so everything below this point (extraction,
/// rounding-bit/sticky inspection, the rounding increment) works on an
/// ordinary unsigned magnitude; only the final sign of the result and the
/// directed-rounding-mode asymmetry still depend on `pos`.
#[allow(clippy::too_many_arguments)]
pub fn round_and_resolve(
    window: &Window,
    cancel: u32,
    e: i64,
    err: Option<i64>,
    regulars: &[&Number],
    logn: u32,
    cq: u32,
    sq: u32,
    mode: RoundingMode,
    scratch: &mut Scratch,
) -> Resolved {
    let pos = !window.sign_is_negative();
    let minexp = window.minexp();
    let magnitude: Vec<Limb> = if pos {
        window.limbs().to_vec()
    } else {
        let mut m = window.limbs().to_vec();
        ll::neg(&mut m);
        m
    };

    // `cancel`/`e` are derived from the pre-negation two's-complement leading
    // sign-bit run (`SPEC_FULL.md` §4.D), which undercounts the negated
    // magnitude's own leading-bit position by one exactly when that
    // magnitude is a power of two: two's complement of `-2^m` has only `m`
    // trailing zero bits below its sign run, one fewer than any other
    // magnitude with the same leading-bit position.
    let e = if !pos && ll::is_single_bit(&magnitude) { e + 1 } else { e };

    let u = e - sq as i64;
    let (mut mantissa, pad_bits) = extract_bits(&magnitude, minexp, u, sq, scratch);
    let rbit = bit_at(&magnitude, minexp, u - 1);
    let sticky = sticky_below(&magnitude, minexp, u - 1);

    let tmd: u8 = match err {
        None => 0,
        Some(err_v) => {
            let d = u - err_v;
            debug_assert!(d >= 3, "TMD detection requires at least 3 bits below the rounding bit");
            let first = bit_at(&magnitude, minexp, u - 2);
            let mut all_equal = true;
            for k in 2..d {
                if bit_at(&magnitude, minexp, u - 1 - k) != first {
                    all_equal = false;
                    break;
                }
            }
            if !all_equal {
                0
            } else if rbit != first {
                1
            } else if mode == RoundingMode::ToNearestEven {
                2
            } else {
                0
            }
        }
    };

    let halfway_round_up = mantissa
        .first()
        .is_some_and(|l| (l.0 >> pad_bits) & 1 == 1);

    let round_up = mode.round_up(pos, rbit, sticky, halfway_round_up);

    let mut final_exponent = e;
    if round_up {
        let ulp = Limb(1u64 << pad_bits);
        let carry = ll::incr(&mut mantissa, ulp);
        if !carry.is_zero() {
            final_exponent += 1;
            ll::zero(&mut mantissa);
            *mantissa.last_mut().expect("sq >= 1 implies at least one limb") =
                Limb(1 << (Limb::BITS - 1));
        }
    }

    let sign = Sign::of_bool(!pos);

    let ternary = if tmd == 0 {
        if rbit || sticky {
            if pos {
                Ordering::Greater
            } else {
                Ordering::Less
            }
        } else {
            Ordering::Equal
        }
    } else {
        let sst = resolve_tmd_sign(window, regulars, u, err.expect("tmd only fires when err is Some"), logn, cq, scratch);
        match (tmd, mode) {
            (1, RoundingMode::ToNearestEven) => reflect(sst.reverse(), pos),
            (2, RoundingMode::ToNearestEven) => reflect(sst, pos),
            (_, m) if directed_toward_sign(m, pos) => {
                reflect(if sst == Ordering::Equal { Ordering::Equal } else { Ordering::Greater }, pos)
            }
            _ => reflect(if sst == Ordering::Equal { Ordering::Equal } else { Ordering::Less }, pos),
        }
    };

    Resolved {
        sign,
        exponent: final_exponent,
        mantissa,
        ternary,
    }
}

/// The ternary result is always expressed relative to the *signed* exact
/// value: a magnitude-side "above/below" (`sst`, computed against the
/// unsigned residual) flips sign when the overall value is negative.
fn reflect(sst: Ordering, pos: bool) -> Ordering {
    if pos {
        sst
    } else {
        sst.reverse()
    }
}

/// Whether directed rounding mode `mode` rounds in the direction of the
/// value's own sign (`pos`), per `SPEC_FULL.md` §4.E step 7.
fn directed_toward_sign(mode: RoundingMode, pos: bool) -> bool {
    match mode {
        RoundingMode::TowardPositive => pos,
        RoundingMode::TowardNegative => !pos,
        RoundingMode::AwayFromZero => true,
        RoundingMode::TowardZero => false,
        RoundingMode::ToNearestEven => false,
    }
}

/// Resolves the sign of the "secondary term" (the exact residual below the
/// rounding bit) by re-running the truncated-sum loop on a narrower window
/// with `prec = 0`, per `SPEC_FULL.md` §4.E step 7 / §9.
fn resolve_tmd_sign(
    window: &Window,
    regulars: &[&Number],
    u: i64,
    err: i64,
    logn: u32,
    cq: u32,
    scratch: &mut Scratch,
) -> Ordering {
    let secondary_limbs = window
        .limbs()
        .len()
        .saturating_sub(limbs_for_precision((window.wq() - (u - err)).max(0) as u32))
        .max(2);
    let secondary_minexp = err + 1 - secondary_limbs as i64 * Limb::BITS as i64;
    let mut secondary = Window::new(secondary_limbs, secondary_minexp);
    match sum_raw(&mut secondary, regulars, secondary_minexp, u, logn, cq, 0, scratch) {
        SumRawOutcome::ExactZero => Ordering::Equal,
        SumRawOutcome::Value { .. } => {
            if secondary.sign_is_negative() {
                Ordering::Less
            } else if ll::is_zero(secondary.limbs()) {
                Ordering::Equal
            } else {
                Ordering::Greater
            }
        }
    }
}
