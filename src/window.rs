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

//! The two's-complement accumulator window: component C of
//! `SPEC_FULL.md`.

use crate::limb::Limb;
use crate::ll;
use crate::mem::Scratch;
use crate::number::{Number, Sign};

/// A fixed-size two's-complement accumulator over the bit range
/// `[minexp, minexp + wq)`, least significant limb first.
pub struct Window {
    limbs: Vec<Limb>,
    minexp: i64,
}

impl Window {
    /// Allocates a zeroed window of `ws` limbs based at `minexp`.
    pub fn new(ws: usize, minexp: i64) -> Window {
        Window {
            limbs: vec![Limb::ZERO; ws],
            minexp,
        }
    }

    #[inline]
    pub fn minexp(&self) -> i64 {
        self.minexp
    }

    #[inline]
    pub fn wq(&self) -> i64 {
        self.limbs.len() as i64 * Limb::BITS as i64
    }

    #[inline]
    pub fn limbs(&self) -> &[Limb] {
        &self.limbs
    }

    pub fn zero(&mut self) {
        ll::zero(&mut self.limbs);
    }

    /// Re-homes the window at a new base, zeroing it. Used when the
    /// truncated sum is exactly zero so far and the loop needs to resume
    /// higher up, and when excess cancellation forces a leftward shift.
    pub fn rebase(&mut self, minexp: i64) {
        self.minexp = minexp;
        self.zero();
    }

    /// The sign bit of the two's-complement value currently held.
    pub fn sign_is_negative(&self) -> bool {
        self.limbs
            .last()
            .is_some_and(|l| l.high_bit())
    }

    /// Number of leading bits equal to the sign bit (the `cancel` count of
    /// `SPEC_FULL.md` §4.D).
    pub fn leading_sign_bits(&self) -> u32 {
        ll::leading_sign_bits(&self.limbs)
    }

    /// Folds a single regular input into the window's `[minexp, top)`
    /// range. `top` is the upper fold bound for this pass (the running
    /// `maxexp` of `SPEC_FULL.md` §4.D, which starts at the scan's global
    /// maximum exponent and may be lowered by re-homing). `maxexp2` tracks
    /// the largest exponent not yet folded in, exactly as in
    /// `SPEC_FULL.md` §4.C.
    pub fn fold(&mut self, x: &Number, top: i64, maxexp2: &mut i64, scratch: &mut Scratch) {
        let x_bits = x.mantissa().len() as i64 * Limb::BITS as i64;
        let x_lsb = x.exponent() - x_bits;
        let vd = x_lsb - self.minexp;

        if vd < 0 {
            self.fold_below(x, x_lsb, top, maxexp2, scratch);
        } else {
            self.fold_above_or_within(x, vd, top, maxexp2, scratch);
        }
    }

    /// `x`'s least significant bit lies below the window (`vd < 0`).
    fn fold_below(&mut self, x: &Number, x_lsb: i64, top: i64, maxexp2: &mut i64, scratch: &mut Scratch) {
        if x.exponent() <= self.minexp {
            // Entirely below the window: nothing to fold now, but remember
            // that there is unprocessed mass up here for a later pass.
            *maxexp2 = (*maxexp2).max(x.exponent());
            return;
        }
        if x_lsb < self.minexp {
            // Some bits of `x` fall below the window and are truncated;
            // mark the window base itself as "still has pending mass" so
            // the final error bound accounts for it (SPEC_FULL.md §4.C).
            *maxexp2 = (*maxexp2).max(self.minexp);
        }

        // Drop the whole limbs below `minexp`, then shift the remainder
        // down by the residual bit offset so bit 0 of the result lines up
        // with the window's own bit 0.
        let drop_bits = (self.minexp - x_lsb) as u64;
        let drop_limbs = (drop_bits / Limb::BITS as u64) as usize;
        let residual = (drop_bits % Limb::BITS as u64) as u32;
        let src = x.mantissa();
        if drop_limbs >= src.len() {
            return;
        }
        let kept = &src[drop_limbs..];
        let n = kept.len();
        let area = scratch.take(n);
        ll::rshift(area, kept, residual);

        // `area`'s bit 0 is the window's own bit 0 (absolute exponent
        // `minexp`); mask off whatever part of it lands at or above `top`.
        let base = self.minexp;
        let over_bits = area.len() as i64 * Limb::BITS as i64 - (top - base);
        let area = if over_bits > 0 {
            mask_high_bits(area, over_bits as u32)
        } else {
            area
        };

        let wlen = self.limbs.len();
        let take = area.len().min(wlen);
        self.accumulate(0, take, &area[..take], x.sign());
    }

    /// `x`'s least significant bit lies at or above the window's base
    /// (`vd >= 0`): shift it up into the window.
    fn fold_above_or_within(&mut self, x: &Number, vd: i64, top: i64, maxexp2: &mut i64, scratch: &mut Scratch) {
        let whole = (vd / Limb::BITS as i64) as usize;
        if whole >= self.limbs.len() {
            *maxexp2 = (*maxexp2).max(x.exponent());
            return;
        }
        let bit_shift = (vd % Limb::BITS as i64) as u32;
        let src = x.mantissa();
        let avail = self.limbs.len() - whole;
        let n = (src.len() + 1).min(avail + 1);
        let area = scratch.take(n);
        {
            let src_n = src.len().min(n);
            let carry = ll::lshift(&mut area[..src_n], &src[..src_n], bit_shift);
            if src_n < n {
                area[src_n] = carry;
            }
        }

        // `area`'s bit 0 lands at absolute exponent `minexp + whole*BITS`;
        // mask off whatever part of it is at or above `top`.
        let base = self.minexp + whole as i64 * Limb::BITS as i64;
        let over_bits = area.len() as i64 * Limb::BITS as i64 - (top - base);
        let area = if over_bits > 0 {
            mask_high_bits(area, over_bits as u32)
        } else {
            area
        };

        let take = area.len().min(avail);
        self.accumulate(whole, take, &area[..take], x.sign());
    }

    /// Adds (or subtracts, per `sign`) `area` into `self.limbs[at..at+len]`,
    /// propagating the resulting carry/borrow through the rest of the
    /// window above that range.
    fn accumulate(&mut self, at: usize, len: usize, area: &[Limb], sign: Sign) {
        let dst = &mut self.limbs[at..at + len];
        let before = dst.to_vec();
        match sign {
            Sign::Pos => {
                let carry = ll::add_n(dst, &before, area);
                ll::incr(&mut self.limbs[at + len..], carry);
            }
            Sign::Neg => {
                let borrow = ll::sub_n(dst, &before, area);
                ll::decr(&mut self.limbs[at + len..], borrow);
            }
        }
    }
}

/// Zeroes the top `bits` bits of `area` (most significant limb last),
/// returning the same slice for chaining.
fn mask_high_bits(area: &mut [Limb], bits: u32) -> &mut [Limb] {
    let total = area.len() as u32 * Limb::BITS;
    if bits >= total {
        ll::zero(area);
        return area;
    }
    let keep = total - bits;
    let full_limbs = (keep / Limb::BITS) as usize;
    let residual = keep % Limb::BITS;
    if residual != 0 && full_limbs < area.len() {
        let mask = (1u64 << residual) - 1;
        area[full_limbs] = Limb(area[full_limbs].0 & mask);
    }
    for limb in area.iter_mut().skip(full_limbs + if residual != 0 { 1 } else { 0 }) {
        *limb = Limb::ZERO;
    }
    area
}
