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

//! Scoped scratch storage for a single `sum` call.
//!
//! The teacher crate this is descended from acquired scratch limbs from a
//! `TmpAllocator` that had to be threaded through every call and released
//! explicitly on every exit path. Here that scoping is just ordinary Rust
//! ownership: `Scratch` owns its `Vec<Limb>` buffers, and they are freed by
//! `Drop` on every return path, including the NaN/infinity fast returns and
//! an early `SumError`, with no explicit release call needed anywhere.

use crate::limb::Limb;

/// A reusable scratch buffer, sized to the largest request seen so far.
///
/// `sum_raw` calls this once per iteration (typically only once, since
/// cancellation retries are rare); reusing the allocation across iterations
/// avoids repeated heap churn on the common, non-cancelling path.
#[derive(Default)]
pub struct Scratch {
    buf: Vec<Limb>,
}

impl Scratch {
    pub fn new() -> Scratch {
        Scratch { buf: Vec::new() }
    }

    /// Returns a zero-filled scratch area of exactly `len` limbs.
    pub fn take(&mut self, len: usize) -> &mut [Limb] {
        if self.buf.len() < len {
            self.buf.resize(len, Limb::ZERO);
        }
        let area = &mut self.buf[..len];
        for limb in area.iter_mut() {
            *limb = Limb::ZERO;
        }
        area
    }
}
