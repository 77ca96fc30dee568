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

//! Correctly-rounded arbitrary-precision summation of binary
//! floating-point numbers.
//!
//! [`sum`] adds a slice of [`Number`] values and rounds the single,
//! infinitely-precise mathematical result to the output's target
//! precision exactly once, the way MPFR's `mpfr_sum` does: no
//! double-rounding, regardless of how much cancellation occurs among the
//! inputs.

pub mod limb;
pub mod ll;
mod mem;

pub mod number;
pub mod rounding;

mod classify;
mod resolve;
mod sum_raw;
mod window;

pub mod sum;

pub use crate::number::{Number, Sign, SumError};
pub use crate::rounding::{RoundingMode, Ternary};
pub use crate::sum::sum;
