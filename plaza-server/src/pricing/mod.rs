//! Coupon Pricing Module
//!
//! Discount evaluation for coupon codes. Evaluation is a pure function
//! so the booking flow and the public validate endpoint share it.

mod evaluator;

pub use evaluator::*;
