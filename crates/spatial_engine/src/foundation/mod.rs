//! Foundation utilities
//!
//! Fundamental math types shared by every module.

pub mod math;
