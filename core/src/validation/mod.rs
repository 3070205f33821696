//! Invariant validation for flow networks
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod correctness;

pub use self::correctness::{FlowValidator, InvariantViolation, ValidationReport};
