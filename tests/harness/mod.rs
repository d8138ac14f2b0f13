// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test harness for the contact form relay.
//!
//! Provides payload generators and a mock mail transport for driving
//! the pipeline end to end without a real delivery service.

pub mod generators;
pub mod transport;
