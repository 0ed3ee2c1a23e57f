// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Scoring and ranking: how search results get their numbers and their order.
//!
//! Field weights decide how much a hit in each field is worth; the ranking
//! module decides what happens when scores tie or the caller asks for a
//! different order.

mod core;
pub mod ranking;

pub use core::*;
