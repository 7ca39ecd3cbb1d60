//! Statistics module for Ritualist
//!
//! This module provides aggregate views over a habit's history for
//! presentation layers. Everything here is derived on demand from a habit
//! and its log snapshot.

mod completion_rate;

pub use completion_rate::{CompletionRate, CompletionRateAnalyzer};
