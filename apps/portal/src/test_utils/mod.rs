//! Test utilities.
//!
//! This module provides:
//! - Test data factories for creating valid records
//! - In-memory gateway implementations standing in for the backend

mod factories;
mod gateway_mocks;

pub use factories::*;
pub use gateway_mocks::*;
