//! Payroll Deduction Engine for Uruguayan Salaries
//!
//! This crate computes social security contributions (retirement, FONASA, FRL)
//! and personal income tax (IRPF) from a gross monthly salary and a household
//! profile, producing a net salary and an itemized, audited breakdown.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
