//! Payslip simulation engine for French salary portage.
//!
//! This crate turns a consultant's billing (daily rate × days) into a full
//! payslip: gross salary, itemized employer and employee contributions,
//! general reduction, reserve provision and net pay, together with an audit
//! trace of every step.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
