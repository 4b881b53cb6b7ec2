//! Core data models for the portage simulation engine.
//!
//! This module contains all the domain models used throughout the engine.

mod contribution;
mod simulation_input;
mod simulation_result;

pub use contribution::{
    ConfiguredRate, ContributionBase, ContributionBreakdown, ContributionLine, ContributionRule,
};
pub use simulation_input::SimulationInput;
pub use simulation_result::{
    AuditStep, AuditTrace, AuditWarning, RateScenario, SimulationResult, SolverDiagnostics,
};
