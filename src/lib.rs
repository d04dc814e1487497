//! # Meetwise Engine
//!
//! Scheduling and analytics engine for meetings across time zones.
//!
//! This crate implements the computational core of a meeting assistant:
//! conflict detection over overlapping meetings and availability windows,
//! multi-factor optimal-slot search across time zones, meeting-effectiveness
//! scoring, workload-balance computation, and pattern analysis over
//! historical meetings. The surrounding CRUD layer (HTTP transport, request
//! validation, persistence) lives outside this crate and talks to the engine
//! through plain records.
//!
//! ## Features
//!
//! - **Availability**: resolve a user's busy/free state for any interval
//! - **Conflicts**: direct overlaps, availability violations, and overload
//!   conditions with severities
//! - **Slot Search**: ranked candidate slots scored on availability margin,
//!   preference match, and timezone fairness
//! - **Effectiveness**: 0-10 meeting ratings from duration fit, timing, and
//!   engagement
//! - **Patterns & Workload**: per-user history breakdowns and team balance
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: entity records and result DTOs, all serde-serializable
//! - [`config`]: explicit engine configuration with documented defaults
//! - [`error`]: the validation-failure taxonomy
//! - [`models`]: time/calendar utilities and JSON boundary parsing
//! - [`services`]: the engine components themselves
//!
//! ## Determinism
//!
//! Every function is a pure transformation of its inputs: the engine never
//! reads the system clock, environment, or any storage, so identical inputs
//! always produce identical outputs. Concurrent callers may invoke the
//! engine freely as long as they do not mutate a snapshot mid-call.

pub mod api;

pub mod config;

pub mod error;

pub mod models;

pub mod services;
