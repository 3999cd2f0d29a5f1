//! Authgate - Authentication Service
//!
//! Registers users, logs them in and validates their email addresses.
//! Domain events raised by aggregates are written to a transactional outbox
//! together with the state change and dispatched to their handlers by a
//! background job.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
