//! # Patientor Core
//!
//! Core state management for the Patientor patient records client.
//!
//! This crate contains pure data types and state transitions:
//! - The domain model (`Patient`, `Diagnosis`, `Entry`, `NewEntry`)
//! - The normalised store and its reducer
//! - Client configuration resolved at startup
//!
//! **No I/O**: HTTP access belongs in `patientor-client`, views in `patientor-view`.

pub mod config;
pub mod constants;
pub mod error;
pub mod model;
pub mod store;

pub use config::ClientConfig;
pub use error::{CoreError, CoreResult};
pub use model::{
    Diagnosis, Discharge, Entry, EntryKind, EntryType, Gender, HealthCheckRating, NewEntry,
    NewPatient, Patient, PatientUpdate, SickLeave,
};
pub use store::{reduce, Action, Precedence, StateContainer, Store};

// Re-export validated text types so downstream crates need only one import.
pub use patientor_types::{IsoDate, NonEmptyText, TextError};
