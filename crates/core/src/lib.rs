//! # mednet-core
//!
//! Scheduling and validation engine for a hospital network: staff, patients,
//! centres and appointments, with role-based eligibility rules, slot-conflict
//! detection, capacity queries and cross-centre patient transfers.
//!
//! The engine is a pure in-memory library. [`network::HospitalNetwork`] is
//! the coordinating aggregate and the only mutation boundary; the entities it
//! owns (appointments, acts, records) enforce their own invariants when the
//! network delegates to them. Every validating operation either fully
//! succeeds or returns a [`error::HospitalError`] and changes nothing.
//!
//! **No host concerns**: persistence, transport, authentication and
//! presentation belong to the application driving this crate.

pub mod act;
pub mod appointment;
pub mod error;
pub mod geography;
pub mod network;
pub mod patient;
pub mod staff;

pub use act::{ActKind, MedicalAct};
pub use appointment::{Appointment, AppointmentStatus};
pub use error::{HospitalError, HospitalResult};
pub use geography::{City, Department, Region};
pub use network::{HospitalCenter, HospitalNetwork};
pub use patient::{MedicalRecord, Patient, TransferRecord};
pub use staff::{Identity, Staff, StaffRole};
