//! Business-rule error taxonomy for the scheduling engine.
//!
//! Every validating operation either fully succeeds or returns a
//! [`HospitalError`] and makes no observable change. All variants are
//! deterministic precondition failures, never transient faults, so hosts may
//! present the message as-is and must not retry.

use chrono::{DateTime, Utc};

#[derive(Debug, thiserror::Error)]
pub enum HospitalError {
    #[error("no centre named '{0}' is registered with the network")]
    CenterNotFound(String),
    #[error("no staff member with email '{0}' is known to the network")]
    StaffNotFound(String),
    #[error("no patient with health identifier '{0}' is known to the network")]
    PatientNotFound(String),
    #[error("appointment '{0}' not found")]
    AppointmentNotFound(String),

    #[error("a centre named '{0}' is already registered")]
    DuplicateCenter(String),
    #[error("a staff member with email '{0}' is already registered")]
    DuplicateStaff(String),
    #[error("a patient with health identifier '{0}' is already registered")]
    DuplicatePatient(String),
    #[error("appointment '{0}' already exists")]
    DuplicateAppointment(String),

    #[error("a medical act must be assigned to at least one staff member")]
    EmptyTeam,
    #[error("a consultation must be performed by exactly one physician")]
    ConsultationEligibility,
    #[error("a treatment must be performed by exactly one nurse")]
    TreatmentEligibility,
    #[error("a surgical intervention may only involve surgeons and nurses")]
    SurgeryTeamComposition,
    #[error("a surgical intervention requires at least one surgeon and one nurse")]
    SurgeryTeamIncomplete,
    #[error("the patient's residence city must belong to their residence region")]
    CityOutsideRegion,
    #[error("centre '{center}' is outside the residence region of patient '{patient}'")]
    RegionalAccess { patient: String, center: String },
    #[error("staff member '{staff}' is not attached to centre '{center}'")]
    StaffNotAttached { staff: String, center: String },
    #[error("staff member '{staff}' is not currently available at centre '{center}'")]
    StaffUnavailable { staff: String, center: String },

    #[error("appointment '{0}' is no longer scheduled")]
    NotScheduled(String),
    #[error("this medical act has already been fulfilled")]
    ActAlreadyFulfilled,
    #[error("patient cancellation requires at least 24 hours notice before {0}")]
    LateCancellation(DateTime<Utc>),
    #[error("staff member '{staff}' is not assigned to appointment '{appointment}'")]
    StaffNotAssigned { staff: String, appointment: String },

    #[error("the patient already has an appointment of another kind at this slot")]
    PatientSlotConflict,
    #[error("a staff member is already booked at this slot")]
    StaffSlotConflict,

    #[error("pointless transfer: the patient is already at centre '{0}'")]
    RedundantTransfer(String),

    #[error(transparent)]
    Text(#[from] mednet_types::TextError),
}

pub type HospitalResult<T> = std::result::Result<T, HospitalError>;
