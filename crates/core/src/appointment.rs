//! Appointments and their lifecycle.
//!
//! An appointment is a still-mutable intent to perform a medical act. It
//! starts `Scheduled` and terminates in `Cancelled` or `Completed`; every
//! transition is legal from `Scheduled` only, and an operation attempted
//! from a terminal state fails without touching anything.
//!
//! Identity (`id`), patient, centre and act kind are fixed at creation; only
//! the scheduled time and the status move, and only through the methods
//! below. All of those are crate-private: the network aggregate is the sole
//! caller, because rescheduling must re-run network-wide conflict detection
//! before the time is updated.

use crate::act::ActKind;
use crate::error::{HospitalError, HospitalResult};
use crate::staff::StaffRole;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of an appointment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Scheduled,
    Cancelled,
    Completed,
}

/// A scheduled intent to perform an act of `kind` on `patient` at `center`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Appointment {
    id: String,
    scheduled_at: DateTime<Utc>,
    patient: String,
    center: String,
    kind: ActKind,
    team: Vec<String>,
    status: AppointmentStatus,
}

impl Appointment {
    /// Creates a `Scheduled` appointment after checking the per-kind roster
    /// shape. `roles` must be the resolved roles of `team`, in order.
    pub(crate) fn new(
        id: impl Into<String>,
        scheduled_at: DateTime<Utc>,
        patient: impl Into<String>,
        center: impl Into<String>,
        kind: ActKind,
        team: Vec<String>,
        roles: &[StaffRole],
    ) -> HospitalResult<Self> {
        kind.check_team(roles)?;
        Ok(Self {
            id: id.into(),
            scheduled_at,
            patient: patient.into(),
            center: center.into(),
            kind,
            team,
            status: AppointmentStatus::Scheduled,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn scheduled_at(&self) -> DateTime<Utc> {
        self.scheduled_at
    }

    /// Health identifier of the patient.
    pub fn patient(&self) -> &str {
        &self.patient
    }

    /// Name of the centre where the act will take place.
    pub fn center(&self) -> &str {
        &self.center
    }

    pub fn kind(&self) -> ActKind {
        self.kind
    }

    /// Emails of the assigned staff.
    pub fn team(&self) -> &[String] {
        &self.team
    }

    pub fn status(&self) -> AppointmentStatus {
        self.status
    }

    pub fn is_assigned(&self, staff: &str) -> bool {
        self.team.iter().any(|email| email == staff)
    }

    pub(crate) fn ensure_scheduled(&self) -> HospitalResult<()> {
        if self.status != AppointmentStatus::Scheduled {
            return Err(HospitalError::NotScheduled(self.id.clone()));
        }
        Ok(())
    }

    /// Patient-initiated cancellation. Requires at least 24 hours between
    /// the request and the scheduled time.
    pub(crate) fn cancel_by_patient(&mut self, requested_at: DateTime<Utc>) -> HospitalResult<()> {
        self.ensure_scheduled()?;
        if self.scheduled_at - requested_at < Duration::hours(24) {
            return Err(HospitalError::LateCancellation(self.scheduled_at));
        }
        self.status = AppointmentStatus::Cancelled;
        Ok(())
    }

    /// Staff-initiated cancellation. Only an assigned team member may cancel,
    /// with no notice requirement.
    pub(crate) fn cancel_by_staff(&mut self, staff: &str) -> HospitalResult<()> {
        self.ensure_scheduled()?;
        if !self.is_assigned(staff) {
            return Err(HospitalError::StaffNotAssigned {
                staff: staff.to_owned(),
                appointment: self.id.clone(),
            });
        }
        self.status = AppointmentStatus::Cancelled;
        Ok(())
    }

    /// Updates the scheduled time. The caller must have already re-run
    /// conflict detection against the new time.
    pub(crate) fn set_time(&mut self, new_time: DateTime<Utc>) -> HospitalResult<()> {
        self.ensure_scheduled()?;
        self.scheduled_at = new_time;
        Ok(())
    }

    /// Moves the appointment to `Completed`. The network calls this after
    /// the corresponding act has been constructed and appended.
    pub(crate) fn complete(&mut self) -> HospitalResult<()> {
        self.ensure_scheduled()?;
        self.status = AppointmentStatus::Completed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consultation_at(scheduled_at: DateTime<Utc>) -> Appointment {
        Appointment::new(
            "APT-1",
            scheduled_at,
            "2980412756012",
            "Westbrook Clinic",
            ActKind::Consultation,
            vec!["paul.martel@mednet.example".to_owned()],
            &[StaffRole::Physician],
        )
        .expect("eligible roster")
    }

    #[test]
    fn creation_enforces_the_roster_shape() {
        let err = Appointment::new(
            "APT-2",
            Utc::now(),
            "2980412756012",
            "Westbrook Clinic",
            ActKind::Consultation,
            vec!["lea.pettit@mednet.example".to_owned()],
            &[StaffRole::Nurse],
        )
        .expect_err("a nurse cannot hold a consultation");
        assert!(matches!(err, HospitalError::ConsultationEligibility));
    }

    #[test]
    fn patient_cancellation_needs_24_hours_notice() {
        let scheduled_at = Utc::now() + Duration::days(3);

        let mut too_late = consultation_at(scheduled_at);
        let err = too_late
            .cancel_by_patient(scheduled_at - Duration::hours(12))
            .expect_err("12 hours notice is not enough");
        assert!(matches!(err, HospitalError::LateCancellation(_)));
        assert_eq!(too_late.status(), AppointmentStatus::Scheduled);

        let mut in_time = consultation_at(scheduled_at);
        in_time
            .cancel_by_patient(scheduled_at - Duration::hours(25))
            .expect("25 hours notice is enough");
        assert_eq!(in_time.status(), AppointmentStatus::Cancelled);
    }

    #[test]
    fn only_assigned_staff_may_cancel() {
        let mut appointment = consultation_at(Utc::now() + Duration::days(3));
        let err = appointment
            .cancel_by_staff("someone.else@mednet.example")
            .expect_err("not on the team");
        assert!(matches!(err, HospitalError::StaffNotAssigned { .. }));
        assert_eq!(appointment.status(), AppointmentStatus::Scheduled);

        appointment
            .cancel_by_staff("paul.martel@mednet.example")
            .expect("assigned staff may cancel");
        assert_eq!(appointment.status(), AppointmentStatus::Cancelled);
    }

    #[test]
    fn terminal_states_refuse_every_transition() {
        let scheduled_at = Utc::now() + Duration::days(3);
        let mut appointment = consultation_at(scheduled_at);
        appointment.complete().expect("scheduled, may complete");

        assert!(matches!(
            appointment.cancel_by_patient(scheduled_at - Duration::days(2)),
            Err(HospitalError::NotScheduled(_))
        ));
        assert!(matches!(
            appointment.cancel_by_staff("paul.martel@mednet.example"),
            Err(HospitalError::NotScheduled(_))
        ));
        assert!(matches!(
            appointment.set_time(scheduled_at + Duration::days(1)),
            Err(HospitalError::NotScheduled(_))
        ));
        assert!(matches!(
            appointment.complete(),
            Err(HospitalError::NotScheduled(_))
        ));
        // The failed transitions left time and status untouched.
        assert_eq!(appointment.scheduled_at(), scheduled_at);
        assert_eq!(appointment.status(), AppointmentStatus::Completed);
    }
}
