//! The network scheduler: the coordinating aggregate of the engine.
//!
//! [`HospitalNetwork`] owns every centre, staff member, patient and
//! appointment, and is the sole mutation boundary. Cross-entity references
//! are opaque string identifiers (centre name, staff email, patient health
//! identifier, appointment id) resolved through the network's lookup tables,
//! so entities carry no back-pointers.
//!
//! Responsibilities:
//! - Register centres, staff and patients, rejecting duplicates.
//! - Keep staff↔centre attachment bidirectional and availability consistent.
//! - Enforce regional access and staff availability when scheduling.
//! - Detect slot conflicts across the whole network.
//! - Compute per-kind capacity and coordinate patient transfers.
//!
//! Concurrency: every mutating operation takes `&mut self` and performs a
//! full read of shared state before writing, so the borrow checker enforces
//! the required single-writer rule. Read-only queries take `&self`. A host
//! that shares a network across threads wraps it in a `Mutex` or `RwLock`;
//! nothing here blocks or performs I/O.

use crate::act::{ActKind, MedicalAct};
use crate::appointment::{Appointment, AppointmentStatus};
use crate::error::{HospitalError, HospitalResult};
use crate::geography::City;
use crate::patient::{MedicalRecord, Patient};
use crate::staff::{Staff, StaffRole};
use chrono::{DateTime, Utc};
use mednet_types::NonEmptyText;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A hospital centre registered with the network.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HospitalCenter {
    name: NonEmptyText,
    city: City,
    roster: Vec<String>,
}

impl HospitalCenter {
    fn new(name: NonEmptyText, city: City) -> Self {
        Self {
            name,
            city,
            roster: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn city(&self) -> &City {
        &self.city
    }

    /// Emails of the staff attached to this centre, in attachment order.
    pub fn roster(&self) -> &[String] {
        &self.roster
    }

    fn add_to_roster(&mut self, email: &str) {
        if !self.roster.iter().any(|entry| entry == email) {
            self.roster.push(email.to_owned());
        }
    }
}

/// The hospital network aggregate. See the module documentation.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct HospitalNetwork {
    centers: HashMap<String, HospitalCenter>,
    staff: HashMap<String, Staff>,
    patients: HashMap<String, Patient>,
    appointments: HashMap<String, Appointment>,
}

impl HospitalNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a centre under its (non-blank) name.
    pub fn register_center(&mut self, name: &str, city: City) -> HospitalResult<&HospitalCenter> {
        let name = NonEmptyText::new(name)?;
        if self.centers.contains_key(name.as_str()) {
            return Err(HospitalError::DuplicateCenter(name.into_inner()));
        }
        tracing::debug!(center = %name, "registered hospital centre");
        let key = name.as_str().to_owned();
        let center = HospitalCenter::new(name, city);
        Ok(self.centers.entry(key).or_insert(center))
    }

    /// Adds a staff member to the directory, keyed by email.
    pub fn add_staff(&mut self, staff: Staff) -> HospitalResult<()> {
        if self.staff.contains_key(staff.email()) {
            return Err(HospitalError::DuplicateStaff(staff.email().to_owned()));
        }
        tracing::debug!(staff = staff.email(), role = %staff.role(), "added staff member");
        self.staff.insert(staff.email().to_owned(), staff);
        Ok(())
    }

    /// Attaches a staff member to a centre, updating both the staff
    /// attachment set and the centre roster. Re-attaching is a no-op.
    pub fn attach_staff(&mut self, email: &str, center: &str) -> HospitalResult<()> {
        if !self.centers.contains_key(center) {
            return Err(HospitalError::CenterNotFound(center.to_owned()));
        }
        let member = self
            .staff
            .get_mut(email)
            .ok_or_else(|| HospitalError::StaffNotFound(email.to_owned()))?;
        member.record_attachment(center);
        if let Some(entry) = self.centers.get_mut(center) {
            entry.add_to_roster(email);
        }
        Ok(())
    }

    /// Declares the centre a staff member currently works from. The member
    /// must already be attached to that centre.
    pub fn set_availability(&mut self, email: &str, center: &str) -> HospitalResult<()> {
        if !self.centers.contains_key(center) {
            return Err(HospitalError::CenterNotFound(center.to_owned()));
        }
        let member = self
            .staff
            .get_mut(email)
            .ok_or_else(|| HospitalError::StaffNotFound(email.to_owned()))?;
        member.set_availability(center)
    }

    /// Adds a patient, keyed by national health identifier. The patient's
    /// current centre must be registered.
    pub fn add_patient(&mut self, patient: Patient) -> HospitalResult<()> {
        if !self.centers.contains_key(patient.current_center()) {
            return Err(HospitalError::CenterNotFound(
                patient.current_center().to_owned(),
            ));
        }
        if self.patients.contains_key(patient.health_id()) {
            return Err(HospitalError::DuplicatePatient(patient.health_id().to_owned()));
        }
        tracing::debug!(patient = patient.health_id(), "added patient");
        self.patients.insert(patient.health_id().to_owned(), patient);
        Ok(())
    }

    /// Moves a patient to another registered centre, recording the transfer
    /// in the medical record. Existing appointments and staff availability
    /// are deliberately left untouched; future scheduling re-validates both.
    pub fn transfer_patient(
        &mut self,
        health_id: &str,
        new_center: &str,
        transferred_at: DateTime<Utc>,
    ) -> HospitalResult<()> {
        if !self.centers.contains_key(new_center) {
            return Err(HospitalError::CenterNotFound(new_center.to_owned()));
        }
        let patient = self
            .patients
            .get_mut(health_id)
            .ok_or_else(|| HospitalError::PatientNotFound(health_id.to_owned()))?;
        patient.transfer_to(new_center, transferred_at)?;
        tracing::debug!(patient = health_id, center = new_center, "patient transferred");
        Ok(())
    }

    /// Creates an appointment. Checks run in a fixed order, and nothing is
    /// written until all of them pass:
    ///
    /// 1. `id` must be free;
    /// 2. `center` must be registered;
    /// 3. the patient's residence region must contain the centre's city;
    /// 4. every team member must be attached to `center` and currently
    ///    available there;
    /// 5. the team must match the roster shape for `kind`;
    /// 6. the slot must be free of conflicts network-wide.
    pub fn create_appointment(
        &mut self,
        id: &str,
        scheduled_at: DateTime<Utc>,
        health_id: &str,
        center: &str,
        kind: ActKind,
        team: &[&str],
    ) -> HospitalResult<&Appointment> {
        if self.appointments.contains_key(id) {
            return Err(HospitalError::DuplicateAppointment(id.to_owned()));
        }
        let center_entry = self
            .centers
            .get(center)
            .ok_or_else(|| HospitalError::CenterNotFound(center.to_owned()))?;
        let patient = self
            .patients
            .get(health_id)
            .ok_or_else(|| HospitalError::PatientNotFound(health_id.to_owned()))?;
        if !patient.residence_region().contains_city(center_entry.city()) {
            tracing::warn!(
                patient = health_id,
                center,
                "appointment refused: centre outside patient region"
            );
            return Err(HospitalError::RegionalAccess {
                patient: health_id.to_owned(),
                center: center.to_owned(),
            });
        }
        let roles = self.assignable_roles(center, team)?;
        let team: Vec<String> = team.iter().map(|email| (*email).to_owned()).collect();
        let appointment =
            Appointment::new(id, scheduled_at, health_id, center, kind, team, &roles)?;
        self.check_slot(scheduled_at, health_id, kind, appointment.team(), None)?;

        if let Some(patient) = self.patients.get_mut(health_id) {
            patient.record_appointment(id);
        }
        tracing::debug!(appointment = id, patient = health_id, kind = %kind, "appointment created");
        Ok(self.appointments.entry(id.to_owned()).or_insert(appointment))
    }

    /// Moves a scheduled appointment to a new time, after re-running conflict
    /// detection against that time (the appointment itself excluded).
    pub fn reschedule_appointment(
        &mut self,
        id: &str,
        new_time: DateTime<Utc>,
    ) -> HospitalResult<()> {
        let appointment = self
            .appointments
            .get(id)
            .ok_or_else(|| HospitalError::AppointmentNotFound(id.to_owned()))?;
        appointment.ensure_scheduled()?;

        let health_id = appointment.patient().to_owned();
        let kind = appointment.kind();
        let team = appointment.team().to_vec();
        self.check_slot(new_time, &health_id, kind, &team, Some(id))?;

        if let Some(appointment) = self.appointments.get_mut(id) {
            appointment.set_time(new_time)?;
        }
        tracing::debug!(appointment = id, "appointment rescheduled");
        Ok(())
    }

    /// Patient-initiated cancellation; requires 24 hours notice.
    pub fn cancel_by_patient(
        &mut self,
        id: &str,
        requested_at: DateTime<Utc>,
    ) -> HospitalResult<()> {
        self.appointment_mut(id)?.cancel_by_patient(requested_at)
    }

    /// Staff-initiated cancellation; only assigned staff may cancel.
    pub fn cancel_by_staff(&mut self, id: &str, staff: &str) -> HospitalResult<()> {
        self.appointment_mut(id)?.cancel_by_staff(staff)
    }

    /// Fulfils a scheduled appointment: constructs the corresponding act
    /// (re-running the eligibility rule), appends it fulfilled to the
    /// patient's record and completes the appointment. Returns the act.
    pub fn fulfill_appointment(&mut self, id: &str) -> HospitalResult<MedicalAct> {
        let appointment = self
            .appointments
            .get(id)
            .ok_or_else(|| HospitalError::AppointmentNotFound(id.to_owned()))?;
        appointment.ensure_scheduled()?;

        let scheduled_at = appointment.scheduled_at();
        let kind = appointment.kind();
        let health_id = appointment.patient().to_owned();
        let center = appointment.center().to_owned();
        let team = appointment.team().to_vec();

        let roles = self.team_roles(&team)?;
        let record_number = self
            .patients
            .get(&health_id)
            .ok_or_else(|| HospitalError::PatientNotFound(health_id.clone()))?
            .record()
            .record_number()
            .to_owned();

        let mut act = MedicalAct::new(
            kind,
            scheduled_at,
            health_id.clone(),
            center,
            team,
            &roles,
            record_number,
        )?;
        act.mark_fulfilled()?;
        if let Some(patient) = self.patients.get_mut(&health_id) {
            patient.record_mut().append_act(act.clone());
        }
        if let Some(appointment) = self.appointments.get_mut(id) {
            appointment.complete()?;
        }
        tracing::debug!(appointment = id, patient = %health_id, "appointment fulfilled");
        Ok(act)
    }

    /// Counts how many more appointments of `kind` could be created at
    /// `center` for the given time.
    ///
    /// A staff member counts as free when attached to the centre, currently
    /// available there, and not on any scheduled appointment at that time
    /// anywhere in the network. Surgical capacity is bounded by the scarcer
    /// of surgeons and nurses, reflecting the joint-staffing rule.
    pub fn available_count(
        &self,
        at: DateTime<Utc>,
        center: &str,
        kind: ActKind,
    ) -> HospitalResult<usize> {
        let center_entry = self
            .centers
            .get(center)
            .ok_or_else(|| HospitalError::CenterNotFound(center.to_owned()))?;

        let busy: HashSet<&str> = self
            .appointments
            .values()
            .filter(|appointment| {
                appointment.status() == AppointmentStatus::Scheduled
                    && appointment.scheduled_at() == at
            })
            .flat_map(|appointment| appointment.team().iter().map(String::as_str))
            .collect();

        let mut physicians = 0;
        let mut nurses = 0;
        let mut surgeons = 0;
        for email in center_entry.roster() {
            let Some(member) = self.staff.get(email) else {
                continue;
            };
            if !member.is_available_in(center) || busy.contains(email.as_str()) {
                continue;
            }
            match member.role() {
                StaffRole::Physician => physicians += 1,
                StaffRole::Nurse => nurses += 1,
                StaffRole::Surgeon => surgeons += 1,
            }
        }

        Ok(match kind {
            ActKind::Consultation => physicians,
            ActKind::Treatment => nurses,
            ActKind::SurgicalIntervention => surgeons.min(nurses),
        })
    }

    /// Read-only view of a patient's record: acts history plus transfers.
    pub fn record_of(&self, health_id: &str) -> HospitalResult<&MedicalRecord> {
        Ok(self
            .patients
            .get(health_id)
            .ok_or_else(|| HospitalError::PatientNotFound(health_id.to_owned()))?
            .record())
    }

    pub fn center(&self, name: &str) -> Option<&HospitalCenter> {
        self.centers.get(name)
    }

    pub fn staff_member(&self, email: &str) -> Option<&Staff> {
        self.staff.get(email)
    }

    pub fn patient(&self, health_id: &str) -> Option<&Patient> {
        self.patients.get(health_id)
    }

    pub fn appointment(&self, id: &str) -> Option<&Appointment> {
        self.appointments.get(id)
    }

    /// Resolves team roles for scheduling, checking each member exists, is
    /// attached to `center` and is currently available there. The first
    /// failing member determines the error.
    fn assignable_roles(&self, center: &str, team: &[&str]) -> HospitalResult<Vec<StaffRole>> {
        let mut roles = Vec::with_capacity(team.len());
        for email in team {
            let member = self
                .staff
                .get(*email)
                .ok_or_else(|| HospitalError::StaffNotFound((*email).to_owned()))?;
            if !member.is_attached_to(center) {
                return Err(HospitalError::StaffNotAttached {
                    staff: (*email).to_owned(),
                    center: center.to_owned(),
                });
            }
            if !member.is_available_in(center) {
                return Err(HospitalError::StaffUnavailable {
                    staff: (*email).to_owned(),
                    center: center.to_owned(),
                });
            }
            roles.push(member.role());
        }
        Ok(roles)
    }

    /// Resolves team roles without attachment checks, for act construction
    /// at fulfilment time.
    fn team_roles(&self, team: &[String]) -> HospitalResult<Vec<StaffRole>> {
        team.iter()
            .map(|email| {
                self.staff
                    .get(email)
                    .map(Staff::role)
                    .ok_or_else(|| HospitalError::StaffNotFound(email.clone()))
            })
            .collect()
    }

    /// Scans every scheduled appointment at exactly `at` (excluding
    /// `exclude`, when rescheduling) for conflicts with the prospective slot.
    ///
    /// A same-patient appointment of a *different* kind at the slot is a
    /// conflict; a same-patient appointment of the same kind is accepted,
    /// which callers should treat as a known edge case. Staff are exclusive
    /// per slot regardless of kind.
    fn check_slot(
        &self,
        at: DateTime<Utc>,
        health_id: &str,
        kind: ActKind,
        team: &[String],
        exclude: Option<&str>,
    ) -> HospitalResult<()> {
        for appointment in self.appointments.values() {
            if exclude.is_some_and(|excluded| excluded == appointment.id()) {
                continue;
            }
            if appointment.status() != AppointmentStatus::Scheduled
                || appointment.scheduled_at() != at
            {
                continue;
            }
            if appointment.patient() == health_id && appointment.kind() != kind {
                tracing::warn!(patient = health_id, slot = %at, "patient slot conflict");
                return Err(HospitalError::PatientSlotConflict);
            }
            if team.iter().any(|email| appointment.is_assigned(email)) {
                tracing::warn!(slot = %at, "staff slot conflict");
                return Err(HospitalError::StaffSlotConflict);
            }
        }
        Ok(())
    }

    fn appointment_mut(&mut self, id: &str) -> HospitalResult<&mut Appointment> {
        self.appointments
            .get_mut(id)
            .ok_or_else(|| HospitalError::AppointmentNotFound(id.to_owned()))
    }
}
