//! Patients and their longitudinal medical records.
//!
//! A patient owns exactly one [`MedicalRecord`]. The record accumulates
//! completed acts and inter-centre transfers, both append-only; its identity
//! (`record_number`) is stable across transfers, only the reference centre
//! changes.

use crate::act::MedicalAct;
use crate::error::{HospitalError, HospitalResult};
use crate::geography::{City, Region};
use crate::staff::Identity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One centre-to-centre move of a patient's record. Immutable once appended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub transferred_at: DateTime<Utc>,
    pub from_center: String,
    pub to_center: String,
}

/// The cumulative, append-only history of a patient.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalRecord {
    record_number: String,
    reference_center: String,
    acts: Vec<MedicalAct>,
    transfers: Vec<TransferRecord>,
}

impl MedicalRecord {
    pub fn new(record_number: impl Into<String>, reference_center: impl Into<String>) -> Self {
        Self {
            record_number: record_number.into(),
            reference_center: reference_center.into(),
            acts: Vec::new(),
            transfers: Vec::new(),
        }
    }

    /// Stable record identifier; never changes, transfers included.
    pub fn record_number(&self) -> &str {
        &self.record_number
    }

    /// The centre currently holding this record. Equals the destination of
    /// the most recent transfer, or the original centre if none happened.
    pub fn reference_center(&self) -> &str {
        &self.reference_center
    }

    /// Completed acts, oldest first.
    pub fn acts(&self) -> &[MedicalAct] {
        &self.acts
    }

    /// Transfer history, oldest first.
    pub fn transfers(&self) -> &[TransferRecord] {
        &self.transfers
    }

    pub(crate) fn append_act(&mut self, act: MedicalAct) {
        self.acts.push(act);
    }

    pub(crate) fn record_transfer(
        &mut self,
        from_center: &str,
        to_center: &str,
        transferred_at: DateTime<Utc>,
    ) {
        self.transfers.push(TransferRecord {
            transferred_at,
            from_center: from_center.to_owned(),
            to_center: to_center.to_owned(),
        });
        self.reference_center = to_center.to_owned();
    }
}

/// A patient known to the network, keyed by national health identifier.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Patient {
    identity: Identity,
    health_id: String,
    postal_address: String,
    phone: String,
    email: String,
    insurance_number: Option<String>,
    residence_city: City,
    residence_region: Region,
    current_center: String,
    record: MedicalRecord,
    appointments: Vec<String>,
}

impl Patient {
    /// Creates a patient, enforcing that the residence city belongs to the
    /// residence region.
    ///
    /// When `record` is `None`, a medical record is created automatically
    /// with a number derived from the trailing six characters of the health
    /// identifier and the patient's current centre as reference.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        identity: Identity,
        health_id: impl Into<String>,
        postal_address: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
        insurance_number: Option<String>,
        residence_city: City,
        residence_region: Region,
        current_center: impl Into<String>,
        record: Option<MedicalRecord>,
    ) -> HospitalResult<Self> {
        if !residence_region.contains_city(&residence_city) {
            return Err(HospitalError::CityOutsideRegion);
        }
        let health_id = health_id.into();
        let current_center = current_center.into();
        let record = record
            .unwrap_or_else(|| MedicalRecord::new(derive_record_number(&health_id), &current_center));
        Ok(Self {
            identity,
            health_id,
            postal_address: postal_address.into(),
            phone: phone.into(),
            email: email.into(),
            insurance_number,
            residence_city,
            residence_region,
            current_center,
            record,
            appointments: Vec::new(),
        })
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn health_id(&self) -> &str {
        &self.health_id
    }

    pub fn postal_address(&self) -> &str {
        &self.postal_address
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn insurance_number(&self) -> Option<&str> {
        self.insurance_number.as_deref()
    }

    pub fn residence_city(&self) -> &City {
        &self.residence_city
    }

    pub fn residence_region(&self) -> &Region {
        &self.residence_region
    }

    /// Name of the centre currently caring for this patient.
    pub fn current_center(&self) -> &str {
        &self.current_center
    }

    pub fn record(&self) -> &MedicalRecord {
        &self.record
    }

    /// Appointment ids, in creation order.
    pub fn appointments(&self) -> &[String] {
        &self.appointments
    }

    pub(crate) fn record_mut(&mut self) -> &mut MedicalRecord {
        &mut self.record
    }

    pub(crate) fn record_appointment(&mut self, id: &str) {
        self.appointments.push(id.to_owned());
    }

    /// Moves the patient to `new_center`: appends a transfer entry to the
    /// record, repoints the record's reference centre and updates the current
    /// centre. Rejects a transfer to the centre the patient is already at.
    pub(crate) fn transfer_to(
        &mut self,
        new_center: &str,
        transferred_at: DateTime<Utc>,
    ) -> HospitalResult<()> {
        if new_center == self.current_center {
            return Err(HospitalError::RedundantTransfer(self.current_center.clone()));
        }
        let previous = std::mem::replace(&mut self.current_center, new_center.to_owned());
        self.record
            .record_transfer(&previous, new_center, transferred_at);
        Ok(())
    }
}

/// Record numbers are derived from the trailing six characters of the
/// national health identifier. Identifiers are opaque, so shorter ones are
/// used whole rather than rejected.
fn derive_record_number(health_id: &str) -> String {
    let chars: Vec<char> = health_id.chars().collect();
    let start = chars.len().saturating_sub(6);
    let suffix: String = chars[start..].iter().collect();
    format!("REC-{suffix}")
}
