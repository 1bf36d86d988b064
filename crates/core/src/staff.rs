//! Staff directory entries: role-typed medical personnel.
//!
//! A staff member may be attached to several centres but is *available* in at
//! most one of them at a time, and only in a centre it is already attached
//! to. Attachment is bidirectional (the centre keeps a roster, the staff
//! member keeps an attachment set); both sides are kept consistent by the
//! network aggregate, which is why the mutating methods here are
//! crate-private.

use crate::error::{HospitalError, HospitalResult};
use chrono::NaiveDate;
use mednet_types::NonEmptyText;
use serde::{Deserialize, Serialize};

/// Capability of a staff member. Closed set: eligibility rules are
/// exhaustively enumerable over these tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StaffRole {
    Physician,
    Nurse,
    Surgeon,
}

impl StaffRole {
    pub fn as_str(self) -> &'static str {
        match self {
            StaffRole::Physician => "physician",
            StaffRole::Nurse => "nurse",
            StaffRole::Surgeon => "surgeon",
        }
    }
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity fields shared by every person known to the network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub last_name: NonEmptyText,
    pub first_name: NonEmptyText,
    pub birth_date: NaiveDate,
}

impl Identity {
    pub fn new(last_name: &str, first_name: &str, birth_date: NaiveDate) -> HospitalResult<Self> {
        Ok(Self {
            last_name: NonEmptyText::new(last_name)?,
            first_name: NonEmptyText::new(first_name)?,
            birth_date,
        })
    }
}

/// A member of the medical staff directory, keyed by email.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Staff {
    identity: Identity,
    role: StaffRole,
    email: String,
    phone: String,
    hired_on: NaiveDate,
    contract: String,
    attached_centers: Vec<String>,
    available_center: Option<String>,
}

impl Staff {
    /// Creates a staff member with no centre attachments and no availability.
    pub fn new(
        identity: Identity,
        role: StaffRole,
        email: impl Into<String>,
        phone: impl Into<String>,
        hired_on: NaiveDate,
        contract: impl Into<String>,
    ) -> Self {
        Self {
            identity,
            role,
            email: email.into(),
            phone: phone.into(),
            hired_on,
            contract: contract.into(),
            attached_centers: Vec::new(),
            available_center: None,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn role(&self) -> StaffRole {
        self.role
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn hired_on(&self) -> NaiveDate {
        self.hired_on
    }

    pub fn contract(&self) -> &str {
        &self.contract
    }

    /// Centres this staff member is attached to, in attachment order.
    pub fn attached_centers(&self) -> &[String] {
        &self.attached_centers
    }

    /// The centre this staff member currently works from, if any.
    pub fn available_center(&self) -> Option<&str> {
        self.available_center.as_deref()
    }

    pub fn is_attached_to(&self, center: &str) -> bool {
        self.attached_centers.iter().any(|name| name == center)
    }

    pub fn is_available_in(&self, center: &str) -> bool {
        self.available_center.as_deref() == Some(center)
    }

    /// Records the staff side of a bidirectional attachment. Idempotent.
    pub(crate) fn record_attachment(&mut self, center: &str) {
        if !self.is_attached_to(center) {
            self.attached_centers.push(center.to_owned());
        }
    }

    /// Declares the centre this staff member currently works from.
    /// Availability must reference an already-attached centre.
    pub(crate) fn set_availability(&mut self, center: &str) -> HospitalResult<()> {
        if !self.is_attached_to(center) {
            return Err(HospitalError::StaffNotAttached {
                staff: self.email.clone(),
                center: center.to_owned(),
            });
        }
        self.available_center = Some(center.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nurse() -> Staff {
        let identity = Identity::new(
            "Ayodele",
            "Imani",
            NaiveDate::from_ymd_opt(1990, 7, 5).expect("valid date"),
        )
        .expect("valid identity");
        Staff::new(
            identity,
            StaffRole::Nurse,
            "imani.ayodele@mednet.example",
            "0600000002",
            NaiveDate::from_ymd_opt(2021, 6, 1).expect("valid date"),
            "permanent",
        )
    }

    #[test]
    fn availability_requires_prior_attachment() {
        let mut staff = nurse();
        let err = staff
            .set_availability("Harwick General")
            .expect_err("not attached yet");
        assert!(matches!(err, HospitalError::StaffNotAttached { .. }));
        assert_eq!(staff.available_center(), None);

        staff.record_attachment("Harwick General");
        staff
            .set_availability("Harwick General")
            .expect("attached now");
        assert!(staff.is_available_in("Harwick General"));
    }

    #[test]
    fn availability_moves_with_the_latest_declaration() {
        let mut staff = nurse();
        staff.record_attachment("Harwick General");
        staff.record_attachment("Westbrook Clinic");

        staff.set_availability("Harwick General").expect("attached");
        staff.set_availability("Westbrook Clinic").expect("attached");

        assert!(staff.is_available_in("Westbrook Clinic"));
        assert!(!staff.is_available_in("Harwick General"));
    }

    #[test]
    fn repeated_attachment_is_idempotent() {
        let mut staff = nurse();
        staff.record_attachment("Harwick General");
        staff.record_attachment("Harwick General");
        assert_eq!(staff.attached_centers().len(), 1);
    }
}
