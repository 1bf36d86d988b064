//! Medical act taxonomy and per-kind staffing eligibility.
//!
//! The three act kinds form a closed set and each carries a fixed eligibility
//! predicate over the roles of its assigned team ([`ActKind::check_team`]).
//! The same predicate runs twice on purpose: once when an appointment is
//! created and again when the act itself is constructed at fulfilment time.

use crate::error::{HospitalError, HospitalResult};
use crate::staff::StaffRole;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind of medical act an appointment will produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActKind {
    Consultation,
    Treatment,
    SurgicalIntervention,
}

impl ActKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActKind::Consultation => "consultation",
            ActKind::Treatment => "treatment",
            ActKind::SurgicalIntervention => "surgical intervention",
        }
    }

    /// Checks the staffing rule for this act kind against the team's roles:
    ///
    /// - consultation: exactly one physician;
    /// - treatment: exactly one nurse;
    /// - surgical intervention: surgeons and nurses only, with at least one
    ///   of each.
    ///
    /// An empty team is rejected for every kind.
    pub fn check_team(self, roles: &[StaffRole]) -> HospitalResult<()> {
        if roles.is_empty() {
            return Err(HospitalError::EmptyTeam);
        }
        match self {
            ActKind::Consultation => {
                if roles != [StaffRole::Physician] {
                    return Err(HospitalError::ConsultationEligibility);
                }
            }
            ActKind::Treatment => {
                if roles != [StaffRole::Nurse] {
                    return Err(HospitalError::TreatmentEligibility);
                }
            }
            ActKind::SurgicalIntervention => {
                if roles.iter().any(|role| *role == StaffRole::Physician) {
                    return Err(HospitalError::SurgeryTeamComposition);
                }
                let has_surgeon = roles.iter().any(|role| *role == StaffRole::Surgeon);
                let has_nurse = roles.iter().any(|role| *role == StaffRole::Nurse);
                if !(has_surgeon && has_nurse) {
                    return Err(HospitalError::SurgeryTeamIncomplete);
                }
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for ActKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A completed (or about to be completed) medical procedure, destined for
/// exactly one patient record.
///
/// Acts are only constructed by the network when an appointment is fulfilled;
/// once `fulfilled` is set it never reverts and the act is immutable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalAct {
    kind: ActKind,
    performed_at: DateTime<Utc>,
    patient: String,
    center: String,
    team: Vec<String>,
    record_number: String,
    fulfilled: bool,
}

impl MedicalAct {
    /// Builds an unfulfilled act after re-checking the eligibility rule for
    /// `kind`. `roles` must be the resolved roles of `team`, in order.
    pub(crate) fn new(
        kind: ActKind,
        performed_at: DateTime<Utc>,
        patient: impl Into<String>,
        center: impl Into<String>,
        team: Vec<String>,
        roles: &[StaffRole],
        record_number: impl Into<String>,
    ) -> HospitalResult<Self> {
        kind.check_team(roles)?;
        Ok(Self {
            kind,
            performed_at,
            patient: patient.into(),
            center: center.into(),
            team,
            record_number: record_number.into(),
            fulfilled: false,
        })
    }

    pub fn kind(&self) -> ActKind {
        self.kind
    }

    pub fn performed_at(&self) -> DateTime<Utc> {
        self.performed_at
    }

    /// Health identifier of the patient this act was performed on.
    pub fn patient(&self) -> &str {
        &self.patient
    }

    /// Name of the centre where the act took place.
    pub fn center(&self) -> &str {
        &self.center
    }

    /// Emails of the staff who performed the act.
    pub fn team(&self) -> &[String] {
        &self.team
    }

    /// Number of the medical record this act belongs to, captured from the
    /// patient when the act was constructed.
    pub fn record_number(&self) -> &str {
        &self.record_number
    }

    pub fn is_fulfilled(&self) -> bool {
        self.fulfilled
    }

    /// Marks the act as performed. Irreversible; a second call fails.
    pub(crate) fn mark_fulfilled(&mut self) -> HospitalResult<()> {
        if self.fulfilled {
            return Err(HospitalError::ActAlreadyFulfilled);
        }
        self.fulfilled = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use StaffRole::{Nurse, Physician, Surgeon};

    #[test]
    fn consultation_takes_exactly_one_physician() {
        ActKind::Consultation
            .check_team(&[Physician])
            .expect("one physician is the rule");

        assert!(matches!(
            ActKind::Consultation.check_team(&[Nurse]),
            Err(HospitalError::ConsultationEligibility)
        ));
        assert!(matches!(
            ActKind::Consultation.check_team(&[Physician, Physician]),
            Err(HospitalError::ConsultationEligibility)
        ));
    }

    #[test]
    fn treatment_takes_exactly_one_nurse() {
        ActKind::Treatment
            .check_team(&[Nurse])
            .expect("one nurse is the rule");

        assert!(matches!(
            ActKind::Treatment.check_team(&[Surgeon]),
            Err(HospitalError::TreatmentEligibility)
        ));
        assert!(matches!(
            ActKind::Treatment.check_team(&[Nurse, Nurse]),
            Err(HospitalError::TreatmentEligibility)
        ));
    }

    #[test]
    fn surgery_requires_a_joint_surgeon_nurse_team() {
        ActKind::SurgicalIntervention
            .check_team(&[Surgeon, Nurse])
            .expect("surgeon plus nurse is the rule");
        ActKind::SurgicalIntervention
            .check_team(&[Surgeon, Surgeon, Nurse, Nurse])
            .expect("larger mixed teams are fine");

        assert!(matches!(
            ActKind::SurgicalIntervention.check_team(&[Surgeon, Nurse, Physician]),
            Err(HospitalError::SurgeryTeamComposition)
        ));
        assert!(matches!(
            ActKind::SurgicalIntervention.check_team(&[Surgeon]),
            Err(HospitalError::SurgeryTeamIncomplete)
        ));
        assert!(matches!(
            ActKind::SurgicalIntervention.check_team(&[Nurse, Nurse]),
            Err(HospitalError::SurgeryTeamIncomplete)
        ));
    }

    #[test]
    fn empty_team_is_rejected_for_every_kind() {
        for kind in [
            ActKind::Consultation,
            ActKind::Treatment,
            ActKind::SurgicalIntervention,
        ] {
            assert!(matches!(
                kind.check_team(&[]),
                Err(HospitalError::EmptyTeam)
            ));
        }
    }

    #[test]
    fn fulfilment_is_irreversible() {
        let mut act = MedicalAct::new(
            ActKind::Consultation,
            Utc::now(),
            "PAT-1",
            "Westbrook Clinic",
            vec!["dr@mednet.example".to_owned()],
            &[Physician],
            "REC-756012",
        )
        .expect("eligible act");

        assert!(!act.is_fulfilled());
        act.mark_fulfilled().expect("first fulfilment");
        assert!(act.is_fulfilled());
        assert!(matches!(
            act.mark_fulfilled(),
            Err(HospitalError::ActAlreadyFulfilled)
        ));
    }
}
