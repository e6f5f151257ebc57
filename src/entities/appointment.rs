//! Appointments booked by patients

use crate::config::ValidationSettings;
use crate::core::auth::{Principal, Role};
use crate::core::service::Record;
use crate::core::validation::{RuleSet, ValidatedBody, rule_sets};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub patient: Uuid,
    /// Doctor reference as submitted; its format is only enforced when the
    /// `enforce_doctor_id_format` setting is on
    pub doctor: String,
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    pub fn new(
        patient: Uuid,
        doctor: String,
        appointment_date: NaiveDate,
        appointment_time: String,
        reason: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            patient,
            doctor,
            appointment_date,
            appointment_time,
            reason,
            status: AppointmentStatus::Scheduled,
            created_at: Utc::now(),
        }
    }

    /// Patients see their own bookings, doctors the ones addressed to them,
    /// admins everything
    pub fn visible_to(&self, principal: &Principal) -> bool {
        match principal.role {
            Role::Admin => true,
            Role::Patient => self.patient == principal.id,
            Role::Doctor => self.doctor == principal.id.to_string(),
        }
    }
}

impl Record for Appointment {
    const TYPE_NAME: &'static str = "appointment";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Body of `POST /appointments`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub doctor: String,
    pub appointment_date: String,
    pub appointment_time: String,
    #[serde(default)]
    pub reason: Option<String>,
}

impl ValidatedBody for CreateAppointmentRequest {
    fn rule_set(settings: &ValidationSettings) -> RuleSet {
        rule_sets::appointment(settings)
    }
}
