//! Symptom analyses submitted by patients

use crate::config::ValidationSettings;
use crate::core::auth::{Principal, Role};
use crate::core::service::{AnalysisOutcome, Record};
use crate::core::validation::{RuleSet, ValidatedBody, rule_sets};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Pending,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomAnalysis {
    pub id: Uuid,
    pub patient: Uuid,
    pub symptoms: String,
    pub status: AnalysisStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    pub created_at: DateTime<Utc>,
}

impl SymptomAnalysis {
    pub fn new(patient: Uuid, symptoms: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            patient,
            symptoms,
            status: AnalysisStatus::Pending,
            result: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_outcome(mut self, outcome: AnalysisOutcome) -> Self {
        if outcome.completed {
            self.status = AnalysisStatus::Completed;
        }
        self.result = outcome.result;
        self
    }

    /// Mark the analysis as failed, dropping any partial result
    pub fn failed(mut self) -> Self {
        self.status = AnalysisStatus::Failed;
        self.result = None;
        self
    }

    /// Staff see every analysis, patients their own
    pub fn visible_to(&self, principal: &Principal) -> bool {
        principal.role != Role::Patient || self.patient == principal.id
    }
}

impl Record for SymptomAnalysis {
    const TYPE_NAME: &'static str = "analysis";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Body of `POST /analyses`
#[derive(Debug, Clone, Deserialize)]
pub struct SymptomRequest {
    pub symptoms: String,
}

impl ValidatedBody for SymptomRequest {
    fn rule_set(_: &ValidationSettings) -> RuleSet {
        rule_sets::symptoms()
    }
}
