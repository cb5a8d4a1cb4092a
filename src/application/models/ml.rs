/******************************************************************************
   Project: edupredict-client
   Date: 16/10/26
******************************************************************************/

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictFromFeatures {
    pub attendance_pct: u8,
    pub assignments_pct: u8,
    pub quizzes_pct: u8,
    pub exams_pct: u8,
    pub gpa: f64,
}

/// What to score. Exactly one source is sent.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionSubject {
    Record(Uuid),
    Student(Uuid),
    Features(PredictFromFeatures),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
struct SubjectFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    academic_record_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    student_user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    features: Option<PredictFromFeatures>,
}

impl From<&PredictionSubject> for SubjectFields {
    fn from(subject: &PredictionSubject) -> Self {
        match subject {
            PredictionSubject::Record(id) => SubjectFields {
                academic_record_id: Some(*id),
                ..Default::default()
            },
            PredictionSubject::Student(id) => SubjectFields {
                student_user_id: Some(*id),
                ..Default::default()
            },
            PredictionSubject::Features(features) => SubjectFields {
                features: Some(features.clone()),
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRequest {
    #[serde(flatten)]
    subject: SubjectFields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
}

impl PredictionRequest {
    pub fn new(subject: &PredictionSubject) -> Self {
        Self {
            subject: subject.into(),
            threshold: None,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold.clamp(0.0, 1.0));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictionResponse {
    /// `"At-Risk"` or `"Not-At-Risk"`.
    pub classification: String,
    pub risk_probability: f64,
    pub confidence: f64,
    pub threshold: f64,
    pub model_version: String,
}

impl PredictionResponse {
    pub fn is_at_risk(&self) -> bool {
        self.classification.eq_ignore_ascii_case("At-Risk")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplainRequest {
    #[serde(flatten)]
    subject: SubjectFields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u8>,
}

impl ExplainRequest {
    pub fn new(subject: &PredictionSubject) -> Self {
        Self {
            subject: subject.into(),
            top_k: None,
        }
    }

    /// The backend accepts 1 to 10 factors.
    pub fn with_top_k(mut self, top_k: u8) -> Self {
        self.top_k = Some(top_k.clamp(1, 10));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Factor {
    pub feature_key: String,
    pub feature_label: String,
    pub value: f64,
    pub impact: f64,
    pub direction: String,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExplainResponse {
    pub model_version: String,
    pub factors: Vec<Factor>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelInfo {
    pub model_version: String,
    pub created_at: String,
    pub metrics: HashMap<String, f64>,
    pub feature_names: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TrainRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_rows: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrainResponse {
    pub trained: bool,
    pub model: ModelInfo,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelListResponse {
    #[serde(default)]
    pub latest_version: Option<String>,
    pub items: Vec<ModelInfo>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PromoteResponse {
    pub latest_version: String,
    pub model: ModelInfo,
}
