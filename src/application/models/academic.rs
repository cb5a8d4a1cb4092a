/******************************************************************************
   Project: edupredict-client
   Date: 16/10/26
******************************************************************************/

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Percentages are whole numbers in `0..=100`, GPA is on a 4.0 scale.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AcademicRecord {
    pub id: Uuid,
    pub student_user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub attendance_pct: u8,
    pub assignments_pct: u8,
    pub quizzes_pct: u8,
    pub exams_pct: u8,
    pub gpa: f64,
    #[serde(default)]
    pub term: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AcademicRecordList {
    pub items: Vec<AcademicRecord>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcademicRecordCreate {
    pub student_user_id: Uuid,
    pub attendance_pct: u8,
    pub assignments_pct: u8,
    pub quizzes_pct: u8,
    pub exams_pct: u8,
    pub gpa: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
}

/// Partial update; only the fields that are set are sent.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AcademicRecordUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendance_pct: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignments_pct: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quizzes_pct: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exams_pct: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpa: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordFilter {
    pub student_user_id: Option<Uuid>,
    pub term: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImportRowError {
    /// 1-based, the header being row 1.
    pub row: u32,
    pub message: String,
    #[serde(default)]
    pub raw: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImportResponse {
    pub dry_run: bool,
    pub total_rows: u32,
    pub created: u32,
    #[serde(default)]
    pub errors: Vec<ImportRowError>,
}

impl ImportResponse {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}
