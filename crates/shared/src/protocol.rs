use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{GradeSubmissionId, LetterGrade, WishId};

pub fn wishes_route() -> &'static str {
    "/api/wishes"
}

pub fn grades_route() -> &'static str {
    "/api/grades"
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateWishRequest {
    pub wish: String,
}

/// One row of a grade submission. `grade` stays a plain string on the wire;
/// only the client restricts it to [`LetterGrade`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectGrade {
    pub name: String,
    pub sks: i64,
    pub grade: String,
}

impl SubjectGrade {
    pub fn new(name: impl Into<String>, sks: i64, grade: LetterGrade) -> Self {
        Self {
            name: name.into(),
            sks,
            grade: grade.as_str().to_string(),
        }
    }

    pub fn letter(&self) -> Option<LetterGrade> {
        self.grade.parse().ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGradeSubmissionRequest {
    pub subjects: Vec<SubjectGrade>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wish {
    pub id: WishId,
    pub wish: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeSubmission {
    pub id: GradeSubmissionId,
    pub subjects: Vec<SubjectGrade>,
    pub created_at: DateTime<Utc>,
}
