use std::sync::Arc;

use chrono::Utc;
use shared::{
    domain::{GradeSubmissionId, WishId},
    protocol::{GradeSubmission, SubjectGrade, Wish},
};
use tokio::sync::RwLock;

/// Process-local record store. Cloning shares the same tables, so one
/// instance is built at startup and handed to every request handler.
/// Nothing survives a restart.
#[derive(Clone, Default)]
pub struct Storage {
    tables: Arc<RwLock<Tables>>,
}

#[derive(Default)]
struct Tables {
    wishes: Vec<Wish>,
    grade_submissions: Vec<GradeSubmission>,
}

impl Storage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_wish(&self, wish: String) -> Wish {
        let record = Wish {
            id: WishId::generate(),
            wish,
            created_at: Utc::now(),
        };
        self.tables.write().await.wishes.push(record.clone());
        record
    }

    pub async fn insert_grade_submission(&self, subjects: Vec<SubjectGrade>) -> GradeSubmission {
        let record = GradeSubmission {
            id: GradeSubmissionId::generate(),
            subjects,
            created_at: Utc::now(),
        };
        self.tables
            .write()
            .await
            .grade_submissions
            .push(record.clone());
        record
    }

    /// Snapshot of every stored wish in insertion order.
    pub async fn list_wishes(&self) -> Vec<Wish> {
        self.tables.read().await.wishes.clone()
    }

    pub async fn list_grade_submissions(&self) -> Vec<GradeSubmission> {
        self.tables.read().await.grade_submissions.clone()
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
