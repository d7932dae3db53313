use shared::{
    domain::LetterGrade,
    error::ApiError,
    protocol::{CreateGradeSubmissionRequest, CreateWishRequest, GradeSubmission, Wish},
};
use storage::Storage;
use tracing::{info, warn};

pub const INVALID_WISH_MESSAGE: &str = "Invalid wish data";
pub const INVALID_GRADE_MESSAGE: &str = "Invalid grade data";

#[derive(Clone, Default)]
pub struct ApiContext {
    pub storage: Storage,
}

impl ApiContext {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }
}

pub async fn create_wish(ctx: &ApiContext, request: CreateWishRequest) -> Result<Wish, ApiError> {
    if request.wish.is_empty() {
        return Err(ApiError::validation(INVALID_WISH_MESSAGE));
    }

    let wish = ctx.storage.insert_wish(request.wish).await;
    info!(wish_id = %wish.id, "wish stored");
    Ok(wish)
}

/// Stores a grade table as submitted. Only the JSON shape is enforced by the
/// request type; letters outside the A..E scale are accepted and logged.
pub async fn create_grade_submission(
    ctx: &ApiContext,
    request: CreateGradeSubmissionRequest,
) -> Result<GradeSubmission, ApiError> {
    let off_scale = request
        .subjects
        .iter()
        .filter(|subject| subject.letter().is_none())
        .count();
    if off_scale > 0 {
        warn!(
            off_scale,
            expected = ?LetterGrade::ALL.map(LetterGrade::as_str),
            "grade submission contains letters outside the grade scale"
        );
    }

    let submission = ctx.storage.insert_grade_submission(request.subjects).await;
    info!(
        submission_id = %submission.id,
        subjects = submission.subjects.len(),
        "grade submission stored"
    );
    Ok(submission)
}

pub async fn list_wishes(ctx: &ApiContext) -> Vec<Wish> {
    ctx.storage.list_wishes().await
}

pub async fn list_grade_submissions(ctx: &ApiContext) -> Vec<GradeSubmission> {
    ctx.storage.list_grade_submissions().await
}
