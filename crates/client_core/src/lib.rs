use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    error::ApiError,
    protocol::{
        grades_route, wishes_route, CreateGradeSubmissionRequest, CreateWishRequest,
        GradeSubmission, Wish,
    },
};
use tracing::debug;
use url::Url;

pub mod catalogue;
pub mod error;
pub mod flow;
pub mod session;

pub use catalogue::{Course, QuizChoice, SEMESTER_COURSES};
pub use error::{FlowError, SubmissionError};
pub use flow::{Effect, FlowController, FlowEvent, GradeRow, Screen, TimerId, REVEAL_DELAY};
pub use session::{BackgroundAudio, FlowSession, SilentAudio};

/// The four submission-service operations as seen from a client.
#[async_trait]
pub trait SubmissionClient: Send + Sync {
    async fn create_wish(&self, request: &CreateWishRequest) -> Result<Wish, SubmissionError>;
    async fn create_grade_submission(
        &self,
        request: &CreateGradeSubmissionRequest,
    ) -> Result<GradeSubmission, SubmissionError>;
    async fn list_wishes(&self) -> Result<Vec<Wish>, SubmissionError>;
    async fn list_grade_submissions(&self) -> Result<Vec<GradeSubmission>, SubmissionError>;
}

pub struct HttpSubmissionClient {
    http: Client,
    server_url: Url,
}

impl HttpSubmissionClient {
    pub fn new(server_url: &str) -> Result<Self, SubmissionError> {
        Ok(Self {
            http: Client::new(),
            server_url: Url::parse(server_url)?,
        })
    }

    pub fn server_url(&self) -> &Url {
        &self.server_url
    }

    fn endpoint(&self, route: &str) -> Result<Url, SubmissionError> {
        Ok(self.server_url.join(route)?)
    }
}

#[async_trait]
impl SubmissionClient for HttpSubmissionClient {
    async fn create_wish(&self, request: &CreateWishRequest) -> Result<Wish, SubmissionError> {
        let res = self
            .http
            .post(self.endpoint(wishes_route())?)
            .json(request)
            .send()
            .await?;
        decode(res).await
    }

    async fn create_grade_submission(
        &self,
        request: &CreateGradeSubmissionRequest,
    ) -> Result<GradeSubmission, SubmissionError> {
        let res = self
            .http
            .post(self.endpoint(grades_route())?)
            .json(request)
            .send()
            .await?;
        decode(res).await
    }

    async fn list_wishes(&self) -> Result<Vec<Wish>, SubmissionError> {
        let res = self.http.get(self.endpoint(wishes_route())?).send().await?;
        decode(res).await
    }

    async fn list_grade_submissions(&self) -> Result<Vec<GradeSubmission>, SubmissionError> {
        let res = self.http.get(self.endpoint(grades_route())?).send().await?;
        decode(res).await
    }
}

async fn decode<T: DeserializeOwned>(res: Response) -> Result<T, SubmissionError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res.json().await?);
    }

    debug!(%status, url = %res.url(), "submission service returned an error status");
    match res.json::<ApiError>().await {
        Ok(body) => Err(SubmissionError::Rejected {
            status: status.as_u16(),
            source: body.into(),
        }),
        Err(_) => Err(SubmissionError::UnexpectedStatus(status.as_u16())),
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
