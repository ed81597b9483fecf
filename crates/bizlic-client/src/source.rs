//! Service seams used by the report and question pipelines.

use std::sync::Arc;

use async_trait::async_trait;
use bizlic_core::{IntakePayload, Report};

use crate::answer::Answer;
use crate::error::ServiceError;
use crate::ServiceClient;

/// Something that can generate a report from an intake payload.
#[async_trait]
pub trait ReportSource: Send + Sync {
    async fn generate(&self, payload: &IntakePayload) -> Result<Report, ServiceError>;
}

/// Something that can answer a free-text question.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn ask(&self, question: &str) -> Result<Answer, ServiceError>;
}

#[async_trait]
impl ReportSource for ServiceClient {
    async fn generate(&self, payload: &IntakePayload) -> Result<Report, ServiceError> {
        self.generate_report(payload).await
    }
}

#[async_trait]
impl QuestionSource for ServiceClient {
    async fn ask(&self, question: &str) -> Result<Answer, ServiceError> {
        ServiceClient::ask(self, question).await
    }
}

#[async_trait]
impl<T: ReportSource + ?Sized> ReportSource for Arc<T> {
    async fn generate(&self, payload: &IntakePayload) -> Result<Report, ServiceError> {
        (**self).generate(payload).await
    }
}

#[async_trait]
impl<T: QuestionSource + ?Sized> QuestionSource for Arc<T> {
    async fn ask(&self, question: &str) -> Result<Answer, ServiceError> {
        (**self).ask(question).await
    }
}
