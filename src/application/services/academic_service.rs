use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    application::models::academic::{
        AcademicRecord, AcademicRecordCreate, AcademicRecordList, AcademicRecordUpdate,
        ImportResponse, RecordFilter,
    },
    application::services::page_limit,
    error::AppError,
    transport::http_client::ApiGateway,
    transport::request::{ApiRequest, MultipartPart},
};

const CSV_MIME: &str = "text/csv";

/// Academic records: listing, editing and CSV bulk import.
#[async_trait]
pub trait AcademicService: Send + Sync {
    /// Records of the signed-in student.
    async fn list_mine(&self, limit: u32, offset: u32) -> Result<AcademicRecordList, AppError>;

    /// Records visible to the caller. Students only ever get their own.
    async fn list(&self, filter: &RecordFilter) -> Result<AcademicRecordList, AppError>;

    async fn create(&self, record: &AcademicRecordCreate) -> Result<AcademicRecord, AppError>;

    async fn update(
        &self,
        id: Uuid,
        patch: &AcademicRecordUpdate,
    ) -> Result<AcademicRecord, AppError>;

    async fn delete(&self, id: Uuid) -> Result<(), AppError>;

    /// Uploads a CSV file. With `dry_run` the rows are only validated.
    async fn import_csv(
        &self,
        file_name: &str,
        contents: Vec<u8>,
        dry_run: bool,
    ) -> Result<ImportResponse, AppError>;
}

pub struct AcademicServiceImpl<T: ApiGateway> {
    client: Arc<T>,
}

impl<T: ApiGateway> AcademicServiceImpl<T> {
    pub fn new(client: Arc<T>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<T: ApiGateway + 'static> AcademicService for AcademicServiceImpl<T> {
    async fn list_mine(&self, limit: u32, offset: u32) -> Result<AcademicRecordList, AppError> {
        let request = ApiRequest::get()
            .query("limit", page_limit(limit))
            .query("offset", offset);

        let result: AcademicRecordList = self.client.send("/academics/me", request).await?;
        debug!("Loaded {} of {} own records", result.items.len(), result.total);
        Ok(result)
    }

    async fn list(&self, filter: &RecordFilter) -> Result<AcademicRecordList, AppError> {
        let request = ApiRequest::get()
            .query_opt("student_user_id", filter.student_user_id)
            .query_opt("term", filter.term.as_deref())
            .query_opt("limit", filter.limit.map(page_limit))
            .query_opt("offset", filter.offset);

        let result: AcademicRecordList = self.client.send("/academics", request).await?;
        debug!("Loaded {} of {} records", result.items.len(), result.total);
        Ok(result)
    }

    async fn create(&self, record: &AcademicRecordCreate) -> Result<AcademicRecord, AppError> {
        info!("Creating record for student {}", record.student_user_id);
        let request = ApiRequest::post().json(record)?;
        self.client.send("/academics", request).await
    }

    async fn update(
        &self,
        id: Uuid,
        patch: &AcademicRecordUpdate,
    ) -> Result<AcademicRecord, AppError> {
        info!("Updating record {}", id);
        let request = ApiRequest::patch().json(patch)?;
        self.client.send(&format!("/academics/{id}"), request).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        info!("Deleting record {}", id);
        self.client
            .send(&format!("/academics/{id}"), ApiRequest::delete())
            .await
    }

    async fn import_csv(
        &self,
        file_name: &str,
        contents: Vec<u8>,
        dry_run: bool,
    ) -> Result<ImportResponse, AppError> {
        info!(
            "Importing {} ({} bytes, dry_run={})",
            file_name,
            contents.len(),
            dry_run
        );
        let request = ApiRequest::post().multipart(vec![
            MultipartPart::file("file", file_name, Some(CSV_MIME), contents),
            MultipartPart::text("dry_run", dry_run.to_string()),
        ]);

        let result: ImportResponse = self.client.send("/academics/import", request).await?;
        debug!(
            "Import processed {} rows, created {}, {} errors",
            result.total_rows,
            result.created,
            result.errors.len()
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests_academic_service {
    use super::*;
    use crate::application::services::test_support::signed_in_client;
    use crate::utils::logger::setup_logger;
    use mockito::{Matcher, Server};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const RECORD_ID: &str = "0b7b1c52-8f0e-4a43-a7a4-4f8f2c6f0e11";
    const STUDENT_ID: &str = "6f1c1c4e-2f55-4f1e-9a63-0b5a5b1d2c3e";

    fn record_body() -> serde_json::Value {
        json!({
            "id": RECORD_ID,
            "student_user_id": STUDENT_ID,
            "created_at": "2026-01-01T10:00:00Z",
            "updated_at": "2026-01-02T10:00:00+00:00",
            "attendance_pct": 90,
            "assignments_pct": 85,
            "quizzes_pct": 70,
            "exams_pct": 65,
            "gpa": 3.1,
            "term": "2026-S1"
        })
    }

    #[tokio::test]
    async fn test_list_mine_clamps_limit() {
        setup_logger();
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/academics/me")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("limit".into(), "200".into()),
                Matcher::UrlEncoded("offset".into(), "0".into()),
            ]))
            .with_status(200)
            .with_body(json!({"items": [record_body()], "total": 1}).to_string())
            .create_async()
            .await;

        let service = AcademicServiceImpl::new(signed_in_client(&server.url()));
        let result = service.list_mine(1000, 0).await.unwrap();

        assert_eq!(result.total, 1);
        assert_eq!(result.items[0].term.as_deref(), Some("2026-S1"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_with_filter() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/academics")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("student_user_id".into(), STUDENT_ID.into()),
                Matcher::UrlEncoded("limit".into(), "50".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"items": [], "total": 0}"#)
            .create_async()
            .await;

        let service = AcademicServiceImpl::new(signed_in_client(&server.url()));
        let filter = RecordFilter {
            student_user_id: Some(STUDENT_ID.parse().unwrap()),
            limit: Some(50),
            ..Default::default()
        };
        let result = service.list(&filter).await.unwrap();

        assert_eq!(result.total, 0);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_and_update() {
        let mut server = Server::new_async().await;
        let create = server
            .mock("POST", "/academics")
            .match_body(Matcher::PartialJson(json!({
                "student_user_id": STUDENT_ID,
                "gpa": 3.1
            })))
            .with_status(201)
            .with_body(record_body().to_string())
            .create_async()
            .await;
        let update = server
            .mock("PATCH", format!("/academics/{RECORD_ID}").as_str())
            .match_body(Matcher::Json(json!({"exams_pct": 65})))
            .with_status(200)
            .with_body(record_body().to_string())
            .create_async()
            .await;

        let service = AcademicServiceImpl::new(signed_in_client(&server.url()));
        let created = service
            .create(&AcademicRecordCreate {
                student_user_id: STUDENT_ID.parse().unwrap(),
                attendance_pct: 90,
                assignments_pct: 85,
                quizzes_pct: 70,
                exams_pct: 65,
                gpa: 3.1,
                term: None,
            })
            .await
            .unwrap();
        let updated = service
            .update(
                created.id,
                &AcademicRecordUpdate {
                    exams_pct: Some(65),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.exams_pct, 65);
        create.assert_async().await;
        update.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_no_content() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", format!("/academics/{RECORD_ID}").as_str())
            .with_status(204)
            .create_async()
            .await;

        let service = AcademicServiceImpl::new(signed_in_client(&server.url()));
        service.delete(RECORD_ID.parse().unwrap()).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_forbidden() {
        let mut server = Server::new_async().await;
        server
            .mock("DELETE", format!("/academics/{RECORD_ID}").as_str())
            .with_status(403)
            .with_body(r#"{"detail": "Forbidden"}"#)
            .create_async()
            .await;

        let service = AcademicServiceImpl::new(signed_in_client(&server.url()));
        let err = service.delete(RECORD_ID.parse().unwrap()).await.unwrap_err();

        assert_eq!(err.status(), Some(403));
        assert_eq!(err.to_string(), "Forbidden");
    }

    #[tokio::test]
    async fn test_import_csv_dry_run() {
        setup_logger();
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/academics/import")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"filename="spring.csv""#.to_string()),
                Matcher::Regex("(?i)content-type: text/csv".to_string()),
                Matcher::Regex(r#"name="dry_run"\s+true"#.to_string()),
            ]))
            .with_status(200)
            .with_body(
                json!({
                    "dry_run": true,
                    "total_rows": 2,
                    "created": 0,
                    "errors": [{"row": 3, "message": "gpa must be <= 4.0"}]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let service = AcademicServiceImpl::new(signed_in_client(&server.url()));
        let csv = b"student_email,attendance_pct,assignments_pct,quizzes_pct,exams_pct,gpa\n".to_vec();
        let result = service.import_csv("spring.csv", csv, true).await.unwrap();

        assert!(result.dry_run);
        assert_eq!(result.errors.len(), 1);
        assert!(!result.is_clean());
        mock.assert_async().await;
    }
}
