//! Identity documents: what is on file, and uploading more.

use std::fmt::Write as _;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use super::render::{heading, Notice, Style, Table, View};
use super::{outcome, AppContext, Page};
use crate::auth::guard::Route;
use crate::error::Result;
use crate::models::{Document, DocumentInput, DocumentType};
use crate::rules::documents::{missing_uploads, suggested_upload};

const UPLOADED: &str = "Document uploaded successfully!";
const ALL_UPLOADED: &str = "All required documents uploaded! You can now complete your booking.";
const UPLOAD_FAILED: &str = "Failed to upload document. Please try again.";
const NO_FILE: &str = "Please select a file to upload.";

#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentUploadPage;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentsView {
    pub documents: Vec<Document>,
    /// Required types with nothing uploaded yet.
    pub missing: Vec<DocumentType>,
    /// The type the upload form preselects.
    pub suggested: DocumentType,
}

#[async_trait]
impl Page for DocumentUploadPage {
    type View = DocumentsView;

    fn route(&self) -> Route {
        Route::DocumentUpload
    }

    async fn load(&self, ctx: &AppContext) -> Result<DocumentsView> {
        let documents = ctx.client().users().documents().await?;
        let missing = missing_uploads(&documents);
        Ok(DocumentsView {
            suggested: suggested_upload(&missing),
            documents,
            missing,
        })
    }
}

impl View for DocumentsView {
    fn plain(&self, style: &Style) -> String {
        let mut out = heading("My Documents");
        if self.documents.is_empty() {
            out.push_str("You haven't uploaded any documents yet.\n");
        }
        for doc in &self.documents {
            let _ = write!(out, "  {:<17}", doc.document_type.label());
            if let Some(number) = &doc.document_number {
                let _ = write!(out, " {number}");
            }
            if let Some(uploaded) = doc.upload_date {
                let _ = write!(out, "  uploaded {}", style.datetime(uploaded));
            }
            let _ = writeln!(
                out,
                "  {}",
                if doc.is_verified { "Verified" } else { "Pending verification" }
            );
        }

        if self.missing.is_empty() {
            out.push_str("\nAll required documents are uploaded.\n");
        } else {
            let labels: Vec<&str> = self.missing.iter().map(DocumentType::label).collect();
            let _ = writeln!(
                out,
                "\nTo complete a booking, please upload: {}\n  rentctl documents upload --type {} <FILE>",
                labels.join(", "),
                self.suggested
            );
        }
        out
    }

    fn table(&self, style: &Style) -> String {
        let mut table = Table::new(&["ID", "Type", "Number", "Uploaded", "Status"]);
        for doc in &self.documents {
            table.row(vec![
                doc.id.to_string(),
                doc.document_type.label().to_string(),
                doc.document_number.clone().unwrap_or_default(),
                doc.upload_date.map(|d| style.datetime(d)).unwrap_or_default(),
                if doc.is_verified { "Verified" } else { "Pending" }.to_string(),
            ]);
        }
        table.render()
    }
}

/// A document to upload from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub document_type: DocumentType,
    pub document_number: String,
    pub file: PathBuf,
}

/// Upload the file, then record the document against the user.
///
/// # Errors
///
/// Returns an error when not logged in; other failures are reported in the
/// notice.
pub async fn upload(ctx: &AppContext, request: &UploadRequest) -> Result<Notice> {
    ctx.enter(&Route::DocumentUpload)?;
    if !request.file.is_file() {
        warn!("No file at {}", request.file.display());
        return Ok(Notice::failure(NO_FILE));
    }

    let users = ctx.client().users();
    let result = async {
        let file_url = ctx
            .client()
            .files()
            .upload_path(&request.file, Some(ctx.config().booking.upload_folder.as_str()))
            .await?;
        info!("Stored {} at {}", request.document_type, file_url);
        users
            .add_document(&DocumentInput {
                document_type: request.document_type,
                document_number: request.document_number.clone(),
                file_url,
            })
            .await
    }
    .await;

    let notice = outcome(result, UPLOADED, UPLOAD_FAILED)?;
    if !notice.success {
        return Ok(notice);
    }

    match users.documents().await {
        Ok(documents) if missing_uploads(&documents).is_empty() => {
            Ok(Notice::success(format!("{UPLOADED} {ALL_UPLOADED}")))
        }
        _ => Ok(notice),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::models::Role;
    use crate::views::testing;

    #[tokio::test]
    async fn test_page_suggests_first_missing_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users/documents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 1, "documentType": "DriversLicense", "isVerified": false }
            ])))
            .mount(&server)
            .await;

        let ctx = testing::served(&server, Some(Role::Customer));
        let view = DocumentUploadPage.load(&ctx).await.unwrap();
        assert_eq!(view.missing, vec![DocumentType::Id]);
        assert_eq!(view.suggested, DocumentType::Id);
        assert!(ctx.render(&view).unwrap().contains("--type ID"));
    }

    #[tokio::test]
    async fn test_upload_missing_file() {
        let ctx = testing::signed_in(Role::Customer);
        let request = UploadRequest {
            document_type: DocumentType::Id,
            document_number: "X1".to_string(),
            file: PathBuf::from("/definitely/not/here.pdf"),
        };
        assert_eq!(upload(&ctx, &request).await.unwrap(), Notice::failure(NO_FILE));
    }

    #[tokio::test]
    async fn test_upload_then_record_document() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/files/upload"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "fileUrl": "https://files.example.com/id.pdf" })),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/users/documents"))
            .and(body_json(json!({
                "documentType": "ID",
                "documentNumber": "X1",
                "fileUrl": "https://files.example.com/id.pdf"
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/users/documents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 1, "documentType": "DriversLicense", "isVerified": true },
                { "id": 2, "documentType": "ID", "isVerified": false }
            ])))
            .mount(&server)
            .await;

        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"%PDF-1.4").unwrap();

        let ctx = testing::served(&server, Some(Role::Customer));
        let request = UploadRequest {
            document_type: DocumentType::Id,
            document_number: "X1".to_string(),
            file: file.path().to_path_buf(),
        };
        let notice = upload(&ctx, &request).await.unwrap();
        assert!(notice.success);
        assert!(notice.message.contains(ALL_UPLOADED));
    }

    #[tokio::test]
    async fn test_upload_failure_uses_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/files/upload"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let file = tempfile::NamedTempFile::new().unwrap();
        let ctx = testing::served(&server, Some(Role::Customer));
        let request = UploadRequest {
            document_type: DocumentType::DriversLicense,
            document_number: String::new(),
            file: file.path().to_path_buf(),
        };
        assert_eq!(
            upload(&ctx, &request).await.unwrap(),
            Notice::failure(UPLOAD_FAILED)
        );
    }
}
