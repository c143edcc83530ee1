//! Identity documents a customer needs before booking.

use crate::models::{Document, DocumentType};

/// Document types that must be on file and verified before a booking.
pub const REQUIRED_DOCUMENTS: [DocumentType; 2] = [DocumentType::DriversLicense, DocumentType::Id];

/// Required document types without a verified document, in
/// [`REQUIRED_DOCUMENTS`] order.
#[must_use]
pub fn missing_documents(documents: &[Document]) -> Vec<DocumentType> {
    REQUIRED_DOCUMENTS
        .iter()
        .copied()
        .filter(|required| {
            !documents
                .iter()
                .any(|d| d.document_type == *required && d.is_verified)
        })
        .collect()
}

/// Required document types with no document at all, verified or not.
///
/// After an upload the new document awaits verification, so the upload page
/// uses this to decide whether the customer has done their part.
#[must_use]
pub fn missing_uploads(documents: &[Document]) -> Vec<DocumentType> {
    REQUIRED_DOCUMENTS
        .iter()
        .copied()
        .filter(|required| !documents.iter().any(|d| d.document_type == *required))
        .collect()
}

/// The type the upload page preselects: the first missing one, else a
/// driver's license.
#[must_use]
pub fn suggested_upload(missing: &[DocumentType]) -> DocumentType {
    missing.first().copied().unwrap_or(DocumentType::DriversLicense)
}
