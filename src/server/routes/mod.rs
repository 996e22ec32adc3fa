mod categories;
mod questions;
mod quizzes;
mod uploads;


pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quizzes_router;
pub use uploads::uploads_router;

use axum::body::Bytes;
use axum_typed_multipart::FieldData;

use crate::storage::UploadedFile;

/// Browsers send an empty file part when no file was chosen. A part with
/// contents but no file name is still an upload.
fn uploaded_file(field: Option<FieldData<Bytes>>) -> Option<UploadedFile> {
    let field = field?;
    if field.contents.is_empty() {
        return None;
    }
    Some(UploadedFile {
        file_name: field.metadata.file_name.unwrap_or_default(),
        content_type: field.metadata.content_type,
        contents: field.contents,
    })
}
