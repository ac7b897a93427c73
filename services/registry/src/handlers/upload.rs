//! Student create/update body extractor.
//!
//! Accepts `multipart/form-data` (text fields plus up to one file per slot) or
//! a plain JSON object. Files are checked for slot, content type and size and
//! held in memory; the student use cases decide when to write them to disk.

use std::path::Path;

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::{StatusCode, header};
use bytes::BytesMut;
use serde_json::{Map, Value};

use crate::domain::form::{StudentForm, scalar_text};
use crate::domain::types::{DocumentSlot, FileUpload};
use crate::error::{MAX_UPLOAD_BYTES, RegistryError};
use crate::usecase::student::StudentSubmission;

/// Student fields plus accepted (not yet stored) files.
#[derive(Debug, Default)]
pub struct StudentUpload(pub StudentSubmission);

impl<S> FromRequest<S> for StudentUpload
where
    S: Send + Sync,
{
    type Rejection = RegistryError;

    fn from_request(
        req: Request,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let multipart = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim_start().starts_with("multipart/form-data"));

        async move {
            if multipart {
                let multipart = Multipart::from_request(req, &())
                    .await
                    .map_err(|rejection| RegistryError::InvalidBody(rejection.body_text()))?;
                read_multipart(multipart).await.map(Self)
            } else {
                let Json(object) = Json::<Map<String, Value>>::from_request(req, &())
                    .await
                    .map_err(|rejection| RegistryError::InvalidBody(rejection.body_text()))?;
                let mut form = StudentForm::default();
                for (key, value) in object {
                    form.set_lenient(&key, scalar_text(value));
                }
                Ok(Self(StudentSubmission {
                    form,
                    uploads: Vec::new(),
                }))
            }
        }
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<StudentSubmission, RegistryError> {
    let mut submission = StudentSubmission::default();

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_owned();
        let file_name = field.file_name().map(str::to_owned);
        let slot = DocumentSlot::from_field_name(&name);

        let Some(slot) = slot else {
            if file_name.is_some() {
                return Err(RegistryError::InvalidUpload(format!(
                    "unexpected file field '{name}'"
                )));
            }
            let text = field.text().await.map_err(multipart_error)?;
            submission.form.set_lenient(&name, text);
            continue;
        };

        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_owned();
        let mut bytes = BytesMut::new();
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            if bytes.len() + chunk.len() > MAX_UPLOAD_BYTES {
                return Err(RegistryError::FileTooLarge);
            }
            bytes.extend_from_slice(&chunk);
        }

        // Browsers send an empty part with an empty filename for an untouched file input.
        if bytes.is_empty() && file_name.as_deref().is_none_or(str::is_empty) {
            continue;
        }
        if submission.uploads.iter().any(|u| u.slot == slot) {
            return Err(RegistryError::InvalidUpload(format!(
                "only one {name} file is allowed"
            )));
        }
        if !slot.accepts(&content_type) {
            return Err(RegistryError::InvalidUpload(
                slot.rejection_message().to_owned(),
            ));
        }

        submission.uploads.push(FileUpload {
            slot,
            extension: extension_of(file_name.as_deref().unwrap_or_default()),
            bytes: bytes.freeze(),
        });
    }

    Ok(submission)
}

fn multipart_error(err: MultipartError) -> RegistryError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        RegistryError::FileTooLarge
    } else {
        RegistryError::InvalidUpload(err.body_text())
    }
}

/// Lower-cased `.ext` of the client filename, or empty when it has none we can keep.
fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.len() <= 10 && ext.bytes().all(|b| b.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    const BOUNDARY: &str = "registry-test-boundary";

    enum Part<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a str, &'a str, Vec<u8>),
    }

    fn multipart_request(parts: Vec<Part<'_>>) -> Request {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                            .as_bytes(),
                    );
                }
                Part::File(name, file_name, content_type, bytes) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(&bytes);
                    body.extend_from_slice(b"\r\n");
                }
            }
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        Request::builder()
            .method("POST")
            .uri("/api/students")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn extract(req: Request) -> Result<StudentSubmission, RegistryError> {
        StudentUpload::from_request(req, &()).await.map(|u| u.0)
    }

    #[tokio::test]
    async fn should_collect_text_fields_and_files() {
        let req = multipart_request(vec![
            Part::Text("name", "Ali Khan"),
            Part::Text("Country", "Pakistan"),
            Part::File("photo", "Me.JPG", "image/jpeg", vec![1, 2, 3]),
            Part::File("bForm", "form.pdf", "application/pdf", vec![4]),
        ]);
        let submission = extract(req).await.unwrap();
        assert_eq!(submission.form.name.as_deref(), Some("Ali Khan"));
        assert_eq!(submission.form.country.as_deref(), Some("Pakistan"));
        assert_eq!(submission.uploads.len(), 2);
        assert_eq!(submission.uploads[0].slot, DocumentSlot::Photo);
        assert_eq!(submission.uploads[0].extension, ".jpg");
        assert_eq!(&submission.uploads[0].bytes[..], &[1, 2, 3]);
        assert_eq!(submission.uploads[1].slot, DocumentSlot::BForm);
    }

    #[tokio::test]
    async fn should_reject_non_image_photo() {
        let req = multipart_request(vec![Part::File(
            "photo",
            "cv.pdf",
            "application/pdf",
            vec![1],
        )]);
        let result = extract(req).await;
        assert!(matches!(result, Err(RegistryError::InvalidUpload(ref m)) if m.contains("image")));
    }

    #[tokio::test]
    async fn should_reject_gif_document() {
        let req = multipart_request(vec![Part::File(
            "birthCertificate",
            "scan.gif",
            "image/gif",
            vec![1],
        )]);
        assert!(matches!(extract(req).await, Err(RegistryError::InvalidUpload(_))));
    }

    #[tokio::test]
    async fn should_reject_file_over_limit() {
        let req = multipart_request(vec![Part::File(
            "photo",
            "big.png",
            "image/png",
            vec![0; MAX_UPLOAD_BYTES + 1],
        )]);
        assert!(matches!(extract(req).await, Err(RegistryError::FileTooLarge)));
    }

    #[tokio::test]
    async fn should_reject_unknown_file_field_and_duplicate_slot() {
        let req = multipart_request(vec![Part::File("resume", "cv.pdf", "application/pdf", vec![1])]);
        assert!(matches!(extract(req).await, Err(RegistryError::InvalidUpload(_))));

        let req = multipart_request(vec![
            Part::File("photo", "a.png", "image/png", vec![1]),
            Part::File("photo", "b.png", "image/png", vec![2]),
        ]);
        assert!(matches!(extract(req).await, Err(RegistryError::InvalidUpload(_))));
    }

    #[tokio::test]
    async fn should_skip_untouched_file_input() {
        let req = multipart_request(vec![
            Part::Text("name", "Ali Khan"),
            Part::File("photo", "", "application/octet-stream", Vec::new()),
        ]);
        let submission = extract(req).await.unwrap();
        assert!(submission.uploads.is_empty());
    }

    #[tokio::test]
    async fn should_accept_json_body() {
        let req = Request::builder()
            .method("PUT")
            .uri("/api/students/x")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"status":"Expelled","expelledDate":"2024-03-01","hasStipend":false}"#))
            .unwrap();
        let submission = extract(req).await.unwrap();
        assert_eq!(submission.form.status.as_deref(), Some("Expelled"));
        assert_eq!(submission.form.has_stipend.as_deref(), Some("false"));
        assert!(submission.uploads.is_empty());
    }

    #[test]
    fn should_keep_only_plain_extensions() {
        assert_eq!(extension_of("photo.JPEG"), ".jpeg");
        assert_eq!(extension_of("archive"), "");
        assert_eq!(extension_of("bad.ex t"), "");
    }
}
