pub mod attendance;
pub mod class;
pub mod department;
pub mod stipend;
pub mod student;
pub mod subject;
pub mod teacher;
pub mod upload;
pub mod user;

use std::str::FromStr;

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::error::RegistryError;

/// `Json` whose rejection is reported as an `INVALID_BODY` error body.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = RegistryError;

    fn from_request(
        req: Request,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            let Json(value) = Json::<T>::from_request(req, &())
                .await
                .map_err(|rejection| RegistryError::InvalidBody(rejection.body_text()))?;
            Ok(Self(value))
        }
    }
}

/// Parse an id taken from the path. A malformed id cannot name a record, so it
/// is reported as `not_found`.
pub fn path_id<T: FromStr>(raw: &str, not_found: RegistryError) -> Result<T, RegistryError> {
    raw.parse::<T>().map_err(|_| not_found)
}

/// Confirmation body for a successful delete.
pub fn deleted(entity: &str) -> Json<Value> {
    Json(json!({ "message": format!("{entity} deleted successfully") }))
}

/// Optional reference filter from the query string. Blank means unfiltered;
/// a malformed id is a 400.
pub fn filter_id<T: FromStr>(
    value: Option<&str>,
    field: &'static str,
) -> Result<Option<T>, RegistryError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| RegistryError::invalid(field, format!("{field} must be a valid id"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use madrasa_domain::id::ClassId;

    #[test]
    fn should_treat_malformed_path_id_as_not_found() {
        let result = path_id::<ClassId>("42", RegistryError::ClassNotFound);
        assert!(matches!(result, Err(RegistryError::ClassNotFound)));
    }

    #[test]
    fn should_ignore_blank_filter_and_reject_malformed_one() {
        assert!(matches!(filter_id::<ClassId>(Some("  "), "class"), Ok(None)));
        assert!(matches!(filter_id::<ClassId>(None, "class"), Ok(None)));
        assert!(matches!(
            filter_id::<ClassId>(Some("abc"), "class"),
            Err(RegistryError::Invalid(_))
        ));
        let id = ClassId::generate();
        assert_eq!(
            filter_id::<ClassId>(Some(&id.to_string()), "class").unwrap(),
            Some(id)
        );
    }

    #[test]
    fn should_confirm_deletion() {
        let Json(body) = deleted("Stipend");
        assert_eq!(body["message"], "Stipend deleted successfully");
    }
}
