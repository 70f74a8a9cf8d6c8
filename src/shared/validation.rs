//! Validation Utilities

use validator::{Validate, ValidationErrors};

use super::error::AppError;

/// Convert validation errors to AppError
///
/// Only the first field message is reported, fields are visited in name
/// order so the answer is stable.
pub fn validation_error(errors: ValidationErrors) -> AppError {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    let message = fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let msg = e.message.clone().map(|m| m.to_string()).unwrap_or_default();
                format!("{}: {}", field, msg)
            })
        })
        .next()
        .unwrap_or_else(|| "Validation failed".into());

    AppError::Validation(message)
}

/// Validate a request body, mapping failures to `AppError::Validation`.
pub fn validate<T: Validate>(body: &T) -> Result<(), AppError> {
    body.validate().map_err(validation_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct Body {
        #[validate(email(message = "Invalid email format"))]
        email: String,
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
    }

    #[test]
    fn test_first_field_message_is_reported() {
        let body = Body {
            email: "not-an-email".into(),
            name: String::new(),
        };

        let err = validate(&body).unwrap_err();
        assert_eq!(err.to_string(), "email: Invalid email format");
    }

    #[test]
    fn test_valid_body_passes() {
        let body = Body {
            email: "kim@example.com".into(),
            name: "kim".into(),
        };

        assert!(validate(&body).is_ok());
    }
}
