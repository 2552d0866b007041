//! Common validation utilities.

use validator::ValidationError;

/// Maximum length of a complaint description.
pub const MAX_DESCRIPTION_LEN: usize = 4000;

/// Maximum length of free-text remark fields.
pub const MAX_REMARKS_LEN: usize = 2000;

/// Maximum length of an assignee (staff id or department queue name).
pub const MAX_ASSIGNEE_LEN: usize = 64;

/// Validates that a feedback rating is within 1 to 5.
pub fn validate_rating(rating: i16) -> Result<(), ValidationError> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        let mut err = ValidationError::new("rating_range");
        err.message = Some("Rating must be between 1 and 5".into());
        Err(err)
    }
}

/// Validates that a complaint description is non-blank and within length limits.
pub fn validate_description(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        let mut err = ValidationError::new("description_blank");
        err.message = Some("Description must not be blank".into());
        return Err(err);
    }
    if text.len() > MAX_DESCRIPTION_LEN {
        let mut err = ValidationError::new("description_length");
        err.message = Some("Description must be at most 4000 characters".into());
        return Err(err);
    }
    Ok(())
}

/// Validates that a free-text remark field is within length limits.
///
/// Blank remarks are allowed; most transitions make them optional.
pub fn validate_remarks(text: &str) -> Result<(), ValidationError> {
    if text.len() > MAX_REMARKS_LEN {
        let mut err = ValidationError::new("remarks_length");
        err.message = Some("Remarks must be at most 2000 characters".into());
        return Err(err);
    }
    Ok(())
}

/// Validates an assignee reference: either a staff user id or a department
/// queue name such as `commercial`.
pub fn validate_assignee(assignee: &str) -> Result<(), ValidationError> {
    if assignee.trim().is_empty() {
        let mut err = ValidationError::new("assignee_blank");
        err.message = Some("Assignee must not be blank".into());
        return Err(err);
    }
    if assignee.len() > MAX_ASSIGNEE_LEN {
        let mut err = ValidationError::new("assignee_length");
        err.message = Some("Assignee must be at most 64 characters".into());
        return Err(err);
    }
    let valid_chars = assignee
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid_chars {
        let mut err = ValidationError::new("assignee_chars");
        err.message =
            Some("Assignee may contain only letters, digits, hyphens and underscores".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Rating tests
    #[test]
    fn test_validate_rating() {
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(3).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
        assert!(validate_rating(-1).is_err());
    }

    #[test]
    fn test_validate_rating_error_message() {
        let err = validate_rating(9).unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Rating must be between 1 and 5"
        );
    }

    // Description tests
    #[test]
    fn test_validate_description() {
        assert!(validate_description("The delivered unit arrived damaged.").is_ok());
        assert!(validate_description("").is_err());
        assert!(validate_description("   \t\n").is_err());
    }

    #[test]
    fn test_validate_description_length_limit() {
        let at_limit = "x".repeat(MAX_DESCRIPTION_LEN);
        assert!(validate_description(&at_limit).is_ok());

        let over_limit = "x".repeat(MAX_DESCRIPTION_LEN + 1);
        let err = validate_description(&over_limit).unwrap_err();
        assert_eq!(err.code, "description_length");
    }

    #[test]
    fn test_validate_description_blank_error_code() {
        let err = validate_description("  ").unwrap_err();
        assert_eq!(err.code, "description_blank");
    }

    // Remarks tests
    #[test]
    fn test_validate_remarks_allows_blank() {
        assert!(validate_remarks("").is_ok());
        assert!(validate_remarks("Resolved over the phone").is_ok());
    }

    #[test]
    fn test_validate_remarks_length_limit() {
        let at_limit = "r".repeat(MAX_REMARKS_LEN);
        assert!(validate_remarks(&at_limit).is_ok());

        let over_limit = "r".repeat(MAX_REMARKS_LEN + 1);
        let err = validate_remarks(&over_limit).unwrap_err();
        assert_eq!(err.code, "remarks_length");
    }

    // Assignee tests
    #[test]
    fn test_validate_assignee_accepts_queue_names() {
        assert!(validate_assignee("commercial").is_ok());
        assert!(validate_assignee("field_ops").is_ok());
        assert!(validate_assignee("tier-2").is_ok());
    }

    #[test]
    fn test_validate_assignee_accepts_uuids() {
        assert!(validate_assignee("3f2c7a90-1f6e-4b0a-9adf-0d6b235cb572").is_ok());
    }

    #[test]
    fn test_validate_assignee_rejects_blank() {
        let err = validate_assignee("  ").unwrap_err();
        assert_eq!(err.code, "assignee_blank");
    }

    #[test]
    fn test_validate_assignee_rejects_bad_chars() {
        assert!(validate_assignee("front desk").is_err());
        assert!(validate_assignee("ops@hq").is_err());
        assert!(validate_assignee("queue/7").is_err());
    }

    #[test]
    fn test_validate_assignee_length_limit() {
        let at_limit = "a".repeat(MAX_ASSIGNEE_LEN);
        assert!(validate_assignee(&at_limit).is_ok());

        let over_limit = "a".repeat(MAX_ASSIGNEE_LEN + 1);
        let err = validate_assignee(&over_limit).unwrap_err();
        assert_eq!(err.code, "assignee_length");
    }
}
