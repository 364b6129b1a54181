use validator::ValidateEmail;

use crate::error::ApiError;

/// NEET subjects, in their canonical spelling
pub const SUBJECTS: &[&str] = &["Physics", "Chemistry", "Biology"];

pub const PREP_LEVELS: &[&str] = &["class11", "class12", "dropper"];

pub const DIFFICULTIES: &[&str] = &["Easy", "Moderate"];

pub const TEST_TYPES: &[&str] = &["full", "subject", "chapter"];

pub const SYLLABUS_STATUSES: &[&str] = &["not_started", "in_progress", "completed", "revision"];

pub const CLASS_TYPES: &[&str] = &["class11", "class12"];

/// Upper bound of `count` on question generation
pub const MAX_GENERATE_COUNT: u32 = 50;

fn one_of(field: &str, value: &str, allowed: &[&str]) -> Result<(), ApiError> {
    if allowed.contains(&value) {
        return Ok(());
    }

    Err(ApiError::Validation(format!(
        "Invalid {field}: '{value}'. Must be one of: {}",
        allowed.join(", ")
    )))
}

/// Validate a subject name
///
/// # Examples
/// ```
/// use prep_api::validation::validate_subject;
///
/// assert!(validate_subject("Physics").is_ok());
/// assert!(validate_subject("Astrology").is_err());
/// ```
pub fn validate_subject(subject: &str) -> Result<(), ApiError> {
    one_of("subject", subject, SUBJECTS)
}

/// Validate a free-text key component such as a chapter or topic name
pub fn validate_name(field: &str, value: &str) -> Result<(), ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Validation(format!("{field} cannot be empty")));
    }

    if trimmed.chars().count() > 255 {
        return Err(ApiError::Validation(format!(
            "{field} must be at most 255 characters long"
        )));
    }

    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ApiError> {
    if email.is_empty() {
        return Err(ApiError::Validation("Email cannot be empty".to_string()));
    }

    if !email.validate_email() {
        return Err(ApiError::Validation("Invalid email format".to_string()));
    }

    Ok(())
}

pub fn validate_prep_level(level: &str) -> Result<(), ApiError> {
    one_of("prep level", level, PREP_LEVELS)
}

pub fn validate_difficulty(difficulty: &str) -> Result<(), ApiError> {
    one_of("difficulty", difficulty, DIFFICULTIES)
}

pub fn validate_test_type(test_type: &str) -> Result<(), ApiError> {
    one_of("test type", test_type, TEST_TYPES)
}

pub fn validate_syllabus_status(status: &str) -> Result<(), ApiError> {
    one_of("status", status, SYLLABUS_STATUSES)
}

pub fn validate_class_type(class_type: &str) -> Result<(), ApiError> {
    one_of("class type", class_type, CLASS_TYPES)
}

pub fn validate_option_label(label: &str) -> Result<(), ApiError> {
    one_of("correct option", label, &["A", "B", "C", "D"])
}

pub fn validate_generate_count(count: u32) -> Result<(), ApiError> {
    if count == 0 || count > MAX_GENERATE_COUNT {
        return Err(ApiError::Validation(format!(
            "count must be between 1 and {MAX_GENERATE_COUNT}"
        )));
    }

    Ok(())
}

/// Validate a `correct` / `total` pair of counters
pub fn validate_counts(correct: i32, total: i32) -> Result<(), ApiError> {
    if correct < 0 || total < 0 {
        return Err(ApiError::Validation(
            "Counts cannot be negative".to_string(),
        ));
    }

    if correct > total {
        return Err(ApiError::Validation(format!(
            "Correct answers ({correct}) cannot exceed total ({total})"
        )));
    }

    Ok(())
}
