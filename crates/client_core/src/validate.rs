//! Pure input preconditions checked before an operation may leave Idle.

use shared::error::ValidationError;

/// A doubt must contain at least one non-whitespace character.
pub fn validate_doubt(text: &str) -> Result<&str, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyDoubt);
    }
    Ok(trimmed)
}

/// Both fields of a concept explanation request must be non-empty after
/// trimming; the error distinguishes which one is missing.
pub fn validate_concept<'a>(
    concept: &'a str,
    grade: &'a str,
) -> Result<(&'a str, &'a str), ValidationError> {
    let concept = concept.trim();
    let grade = grade.trim();
    match (concept.is_empty(), grade.is_empty()) {
        (true, true) => Err(ValidationError::MissingConceptAndGrade),
        (true, false) => Err(ValidationError::MissingConcept),
        (false, true) => Err(ValidationError::MissingGrade),
        (false, false) => Ok((concept, grade)),
    }
}

/// Generation counts must be positive.
pub fn validate_count(count: u32) -> Result<u32, ValidationError> {
    if count == 0 {
        return Err(ValidationError::NonPositiveCount);
    }
    Ok(count)
}
