//! Validation helpers for DTOs.

use validator::ValidationError;

/// Longest accepted team name, in characters.
pub const MAX_TEAM_NAME_LEN: usize = 64;

/// Validates a proctor or team identifier: a lowercase letter followed by digits.
///
/// # Examples
///
/// ```ignore
/// validate_entity_id("p3")  // Ok
/// validate_entity_id("t12") // Ok
/// validate_entity_id("T1")  // Err - uppercase
/// validate_entity_id("t")   // Err - no number
/// ```
pub fn validate_entity_id(id: &str) -> Result<(), ValidationError> {
    let mut chars = id.chars();
    let prefix_ok = chars.next().is_some_and(|c| c.is_ascii_lowercase());
    let digits = chars.as_str();
    if !prefix_ok || digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        let mut err = ValidationError::new("entity_id_format");
        err.message = Some(format!("`{id}` is not a valid identifier").into());
        return Err(err);
    }
    Ok(())
}

/// Validates every entry of an assignment list.
pub fn validate_entity_ids(ids: &[String]) -> Result<(), ValidationError> {
    ids.iter().try_for_each(|id| validate_entity_id(id))
}

/// Validates that no team name is longer than [`MAX_TEAM_NAME_LEN`].
pub fn validate_team_names(names: &[String]) -> Result<(), ValidationError> {
    if let Some(name) = names
        .iter()
        .find(|name| name.trim().chars().count() > MAX_TEAM_NAME_LEN)
    {
        let mut err = ValidationError::new("team_name_length");
        err.message = Some(
            format!(
                "Team name `{}` is longer than {MAX_TEAM_NAME_LEN} characters",
                name.trim()
            )
            .into(),
        );
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_entity_id_valid() {
        assert!(validate_entity_id("p1").is_ok());
        assert!(validate_entity_id("t40").is_ok());
    }

    #[test]
    fn test_validate_entity_id_invalid() {
        assert!(validate_entity_id("").is_err());
        assert!(validate_entity_id("t").is_err()); // no number
        assert!(validate_entity_id("P1").is_err()); // uppercase
        assert!(validate_entity_id("t1 ").is_err()); // trailing space
        assert!(validate_entity_id("1t").is_err());
    }

    #[test]
    fn test_validate_team_names() {
        assert!(validate_team_names(&["Owls".to_string(), "  Foxes  ".to_string()]).is_ok());
        assert!(validate_team_names(&["x".repeat(MAX_TEAM_NAME_LEN + 1)]).is_err());
    }
}
