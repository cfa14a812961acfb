use crate::shared::types::PaginationParams;

pub fn validate_pagination(page: Option<u32>, limit: Option<u32>) -> PaginationParams {
    PaginationParams::new(page.unwrap_or(1), limit.unwrap_or(20))
}

/// Trim and check a display name, returning the cleaned value.
pub fn validate_name(field: &str, value: &str, min_len: usize) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.chars().count() < min_len {
        return Err(format!("{} must be at least {} characters", field, min_len));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults() {
        let p = validate_pagination(None, None);
        assert_eq!((p.page, p.limit), (1, 20));
        let p = validate_pagination(Some(0), Some(0));
        assert_eq!((p.page, p.limit), (1, 1));
    }

    #[test]
    fn names_are_trimmed_before_length_check() {
        assert_eq!(validate_name("name", "  Acme ", 2).unwrap(), "Acme");
        assert!(validate_name("name", " A ", 2).is_err());
    }
}
