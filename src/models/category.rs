//! Category labels for on-chain transaction tagging

use crate::utils::errors::AppError;

/// The contract stores labels as `(string-utf8 64)`
pub const MAX_CATEGORY_LEN: usize = 64;

/// Suggested labels offered by the UI; the on-chain mapping accepts any
/// non-empty utf8 string, so these are advisory only.
pub const SUGGESTED_CATEGORIES: &[&str] =
    &["Income", "Expense", "Transfer", "Investment", "Other"];

/// Validate a label before it reaches the wallet flow
pub fn validate_label(label: &str) -> Result<(), AppError> {
    if label.trim().is_empty() {
        return Err(AppError::validation("Category label must not be empty"));
    }
    if label.chars().count() > MAX_CATEGORY_LEN {
        return Err(AppError::validation(format!(
            "Category label is limited to {} characters",
            MAX_CATEGORY_LEN
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_validation() {
        assert!(validate_label("Income").is_ok());
        assert!(validate_label("").is_err());
        assert!(validate_label("   ").is_err());
        assert!(validate_label(&"x".repeat(65)).is_err());
        assert!(validate_label(&"x".repeat(64)).is_ok());
    }
}
