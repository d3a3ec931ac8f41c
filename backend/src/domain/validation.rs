//! Shared input checks used by the entity constructors and controllers.

use pagination::{PageRequest, PageRequestError};

use super::Error;

/// Longest accepted display name, in characters.
pub const MAX_NAME_LENGTH: usize = 120;

/// Trim `value` and require it to be non-empty and reasonably short.
pub fn required_name(field: &str, value: &str) -> Result<String, Error> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(format!("{field} must not be empty")));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(Error::validation(format!(
            "{field} must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_owned())
}

/// Trim optional free text, folding blank values to `None`.
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}

/// Normalise an optional e-mail address and check its basic shape.
pub fn optional_email(value: Option<&str>) -> Result<Option<String>, Error> {
    let Some(email) = optional_text(value) else {
        return Ok(None);
    };
    let valid = email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && !domain.contains('@')
            && domain
                .split_once('.')
                .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
            && !email.chars().any(char::is_whitespace)
    });
    if valid {
        Ok(Some(email))
    } else {
        Err(Error::validation("email is not a valid address"))
    }
}

/// Require a money amount to be zero or positive.
pub fn non_negative_amount(field: &str, value: i64) -> Result<i64, Error> {
    if value < 0 {
        return Err(Error::validation(format!("{field} must not be negative")));
    }
    Ok(value)
}

/// Build a page request from optional list parameters.
pub fn page_request(page: Option<i64>, items_per_page: Option<i64>) -> Result<PageRequest, Error> {
    PageRequest::from_optional(page, items_per_page).map_err(page_error)
}

fn page_error(error: PageRequestError) -> Error {
    Error::validation(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;
    use rstest::rstest;

    #[rstest]
    #[case("  Acme  ", "Acme")]
    #[case("x", "x")]
    fn names_are_trimmed(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(required_name("name", raw).expect("valid"), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_names_are_rejected(#[case] raw: &str) {
        let err = required_name("name", raw).expect_err("blank");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.message(), "name must not be empty");
    }

    #[rstest]
    fn overlong_names_are_rejected() {
        let raw = "a".repeat(MAX_NAME_LENGTH + 1);
        assert!(required_name("name", &raw).is_err());
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some("  "), None)]
    #[case(Some(" a@b.io "), Some("a@b.io"))]
    fn optional_emails(#[case] raw: Option<&str>, #[case] expected: Option<&str>) {
        assert_eq!(
            optional_email(raw).expect("valid"),
            expected.map(str::to_owned)
        );
    }

    #[rstest]
    #[case("plain")]
    #[case("@b.io")]
    #[case("a@b")]
    #[case("a@.io")]
    #[case("a@b@c.io")]
    #[case("a b@c.io")]
    fn malformed_emails_are_rejected(#[case] raw: &str) {
        let err = optional_email(Some(raw)).expect_err("malformed");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[rstest]
    fn negative_amounts_are_rejected() {
        assert!(non_negative_amount("price", -1).is_err());
        assert_eq!(non_negative_amount("price", 0), Ok(0));
    }

    #[rstest]
    #[case(Some(0), None)]
    #[case(None, Some(0))]
    #[case(None, Some(101))]
    fn invalid_pages_are_validation_errors(
        #[case] page: Option<i64>,
        #[case] items_per_page: Option<i64>,
    ) {
        let err = page_request(page, items_per_page).expect_err("invalid page");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
