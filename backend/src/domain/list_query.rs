//! Filter and page selection shared by every list operation.

use pagination::PageRequest;

use super::Error;
use super::validation::page_request;

/// Validated parameters of a list call.
///
/// `name` is a substring filter; a blank term matches every row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    name: Option<String>,
    page: PageRequest,
}

impl ListQuery {
    /// Validate raw list parameters.
    pub fn try_new(
        name: Option<&str>,
        page: Option<i64>,
        items_per_page: Option<i64>,
    ) -> Result<Self, Error> {
        Ok(Self {
            name: super::validation::optional_text(name),
            page: page_request(page, items_per_page)?,
        })
    }

    /// Build a query from an already validated page request.
    pub fn new(name: Option<String>, page: PageRequest) -> Self {
        Self {
            name: name.filter(|term| !term.trim().is_empty()),
            page,
        }
    }

    /// The substring filter, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Page selection.
    pub fn page(&self) -> PageRequest {
        self.page
    }

    /// `LIKE` pattern for the filter, with `%`, `_` and `\` escaped by `\`.
    ///
    /// # Examples
    /// ```
    /// use backoffice::domain::ListQuery;
    ///
    /// let query = ListQuery::try_new(Some("50%"), None, None).unwrap();
    /// assert_eq!(query.like_pattern(), "%50\\%%");
    /// ```
    pub fn like_pattern(&self) -> String {
        let term = self.name.as_deref().unwrap_or_default();
        let mut pattern = String::with_capacity(term.len() + 2);
        pattern.push('%');
        for ch in term.chars() {
            if matches!(ch, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(ch);
        }
        pattern.push('%');
        pattern
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, "%%")]
    #[case(Some("   "), "%%")]
    #[case(Some("acme"), "%acme%")]
    #[case(Some("a_b"), "%a\\_b%")]
    #[case(Some("c:\\"), "%c:\\\\%")]
    fn builds_escaped_patterns(#[case] name: Option<&str>, #[case] expected: &str) {
        let query = ListQuery::try_new(name, None, None).expect("valid");
        assert_eq!(query.like_pattern(), expected);
    }

    #[rstest]
    fn defaults_to_the_first_page() {
        let query = ListQuery::try_new(None, None, None).expect("valid");
        assert_eq!(query.page().page(), 1);
        assert_eq!(query.page().offset(), 0);
    }
}
