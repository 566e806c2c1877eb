//! Field-scoped validation and sanitization over a decoded form.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::Status;

use super::FormData;

/// One failed check, addressed to the field that failed it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Ordered, field-scoped checks and transforms applied to untrusted input.
///
/// Every accessor trims, checks, then HTML-escapes, and always hands back
/// the sanitized value — a failed submission echoes escaped values into the
/// re-rendered form, never raw input. At most one message is recorded per
/// field (first failure wins).
pub struct Validator<'f> {
    form: &'f FormData,
    errors: Vec<FieldError>,
}

impl<'f> Validator<'f> {
    pub fn new(form: &'f FormData) -> Self {
        Self {
            form,
            errors: Vec::new(),
        }
    }

    fn raw(&self, field: &str) -> String {
        self.form.value(field).unwrap_or_default().trim().to_string()
    }

    fn fail(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Free-form text, length >= 1 after trimming.
    pub fn required(&mut self, field: &'static str, message: &str) -> String {
        let value = self.raw(field);
        if value.is_empty() {
            self.fail(field, message);
        }
        escape_html(&value)
    }

    /// Name field: required, alphanumeric characters only.
    pub fn name(&mut self, field: &'static str, label: &str) -> String {
        let value = self.raw(field);
        if value.is_empty() {
            self.fail(field, format!("{} must be specified.", label));
        } else if !value.chars().all(char::is_alphanumeric) {
            self.fail(field, format!("{} has non-alphanumeric characters.", label));
        }
        escape_html(&value)
    }

    /// Optional ISO-8601 (YYYY-MM-DD) date; empty submissions collapse to
    /// `None`, unparseable ones record an error.
    pub fn optional_date(&mut self, field: &'static str, message: &str) -> Option<NaiveDate> {
        let value = self.raw(field);
        if value.is_empty() {
            return None;
        }
        match NaiveDate::parse_from_str(&value, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                self.fail(field, message);
                None
            }
        }
    }

    /// Single-select reference pick; the option value is a record id.
    pub fn selected_id(&mut self, field: &'static str, message: &str) -> Option<i32> {
        let value = self.raw(field);
        match value.parse() {
            Ok(id) => Some(id),
            Err(_) => {
                self.fail(field, message);
                None
            }
        }
    }

    /// Multi-select reference picks, normalized to a set of ids: an absent
    /// field is an empty set, a single submission a singleton.
    pub fn id_list(&mut self, field: &str) -> Vec<i32> {
        self.form
            .values(field)
            .iter()
            .filter_map(|v| v.trim().parse().ok())
            .collect()
    }

    /// Copy status drawn from the form's select control.
    pub fn status(&mut self, field: &'static str, message: &str) -> Option<Status> {
        let value = self.raw(field);
        match value.parse() {
            Ok(status) => Some(status),
            Err(_) => {
                self.fail(field, message);
                None
            }
        }
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }
}

/// Escape text for embedding in HTML: `&`, `<`, `>`, `"`, `'` and `/`.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_trims_and_escapes() {
        let form = FormData::parse(b"title=++Tom+%26+Jerry++");
        let mut v = Validator::new(&form);
        let title = v.required("title", "Title must not be empty.");
        assert_eq!(title, "Tom &amp; Jerry");
        assert!(v.into_errors().is_empty());
    }

    #[test]
    fn required_rejects_whitespace_only() {
        let form = FormData::parse(b"title=+++");
        let mut v = Validator::new(&form);
        let title = v.required("title", "Title must not be empty.");
        assert_eq!(title, "");
        let errors = v.into_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "title");
        assert_eq!(errors[0].message, "Title must not be empty.");
    }

    #[test]
    fn name_records_one_error_per_field() {
        // Missing first name and a non-alphanumeric family name: one
        // message each, empty-check wins over the format check.
        let form = FormData::parse(b"first_name=&family_name=O%27Brien");
        let mut v = Validator::new(&form);
        v.name("first_name", "First name");
        v.name("family_name", "Family name");
        let errors = v.into_errors();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].message, "First name must be specified.");
        assert_eq!(errors[1].message, "Family name has non-alphanumeric characters.");
    }

    #[test]
    fn optional_date_parses_iso_and_flags_garbage() {
        let form = FormData::parse(b"date_of_birth=1973-06-06&date_of_death=yesterday");
        let mut v = Validator::new(&form);
        let birth = v.optional_date("date_of_birth", "Invalid date of birth.");
        let death = v.optional_date("date_of_death", "Invalid date of death.");
        assert_eq!(
            birth,
            Some(NaiveDate::from_ymd_opt(1973, 6, 6).unwrap())
        );
        assert_eq!(death, None);
        let errors = v.into_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "date_of_death");
    }

    #[test]
    fn absent_optional_date_is_not_an_error() {
        let form = FormData::parse(b"first_name=Jane");
        let mut v = Validator::new(&form);
        assert_eq!(v.optional_date("date_of_birth", "Invalid date."), None);
        assert!(v.into_errors().is_empty());
    }

    #[test]
    fn id_list_normalizes_absent_singleton_and_many() {
        let none = FormData::parse(b"title=x");
        let one = FormData::parse(b"genre=4");
        let many = FormData::parse(b"genre=4&genre=7");

        assert!(Validator::new(&none).id_list("genre").is_empty());
        assert_eq!(Validator::new(&one).id_list("genre"), vec![4]);
        assert_eq!(Validator::new(&many).id_list("genre"), vec![4, 7]);
    }

    #[test]
    fn selected_id_requires_a_numeric_pick() {
        let form = FormData::parse(b"author=");
        let mut v = Validator::new(&form);
        assert_eq!(v.selected_id("author", "Author must not be empty."), None);
        assert_eq!(v.into_errors().len(), 1);
    }

    #[test]
    fn status_parses_the_enumeration() {
        let form = FormData::parse(b"status=Loaned");
        let mut v = Validator::new(&form);
        assert_eq!(v.status("status", "Invalid status."), Some(Status::Loaned));
        assert!(v.into_errors().is_empty());

        let bad = FormData::parse(b"status=Checked+Out");
        let mut v = Validator::new(&bad);
        assert_eq!(v.status("status", "Invalid status."), None);
        assert_eq!(v.into_errors().len(), 1);
    }

    #[test]
    fn escape_html_covers_the_dangerous_set() {
        assert_eq!(
            escape_html(r#"<script>alert("x&y")</script>"#),
            "&lt;script&gt;alert(&quot;x&amp;y&quot;)&lt;&#x2F;script&gt;"
        );
    }
}
