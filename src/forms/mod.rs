//! Form decoding and the validation/sanitization pipeline.

pub mod validate;

pub use validate::{escape_html, FieldError, Validator};

use url::form_urlencoded;

/// Decoded `application/x-www-form-urlencoded` request body.
///
/// Repeated keys are kept in submission order; a multi-select control
/// submits one pair per chosen option.
#[derive(Debug, Default)]
pub struct FormData {
    pairs: Vec<(String, String)>,
}

impl FormData {
    pub fn parse(body: &[u8]) -> Self {
        Self {
            pairs: form_urlencoded::parse(body).into_owned().collect(),
        }
    }

    /// First submitted value for `name`, if any.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Every submitted value for `name`. An absent field normalizes to an
    /// empty list, a single submission to one element.
    pub fn values(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }
}
