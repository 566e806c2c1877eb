//! View rendering seam.
//!
//! Templates are an external collaborator: handlers hand over a template
//! name and a data bag and never look at the produced markup. The data-bag
//! keys are a stable contract per operation (`title` plus the entity/list
//! keys each template reads).

use serde_json::{json, Value};

use crate::domain::DomainError;

pub trait ViewRenderer: Send + Sync {
    /// Render the named template with its data bag.
    fn render(&self, template: &'static str, bag: &Value) -> Result<String, DomainError>;
}

/// Stand-in renderer that emits the template name and data bag as JSON.
/// A real template engine slots in behind the trait without touching any
/// handler; until then the output keeps the full bag observable.
pub struct DataBagRenderer;

impl ViewRenderer for DataBagRenderer {
    fn render(&self, template: &'static str, bag: &Value) -> Result<String, DomainError> {
        serde_json::to_string_pretty(&json!({
            "template": template,
            "data": bag,
        }))
        .map_err(|e| DomainError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_bag_renderer_exposes_template_and_bag() {
        let body = DataBagRenderer
            .render("book_list", &json!({ "title": "Book List" }))
            .unwrap();
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["template"], "book_list");
        assert_eq!(value["data"]["title"], "Book List");
    }
}
