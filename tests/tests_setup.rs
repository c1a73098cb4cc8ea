extern crate hyper;
extern crate listings_lib;
#[macro_use]
extern crate serde_json;

#[allow(unused_imports)]
use listings_lib::http::error_response;
use listings_lib::models::*;

pub fn category(code: &str, name: &str, parent: Option<&str>) -> Category {
    Category {
        short_name: code.to_string(),
        name: name.to_string(),
        parent_category: parent.map(|parent| parent.to_string()),
    }
}

pub fn attribute(id: i32, code: &str, name: &str, widget: InputWidget, input_type: Option<InputType>) -> CategoryAttribute {
    CategoryAttribute {
        id,
        category_id: code.to_string(),
        name: name.to_string(),
        unit: None,
        is_mandatory: false,
        input_widget: widget,
        input_type,
        input_values: None,
    }
}

/// PROP (Rooms, Area) -> APT (Furnished), HSE (Heating), LND; JOB (Salary) on its own
#[allow(dead_code)]
pub fn create_property_tree() -> CategoryTree {
    let categories = vec![
        category("PROP", "Property", None),
        category("APT", "Apartments", Some("PROP")),
        category("HSE", "Houses", Some("PROP")),
        category("LND", "Land", Some("PROP")),
        category("JOB", "Jobs", None),
    ];
    let attributes = vec![
        attribute(1, "PROP", "Rooms", InputWidget::Input, Some(InputType::Number)),
        attribute(2, "PROP", "Area", InputWidget::Input, Some(InputType::Number)),
        attribute(3, "APT", "Furnished", InputWidget::Input, Some(InputType::Checkbox)),
        attribute(4, "HSE", "Heating", InputWidget::Select, None),
        attribute(5, "JOB", "Salary", InputWidget::Input, Some(InputType::Number)),
    ];
    CategoryTree::new(categories, attributes)
}

#[allow(dead_code)]
pub fn codes(categories: &[Category]) -> Vec<&str> {
    categories.iter().map(|cat| cat.short_name.as_str()).collect()
}
