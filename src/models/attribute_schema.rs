//! Maps request parameters onto the attribute schema of a category and turns
//! them into typed predicates.
//!
//! A parameter addresses the first attribute, in inheritance order, whose
//! lower-cased name is contained in the lower-cased parameter name, so
//! `min_mileage` and `max_mileage` both address `Mileage`. Parameters that
//! address no attribute are ignored: they never fail a search and never
//! narrow it.
use models::{AttributePredicate, AttributeValue, CategoryAttribute, InputType, InputWidget, QueryParams, RangeBound};

#[derive(Debug, Clone, Default)]
pub struct AttributeSchema {
    /// Attributes with their normalized names, in inheritance order
    attributes: Vec<(String, CategoryAttribute)>,
}

/// Outcome of resolving a set of parameters against a schema
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub predicates: Vec<AttributePredicate>,
    /// Parameters addressing no attribute
    pub ignored: Vec<String>,
}

impl AttributeSchema {
    pub fn new(attributes: Vec<CategoryAttribute>) -> Self {
        Self {
            attributes: attributes.into_iter().map(|attr| (attr.name.to_lowercase(), attr)).collect(),
        }
    }

    /// Attribute addressed by the parameter `param`
    pub fn find(&self, param: &str) -> Option<&CategoryAttribute> {
        let param = param.to_lowercase();
        self.attributes
            .iter()
            .find(|&&(ref name, _)| param.contains(name.as_str()))
            .map(|&(_, ref attr)| attr)
    }

    /// Binds every distinct parameter name to the attribute it addresses
    pub fn bind<'a>(&'a self, params: &QueryParams) -> Vec<(String, Option<&'a CategoryAttribute>)> {
        params
            .names()
            .into_iter()
            .map(|name| {
                let attr = self.find(&name);
                (name, attr)
            })
            .collect()
    }

    /// Builds one predicate per parameter that addresses a filterable attribute
    pub fn resolve(&self, params: &QueryParams) -> Resolution {
        let mut resolution = Resolution::default();
        for (param, attr) in self.bind(params) {
            match attr {
                Some(attr) => {
                    if let Some(predicate) = predicate_for(attr, &param, params) {
                        resolution.predicates.push(predicate);
                    }
                }
                None => resolution.ignored.push(param),
            }
        }
        resolution
    }
}

fn predicate_for(attr: &CategoryAttribute, param: &str, params: &QueryParams) -> Option<AttributePredicate> {
    let key = attr.key();
    match (attr.input_widget, attr.input_type) {
        (InputWidget::Select, input_type) => {
            let values = params
                .get_all(param)
                .into_iter()
                .map(|raw| match input_type {
                    Some(InputType::Number) => AttributeValue::coerce_number(&raw),
                    _ => AttributeValue::Text(raw),
                })
                .collect();
            Some(AttributePredicate::OneOf { key, values })
        }
        (InputWidget::Input, Some(InputType::Number)) | (InputWidget::Input, Some(InputType::Date)) => {
            let value = AttributeValue::coerce_number(params.get(param)?);
            let bound = if param.contains("min") {
                RangeBound::Min
            } else {
                RangeBound::Max
            };
            Some(AttributePredicate::Range { key, bound, value })
        }
        // The stored value is compared with the whole list of supplied values.
        (InputWidget::Input, Some(InputType::Checkbox)) | (InputWidget::Input, Some(InputType::Text)) => Some(AttributePredicate::Equals {
            key,
            value: AttributeValue::List(params.get_all(param)),
        }),
        _ => None,
    }
}
