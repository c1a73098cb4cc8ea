//! Arena of categories keyed by code. Parent links are stored as codes,
//! traversals keep a visited set so a corrupted parent chain is reported
//! instead of looping forever.
use std::collections::{HashMap, HashSet};

use failure::Error as FailureError;

use errors::Error;
use models::{Category, CategoryAttribute, CategoryCode, CategoryWithAttributes};

#[derive(Debug, Clone)]
struct Node {
    category: Category,
    children: Vec<CategoryCode>,
    attributes: Vec<CategoryAttribute>,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryTree {
    nodes: HashMap<CategoryCode, Node>,
    /// All codes ordered by category name
    order: Vec<CategoryCode>,
}

impl CategoryTree {
    pub fn new(categories: Vec<Category>, attributes: Vec<CategoryAttribute>) -> Self {
        let mut categories = categories;
        categories.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.short_name.cmp(&b.short_name)));

        let order: Vec<CategoryCode> = categories.iter().map(|cat| cat.short_name.clone()).collect();
        let mut nodes: HashMap<CategoryCode, Node> = categories
            .into_iter()
            .map(|category| {
                (
                    category.short_name.clone(),
                    Node {
                        category,
                        children: vec![],
                        attributes: vec![],
                    },
                )
            })
            .collect();

        for code in &order {
            let parent = nodes.get(code).and_then(|node| node.category.parent_category.clone());
            if let Some(parent) = parent {
                if let Some(parent_node) = nodes.get_mut(&parent) {
                    parent_node.children.push(code.clone());
                }
            }
        }

        for attribute in attributes {
            match nodes.get_mut(&attribute.category_id) {
                Some(node) => node.attributes.push(attribute),
                None => warn!("Attribute {} references unknown category {}", attribute.id, attribute.category_id),
            }
        }
        for node in nodes.values_mut() {
            node.attributes.sort_by_key(|attr| attr.id);
        }

        Self { nodes, order }
    }

    pub fn get(&self, code: &str) -> Option<&Category> {
        self.nodes.get(code).map(|node| &node.category)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.nodes.contains_key(code)
    }

    /// All categories ordered by name
    pub fn categories(&self) -> Vec<&Category> {
        self.order.iter().filter_map(|code| self.get(code)).collect()
    }

    /// Categories without a (known) parent, ordered by name
    pub fn roots(&self) -> Vec<&Category> {
        self.categories()
            .into_iter()
            .filter(|cat| match cat.parent_category {
                Some(ref parent) => !self.contains(parent),
                None => true,
            })
            .collect()
    }

    /// Direct children ordered by name
    pub fn children(&self, code: &str) -> Vec<&Category> {
        self.nodes
            .get(code)
            .map(|node| node.children.iter().filter_map(|child| self.get(child)).collect())
            .unwrap_or_default()
    }

    /// Attributes declared on the category itself
    pub fn own_attributes(&self, code: &str) -> &[CategoryAttribute] {
        self.nodes.get(code).map(|node| node.attributes.as_slice()).unwrap_or(&[])
    }

    /// Returns the category and all its descendants, depth first, each exactly once
    pub fn sub_categories(&self, code: &str, include_self: bool) -> Result<Vec<&Category>, FailureError> {
        let root = self.node(code)?;
        let mut visited: HashSet<&str> = HashSet::new();
        let mut result = vec![];
        let mut stack = vec![root];

        while let Some(node) = stack.pop() {
            if !visited.insert(node.category.short_name.as_str()) {
                return Err(format_err!("Category {} is reachable from itself", node.category.short_name)
                    .context(Error::CategoryCycle)
                    .into());
            }
            if include_self || node.category.short_name != code {
                result.push(&node.category);
            }
            for child in node.children.iter().rev() {
                stack.push(self.node(child)?);
            }
        }

        Ok(result)
    }

    /// Returns own attributes followed by the attributes of every ancestor, nearest first
    pub fn all_attributes(&self, code: &str) -> Result<Vec<&CategoryAttribute>, FailureError> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut result = vec![];
        let mut current = Some(self.node(code)?);

        while let Some(node) = current {
            if !visited.insert(node.category.short_name.as_str()) {
                return Err(format_err!("Parent chain of category {} loops at {}", code, node.category.short_name)
                    .context(Error::CategoryCycle)
                    .into());
            }
            result.extend(node.attributes.iter());
            current = node
                .category
                .parent_category
                .as_ref()
                .and_then(|parent| self.nodes.get(parent.as_str()));
        }

        Ok(result)
    }

    /// Category with its inherited attribute schema
    pub fn with_attributes(&self, code: &str) -> Result<CategoryWithAttributes, FailureError> {
        let category = self.node(code)?.category.clone();
        let attributes = self.all_attributes(code)?.into_iter().cloned().collect();
        Ok(CategoryWithAttributes::new(category, attributes))
    }

    fn node(&self, code: &str) -> Result<&Node, FailureError> {
        self.nodes.get(code).ok_or_else(|| {
            format_err!("Category {} not found", code)
                .context(Error::NotFound)
                .into()
        })
    }
}
