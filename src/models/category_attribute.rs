//! Typed attribute definitions attached to categories
use std::fmt;
use std::io::Write;

use diesel::deserialize::{self, FromSql};
use diesel::pg::Pg;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::VarChar;
use serde_json;

use models::CategoryCode;
use schema::category_attributes;

/// Input style declared for an attribute, selects the filter logic.
/// Values this service does not know are read as `Unknown` and never filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromSqlRow, AsExpression)]
#[sql_type = "VarChar"]
#[serde(rename_all = "lowercase")]
pub enum InputWidget {
    Select,
    Textarea,
    Input,
    Unknown,
}

/// Value type declared for `input` widgets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromSqlRow, AsExpression)]
#[sql_type = "VarChar"]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Text,
    Number,
    Checkbox,
    Date,
    Unknown,
}

impl InputWidget {
    pub fn as_str(&self) -> &'static str {
        match *self {
            InputWidget::Select => "select",
            InputWidget::Textarea => "textarea",
            InputWidget::Input => "input",
            InputWidget::Unknown => "unknown",
        }
    }
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match *self {
            InputType::Text => "text",
            InputType::Number => "number",
            InputType::Checkbox => "checkbox",
            InputType::Date => "date",
            InputType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for InputWidget {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql<VarChar, Pg> for InputWidget {
    fn to_sql<W: Write>(&self, out: &mut Output<W, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<VarChar, Pg> for InputWidget {
    fn from_sql(bytes: Option<&[u8]>) -> deserialize::Result<Self> {
        match bytes {
            Some(b"select") => Ok(InputWidget::Select),
            Some(b"textarea") => Ok(InputWidget::Textarea),
            Some(b"input") => Ok(InputWidget::Input),
            Some(v) => {
                warn!("Unrecognized input widget {}, attribute will not filter", String::from_utf8_lossy(v));
                Ok(InputWidget::Unknown)
            }
            None => Err("Unexpected null for non-null column input_widget".into()),
        }
    }
}

impl ToSql<VarChar, Pg> for InputType {
    fn to_sql<W: Write>(&self, out: &mut Output<W, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<VarChar, Pg> for InputType {
    fn from_sql(bytes: Option<&[u8]>) -> deserialize::Result<Self> {
        match bytes {
            Some(b"text") => Ok(InputType::Text),
            Some(b"number") => Ok(InputType::Number),
            Some(b"checkbox") => Ok(InputType::Checkbox),
            Some(b"date") => Ok(InputType::Date),
            Some(v) => {
                warn!("Unrecognized input type {}, attribute will not filter", String::from_utf8_lossy(v));
                Ok(InputType::Unknown)
            }
            None => Err("Unexpected null for non-null column input_type".into()),
        }
    }
}

/// Attribute definition as stored in PG
#[derive(Debug, Serialize, Deserialize, Queryable, Identifiable, Clone, PartialEq)]
#[table_name = "category_attributes"]
pub struct CategoryAttribute {
    pub id: i32,
    #[serde(rename = "category")]
    pub category_id: CategoryCode,
    pub name: String,
    pub unit: Option<String>,
    pub is_mandatory: bool,
    pub input_widget: InputWidget,
    pub input_type: Option<InputType>,
    /// Allowed values, used when widget is `select`
    pub input_values: Option<serde_json::Value>,
}

impl CategoryAttribute {
    /// Key of this attribute inside a post attribute document
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }
}
