//! Column entity.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{MethodCall, Param};

/// A single column of a table definition.
///
/// The type descriptor always carries the column name as its first
/// parameter, so `string(120)` on column `title` is stored as
/// `string('title', 120)` and can be handed to a schema builder unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    /// Key used when the row is serialized to JSON, `None` when hidden.
    pub json_name: Option<String>,
    pub fillable: bool,
    pub column_type: MethodCall,
    /// Value generator for seeding, `None` means "no generated value".
    pub faker: Option<MethodCall>,
    /// Chained modifiers, e.g. `nullable`, `unique`, `default(0)`.
    pub properties: Vec<MethodCall>,
}

impl Column {
    /// A column with only a name and type; everything else defaulted.
    pub fn new(name: impl Into<String>, type_method: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            column_type: MethodCall::new(type_method, vec![Param::Str(name.clone())]),
            json_name: Some(name.clone()),
            name,
            fillable: false,
            faker: None,
            properties: Vec::new(),
        }
    }

    pub fn fillable(mut self, fillable: bool) -> Self {
        self.fillable = fillable;
        self
    }

    pub fn with_faker(mut self, faker: MethodCall) -> Self {
        self.faker = Some(faker);
        self
    }

    pub fn with_property(mut self, property: MethodCall) -> Self {
        self.properties.push(property);
        self
    }

    pub fn type_method(&self) -> &str {
        &self.column_type.method
    }

    /// `id()` and the `*Increments` family produce their own key.
    pub fn is_auto_increment(&self) -> bool {
        let method = self.type_method();
        method == "id" || method.contains("Increments")
    }

    pub fn is_nullable(&self) -> bool {
        self.properties.iter().any(|p| p.method == "nullable")
    }

    /// Storage type of a key column: `id` is a big integer,
    /// `fooIncrements` is a `fooInteger`.
    pub fn storage_type(&self) -> String {
        let method = self.type_method();
        if method == "id" {
            return "bigInteger".to_string();
        }
        match method.split_once("Increments") {
            Some((prefix, _)) => format!("{prefix}Integer"),
            None => method.to_string(),
        }
    }

    // ── definition text ─────────────────────────────────────────────────

    pub(crate) fn to_definition_line(&self) -> String {
        let mut fields = vec![
            self.name.clone(),
            self.json_field(),
            self.fillable.to_string(),
            self.faker
                .as_ref()
                .map_or_else(|| "null".to_string(), ToString::to_string),
            self.column_type.render_from(1),
        ];
        fields.extend(self.properties.iter().map(ToString::to_string));
        fields.join(", ")
    }

    pub(crate) fn to_primary_line(&self) -> String {
        let mut fields = vec![
            self.name.clone(),
            self.json_field(),
            self.column_type.render_from(1),
        ];
        fields.extend(self.properties.iter().map(ToString::to_string));
        format!("[*PRIMARY*]{}", fields.join(", "))
    }

    fn json_field(&self) -> String {
        self.json_name.clone().unwrap_or_else(|| "null".to_string())
    }
}
