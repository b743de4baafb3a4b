use serde::{Deserialize, Serialize};

/// A foreign-key constraint: `foreign` on this table references
/// `references` on table `on`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub foreign: String,
    pub references: String,
    pub on: String,
    pub on_update: Option<String>,
    pub on_delete: Option<String>,
}

impl ForeignKey {
    pub fn new(
        foreign: impl Into<String>,
        references: impl Into<String>,
        on: impl Into<String>,
    ) -> Self {
        Self {
            foreign: foreign.into(),
            references: references.into(),
            on: on.into(),
            on_update: None,
            on_delete: None,
        }
    }

    pub fn on_update(mut self, action: impl Into<String>) -> Self {
        self.on_update = Some(action.into());
        self
    }

    pub fn on_delete(mut self, action: impl Into<String>) -> Self {
        self.on_delete = Some(action.into());
        self
    }

    pub(crate) fn to_definition_entry(&self) -> String {
        let mut fields = vec![
            format!("'{}'", self.foreign),
            format!("'{}'", self.references),
            format!("'{}'", self.on),
        ];
        if let Some(action) = &self.on_update {
            fields.push(format!("onUpdate:{action}"));
        }
        if let Some(action) = &self.on_delete {
            fields.push(format!("onDelete:{action}"));
        }
        format!("({})", fields.join(", "))
    }
}
