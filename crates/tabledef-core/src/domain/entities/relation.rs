use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{MethodCall, Param};

/// Relationship methods a definition may declare in `RELATIONS:`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationKind {
    HasOne,
    BelongsTo,
    HasMany,
    BelongsToMany,
    MorphsOne,
    MorphsMany,
    HasOneThroughMorph,
    HasManyThroughMorph,
    HasOneThroughManyMorphs,
    HasManyThroughManyMorphs,
}

impl RelationKind {
    pub const ALL: [RelationKind; 10] = [
        Self::HasOne,
        Self::BelongsTo,
        Self::HasMany,
        Self::BelongsToMany,
        Self::MorphsOne,
        Self::MorphsMany,
        Self::HasOneThroughMorph,
        Self::HasManyThroughMorph,
        Self::HasOneThroughManyMorphs,
        Self::HasManyThroughManyMorphs,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HasOne => "hasOne",
            Self::BelongsTo => "belongsTo",
            Self::HasMany => "hasMany",
            Self::BelongsToMany => "belongsToMany",
            Self::MorphsOne => "morphsOne",
            Self::MorphsMany => "morphsMany",
            Self::HasOneThroughMorph => "hasOneThroughMorph",
            Self::HasManyThroughMorph => "hasManyThroughMorph",
            Self::HasOneThroughManyMorphs => "hasOneThroughManyMorphs",
            Self::HasManyThroughManyMorphs => "hasManyThroughManyMorphs",
        }
    }

    /// Morph relations that address a pivot by alias instead of naming a
    /// related table in their first parameter.
    pub const fn names_related_table(self) -> bool {
        !matches!(
            self,
            Self::MorphsOne
                | Self::MorphsMany
                | Self::HasOneThroughManyMorphs
                | Self::HasManyThroughManyMorphs
        )
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown relation method '{s}'"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub kind: RelationKind,
    pub params: Vec<Param>,
}

impl Relation {
    pub fn new(kind: RelationKind, params: Vec<Param>) -> Self {
        Self { kind, params }
    }

    /// Name of the related table, when the relation carries one.
    pub fn related_table(&self) -> Option<String> {
        if !self.kind.names_related_table() {
            return None;
        }
        self.params.first().map(Param::as_plain)
    }

    pub(crate) fn to_definition_entry(&self) -> String {
        MethodCall::new(self.kind.as_str(), self.params.clone()).to_string()
    }
}
