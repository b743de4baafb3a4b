//! Parsers for the small sections: foreign keys, relations, excludes,
//! records and timestamps.

use crate::domain::{
    entities::{ForeignKey, Relation, RelationKind},
    parser::{
        ParseWarning,
        sections::Section,
        text::{parse_method, parse_scalar, split_top_level},
    },
};

/// `('foreign','references','on',onUpdate:cascade,onDelete:'set null'), ...`
pub fn foreign_keys(table: &str, body: &str, warnings: &mut Vec<ParseWarning>) -> Vec<ForeignKey> {
    let mut keys = Vec::new();
    for entry in split_top_level(body, ',') {
        if entry.is_empty() {
            continue;
        }
        match foreign_key(entry) {
            Ok(key) => keys.push(key),
            Err(reason) => warnings.push(ParseWarning::new(table, Section::ForeignKeys, entry, reason)),
        }
    }
    keys
}

fn foreign_key(entry: &str) -> Result<ForeignKey, String> {
    let inner = entry.strip_prefix('(').unwrap_or(entry);
    let inner = inner.strip_suffix(')').unwrap_or(inner);
    let fields: Vec<&str> = inner.split(',').collect();
    if fields.len() < 3 {
        return Err(format!("expected at least 3 fields, found {}", fields.len()));
    }

    let identifier = |field: &str| parse_scalar(field).as_plain();
    let mut key = ForeignKey::new(identifier(fields[0]), identifier(fields[1]), identifier(fields[2]));

    for option in &fields[3..] {
        let Some((name, value)) = option.split_once(':') else {
            return Err(format!("option '{option}' is not a key:value pair"));
        };
        let value = value.trim_matches(['\'', '"']).to_lowercase();
        match name.to_ascii_lowercase().as_str() {
            "onupdate" => key.on_update = Some(value),
            "ondelete" => key.on_delete = Some(value),
            _ => return Err(format!("unknown foreign key option '{name}'")),
        }
    }
    Ok(key)
}

pub fn relations(table: &str, body: &str, warnings: &mut Vec<ParseWarning>) -> Vec<Relation> {
    let mut relations = Vec::new();
    for entry in split_top_level(body, ',') {
        if entry.is_empty() {
            continue;
        }
        let call = parse_method(entry);
        match call.method.parse::<RelationKind>() {
            Ok(kind) => relations.push(Relation::new(kind, call.params)),
            Err(reason) => warnings.push(ParseWarning::new(table, Section::Relations, entry, reason)),
        }
    }
    relations
}

pub fn excludes(body: &str) -> Vec<String> {
    body.split(',')
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

pub fn record_count(table: &str, body: &str, warnings: &mut Vec<ParseWarning>) -> u32 {
    if body.is_empty() {
        return 0;
    }
    body.parse().unwrap_or_else(|_| {
        warnings.push(ParseWarning::new(
            table,
            Section::Records,
            body,
            "not a non-negative integer, using 0",
        ));
        0
    })
}

/// Only a literal `false` disables timestamps.
pub fn has_timestamps(body: Option<&str>) -> bool {
    !body.is_some_and(|b| b.eq_ignore_ascii_case("false"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Param;

    #[test]
    fn foreign_key_with_actions() {
        let mut warnings = Vec::new();
        let keys = foreign_keys(
            "posts",
            "('user_id','id','users',onDelete:CASCADE,onUpdate:'restrict')",
            &mut warnings,
        );
        assert!(warnings.is_empty());
        assert_eq!(
            keys,
            vec![
                ForeignKey::new("user_id", "id", "users")
                    .on_delete("cascade")
                    .on_update("restrict")
            ]
        );
    }

    #[test]
    fn last_duplicate_action_wins() {
        let mut warnings = Vec::new();
        let keys = foreign_keys("t", "('a','id','b',onDelete:cascade,onDelete:restrict)", &mut warnings);
        assert_eq!(keys[0].on_delete.as_deref(), Some("restrict"));
    }

    #[test]
    fn multiple_keys_split_at_top_level() {
        let mut warnings = Vec::new();
        let keys = foreign_keys("comments", "('post_id','id','posts'),('user_id','id','users')", &mut warnings);
        let targets: Vec<&str> = keys.iter().map(|k| k.on.as_str()).collect();
        assert_eq!(targets, vec!["posts", "users"]);
    }

    #[test]
    fn short_or_unknown_keys_become_warnings() {
        let mut warnings = Vec::new();
        let keys = foreign_keys(
            "t",
            "('a','id'),('b','id','x',onRename:cascade),('c','id','y')",
            &mut warnings,
        );
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].on, "y");
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().all(|w| w.section == Section::ForeignKeys));
    }

    #[test]
    fn relations_drop_unknown_methods() {
        let mut warnings = Vec::new();
        let parsed = relations("users", "hasMany('posts'),likes('x'),belongsToMany('roles')", &mut warnings);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].kind, RelationKind::HasMany);
        assert_eq!(parsed[0].params, vec![Param::Str("posts".into())]);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].entry, "likes('x')");
    }

    #[test]
    fn excludes_are_lowercased() {
        assert_eq!(excludes("Model,API,"), vec!["model", "api"]);
    }

    #[test]
    fn invalid_record_count_defaults_to_zero_with_warning() {
        let mut warnings = Vec::new();
        assert_eq!(record_count("t", "25", &mut warnings), 25);
        assert_eq!(record_count("t", "-3", &mut warnings), 0);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn timestamps_only_disabled_by_false() {
        assert!(has_timestamps(None));
        assert!(has_timestamps(Some("no")));
        assert!(!has_timestamps(Some("FALSE")));
    }
}
