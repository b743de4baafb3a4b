//! `COLUMNS:` segment parsing.
//!
//! Inheritance (`[*Other,type*]`) needs to read other definitions, so the
//! splice itself is performed by the application-layer parser; this module
//! only recognizes the segment shapes.

use crate::domain::{
    entities::Column,
    error::DomainError,
    parser::text::{parse_method, split_top_level},
    value_objects::{MethodCall, Param, TableType},
};

pub const PRIMARY_TAG: &str = "[*PRIMARY*]";

const REGULAR_FIELDS: usize = 5;
const PRIMARY_FIELDS: usize = 3;

/// A `[*Other,type*]` splice request at the head of a segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inheritance {
    pub table: String,
    pub table_type: TableType,
}

/// One `;`-separated entry of a `COLUMNS:` body, after inheritance has been
/// split off.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnEntry {
    Empty,
    Regular(Column),
    Primary(Column),
}

/// Split a leading inheritance tag from `segment`.
///
/// Returns the splice request (if any) and the remaining text. A tag that
/// names no type is reported as `Err(reason)`; an unknown type is a hard
/// error since the table cannot be read at all.
pub fn split_inheritance(
    segment: &str,
) -> Result<(Option<Inheritance>, &str), InheritanceError> {
    if !segment.contains("[*") || segment.contains(PRIMARY_TAG) {
        return Ok((None, segment));
    }
    let Some((head, rest)) = segment.split_once("*]") else {
        return Err(InheritanceError::Malformed("unterminated inheritance tag".into()));
    };
    let head = head.split_once("[*").map_or(head, |(_, tag)| tag);
    let mut parts = head.split(',');
    let table = parts.next().unwrap_or_default();
    let Some(type_name) = parts.next() else {
        return Err(InheritanceError::Malformed(format!(
            "inheritance of '{table}' names no table type"
        )));
    };
    let table_type = type_name
        .parse::<TableType>()
        .map_err(InheritanceError::Domain)?;
    Ok((
        Some(Inheritance {
            table: table.to_string(),
            table_type,
        }),
        rest,
    ))
}

#[derive(Debug, Clone, PartialEq)]
pub enum InheritanceError {
    /// Recoverable: the segment is skipped with a warning.
    Malformed(String),
    Domain(DomainError),
}

/// Parse a single segment (inheritance already removed).
///
/// `Err(reason)` means the segment is malformed and should be skipped.
pub fn parse_entry(segment: &str) -> Result<ColumnEntry, String> {
    if segment.is_empty() {
        return Ok(ColumnEntry::Empty);
    }
    match segment.split_once(PRIMARY_TAG) {
        Some((_, rest)) => parse_primary(rest).map(ColumnEntry::Primary),
        None => parse_regular(segment).map(ColumnEntry::Regular),
    }
}

/// `name, jsonName, fillable, faker, type, prop...`
fn parse_regular(segment: &str) -> Result<Column, String> {
    let fields = split_top_level(segment, ',');
    if fields.len() < REGULAR_FIELDS {
        return Err(format!(
            "expected at least {REGULAR_FIELDS} fields, found {}",
            fields.len()
        ));
    }
    let name = column_name(fields[0]);
    let faker = parse_method(fields[3]);
    Ok(Column {
        json_name: json_name(fields[1]),
        fillable: fields[2].eq_ignore_ascii_case("true"),
        faker: (faker.method != "null").then_some(faker),
        column_type: column_type(&name, fields[4]),
        properties: properties(&fields[REGULAR_FIELDS..]),
        name,
    })
}

/// `name, jsonName, type, prop...` (primary columns are never fillable and
/// have no faker).
fn parse_primary(segment: &str) -> Result<Column, String> {
    let fields = split_top_level(segment, ',');
    if fields.len() < PRIMARY_FIELDS {
        return Err(format!(
            "expected at least {PRIMARY_FIELDS} fields after {PRIMARY_TAG}, found {}",
            fields.len()
        ));
    }
    let name = column_name(fields[0]);
    Ok(Column {
        json_name: json_name(fields[1]),
        fillable: false,
        faker: None,
        column_type: column_type(&name, fields[2]),
        properties: properties(&fields[PRIMARY_FIELDS..]),
        name,
    })
}

fn column_name(field: &str) -> String {
    if field.is_empty() { "id".to_string() } else { field.to_string() }
}

fn json_name(field: &str) -> Option<String> {
    (field != "null").then(|| field.to_string())
}

fn column_type(name: &str, field: &str) -> MethodCall {
    let mut call = parse_method(field);
    call.params.insert(0, Param::Str(name.to_string()));
    call
}

fn properties(fields: &[&str]) -> Vec<MethodCall> {
    fields
        .iter()
        .filter(|f| !f.is_empty())
        .map(|f| parse_method(f))
        .collect()
}
