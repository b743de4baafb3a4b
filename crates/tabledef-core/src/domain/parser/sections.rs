//! Splitting whitespace-free definition text into its marker sections.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Section {
    Exclude,
    Name,
    HasTimestamps,
    Records,
    ForeignKeys,
    Relations,
    Columns,
    Model,
}

impl Section {
    /// Search order of the markers.
    pub const ALL: [Section; 8] = [
        Self::Exclude,
        Self::Name,
        Self::HasTimestamps,
        Self::Records,
        Self::ForeignKeys,
        Self::Relations,
        Self::Columns,
        Self::Model,
    ];

    pub const fn marker(self) -> &'static str {
        match self {
            Self::Exclude => "EXCLUDE:",
            Self::Name => "NAME:",
            Self::HasTimestamps => "HAS_TIMESTAMPS:",
            Self::Records => "RECORDS:",
            Self::ForeignKeys => "FOREIGN_KEYS:",
            Self::Relations => "RELATIONS:",
            Self::Columns => "COLUMNS:",
            Self::Model => "MODEL:",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker().trim_end_matches(':'))
    }
}

/// Raw section bodies of one definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections {
    bodies: HashMap<Section, String>,
    preamble: String,
}

impl Sections {
    /// Split `text` (already stripped of comments and whitespace).
    ///
    /// Markers are tried in [`Section::ALL`] order; the first one present
    /// splits the text at its first occurrence and both halves are scanned
    /// again for the markers not yet consumed. The text between a marker and
    /// the next one found is that marker's body.
    pub fn split(text: &str) -> Self {
        let mut consumed = [false; Section::ALL.len()];
        let mut bodies = HashMap::new();
        let preamble = scan(text, &mut consumed, &mut bodies);
        Self { bodies, preamble }
    }

    pub fn get(&self, section: Section) -> Option<&str> {
        self.bodies.get(&section).map(String::as_str)
    }

    /// Body of a section, `None` when absent or empty.
    pub fn non_empty(&self, section: Section) -> Option<&str> {
        self.get(section).filter(|body| !body.is_empty())
    }

    pub fn contains(&self, section: Section) -> bool {
        self.bodies.contains_key(&section)
    }

    /// Text found before the first marker.
    pub fn preamble(&self) -> &str {
        &self.preamble
    }
}

fn scan(
    text: &str,
    consumed: &mut [bool; Section::ALL.len()],
    bodies: &mut HashMap<Section, String>,
) -> String {
    for section in Section::ALL {
        if consumed[section.index()] {
            continue;
        }
        let Some(pos) = text.find(section.marker()) else {
            continue;
        };
        consumed[section.index()] = true;
        let leading = scan(&text[..pos], consumed, bodies);
        let body = scan(&text[pos + section.marker().len()..], consumed, bodies);
        bodies.insert(section, body);
        return leading;
    }
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bodies_end_at_next_marker() {
        let sections = Sections::split("NAME:usersRECORDS:10COLUMNS:id,id,false,null,id;");
        assert_eq!(sections.get(Section::Name), Some("users"));
        assert_eq!(sections.get(Section::Records), Some("10"));
        assert_eq!(sections.get(Section::Columns), Some("id,id,false,null,id;"));
        assert_eq!(sections.get(Section::Model), None);
    }

    #[test]
    fn markers_may_appear_in_any_order() {
        let sections = Sections::split("COLUMNS:a;MODEL:UserNAME:users");
        assert_eq!(sections.get(Section::Columns), Some("a;"));
        assert_eq!(sections.get(Section::Model), Some("User"));
        assert_eq!(sections.get(Section::Name), Some("users"));
    }

    #[test]
    fn leading_text_is_kept_apart() {
        let sections = Sections::split("junkNAME:x");
        assert_eq!(sections.preamble(), "junk");
        assert_eq!(sections.get(Section::Name), Some("x"));
    }

    #[test]
    fn empty_body_is_present_but_not_non_empty() {
        let sections = Sections::split("NAME:COLUMNS:a");
        assert!(sections.contains(Section::Name));
        assert_eq!(sections.non_empty(Section::Name), None);
    }

    #[test]
    fn only_first_occurrence_of_a_marker_splits() {
        let sections = Sections::split("NAME:aNAME:b");
        assert_eq!(sections.get(Section::Name), Some("aNAME:b"));
    }
}
