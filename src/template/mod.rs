//! # Template Placeholders
//!
//! Discovery and substitution of `{{identifier}}` tokens across every
//! text-bearing field of a [`Document`].
//!
//! ```
//! use certcanvas::document::{Document, Element, Text};
//! use certcanvas::template::{self, SubstitutionMap};
//!
//! let mut doc = Document::new(200, 100);
//! doc.push(Element::new("t1", Text::new("Hi {{name}}")).at(10.0, 10.0).sized(180.0, 30.0));
//!
//! assert_eq!(template::extract_placeholders(&doc), vec!["name"]);
//!
//! let map = SubstitutionMap::new().with("name", "Ada");
//! let filled = template::substitute(&doc, &map);
//! assert_eq!(filled.elements[0].kind.text_fields(), vec!["Hi Ada"]);
//! ```
//!
//! Both operations are pure: the input document is never modified.

mod scan;
mod substitute;

pub use scan::{Segment, Segments, is_token_char, scan};
pub use substitute::{SubstitutionMap, Value, substitute_text};

use std::collections::BTreeSet;

use crate::document::Document;

/// All token names a document refers to, sorted and de-duplicated.
///
/// The union of literal `{{token}}` occurrences in every text-bearing field
/// and every element's declared `placeholder` attribute. The declared
/// attribute counts even when no literal token appears anywhere.
pub fn extract_placeholders(doc: &Document) -> Vec<String> {
    let mut names = BTreeSet::new();
    for element in &doc.elements {
        for field in element.kind.text_fields() {
            names.extend(scan(field));
        }
        if let Some(name) = element.placeholder.as_deref().and_then(declared_name) {
            names.insert(name);
        }
    }
    names.into_iter().collect()
}

/// Normalize a declared placeholder: `" {{ name }} "` → `"name"`.
fn declared_name(raw: &str) -> Option<String> {
    let name = raw
        .trim()
        .trim_start_matches('{')
        .trim_end_matches('}')
        .trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Return a copy of `doc` with bound tokens replaced in every text-bearing field.
///
/// Ids, element kinds, geometry and styling are carried over untouched.
/// Tokens missing from `map` stay literal.
pub fn substitute(doc: &Document, map: &SubstitutionMap) -> Document {
    let mut out = doc.clone();
    if map.is_empty() {
        return out;
    }
    for element in &mut out.elements {
        for field in element.kind.text_fields_mut() {
            if field.contains("{{") {
                *field = substitute_text(field, map);
            }
        }
    }
    out
}
