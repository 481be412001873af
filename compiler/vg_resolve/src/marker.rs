//! Placeholder markers embedded in generated source.
//!
//! A marker is `<@vg#` + decimal id + `#@>`. Neither delimiter can appear in
//! any identifier, literal or comment a backend emits for valid input, and
//! the id is digits only, so a left-to-right scan finds every marker without
//! ambiguity.

use std::fmt;

pub const PREFIX: &str = "<@vg#";
pub const SUFFIX: &str = "#@>";

/// Pass-unique placeholder identifier.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Debug)]
pub struct PlaceholderId(u32);

impl PlaceholderId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        PlaceholderId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The marker text standing in for this placeholder.
    pub fn marker(self) -> String {
        format!("{PREFIX}{}{SUFFIX}", self.0)
    }
}

impl fmt::Display for PlaceholderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One piece of scanned text.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Segment<'a> {
    Text(&'a str),
    Marker { id: PlaceholderId, raw: &'a str },
}

/// Split `text` into plain runs and markers, left to right.
///
/// A prefix not followed by digits and the suffix is plain text; scanning
/// resumes right after it, so a well-formed marker following a broken one is
/// still found.
pub fn segments(text: &str) -> Segments<'_> {
    Segments { text, pos: 0 }
}

pub struct Segments<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Segment<'a>> {
        let rest = &self.text[self.pos..];
        if rest.is_empty() {
            return None;
        }

        let mut search = 0;
        while let Some(offset) = rest[search..].find(PREFIX) {
            let start = search + offset;
            if start > 0 {
                // Emit the plain run first; the marker is picked up next call.
                if parse_at(&rest[start..]).is_some() {
                    self.pos += start;
                    return Some(Segment::Text(&rest[..start]));
                }
            } else if let Some((id, len)) = parse_at(rest) {
                self.pos += len;
                return Some(Segment::Marker { id, raw: &rest[..len] });
            }
            search = start + PREFIX.len();
        }

        self.pos = self.text.len();
        Some(Segment::Text(rest))
    }
}

/// Parse a marker at the very start of `text`, returning its id and length.
fn parse_at(text: &str) -> Option<(PlaceholderId, usize)> {
    let body = text.strip_prefix(PREFIX)?;
    let digits = body.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 || !body[digits..].starts_with(SUFFIX) {
        return None;
    }
    let id = body[..digits].parse().ok()?;
    Some((PlaceholderId(id), PREFIX.len() + digits + SUFFIX.len()))
}

/// Every well-formed marker id in `text`, in order of appearance.
pub fn marker_ids(text: &str) -> impl Iterator<Item = PlaceholderId> + '_ {
    segments(text).filter_map(|segment| match segment {
        Segment::Marker { id, .. } => Some(id),
        Segment::Text(_) => None,
    })
}

pub fn contains_marker(text: &str) -> bool {
    marker_ids(text).next().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_marker_format() {
        assert_eq!(PlaceholderId::new(42).marker(), "<@vg#42#@>");
    }

    #[test]
    fn test_segments() {
        let text = "a <@vg#1#@>b<@vg#22#@>";
        let found: Vec<Segment<'_>> = segments(text).collect();
        assert_eq!(
            found,
            vec![
                Segment::Text("a "),
                Segment::Marker { id: PlaceholderId::new(1), raw: "<@vg#1#@>" },
                Segment::Text("b"),
                Segment::Marker { id: PlaceholderId::new(22), raw: "<@vg#22#@>" },
            ]
        );
    }

    #[test]
    fn test_malformed_markers_are_text() {
        let text = "<@vg#x#@> <@vg#<@vg#3#@> <@vg#4";
        let ids: Vec<PlaceholderId> = marker_ids(text).collect();
        assert_eq!(ids, vec![PlaceholderId::new(3)]);

        let rebuilt: String = segments(text)
            .map(|segment| match segment {
                Segment::Text(t) => t,
                Segment::Marker { raw, .. } => raw,
            })
            .collect();
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_no_markers() {
        assert!(!contains_marker("plain text # with @ signs"));
        assert_eq!(segments("").count(), 0);
    }
}
