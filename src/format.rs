//! Decoding of the compact line-based article statistics format
//!
//! Each line starts with a one-character command, followed by space-separated
//! fields. Names come last and are wrapped in a pair of marker characters
//! (usually quotes), which allows them to contain spaces:
//!
//! ```text
//! n <id> "<name>"                                      country
//! c <id> "<name>"                                      category
//! t <category id> <id> "<name>"                        tag
//! k <category id> <tag id> <id> "<name>"               keyword
//! a <country id> <category ids> <tag ids> <keyword ids> <count>
//! ```
//!
//! Id lists are joined with `;`, and an empty list is written as `-1`.

use crate::{ArticleCount, EntityId};
use rayon::prelude::*;
use thiserror::Error;

/// Marker for an empty id list
const EMPTY_LIST: &str = "-1";

/// Separator within id lists
const LIST_SEPARATOR: char = ';';

/// Reasons why a serialized dataset cannot be loaded
///
/// All of these are fatal: a dataset with a hole in it would produce
/// misleading statistics, so loading stops at the first error.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum FormatError {
    #[error("line {line}: unknown command {command:?}")]
    UnknownCommand { line: usize, command: Box<str> },

    #[error("line {line}: command {command:?} expects at least {expected} fields, found {found}")]
    MissingFields {
        line: usize,
        command: char,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: {field:?} is not a valid {what}")]
    MalformedInteger {
        line: usize,
        what: &'static str,
        field: Box<str>,
    },

    #[error("line {line}: {what} {id} was not defined by an earlier line")]
    UnknownReference {
        line: usize,
        what: &'static str,
        id: EntityId,
    },

    #[error("line {line}: article sets must contain at least one article")]
    ZeroCount { line: usize },

    #[error("line {line}: name {name:?} is not wrapped in a pair of marker characters")]
    UnwrappedName { line: usize, name: Box<str> },

    #[error("line {line}: name {name:?} contains a tab character")]
    TabInName { line: usize, name: Box<str> },
}

/// Decoded line of the serialized dataset, before id resolution
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Record {
    /// `n`: register a country
    Country { id: EntityId, name: Box<str> },

    /// `c`: register a category
    Category { id: EntityId, name: Box<str> },

    /// `t`: register a tag within a category
    Tag {
        category_id: EntityId,
        id: EntityId,
        name: Box<str>,
    },

    /// `k`: register a keyword within a category and tag
    Keyword {
        category_id: EntityId,
        tag_id: EntityId,
        id: EntityId,
        name: Box<str>,
    },

    /// `a`: append a set of articles with identical metadata
    ArticleSet {
        country_id: EntityId,
        category_ids: Box<[EntityId]>,
        tag_ids: Box<[EntityId]>,
        keyword_ids: Box<[EntityId]>,
        count: ArticleCount,
    },
}
//
impl Record {
    /// Decode one line of the serialized dataset
    ///
    /// `line` is the 1-based line number, used for error reporting. Empty
    /// lines carry no record and decode to `None`.
    pub fn parse(line: usize, text: &str) -> Result<Option<Self>, FormatError> {
        if text.is_empty() {
            return Ok(None);
        }
        let mut fields = Fields::new(line, text);
        let record = match fields.command {
            'n' => Self::Country {
                id: fields.id("country id")?,
                name: fields.name()?,
            },
            'c' => Self::Category {
                id: fields.id("category id")?,
                name: fields.name()?,
            },
            't' => Self::Tag {
                category_id: fields.id("category id")?,
                id: fields.id("tag id")?,
                name: fields.name()?,
            },
            'k' => Self::Keyword {
                category_id: fields.id("category id")?,
                tag_id: fields.id("tag id")?,
                id: fields.id("keyword id")?,
                name: fields.name()?,
            },
            'a' => Self::ArticleSet {
                country_id: fields.id("country id")?,
                category_ids: fields.id_list("category id")?,
                tag_ids: fields.id_list("tag id")?,
                keyword_ids: fields.id_list("keyword id")?,
                count: fields.count()?,
            },
            _ => {
                return Err(FormatError::UnknownCommand {
                    line,
                    command: fields.command_token.into(),
                })
            }
        };
        Ok(Some(record))
    }
}

/// Decode every line of a serialized dataset
///
/// Lines are decoded in parallel, but records are returned in file order
/// along with their 1-based line number, and if several lines are malformed
/// the error from the earliest one is reported.
pub fn parse_records<S: AsRef<str> + Sync>(
    lines: &[S],
) -> Result<Vec<(usize, Record)>, FormatError> {
    let decoded = (lines.par_iter().enumerate())
        .map(|(index, text)| {
            let line = index + 1;
            Record::parse(line, text.as_ref()).map(|record| record.map(|record| (line, record)))
        })
        .collect::<Vec<_>>();
    decoded.into_iter().filter_map(Result::transpose).collect()
}

/// Cursor over the space-separated fields of a line
struct Fields<'text> {
    /// Line number, for error reporting
    line: usize,

    /// First field of the line, which should be a single command character
    command_token: &'text str,

    /// Command character, or NUL if the first field is not a single character
    command: char,

    /// Fields that follow the command
    rest: Vec<&'text str>,

    /// Number of fields consumed so far
    consumed: usize,
}
//
impl<'text> Fields<'text> {
    /// Split a line into fields
    fn new(line: usize, text: &'text str) -> Self {
        let mut pieces = text.split(' ');
        let command_token = pieces.next().unwrap_or_default();
        let mut command_chars = command_token.chars();
        let command = match (command_chars.next(), command_chars.next()) {
            (Some(c), None) => c,
            _ => '\0',
        };
        Self {
            line,
            command_token,
            command,
            rest: pieces.collect(),
            consumed: 0,
        }
    }

    /// Take the next field
    fn next(&mut self) -> Result<&'text str, FormatError> {
        let field = self.rest.get(self.consumed).copied();
        self.consumed += 1;
        field.ok_or_else(|| self.missing_fields())
    }

    /// Error for a line that ends too early
    fn missing_fields(&self) -> FormatError {
        FormatError::MissingFields {
            line: self.line,
            command: self.command,
            expected: self.consumed,
            found: self.rest.len(),
        }
    }

    /// Take the next field as an entity id
    fn id(&mut self, what: &'static str) -> Result<EntityId, FormatError> {
        let field = self.next()?;
        self.parse_id(what, field)
    }

    /// Take the next field as a possibly empty list of entity ids
    fn id_list(&mut self, what: &'static str) -> Result<Box<[EntityId]>, FormatError> {
        let field = self.next()?;
        field
            .split(LIST_SEPARATOR)
            .filter(|item| *item != EMPTY_LIST)
            .map(|item| self.parse_id(what, item))
            .collect()
    }

    /// Take the next field as an article count
    fn count(&mut self) -> Result<ArticleCount, FormatError> {
        let field = self.next()?;
        let count = field
            .parse::<u64>()
            .map_err(|_| self.malformed("article count", field))?;
        ArticleCount::new(count).ok_or(FormatError::ZeroCount { line: self.line })
    }

    /// Take all remaining fields as a wrapped name
    fn name(&mut self) -> Result<Box<str>, FormatError> {
        if self.consumed >= self.rest.len() {
            self.consumed += 1;
            return Err(self.missing_fields());
        }
        let wrapped = self.rest[self.consumed..].join(" ");
        self.consumed = self.rest.len();

        let mut char_indices = wrapped.char_indices();
        let (Some(_), Some((last_start, _))) = (char_indices.next(), char_indices.next_back())
        else {
            return Err(FormatError::UnwrappedName {
                line: self.line,
                name: wrapped.into(),
            });
        };
        let first_len = wrapped.chars().next().map_or(0, char::len_utf8);
        let name = &wrapped[first_len..last_start];
        if name.contains('\t') {
            return Err(FormatError::TabInName {
                line: self.line,
                name: name.into(),
            });
        }
        Ok(name.into())
    }

    /// Parse an entity id
    fn parse_id(&self, what: &'static str, field: &str) -> Result<EntityId, FormatError> {
        field.parse().map_err(|_| self.malformed(what, field))
    }

    /// Error for a field that should have been an integer
    fn malformed(&self, what: &'static str, field: &str) -> FormatError {
        FormatError::MalformedInteger {
            line: self.line,
            what,
            field: field.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Option<Record>, FormatError> {
        Record::parse(7, text)
    }

    #[test]
    fn entity_records() {
        assert_eq!(
            parse("n 3 \"United States\""),
            Ok(Some(Record::Country {
                id: 3,
                name: "United States".into()
            }))
        );
        assert_eq!(
            parse("c 0 \"people and society\""),
            Ok(Some(Record::Category {
                id: 0,
                name: "people and society".into()
            }))
        );
        assert_eq!(
            parse("t 0 12 \"ai\""),
            Ok(Some(Record::Tag {
                category_id: 0,
                id: 12,
                name: "ai".into()
            }))
        );
        assert_eq!(
            parse("k 0 12 40 \"large language model\""),
            Ok(Some(Record::Keyword {
                category_id: 0,
                tag_id: 12,
                id: 40,
                name: "large language model".into()
            }))
        );
    }

    #[test]
    fn article_set_drops_empty_list_marker() {
        assert_eq!(
            parse("a 3 0;2 -1 40 17"),
            Ok(Some(Record::ArticleSet {
                country_id: 3,
                category_ids: [0, 2].into(),
                tag_ids: [].into(),
                keyword_ids: [40].into(),
                count: ArticleCount::new(17).unwrap(),
            }))
        );
    }

    #[test]
    fn names_keep_inner_spaces_and_markers() {
        assert_eq!(
            parse("n 1 'Côte d'Ivoire'"),
            Ok(Some(Record::Country {
                id: 1,
                name: "Côte d'Ivoire".into()
            }))
        );
        assert_eq!(
            parse("c 1 \"\""),
            Ok(Some(Record::Category {
                id: 1,
                name: "".into()
            }))
        );
    }

    #[test]
    fn empty_lines_are_skipped() {
        assert_eq!(parse(""), Ok(None));
    }

    #[test]
    fn unknown_command() {
        assert_eq!(
            parse("x 1 \"bad\""),
            Err(FormatError::UnknownCommand {
                line: 7,
                command: "x".into()
            })
        );
        assert!(matches!(
            parse("nn 1 \"bad\""),
            Err(FormatError::UnknownCommand { .. })
        ));
    }

    #[test]
    fn malformed_fields() {
        assert_eq!(
            parse("n one \"x\""),
            Err(FormatError::MalformedInteger {
                line: 7,
                what: "country id",
                field: "one".into()
            })
        );
        assert!(matches!(
            parse("a 1 0;x -1 -1 2"),
            Err(FormatError::MalformedInteger {
                what: "category id",
                ..
            })
        ));
        assert!(matches!(
            parse("a 1 0 -1 -1 -4"),
            Err(FormatError::MalformedInteger {
                what: "article count",
                ..
            })
        ));
        assert_eq!(parse("a 1 0 -1 -1 0"), Err(FormatError::ZeroCount { line: 7 }));
    }

    #[test]
    fn short_lines() {
        assert!(matches!(
            parse("t 0 12"),
            Err(FormatError::MissingFields { command: 't', .. })
        ));
        assert!(matches!(
            parse("a 1 0 -1 -1"),
            Err(FormatError::MissingFields { command: 'a', .. })
        ));
        assert!(matches!(
            parse("n 1 x"),
            Err(FormatError::UnwrappedName { .. })
        ));
    }

    #[test]
    fn tabs_are_rejected_in_names() {
        assert!(matches!(
            parse("n 1 \"a\tb\""),
            Err(FormatError::TabInName { .. })
        ));
    }

    #[test]
    fn earliest_error_wins() {
        let lines = ["c 0 \"tech\"", "", "x", "n z \"US\"", "n 1 \"UK\""];
        assert_eq!(
            parse_records(&lines),
            Err(FormatError::UnknownCommand {
                line: 3,
                command: "x".into()
            })
        );

        let records = parse_records(&lines[..2]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].0, 1);
    }
}
