//! Readers for the two line-oriented text formats.
//!
//! Profile file, repeated until an empty line or end of input:
//!
//! ```text
//! username
//! name
//! location
//! website
//! bio line...
//! ENDBIO
//! followed username...
//! END
//! ```
//!
//! Query file:
//!
//! ```text
//! SEARCH
//! start-username
//! operation...
//! FILTER
//! predicate value...
//! PRESENT
//! sort-by <username|name|popularity>
//! format <short|long>
//! ```
//!
//! Every line is trimmed before it is interpreted. An empty line inside a
//! block is data; running out of input before a terminator is an error.

use std::io::{self, BufRead};

use log::{debug, trace, warn};

use crate::error::{ParseError, ParseErrorKind, Result};
use crate::graph::{ProfileTable, UserProfile};
use crate::query::{FilterSpec, Format, Operation, PresentSpec, QuerySpec, SearchSpec, SortKey};

const END_BIO: &str = "ENDBIO";
const END_FOLLOWING: &str = "END";
const FILTER_MARKER: &str = "FILTER";
const PRESENT_MARKER: &str = "PRESENT";

/// Sequential cursor over a line source that remembers where it is.
struct LineCursor<R> {
    reader: R,
    line_no: usize,
    buf: String,
}

impl<R: BufRead> LineCursor<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            buf: String::new(),
        }
    }

    /// Next trimmed line, or None at end of input.
    fn next_line(&mut self) -> Result<Option<String>> {
        self.buf.clear();
        let read = match self.reader.read_line(&mut self.buf) {
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                return Err(ParseError::new(self.line_no + 1, ParseErrorKind::InvalidUtf8).into());
            }
            Err(e) => return Err(e.into()),
        };
        if read == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        Ok(Some(self.buf.trim().to_string()))
    }

    /// Next trimmed line; end of input is a parse error naming `what`.
    fn require(&mut self, what: &'static str) -> Result<String> {
        match self.next_line()? {
            Some(line) => Ok(line),
            None => Err(self.error(ParseErrorKind::UnexpectedEof(what))),
        }
    }

    /// Lines up to (not including) `terminator`.
    fn block(&mut self, terminator: &'static str) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        loop {
            let line = self.require(terminator)?;
            if line == terminator {
                return Ok(lines);
            }
            lines.push(line);
        }
    }

    fn error(&self, kind: ParseErrorKind) -> crate::Error {
        ParseError::new(self.line_no.max(1), kind).into()
    }
}

/// Split a `key value` line into exactly two tokens.
fn key_value<R: BufRead>(cursor: &LineCursor<R>, line: &str) -> Result<(String, String)> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.as_slice() {
        [key, value] => Ok((key.to_string(), value.to_string())),
        _ => Err(cursor.error(ParseErrorKind::TokenCount {
            expected: 2,
            found: tokens.len(),
        })),
    }
}

/// Read every profile record from `reader`.
pub fn parse_profiles<R: BufRead>(reader: R) -> Result<ProfileTable> {
    let mut cursor = LineCursor::new(reader);
    let mut table = ProfileTable::new();

    loop {
        let username = match cursor.next_line()? {
            Some(line) if !line.is_empty() => line,
            _ => break,
        };

        let name = cursor.require("name")?;
        let location = cursor.require("location")?;
        let website = cursor.require("website")?;
        let bio = cursor.block(END_BIO)?.join("\n");
        let following = cursor.block(END_FOLLOWING)?;

        trace!(
            "loaded profile '{}' following {} users",
            username,
            following.len()
        );

        let profile = UserProfile {
            username,
            name,
            location,
            website,
            bio,
            following,
        };
        if let Some(old) = table.insert(profile) {
            warn!(
                "duplicate profile for '{}' near line {}, keeping the later record",
                old.username, cursor.line_no
            );
        }
    }

    debug!(
        "parsed {} profiles, {} follow edges",
        table.len(),
        table.follow_edge_count()
    );
    Ok(table)
}

/// One `key value` line of the presentation block.
enum Setting {
    SortBy(SortKey),
    Format(Format),
}

fn present_setting<R: BufRead>(cursor: &mut LineCursor<R>) -> Result<Setting> {
    let line = cursor.require("presentation setting")?;
    let (key, value) = key_value(cursor, &line)?;
    match key.as_str() {
        "sort-by" => value.parse().map(Setting::SortBy).map_err(|value| {
            cursor.error(ParseErrorKind::InvalidValue {
                key: "sort-by",
                value,
            })
        }),
        "format" => value.parse().map(Setting::Format).map_err(|value| {
            cursor.error(ParseErrorKind::InvalidValue {
                key: "format",
                value,
            })
        }),
        _ => Err(cursor.error(ParseErrorKind::UnknownPresentKey(key.clone()))),
    }
}

/// Read a query specification from `reader`.
pub fn parse_query<R: BufRead>(reader: R) -> Result<QuerySpec> {
    let mut cursor = LineCursor::new(reader);

    cursor.require("query header")?;
    let username = cursor.require("start username")?;
    if username.is_empty() {
        return Err(cursor.error(ParseErrorKind::EmptyUsername));
    }

    let operations = cursor
        .block(FILTER_MARKER)?
        .iter()
        .map(|line| Operation::from(line.as_str()))
        .collect();

    let mut filter = FilterSpec::new();
    loop {
        let line = cursor.require(PRESENT_MARKER)?;
        if line == PRESENT_MARKER {
            break;
        }
        let (key, value) = key_value(&cursor, &line)?;
        let predicate = key
            .parse()
            .map_err(|name| cursor.error(ParseErrorKind::UnknownPredicate(name)))?;
        if let Some(previous) = filter.insert(predicate, value) {
            debug!("filter '{}' given again, replacing '{}'", predicate, previous);
        }
    }

    let first = present_setting(&mut cursor)?;
    let second = present_setting(&mut cursor)?;
    let (sort_by, format) = match (first, second) {
        (Setting::SortBy(sort_by), Setting::Format(format))
        | (Setting::Format(format), Setting::SortBy(sort_by)) => (sort_by, format),
        (Setting::SortBy(_), Setting::SortBy(_)) => {
            return Err(cursor.error(ParseErrorKind::DuplicatePresentKey("sort-by".into())));
        }
        (Setting::Format(_), Setting::Format(_)) => {
            return Err(cursor.error(ParseErrorKind::DuplicatePresentKey("format".into())));
        }
    };

    Ok(QuerySpec {
        search: SearchSpec {
            username,
            operations,
        },
        filter,
        present: PresentSpec { sort_by, format },
    })
}

/// [`parse_profiles`] over an in-memory string.
pub fn parse_profiles_str(text: &str) -> Result<ProfileTable> {
    parse_profiles(text.as_bytes())
}

/// [`parse_query`] over an in-memory string.
pub fn parse_query_str(text: &str) -> Result<QuerySpec> {
    parse_query(text.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::query::Predicate;
    use rstest::rstest;

    const PROFILES: &str = "\
tomCruise
Tom Cruise
Los Angeles, CA
http://www.tomcruise.com
Official TomCruise.com crew tweets. We love you guys!

Visit us at Facebook!
ENDBIO
katieH
END
katieH
Katie Holmes

www.tomkat.com
ENDBIO
END
";

    const QUERY: &str = "\
SEARCH
tomCruise
following
followers
FILTER
name-includes e
location-includes ca
PRESENT
sort-by popularity
format long
";

    fn parse_error(result: Result<impl std::fmt::Debug>) -> ParseError {
        match result {
            Err(Error::Parse(e)) => e,
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    // --- Profile parser tests ---

    #[test]
    fn test_parse_profiles_fields() {
        let t = parse_profiles_str(PROFILES).unwrap();
        assert_eq!(t.len(), 2);

        let tom = t.get("tomCruise").unwrap();
        assert_eq!(tom.name, "Tom Cruise");
        assert_eq!(tom.location, "Los Angeles, CA");
        assert_eq!(tom.website, "http://www.tomcruise.com");
        assert_eq!(
            tom.bio,
            "Official TomCruise.com crew tweets. We love you guys!\n\nVisit us at Facebook!"
        );
        assert_eq!(tom.following, vec!["katieH"]);

        let katie = t.get("katieH").unwrap();
        assert_eq!(katie.location, "");
        assert_eq!(katie.bio, "");
        assert!(katie.following.is_empty());
    }

    #[test]
    fn test_parse_profiles_stops_at_empty_line() {
        let text = format!("{}\nignored\n", PROFILES);
        let t = parse_profiles_str(&text).unwrap();
        assert_eq!(t.len(), 2);
        assert!(!t.contains("ignored"));
    }

    #[test]
    fn test_parse_profiles_empty_input() {
        assert!(parse_profiles_str("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_profiles_trims_lines() {
        let t = parse_profiles_str("  a  \r\nAnn\t\n\n\nhi  \nENDBIO\n b \nEND\n").unwrap();
        let a = t.get("a").unwrap();
        assert_eq!(a.name, "Ann");
        assert_eq!(a.bio, "hi");
        assert_eq!(a.following, vec!["b"]);
    }

    #[rstest]
    #[case("a\nAnn\n", "location")]
    #[case("a\nAnn\nHere\nweb\nbio line\n", "ENDBIO")]
    #[case("a\nAnn\nHere\nweb\nENDBIO\nb\n", "END")]
    fn test_parse_profiles_truncated(#[case] text: &str, #[case] expected: &'static str) {
        let e = parse_error(parse_profiles_str(text));
        assert_eq!(e.kind, ParseErrorKind::UnexpectedEof(expected));
    }

    #[test]
    fn test_parse_profiles_invalid_utf8_reports_line() {
        let bytes: &[u8] = b"a\nAnn\n\xff\xfe\nweb\nENDBIO\nEND\n";
        let e = parse_error(parse_profiles(bytes));
        assert_eq!(e.kind, ParseErrorKind::InvalidUtf8);
        assert_eq!(e.line, 3);
    }

    #[test]
    fn test_parse_profiles_duplicate_keeps_later() {
        let text = "a\nFirst\n\n\nENDBIO\nEND\na\nSecond\n\n\nENDBIO\nEND\n";
        let t = parse_profiles_str(text).unwrap();
        assert_eq!(t.len(), 1);
        assert_eq!(t.get("a").unwrap().name, "Second");
    }

    // --- Query parser tests ---

    #[test]
    fn test_parse_query_full() {
        let q = parse_query_str(QUERY).unwrap();
        assert_eq!(q.search.username, "tomCruise");
        assert_eq!(
            q.search.operations,
            vec![Operation::Following, Operation::Followers]
        );
        assert_eq!(q.filter.len(), 2);
        assert_eq!(q.filter[&Predicate::NameIncludes], "e");
        assert_eq!(q.filter[&Predicate::LocationIncludes], "ca");
        assert_eq!(q.present.sort_by, SortKey::Popularity);
        assert_eq!(q.present.format, Format::Long);
    }

    #[test]
    fn test_parse_query_minimal() {
        let q = parse_query_str("SEARCH\na\nFILTER\nPRESENT\nformat short\nsort-by name\n").unwrap();
        assert!(q.search.operations.is_empty());
        assert!(q.filter.is_empty());
        assert_eq!(q.present.sort_by, SortKey::Name);
        assert_eq!(q.present.format, Format::Short);
    }

    #[test]
    fn test_parse_query_keeps_unknown_operations() {
        let q = parse_query_str("SEARCH\na\nfollowing\nsideways\nFILTER\nPRESENT\nsort-by name\nformat short\n")
            .unwrap();
        assert_eq!(
            q.search.operations,
            vec![Operation::Following, Operation::Unknown("sideways".into())]
        );
    }

    #[test]
    fn test_parse_query_repeated_predicate_replaces() {
        let q = parse_query_str(
            "SEARCH\na\nFILTER\nfollowing b\nfollowing c\nPRESENT\nsort-by name\nformat short\n",
        )
        .unwrap();
        assert_eq!(q.filter.len(), 1);
        assert_eq!(q.filter[&Predicate::Following], "c");
    }

    #[rstest]
    #[case("SEARCH\na\nfollowing\n", ParseErrorKind::UnexpectedEof("FILTER"), 3)]
    #[case("SEARCH\na\nFILTER\n", ParseErrorKind::UnexpectedEof("PRESENT"), 3)]
    #[case("SEARCH\n", ParseErrorKind::UnexpectedEof("start username"), 1)]
    #[case("SEARCH\n\nFILTER\n", ParseErrorKind::EmptyUsername, 2)]
    #[case(
        "SEARCH\na\nFILTER\nname-includes\nPRESENT\n",
        ParseErrorKind::TokenCount { expected: 2, found: 1 },
        4
    )]
    #[case(
        "SEARCH\na\nFILTER\nlocation-includes New York\nPRESENT\n",
        ParseErrorKind::TokenCount { expected: 2, found: 3 },
        4
    )]
    #[case(
        "SEARCH\na\nFILTER\nbio-includes x\nPRESENT\n",
        ParseErrorKind::UnknownPredicate("bio-includes".into()),
        4
    )]
    #[case(
        "SEARCH\na\nFILTER\nPRESENT\nsort-by name\n",
        ParseErrorKind::UnexpectedEof("presentation setting"),
        5
    )]
    #[case(
        "SEARCH\na\nFILTER\nPRESENT\nsort-by name\nsort-by username\n",
        ParseErrorKind::DuplicatePresentKey("sort-by".into()),
        6
    )]
    #[case(
        "SEARCH\na\nFILTER\nPRESENT\nformat long\nformat short\n",
        ParseErrorKind::DuplicatePresentKey("format".into()),
        6
    )]
    #[case(
        "SEARCH\na\nFILTER\nPRESENT\norder name\nformat short\n",
        ParseErrorKind::UnknownPresentKey("order".into()),
        5
    )]
    #[case(
        "SEARCH\na\nFILTER\nPRESENT\nsort-by name\nformat medium\n",
        ParseErrorKind::InvalidValue { key: "format", value: "medium".into() },
        6
    )]
    fn test_parse_query_errors(
        #[case] text: &str,
        #[case] kind: ParseErrorKind,
        #[case] line: usize,
    ) {
        let e = parse_error(parse_query_str(text));
        assert_eq!(e.kind, kind);
        assert_eq!(e.line, line);
    }
}
