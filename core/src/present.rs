use crate::error::Result;
use crate::graph::ProfileTable;
use crate::query::{Format, PresentSpec};
use crate::sort::sort_results;

/// Separator line framing every long-format block.
pub const BORDER: &str = "----------";

/// Code point ranges a Python `str.isprintable()` rejects beyond the C0/C1
/// controls: non-ASCII space separators, line/paragraph separators, format
/// characters, private use and noncharacters.
const NON_PRINTABLE: &[(u32, u32)] = &[
    (0x00A0, 0x00A0),
    (0x00AD, 0x00AD),
    (0x0600, 0x0605),
    (0x061C, 0x061C),
    (0x06DD, 0x06DD),
    (0x070F, 0x070F),
    (0x0890, 0x0891),
    (0x08E2, 0x08E2),
    (0x1680, 0x1680),
    (0x180E, 0x180E),
    (0x2000, 0x200F),
    (0x2028, 0x202F),
    (0x205F, 0x2064),
    (0x2066, 0x206F),
    (0x3000, 0x3000),
    (0xE000, 0xF8FF),
    (0xFDD0, 0xFDEF),
    (0xFEFF, 0xFEFF),
    (0xFFF9, 0xFFFB),
    (0xFFFE, 0xFFFF),
    (0x110BD, 0x110BD),
    (0x110CD, 0x110CD),
    (0x13430, 0x1343F),
    (0x1BCA0, 0x1BCA3),
    (0x1D173, 0x1D17A),
    (0xE0001, 0xE0001),
    (0xE0020, 0xE007F),
    (0xF0000, 0x10FFFF),
];

fn is_printable(c: char) -> bool {
    let cp = c as u32;
    if cp < 0x20 || (0x7F..=0x9F).contains(&cp) {
        return false;
    }
    if cp & 0xFFFE == 0xFFFE {
        return false;
    }
    !NON_PRINTABLE
        .iter()
        .any(|&(lo, hi)| (lo..=hi).contains(&cp))
}

/// Escape a non-printable code point with the shortest Python form.
fn push_escaped(out: &mut String, c: char) {
    let cp = c as u32;
    let escaped = if cp <= 0xFF {
        format!("\\x{:02x}", cp)
    } else if cp <= 0xFFFF {
        format!("\\u{:04x}", cp)
    } else {
        format!("\\U{:08x}", cp)
    };
    out.push_str(&escaped);
}

/// Quote one string the way a Python `repr()` would: single quotes unless
/// the text holds a single quote and no double quote.
fn quote(s: &str) -> String {
    let delim = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(s.len() + 2);
    out.push(delim);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == delim => {
                out.push('\\');
                out.push(c);
            }
            c if !is_printable(c) => push_escaped(&mut out, c),
            c => out.push(c),
        }
    }
    out.push(delim);
    out
}

/// Render usernames as a list literal: `['alice', 'bob']`, or `[]`.
pub fn list_literal<S: AsRef<str>>(items: &[S]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| quote(s.as_ref())).collect();
    format!("[{}]", quoted.join(", "))
}

/// One long-format block for `username`, ending in a newline.
pub fn format_long(table: &ProfileTable, username: &str) -> Result<String> {
    let p = table.profile(username)?;
    Ok(format!(
        "{border}\n{username}\nname: {}\nlocation: {}\nwebsite: {}\nbio:\n{}\nfollowing: {}\n",
        p.name,
        p.location,
        p.website,
        p.bio,
        list_literal(&p.following),
        border = BORDER,
    ))
}

/// Present stage: sort `results` in place, then render them.
///
/// An empty set renders as two border lines whatever the format.
pub fn present(table: &ProfileTable, results: &mut [String], spec: &PresentSpec) -> Result<String> {
    sort_results(table, results, spec.sort_by)?;

    if results.is_empty() {
        return Ok(format!("{}\n{}", BORDER, BORDER));
    }

    match spec.format {
        Format::Short => Ok(list_literal(results)),
        Format::Long => {
            let mut out = String::new();
            for user in results.iter() {
                out.push_str(&format_long(table, user)?);
            }
            out.push_str(BORDER);
            out.push('\n');
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, LookupError};
    use crate::graph::UserProfile;
    use crate::query::SortKey;
    use rstest::rstest;

    fn spec(sort_by: SortKey, format: Format) -> PresentSpec {
        PresentSpec { sort_by, format }
    }

    fn make_table() -> ProfileTable {
        let mut zed = UserProfile::new("a")
            .with_name("Zed")
            .with_location("Toronto, Ontario")
            .with_following(["b", "c"]);
        zed.website = "www.Zed.com".to_string();
        zed.bio = "I love to meet new people!\nReally.".to_string();

        [zed, UserProfile::new("b").with_name("Lee"), UserProfile::new("c")]
            .into_iter()
            .collect()
    }

    #[rstest]
    #[case(&[], "[]")]
    #[case(&["a"], "['a']")]
    #[case(&["alice", "bob"], "['alice', 'bob']")]
    #[case(&["o'neil"], "[\"o'neil\"]")]
    #[case(&["both'\""], "['both\\'\"']")]
    #[case(&["back\\slash"], "['back\\\\slash']")]
    #[case(&["a\u{85}b"], "['a\\x85b']")]
    #[case(&["a\u{a0}b"], "['a\\xa0b']")]
    #[case(&["a\u{200b}b"], "['a\\u200bb']")]
    #[case(&["bell\u{7}", "\u{10ffff}"], "['bell\\x07', '\\U0010ffff']")]
    #[case(&["caf\u{e9}", "\u{4e2d}"], "['caf\u{e9}', '\u{4e2d}']")]
    fn test_list_literal(#[case] items: &[&str], #[case] expected: &str) {
        assert_eq!(list_literal(items), expected);
    }

    #[rstest]
    #[case(Format::Long)]
    #[case(Format::Short)]
    fn test_present_empty_banner(#[case] format: Format) {
        let t = make_table();
        let out = present(&t, &mut [], &spec(SortKey::Username, format)).unwrap();
        assert_eq!(out, "----------\n----------");
    }

    #[test]
    fn test_present_short_sorted() {
        let t = make_table();
        let mut r = vec!["c".to_string(), "a".to_string(), "b".to_string()];
        let out = present(&t, &mut r, &spec(SortKey::Username, Format::Short)).unwrap();
        assert_eq!(out, "['a', 'b', 'c']");
        assert_eq!(r, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_format_long_block() {
        let t = make_table();
        assert_eq!(
            format_long(&t, "a").unwrap(),
            "----------\na\nname: Zed\nlocation: Toronto, Ontario\nwebsite: www.Zed.com\n\
             bio:\nI love to meet new people!\nReally.\nfollowing: ['b', 'c']\n"
        );
        assert_eq!(
            format_long(&t, "c").unwrap(),
            "----------\nc\nname: \nlocation: \nwebsite: \nbio:\n\nfollowing: []\n"
        );
    }

    #[test]
    fn test_present_long_with_closing_border() {
        let t = make_table();
        let mut r = vec!["c".to_string(), "b".to_string()];
        let out = present(&t, &mut r, &spec(SortKey::Name, Format::Long)).unwrap();
        assert_eq!(
            out,
            "----------\nc\nname: \nlocation: \nwebsite: \nbio:\n\nfollowing: []\n\
             ----------\nb\nname: Lee\nlocation: \nwebsite: \nbio:\n\nfollowing: []\n\
             ----------\n"
        );
    }

    #[test]
    fn test_present_long_unknown_user() {
        let t = make_table();
        let mut r = vec!["ghost".to_string()];
        let err = present(&t, &mut r, &spec(SortKey::Username, Format::Long)).unwrap_err();
        assert!(matches!(err, Error::Lookup(LookupError::UnknownUser(_))));

        let out = present(&t, &mut r, &spec(SortKey::Username, Format::Short)).unwrap();
        assert_eq!(out, "['ghost']");
    }
}
