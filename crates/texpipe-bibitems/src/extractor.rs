//! `\bibitem` extraction
//!
//! An entry starts at `\bibitem`, may carry an optional `[label]`, then a
//! `{key}`, and its text runs until the next `\bibitem` or
//! `\end{thebibliography}`. The text is reduced to plain text; no attempt is
//! made to split it into authors, title and venue.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// One bibliography entry. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bibitem {
    pub key: String,
    pub text: String,
}

static BIBITEM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\bibitem\b").unwrap());

const END_OF_BIBLIOGRAPHY: &str = "\\end{thebibliography}";

/// Extract every `\bibitem` entry from TeX or BBL source, in document order.
///
/// Entries without a key or without any text are skipped.
pub fn extract_bibitems(content: &str) -> Vec<Bibitem> {
    let content = strip_comments(content);
    let matches: Vec<_> = BIBITEM_RE.find_iter(&content).collect();

    let mut bibitems = Vec::with_capacity(matches.len());
    for (i, m) in matches.iter().enumerate() {
        let end = matches
            .get(i + 1)
            .map_or(content.len(), |next| next.start());
        let mut body = &content[m.end()..end];
        if let Some(pos) = body.find(END_OF_BIBLIOGRAPHY) {
            body = &body[..pos];
        }

        match parse_entry(body) {
            Some(bibitem) => bibitems.push(bibitem),
            None => log::debug!("Skipping malformed bibitem: {:?}", truncate(body, 60)),
        }
    }
    bibitems
}

/// Parse `[label]{key} text` following a `\bibitem`.
fn parse_entry(body: &str) -> Option<Bibitem> {
    let mut rest = body.trim_start();
    if rest.starts_with('[') {
        let close = closing_bracket(rest)?;
        rest = rest[close + 1..].trim_start();
    }

    let (key, text) = split_balanced_braces(rest.strip_prefix('{')?)?;
    let key = key.trim();
    let text = to_plain_text(text);
    if key.is_empty() || text.is_empty() {
        return None;
    }

    Some(Bibitem {
        key: key.to_string(),
        text,
    })
}

/// Index of the `]` closing the `[` at the start of `text`, ignoring any
/// brackets nested inside braces.
fn closing_bracket(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, ch) in text.char_indices().skip(1) {
        match ch {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ']' if depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// Split text that starts just after an opening `{` into the braced content
/// and whatever follows the matching `}`.
fn split_balanced_braces(text: &str) -> Option<(&str, &str)> {
    let mut depth = 1;
    for (i, ch) in text.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some((&text[..i], &text[i + 1..]));
                }
            }
            _ => {}
        }
    }
    None
}

/// Drop `%` comments, keeping escaped `\%`.
fn strip_comments(content: &str) -> String {
    content
        .lines()
        .map(strip_line_comment)
        .collect::<Vec<_>>()
        .join("\n")
}

fn strip_line_comment(line: &str) -> &str {
    let mut escaped = false;
    for (i, ch) in line.char_indices() {
        match ch {
            '\\' => escaped = !escaped,
            '%' if !escaped => return &line[..i],
            _ => escaped = false,
        }
    }
    line
}

static SPACING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\(?:newblock|par|quad|qquad|hfill|linebreak|allowbreak|break)\b").unwrap()
});
static FIELD_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\(?:bibinfo|bibfield|href)\s*\{[^{}]*\}").unwrap());
static LOGO_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\(La)?TeX\b").unwrap());
// `\"{o}`, `\'e`, `\'{\i}`
static SYMBOL_ACCENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\\(['"`^~=.])\s*(?:\{\s*(\\[ij]|[a-zA-Z])\s*\}|(\\[ij]|[a-zA-Z]))"#).unwrap()
});
// `\H{o}`, `\c c`; a letter accent needs braces or a space before its letter
static LETTER_ACCENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\([Hcvukbdr])(?:\s*\{\s*(\\[ij]|[a-zA-Z])\s*\}|\s+([a-zA-Z]))").unwrap()
});
static LETTER_MACRO_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\(ss|aa|AA|ae|AE|oe|OE|O|o|L|l|i|j)(?:\{\}|\s+|\b)").unwrap()
});
// Accents left without a letter, e.g. `\'{}`
static ACCENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\\['"`^~=.]"#).unwrap());
static COMMAND_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\[a-zA-Z]+\*?").unwrap());

/// Reduce TeX markup to plain text.
///
/// Formatting commands are unwrapped (`\emph{x}` → `x`), field markers like
/// `\bibinfo{title}` are dropped, accents and letters such as `\"{o}` or
/// `\ss` become Unicode, braces and math shifts are removed, `~` and control
/// spaces become spaces, and whitespace is collapsed.
pub fn to_plain_text(tex: &str) -> String {
    let text = SPACING_RE.replace_all(tex, " ");
    let text = FIELD_NAME_RE.replace_all(&text, "");
    let text = LOGO_RE.replace_all(&text, "${1}TeX");
    let text = expand_accents(&text);
    let text = LETTER_MACRO_RE.replace_all(&text, |caps: &Captures| letter_macro(&caps[1]));
    let text = ACCENT_RE.replace_all(&text, "");
    let text = COMMAND_RE.replace_all(&text, "");

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some(c @ ('&' | '%' | '$' | '#' | '_' | '{' | '}')) => out.push(c),
                // `\\`, `\,`, `\ ` and friends
                _ => out.push(' '),
            },
            '{' | '}' | '$' => {}
            '~' => out.push(' '),
            c => out.push(c),
        }
    }

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn expand_accents(text: &str) -> String {
    let text = SYMBOL_ACCENT_RE.replace_all(text, |caps: &Captures| accented(caps));
    LETTER_ACCENT_RE
        .replace_all(&text, |caps: &Captures| accented(caps))
        .into_owned()
}

fn accented(caps: &Captures) -> String {
    let accent = caps[1].chars().next();
    // `\i` and `\j` are the dotless forms used under accents
    let base = caps
        .get(2)
        .or_else(|| caps.get(3))
        .and_then(|m| m.as_str().trim_start_matches('\\').chars().next());
    match (accent, base) {
        (Some(accent), Some(base)) => apply_accent(accent, base),
        _ => caps[0].to_string(),
    }
}

/// Base letters and their precomposed forms, per accent command.
const PRECOMPOSED: &[(char, &str, &str)] = &[
    ('\'', "aceilnorsuyzACEILNORSUYZ", "áćéíĺńóŕśúýźÁĆÉÍĹŃÓŔŚÚÝŹ"),
    ('`', "aeiouAEIOU", "àèìòùÀÈÌÒÙ"),
    ('^', "aeiouAEIOU", "âêîôûÂÊÎÔÛ"),
    ('"', "aeiouyAEIOUY", "äëïöüÿÄËÏÖÜŸ"),
    ('~', "anoANO", "ãñõÃÑÕ"),
    ('=', "aeiouAEIOU", "āēīōūĀĒĪŌŪ"),
    ('.', "cegzCEGIZ", "ċėġżĊĖĠİŻ"),
    ('H', "ouOU", "őűŐŰ"),
    ('c', "cgklnrstCGKLNRST", "çģķļņŗşţÇĢĶĻŅŖŞŢ"),
    ('v', "cdenrstzCDENRSTZ", "čďěňřšťžČĎĚŇŘŠŤŽ"),
    ('u', "agAG", "ăğĂĞ"),
    ('k', "aeiuAEIU", "ąęįųĄĘĮŲ"),
    ('r', "auAU", "åůÅŮ"),
];

fn combining_mark(accent: char) -> Option<char> {
    Some(match accent {
        '\'' => '\u{301}',
        '`' => '\u{300}',
        '^' => '\u{302}',
        '"' => '\u{308}',
        '~' => '\u{303}',
        '=' => '\u{304}',
        '.' => '\u{307}',
        'H' => '\u{30b}',
        'c' => '\u{327}',
        'v' => '\u{30c}',
        'u' => '\u{306}',
        'k' => '\u{328}',
        'b' => '\u{331}',
        'd' => '\u{323}',
        'r' => '\u{30a}',
        _ => return None,
    })
}

/// `base` with `accent`, precomposed where a common form exists, else
/// followed by the combining mark.
fn apply_accent(accent: char, base: char) -> String {
    let precomposed = PRECOMPOSED
        .iter()
        .find(|(a, _, _)| *a == accent)
        .and_then(|(_, bases, composed)| {
            let index = bases.chars().position(|c| c == base)?;
            composed.chars().nth(index)
        });
    match (precomposed, combining_mark(accent)) {
        (Some(c), _) => c.to_string(),
        (None, Some(mark)) => format!("{base}{mark}"),
        (None, None) => base.to_string(),
    }
}

fn letter_macro(name: &str) -> &'static str {
    match name {
        "ss" => "ß",
        "aa" => "å",
        "AA" => "Å",
        "ae" => "æ",
        "AE" => "Æ",
        "oe" => "œ",
        "OE" => "Œ",
        "o" => "ø",
        "O" => "Ø",
        "l" => "ł",
        "L" => "Ł",
        "i" => "ı",
        "j" => "ȷ",
        _ => "",
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}
