//! Tokenizer for C header templates made of `#define NAME value` lines.
//!
//! Only `core` is used here since `build.rs` compiles this file as well.
//! Other directives (`#pragma`, `#include`, conditionals), plain C code and
//! comments are skipped. Function-like macros are skipped too.

use core::fmt::{self, Write};
use core::iter::Enumerate;
use core::str::{Chars, Lines};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingName,
    UnterminatedString,
    BadEscape(char),
    TrailingInput,
    UnterminatedComment,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::MissingName => f.write_str("#define without a macro name"),
            ErrorKind::UnterminatedString => f.write_str("unterminated string literal"),
            ErrorKind::BadEscape(c) => write!(f, "unsupported escape sequence `\\{}`", c),
            ErrorKind::TrailingInput => f.write_str("unexpected input after the value"),
            ErrorKind::UnterminatedComment => f.write_str("unterminated block comment"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefineError {
    /// 1-based line number
    pub line: usize,
    pub kind: ErrorKind,
}

impl fmt::Display for DefineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

/// Body of a string literal, escapes still encoded.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Literal<'a> {
    raw: &'a str,
}

impl<'a> Literal<'a> {
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    /// Decoded characters of the literal.
    pub fn chars(&self) -> Unescape<'a> {
        Unescape {
            inner: self.raw.chars(),
        }
    }
}

impl fmt::Display for Literal<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.chars().try_for_each(|c| f.write_char(c))
    }
}

impl fmt::Debug for Literal<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.raw)
    }
}

pub struct Unescape<'a> {
    inner: Chars<'a>,
}

impl Iterator for Unescape<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        match self.inner.next()? {
            // escapes were checked while tokenizing
            '\\' => match self.inner.next() {
                Some('n') => Some('\n'),
                Some('r') => Some('\r'),
                Some('t') => Some('\t'),
                Some(other) => Some(other),
                None => Some('\\'),
            },
            c => Some(c),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value<'a> {
    /// `#define NAME` with nothing after it
    Empty,
    Int(i64),
    Str(Literal<'a>),
    /// Any other expression, kept verbatim
    Token(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Define<'a> {
    /// 1-based line number
    pub line: usize,
    pub name: &'a str,
    pub value: Value<'a>,
}

/// Iterates over the object-like `#define`s of `text`.
pub fn defines(text: &str) -> Defines<'_> {
    Defines {
        lines: text.lines().enumerate(),
        in_comment: false,
        comment_start: 0,
    }
}

pub struct Defines<'a> {
    lines: Enumerate<Lines<'a>>,
    in_comment: bool,
    comment_start: usize,
}

impl<'a> Iterator for Defines<'a> {
    type Item = Result<Define<'a>, DefineError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some((index, line)) = self.lines.next() else {
                if self.in_comment {
                    self.in_comment = false;
                    return Some(Err(DefineError {
                        line: self.comment_start,
                        kind: ErrorKind::UnterminatedComment,
                    }));
                }
                return None;
            };
            let number = index + 1;

            let Some(rest) = self.skip_comments(number, line.trim()) else {
                continue;
            };

            let body = rest
                .strip_prefix('#')
                .and_then(|directive| directive.trim_start().strip_prefix("define"))
                .filter(|body| body.starts_with(char::is_whitespace));

            match body {
                Some(body) => {
                    if let Some(result) = self.parse_define(number, body.trim_start()) {
                        return Some(result);
                    }
                }
                None => self.track_comments(number, rest),
            }
        }
    }
}

impl<'a> Defines<'a> {
    /// Drops block and line comments at the start of `s`; `None` when nothing
    /// is left on the line.
    fn skip_comments(&mut self, number: usize, mut s: &'a str) -> Option<&'a str> {
        loop {
            if self.in_comment {
                let end = s.find("*/")?;
                self.in_comment = false;
                s = s[end + 2..].trim_start();
            } else if let Some(comment) = s.strip_prefix("/*") {
                self.in_comment = true;
                self.comment_start = number;
                s = comment;
            } else if s.is_empty() || s.starts_with("//") {
                return None;
            } else {
                return Some(s);
            }
        }
    }

    /// Follows block comments opened or closed anywhere on a line that is
    /// not a `#define`, skipping string and character literals.
    fn track_comments(&mut self, number: usize, s: &str) {
        let mut chars = s.chars().peekable();
        while let Some(c) = chars.next() {
            if self.in_comment {
                if c == '*' && chars.next_if_eq(&'/').is_some() {
                    self.in_comment = false;
                }
                continue;
            }

            match c {
                '/' if chars.next_if_eq(&'/').is_some() => return,
                '/' if chars.next_if_eq(&'*').is_some() => {
                    self.in_comment = true;
                    self.comment_start = number;
                }
                '"' | '\'' => {
                    while let Some(d) = chars.next() {
                        if d == '\\' {
                            chars.next();
                        } else if d == c {
                            break;
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn parse_define(&mut self, line: usize, s: &'a str) -> Option<Result<Define<'a>, DefineError>> {
        let error = |kind: ErrorKind| -> Option<Result<Define<'a>, DefineError>> {
            Some(Err(DefineError { line, kind }))
        };

        let name_len = s
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(s.len());
        let name = &s[..name_len];
        if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
            return error(ErrorKind::MissingName);
        }

        let after = &s[name_len..];
        if after.starts_with('(') {
            self.track_comments(line, after);
            return None;
        }
        let rest = after.trim_start();

        let (value, tail) = if rest.is_empty() || rest.starts_with("//") || rest.starts_with("/*") {
            (Value::Empty, rest)
        } else if let Some(body) = rest.strip_prefix('"') {
            match parse_string(body) {
                Ok((literal, tail)) => (Value::Str(literal), tail),
                Err(kind) => return error(kind),
            }
        } else {
            let end = [rest.find("//"), rest.find("/*")]
                .into_iter()
                .flatten()
                .min()
                .unwrap_or(rest.len());
            let token = rest[..end].trim_end();
            let value = parse_int(token).map_or(Value::Token(token), Value::Int);
            (value, &rest[end..])
        };

        match self.skip_comments(line, tail.trim_start()) {
            None => Some(Ok(Define { line, name, value })),
            Some(_) => error(ErrorKind::TrailingInput),
        }
    }
}

fn parse_string(body: &str) -> Result<(Literal<'_>, &str), ErrorKind> {
    let mut chars = body.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Ok((Literal { raw: &body[..i] }, &body[i + 1..])),
            '\\' => match chars.next() {
                Some((_, 'n' | 'r' | 't' | '"' | '\\')) => {}
                Some((_, other)) => return Err(ErrorKind::BadEscape(other)),
                None => return Err(ErrorKind::UnterminatedString),
            },
            _ => {}
        }
    }
    Err(ErrorKind::UnterminatedString)
}

/// Decimal or hex integer, with optional sign and C suffixes (`u`, `l`).
fn parse_int(token: &str) -> Option<i64> {
    let (negative, digits) = match token.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, token),
    };
    let digits = digits.trim_end_matches(['u', 'U', 'l', 'L']);
    let magnitude = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => i64::from_str_radix(hex, 16).ok()?,
        None if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
            digits.parse().ok()?
        }
        None => return None,
    };
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(text: &str) -> Vec<Result<Define<'_>, DefineError>> {
        defines(text).collect()
    }

    #[test]
    fn reads_the_wifi_template() {
        let text = r#"#pragma once
// Copy to secrets.h and fill in your WiFi and MQTT credentials.

#define WIFI_SSID "barkasse-hub"
#define MQTT_PORT 1883
#define MQTT_HOST "192.168.10.10"  // RPi CM5 address (or "mqtt.local" if mDNS)
"#;
        let found: Vec<_> = collect(text).into_iter().map(|d| d.unwrap()).collect();

        assert_eq!(found.len(), 3);
        assert_eq!(found[0].name, "WIFI_SSID");
        assert_eq!(found[0].line, 4);
        assert!(matches!(found[0].value, Value::Str(l) if l.raw() == "barkasse-hub"));
        assert_eq!(found[1].value, Value::Int(1883));
        assert!(matches!(found[2].value, Value::Str(l) if l.raw() == "192.168.10.10"));
    }

    #[test]
    fn skips_block_comments_and_other_directives() {
        let text = "/* === notes ===\n#define HIDDEN 1\n*/\n#include <Ethernet.h>\n#ifdef X\n  #  define SHOWN 0x10 /* hex */\n#endif\n";
        let found: Vec<_> = collect(text).into_iter().map(|d| d.unwrap()).collect();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "SHOWN");
        assert_eq!(found[0].value, Value::Int(16));
        assert_eq!(found[0].line, 6);
    }

    #[test]
    fn comments_opened_after_code_hide_defines() {
        let text = "#pragma once /* old values:\n#define MQTT_PASS \"old\"\n*/\n";
        assert!(collect(text).is_empty());

        let text = "#endif /* legacy\n#define MQTT_HOST \"10.0.0.1\"\n   end */\n";
        assert!(collect(text).is_empty());

        let text = "#define MIN(a, b) ((a) < (b)) /* helper\n#define HIDDEN 1\n*/\n";
        assert!(collect(text).is_empty());
    }

    #[test]
    fn comment_markers_inside_literals_are_ignored() {
        let text = "static const char *glob = \"/*\"; char c = '\"'; // trailing /*\n#define SHOWN 1\n#endif /* closed */\n#define ALSO 2\n";
        let names: Vec<_> = collect(text).into_iter().map(|d| d.unwrap().name).collect();

        assert_eq!(names, ["SHOWN", "ALSO"]);
    }

    #[test]
    fn keeps_other_expressions_as_tokens() {
        let found = collect("#define LED_PIN GPIO_NUM_2\n#define DEBUG\n#define MAX(a, b) ((a) > (b))\n");

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].as_ref().unwrap().value, Value::Token("GPIO_NUM_2"));
        assert_eq!(found[1].as_ref().unwrap().value, Value::Empty);
    }

    #[test]
    fn decodes_escapes() {
        let found = collect(r#"#define WIFI_PASS "a\"b\\c\td""#);
        let Ok(Define {
            value: Value::Str(literal),
            ..
        }) = found[0]
        else {
            panic!("expected a string, got {:?}", found[0]);
        };

        assert_eq!(literal.raw(), r#"a\"b\\c\td"#);
        assert_eq!(literal.chars().collect::<String>(), "a\"b\\c\td");
        assert_eq!(literal.to_string(), "a\"b\\c\td");
    }

    #[test]
    fn reports_errors_with_line_numbers() {
        let cases = [
            ("\n#define WIFI_SSID \"open", 2, ErrorKind::UnterminatedString),
            ("#define WIFI_SSID \"a\\qb\"", 1, ErrorKind::BadEscape('q')),
            ("#define \"x\"", 1, ErrorKind::MissingName),
            ("#define MQTT_HOST \"a\" \"b\"", 1, ErrorKind::TrailingInput),
            ("\n\n/* never closed\n#define A 1", 3, ErrorKind::UnterminatedComment),
        ];

        for (text, line, kind) in cases {
            let found = collect(text);
            assert_eq!(found.last(), Some(&Err(DefineError { line, kind })), "{:?}", text);
        }
    }

    #[test]
    fn negative_and_suffixed_integers() {
        assert_eq!(parse_int("-1"), Some(-1));
        assert_eq!(parse_int("8883UL"), Some(8883));
        assert_eq!(parse_int("70000"), Some(70000));
        assert_eq!(parse_int("1.5"), None);
        assert_eq!(parse_int(""), None);
    }
}
