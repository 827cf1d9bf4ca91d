//! Per-extension content minification.
//!
//! Dispatch is on the exact, case-sensitive extension of the file name. Any
//! extension outside [`ContentKind`]'s five formats maps to
//! [`ContentKind::Unsupported`], which always fails: a rule that asks for
//! compression gets a warning for each file it cannot compress, and that
//! file is not copied.

use crate::utils::path::extension;
use minify_js::{Session, TopLevelMode};
use quick_xml::events::Event;
use quick_xml::{Reader, Writer};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

/// The textual formats that can be minified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// `.js`
    Js,
    /// `.xml`
    Xml,
    /// `.json`
    Json,
    /// `.css`
    Css,
    /// `.sql`
    Sql,
    /// Anything else. Always fails to minify.
    Unsupported,
}

impl ContentKind {
    /// Classify a file by its extension (case-sensitive).
    ///
    /// ```
    /// use rescopy::ContentKind;
    ///
    /// assert_eq!(ContentKind::from_file_name("app.js"), ContentKind::Js);
    /// assert_eq!(ContentKind::from_file_name("APP.JS"), ContentKind::Unsupported);
    /// ```
    #[must_use]
    pub fn from_file_name(file_name: &str) -> Self {
        match extension(file_name) {
            ".js" => Self::Js,
            ".xml" => Self::Xml,
            ".json" => Self::Json,
            ".css" => Self::Css,
            ".sql" => Self::Sql,
            _ => Self::Unsupported,
        }
    }

    /// Short lowercase name of the format.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Js => "js",
            Self::Xml => "xml",
            Self::Json => "json",
            Self::Css => "css",
            Self::Sql => "sql",
            Self::Unsupported => "unsupported",
        }
    }
}

/// Why a file could not be minified.
///
/// Every variant renders the same advice; [`MinifyError::reason`] gives the
/// underlying detail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MinifyError {
    /// The extension has no minifier.
    #[error("Failed to compress {file_name}. Check for syntax errors on the file.")]
    Unsupported {
        /// Source file name
        file_name: String,
    },
    /// The minifier rejected the input.
    #[error("Failed to compress {file_name}. Check for syntax errors on the file.")]
    Invalid {
        /// Source file name
        file_name: String,
        /// Detected format
        kind: ContentKind,
        /// Parser message
        reason: String,
    },
    /// The minifier produced nothing.
    #[error("Failed to compress {file_name}. Check for syntax errors on the file.")]
    Empty {
        /// Source file name
        file_name: String,
    },
    /// The content is not UTF-8 text.
    #[error("Failed to compress {file_name}. Check for syntax errors on the file.")]
    Encoding {
        /// Source file name
        file_name: String,
    },
}

impl MinifyError {
    /// Underlying detail of the failure.
    #[must_use]
    pub fn reason(&self) -> String {
        match self {
            Self::Unsupported { file_name } => {
                format!("no minifier for {:?}", extension(file_name))
            }
            Self::Invalid { kind, reason, .. } => format!("{} error: {reason}", kind.as_str()),
            Self::Empty { .. } => "minified output is empty".to_owned(),
            Self::Encoding { .. } => "content is not valid UTF-8".to_owned(),
        }
    }
}

/// Minify `content` according to the extension of `file_name`.
///
/// Never panics on malformed input and never returns empty output: both are
/// reported as [`MinifyError`].
///
/// ```
/// use rescopy::minify;
///
/// assert_eq!(minify("a.json", "{ \"b\": [1, 2] }").unwrap(), r#"{"b":[1,2]}"#);
/// assert!(minify("a.json", "{ broken").is_err());
/// assert!(minify("a.txt", "text").is_err());
/// ```
pub fn minify(file_name: &str, content: &str) -> Result<String, MinifyError> {
    let kind = ContentKind::from_file_name(file_name);
    let output = match kind {
        ContentKind::Js => minify_js_source(content),
        ContentKind::Xml => minify_xml(content),
        ContentKind::Json => minify_json(content),
        ContentKind::Css => Ok(minify_css(content)),
        ContentKind::Sql => Ok(minify_sql(content)),
        ContentKind::Unsupported => {
            return Err(MinifyError::Unsupported {
                file_name: file_name.to_owned(),
            });
        }
    };

    match output {
        Ok(data) if data.trim().is_empty() => Err(MinifyError::Empty {
            file_name: file_name.to_owned(),
        }),
        Ok(data) => Ok(data),
        Err(reason) => Err(MinifyError::Invalid {
            file_name: file_name.to_owned(),
            kind,
            reason,
        }),
    }
}

/// Minify raw bytes, decoding them as UTF-8 (a leading BOM is dropped).
pub(crate) fn minify_bytes(file_name: &str, content: &[u8]) -> Result<String, MinifyError> {
    let text = std::str::from_utf8(content).map_err(|_| MinifyError::Encoding {
        file_name: file_name.to_owned(),
    })?;
    minify(file_name, text.strip_prefix('\u{feff}').unwrap_or(text))
}

fn minify_js_source(content: &str) -> Result<String, String> {
    let mut out = Vec::new();
    // parse-js panics on some valid sloppy-mode input.
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let session = Session::new();
        minify_js::minify(&session, TopLevelMode::Global, content.as_bytes(), &mut out)
            .map_err(|e| format!("{e:?}"))
    }));
    match outcome {
        Ok(result) => result?,
        Err(payload) => {
            return Err(format!(
                "parser panicked: {}",
                panic_message(payload.as_ref())
            ));
        }
    }
    String::from_utf8(out).map_err(|e| e.to_string())
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

fn minify_xml(content: &str) -> Result<String, String> {
    let mut reader = Reader::from_str(content);
    let mut writer = Writer::new(Vec::new());
    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Eof => break,
            Event::Comment(_) => {}
            Event::Text(text) if text.iter().all(u8::is_ascii_whitespace) => {}
            event => writer.write_event(event).map_err(|e| e.to_string())?,
        }
    }
    String::from_utf8(writer.into_inner()).map_err(|e| e.to_string())
}

fn minify_json(content: &str) -> Result<String, String> {
    let value: serde_json::Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
    serde_json::to_string(&value).map_err(|e| e.to_string())
}

/// Lexical rules for [`fold`].
struct Dialect {
    /// Characters that open (and close) a literal
    quotes: &'static [char],
    /// Backslash escapes the next character inside a literal
    backslash_escapes: bool,
    /// `--` starts a comment running to the end of the line
    line_comments: bool,
    /// No space is kept after these
    tight_after: &'static [char],
    /// No space is kept before these
    tight_before: &'static [char],
}

const CSS: Dialect = Dialect {
    quotes: &['"', '\''],
    backslash_escapes: true,
    line_comments: false,
    tight_after: &['{', '}', ';'],
    tight_before: &[],
};

// A doubled quote (`'it''s'`) reads as two adjacent literals, which copies
// through unchanged.
const SQL: Dialect = Dialect {
    quotes: &['\'', '"', '`'],
    backslash_escapes: false,
    line_comments: true,
    tight_after: &[],
    tight_before: &['(', ')'],
};

fn minify_css(content: &str) -> String {
    fold(content, &CSS)
}

fn minify_sql(content: &str) -> String {
    fold(content, &SQL)
}

/// Drop comments and collapse whitespace outside string literals.
///
/// Literals are copied verbatim, including an unterminated one at the end
/// of the input. Leading and trailing whitespace is dropped.
fn fold(content: &str, dialect: &Dialect) -> String {
    let mut out = String::with_capacity(content.len());
    let mut pending_space = false;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '/' && chars.peek() == Some(&'*') {
            chars.next();
            let mut prev = '\0';
            for next in chars.by_ref() {
                if prev == '*' && next == '/' {
                    break;
                }
                prev = next;
            }
            continue;
        }
        if dialect.line_comments && c == '-' && chars.peek() == Some(&'-') {
            while chars.next_if(|&next| next != '\n').is_some() {}
            continue;
        }
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }

        if pending_space
            && !out.is_empty()
            && !out.ends_with(dialect.tight_after)
            && !dialect.tight_before.contains(&c)
        {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);

        if dialect.quotes.contains(&c) {
            while let Some(next) = chars.next() {
                out.push(next);
                if next == c {
                    break;
                }
                if dialect.backslash_escapes && next == '\\' {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
            }
        }
    }
    out
}
