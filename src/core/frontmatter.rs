//! Header block (frontmatter) parsing for component documents.
//!
//! Component documents start with an optional block delimited by `---`
//! lines holding `key: value` pairs, followed by free-form body text.
//! The parser here is deliberately tolerant: anything it cannot make sense
//! of degrades to "no header", never to an error.

use std::sync::LazyLock;

use regex::Regex;

/// Delimiter opening and closing a header block.
pub const DELIMITER: &str = "---";

/// A line that starts a new key.
static KEY_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([\w-]+):(.*)$").expect("valid key-line regex"));

/// A header value plus the whole-document line its key appears on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    pub value: String,
    /// 1-indexed line in the full document
    pub line: usize,
}

/// Ordered key/value mapping parsed from a header block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    entries: Vec<(String, HeaderField)>,
}

impl Frontmatter {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.field(key).map(|f| f.value.as_str())
    }

    #[must_use]
    pub fn field(&self, key: &str) -> Option<&HeaderField> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, f)| f)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.field(key).is_some()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderField)> {
        self.entries.iter().map(|(k, f)| (k.as_str(), f))
    }

    /// Later values replace earlier ones; the first position and line are kept.
    fn insert(&mut self, key: String, value: String, line: usize) {
        if let Some((_, existing)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            existing.value = value;
        } else {
            self.entries.push((key, HeaderField { value, line }));
        }
    }
}

/// A document split into header and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    pub header: Frontmatter,
    pub body: String,
    /// 1-indexed line of the closing delimiter, 0 when there is no header
    pub header_end_line: usize,
    /// Document lines preceding the first body line
    pub body_offset: usize,
}

impl ParsedDocument {
    fn body_only(content: &str) -> Self {
        Self {
            header: Frontmatter::default(),
            body: content.to_string(),
            header_end_line: 0,
            body_offset: 0,
        }
    }

    /// Translate a 1-indexed body line into a whole-document line.
    #[must_use]
    pub const fn document_line(&self, body_line: usize) -> usize {
        self.body_offset + body_line
    }
}

/// Split `content` into header mapping, body text and header end line.
///
/// Never fails. Content that does not open with the delimiter, or whose
/// header is never closed, is returned whole as body with an empty header.
#[must_use]
pub fn parse(content: &str) -> ParsedDocument {
    let Some(rest) = content.strip_prefix(DELIMITER) else {
        return ParsedDocument::body_only(content);
    };
    let Some(close) = rest.find(DELIMITER) else {
        return ParsedDocument::body_only(content);
    };

    let raw_header = &rest[..close];
    let header_end = DELIMITER.len() + close + DELIMITER.len();
    let header_end_line = content[..header_end].matches('\n').count() + 1;

    let trimmed = raw_header.trim_start();
    let skipped = &raw_header[..raw_header.len() - trimmed.len()];
    let first_line = 1 + skipped.matches('\n').count();

    // The body is trimmed, so blank lines after the delimiter shift its start.
    let after = &content[header_end..];
    let leading = &after[..after.len() - after.trim_start().len()];

    ParsedDocument {
        header: parse_header(trimmed.trim_end(), first_line),
        body: after.trim().to_string(),
        header_end_line,
        body_offset: header_end_line - 1 + leading.matches('\n').count(),
    }
}

enum State {
    SeekKey,
    InFold {
        key: String,
        line: usize,
        parts: Vec<String>,
    },
}

fn parse_header(text: &str, first_line: usize) -> Frontmatter {
    let mut header = Frontmatter::default();
    let mut state = State::SeekKey;

    for (idx, line) in text.lines().enumerate() {
        let line_no = first_line + idx;
        state = match state {
            State::InFold {
                key,
                line: key_line,
                mut parts,
            } => {
                if is_continuation(line) {
                    parts.push(line.trim().to_string());
                    State::InFold {
                        key,
                        line: key_line,
                        parts,
                    }
                } else if line.trim().is_empty() {
                    State::InFold {
                        key,
                        line: key_line,
                        parts,
                    }
                } else {
                    close_fold(&mut header, key, key_line, parts);
                    seek_key(&mut header, line, line_no)
                }
            }
            State::SeekKey => seek_key(&mut header, line, line_no),
        };
    }

    if let State::InFold { key, line, parts } = state {
        close_fold(&mut header, key, line, parts);
    }

    header
}

fn seek_key(header: &mut Frontmatter, line: &str, line_no: usize) -> State {
    let Some(caps) = KEY_LINE.captures(line) else {
        return State::SeekKey;
    };
    let key = caps[1].to_string();
    let value = unquote(caps[2].trim());

    if value.is_empty() || value == "|" || value == ">" {
        State::InFold {
            key,
            line: line_no,
            parts: Vec::new(),
        }
    } else {
        header.insert(key, value.to_string(), line_no);
        State::SeekKey
    }
}

// A key with no inline value and no continuation lines is left out.
fn close_fold(header: &mut Frontmatter, key: String, line: usize, parts: Vec<String>) {
    if !parts.is_empty() {
        header.insert(key, parts.join(" "), line);
    }
}

fn is_continuation(line: &str) -> bool {
    line.starts_with("  ") || line.starts_with('\t')
}

/// Strip one layer of matching single or double quotes.
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Whether an `allowed-tools` value grants shell access without a filter.
#[must_use]
pub fn is_unrestricted_shell(allowed_tools: &str) -> bool {
    allowed_tools.contains("Bash") && !allowed_tools.contains("Bash(")
}

/// Parse a boolean-like header value.
#[must_use]
pub fn parse_bool_like(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Typed view over the header fields the checks look at.
///
/// Built once per document so every check reads the same representation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentHeader {
    pub name: Option<HeaderField>,
    pub description: Option<HeaderField>,
    pub model: Option<HeaderField>,
    pub color: Option<HeaderField>,
    pub allowed_tools: Option<HeaderField>,
    pub user_invocable: Option<bool>,
}

impl ComponentHeader {
    #[must_use]
    pub fn from_frontmatter(header: &Frontmatter) -> Self {
        let field = |key: &str| header.field(key).cloned();
        Self {
            name: field("name"),
            description: field("description"),
            model: field("model"),
            color: field("color"),
            allowed_tools: field("allowed-tools"),
            user_invocable: header.get("user-invocable").and_then(parse_bool_like),
        }
    }

    /// The `allowed-tools` field when it grants unfiltered shell access.
    #[must_use]
    pub fn unrestricted_shell(&self) -> Option<&HeaderField> {
        self.allowed_tools
            .as_ref()
            .filter(|f| is_unrestricted_shell(&f.value))
    }

    #[must_use]
    pub fn description_text(&self) -> &str {
        self.description.as_ref().map_or("", |f| f.value.as_str())
    }
}
