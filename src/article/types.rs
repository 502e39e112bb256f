//! Article type definitions

use std::fmt;

/// Ordered header map with case-insensitive names and repeatable fields
///
/// Field order and the spelling of the first occurrence of each name are kept,
/// so an article comes back out of HEAD the way it was posted. Names are
/// ASCII; values are raw bytes and are never re-encoded.
///
/// # Examples
///
/// ```
/// use nntp_mock::article::Headers;
///
/// let mut headers = Headers::new();
/// headers.append("Message-ID", "<a@b>");
/// headers.append("Subject", b"caf\xe9".as_slice());
/// assert_eq!(headers.get_str("message-id"), Some("<a@b>"));
/// assert_eq!(headers.get("subject"), Some(&b"caf\xe9"[..]));
/// assert_eq!(headers.get_str("subject"), None);
/// assert_eq!(headers.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    fields: Vec<HeaderField>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct HeaderField {
    name: String,
    values: Vec<Vec<u8>>,
}

impl Headers {
    /// Create an empty header map
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|field| field.name.eq_ignore_ascii_case(name))
    }

    /// First value of a field
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.position(name)
            .and_then(|i| self.fields[i].values.first())
            .map(Vec::as_slice)
    }

    /// First value of a field, if it is valid UTF-8
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|value| std::str::from_utf8(value).ok())
    }

    /// All values of a field, empty if absent
    pub fn get_all(&self, name: &str) -> &[Vec<u8>] {
        match self.position(name) {
            Some(i) => &self.fields[i].values,
            None => &[],
        }
    }

    /// Whether a field is present
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Add a value, keeping any existing values of the same field
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<Vec<u8>>) {
        let name = name.into();
        match self.position(&name) {
            Some(i) => self.fields[i].values.push(value.into()),
            None => self.fields.push(HeaderField {
                name,
                values: vec![value.into()],
            }),
        }
    }

    /// Replace every value of a field with a single value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Vec<u8>>) {
        let name = name.into();
        match self.position(&name) {
            Some(i) => self.fields[i].values = vec![value.into()],
            None => self.fields.push(HeaderField {
                name,
                values: vec![value.into()],
            }),
        }
    }

    /// Fields in insertion order as `(name, values)`
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Vec<u8>])> {
        self.fields
            .iter()
            .map(|field| (field.name.as_str(), field.values.as_slice()))
    }

    /// Number of distinct field names
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the map has no fields
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Wire lines `Name: value`, one per value
    pub fn to_lines(&self) -> Vec<Vec<u8>> {
        let mut lines = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            for value in &field.values {
                let mut line = Vec::with_capacity(field.name.len() + 2 + value.len());
                line.extend_from_slice(field.name.as_bytes());
                line.extend_from_slice(b": ");
                line.extend_from_slice(value);
                lines.push(line);
            }
        }
        lines
    }
}

impl<K: Into<String>, V: Into<Vec<u8>>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.append(name, value);
        }
        headers
    }
}

/// A news article as the server stores and serves it
///
/// The body is kept exactly as received, minus dot-stuffing, with every line
/// terminated by CRLF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    /// Article headers
    pub headers: Headers,
    /// Body bytes (CRLF line endings)
    pub body: Vec<u8>,
    /// Body size in bytes
    pub bytes: usize,
    /// Number of body lines
    pub lines: usize,
    /// Article number assigned when the article was stored (0 if unknown)
    pub number: i64,
}

impl Article {
    /// Build an article from headers and a raw body, counting bytes and lines
    pub fn new(headers: Headers, body: Vec<u8>) -> Self {
        let lines = count_lines(&body);
        Self {
            headers,
            bytes: body.len(),
            lines,
            body,
            number: 0,
        }
    }

    /// Build an article from un-stuffed body lines (without line terminators)
    pub fn from_body_lines<L: AsRef<[u8]>>(headers: Headers, lines: &[L]) -> Self {
        let mut body = Vec::with_capacity(lines.iter().map(|l| l.as_ref().len() + 2).sum());
        for line in lines {
            body.extend_from_slice(line.as_ref());
            body.extend_from_slice(b"\r\n");
        }
        Self::new(headers, body)
    }

    /// The Message-ID header, if present and valid UTF-8
    pub fn message_id(&self) -> Option<&str> {
        self.headers.get_str("Message-ID").map(str::trim)
    }

    /// Body lines without their terminators
    pub fn body_lines(&self) -> impl Iterator<Item = &[u8]> {
        let body = self
            .body
            .strip_suffix(b"\n")
            .unwrap_or(self.body.as_slice());
        let mut lines = body.split(|&b| b == b'\n');
        let empty = self.body.is_empty();
        std::iter::from_fn(move || if empty { None } else { lines.next() })
            .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
    }
}

fn count_lines(body: &[u8]) -> usize {
    if body.is_empty() {
        return 0;
    }
    let newlines = body.iter().filter(|&&b| b == b'\n').count();
    if body.ends_with(b"\n") {
        newlines
    } else {
        newlines + 1
    }
}

/// An article paired with its number in a group's numbering space
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedArticle {
    /// Article number
    pub number: i64,
    /// The article
    pub article: Article,
}

impl NumberedArticle {
    /// Tab-separated overview line in LIST OVERVIEW.FMT order
    pub fn overview_line(&self) -> Vec<u8> {
        let headers = &self.article.headers;
        let mut line = self.number.to_string().into_bytes();
        for name in ["Subject", "From", "Date", "Message-ID", "References"] {
            line.push(b'\t');
            let value = headers.get(name).unwrap_or_default();
            line.extend(value.iter().map(|&b| sanitize_overview(b)));
        }
        line.extend_from_slice(
            format!("\t{}\t{}", self.article.bytes, self.article.lines).as_bytes(),
        );
        line
    }
}

// Tabs and line breaks would shift overview columns.
fn sanitize_overview(b: u8) -> u8 {
    if matches!(b, b'\t' | b'\r' | b'\n') {
        b' '
    } else {
        b
    }
}

/// Posting status of a newsgroup as shown in LIST ACTIVE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostingStatus {
    /// Status not known
    #[default]
    Unknown,
    /// Posting permitted (`y`)
    Permitted,
    /// Posting not permitted (`n`)
    NotPermitted,
    /// Moderated (`m`)
    Moderated,
}

impl PostingStatus {
    /// LIST ACTIVE status character; `Unknown` is advertised as `n`
    pub fn as_char(self) -> char {
        match self {
            PostingStatus::Permitted => 'y',
            PostingStatus::Moderated => 'm',
            PostingStatus::NotPermitted | PostingStatus::Unknown => 'n',
        }
    }
}

impl fmt::Display for PostingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Newsgroup metadata
///
/// `high` is always `low + count - 1`, so an empty group reports `low = 1`,
/// `high = 0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Newsgroup name
    pub name: String,
    /// One-line description for LIST NEWSGROUPS
    pub description: String,
    /// Lowest article number
    pub low: i64,
    /// Highest article number
    pub high: i64,
    /// Number of articles
    pub count: i64,
    /// Posting status
    pub posting: PostingStatus,
}

impl Group {
    /// Create an empty group that accepts posts
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            low: 1,
            high: 0,
            count: 0,
            posting: PostingStatus::Permitted,
        }
    }

    /// Set the article count and recompute `high`
    pub fn with_count(mut self, count: i64) -> Self {
        self.count = count;
        self.high = self.low + count - 1;
        self
    }
}
