//! Parsing of articles received over POST and IHAVE

use crate::validation::Rejection;

use super::types::{Article, Headers};

/// Split a received article at the first empty line
///
/// Returns `(header_lines, body_lines)`. An article without an empty line is
/// all headers.
pub fn split_article<L: AsRef<[u8]>>(lines: &[L]) -> (&[L], &[L]) {
    match lines.iter().position(|line| line.as_ref().is_empty()) {
        Some(pos) => (&lines[..pos], &lines[pos + 1..]),
        None => (lines, &[]),
    }
}

/// Parse header lines (`Name: value`) into a [`Headers`] map
///
/// Continuation lines (starting with a space or tab) are unfolded into the
/// previous value with a single space. Names must be printable ASCII; values
/// are kept byte for byte.
///
/// # Examples
///
/// ```
/// use nntp_mock::article::parse_headers;
///
/// let headers = parse_headers(&["Subject: a long", "\tsubject", "Message-ID: <a@b>"]).unwrap();
/// assert_eq!(headers.get_str("subject"), Some("a long subject"));
/// ```
pub fn parse_headers<L: AsRef<[u8]>>(lines: &[L]) -> Result<Headers, Rejection> {
    let mut fields: Vec<(String, Vec<u8>)> = Vec::with_capacity(lines.len());

    for raw in lines {
        let line = raw.as_ref();

        if line.starts_with(b" ") || line.starts_with(b"\t") {
            let Some((_, value)) = fields.last_mut() else {
                return Err("Continuation line before the first header");
            };
            let continued = line.trim_ascii();
            if !continued.is_empty() {
                if !value.is_empty() {
                    value.push(b' ');
                }
                value.extend_from_slice(continued);
            }
            continue;
        }

        let Some(colon) = line.iter().position(|&b| b == b':') else {
            return Err("Header line without a colon");
        };
        let (name, value) = (&line[..colon], &line[colon + 1..]);
        if name.is_empty() || !name.iter().all(u8::is_ascii_graphic) {
            return Err("Invalid header name");
        }
        let name: String = name.iter().map(|&b| char::from(b)).collect();
        fields.push((name, value.trim_ascii().to_vec()));
    }

    Ok(fields.into_iter().collect())
}

/// Parse a complete received article (headers, empty line, body)
pub fn parse_article<L: AsRef<[u8]>>(lines: &[L]) -> Result<Article, Rejection> {
    let (header_lines, body_lines) = split_article(lines);
    let headers = parse_headers(header_lines)?;
    Ok(Article::from_body_lines(headers, body_lines))
}
