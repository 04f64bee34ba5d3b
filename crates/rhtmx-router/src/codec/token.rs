//! Token grammar for listing state in path segments
//!
//! | Token | Form |
//! |---|---|
//! | page | `page-<digits>` |
//! | per-page | `perpage-<digits>` |
//! | scalar filter | `filterval-<name>-<percent-encoded value>` |
//! | structured filter | `filterjson-<name>-<percent-encoded JSON>` |
//! | sort | `sort-<column>-<asc\|desc>` |
//! | search | `search-<percent-encoded query>` |
//!
//! Names and columns are limited to `[A-Za-z0-9_.]`, so the first `-` after
//! the name always starts the value.
//!
//! [`detect_filter`] is the one predicate the resolver and the decoder share.
//! Change the grammar here and both follow.

use once_cell::sync::Lazy;
use regex::{Regex, RegexSet};
use std::borrow::Cow;

use crate::error::TokenError;
use crate::listing::{FilterValue, Sort, SortDirection};

const PAGE: &str = r"^page-([0-9]+)$";
const PER_PAGE: &str = r"^perpage-([0-9]+)$";
const FILTER_VAL: &str = r"^filterval-([A-Za-z0-9_.]+)-(.*)$";
const FILTER_JSON: &str = r"^filterjson-([A-Za-z0-9_.]+)-(.*)$";
const SORT: &str = r"^sort-([A-Za-z0-9_.]+)-(asc|desc)$";
const SEARCH: &str = r"^search-(.*)$";

static GRAMMAR: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([PAGE, PER_PAGE, FILTER_VAL, FILTER_JSON, SORT, SEARCH])
        .expect("token grammar is valid")
});

static PAGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(PAGE).expect("page pattern is valid"));
static PER_PAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(PER_PAGE).expect("per-page pattern is valid"));
static FILTER_VAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(FILTER_VAL).expect("filter pattern is valid"));
static FILTER_JSON_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(FILTER_JSON).expect("json filter pattern is valid"));
static SORT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(SORT).expect("sort pattern is valid"));
static SEARCH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(SEARCH).expect("search pattern is valid"));

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.]+$").expect("name pattern is valid"));

/// A decoded state token
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Page(u32),
    PerPage(u32),
    Filter(String, FilterValue),
    Sort(Sort),
    Search(String),
}

/// Recognizes a segment as an encoded state token
///
/// Grammar-level only: a recognized token may still carry a payload that
/// fails to decode (it is then dropped by the decoder, not left positional).
///
/// # Examples
///
/// ```
/// use rhtmx_router::detect_filter;
///
/// assert!(detect_filter("filterval-status-1"));
/// assert!(detect_filter("sort-title-desc"));
/// assert!(detect_filter("page-2"));
/// assert!(!detect_filter("42"));
/// assert!(!detect_filter("sort-title-sideways"));
/// ```
pub fn detect_filter(segment: &str) -> bool {
    GRAMMAR.is_match(segment)
}

/// Purely numeric segment (a positional page number)
pub fn is_numeric(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

/// Filter names and sort columns that can be encoded
pub fn is_valid_name(name: &str) -> bool {
    NAME_RE.is_match(name)
}

/// Drops ASCII control characters, which never survive sanitization
pub fn strip_controls(value: &str) -> Cow<'_, str> {
    if value.chars().any(|c| c.is_ascii_control()) {
        Cow::Owned(value.chars().filter(|c| !c.is_ascii_control()).collect())
    } else {
        Cow::Borrowed(value)
    }
}

/// Parses a segment
///
/// `None` when the segment is not a token at all, `Some(Err)` when it is a
/// token whose payload is unusable.
pub fn parse(segment: &str) -> Option<Result<Token, TokenError>> {
    if !detect_filter(segment) {
        return None;
    }

    if let Some(caps) = PAGE_RE.captures(segment) {
        return Some(parse_positive(&caps[1]).map(Token::Page));
    }
    if let Some(caps) = PER_PAGE_RE.captures(segment) {
        return Some(parse_positive(&caps[1]).map(Token::PerPage));
    }
    if let Some(caps) = SORT_RE.captures(segment) {
        let direction = SortDirection::parse(&caps[2]).unwrap_or(SortDirection::Asc);
        return Some(Ok(Token::Sort(Sort::new(&caps[1], direction))));
    }
    if let Some(caps) = FILTER_VAL_RE.captures(segment) {
        let name = caps[1].to_string();
        return Some(decode_value(&caps[2]).map(|v| Token::Filter(name, FilterValue::Scalar(v))));
    }
    if let Some(caps) = FILTER_JSON_RE.captures(segment) {
        let name = caps[1].to_string();
        return Some(decode_json(&caps[2]).map(|v| Token::Filter(name, v)));
    }
    SEARCH_RE
        .captures(segment)
        .map(|caps| decode_value(&caps[1]).map(Token::Search))
}

/// Encodes a token; `None` for state that is never written (empty values,
/// names outside the grammar)
pub fn encode(token: &Token) -> Option<String> {
    match token {
        Token::Page(n) => (*n > 0).then(|| format!("page-{}", n)),
        Token::PerPage(n) => (*n > 0).then(|| format!("perpage-{}", n)),
        Token::Sort(sort) => is_valid_name(&sort.column)
            .then(|| format!("sort-{}-{}", sort.column, sort.direction)),
        Token::Search(query) => {
            let query = strip_controls(query);
            (!query.is_empty()).then(|| format!("search-{}", urlencoding::encode(&query)))
        }
        Token::Filter(name, value) => {
            if !is_valid_name(name) || value.is_empty() {
                return None;
            }
            match value {
                FilterValue::Scalar(s) => {
                    let s = strip_controls(s);
                    (!s.is_empty())
                        .then(|| format!("filterval-{}-{}", name, urlencoding::encode(&s)))
                }
                FilterValue::Structured(v) => serde_json::to_string(v)
                    .ok()
                    .map(|json| format!("filterjson-{}-{}", name, urlencoding::encode(&json))),
            }
        }
    }
}

fn parse_positive(digits: &str) -> Result<u32, TokenError> {
    match digits.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(TokenError::InvalidNumber(digits.to_string())),
    }
}

fn decode_value(raw: &str) -> Result<String, TokenError> {
    let value = urlencoding::decode(raw)?.into_owned();
    if value.is_empty() {
        return Err(TokenError::EmptyValue);
    }
    Ok(value)
}

fn decode_json(raw: &str) -> Result<FilterValue, TokenError> {
    let payload = decode_value(raw)?;
    let value: serde_json::Value = serde_json::from_str(&payload)?;
    let value = FilterValue::Structured(value);
    if value.is_empty() {
        return Err(TokenError::EmptyValue);
    }
    Ok(value)
}
