//! Content negotiation.
//!
//! Each endpoint builds a [`Formatters`] registry mapping media types to a
//! render function for its concrete response type. The client's `Accept`
//! header selects an entry; the first registered entry is the default.

use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::{IntoResponse, Response};
use catalog_table::TableRow;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::xml::{XmlDocument, to_xml};

pub use catalog_table::TABLE_MEDIA_TYPE;

/// Media types answered by the JSON formatter.
pub const JSON_MEDIA_TYPES: &[&str] = &["application/json", "text/json"];

/// Media types answered by the XML formatter.
pub const XML_MEDIA_TYPES: &[&str] = &["application/xml", "text/xml"];

/// Media types answered by the table formatter.
pub const TABLE_MEDIA_TYPES: &[&str] = &[TABLE_MEDIA_TYPE];

/// Renders a response value into a text body.
pub type Render<T> = fn(&T) -> AppResult<String>;

/// One range from an `Accept` header, e.g. `text/*;q=0.5`.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaRange {
    pub kind: String,
    pub subtype: String,
    pub quality: f32,
}

impl MediaRange {
    /// Parse one comma-separated element of an `Accept` header.
    pub fn parse(element: &str) -> Option<Self> {
        let mut params = element.split(';');
        let essence = params.next()?.trim();
        let (kind, subtype) = essence.split_once('/')?;
        let (kind, subtype) = (kind.trim(), subtype.trim());
        if kind.is_empty() || subtype.is_empty() || (kind == "*" && subtype != "*") {
            return None;
        }

        let mut quality = 1.0;
        for param in params {
            if let Some((name, value)) = param.split_once('=') {
                if name.trim().eq_ignore_ascii_case("q") {
                    let q = value.trim().parse::<f32>().ok().filter(|q| q.is_finite())?;
                    quality = q.clamp(0.0, 1.0);
                }
            }
        }

        Some(Self {
            kind: kind.to_ascii_lowercase(),
            subtype: subtype.to_ascii_lowercase(),
            quality,
        })
    }

    /// Whether this range covers a concrete `type/subtype`.
    pub fn matches(&self, media_type: &str) -> bool {
        let Some((kind, subtype)) = media_type.split_once('/') else {
            return false;
        };
        (self.kind == "*" || self.kind.eq_ignore_ascii_case(kind))
            && (self.subtype == "*" || self.subtype.eq_ignore_ascii_case(subtype))
    }

    /// 2 for `type/subtype`, 1 for `type/*`, 0 for `*/*`.
    fn specificity(&self) -> u8 {
        match (self.kind.as_str(), self.subtype.as_str()) {
            ("*", _) => 0,
            (_, "*") => 1,
            _ => 2,
        }
    }
}

/// Parse a full `Accept` header value. Malformed elements are skipped.
pub fn parse_accept(value: &str) -> Vec<MediaRange> {
    value
        .split(',')
        .filter(|element| !element.trim().is_empty())
        .filter_map(MediaRange::parse)
        .collect()
}

struct Entry<T> {
    media_types: &'static [&'static str],
    render: Render<T>,
}

/// The outcome of negotiation: which entry and which concrete media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub index: usize,
    pub media_type: &'static str,
}

/// Registry of the representations an endpoint can produce.
pub struct Formatters<T> {
    entries: Vec<Entry<T>>,
}

impl<T> Default for Formatters<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> Formatters<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a representation. Media types are tried in order, so list the
    /// preferred one first.
    pub fn register(mut self, media_types: &'static [&'static str], render: Render<T>) -> Self {
        self.entries.push(Entry {
            media_types,
            render,
        });
        self
    }

    /// Choose a representation for an `Accept` header value.
    ///
    /// No header (or an empty one) selects the first entry. Otherwise the
    /// entry with the highest quality wins; ties go to the earlier range in
    /// the header, then to the earlier entry. `None` when nothing is acceptable.
    pub fn select(&self, accept: Option<&str>) -> Option<Selection> {
        let ranges = accept.map(parse_accept).unwrap_or_default();
        if ranges.is_empty() {
            return self.entries.first().and_then(|entry| {
                entry.media_types.first().map(|media_type| Selection {
                    index: 0,
                    media_type: *media_type,
                })
            });
        }

        let mut best: Option<(f32, usize, Selection)> = None;
        for (index, entry) in self.entries.iter().enumerate() {
            for media_type in entry.media_types {
                // The most specific matching range decides the quality.
                let Some((position, range)) = ranges
                    .iter()
                    .enumerate()
                    .filter(|(_, range)| range.matches(media_type))
                    .max_by_key(|(position, range)| {
                        (range.specificity(), std::cmp::Reverse(*position))
                    })
                else {
                    continue;
                };
                if range.quality <= 0.0 {
                    continue;
                }

                let candidate = (
                    range.quality,
                    position,
                    Selection {
                        index,
                        media_type: *media_type,
                    },
                );
                let better = match &best {
                    None => true,
                    Some((quality, best_position, _)) => {
                        range.quality > *quality
                            || (range.quality == *quality && position < *best_position)
                    }
                };
                if better {
                    best = Some(candidate);
                }
            }
        }

        best.map(|(_, _, selection)| selection)
    }

    /// Negotiate against the request headers and render `value`.
    pub fn respond(&self, headers: &HeaderMap, value: &T) -> AppResult<Response> {
        let accept = accept_header(headers);
        let selection = self.select(accept.as_deref()).ok_or_else(|| {
            AppError::NotAcceptable(format!(
                "this endpoint produces {}",
                self.entries
                    .iter()
                    .flat_map(|entry| entry.media_types.iter().copied())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })?;

        let body = (self.entries[selection.index].render)(value)?;
        tracing::debug!(media_type = selection.media_type, "Negotiated response format");

        let content_type = HeaderValue::from_str(&format!(
            "{}; charset=utf-8",
            selection.media_type
        ))
        .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(([(header::CONTENT_TYPE, content_type)], body).into_response())
    }
}

impl<T: XmlDocument> Formatters<T> {
    /// JSON (default) and XML.
    pub fn structured() -> Self {
        Self::new()
            .register(JSON_MEDIA_TYPES, render_json)
            .register(XML_MEDIA_TYPES, to_xml)
    }
}

/// All `Accept` header values joined into one list.
fn accept_header(headers: &HeaderMap) -> Option<String> {
    let values: Vec<&str> = headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect();
    (!values.is_empty()).then(|| values.join(","))
}

pub fn render_json<T: Serialize>(value: &T) -> AppResult<String> {
    Ok(serde_json::to_string(value)?)
}

/// Table text with every line terminated; empty input renders as an empty body.
pub fn render_table<R: TableRow>(rows: &[R]) -> String {
    catalog_table::layout(rows).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Formatters<u32> {
        Formatters::<u32>::new()
            .register(JSON_MEDIA_TYPES, |n: &u32| Ok(format!("{{\"n\":{n}}}")))
            .register(XML_MEDIA_TYPES, |n: &u32| Ok(format!("<N>{n}</N>")))
            .register(TABLE_MEDIA_TYPES, |n: &u32| Ok(format!("| {n} |\n")))
    }

    fn selected(accept: Option<&str>) -> Option<&'static str> {
        registry().select(accept).map(|s| s.media_type)
    }

    #[test]
    fn test_parse_media_range() {
        let range = MediaRange::parse(" Text/XML ; q=0.4").unwrap();
        assert_eq!(range.kind, "text");
        assert_eq!(range.subtype, "xml");
        assert_eq!(range.quality, 0.4);

        assert!(MediaRange::parse("json").is_none());
        assert!(MediaRange::parse("*/json").is_none());
        assert!(MediaRange::parse("text/plain;q=abc").is_none());
    }

    #[test]
    fn test_non_finite_quality_is_skipped() {
        assert!(MediaRange::parse("application/json;q=NaN").is_none());
        assert!(MediaRange::parse("application/json;q=inf").is_none());
        assert_eq!(
            selected(Some("application/json;q=NaN, text/primitives-table;q=0.5")),
            Some(TABLE_MEDIA_TYPE)
        );
    }

    #[test]
    fn test_missing_accept_uses_default() {
        assert_eq!(selected(None), Some("application/json"));
        assert_eq!(selected(Some("")), Some("application/json"));
        assert_eq!(selected(Some("*/*")), Some("application/json"));
    }

    #[test]
    fn test_exact_match() {
        assert_eq!(selected(Some("text/primitives-table")), Some(TABLE_MEDIA_TYPE));
        assert_eq!(selected(Some("text/xml")), Some("text/xml"));
        assert_eq!(selected(Some("application/xml")), Some("application/xml"));
    }

    #[test]
    fn test_quality_ordering() {
        assert_eq!(
            selected(Some("application/json;q=0.5, text/primitives-table")),
            Some(TABLE_MEDIA_TYPE)
        );
        assert_eq!(
            selected(Some("text/primitives-table;q=0.2, application/xml;q=0.9")),
            Some("application/xml")
        );
    }

    #[test]
    fn test_ties_follow_header_order() {
        assert_eq!(
            selected(Some("application/xml, application/json")),
            Some("application/xml")
        );
    }

    #[test]
    fn test_browser_style_header_falls_back_to_json() {
        assert_eq!(
            selected(Some("text/html,application/xhtml+xml,*/*;q=0.8")),
            Some("application/json")
        );
    }

    #[test]
    fn test_zero_quality_excludes() {
        assert_eq!(
            selected(Some("application/json;q=0, application/xml;q=0.1")),
            Some("application/xml")
        );
        assert_eq!(selected(Some("text/csv")), None);
    }

    #[test]
    fn test_type_wildcard_picks_first_covered_type() {
        assert_eq!(selected(Some("text/*")), Some("text/json"));
        assert_eq!(selected(Some("application/*")), Some("application/json"));
    }

    #[test]
    fn test_respond_sets_content_type() {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(TABLE_MEDIA_TYPE));

        let response = registry().respond(&headers, &7).unwrap();
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/primitives-table; charset=utf-8"
        );
    }

    #[test]
    fn test_respond_not_acceptable() {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("image/png"));

        let err = registry().respond(&headers, &7).unwrap_err();
        assert!(matches!(err, AppError::NotAcceptable(_)));
    }
}
