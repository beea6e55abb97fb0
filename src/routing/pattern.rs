//! Path pattern module
//!
//! Parses route patterns such as `/items/{id}` and matches request paths
//! against them, capturing named parameters.

use percent_encoding::percent_decode_str;
use std::fmt;
use std::str::FromStr;

use super::RouteError;

/// One `/`-delimited piece of a pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the request segment exactly
    Literal(String),
    /// Captures any non-empty request segment under this name
    Param(String),
}

/// Parsed route path pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Result<Self, RouteError> {
        let Some(rest) = pattern.strip_prefix('/') else {
            return Err(RouteError::MissingLeadingSlash(pattern.to_string()));
        };

        let mut segments = Vec::new();
        if !rest.is_empty() {
            for piece in rest.split('/') {
                segments.push(parse_segment(pattern, piece)?);
            }
        }

        let mut names: Vec<&str> = Vec::new();
        for segment in &segments {
            if let Segment::Param(name) = segment {
                if names.contains(&name.as_str()) {
                    return Err(RouteError::DuplicateParam {
                        pattern: pattern.to_string(),
                        name: name.clone(),
                    });
                }
                names.push(name);
            }
        }

        Ok(Self {
            raw: pattern.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[cfg(test)]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Match a request path, returning captured parameters on success
    ///
    /// A single trailing slash on the request path is ignored. Each segment is
    /// percent-decoded before comparison, so `/items/%2D7` captures `-7`.
    pub fn matches(&self, path: &str) -> Option<PathParams> {
        let path = normalize_path(path);
        let rest = path.strip_prefix('/')?;

        let pieces: Vec<&str> = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split('/').collect()
        };
        if pieces.len() != self.segments.len() {
            return None;
        }

        let mut params = PathParams::default();
        for (segment, piece) in self.segments.iter().zip(pieces) {
            let piece = percent_decode_str(piece).decode_utf8_lossy();
            match segment {
                Segment::Literal(lit) if *lit == piece => {}
                Segment::Param(name) if !piece.is_empty() => {
                    params.push(name.clone(), piece.into_owned());
                }
                _ => return None,
            }
        }
        Some(params)
    }
}

impl FromStr for PathPattern {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn parse_segment(pattern: &str, piece: &str) -> Result<Segment, RouteError> {
    if let Some(inner) = piece.strip_prefix('{') {
        let Some(name) = inner.strip_suffix('}') else {
            return Err(RouteError::UnbalancedBrace(pattern.to_string()));
        };
        if name.is_empty() {
            return Err(RouteError::EmptyParamName(pattern.to_string()));
        }
        if name.contains(['{', '}']) {
            return Err(RouteError::UnbalancedBrace(pattern.to_string()));
        }
        return Ok(Segment::Param(name.to_string()));
    }

    if piece.contains(['{', '}']) {
        return Err(RouteError::UnbalancedBrace(pattern.to_string()));
    }
    Ok(Segment::Literal(piece.to_string()))
}

fn normalize_path(path: &str) -> &str {
    if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    }
}

/// Error raised when a path parameter cannot be bound
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    /// No parameter with this name was captured
    Missing(String),
    /// The captured text does not parse as the requested type
    Invalid { name: String, value: String },
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(name) => write!(f, "missing path parameter '{name}'"),
            Self::Invalid { name, value } => {
                write!(f, "invalid value '{value}' for path parameter '{name}'")
            }
        }
    }
}

impl std::error::Error for ParamError {}

/// Parameters captured from a matched path, in pattern order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    entries: Vec<(String, String)>,
}

impl PathParams {
    fn push(&mut self, name: String, value: String) {
        self.entries.push((name, value));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Parse a captured parameter with `FromStr`
    pub fn parse<T: FromStr>(&self, name: &str) -> Result<T, ParamError> {
        let value = self
            .get(name)
            .ok_or_else(|| ParamError::Missing(name.to_string()))?;
        value.parse().map_err(|_| ParamError::Invalid {
            name: name.to_string(),
            value: value.to_string(),
        })
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_literal_and_param() {
        let pattern = PathPattern::parse("/items/{id}").unwrap();
        assert_eq!(
            pattern.segments(),
            &[
                Segment::Literal("items".to_string()),
                Segment::Param("id".to_string())
            ]
        );
        assert_eq!(pattern.to_string(), "/items/{id}");
    }

    #[test]
    fn test_parse_root() {
        let pattern = PathPattern::parse("/").unwrap();
        assert!(pattern.segments().is_empty());
        assert!(pattern.matches("/").is_some());
        assert!(pattern.matches("/items").is_none());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            PathPattern::parse("items"),
            Err(RouteError::MissingLeadingSlash("items".to_string()))
        );
        assert_eq!(
            PathPattern::parse("/items/{}"),
            Err(RouteError::EmptyParamName("/items/{}".to_string()))
        );
        assert_eq!(
            PathPattern::parse("/items/{id"),
            Err(RouteError::UnbalancedBrace("/items/{id".to_string()))
        );
        assert_eq!(
            PathPattern::parse("/items/id}"),
            Err(RouteError::UnbalancedBrace("/items/id}".to_string()))
        );
        assert!(matches!(
            PathPattern::parse("/a/{id}/b/{id}"),
            Err(RouteError::DuplicateParam { .. })
        ));
    }

    #[test]
    fn test_match_literal() {
        let pattern: PathPattern = "/items".parse().unwrap();
        let params = pattern.matches("/items").unwrap();
        assert!(params.is_empty());
        assert!(pattern.matches("/items/").is_some());
        assert!(pattern.matches("/Items").is_none());
        assert!(pattern.matches("/items/42").is_none());
        assert!(pattern.matches("/orders").is_none());
    }

    #[test]
    fn test_match_param() {
        let pattern: PathPattern = "/items/{id}".parse().unwrap();
        let params = pattern.matches("/items/42").unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("id"), Some("42"));
        assert_eq!(pattern.matches("/items/abc/").unwrap().get("id"), Some("abc"));
        assert!(pattern.matches("/items").is_none());
        assert!(pattern.matches("/items//").is_none());
        assert!(pattern.matches("/items/1/2").is_none());
    }

    #[test]
    fn test_match_percent_decoded() {
        let pattern: PathPattern = "/items/{id}".parse().unwrap();
        assert_eq!(pattern.matches("/items/%2D7").unwrap().get("id"), Some("-7"));
        assert_eq!(pattern.matches("/items/%34%32").unwrap().get("id"), Some("42"));
        assert_eq!(pattern.matches("/items/a%20b").unwrap().get("id"), Some("a b"));

        let literal: PathPattern = "/items".parse().unwrap();
        assert!(literal.matches("/%69tems").is_some());
    }

    #[test]
    fn test_params_parse_i64() {
        let pattern: PathPattern = "/items/{id}".parse().unwrap();

        let params = pattern.matches("/items/-7").unwrap();
        assert_eq!(params.parse::<i64>("id"), Ok(-7));

        let params = pattern.matches("/items/9223372036854775807").unwrap();
        assert_eq!(params.parse::<i64>("id"), Ok(i64::MAX));

        let params = pattern.matches("/items/9223372036854775808").unwrap();
        assert!(matches!(
            params.parse::<i64>("id"),
            Err(ParamError::Invalid { .. })
        ));

        let params = pattern.matches("/items/abc").unwrap();
        assert_eq!(
            params.parse::<i64>("id"),
            Err(ParamError::Invalid {
                name: "id".to_string(),
                value: "abc".to_string()
            })
        );
        assert_eq!(
            params.parse::<i64>("other"),
            Err(ParamError::Missing("other".to_string()))
        );
    }
}
