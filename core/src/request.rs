use std::mem;

use crate::{Error, Result};
use http::uri::{Authority, PathAndQuery, Scheme};
use http::{HeaderMap, HeaderValue, Method, Uri};
use std::str::FromStr;

/// Signing context for request.
///
/// A request is taken apart once, canonicalized and signed against the
/// decomposed form, then put back together via [`SigningRequest::apply`].
#[derive(Debug)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme.
    pub scheme: Scheme,
    /// HTTP authority.
    pub authority: Authority,
    /// HTTP path.
    pub path: String,
    /// HTTP query parameters, percent-decoded.
    pub query: Vec<(String, String)>,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl SigningRequest {
    /// Build a signing context from http::request::Parts.
    pub fn build(parts: &mut http::request::Parts) -> Result<Self> {
        let uri = mem::take(&mut parts.uri).into_parts();
        let paq = uri
            .path_and_query
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        Ok(SigningRequest {
            method: parts.method.clone(),
            scheme: uri.scheme.unwrap_or(Scheme::HTTP),
            authority: uri.authority.ok_or_else(|| {
                Error::request_invalid("request without authority is invalid for signing")
            })?,
            path: paq.path().to_string(),
            query: paq
                .query()
                .map(|v| {
                    form_urlencoded::parse(v.as_bytes())
                        .map(|(k, v)| (k.into_owned(), v.into_owned()))
                        .collect()
                })
                .unwrap_or_default(),

            // Take the headers out of the request to avoid copy.
            // We will return it back when apply the context.
            headers: mem::take(&mut parts.headers),
        })
    }

    /// Apply the signing context back to http::request::Parts.
    pub fn apply(mut self, parts: &mut http::request::Parts) -> Result<()> {
        let query_size = self.query_size();

        // Return headers back.
        mem::swap(&mut parts.headers, &mut self.headers);
        parts.method = self.method;
        parts.uri = {
            let mut uri_parts = mem::take(&mut parts.uri).into_parts();
            uri_parts.scheme = Some(self.scheme);
            uri_parts.authority = Some(self.authority);
            // Build path and query.
            uri_parts.path_and_query = {
                let paq = if query_size == 0 {
                    self.path
                } else {
                    let mut s = self.path;
                    s.reserve(query_size + 1);

                    s.push('?');
                    for (i, (k, v)) in self.query.iter().enumerate() {
                        if i > 0 {
                            s.push('&');
                        }

                        s.push_str(k);
                        if !v.is_empty() {
                            s.push('=');
                            s.push_str(v);
                        }
                    }

                    s
                };

                Some(PathAndQuery::from_str(&paq)?)
            };
            Uri::from_parts(uri_parts)?
        };

        Ok(())
    }

    /// Get query size.
    #[inline]
    pub fn query_size(&self) -> usize {
        self.query
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum::<usize>()
    }

    /// Normalize header value by trimming surrounding spaces.
    pub fn header_value_normalize(v: &mut HeaderValue) {
        let bs = v.as_bytes();

        let starting_index = bs.iter().position(|b| *b != b' ').unwrap_or(0);
        let ending_offset = bs.iter().rev().position(|b| *b != b' ').unwrap_or(0);
        let ending_index = bs.len() - ending_offset;

        // This can't fail because we started with a valid HeaderValue and then only trimmed spaces
        *v = HeaderValue::from_bytes(&bs[starting_index..ending_index])
            .expect("invalid header value")
    }

    /// Get header names as sorted vector.
    ///
    /// Names come out of `http::HeaderMap` lower-cased already, so a plain
    /// lexicographic sort matches the case-insensitive order the signature
    /// requires.
    pub fn header_name_to_vec_sorted(&self) -> Vec<&str> {
        let mut h = self
            .headers
            .keys()
            .map(|k| k.as_str())
            .collect::<Vec<&str>>();
        h.sort_unstable();

        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts_for(uri: &str) -> http::request::Parts {
        let (parts, _) = http::Request::builder()
            .method(Method::POST)
            .uri(uri)
            .body(())
            .expect("request must be valid")
            .into_parts();
        parts
    }

    #[test]
    fn test_build_defaults_path() {
        let mut parts = parts_for("https://example.com");
        let req = SigningRequest::build(&mut parts).expect("must build");

        assert_eq!(req.path, "/");
        assert!(req.query.is_empty());
        assert_eq!(req.authority.as_str(), "example.com");
    }

    #[test]
    fn test_build_without_authority_fails() {
        let mut parts = parts_for("/only/a/path");
        assert!(SigningRequest::build(&mut parts).is_err());
    }

    #[test]
    fn test_build_apply_round_trip() {
        let mut parts = parts_for("https://example.com/submit?Action=SubmitTask&Version=2024-01-01");

        let req = SigningRequest::build(&mut parts).expect("must build");
        assert_eq!(
            req.query,
            vec![
                ("Action".to_string(), "SubmitTask".to_string()),
                ("Version".to_string(), "2024-01-01".to_string()),
            ]
        );

        req.apply(&mut parts).expect("must apply");
        assert_eq!(
            parts.uri.to_string(),
            "https://example.com/submit?Action=SubmitTask&Version=2024-01-01"
        );
    }

    #[test]
    fn test_header_value_normalize() {
        let mut v = HeaderValue::from_static("  application/json  ");
        SigningRequest::header_value_normalize(&mut v);
        assert_eq!(v, HeaderValue::from_static("application/json"));
    }
}
