use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use url::Url;

use crate::{
    key::PrivateKey,
    options::{RequestContext, TransformationPosition, UrlOptions},
    signer,
    transformation::{transformation_to_str, CHAIN_DELIMITER},
};

/// Query parameter carrying the serialized transformation chain.
const TRANSFORMATION_PARAMETER: &str = "tr";
/// Query parameter carrying the URL signature.
const SIGNATURE_PARAMETER: &str = "signature";
/// Query parameter carrying the signature expiry timestamp.
const TIMESTAMP_PARAMETER: &str = "expires";

/// Characters escaped when percent-encoding a relative resource path. `/` is
/// left intact so nested paths keep their segments.
const RESOURCE_PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Assembles delivery URLs for a configured account.
///
/// See the [crate documentation](crate) for a usage example.
#[derive(Debug, Clone, Default)]
pub struct UrlBuilder {
    context: RequestContext,
}

impl UrlBuilder {
    /// Creates a builder over the given account context.
    pub fn new(context: RequestContext) -> Self {
        Self { context }
    }

    /// Builds the delivery URL described by `options`.
    ///
    /// Returns the empty string when neither `path` nor `src` is given. The
    /// computation is pure apart from reading the clock for non-zero
    /// `expire_seconds` on signed URLs.
    pub fn generate_url(&self, options: UrlOptions) -> String {
        let mut options = options;
        if options.src.is_some() {
            // Transforms cannot be inlined into an arbitrary external path.
            options.transformation_position = Some(TransformationPosition::Query);
        }
        let options = self.context.extend_url_options(options);
        build_url(&options)
    }
}

#[derive(Debug, Default)]
struct ResultUrlParts {
    scheme: Option<String>,
    userinfo: Option<String>,
    host: String,
    path: String,
    query: String,
}

impl ResultUrlParts {
    fn render(&self) -> String {
        let mut url = format!("{}://", self.scheme.as_deref().unwrap_or("https"));
        if let Some(userinfo) = &self.userinfo {
            url.push_str(userinfo);
            url.push('@');
        }
        url.push_str(&self.host);
        url.push_str(&self.path);
        if !self.query.is_empty() {
            url.push('?');
            url.push_str(&self.query);
        }
        url
    }
}

fn build_url(options: &UrlOptions) -> String {
    let path = options.path.as_deref().unwrap_or("");
    let src = options.src.as_deref().unwrap_or("");
    let url_endpoint = options.url_endpoint.as_deref().unwrap_or("");
    let position = options.transformation_position.unwrap_or_default();

    let mut src_param_used_for_url =
        !src.is_empty() || position == TransformationPosition::Query;

    if path.is_empty() && src.is_empty() {
        tracing::debug!("neither path nor src given; producing empty URL");
        return String::new();
    }

    let endpoint = parse_endpoint(url_endpoint);
    let mut parts = ResultUrlParts {
        scheme: endpoint.scheme.clone(),
        ..Default::default()
    };

    let existing_query;
    if !path.is_empty() {
        let (bare_path, query) = split_query(path);
        existing_query = query;

        // Endpoint host plus base path, with exactly one trailing slash.
        parts.host = format!(
            "{}{}/",
            strip_trailing_slash(&endpoint.host),
            strip_trailing_slash(&endpoint.path),
        );
        parts.path = match Url::parse(bare_path) {
            // The path smuggles in its own host; leave it unencoded.
            Ok(parsed) if parsed.has_host() => trim_slashes(bare_path).to_string(),
            _ => utf8_percent_encode(trim_slashes(bare_path), RESOURCE_PATH).to_string(),
        };
    } else {
        match Url::parse(src) {
            Ok(parsed) => {
                if !parsed.username().is_empty() {
                    let mut userinfo = parsed.username().to_string();
                    if let Some(password) = parsed.password() {
                        userinfo.push(':');
                        userinfo.push_str(password);
                    }
                    parts.userinfo = Some(userinfo);
                }
                parts.host = parsed.host_str().unwrap_or("").to_string();
                parts.path = parsed.path().to_string();
                existing_query = parsed.query().map(str::to_string);
            }
            Err(err) => {
                tracing::warn!(src, %err, "src did not parse as an absolute URL");
                let (bare_src, query) = split_query(src);
                existing_query = query;
                parts.path = bare_src.to_string();
            }
        }
        src_param_used_for_url = true;
    }

    let mut query_params: Vec<(String, String)> = Vec::new();
    if let Some(query) = &existing_query {
        for pair in query.split('&').filter(|pair| !pair.is_empty()) {
            // A key with no `=` decodes to an empty value list; drop it.
            // `key=` decodes to one empty value and is kept.
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            let key = percent_decode_str(key).decode_utf8_lossy().into_owned();
            if key.is_empty() {
                continue;
            }
            let value = percent_decode_str(value).decode_utf8_lossy().into_owned();
            upsert(&mut query_params, &key, value);
        }
    }
    for (key, value) in &options.query_parameters {
        upsert(&mut query_params, key, value.clone());
    }

    let mut transformation_str = transformation_to_str(&options.transformation);
    if let Some(stripped) = transformation_str.strip_suffix(CHAIN_DELIMITER) {
        transformation_str = stripped.to_string();
    }
    if !transformation_str.trim().is_empty() {
        if position == TransformationPosition::Query || src_param_used_for_url {
            upsert(&mut query_params, TRANSFORMATION_PARAMETER, transformation_str);
        } else {
            parts.path = format!(
                "{TRANSFORMATION_PARAMETER}{CHAIN_DELIMITER}{transformation_str}/{}",
                parts.path
            );
        }
    }

    parts.host = strip_leading_slash(&parts.host).to_string();
    parts.path = strip_trailing_slash(&parts.path).to_string();
    parts.query = render_query(&query_params);

    let mut url = parts.render();

    if options.signed {
        let default_key = PrivateKey::default();
        let private_key = options.private_key.as_ref().unwrap_or(&default_key);
        let expire_timestamp = signer::signature_timestamp(options.expire_seconds);
        let url_signature = signer::signature(private_key, &url, url_endpoint, expire_timestamp);

        query_params.push((SIGNATURE_PARAMETER.to_string(), url_signature));
        if expire_timestamp != signer::DEFAULT_TIMESTAMP {
            query_params.push((TIMESTAMP_PARAMETER.to_string(), expire_timestamp.to_string()));
        }
        parts.query = render_query(&query_params);
        url = parts.render();
    }

    url
}

struct Endpoint {
    scheme: Option<String>,
    host: String,
    path: String,
}

/// Lenient endpoint parse. Scheme-less endpoints are split on the first `/`
/// and the scheme defaults to `https` at render time. Endpoint ports are not
/// carried into delivery URLs.
fn parse_endpoint(url_endpoint: &str) -> Endpoint {
    match Url::parse(url_endpoint) {
        Ok(parsed) if parsed.has_host() => Endpoint {
            scheme: Some(parsed.scheme().to_string()),
            host: parsed.host_str().unwrap_or("").to_string(),
            path: parsed.path().to_string(),
        },
        _ => {
            let (host, path) = match url_endpoint.split_once('/') {
                Some((host, rest)) => (host.to_string(), format!("/{rest}")),
                None => (url_endpoint.to_string(), String::new()),
            };
            Endpoint {
                scheme: None,
                host,
                path,
            }
        }
    }
}

/// Splits a path or source string into its bare path and query, discarding
/// any fragment.
fn split_query(value: &str) -> (&str, Option<String>) {
    let value = match value.split_once('#') {
        Some((before_fragment, _)) => before_fragment,
        None => value,
    };
    match value.split_once('?') {
        Some((path, query)) => (path, Some(query.to_string())),
        None => (value, None),
    }
}

/// Inserts or overwrites a query parameter, preserving the position of an
/// existing key.
fn upsert(params: &mut Vec<(String, String)>, key: &str, value: String) {
    if let Some(entry) = params.iter_mut().find(|(existing, _)| existing == key) {
        entry.1 = value;
    } else {
        params.push((key.to_string(), value));
    }
}

/// Joins query parameters with `&`, emitting a bare key when the value is
/// empty.
fn render_query(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(key, value)| {
            if value.is_empty() {
                key.clone()
            } else {
                format!("{key}={value}")
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Strips at most one leading `/`.
pub(crate) fn strip_leading_slash(value: &str) -> &str {
    value.strip_prefix('/').unwrap_or(value)
}

/// Strips at most one trailing `/`.
pub(crate) fn strip_trailing_slash(value: &str) -> &str {
    value.strip_suffix('/').unwrap_or(value)
}

/// Strips at most one slash from each end.
pub(crate) fn trim_slashes(value: &str) -> &str {
    strip_trailing_slash(strip_leading_slash(value))
}

/// Appends a `/` unless the value already ends with one.
pub(crate) fn ensure_trailing_slash(value: &str) -> String {
    if value.ends_with('/') {
        value.to_string()
    } else {
        format!("{value}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_trimming_boundaries() {
        assert_eq!(strip_leading_slash(""), "");
        assert_eq!(strip_leading_slash("/"), "");
        assert_eq!(strip_leading_slash("//a"), "/a");
        assert_eq!(strip_trailing_slash(""), "");
        assert_eq!(strip_trailing_slash("/"), "");
        assert_eq!(strip_trailing_slash("a//"), "a/");
        assert_eq!(trim_slashes("/"), "");
        assert_eq!(trim_slashes("/abc/"), "abc");
        assert_eq!(trim_slashes("abc"), "abc");
    }

    #[test]
    fn ensure_trailing_slash_is_idempotent() {
        assert_eq!(ensure_trailing_slash(""), "/");
        assert_eq!(ensure_trailing_slash("a"), "a/");
        assert_eq!(ensure_trailing_slash("a/"), "a/");
    }

    #[test]
    fn split_query_discards_fragment() {
        assert_eq!(split_query("/x.jpg"), ("/x.jpg", None));
        assert_eq!(split_query("/x.jpg?a=1"), ("/x.jpg", Some("a=1".into())));
        assert_eq!(split_query("/x.jpg?a=1#frag"), ("/x.jpg", Some("a=1".into())));
        assert_eq!(split_query("/x.jpg#frag"), ("/x.jpg", None));
    }

    #[test]
    fn upsert_overwrites_in_place() {
        let mut params = vec![("a".to_string(), "1".to_string())];
        upsert(&mut params, "b", "2".into());
        upsert(&mut params, "a", "9".into());
        assert_eq!(
            params,
            vec![
                ("a".to_string(), "9".to_string()),
                ("b".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn render_query_emits_bare_keys_for_empty_values() {
        let params = vec![
            ("a".to_string(), "1".to_string()),
            ("flag".to_string(), String::new()),
        ];
        assert_eq!(render_query(&params), "a=1&flag");
    }

    #[test]
    fn scheme_less_endpoints_parse_leniently() {
        let endpoint = parse_endpoint("ik.imagekit.io/demo");
        assert_eq!(endpoint.scheme, None);
        assert_eq!(endpoint.host, "ik.imagekit.io");
        assert_eq!(endpoint.path, "/demo");

        let endpoint = parse_endpoint("https://ik.imagekit.io/demo/");
        assert_eq!(endpoint.scheme.as_deref(), Some("https"));
        assert_eq!(endpoint.host, "ik.imagekit.io");
        assert_eq!(endpoint.path, "/demo/");
    }
}
