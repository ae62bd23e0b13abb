//! Minimal XML-RPC encoding for the handful of calls fldigi needs
//!
//! Only scalar and string-array responses are understood. Anything else is
//! reported as malformed.

use std::sync::OnceLock;

use regex::Regex;

use crate::source::{FetchError, FetchResult};

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static xml-rpc pattern"))
}

fn fault_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"(?s)<fault>(.*)</fault>")
}

fn fault_code_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(
        &RE,
        r"(?s)<name>\s*faultCode\s*</name>\s*<value>\s*(?:<(?:i4|int)>)?\s*(-?\d+)",
    )
}

fn fault_string_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(
        &RE,
        r"(?s)<name>\s*faultString\s*</name>\s*<value>\s*(?:<string>)?(.*?)(?:</string>)?\s*</value>",
    )
}

/// First `<param>`; group 1 is absent when its value is a bare `<value/>`.
fn param_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(
        &RE,
        r"(?s)<param>\s*(?:<value\s*/>|<value>(.*?)</value>)\s*</param>",
    )
}

fn scalar_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(
        &RE,
        r"(?s)^\s*<(string|double|i4|int)>(.*?)</(?:string|double|i4|int)>\s*$",
    )
}

fn empty_scalar_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"^\s*<(?:string|double|i4|int)\s*/>\s*$")
}

fn array_string_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"(?s)<value>\s*(?:<string>(.*?)</string>|([^<]*?))\s*</value>")
}

/// Encode a parameterless `methodCall`.
pub fn method_call(method: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?><methodCall><methodName>{}</methodName></methodCall>",
        escape(method)
    )
}

/// Extract the raw text of the first response parameter.
///
/// Typed `<string>`, `<double>`, `<i4>` and `<int>` values are unwrapped;
/// an untyped `<value>` yields its character data.
pub fn first_scalar(body: &str) -> FetchResult<String> {
    check_fault(body)?;

    let param = param_re().captures(body).ok_or(FetchError::NoParams)?;
    let inner = param.get(1).map(|m| m.as_str()).ok_or(FetchError::Empty)?;

    let text = if let Some(caps) = scalar_re().captures(inner) {
        caps.get(2).map(|m| m.as_str()).unwrap_or_default()
    } else if empty_scalar_re().is_match(inner) {
        ""
    } else if inner.contains('<') {
        return Err(FetchError::Malformed(format!("unsupported value: {}", inner.trim())));
    } else {
        inner
    };

    let text = unescape(text.trim());
    if text.is_empty() {
        return Err(FetchError::Empty);
    }
    Ok(text)
}

/// Parse the first response parameter as a number.
pub fn first_f64(body: &str) -> FetchResult<f64> {
    let text = first_scalar(body)?;
    text.parse::<f64>()
        .map_err(|_| FetchError::Parse { value: text })
}

/// Extract the strings of an `<array>` response, e.g. `system.listMethods`.
pub fn string_array(body: &str) -> FetchResult<Vec<String>> {
    check_fault(body)?;

    let start = body.find("<data>").ok_or(FetchError::NoParams)?;
    let end = body[start..]
        .find("</data>")
        .map(|i| start + i)
        .ok_or_else(|| FetchError::Malformed("unterminated <data>".into()))?;
    let data = &body[start + "<data>".len()..end];

    Ok(array_string_re()
        .captures_iter(data)
        .filter_map(|c| c.get(1).or_else(|| c.get(2)))
        .map(|m| unescape(m.as_str().trim()))
        .filter(|s| !s.is_empty())
        .collect())
}

fn check_fault(body: &str) -> FetchResult<()> {
    let Some(fault) = fault_re().captures(body).and_then(|c| c.get(1)) else {
        return Ok(());
    };
    let fault = fault.as_str();
    let code = fault_code_re()
        .captures(fault)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0);
    let message = fault_string_re()
        .captures(fault)
        .and_then(|c| c.get(1))
        .map(|m| unescape(m.as_str().trim()))
        .unwrap_or_default();
    Err(FetchError::Fault { code, message })
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn unescape(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
