//! Header manipulation at the proxy boundary.
//!
//! # Responsibilities
//! - Strip hop-by-hop headers in both directions
//! - Append the client address to X-Forwarded-For
//! - Point `Host` at the request target
//! - Copy multi-valued header sets without losing values
//!
//! # Design Decisions
//! - The hop-by-hop set is a fixed list; `Connection` tokens are not expanded
//! - X-Forwarded-For is appended to, never replaced
//! - A peer address that cannot be split into host and port is ignored

use axum::http::header::{HeaderMap, HeaderName, HeaderValue, HOST};
use axum::http::uri::Authority;

/// Headers that only make sense for a single connection.
pub const HOP_BY_HOP_HEADERS: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailers",
    "transfer-encoding",
    "upgrade",
];

pub const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

/// Remove every hop-by-hop header (all of its values) from `headers`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP_HEADERS {
        // `remove` drops every value stored under the name.
        headers.remove(name);
    }
}

/// Append the host part of `remote_addr` to `X-Forwarded-For`.
///
/// Existing values are joined with `", "` and the client host is appended,
/// leaving a single header value behind. Returns `false` without touching the
/// headers when `remote_addr` is not a `host:port` pair.
pub fn append_forwarded_for(headers: &mut HeaderMap, remote_addr: &str) -> bool {
    let Some(host) = split_host_port(remote_addr).map(|(host, _)| host) else {
        return false;
    };

    let mut value = Vec::new();
    for prior in headers.get_all(&X_FORWARDED_FOR) {
        value.extend_from_slice(prior.as_bytes());
        value.extend_from_slice(b", ");
    }
    value.extend_from_slice(host.as_bytes());

    match HeaderValue::from_bytes(&value) {
        Ok(value) => {
            headers.insert(X_FORWARDED_FOR, value);
            true
        }
        Err(_) => false,
    }
}

/// Replace any received `Host` with the authority of the request target.
///
/// Userinfo in the authority is not part of the host and is dropped.
pub fn set_host(headers: &mut HeaderMap, authority: &Authority) {
    let host = match authority.as_str().rsplit_once('@') {
        Some((_, host)) => host,
        None => authority.as_str(),
    };
    match HeaderValue::from_str(host) {
        Ok(value) => {
            headers.insert(HOST, value);
        }
        Err(_) => {
            headers.remove(HOST);
        }
    }
}

/// Copy every value of every header from `src` into `dst`, in order.
pub fn copy_headers(dst: &mut HeaderMap, src: &HeaderMap) {
    for (name, value) in src {
        dst.append(name.clone(), value.clone());
    }
}

/// Split `host:port`, `[v6]:port` or `[v6%zone]:port` into host and port.
///
/// Bare IPv6 literals with more than one colon are rejected as ambiguous.
pub fn split_host_port(addr: &str) -> Option<(&str, &str)> {
    let (host, port) = if let Some(rest) = addr.strip_prefix('[') {
        let (host, tail) = rest.split_once(']')?;
        (host, tail.strip_prefix(':')?)
    } else {
        let (host, port) = addr.rsplit_once(':')?;
        if host.contains(':') {
            return None;
        }
        (host, port)
    };

    if host.contains(['[', ']']) || port.contains(['[', ']']) {
        return None;
    }
    Some((host, port))
}
