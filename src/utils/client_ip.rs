//! Client address resolution for recorded visits.

use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

/// Resolves the address a visit is attributed to.
///
/// When `behind_proxy` is set, the first valid entry of `X-Forwarded-For` wins,
/// then `X-Real-IP`. Otherwise, or when neither header holds a valid address, the
/// socket peer address is used.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
///
/// let peer: SocketAddr = "10.0.0.1:51234".parse().unwrap();
/// assert_eq!(client_ip(&headers, peer, true), "203.0.113.7");
/// assert_eq!(client_ip(&headers, peer, false), "10.0.0.1");
/// ```
pub fn client_ip(headers: &HeaderMap, peer: SocketAddr, behind_proxy: bool) -> String {
    if behind_proxy {
        let forwarded = header_str(headers, "x-forwarded-for")
            .and_then(|value| value.split(',').next())
            .and_then(parse_ip);

        if let Some(ip) = forwarded.or_else(|| header_str(headers, "x-real-ip").and_then(parse_ip))
        {
            return ip.to_string();
        }
    }

    peer.ip().to_string()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn parse_ip(value: &str) -> Option<IpAddr> {
    value.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> SocketAddr {
        "10.0.0.1:51234".parse().unwrap()
    }

    #[test]
    fn test_peer_address_without_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7"));

        assert_eq!(client_ip(&headers, peer(), false), "10.0.0.1");
    }

    #[test]
    fn test_first_forwarded_hop_behind_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.2"),
        );

        assert_eq!(client_ip(&headers, peer(), true), "203.0.113.7");
    }

    #[test]
    fn test_real_ip_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.4"));

        assert_eq!(client_ip(&headers, peer(), true), "198.51.100.4");
    }

    #[test]
    fn test_invalid_headers_use_peer() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("not-an-ip"));
        headers.insert("x-real-ip", HeaderValue::from_static(""));

        assert_eq!(client_ip(&headers, peer(), true), "10.0.0.1");
    }

    #[test]
    fn test_ipv6_forwarded() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("2001:db8::1"));

        assert_eq!(client_ip(&headers, peer(), true), "2001:db8::1");
    }
}
