use http::HeaderMap;

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
pub const X_REAL_IP: &str = "x-real-ip";

/// Identity used for requests that carry no client address headers.
///
/// Every unidentified client shares this one identity, and therefore one rate
/// limit bucket. This is a known coarsening, not an oversight.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Derives the rate limiting identity of the client that sent `headers`.
///
/// Uses the first address of `X-Forwarded-For`, then `X-Real-IP`, then
/// [`UNKNOWN_CLIENT`]. Empty or non-ASCII header values count as absent.
pub fn client_identity(headers: &HeaderMap) -> String {
    let forwarded = header_str(headers, X_FORWARDED_FOR)
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|first| !first.is_empty());

    if let Some(first) = forwarded {
        return first.to_owned();
    }

    header_str(headers, X_REAL_IP)
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .unwrap_or(UNKNOWN_CLIENT)
        .to_owned()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn uses_first_forwarded_address() {
        let h = headers(&[("x-forwarded-for", " 203.0.113.7 , 10.0.0.1, 10.0.0.2")]);
        assert_eq!(client_identity(&h), "203.0.113.7");
    }

    #[test]
    fn forwarded_for_wins_over_real_ip() {
        let h = headers(&[
            ("x-forwarded-for", "203.0.113.7"),
            ("x-real-ip", "198.51.100.1"),
        ]);
        assert_eq!(client_identity(&h), "203.0.113.7");
    }

    #[test]
    fn falls_back_to_real_ip() {
        let h = headers(&[("x-real-ip", " 198.51.100.1 ")]);
        assert_eq!(client_identity(&h), "198.51.100.1");
    }

    #[test]
    fn empty_forwarded_entry_falls_through() {
        let h = headers(&[("x-forwarded-for", " , 10.0.0.1"), ("x-real-ip", "198.51.100.1")]);
        assert_eq!(client_identity(&h), "198.51.100.1");
    }

    #[test]
    fn unidentified_clients_share_one_identity() {
        assert_eq!(client_identity(&HeaderMap::new()), UNKNOWN_CLIENT);
        assert_eq!(client_identity(&headers(&[("x-real-ip", "  ")])), UNKNOWN_CLIENT);
    }
}
