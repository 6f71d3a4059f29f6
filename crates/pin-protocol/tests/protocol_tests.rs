//! Protocol layer tests - context tokens, payload codec, cache codec, cookies.

#[cfg(test)]
mod tests {
    use axum::http::header::COOKIE;
    use axum::http::{HeaderMap, HeaderValue, StatusCode};
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use pin_protocol::*;
    use serde_json::json;

    // ─────────────────────────────────────────────────────────────────────
    // ContextToken
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn generated_tokens_are_unique_hex() {
        let a = ContextToken::generate();
        let b = ContextToken::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);
        assert!(a.as_str().bytes().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn generated_tokens_parse_back() {
        let token = ContextToken::generate();
        assert_eq!(ContextToken::parse(token.as_str()).unwrap(), token);
    }

    #[test]
    fn token_rejects_delimiter() {
        assert!(matches!(
            ContextToken::parse("abc--def"),
            Err(ProtocolError::InvalidToken(_))
        ));
    }

    #[test]
    fn token_rejects_empty_and_unsafe_chars() {
        assert!(ContextToken::parse("").is_err());
        assert!(ContextToken::parse("a b").is_err());
        assert!(ContextToken::parse("a;b").is_err());
        assert!(ContextToken::parse(&"x".repeat(129)).is_err());
    }

    #[test]
    fn token_accepts_single_dashes_and_dots() {
        assert!(ContextToken::parse("abc-def_1.2").is_ok());
    }

    #[test]
    fn token_deserialization_validates() {
        let ok: ContextToken = serde_json::from_value(json!("abcdefg")).unwrap();
        assert_eq!(ok.as_str(), "abcdefg");
        assert!(serde_json::from_value::<ContextToken>(json!("a--b")).is_err());
    }

    // ─────────────────────────────────────────────────────────────────────
    // ContextPayload
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn payload_encode() {
        let payload = ContextPayload::new(ContextToken::parse("abcdefg").unwrap(), StatusCode::OK);
        assert_eq!(payload.encode(), "abcdefg--200");
        assert_eq!(payload.to_string(), "abcdefg--200");
    }

    #[test]
    fn payload_decode() {
        let payload = ContextPayload::decode("abcdefg--301").unwrap();
        assert_eq!(payload.context.as_str(), "abcdefg");
        assert_eq!(payload.status, StatusCode::MOVED_PERMANENTLY);
        assert!(payload.is_sticky());
    }

    #[test]
    fn payload_decode_splits_on_last_delimiter() {
        let payload: ContextPayload = "ab---200".parse().unwrap();
        assert_eq!(payload.context.as_str(), "ab-");
        assert_eq!(payload.status, StatusCode::OK);
    }

    #[test]
    fn payload_without_delimiter_is_rejected() {
        assert!(matches!(
            ContextPayload::decode("abcdefg"),
            Err(ProtocolError::MissingDelimiter)
        ));
    }

    #[test]
    fn payload_with_bad_status_is_rejected() {
        for raw in ["abc--", "abc--20", "abc--2000", "abc--abc", "abc--099", "abc--600", "abc-- 200"] {
            assert!(
                matches!(ContextPayload::decode(raw), Err(ProtocolError::InvalidStatus(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn payload_with_empty_context_is_rejected() {
        assert!(matches!(
            ContextPayload::decode("--200"),
            Err(ProtocolError::InvalidToken(_))
        ));
    }

    #[test]
    fn sticky_covers_whole_3xx_range() {
        let token = ContextToken::generate();
        for code in [300, 301, 302, 303, 304, 307, 308, 399] {
            let status = StatusCode::from_u16(code).unwrap();
            assert!(ContextPayload::new(token.clone(), status).is_sticky(), "{code}");
        }
        for code in [200, 204, 299, 400, 404, 500] {
            let status = StatusCode::from_u16(code).unwrap();
            assert!(!ContextPayload::new(token.clone(), status).is_sticky(), "{code}");
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Cache codec
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn cache_decode_known_payload() {
        let raw = STANDARD.encode(br#"{"t":"t"}"#);
        let mapping = decode_cache(&raw).unwrap();
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping["t"], json!("t"));
    }

    #[test]
    fn cache_encoding_is_deterministic() {
        let mut a = CacheMapping::new();
        a.insert("b".into(), json!(2));
        a.insert("a".into(), json!(1));
        let mut b = CacheMapping::new();
        b.insert("a".into(), json!(1));
        b.insert("b".into(), json!(2));
        assert_eq!(encode_cache(&a), encode_cache(&b));
        assert_eq!(
            STANDARD.decode(encode_cache(&a)).unwrap(),
            br#"{"a":1,"b":2}"#.to_vec()
        );
    }

    #[test]
    fn cache_decode_garbage_base64() {
        assert!(matches!(decode_cache("%%%not-base64%%%"), Err(ProtocolError::Base64(_))));
    }

    #[test]
    fn cache_decode_garbage_json() {
        let raw = STANDARD.encode(b"---\n:t: t\n");
        assert!(matches!(decode_cache(&raw), Err(ProtocolError::Json(_))));
    }

    #[test]
    fn cache_decode_non_mapping() {
        for value in [json!([1, 2]), json!("scalar"), json!(5), json!(null)] {
            let raw = STANDARD.encode(serde_json::to_vec(&value).unwrap());
            assert!(matches!(decode_cache(&raw), Err(ProtocolError::NotAMapping)));
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Cookies
    // ─────────────────────────────────────────────────────────────────────

    fn cookie_headers(values: &[&str]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for v in values {
            headers.append(COOKIE, HeaderValue::from_str(v).unwrap());
        }
        headers
    }

    #[test]
    fn find_cookie_by_name() {
        let headers = cookie_headers(&["a=1; _rpin_ctxt=abcdefg--200; b=2"]);
        assert_eq!(find_cookie(&headers, CONTEXT_COOKIE).as_deref(), Some("abcdefg--200"));
        assert_eq!(find_cookie(&headers, "b").as_deref(), Some("2"));
        assert_eq!(find_cookie(&headers, CACHE_COOKIE), None);
    }

    #[test]
    fn find_cookie_survives_non_ascii_neighbours() {
        let mut headers = HeaderMap::new();
        headers.append(
            COOKIE,
            HeaderValue::from_bytes("_rpin_ctxt=abcdefg--200; other=café".as_bytes()).unwrap(),
        );
        assert_eq!(find_cookie(&headers, CONTEXT_COOKIE).as_deref(), Some("abcdefg--200"));
        assert_eq!(find_cookie(&headers, "other").as_deref(), Some("café"));

        let mut headers = HeaderMap::new();
        headers.append(
            COOKIE,
            HeaderValue::from_bytes(b"junk=\xff\xfe; _rpin_ctxt=abcdefg--200").unwrap(),
        );
        assert_eq!(find_cookie(&headers, CONTEXT_COOKIE).as_deref(), Some("abcdefg--200"));
        assert_eq!(find_cookie(&headers, "junk"), None);
    }

    #[test]
    fn find_cookie_across_headers_and_quotes() {
        let headers = cookie_headers(&["a=1", "_rpin_cache=\"e30=\""]);
        assert_eq!(find_cookie(&headers, CACHE_COOKIE).as_deref(), Some("e30="));
    }

    #[test]
    fn find_cookie_keeps_padding() {
        let headers = cookie_headers(&["_rpin_cache=eyJ0IjoidCJ9; path=/"]);
        assert_eq!(find_cookie(&headers, CACHE_COOKIE).as_deref(), Some("eyJ0IjoidCJ9"));
        let headers = cookie_headers(&["_rpin_cache=e30="]);
        assert_eq!(find_cookie(&headers, CACHE_COOKIE).as_deref(), Some("e30="));
    }

    #[test]
    fn set_cookie_defaults() {
        let cookie = SetCookie::new(CONTEXT_COOKIE, "abcdefg--200");
        assert_eq!(
            cookie.to_string(),
            "_rpin_ctxt=abcdefg--200; path=/; max-age=5; HttpOnly"
        );
        assert!(cookie.to_header_value().is_ok());
    }

    #[test]
    fn set_cookie_optional_attributes() {
        let mut cookie = SetCookie::new("n", "v");
        cookie.secure = true;
        cookie.same_site = Some(SameSite::Lax);
        cookie.max_age = 30;
        assert_eq!(
            cookie.to_string(),
            "n=v; path=/; max-age=30; HttpOnly; Secure; SameSite=Lax"
        );
    }
}
