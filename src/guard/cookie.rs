use axum::http::{header::COOKIE, HeaderMap};

/// Find a cookie by name across every `Cookie` header on the request.
#[must_use]
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (key, val) = pair.trim().split_once('=')?;
            (key.trim() == name).then(|| val.trim())
        })
}

/// A cookie counts as a session when it exists and is not blank. The value is
/// never inspected beyond that.
#[must_use]
pub fn auth_present(headers: &HeaderMap, name: &str) -> bool {
    cookie_value(headers, name).is_some_and(|value| !value.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(cookies: &[&str]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for cookie in cookies {
            headers.append(COOKIE, HeaderValue::from_str(cookie).unwrap());
        }
        headers
    }

    #[test]
    fn finds_cookie_among_others() {
        let headers = headers(&["theme=dark; authToken=abc.def; lang=en"]);
        assert_eq!(cookie_value(&headers, "authToken"), Some("abc.def"));
        assert!(auth_present(&headers, "authToken"));
    }

    #[test]
    fn finds_cookie_in_second_header() {
        let headers = headers(&["theme=dark", "authToken=xyz"]);
        assert!(auth_present(&headers, "authToken"));
    }

    #[test]
    fn blank_cookie_is_absent() {
        assert!(!auth_present(&headers(&["authToken="]), "authToken"));
        assert!(!auth_present(&headers(&["authToken=  "]), "authToken"));
    }

    #[test]
    fn missing_cookie_is_absent() {
        assert!(!auth_present(&HeaderMap::new(), "authToken"));
        assert!(!auth_present(&headers(&["authTokenX=1"]), "authToken"));
    }
}
