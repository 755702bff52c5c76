use actix_web::cookie::{time::Duration, Cookie};
use actix_web::dev::ServiceRequest;
use actix_web::http::header::{self, HeaderMap};

/// Name of the httpOnly cookie carrying the session token for browser clients.
pub const SESSION_COOKIE: &str = "jwt";
/// Value written over the session cookie on logout.
pub const LOGGED_OUT: &str = "loggedout";

pub fn session_cookie(token: &str, secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token.to_owned())
        .path("/")
        .http_only(true)
        .secure(secure)
        .max_age(Duration::days(7))
        .finish()
}

/// Overwrites the session cookie with a sentinel that expires in ten seconds.
///
/// Tokens are stateless: a copy of the token held elsewhere stays valid until `exp`.
pub fn logout_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, LOGGED_OUT)
        .path("/")
        .http_only(true)
        .secure(secure)
        .max_age(Duration::seconds(10))
        .finish()
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
}

/// The `Authorization: Bearer` header wins over the session cookie.
pub fn token_from_request(req: &ServiceRequest) -> Option<String> {
    bearer_token(req.headers()).or_else(|| {
        req.cookie(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_owned())
            .filter(|value| !value.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc.def.ghi", true);
        assert_eq!(cookie.name(), "jwt");
        assert_eq!(cookie.value(), "abc.def.ghi");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.max_age(), Some(Duration::days(7)));

        let cleared = logout_cookie(false);
        assert_eq!(cleared.value(), LOGGED_OUT);
        assert_eq!(cleared.max_age(), Some(Duration::seconds(10)));
    }

    #[test]
    fn test_header_takes_precedence_over_cookie() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer from-header"))
            .cookie(Cookie::new(SESSION_COOKIE, "from-cookie"))
            .to_srv_request();
        assert_eq!(token_from_request(&req).as_deref(), Some("from-header"));

        let req = TestRequest::default()
            .cookie(Cookie::new(SESSION_COOKIE, "from-cookie"))
            .to_srv_request();
        assert_eq!(token_from_request(&req).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn test_missing_or_malformed_header() {
        let req = TestRequest::default().to_srv_request();
        assert!(token_from_request(&req).is_none());

        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Basic dXNlcjpwYXNz"))
            .to_srv_request();
        assert!(token_from_request(&req).is_none());

        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer "))
            .to_srv_request();
        assert!(token_from_request(&req).is_none());
    }
}
