pub const CSRF_COOKIE: &str = "csrftoken";
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Looks up `name` in a `Cookie` or `Set-Cookie` header value
/// (`a=1; csrftoken=abc; Path=/`).
pub fn find_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value.trim())
    })
}

/// Extracts the CSRF token from a sequence of `Set-Cookie` header values.
pub fn csrf_from_set_cookie<'a, I>(headers: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    headers
        .into_iter()
        .find_map(|header| find_cookie(header, CSRF_COOKIE))
        .filter(|token| !token.is_empty())
        .map(String::from)
}
