use rampart_core::HttpRequest;

/// Find the token a client submitted with `request`.
///
/// Looks at the `header` first, then a `field` in a form or JSON body, then
/// a query parameter named `field`.
pub fn submitted_token(request: &HttpRequest, header: &str, field: &str) -> Option<String> {
    from_header(request, header)
        .or_else(|| from_body(request, field))
        .or_else(|| request.query(field).cloned())
}

fn from_header(request: &HttpRequest, header: &str) -> Option<String> {
    request
        .header(header)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn from_body(request: &HttpRequest, field: &str) -> Option<String> {
    if request.body.is_empty() {
        return None;
    }

    match request.content_type().as_deref() {
        Some("application/x-www-form-urlencoded") => from_form(&request.body, field),
        Some(ct) if ct == "application/json" || ct.ends_with("+json") => {
            from_json(&request.body, field)
        }
        // Unlabelled bodies: try both encodings
        None => from_json(&request.body, field).or_else(|| from_form(&request.body, field)),
        Some(_) => None,
    }
}

fn from_form(body: &[u8], field: &str) -> Option<String> {
    serde_urlencoded::from_bytes::<Vec<(String, String)>>(body)
        .ok()?
        .into_iter()
        .find(|(key, _)| key == field)
        .map(|(_, value)| value)
}

fn from_json(body: &[u8], field: &str) -> Option<String> {
    let json = serde_json::from_slice::<serde_json::Value>(body).ok()?;
    json.get(field)?.as_str().map(str::to_string)
}
