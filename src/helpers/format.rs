/// Describe a failed store call for the operator: "409 conflict", "404",
/// or "no response" when the request never reached the server.
pub fn format_failure(status: Option<u16>, body: Option<&str>) -> String {
    match (status, body.map(str::trim).filter(|b| !b.is_empty())) {
        (Some(status), Some(body)) => format!("{status} {body}"),
        (Some(status), None) => status.to_string(),
        (None, Some(body)) => body.to_string(),
        (None, None) => "no response".to_string(),
    }
}
