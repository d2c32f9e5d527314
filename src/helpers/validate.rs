// Validation helpers

use crate::models::{DEFAULT_MONGO_PORT, Server};

pub const REDACTED_PASSWORD: &str = "*****";

/// Check a password against its confirmation. Comparison is exact; no
/// trimming, so trailing whitespace counts.
pub fn password_confirmed(password: &str, confirmation: &str) -> bool {
    password == confirmation
}

/// Validate a storage resource id before it is used as a path segment.
pub fn validate_resource_id(id: &str) -> Result<(), String> {
    let id = id.trim();

    if id.is_empty() {
        return Err("Storage id is required".into());
    }

    if id.contains(['/', '?', '#']) {
        return Err("Storage id must not contain '/', '?' or '#'".into());
    }

    if id.chars().any(char::is_whitespace) {
        return Err("Storage id must not contain whitespace".into());
    }

    Ok(())
}

/// Parse a `host[:port]` server spec. The port defaults to 27017.
/// "db1" → db1:27017
/// "db1:27018" → db1:27018
pub fn parse_server(spec: &str) -> Result<Server, String> {
    let spec = spec.trim();
    if spec.is_empty() {
        return Err("Server is required".into());
    }

    let (host, port) = match spec.rsplit_once(':') {
        Some((host, port)) => {
            let port = port
                .parse::<u16>()
                .map_err(|_| format!("Invalid port '{port}' in server '{spec}'"))?;
            (host, port)
        }
        None => (spec, DEFAULT_MONGO_PORT),
    };

    if host.is_empty() {
        return Err(format!("Server '{spec}' must include a host"));
    }
    if port == 0 {
        return Err(format!("Server '{spec}' must use a non-zero port"));
    }

    Ok(Server::new(host, port))
}
