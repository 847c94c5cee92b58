use actix_web::HttpRequest;
use chrono::Local;

// One line in combined log format, plus the error message when there is one
pub fn log_request(req: &HttpRequest, status_code: u16, error_message: Option<&str>) -> String {
    let header = |name: &str, default: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(default)
            .to_string()
    };
    let referer = header("Referer", "-");
    let user_agent = header("User-Agent", "unknown");
    let origin = header("Origin", "-");
    let client_ip = req
        .connection_info()
        .realip_remote_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let line = format!(
        "{client_ip} - - [{time}] \"{method} {uri} {version:?}\" {status_code} \"{referer}\" \"{user_agent}\" \"{origin}\"",
        client_ip = client_ip,
        time = Local::now().format("%d/%b/%Y:%H:%M:%S %z"),
        method = req.method(),
        uri = req.uri(),
        version = req.version(),
        status_code = status_code,
        referer = referer,
        user_agent = user_agent,
        origin = origin,
    );

    match error_message {
        Some(msg) => format!("{} \"{}\"", line, msg),
        None => line,
    }
}
