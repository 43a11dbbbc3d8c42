use crate::Config;

/// Assemble the RFC 822 text for one plain-text mail.
///
/// Header order is fixed: From, To, Subject, MIME-Version, Content-Type.
/// Lines are CRLF-joined, an empty line separates headers from the body, and
/// the body ends with a trailing CRLF.
pub(crate) fn format_message(config: &Config) -> String {
    let headers = [
        format!("From: {} <{}>", config.from_name, config.from),
        format!("To: {}", config.to),
        format!("Subject: {}", config.subject),
        "MIME-Version: 1.0".to_string(),
        "Content-Type: text/plain; charset=UTF-8".to_string(),
    ];

    format!("{}\r\n\r\n{}\r\n", headers.join("\r\n"), config.body)
}
