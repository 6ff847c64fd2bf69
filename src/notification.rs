const APP_NAME: &str = "redakt";

/// Best-effort desktop notification; failures are only logged.
pub fn send(body: impl Into<String>) {
    let body = body.into();
    if let Err(err) = notify_rust::Notification::new()
        .appname(APP_NAME)
        .summary("Redakt")
        .body(&body)
        .show()
    {
        tracing::warn!("system notification failed: {err}");
    }
}
