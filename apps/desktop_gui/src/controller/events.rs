//! Backend-to-UI notices that are not part of the widget state.

pub enum UiEvent {
    Info(String),
    Error(String),
}

pub fn classify_backend_failure(message: &str) -> String {
    let lower = message.to_ascii_lowercase();
    if lower.contains("failed to build runtime") {
        "Backend worker startup failure; restart the app.".to_string()
    } else {
        format!("Backend error: {message}")
    }
}
