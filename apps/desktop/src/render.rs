//! Plain-text rendering of widget state for the terminal.

use client_core::WidgetState;
use shared::domain::Recommendation;

pub fn recommendation_line(index: usize, rec: &Recommendation) -> String {
    let mut line = format!("{:>2}. {} by {}", index + 1, rec.title, rec.artist);
    if rec.has_listen_link() {
        line.push_str(&format!("  ▶ {}", rec.uri));
    }
    line
}

pub fn recommendation_lines(recs: &[Recommendation]) -> Vec<String> {
    if recs.is_empty() {
        return vec!["No recommendations.".to_string()];
    }
    recs.iter()
        .enumerate()
        .map(|(index, rec)| recommendation_line(index, rec))
        .collect()
}

pub fn users_line(state: &WidgetState) -> String {
    if state.users.is_empty() {
        return "Users: (none)".to_string();
    }
    let users: Vec<&str> = state.users.iter().collect();
    format!("Users: {}", users.join(", "))
}

/// Result lines to print when an operation moves the store from `prev` to `next`.
pub fn describe_changes(prev: &WidgetState, next: &WidgetState) -> Vec<String> {
    let mut lines = Vec::new();
    if next.users != prev.users {
        lines.push(users_line(next));
    }
    if next.recommendations != prev.recommendations {
        lines.extend(recommendation_lines(&next.recommendations));
    }
    lines
}
