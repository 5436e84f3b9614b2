//! Widget actions queued from UI to backend worker.

pub enum BackendCommand {
    SetTag { tag: String },
    AddUser,
    GetRecommendations,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::SetTag { .. } => "set_tag",
            BackendCommand::AddUser => "add_user",
            BackendCommand::GetRecommendations => "get_recommendations",
        }
    }
}
