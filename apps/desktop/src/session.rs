//! Interactive terminal session driving a [`WidgetController`].

use std::{future::Future, sync::Arc};

use anyhow::Result;
use client_core::{ClientError, WidgetController, WidgetState};
use shared::protocol::RefreshOptions;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::watch,
};

use crate::render::{describe_changes, recommendation_lines, users_line};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    SetTag(String),
    AddUser(Option<String>),
    Select(String),
    Recommend,
    Refresh(RefreshOptions),
    Show,
    Help,
    Quit,
}

const HELP: &str = "\
commands:
  tag <text>                 set the current tag
  add [tag]                  register the current (or given) tag
  select <tag>               select a registered user
  recs                       fetch recommendations for the selected user
  refresh [top_n] [cutoff]   regenerate recommendations on the backend
  show                       print users and recommendations
  help                       this text
  quit                       leave the session";

pub fn parse_command(line: &str) -> Result<SessionCommand, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (word, rest) = match line.trim_start().split_once(' ') {
        Some((word, rest)) => (word, rest),
        None => (line.trim(), ""),
    };

    match word {
        "tag" => Ok(SessionCommand::SetTag(rest.to_string())),
        "add" if rest.trim().is_empty() => Ok(SessionCommand::AddUser(None)),
        "add" => Ok(SessionCommand::AddUser(Some(rest.to_string()))),
        "select" => Ok(SessionCommand::Select(rest.trim().to_string())),
        "recs" | "recommend" => Ok(SessionCommand::Recommend),
        "refresh" => parse_refresh(rest).map(SessionCommand::Refresh),
        "show" | "users" => Ok(SessionCommand::Show),
        "help" | "?" => Ok(SessionCommand::Help),
        "quit" | "exit" => Ok(SessionCommand::Quit),
        "" => Err(String::new()),
        other => Err(format!("unknown command '{other}', try 'help'")),
    }
}

fn parse_refresh(rest: &str) -> Result<RefreshOptions, String> {
    let mut options = RefreshOptions::default();
    let mut numbers = rest.split_whitespace().map(|raw| {
        raw.parse::<u32>()
            .map_err(|_| format!("expected a number, got '{raw}'"))
    });
    if let Some(top_n) = numbers.next() {
        options.top_n = top_n?;
    }
    if let Some(pop_cutoff) = numbers.next() {
        options.pop_cutoff = pop_cutoff?;
    }
    if numbers.next().is_some() {
        return Err("refresh takes at most two numbers".to_string());
    }
    Ok(options)
}

/// Runs one command, handing every line meant for the user to `emit`.
async fn execute(
    controller: &WidgetController,
    command: SessionCommand,
    emit: &mut impl FnMut(String),
) {
    let before = controller.state();
    let loading = controller.subscribe();
    let result = match command {
        SessionCommand::SetTag(tag) => {
            controller.set_tag(tag);
            return;
        }
        SessionCommand::Select(tag) => {
            controller.select_user(&tag);
            return;
        }
        SessionCommand::Show => {
            state_lines(&before).into_iter().for_each(&mut *emit);
            return;
        }
        SessionCommand::Help => {
            emit(HELP.to_string());
            return;
        }
        SessionCommand::Quit => return,
        SessionCommand::AddUser(tag) => {
            if let Some(tag) = tag {
                controller.set_tag(tag);
            }
            announce_loading(loading, controller.add_user(), emit).await
        }
        SessionCommand::Recommend => {
            announce_loading(loading, controller.get_recommendations(), emit).await
        }
        SessionCommand::Refresh(options) => {
            announce_loading(loading, controller.refresh_recommendations(options), emit).await
        }
    };

    let after = controller.state();
    match result {
        Ok(()) => describe_changes(&before, &after)
            .into_iter()
            .for_each(&mut *emit),
        Err(ClientError::Busy) => emit("busy: wait for the current request to finish".to_string()),
        Err(err) => emit(format!(
            "error: {}",
            after.error.unwrap_or_else(|| err.to_string())
        )),
    }
}

/// Emits "Loading…" once the operation has a request in flight.
async fn announce_loading<F>(
    mut state: watch::Receiver<WidgetState>,
    operation: F,
    emit: &mut impl FnMut(String),
) -> Result<(), ClientError>
where
    F: Future<Output = Result<(), ClientError>>,
{
    tokio::pin!(operation);
    tokio::select! {
        biased;
        result = &mut operation => return result,
        Ok(()) = async { state.wait_for(|snapshot| snapshot.loading).await.map(|_| ()) } => {
            emit("Loading…".to_string());
        }
    }
    operation.await
}

fn state_lines(state: &WidgetState) -> Vec<String> {
    let mut lines = vec![users_line(state)];
    if !state.tag.is_empty() {
        lines.push(format!("Selected: {}", state.tag));
    }
    if let Some(error) = &state.error {
        lines.push(format!("error: {error}"));
    }
    lines.extend(recommendation_lines(&state.recommendations));
    lines
}

pub async fn run(controller: Arc<WidgetController>) -> Result<()> {
    println!("{HELP}");
    let mut print = |line: String| println!("{line}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(SessionCommand::Quit) => break,
            Ok(command) => execute(&controller, command, &mut print).await,
            Err(message) if message.is_empty() => {}
            Err(message) => println!("{message}"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use client_core::{HttpRecommendationApi, RecommendationApi, RequestError};
    use shared::domain::{Recommendation, StoredRecommendation};

    /// Answers after yielding once, so the request is in flight for one poll.
    struct SlowApi;

    #[async_trait]
    impl RecommendationApi for SlowApi {
        async fn create_user(&self, _tag: &str) -> Result<(), RequestError> {
            tokio::task::yield_now().await;
            Ok(())
        }

        async fn recommendations(&self, _tag: &str) -> Result<Vec<Recommendation>, RequestError> {
            tokio::task::yield_now().await;
            Ok(vec![Recommendation::new("X", "Y", "http://z")])
        }

        async fn refresh_recommendations(
            &self,
            tag: &str,
            _options: RefreshOptions,
        ) -> Result<Vec<Recommendation>, RequestError> {
            self.recommendations(tag).await
        }

        async fn cached_recommendations(
            &self,
            _tag: &str,
            _limit: u32,
        ) -> Result<Vec<StoredRecommendation>, RequestError> {
            Ok(Vec::new())
        }
    }

    async fn run_lines(controller: &WidgetController, input: &str) -> Vec<String> {
        let mut output = Vec::new();
        let command = parse_command(input).expect("command");
        execute(controller, command, &mut |line: String| output.push(line)).await;
        output
    }

    #[test]
    fn parses_tag_keeping_inner_whitespace() {
        assert_eq!(
            parse_command("tag dj shadow"),
            Ok(SessionCommand::SetTag("dj shadow".to_string()))
        );
        assert_eq!(parse_command("tag"), Ok(SessionCommand::SetTag(String::new())));
    }

    #[test]
    fn parses_add_with_and_without_tag() {
        assert_eq!(parse_command("add"), Ok(SessionCommand::AddUser(None)));
        assert_eq!(parse_command("add   "), Ok(SessionCommand::AddUser(None)));
        assert_eq!(
            parse_command("add alice"),
            Ok(SessionCommand::AddUser(Some("alice".to_string())))
        );
    }

    #[test]
    fn parses_refresh_knobs() {
        assert_eq!(
            parse_command("refresh"),
            Ok(SessionCommand::Refresh(RefreshOptions::default()))
        );
        assert_eq!(
            parse_command("refresh 5 10"),
            Ok(SessionCommand::Refresh(RefreshOptions {
                top_n: 5,
                pop_cutoff: 10
            }))
        );
        assert!(parse_command("refresh many").is_err());
        assert!(parse_command("refresh 1 2 3").is_err());
    }

    #[test]
    fn blank_and_unknown_lines() {
        assert_eq!(parse_command("   "), Err(String::new()));
        assert!(parse_command("dance")
            .expect_err("unknown")
            .contains("unknown command"));
        assert_eq!(parse_command("quit\r\n"), Ok(SessionCommand::Quit));
    }

    #[tokio::test]
    async fn repeated_validation_failure_is_printed_every_time() {
        let controller = WidgetController::new(Arc::new(SlowApi));

        for _ in 0..2 {
            assert_eq!(
                run_lines(&controller, "recs").await,
                vec!["error: Select a user first"]
            );
        }
        for _ in 0..2 {
            assert_eq!(
                run_lines(&controller, "add").await,
                vec!["error: Please enter a user tag"]
            );
        }
    }

    #[tokio::test]
    async fn repeated_request_failure_is_printed_every_time() {
        let api = HttpRecommendationApi::new("http://127.0.0.1:9").expect("api");
        let controller = WidgetController::new(Arc::new(api));
        run_lines(&controller, "select ..").await;

        for _ in 0..2 {
            assert_eq!(
                run_lines(&controller, "recs").await,
                vec!["error: '..' cannot be used as a user tag"]
            );
        }
        assert!(run_lines(&controller, "show")
            .await
            .contains(&"error: '..' cannot be used as a user tag".to_string()));
    }

    #[tokio::test]
    async fn in_flight_request_prints_loading_before_results() {
        let controller = WidgetController::new(Arc::new(SlowApi));

        assert_eq!(
            run_lines(&controller, "add alice").await,
            vec!["Loading…", "Users: alice"]
        );
        assert_eq!(
            run_lines(&controller, "recs").await,
            vec!["Loading…", " 1. X by Y  ▶ http://z"]
        );
        assert!(!controller.state().loading);
    }
}
