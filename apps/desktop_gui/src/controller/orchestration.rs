//! Command orchestration from UI actions to the backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut Option<String>,
) {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued ui->backend command"),
        Err(TrySendError::Full(_)) => {
            *status = Some("UI command queue is full; please retry".to_string());
        }
        Err(TrySendError::Disconnected(_)) => {
            *status = Some(
                "Backend command processor disconnected (possible startup/runtime failure); restart the app"
                    .to_string(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::bounded;

    use super::*;

    #[test]
    fn queues_command_without_touching_status() {
        let (tx, rx) = bounded(1);
        let mut status = None;

        dispatch_backend_command(&tx, BackendCommand::AddUser, &mut status);

        assert!(status.is_none());
        assert!(matches!(rx.try_recv(), Ok(BackendCommand::AddUser)));
    }

    #[test]
    fn reports_full_queue() {
        let (tx, _rx) = bounded(1);
        let mut status = None;

        dispatch_backend_command(&tx, BackendCommand::AddUser, &mut status);
        dispatch_backend_command(&tx, BackendCommand::GetRecommendations, &mut status);

        assert_eq!(
            status.as_deref(),
            Some("UI command queue is full; please retry")
        );
    }

    #[test]
    fn reports_disconnected_backend() {
        let (tx, rx) = bounded(1);
        drop(rx);
        let mut status = None;

        dispatch_backend_command(&tx, BackendCommand::GetRecommendations, &mut status);

        assert!(status.expect("status").contains("disconnected"));
    }
}
