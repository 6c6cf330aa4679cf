//! Process exit codes.

use crate::agent::AgentError;

/// Task completed, stopped by the model, or aborted by the operator.
pub const OK: i32 = 0;
/// Configuration or chat endpoint failure.
pub const FAILURE: i32 = 1;

/// Operator rejections and quits end the run cleanly; everything else is a failure.
pub fn for_error(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<AgentError>() {
        Some(agent_err) if agent_err.is_user_abort() => OK,
        _ => FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ChatError;
    use anyhow::{Context, anyhow};

    #[test]
    fn operator_aborts_exit_cleanly() {
        let rejected = anyhow::Error::from(AgentError::Rejected(
            "user rejected command, terminating".to_string(),
        ));
        assert_eq!(for_error(&rejected), OK);
        assert_eq!(for_error(&anyhow::Error::from(AgentError::Quit)), OK);
    }

    #[test]
    fn chat_and_config_failures_exit_with_failure() {
        let chat = anyhow::Error::from(AgentError::Chat(ChatError::Protocol(
            "chat endpoint returned 500".to_string(),
        )));
        assert_eq!(for_error(&chat), FAILURE);

        let io = anyhow::Error::from(AgentError::Io(std::io::Error::other("stdin closed")));
        assert_eq!(for_error(&io), FAILURE);

        let config: anyhow::Result<()> =
            Err(anyhow!("expected value at line 1")).context("Invalid config: /tmp/config.json");
        assert_eq!(for_error(&config.unwrap_err()), FAILURE);
    }
}
