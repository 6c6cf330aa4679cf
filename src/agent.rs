//! The think → act → observe loop.
//!
//! Each step asks the model for one action, mediates it through the operator and
//! the shell, and appends the observation to the history as a new user turn.
//! The system instruction is kept apart from the history and prepended by the
//! chat client on every call.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::action::{ActionKind, ParsedAction, parse_action};
use crate::executor::{CommandRunner, ExecutionResult};
use crate::gate::{Confirmation, Operator};
use crate::llm::{ChatClient, ChatError, ChatMessage};
use crate::util::truncate_with_suffix;

/// First user turn of every run.
pub const START_MESSAGE: &str = "START";

const OUTPUT_PREVIEW_CHARS: usize = 2000;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Ollama API call failed: {0}")]
    Chat(#[from] ChatError),
    #[error("{0}")]
    Rejected(String),
    #[error("operator quit")]
    Quit,
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl AgentError {
    /// Rejections and quits are the operator's call, not failures of the run.
    pub fn is_user_abort(&self) -> bool {
        matches!(self, AgentError::Rejected(_) | AgentError::Quit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finish {
    Completed,
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentOutcome {
    pub finish: Finish,
    /// Step on which the model declared the run finished.
    pub steps: usize,
    /// Text after the terminal keyword, if the model gave any.
    pub summary: String,
}

pub struct Agent<'a, C, R, O> {
    client: &'a C,
    runner: &'a R,
    operator: &'a mut O,
    system_prompt: String,
    history: Vec<ChatMessage>,
    step: usize,
}

impl<'a, C, R, O> Agent<'a, C, R, O>
where
    C: ChatClient,
    R: CommandRunner,
    O: Operator,
{
    pub fn new(system_prompt: String, client: &'a C, runner: &'a R, operator: &'a mut O) -> Self {
        Self {
            client,
            runner,
            operator,
            system_prompt,
            history: vec![ChatMessage::user(START_MESSAGE)],
            step: 1,
        }
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub async fn run(&mut self) -> Result<AgentOutcome, AgentError> {
        loop {
            println!("\n--- Step {} ---", self.step);
            println!("🤔 shai is thinking...");
            let reply = self
                .client
                .chat(&self.system_prompt, &self.history)
                .await?;
            self.history.push(ChatMessage::assistant(reply.as_str()));

            let action = parse_action(&reply);
            debug!(step = self.step, kind = action.kind.as_str(), "parsed model reply");

            match action.kind {
                ActionKind::Complete => {
                    println!("✅ shai has completed the task successfully.");
                    return Ok(self.finish(Finish::Completed, action));
                }
                ActionKind::Stopped => {
                    println!(
                        "🛑 shai has stopped the task, as it cannot proceed or needs human input."
                    );
                    return Ok(self.finish(Finish::Stopped, action));
                }
                ActionKind::Run | ActionKind::Ask if action.is_malformed() => {
                    self.recover_malformed(&action);
                }
                ActionKind::Run => self.run_command(&action.payload).await?,
                ActionKind::Ask => self.ask_operator(&action.payload)?,
                ActionKind::Unrecognized => self.recover_unrecognized(&action)?,
            }

            self.step += 1;
        }
    }

    fn finish(&self, finish: Finish, action: ParsedAction) -> AgentOutcome {
        if !action.payload.is_empty() {
            println!("{}", action.payload);
        }
        info!(steps = self.step, ?finish, "run finished");
        AgentOutcome {
            finish,
            steps: self.step,
            summary: action.payload,
        }
    }

    async fn run_command(&mut self, command: &str) -> Result<(), AgentError> {
        let prompt = format!("shai wants to run this command:\n\n  $ {command}\n\nAllow?");
        self.gate(&prompt, "user rejected command, terminating")?;

        println!("🚀 Running command via {}...", self.runner.shell());
        debug!(command, "executing");
        let result = self.runner.run(command).await;
        println!(
            "Status: {}\n{}",
            result.status,
            truncate_with_suffix(&result.output, OUTPUT_PREVIEW_CHARS, "\n[output truncated]")
        );
        self.history.push(ChatMessage::user(command_feedback(&result)));
        Ok(())
    }

    fn ask_operator(&mut self, question: &str) -> Result<(), AgentError> {
        let answer = self.operator.clarify(question)?;
        self.history
            .push(ChatMessage::user(format!("USER_CLARIFICATION: {answer}")));
        Ok(())
    }

    fn recover_malformed(&mut self, action: &ParsedAction) {
        let (what, missing) = match action.kind {
            ActionKind::Ask => ("ASK request", "question"),
            _ => ("RUN command", "command"),
        };
        warn!(step = self.step, keyword = %action.keyword, "model reply missing payload");
        println!(
            "⚠️ shai provided a malformed {what} (missing {missing}). Response:\n---\n{}\n---",
            action.raw
        );
        self.history.push(ChatMessage::user(format!(
            "CRITICAL ERROR: Previous response was {} but provided no {missing}. Full response was:\n{}",
            action.kind.as_str(),
            action.raw
        )));
    }

    fn recover_unrecognized(&mut self, action: &ParsedAction) -> Result<(), AgentError> {
        warn!(step = self.step, keyword = %action.keyword, "unrecognized model reply");
        println!(
            "⚠️ shai provided an UNRECOGNIZED response. Model response was:\n---\n{}\n---",
            action.raw
        );
        self.gate(
            "shai provided an unparseable response. Continue the loop?",
            "user rejected unparseable model output, terminating",
        )?;
        self.history.push(ChatMessage::user(format!(
            "UNPARSEABLE_RESPONSE_ERROR: Your previous response did not follow the protocol. Your previous output was:\n{}",
            action.payload
        )));
        Ok(())
    }

    fn gate(&mut self, prompt: &str, rejection: &str) -> Result<(), AgentError> {
        match self.operator.confirm(prompt)? {
            Confirmation::Approve => Ok(()),
            Confirmation::Reject => Err(AgentError::Rejected(rejection.to_string())),
            Confirmation::Quit => Err(AgentError::Quit),
        }
    }
}

fn command_feedback(result: &ExecutionResult) -> String {
    format!(
        "PREVIOUS_COMMAND_RESULT:\nSTATUS: {}\nOUTPUT:\n{}\n\n",
        result.status, result.output
    )
}
