/// Action keyword emitted by the model at the start of each reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Run,
    Ask,
    Complete,
    Stopped,
    Unrecognized,
}

impl ActionKind {
    fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "RUN" => ActionKind::Run,
            "ASK" => ActionKind::Ask,
            "TASK_COMPLETE" => ActionKind::Complete,
            "TASK_STOPPED" => ActionKind::Stopped,
            _ => ActionKind::Unrecognized,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Run => "RUN",
            ActionKind::Ask => "ASK",
            ActionKind::Complete => "TASK_COMPLETE",
            ActionKind::Stopped => "TASK_STOPPED",
            ActionKind::Unrecognized => "UNRECOGNIZED",
        }
    }
}

/// One model reply split into its action and payload.
///
/// A `Run` or `Ask` with an empty payload is still reported under its own kind;
/// callers check [`ParsedAction::is_malformed`] before acting on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAction {
    pub kind: ActionKind,
    /// Uppercased leading token, as the model wrote it.
    pub keyword: String,
    pub payload: String,
    /// The trimmed reply the action was parsed from.
    pub raw: String,
}

impl ParsedAction {
    pub fn is_malformed(&self) -> bool {
        matches!(self.kind, ActionKind::Run | ActionKind::Ask) && self.payload.is_empty()
    }
}

pub fn parse_action(reply: &str) -> ParsedAction {
    let raw = reply.trim();
    let (keyword, payload) = match raw.find([' ', '\n']) {
        None => (raw.to_uppercase(), String::new()),
        Some(idx) => (
            raw[..idx].trim_end_matches('\r').to_uppercase(),
            raw[idx + 1..].trim().to_string(),
        ),
    };

    let kind = ActionKind::from_keyword(&keyword);
    let payload = if kind == ActionKind::Unrecognized {
        raw.to_string()
    } else {
        payload
    };

    ParsedAction {
        kind,
        keyword,
        payload,
        raw: raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_keyword_has_empty_payload() {
        for reply in ["TASK_COMPLETE", "task_stopped", "Run", "ask"] {
            let action = parse_action(reply);
            assert_eq!(action.keyword, reply.to_uppercase());
            assert!(action.payload.is_empty(), "{reply}");
        }
        assert_eq!(parse_action("task_complete").kind, ActionKind::Complete);
        assert_eq!(parse_action("TASK_STOPPED").kind, ActionKind::Stopped);
    }

    #[test]
    fn run_payload_is_trimmed_and_may_span_lines() {
        let action = parse_action("RUN   ls -la  ");
        assert_eq!(action.kind, ActionKind::Run);
        assert_eq!(action.payload, "ls -la");

        let action = parse_action("  run\nfor f in *; do\n  echo $f\ndone\n");
        assert_eq!(action.kind, ActionKind::Run);
        assert_eq!(action.payload, "for f in *; do\n  echo $f\ndone");
    }

    #[test]
    fn ask_on_next_line() {
        let action = parse_action("ASK\nWhich directory should I use?");
        assert_eq!(action.kind, ActionKind::Ask);
        assert_eq!(action.payload, "Which directory should I use?");
        assert!(!action.is_malformed());
    }

    #[test]
    fn crlf_after_keyword_is_tolerated() {
        let action = parse_action("RUN\r\necho hi");
        assert_eq!(action.kind, ActionKind::Run);
        assert_eq!(action.payload, "echo hi");
    }

    #[test]
    fn completion_keeps_summary_payload() {
        let action = parse_action("TASK_COMPLETE done, 3 files converted");
        assert_eq!(action.kind, ActionKind::Complete);
        assert_eq!(action.payload, "done, 3 files converted");
    }

    #[test]
    fn unknown_keyword_carries_full_reply() {
        let action = parse_action("  Sure! Here is the command: ls  ");
        assert_eq!(action.kind, ActionKind::Unrecognized);
        assert_eq!(action.keyword, "SURE!");
        assert_eq!(action.payload, "Sure! Here is the command: ls");
        assert_eq!(action.raw, action.payload);
    }

    #[test]
    fn code_fence_is_not_stripped() {
        let action = parse_action("```bash\nls\n```");
        assert_eq!(action.kind, ActionKind::Unrecognized);
    }

    #[test]
    fn empty_reply_is_unrecognized() {
        let action = parse_action("   \n ");
        assert_eq!(action.kind, ActionKind::Unrecognized);
        assert!(action.keyword.is_empty());
        assert!(action.payload.is_empty());
    }

    #[test]
    fn empty_run_and_ask_are_malformed() {
        assert!(parse_action("RUN").is_malformed());
        assert!(parse_action("ASK   ").is_malformed());
        assert!(parse_action("RUN \n  ").is_malformed());
        assert!(!parse_action("TASK_COMPLETE").is_malformed());
    }
}
