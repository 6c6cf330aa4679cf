use crate::config::Config;
use crate::environment::Environment;

const PROTOCOL_RULES: &str = "\
RULES:
1. I will send you the result of the previous command or user input as a 'user' message.
2. After executing a command that *should* complete the task, you MUST execute a final verification command (e.g., 'ls', 'cat', 'grep') and confirm the output matches the goal before proceeding.
3. You MUST strictly adhere to the following output protocol, starting with the action keyword:
   - To run a command: Use \"RUN\" followed by the command on the same line or the next line. The command MUST NOT contain any code fences.
   - To ask for clarification: Use \"ASK\" followed by the question on the same line or the next line.
   - If the task is VERIFIED and the goal state is achieved, output ONLY \"TASK_COMPLETE\".
   - If you determine the task cannot be completed or requires external human action, output ONLY \"TASK_STOPPED\".
4. Your command lines MUST be a single line appropriate for the detected SHELL.
";

/// Builds the system instruction sent ahead of the history on every call.
pub fn build_system_prompt(task: &str, env: &Environment, cfg: &Config) -> String {
    let mut prompt = String::new();
    prompt.push_str("You are an autonomous shell agent called 'shai' (Shell AI).\n\n");
    prompt.push_str(&format!("YOUR CORE MISSION: {task}\n\n"));
    prompt.push_str("CURRENT ENVIRONMENT:\n");
    prompt.push_str(&format!("OS: {}\n", env.os));
    prompt.push_str(&format!("SHELL: {}\n", env.shell));
    prompt.push_str(&format!("PWD: {}\n\n", env.cwd));
    if let Some(extra) = cfg.additional_context() {
        prompt.push_str("ADDITIONAL CONTEXT:\n");
        prompt.push_str(extra);
        prompt.push_str("\n\n");
    }
    prompt.push_str(PROTOCOL_RULES);
    prompt.push_str(
        "\nYour first response, when you receive \"START\", MUST be the first action (RUN or ASK).\n",
    );
    prompt
}
