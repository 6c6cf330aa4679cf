use std::env;
use std::fmt;

const DEFAULT_POSIX_SHELL: &str = "/bin/bash";

/// Shell used to run model commands, together with how it takes a command string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shell {
    Posix(String),
    PowerShell,
    Cmd,
}

impl Shell {
    pub fn program(&self) -> &str {
        match self {
            Shell::Posix(path) => path,
            Shell::PowerShell => "powershell.exe",
            Shell::Cmd => "cmd.exe",
        }
    }

    /// Switch that makes the shell execute the following argument as a command string.
    pub fn command_switch(&self) -> &'static str {
        match self {
            Shell::Posix(_) => "-c",
            Shell::PowerShell => "-Command",
            Shell::Cmd => "/C",
        }
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

#[derive(Debug, Clone)]
pub struct Environment {
    pub os: String,
    pub shell: Shell,
    pub cwd: String,
}

impl Environment {
    pub fn detect() -> Self {
        let os = env::consts::OS.to_string();
        let shell = detect_shell(&os, env::var("SHELL").ok().as_deref());
        let cwd = env::current_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| "UNKNOWN".to_string());
        Self { os, shell, cwd }
    }
}

pub fn detect_shell(os: &str, shell_var: Option<&str>) -> Shell {
    if os == "windows" {
        let is_powershell = shell_var
            .map(|s| s.to_lowercase().contains("powershell"))
            .unwrap_or(false);
        return if is_powershell {
            Shell::PowerShell
        } else {
            Shell::Cmd
        };
    }

    match shell_var.map(str::trim) {
        Some(path) if !path.is_empty() => Shell::Posix(path.to_string()),
        _ => Shell::Posix(DEFAULT_POSIX_SHELL.to_string()),
    }
}
