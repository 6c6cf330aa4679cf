use std::io::{self, IsTerminal, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

pub fn truncate_with_suffix(text: &str, max_chars: usize, suffix: &str) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut_at, _)) => format!("{}{}", &text[..cut_at], suffix),
        None => text.to_string(),
    }
}

pub fn prefix_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut_at, _)) => text[..cut_at].to_string(),
        None => text.to_string(),
    }
}

const TICK: Duration = Duration::from_millis(250);

fn status_line(state: &str, label: &str, elapsed: Duration) -> String {
    format!("\r({state} {label} {}s)", elapsed.as_secs())
}

/// Elapsed-time ticker for the model call and the shell command, the two steps
/// that can block a run for minutes. It only draws when stdout is a terminal,
/// so piped transcripts keep just the step markers and prompts.
pub struct WorkingStatus {
    label: String,
    start: Instant,
    done: Arc<AtomicBool>,
    ticker: Option<thread::JoinHandle<()>>,
}

impl WorkingStatus {
    pub fn start(label: impl Into<String>) -> Self {
        Self::with_output(label, io::stdout().is_terminal())
    }

    fn with_output(label: impl Into<String>, live: bool) -> Self {
        let label = label.into();
        let start = Instant::now();
        let done = Arc::new(AtomicBool::new(false));

        let ticker = live.then(|| {
            let done = Arc::clone(&done);
            let label = label.clone();
            thread::spawn(move || {
                while !done.load(Ordering::Relaxed) {
                    print!("{}", status_line("working", &label, start.elapsed()));
                    let _ = io::stdout().flush();
                    thread::sleep(TICK);
                }
            })
        });

        Self {
            label,
            start,
            done,
            ticker,
        }
    }

    #[cfg(test)]
    fn is_live(&self) -> bool {
        self.ticker.is_some()
    }

    /// Stops the ticker and leaves a final elapsed line in its place.
    pub fn finish(mut self) {
        if self.stop() {
            println!("{}", status_line("done", &self.label, self.start.elapsed()));
        }
    }

    /// Returns whether a ticker was running.
    fn stop(&mut self) -> bool {
        self.done.store(true, Ordering::Relaxed);
        match self.ticker.take() {
            Some(handle) => {
                let _ = handle.join();
                true
            }
            None => false,
        }
    }
}

impl Drop for WorkingStatus {
    fn drop(&mut self) {
        if self.stop() {
            print!("\r");
            let _ = io::stdout().flush();
        }
    }
}
