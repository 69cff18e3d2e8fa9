//! Runs shell commands without blocking the event loop.
//!
//! Each command runs `bash -c <command>` on its own worker thread. Results come
//! back over a channel and are turned into `CommandFinished` events when the
//! event loop calls [`CommandRunner::poll`]. The hub itself never crosses
//! threads.

use crate::error::{NotasError, Result};
use crate::hub::{Event, NotificationHub};
use log::{info, warn};
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

const SHELL: &str = "bash";

#[derive(Debug)]
struct Completion {
    command: String,
    outcome: std::result::Result<(), String>,
}

impl Completion {
    fn into_event(self) -> Event {
        match self.outcome {
            Ok(()) => Event::CommandFinished {
                message: format!("Command finished: {}", self.command),
                command: self.command,
                success: true,
            },
            Err(cause) => Event::CommandFinished {
                message: format!("Command '{}' failed: {}", self.command, cause),
                command: self.command,
                success: false,
            },
        }
    }
}

#[derive(Debug)]
pub struct CommandRunner {
    sender: Sender<Completion>,
    receiver: Receiver<Completion>,
    pending: usize,
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            pending: 0,
        }
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn spawn(&mut self, command: &str) -> Result<()> {
        let command = command.trim().to_string();
        if command.is_empty() {
            return Err(NotasError::Validation("command cannot be empty".to_string()));
        }

        let sender = self.sender.clone();
        let job = command.clone();
        thread::Builder::new()
            .name("notas-command".to_string())
            .spawn(move || {
                let outcome = run_shell(&job);
                // Receiver gone means the runner was dropped; nobody to tell.
                let _ = sender.send(Completion {
                    command: job,
                    outcome,
                });
            })
            .map_err(NotasError::Io)?;

        info!("event=command_spawned module=shell command={}", command);
        self.pending += 1;
        Ok(())
    }

    /// Publishes every completion received so far. Never blocks.
    pub fn poll(&mut self, hub: &NotificationHub) -> usize {
        let mut published = 0;
        while let Ok(completion) = self.receiver.try_recv() {
            self.finish(hub, completion);
            published += 1;
        }
        published
    }

    /// Blocks until every spawned command has completed and been published.
    pub fn wait_all(&mut self, hub: &NotificationHub) -> usize {
        let mut published = 0;
        while self.pending > 0 {
            match self.receiver.recv() {
                Ok(completion) => {
                    self.finish(hub, completion);
                    published += 1;
                }
                Err(_) => break,
            }
        }
        published
    }

    fn finish(&mut self, hub: &NotificationHub, completion: Completion) {
        self.pending = self.pending.saturating_sub(1);
        if let Err(cause) = &completion.outcome {
            warn!(
                "event=command_finished module=shell status=error command={} error={}",
                completion.command, cause
            );
        } else {
            info!(
                "event=command_finished module=shell status=ok command={}",
                completion.command
            );
        }
        hub.publish(completion.into_event());
    }
}

fn run_shell(command: &str) -> std::result::Result<(), String> {
    let output = Command::new(SHELL)
        .arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|err| format!("could not start {SHELL}: {err}"))?;

    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    let status = match output.status.code() {
        Some(code) => format!("exit status {code}"),
        None => "terminated by signal".to_string(),
    };
    if stderr.trim().is_empty() {
        Err(status)
    } else {
        Err(format!("{}: {}", status, stderr.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hub::EventKind;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_hub() -> (NotificationHub, Rc<RefCell<Vec<Event>>>) {
        let hub = NotificationHub::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        hub.subscribe(EventKind::CommandFinished, move |e| {
            sink.borrow_mut().push(e.clone());
            Ok(())
        });
        (hub, seen)
    }

    #[test]
    fn test_empty_command_rejected() {
        let mut runner = CommandRunner::new();
        assert!(matches!(
            runner.spawn("   "),
            Err(NotasError::Validation(_))
        ));
        assert_eq!(runner.pending(), 0);
    }

    #[test]
    fn test_successful_command_reports_completion() {
        let (hub, seen) = recording_hub();
        let mut runner = CommandRunner::new();
        runner.spawn("true").unwrap();

        assert_eq!(runner.wait_all(&hub), 1);
        assert_eq!(runner.pending(), 0);
        assert_eq!(
            seen.borrow()[0],
            Event::CommandFinished {
                command: "true".to_string(),
                success: true,
                message: "Command finished: true".to_string(),
            }
        );
    }

    #[test]
    fn test_failing_command_reports_failure() {
        let (hub, seen) = recording_hub();
        let mut runner = CommandRunner::new();
        runner.spawn("echo broken >&2; exit 3").unwrap();
        runner.wait_all(&hub);

        let seen = seen.borrow();
        match &seen[0] {
            Event::CommandFinished {
                success, message, ..
            } => {
                assert!(!success);
                assert!(message.contains("exit status 3"));
                assert!(message.contains("broken"));
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_poll_without_completions_does_nothing() {
        let (hub, seen) = recording_hub();
        let mut runner = CommandRunner::new();
        assert_eq!(runner.poll(&hub), 0);
        assert!(seen.borrow().is_empty());
    }
}
