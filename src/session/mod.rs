//! Session state machine for one editor/run/input cycle.
//!
//! Pure in-memory type: drivers (the TUI loop, the one-shot `run` handler)
//! feed it events and perform the actual network calls between transitions.
//! All mutation goes through `submit`, `keystroke` and `apply_outcome`, so a
//! driver that applies events one at a time gets serialized updates for free.

use crate::client::{flatten_error, ExecError, ExecOutcome};

/// Default editor contents on a first run with no saved draft.
pub const DEFAULT_CODE: &str = "# Write your Python code here\nprint(\"Hello, World!\")";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    AwaitingInput,
}

/// A submit was refused because a request is already outstanding. The
/// in-flight request is not aborted; the caller should tell the user to wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitRejected;

/// Keys the terminal forwards while the remote program waits for input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Enter,
}

#[derive(Debug)]
pub struct Session {
    pub code: String,
    /// Accumulated output across an interactive exchange. Cleared on submit.
    pub output: String,
    phase: Phase,
    input_buffer: String,
    /// Echoed-but-unflushed character count, so Backspace can retract the
    /// echo without eating remote output.
    echoed: usize,
    prompt_marker: String,
}

impl Session {
    pub fn new(code: String, prompt_marker: String) -> Self {
        Self {
            code,
            output: String::new(),
            phase: Phase::Idle,
            input_buffer: String::new(),
            echoed: 0,
            prompt_marker,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_awaiting_input(&self) -> bool {
        self.phase == Phase::AwaitingInput
    }

    pub fn input_buffer(&self) -> &str {
        &self.input_buffer
    }

    /// Begin a run. Valid only from `Idle`: at most one request is in flight
    /// per session, so a submit while `Running` or `AwaitingInput` is refused
    /// rather than raced. Returns the code to send.
    pub fn submit(&mut self) -> Result<String, SubmitRejected> {
        if self.phase != Phase::Idle {
            return Err(SubmitRejected);
        }
        self.output.clear();
        self.input_buffer.clear();
        self.echoed = 0;
        self.phase = Phase::Running;
        Ok(self.code.clone())
    }

    /// Apply the result of an `execute` or `send_input` round-trip.
    pub fn apply_outcome(&mut self, result: Result<ExecOutcome, ExecError>) {
        debug_assert_eq!(self.phase, Phase::Running);
        self.echoed = 0;
        match result {
            Ok(outcome) => {
                self.output.push_str(&outcome.output);
                self.phase = if self.pending_input(&outcome) {
                    Phase::AwaitingInput
                } else {
                    Phase::Idle
                };
            }
            Err(err) => {
                self.output.clear();
                self.output.push_str(flatten_error(&err));
                self.input_buffer.clear();
                self.phase = Phase::Idle;
            }
        }
    }

    /// Structured signal when the service provides one; substring heuristic
    /// against the newly returned text otherwise.
    fn pending_input(&self, outcome: &ExecOutcome) -> bool {
        match outcome.awaiting_input {
            Some(flag) => flag,
            None => outcome.output.contains(&self.prompt_marker),
        }
    }

    /// Handle one key while the remote program waits for input. Returns the
    /// buffered line when Enter flushes it; the caller sends it via
    /// `send_input` and applies the outcome. Ignored outside `AwaitingInput`.
    pub fn keystroke(&mut self, key: Key) -> Option<String> {
        if self.phase != Phase::AwaitingInput {
            return None;
        }
        match key {
            Key::Char(c) => {
                self.input_buffer.push(c);
                self.output.push(c);
                self.echoed += 1;
                None
            }
            Key::Backspace => {
                if self.input_buffer.pop().is_some() && self.echoed > 0 {
                    self.output.pop();
                    self.echoed -= 1;
                }
                None
            }
            Key::Enter => {
                let line = std::mem::take(&mut self.input_buffer);
                self.output.push('\n');
                self.echoed = 0;
                self.phase = Phase::Running;
                Some(line)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new("print(\"Hello, World!\")".into(), "input".into())
    }

    fn ok(output: &str) -> Result<ExecOutcome, ExecError> {
        Ok(ExecOutcome { output: output.into(), awaiting_input: None })
    }

    fn ok_awaiting(output: &str) -> Result<ExecOutcome, ExecError> {
        Ok(ExecOutcome { output: output.into(), awaiting_input: Some(true) })
    }

    #[test]
    fn submit_runs_and_applies_output_verbatim() {
        let mut s = session();
        let code = s.submit().unwrap();
        assert_eq!(code, "print(\"Hello, World!\")");
        assert!(s.is_loading());

        s.apply_outcome(ok("Hello, World!\n"));
        assert_eq!(s.output, "Hello, World!\n");
        assert_eq!(s.phase(), Phase::Idle);
        assert!(!s.is_loading());
    }

    #[test]
    fn submit_clears_previous_output() {
        let mut s = session();
        s.submit().unwrap();
        s.apply_outcome(ok("old\n"));
        s.submit().unwrap();
        assert_eq!(s.output, "");
    }

    #[test]
    fn submit_rejected_while_running() {
        let mut s = session();
        s.submit().unwrap();
        assert_eq!(s.submit(), Err(SubmitRejected));
        // The outstanding request still applies normally.
        s.apply_outcome(ok("done\n"));
        assert_eq!(s.output, "done\n");
    }

    #[test]
    fn submit_rejected_while_awaiting_input() {
        let mut s = session();
        s.submit().unwrap();
        s.apply_outcome(ok("Enter input: "));
        assert!(s.is_awaiting_input());
        assert_eq!(s.submit(), Err(SubmitRejected));
    }

    #[test]
    fn failure_renders_fixed_message_and_returns_to_idle() {
        let mut s = session();
        s.submit().unwrap();
        s.apply_outcome(Err(ExecError::Status(reqwest::StatusCode::BAD_GATEWAY)));
        assert_eq!(s.output, "An error occurred while executing the code.");
        assert!(!s.is_loading());
        assert_eq!(s.phase(), Phase::Idle);
    }

    #[test]
    fn heuristic_marker_enters_awaiting_input() {
        let mut s = session();
        s.submit().unwrap();
        s.apply_outcome(ok("Please provide input: "));
        assert!(s.is_awaiting_input());
    }

    #[test]
    fn structured_signal_overrides_heuristic() {
        let mut s = session();
        s.submit().unwrap();
        // Output mentions "input" but the service says the run is done.
        s.apply_outcome(Ok(ExecOutcome {
            output: "your input was: 3\n".into(),
            awaiting_input: Some(false),
        }));
        assert_eq!(s.phase(), Phase::Idle);

        s.submit().unwrap();
        // No marker in the text but the service says it is waiting.
        s.apply_outcome(ok_awaiting("? "));
        assert!(s.is_awaiting_input());
    }

    #[test]
    fn interactive_exchange_appends_output() {
        let mut s = session();
        s.submit().unwrap();
        s.apply_outcome(ok("What is your input? "));
        assert!(s.is_awaiting_input());

        for c in "Ann".chars() {
            assert_eq!(s.keystroke(Key::Char(c)), None);
        }
        assert_eq!(s.input_buffer(), "Ann");
        assert_eq!(s.output, "What is your input? Ann");

        let line = s.keystroke(Key::Enter).unwrap();
        assert_eq!(line, "Ann");
        assert!(s.is_loading());
        assert_eq!(s.input_buffer(), "");

        s.apply_outcome(ok("Hello, Ann!\n"));
        assert_eq!(s.output, "What is your input? Ann\nHello, Ann!\n");
        assert_eq!(s.phase(), Phase::Idle);
    }

    #[test]
    fn backspace_retracts_echo_but_not_remote_output() {
        let mut s = session();
        s.submit().unwrap();
        s.apply_outcome(ok("input: "));

        s.keystroke(Key::Char('A'));
        s.keystroke(Key::Backspace);
        assert_eq!(s.output, "input: ");
        assert_eq!(s.input_buffer(), "");

        // With nothing buffered, Backspace must not eat the prompt.
        s.keystroke(Key::Backspace);
        assert_eq!(s.output, "input: ");
    }

    #[test]
    fn keystrokes_ignored_outside_awaiting_input() {
        let mut s = session();
        assert_eq!(s.keystroke(Key::Char('x')), None);
        assert_eq!(s.output, "");
        s.submit().unwrap();
        assert_eq!(s.keystroke(Key::Enter), None);
    }

    #[test]
    fn chained_prompts_stay_interactive() {
        let mut s = session();
        s.submit().unwrap();
        s.apply_outcome(ok("first input: "));
        s.keystroke(Key::Char('1'));
        s.keystroke(Key::Enter).unwrap();
        s.apply_outcome(ok("second input: "));
        assert!(s.is_awaiting_input());
        assert_eq!(s.output, "first input: 1\nsecond input: ");
    }
}
