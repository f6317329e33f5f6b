//! Scenario tests driving the session state machine with canned outcomes,
//! standing in for the remote round-trips.

use pyground::client::{ExecError, ExecOutcome};
use pyground::session::{Key, Phase, Session, DEFAULT_CODE};
use pyground::store::{MemoryStore, SnippetStore};

fn outcome(output: &str) -> Result<ExecOutcome, ExecError> {
    Ok(ExecOutcome { output: output.into(), awaiting_input: None })
}

#[test]
fn hello_world_scenario() {
    let mut session = Session::new("print(\"Hello, World!\")".into(), "input".into());

    let code = session.submit().unwrap();
    assert_eq!(code, "print(\"Hello, World!\")");
    assert!(session.is_loading());

    session.apply_outcome(outcome("Hello, World!\n"));
    assert_eq!(session.output, "Hello, World!\n");
    assert!(!session.is_loading());
}

#[test]
fn network_failure_scenario() {
    let mut session = Session::new("print(1)".into(), "input".into());
    session.submit().unwrap();
    session.apply_outcome(Err(ExecError::Body("connection reset".into())));

    assert_eq!(session.output, "An error occurred while executing the code.");
    assert!(!session.is_loading());
    assert_eq!(session.phase(), Phase::Idle);
}

#[test]
fn interactive_name_prompt_scenario() {
    let mut session = Session::new(
        "name = input(\"What is your name? \")\nprint(f\"Hello, {name}!\")".into(),
        "input".into(),
    );

    session.submit().unwrap();
    session.apply_outcome(outcome("What is your name? "));
    assert!(session.is_awaiting_input());

    for c in "Ann".chars() {
        session.keystroke(Key::Char(c));
    }
    let line = session.keystroke(Key::Enter).unwrap();
    assert_eq!(line, "Ann");

    session.apply_outcome(outcome("Hello, Ann!\n"));
    assert_eq!(session.output, "What is your name? Ann\nHello, Ann!\n");
    assert_eq!(session.phase(), Phase::Idle);
}

#[test]
fn saved_snippet_restored_into_a_fresh_session() {
    let store = SnippetStore::new(MemoryStore::default());
    let mut session = Session::new(DEFAULT_CODE.into(), "input".into());

    session.code = "print(\"greetings\")".to_string();
    store.save("greet", &session.code).unwrap();

    // Fresh session, as after a restart: draft empty, snippet retrievable.
    let restored = store.load("greet").unwrap();
    let session2 = Session::new(restored, "input".into());
    assert_eq!(session2.code, "print(\"greetings\")");
    assert_eq!(session2.output, "");
}

#[test]
fn second_submit_refused_until_outcome_applied() {
    let mut session = Session::new("import time; time.sleep(5)".into(), "input".into());
    session.submit().unwrap();
    assert!(session.submit().is_err());

    session.apply_outcome(outcome(""));
    assert!(session.submit().is_ok());
}
