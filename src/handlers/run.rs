//! One-shot execution: run code once, print the output, feed stdin lines to
//! the remote program while it keeps asking for input.

use std::io::{self, BufRead, Write};

use anyhow::{bail, Result};

use crate::client::{flatten_error, ExecClient};
use crate::config::Config;
use crate::session::{Key, Session};

pub struct RunHandler;

impl RunHandler {
    pub async fn run(code: String, cfg: &Config) -> Result<()> {
        let client = ExecClient::from_config(cfg)?;
        let mut session = Session::new(code, cfg.input_prompt_marker());

        let code = session
            .submit()
            .map_err(|_| anyhow::anyhow!("a request is already in flight"))?;
        let mut outcome = client.execute(&code).await;

        loop {
            if let Err(err) = &outcome {
                bail!("{}", flatten_error(err));
            }

            let before = session.output.len();
            session.apply_outcome(outcome);
            print!("{}", &session.output[before..]);
            io::stdout().flush()?;

            if !session.is_awaiting_input() {
                break;
            }

            // One line of stdin per pending prompt; EOF ends the exchange.
            let mut line = String::new();
            if io::stdin().lock().read_line(&mut line)? == 0 {
                break;
            }
            for c in line.trim_end_matches(['\r', '\n']).chars() {
                session.keystroke(Key::Char(c));
            }
            let Some(flushed) = session.keystroke(Key::Enter) else {
                break;
            };
            outcome = client.send_input(&flushed).await;
        }

        Ok(())
    }
}
