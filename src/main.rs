use anyhow::{bail, Result};
use is_terminal::IsTerminal;
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

use pyground::{
    cli, config::Config, handlers, session::DEFAULT_CODE, store::SnippetStore, tui,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    // Diagnostics go to stderr; off unless RUST_LOG asks for them.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    // Optional: override service URL via CLI before loading config
    if let Some(url) = args.url.as_deref() {
        std::env::set_var("EXECUTE_URL", url);
    }

    let cfg = Config::load();

    // Snippet management shortcuts
    if args.list_snippets {
        return handlers::snippet::list(&cfg);
    }
    if let Some(name) = &args.show_snippet {
        return handlers::snippet::show(&cfg, name);
    }
    if let Some(name) = &args.save {
        let code = read_code(args.file.as_deref())?
            .ok_or_else(|| anyhow::anyhow!("provide a FILE or pipe code on stdin to save"))?;
        return handlers::snippet::save(&cfg, name, &code);
    }

    if args.run {
        let code = read_code(args.file.as_deref())?
            .ok_or_else(|| anyhow::anyhow!("provide a FILE or pipe code on stdin to run"))?;
        return handlers::run::RunHandler::run(code, &cfg).await;
    }

    // Editor: explicit snippet > file > restored draft > sample program.
    let store = SnippetStore::from_config(&cfg);
    let initial_code = if let Some(name) = &args.snippet {
        store.load(name)?
    } else if let Some(code) = read_code(args.file.as_deref())? {
        code
    } else {
        store.load_draft().unwrap_or_else(|| DEFAULT_CODE.to_string())
    };

    tui::run_tui(&cfg, initial_code).await
}

/// Code from FILE, or from stdin when piped. None when neither is available.
fn read_code(file: Option<&str>) -> Result<Option<String>> {
    if let Some(path) = file {
        if !std::path::Path::new(path).exists() {
            bail!("file not found: {}", path);
        }
        return Ok(Some(std::fs::read_to_string(path)?));
    }
    if !io::stdin().is_terminal() {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        if !buf.trim().is_empty() {
            return Ok(Some(buf));
        }
    }
    Ok(None)
}
