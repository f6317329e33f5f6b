//! Snippet management shortcuts (save/show/list without opening the editor).

use anyhow::{Context, Result};

use crate::config::Config;
use crate::store::SnippetStore;

pub fn save(cfg: &Config, name: &str, code: &str) -> Result<()> {
    let store = SnippetStore::from_config(cfg);
    store.save(name, code).context("saving snippet")?;
    println!("Saved snippet: {}", name.trim());
    Ok(())
}

pub fn show(cfg: &Config, name: &str) -> Result<()> {
    let store = SnippetStore::from_config(cfg);
    let code = store.load(name).context("loading snippet")?;
    print!("{}", code);
    if !code.ends_with('\n') {
        println!();
    }
    Ok(())
}

pub fn list(cfg: &Config) -> Result<()> {
    let store = SnippetStore::from_config(cfg);
    for name in store.list() {
        println!("{}", name);
    }
    Ok(())
}
