use clap::{ArgGroup, Parser};

#[derive(Parser, Debug, Clone)]
#[command(name = "pyground", about = "Terminal client for a remote Python playground", version)]
#[command(group(ArgGroup::new("mode").args(["run", "save", "show_snippet", "list_snippets", "snippet"]).multiple(false)))]
pub struct Cli {
    /// Python file to open in the editor (or to run/save with the flags below).
    #[arg(value_name = "FILE")]
    pub file: Option<String>,

    /// Execute once and print the captured output instead of opening the editor.
    /// Reads FILE, or stdin when piped.
    #[arg(short, long)]
    pub run: bool,

    /// Open a saved snippet in the editor.
    #[arg(long)]
    pub snippet: Option<String>,

    /// Save FILE (or stdin) under the given snippet name and exit.
    #[arg(long = "save", value_name = "NAME")]
    pub save: Option<String>,

    /// Print a saved snippet.
    #[arg(long = "show-snippet", value_name = "NAME")]
    pub show_snippet: Option<String>,

    /// List saved snippet names.
    #[arg(short = 'l', long = "list-snippets", visible_alias = "ls")]
    pub list_snippets: bool,

    /// Override the execution service URL for this invocation.
    #[arg(long)]
    pub url: Option<String>,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
