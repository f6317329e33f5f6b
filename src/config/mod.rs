use std::{
    collections::HashMap,
    env,
    fs,
    io::{BufRead, BufReader},
    path::PathBuf,
};

use directories::BaseDirs;

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    pub config_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        let mut map = default_map();
        let config_path = default_config_path();

        // Read .pygroundrc if exists
        if config_path.exists() {
            if let Ok(file) = fs::File::open(&config_path) {
                let reader = BufReader::new(file);
                for line in reader.lines().flatten() {
                    let line = line.trim();
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }
                    if let Some((k, v)) = line.split_once('=') {
                        map.insert(k.trim().to_string(), v.trim().to_string());
                    }
                }
            }
        }

        // Overlay environment variables (take precedence)
        for (k, v) in env::vars() {
            if is_config_key(&k) {
                map.insert(k, v);
            }
        }

        Self { inner: map, config_path }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        // ENV first
        if let Ok(v) = env::var(key) {
            return Some(v);
        }
        self.inner.get(key).cloned()
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.parse::<u64>().ok())
    }

    pub fn execute_url(&self) -> String {
        self.get("EXECUTE_URL").unwrap_or_else(|| "http://localhost:5000".into())
    }

    pub fn snippet_storage_path(&self) -> PathBuf {
        self.get("SNIPPET_STORAGE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| default_snippet_dir())
    }

    pub fn input_prompt_marker(&self) -> String {
        self.get("INPUT_PROMPT_MARKER").unwrap_or_else(|| "input".into())
    }
}

fn is_config_key(k: &str) -> bool {
    // Accept known keys or PYGROUND_* for forward-compat
    const KEYS: &[&str] = &[
        "EXECUTE_URL",
        "REQUEST_TIMEOUT",
        "SNIPPET_STORAGE_PATH",
        "INPUT_PROMPT_MARKER",
        "DEFAULT_THEME",
    ];

    KEYS.contains(&k) || k.starts_with("PYGROUND_")
}

fn base_config_dir() -> PathBuf {
    BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"))
}

fn default_config_path() -> PathBuf {
    base_config_dir().join("pyground").join(".pygroundrc")
}

fn default_snippet_dir() -> PathBuf {
    base_config_dir().join("pyground").join("snippets")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();

    m.insert(
        "SNIPPET_STORAGE_PATH".into(),
        default_snippet_dir().to_string_lossy().into_owned(),
    );

    m.insert("EXECUTE_URL".into(), "http://localhost:5000".into());
    m.insert("REQUEST_TIMEOUT".into(), "30".into());
    m.insert("INPUT_PROMPT_MARKER".into(), "input".into());
    m.insert("DEFAULT_THEME".into(), "dark".into());

    m
}
