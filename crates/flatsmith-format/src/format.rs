//! Tag resolution and string substitution.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::Local;
use tracing::trace;

use crate::token::{Delimiters, TokenScanner};
use crate::value::TagValue;

/// Zero-argument deferred supplier for a tag value.
///
/// Suppliers are only invoked for tags the template actually references, so
/// an entry whose host fact is expensive or unavailable costs nothing until
/// used.
pub type Supplier = Box<dyn Fn() -> TagValue + Send + Sync>;

/// Named set of lazily evaluated tag values.
///
/// Keys are matched case-insensitively at format time; insertion order and
/// key casing are irrelevant.
#[derive(Default)]
pub struct TagTable {
    entries: HashMap<String, Supplier>,
}

impl TagTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a supplier under `key`. A later write to the same key wins.
    pub fn set<F>(&mut self, key: impl Into<String>, supplier: F)
    where
        F: Fn() -> TagValue + Send + Sync + 'static,
    {
        self.entries.insert(key.into(), Box::new(supplier));
    }

    /// Wrap already-computed values into constant suppliers.
    pub fn from_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<TagValue>,
    {
        let mut table = Self::new();
        for (key, value) in values {
            let value = value.into();
            table.set(key, move || value.clone());
        }
        table
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn iter(&self) -> impl Iterator<Item = (&String, &Supplier)> {
        self.entries.iter()
    }
}

impl std::fmt::Debug for TagTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&String> = self.entries.keys().collect();
        keys.sort();
        f.debug_struct("TagTable").field("keys", &keys).finish()
    }
}

/// Expands `{tag}` / `{tag:format}` placeholders against a merged table of
/// built-in and caller-supplied arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct Formatter {
    delimiters: Delimiters,
}

impl Formatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiters(delimiters: Delimiters) -> Self {
        Self { delimiters }
    }

    /// Substitute every resolvable placeholder in `template`.
    ///
    /// Tags resolve against [`builtin_arguments`] merged with `overrides`
    /// (override entries win key-by-key, keys case-folded at merge time).
    /// Unknown tags, unterminated placeholders, and escaped start delimiters
    /// all leave their source text untouched; the call is total over every
    /// input string.
    ///
    /// Replacement is by literal source text, not by span: two occurrences of
    /// an identical placeholder are substituted with the same resolved value
    /// in one pass, and substituted text is never rescanned for further
    /// placeholders.
    pub fn format(&self, template: &str, overrides: Option<&TagTable>) -> String {
        let builtins = builtin_arguments();
        let mut arguments: HashMap<String, &Supplier> =
            HashMap::with_capacity(builtins.len() + overrides.map_or(0, TagTable::len));
        for (key, supplier) in builtins.iter() {
            arguments.insert(key.to_lowercase(), supplier);
        }
        if let Some(table) = overrides {
            for (key, supplier) in table.iter() {
                arguments.insert(key.to_lowercase(), supplier);
            }
        }

        let scanner = TokenScanner::with_delimiters(template, self.delimiters);
        let mut output = template.to_string();
        for token in scanner.tokens() {
            let Some(supplier) = arguments.get(&token.tag.to_lowercase()) else {
                trace!(tag = token.tag, "no argument for tag");
                continue;
            };
            let value = supplier();
            let text = match token.format_spec {
                Some(spec) if !spec.is_empty() => value.render_with(spec),
                _ => value.render(),
            };
            output = output.replace(token.source_text(template), &text);
        }
        output
    }
}

/// Fresh table of host-derived arguments.
///
/// Rebuilt on every call; nothing is cached process-wide. Every entry is
/// lazy, and facts the platform cannot answer resolve to [`TagValue::None`]
/// instead of failing the format pass.
pub fn builtin_arguments() -> TagTable {
    let mut table = TagTable::new();

    table.set("now", || TagValue::Timestamp(Local::now()));

    table.set("env.os", || TagValue::from(std::env::consts::OS));
    table.set("env.arch", || TagValue::from(std::env::consts::ARCH));
    table.set("env.family", || TagValue::from(std::env::consts::FAMILY));
    table.set("env.pid", || TagValue::Int(std::process::id() as i64));
    table.set("env.exe", || match std::env::current_exe() {
        Ok(path) => TagValue::Text(path.display().to_string()),
        Err(_) => TagValue::None,
    });
    table.set("env.cwd", || match std::env::current_dir() {
        Ok(path) => TagValue::Text(path.display().to_string()),
        Err(_) => TagValue::None,
    });
    table.set("env.cmdline", || {
        TagValue::Text(std::env::args().collect::<Vec<_>>().join(" "))
    });
    table.set("env.hostname", || first_env(&["HOSTNAME", "COMPUTERNAME"]));
    table.set("env.user", || first_env(&["USER", "USERNAME"]));
    table.set("env.cpus", || match std::thread::available_parallelism() {
        Ok(count) => TagValue::Int(count.get() as i64),
        Err(_) => TagValue::None,
    });
    table.set("env.newline", || {
        TagValue::from(if cfg!(windows) { "\r\n" } else { "\n" })
    });
    table.set("env.epoch_ms", || {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => TagValue::Int(elapsed.as_millis() as i64),
            Err(_) => TagValue::None,
        }
    });
    table.set("env.temp_dir", || {
        TagValue::Text(std::env::temp_dir().display().to_string())
    });

    for (name, resolve) in FOLDERS {
        let resolve = *resolve;
        table.set(format!("folder.{name}"), move || match resolve() {
            Some(path) => TagValue::Text(path.display().to_string()),
            None => TagValue::None,
        });
    }

    table
}

/// Well-known folders resolved from the environment, in the platform's
/// conventional locations.
const FOLDERS: &[(&str, fn() -> Option<PathBuf>)] = &[
    ("home", home_dir),
    ("temp", temp_dir),
    ("config", config_dir),
    ("cache", cache_dir),
    ("data", data_dir),
    ("desktop", desktop_dir),
    ("documents", documents_dir),
    ("downloads", downloads_dir),
];

fn first_env(keys: &[&str]) -> TagValue {
    keys.iter()
        .find_map(|key| std::env::var(key).ok())
        .map(TagValue::Text)
        .unwrap_or(TagValue::None)
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key).filter(|value| !value.is_empty()).map(PathBuf::from)
}

fn home_dir() -> Option<PathBuf> {
    env_path("HOME").or_else(|| env_path("USERPROFILE"))
}

fn temp_dir() -> Option<PathBuf> {
    Some(std::env::temp_dir())
}

fn config_dir() -> Option<PathBuf> {
    if cfg!(windows) {
        env_path("APPDATA")
    } else {
        env_path("XDG_CONFIG_HOME").or_else(|| home_dir().map(|home| home.join(".config")))
    }
}

fn cache_dir() -> Option<PathBuf> {
    if cfg!(windows) {
        env_path("LOCALAPPDATA")
    } else {
        env_path("XDG_CACHE_HOME").or_else(|| home_dir().map(|home| home.join(".cache")))
    }
}

fn data_dir() -> Option<PathBuf> {
    if cfg!(windows) {
        env_path("APPDATA")
    } else {
        env_path("XDG_DATA_HOME").or_else(|| home_dir().map(|home| home.join(".local/share")))
    }
}

fn desktop_dir() -> Option<PathBuf> {
    home_dir().map(|home| home.join("Desktop"))
}

fn documents_dir() -> Option<PathBuf> {
    home_dir().map(|home| home.join("Documents"))
}

fn downloads_dir() -> Option<PathBuf> {
    home_dir().map(|home| home.join("Downloads"))
}
