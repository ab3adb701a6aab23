use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::persistence::http_store::{DEFAULT_BACKOFF_MS, DEFAULT_RETRIES, DEFAULT_TIMEOUT_MS};

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "form-designer",
    version,
    about = "Build forms by drag and drop, publish them and collect submissions"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: form-designer.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Directory holding form files (overrides store.dir)
    #[arg(long, global = true)]
    pub store_dir: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an empty form
    Create {
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// List forms, newest first
    List,

    /// List the element types that can be dropped on a form
    Palette,

    /// Print a form's elements as the designer shows them
    Show {
        #[arg(long)]
        form: u64,
    },

    /// Drop a new element from the palette (appends when no anchor is given)
    Add {
        #[arg(long)]
        form: u64,

        /// Element type tag
        #[arg(long = "type", default_value = "TextField")]
        element_type: String,

        /// Drop on the top half of this element
        #[arg(long, conflicts_with = "after")]
        before: Option<String>,

        /// Drop on the bottom half of this element
        #[arg(long)]
        after: Option<String>,
    },

    /// Drag an existing element onto another one
    Move {
        #[arg(long)]
        form: u64,

        #[arg(long)]
        element: String,

        #[arg(long, conflicts_with = "after", required_unless_present = "after")]
        before: Option<String>,

        #[arg(long)]
        after: Option<String>,
    },

    /// Delete an element
    Remove {
        #[arg(long)]
        form: u64,

        #[arg(long)]
        element: String,
    },

    /// Edit element properties (key=value, values parsed as JSON when possible)
    Set {
        #[arg(long)]
        form: u64,

        #[arg(long)]
        element: String,

        #[arg(long = "attr", required = true)]
        attrs: Vec<String>,
    },

    /// Publish a form; it can no longer be edited
    Publish {
        #[arg(long)]
        form: u64,
    },

    /// Submit values to a published form (element_id=value)
    Submit {
        #[arg(long)]
        share_url: String,

        #[arg(long = "value")]
        values: Vec<String>,
    },

    /// Visit and submission statistics for one form or all of them
    Stats {
        #[arg(long)]
        form: Option<u64>,
    },

    /// Replay design scripts from YAML files
    Run {
        /// Path to a script YAML file or a directory of them
        #[arg(long)]
        script: String,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `form-designer.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub designer: DesignerConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// `file` or `http`
    #[serde(default = "default_backend")]
    pub backend: String,

    #[serde(default = "default_store_dir")]
    pub dir: String,

    /// Base URL for the `http` backend
    pub endpoint: Option<String>,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Pause before the first retry, growing linearly after that
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            dir: default_store_dir(),
            endpoint: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            retries: DEFAULT_RETRIES,
            backoff_ms: DEFAULT_BACKOFF_MS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignerConfig {
    /// `uuid` or `sequential`
    #[serde(default = "default_id_strategy")]
    pub id_strategy: String,

    /// JSONL gesture trace; disabled when unset
    pub trace_file: Option<String>,
}

impl Default for DesignerConfig {
    fn default() -> Self {
        Self {
            id_strategy: default_id_strategy(),
            trace_file: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

// Serde default helpers
fn default_backend() -> String { "file".to_string() }
fn default_store_dir() -> String { ".form-designer".to_string() }
fn default_timeout_ms() -> u64 { DEFAULT_TIMEOUT_MS }
fn default_retries() -> u32 { DEFAULT_RETRIES }
fn default_backoff_ms() -> u64 { DEFAULT_BACKOFF_MS }
fn default_id_strategy() -> String { "uuid".to_string() }
fn default_filter() -> String { "info".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("form-designer.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}

/// Log filter: `-v` / `-vv` raise the configured level.
pub fn log_filter(config: &AppConfig, verbose: u8) -> String {
    match verbose {
        0 => config.log.filter.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}
