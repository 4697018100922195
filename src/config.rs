//! Console options.
//!
//! Options are passed at construction and can also be loaded from a TOML
//! file, so a host application can embed them in its own configuration:
//!
//! ```toml
//! prompt = "my-app> "
//! after_input = ""
//! encoding = "utf8"
//! double_ctrl_c = true
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Construction-time configuration for a [`Console`](crate::Console).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Text written before the edited line.
    pub prompt: String,
    /// Suffix re-appended after the edited line, to close any style codes
    /// the prompt opened.
    pub after_input: String,
    /// Input encoding name: `utf8` (default), `latin1`/`binary`, `ascii`.
    pub encoding: String,
    /// Require two consecutive Ctrl+C presses to terminate. When false a
    /// single press terminates immediately.
    pub double_ctrl_c: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            after_input: String::new(),
            encoding: "utf8".to_string(),
            double_ctrl_c: true,
        }
    }
}

impl Options {
    /// Load options from a TOML file. Missing keys fall back to defaults.
    pub fn load_from(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path).map_err(Error::ConfigRead)?;
        toml::from_str(&content).map_err(Error::ConfigParse)
    }
}
