use crate::cli::{ChangeFilter, ErrorCondition};
use crate::fs::FileSystem;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILE: &str = ".gover.toml";

const DEFAULT_COMPARE: &str = "HEAD";
const DEFAULT_TAG_MESSAGE: &str = "version {version}";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub diff: DiffConfig,
    pub tag: TagConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffConfig {
    /// Revision `gover diff` compares against.
    pub compare: String,
    pub changes: ChangeFilter,
    pub error: ErrorCondition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagConfig {
    /// Annotation template; `{version}` is the version without its `v`, `{tag}` the tag itself.
    pub message: String,
    pub remote: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    diff: Option<RawDiff>,
    tag: Option<RawTag>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDiff {
    compare: Option<String>,
    changes: Option<ChangeFilter>,
    error: Option<ErrorCondition>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTag {
    message: Option<String>,
    remote: Option<String>,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            compare: DEFAULT_COMPARE.to_string(),
            changes: ChangeFilter::default(),
            error: ErrorCondition::default(),
        }
    }
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            message: DEFAULT_TAG_MESSAGE.to_string(),
            remote: None,
        }
    }
}

impl TagConfig {
    pub fn message_for(&self, tag: &str) -> String {
        render_message(&self.message, tag)
    }
}

/// Fill in a tag message template for `tag`.
pub fn render_message(template: &str, tag: &str) -> String {
    let version = tag.strip_prefix('v').unwrap_or(tag);
    template.replace("{version}", version).replace("{tag}", tag)
}

impl Config {
    /// Load `.gover.toml` from the module root, falling back to defaults when absent.
    pub fn load(module_root: &Path, fs: &dyn FileSystem) -> Result<Self, ConfigError> {
        let config_path = module_root.join(CONFIG_FILE);
        if !fs.exists(&config_path) {
            return Ok(Self::default());
        }

        let content = fs.read_to_string(&config_path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;

        let diff = match raw.diff {
            Some(d) => DiffConfig {
                compare: d.compare.unwrap_or_else(|| DEFAULT_COMPARE.to_string()),
                changes: d.changes.unwrap_or_default(),
                error: d.error.unwrap_or_default(),
            },
            None => DiffConfig::default(),
        };

        let tag = match raw.tag {
            Some(t) => TagConfig {
                message: t.message.unwrap_or_else(|| DEFAULT_TAG_MESSAGE.to_string()),
                remote: t.remote.filter(|r| !r.is_empty()),
            },
            None => TagConfig::default(),
        };

        Ok(Self { diff, tag })
    }
}

pub fn generate_config_template() -> String {
    r#"# gover configuration
# Command-line flags take precedence over these settings.

[diff]
# Revision `gover diff` compares the working tree against.
compare = "HEAD"

# Which changes to report: "any" or "breaking".
changes = "any"

# Exit with status 1 when changes of this level exist: "none", "breaking" or "any".
error = "none"

[tag]
# Annotation for tags created by `gover tag`.
# {version} is the version without its leading "v", {tag} is the full tag.
message = "version {version}"

# Push new tags to this remote.
# remote = "origin"
"#
    .to_string()
}
