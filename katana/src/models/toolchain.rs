use serde::{Deserialize, Serialize};

/// Which of the two supported toolchains a command line is built against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolchainVariant {
    Current,
    Legacy,
}

/// Resolved environment prefix for a katana invocation:
/// `<env_tool> <packages...> -- <executable>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toolchain {
    pub variant: ToolchainVariant,
    pub env_tool: String,
    pub packages: Vec<String>,
    pub executable: String,
}

impl Toolchain {
    pub fn prefix(&self) -> Vec<String> {
        let mut col = Vec::with_capacity(self.packages.len() + 3);
        col.push(self.env_tool.clone());
        col.extend(self.packages.iter().cloned());
        col.push("--".to_owned());
        col.push(self.executable.clone());
        col
    }
}

/// The two toolchain variants and the rule picking one of them.
/// Only a selector equal to `current_literal` picks the current toolchain,
/// every other value (unset and empty included) falls back to legacy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Environment variable the binary reads the selector from.
    pub selector_var: String,
    pub current_literal: String,
    pub env_tool: String,
    pub executable: String,
    pub current: Vec<String>,
    pub legacy: Vec<String>,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            selector_var: "KATANA_VERSION".to_owned(),
            current_literal: "3.1.2".to_owned(),
            env_tool: "rez-env".to_owned(),
            executable: "katana".to_owned(),
            current: vec![
                "katana-3.1.2".to_owned(),
                "renderman-22".to_owned(),
                "usd".to_owned(),
            ],
            legacy: vec![
                "katana-3.1v2".to_owned(),
                "renderman-22".to_owned(),
                "usd".to_owned(),
            ],
        }
    }
}

impl ToolchainConfig {
    pub fn resolve(&self, selector: Option<&str>) -> Toolchain {
        let (variant, packages) = match selector {
            Some(value) if value == self.current_literal => {
                (ToolchainVariant::Current, &self.current)
            }
            _ => (ToolchainVariant::Legacy, &self.legacy),
        };

        Toolchain {
            variant,
            env_tool: self.env_tool.clone(),
            packages: packages.clone(),
            executable: self.executable.clone(),
        }
    }
}
