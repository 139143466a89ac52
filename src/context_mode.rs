//! Context modes for the completion request
//!
//! The mode decides how strictly the model is held to the fetched snapshot:
//! - Direct mode: answer only from the supplied live API data
//! - Tool-constrained mode: the snapshot is presented as the result of the
//!   `get_live_api_data` tool, and unanswerable questions must get the exact
//!   fallback reply `Data not available.`

use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name under which the snapshot is presented in tool-constrained mode
pub const LIVE_DATA_TOOL: &str = "get_live_api_data";

/// Exact reply the model must give when the snapshot cannot answer the question
pub const DATA_NOT_AVAILABLE: &str = "Data not available.";

/// Instruction mode used when packaging a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextMode {
    /// Fetch-then-ask: the model answers only from the live API data
    #[default]
    Direct,

    /// Tool provider / tool caller split with a strict refusal contract
    #[serde(alias = "tool", alias = "mcp")]
    ToolConstrained,
}

impl fmt::Display for ContextMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => write!(f, "DIRECT"),
            Self::ToolConstrained => write!(f, "TOOL"),
        }
    }
}

impl ContextMode {
    /// Parse a context mode from a string
    ///
    /// # Arguments
    ///
    /// * `s` - "direct", or one of "tool", "tool-constrained", "tool_constrained", "mcp"
    ///
    /// # Examples
    ///
    /// ```
    /// use apilens::context_mode::ContextMode;
    ///
    /// assert_eq!(ContextMode::parse_str("tool").unwrap(), ContextMode::ToolConstrained);
    /// assert_eq!(ContextMode::parse_str("Direct").unwrap(), ContextMode::Direct);
    /// ```
    pub fn parse_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "tool" | "tool-constrained" | "tool_constrained" | "mcp" => Ok(Self::ToolConstrained),
            other => Err(format!("Unknown context mode: {}", other)),
        }
    }

    /// Fixed system instruction for this mode
    pub fn system_instruction(&self) -> &'static str {
        match self {
            Self::Direct => {
                "You are an API assistant. \
                 Answer the user's question ONLY using the live API data provided."
            }
            Self::ToolConstrained => {
                "You are an MCP-based assistant.\n\
                 You MUST answer using ONLY the tool data provided.\n\
                 If the answer is not present, say: 'Data not available.'"
            }
        }
    }

    /// Get a user-friendly description of this mode
    pub fn description(&self) -> &'static str {
        match self {
            Self::Direct => "Answers only from the live API data",
            Self::ToolConstrained => "Answers only from tool data, otherwise 'Data not available.'",
        }
    }

    /// Progress line shown while the snapshot is being fetched
    pub fn fetching_notice(&self) -> &'static str {
        match self {
            Self::Direct => "⏳ Fetching live API data...",
            Self::ToolConstrained => "⏳ Tool provider: fetching live data...",
        }
    }

    /// Progress line shown while waiting for the completion endpoint
    pub fn thinking_notice(&self) -> &'static str {
        match self {
            Self::Direct => "🤖 Thinking...",
            Self::ToolConstrained => "🤖 Tool caller: reasoning...",
        }
    }

    /// Get a colored tag representation of this mode
    pub fn colored_tag(&self) -> String {
        match self {
            Self::Direct => format!("[{}]", "DIRECT".cyan()),
            Self::ToolConstrained => format!("[{}]", "TOOL".purple()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_mode_display() {
        assert_eq!(ContextMode::Direct.to_string(), "DIRECT");
        assert_eq!(ContextMode::ToolConstrained.to_string(), "TOOL");
    }

    #[test]
    fn test_context_mode_parse_aliases() {
        for alias in ["tool", "TOOL", "tool-constrained", "tool_constrained", "mcp"] {
            assert_eq!(
                ContextMode::parse_str(alias).unwrap(),
                ContextMode::ToolConstrained
            );
        }
        assert_eq!(ContextMode::parse_str(" direct ").unwrap(), ContextMode::Direct);
    }

    #[test]
    fn test_context_mode_parse_invalid() {
        let err = ContextMode::parse_str("chatty").unwrap_err();
        assert!(err.contains("chatty"));
    }

    #[test]
    fn test_tool_constrained_instruction_has_fallback_phrase() {
        assert!(ContextMode::ToolConstrained
            .system_instruction()
            .contains(DATA_NOT_AVAILABLE));
    }

    #[test]
    fn test_direct_instruction_has_no_fallback_phrase() {
        let instruction = ContextMode::Direct.system_instruction();
        assert!(!instruction.contains(DATA_NOT_AVAILABLE));
        assert!(instruction.contains("ONLY using the live API data"));
    }

    #[test]
    fn test_default_mode_is_direct() {
        assert_eq!(ContextMode::default(), ContextMode::Direct);
    }

    #[test]
    fn test_serde_accepts_tool_alias() {
        let mode: ContextMode = serde_yaml::from_str("tool").unwrap();
        assert_eq!(mode, ContextMode::ToolConstrained);
        let mode: ContextMode = serde_yaml::from_str("tool_constrained").unwrap();
        assert_eq!(mode, ContextMode::ToolConstrained);
    }
}
