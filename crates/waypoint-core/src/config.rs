//! Configuration loading and validation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Top-level Waypoint configuration.
///
/// Every section is optional; defaults reproduce the stock travel
/// companion setup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<VoiceConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport: Option<TransportConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolsConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bot_name: Option<String>,

    /// Persona and tool-use guidance sent to the model at session start.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,

    /// First-turn nudge so the bot opens the conversation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub greeting_instruction: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,

    #[serde(default = "default_true")]
    pub transcribe_user_audio: bool,

    #[serde(default = "default_true")]
    pub transcribe_bot_audio: bool,
}

/// Room/transport settings. Values usually reference `${ENV_VAR}`s so
/// credentials never land in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Built-in tools to advertise. `None` enables all of them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<Vec<String>>,

    /// Extra declarations whose handlers live outside this process
    /// (e.g. a client app handling the call on-device).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub declare: Vec<crate::types::ToolDeclaration>,

    /// Allow declared tools without a local handler at bootstrap.
    /// Dispatching one still yields an unknown-tool failure.
    #[serde(default)]
    pub allow_unhandled: bool,

    /// Fallback position for the location tool when no live source
    /// is wired in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_location: Option<DefaultLocation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultLocation {
    pub lat: String,
    pub lon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Substitute `${ENV_VAR}` patterns in a string with their environment variable values.
fn substitute_env_vars(input: &str) -> String {
    let re = regex::Regex::new(r"\$\{([^}]+)\}").unwrap();
    re.replace_all(input, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_default()
    })
    .into_owned()
}

impl Config {
    /// Load config from a JSON5 file, substituting `${ENV_VAR}` references.
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(crate::error::WaypointError::Io)?;

        let substituted = substitute_env_vars(&raw);

        let config: Config = json5::from_str(&substituted)
            .map_err(|e| crate::error::WaypointError::Config(e.to_string()))?;

        Ok(config)
    }

    /// Resolve the default config file path.
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".waypoint")
            .join("config.json")
    }

    pub fn bot_name(&self) -> String {
        self.session
            .as_ref()
            .and_then(|s| s.bot_name.clone())
            .unwrap_or_else(|| "Travel Companion".to_string())
    }

    pub fn system_instruction(&self) -> String {
        self.session
            .as_ref()
            .and_then(|s| s.system_instruction.clone())
            .unwrap_or_else(|| DEFAULT_SYSTEM_INSTRUCTION.trim().to_string())
    }

    pub fn greeting_instruction(&self) -> String {
        self.session
            .as_ref()
            .and_then(|s| s.greeting_instruction.clone())
            .unwrap_or_else(|| {
                "Greet the user warmly, introduce yourself, and mention today's date.".to_string()
            })
    }

    pub fn voice_id(&self) -> String {
        self.voice
            .as_ref()
            .and_then(|v| v.voice_id.clone())
            .unwrap_or_else(|| "Puck".to_string())
    }

    pub fn transcribe_user_audio(&self) -> bool {
        self.voice.as_ref().is_none_or(|v| v.transcribe_user_audio)
    }

    pub fn transcribe_bot_audio(&self) -> bool {
        self.voice.as_ref().is_none_or(|v| v.transcribe_bot_audio)
    }

    /// Whether a built-in tool should be advertised for this session.
    pub fn tool_enabled(&self, name: &str) -> bool {
        match self.tools.as_ref().and_then(|t| t.enabled.as_ref()) {
            Some(enabled) => enabled.iter().any(|n| n == name),
            None => true,
        }
    }

    pub fn extra_declarations(&self) -> &[crate::types::ToolDeclaration] {
        self.tools.as_ref().map_or(&[], |t| t.declare.as_slice())
    }

    pub fn allow_unhandled_tools(&self) -> bool {
        self.tools.as_ref().is_some_and(|t| t.allow_unhandled)
    }

    pub fn default_location(&self) -> (String, String) {
        self.tools
            .as_ref()
            .and_then(|t| t.default_location.as_ref())
            .map(|l| (l.lat.clone(), l.lon.clone()))
            .unwrap_or_else(|| ("-27.501586".to_string(), "-48.489710".to_string()))
    }

    pub fn log_level(&self) -> String {
        self.logging
            .as_ref()
            .and_then(|l| l.level.clone())
            .unwrap_or_else(|| "info".to_string())
    }
}

const DEFAULT_SYSTEM_INSTRUCTION: &str = "
You are a friendly travel companion speaking over audio, so keep answers
short and avoid special characters or markup. Use get_my_current_location
to find where the user is and talk about the neighborhood and city rather
than coordinates. When the user picks a restaurant, call
set_restaurant_location with its name and coordinates. Use
get_current_date when mentioning what day it is.
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_substitution() {
        // SAFETY: test-only, single-threaded test runner
        unsafe { std::env::set_var("TEST_WP_TOKEN", "tok-123") };
        let input = r#"{"token": "${TEST_WP_TOKEN}", "other": "plain"}"#;
        let result = substitute_env_vars(input);
        assert!(result.contains("tok-123"));
        assert!(result.contains("plain"));
        unsafe { std::env::remove_var("TEST_WP_TOKEN") };
    }

    #[test]
    fn test_env_var_missing() {
        let input = r#"{"token": "${NONEXISTENT_VAR_WP_TEST}"}"#;
        let result = substitute_env_vars(input);
        assert!(result.contains(r#""""#)); // empty string
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.voice_id(), "Puck");
        assert!(config.transcribe_user_audio());
        assert!(config.tool_enabled("get_my_current_location"));
        assert!(!config.allow_unhandled_tools());
        assert_eq!(config.default_location().0, "-27.501586");
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config.bot_name(), "Travel Companion");
    }

    #[test]
    fn test_load_json5() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{
                // comments are fine
                session: { bot_name: "Scout" },
                tools: { enabled: ["get_current_date"], allow_unhandled: true },
            }"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.bot_name(), "Scout");
        assert!(config.tool_enabled("get_current_date"));
        assert!(!config.tool_enabled("get_my_current_location"));
        assert!(config.allow_unhandled_tools());
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{{{").unwrap();
        assert!(Config::load(&path).is_err());
    }
}
