//! Runtime configuration from environment variables.

use crate::error::ConfigError;
use crate::flow::script::FlowOptions;
use crate::lookup;

/// Assistant configuration.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Endpoint that receives completed leads.
    pub webhook_url: String,
    /// Origin tag stamped on every delivered lead.
    pub origin: String,
    /// Municipality reference endpoint for city checking.
    pub city_url: String,
    /// Which steps the conversation script includes.
    pub flow: FlowOptions,
    /// Open the chat on startup without waiting for a signal.
    pub auto_open: bool,
    /// Idle seconds before the nudge notice is shown. Zero disables it.
    pub nudge_after_secs: u64,
    /// Honor the script's typing delays.
    pub typing_delays: bool,
}

impl AssistantConfig {
    /// Build config from environment variables.
    ///
    /// `LEAD_ASSIST_WEBHOOK_URL` is required; everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let webhook_url = std::env::var("LEAD_ASSIST_WEBHOOK_URL")
            .map_err(|_| ConfigError::MissingEnvVar("LEAD_ASSIST_WEBHOOK_URL".into()))?;
        if !is_http_url(&webhook_url) {
            return Err(ConfigError::InvalidValue {
                key: "LEAD_ASSIST_WEBHOOK_URL".into(),
                message: "expected an http(s) URL".into(),
            });
        }

        let origin = std::env::var("LEAD_ASSIST_ORIGIN")
            .unwrap_or_else(|_| "Assistente Virtual - Site".to_string());

        let city_url = std::env::var("LEAD_ASSIST_CITY_URL")
            .unwrap_or_else(|_| lookup::DEFAULT_MUNICIPALITIES_URL.to_string());

        let flow = FlowOptions {
            collect_service: flag("LEAD_ASSIST_COLLECT_SERVICE", true),
            collect_document: flag("LEAD_ASSIST_COLLECT_DOCUMENT", false),
            check_city: flag("LEAD_ASSIST_CHECK_CITY", false),
            message_only_for_other: !flag("LEAD_ASSIST_ALWAYS_ASK_MESSAGE", false),
        };

        let nudge_after_secs: u64 = std::env::var("LEAD_ASSIST_NUDGE_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3);

        Ok(Self {
            webhook_url,
            origin,
            city_url,
            flow,
            auto_open: flag("LEAD_ASSIST_AUTO_OPEN", false),
            nudge_after_secs,
            typing_delays: flag("LEAD_ASSIST_TYPING", true),
        })
    }
}

fn flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| parse_flag(&v, default))
        .unwrap_or(default)
}

/// Parse a boolean-ish env value, falling back on anything unrecognized.
fn parse_flag(raw: &str, default: bool) -> bool {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" | "sim" => true,
        "0" | "false" | "no" | "off" | "nao" | "não" => false,
        _ => default,
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
