use std::{collections::HashMap, fs};

use anyhow::{bail, Context};
use url::Url;

#[derive(Debug)]
pub struct Settings {
    pub api_base_url: String,
    pub request_timeout_seconds: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".into(),
            request_timeout_seconds: 30,
        }
    }
}

/// Defaults, overridden by `studyhub.toml` in the working directory,
/// overridden in turn by environment variables.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("studyhub.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("api_base_url") {
                settings.api_base_url = v.clone();
            }
            if let Some(v) = file_cfg.get("request_timeout_seconds") {
                if let Ok(parsed) = v.parse::<u64>() {
                    settings.request_timeout_seconds = parsed;
                }
            }
        }
    }

    if let Ok(v) = std::env::var("STUDYHUB_API_URL") {
        settings.api_base_url = v;
    }
    if let Ok(v) = std::env::var("STUDYHUB_TIMEOUT_SECONDS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_seconds = parsed;
        }
    }

    settings
}

/// The service boundary speaks HTTP; anything else in the configured URL is
/// a setup mistake worth failing on before the first request.
pub fn validate_api_url(raw: &str) -> anyhow::Result<String> {
    let url = Url::parse(raw).with_context(|| format!("invalid api base url '{raw}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("api base url must use http or https, got '{}'", url.scheme());
    }
    Ok(raw.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_dev_server() {
        let settings = Settings::default();
        assert_eq!(settings.api_base_url, "http://localhost:8000");
        assert_eq!(settings.request_timeout_seconds, 30);
    }

    #[test]
    fn accepts_http_urls_and_trims_trailing_slash() {
        assert_eq!(
            validate_api_url("https://study.example.org/").expect("valid url"),
            "https://study.example.org"
        );
    }

    #[test]
    fn rejects_non_http_schemes() {
        assert!(validate_api_url("ftp://study.example.org").is_err());
        assert!(validate_api_url("not a url").is_err());
    }
}
