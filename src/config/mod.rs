pub mod export;
pub mod preferences;

use log::info;
use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Args;
use export::ExportConfig;

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Base of the admin/content REST API.
    pub api_url: String,
    /// Base of the chat backend; falls back to `api_url`.
    pub chat_api_url: String,
    pub analytics_id: Option<String>,
    pub session_file: PathBuf,
    pub request_timeout: Duration,
    pub export: ExportConfig,
}

impl SiteConfig {
    pub fn from_args(args: &Args) -> Self {
        let chat_api_url = args.chat_api_url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| args.api_url.clone());
        let export = match &args.image_hosts {
            Some(hosts) => ExportConfig::with_hosts(hosts),
            None => ExportConfig::default(),
        };

        Self {
            api_url: args.api_url.clone(),
            chat_api_url,
            analytics_id: args.ga_id.clone().filter(|id| !id.trim().is_empty()),
            session_file: PathBuf::from(&args.session_file),
            request_timeout: Duration::from_secs(args.request_timeout_secs.max(1)),
            export,
        }
    }

    pub fn log_summary(&self) {
        info!("--- Portal Configuration ---");
        info!("API URL: {}", self.api_url);
        info!("Chat API URL: {}", self.chat_api_url);
        info!("Analytics: {}", self.analytics_id.as_deref().unwrap_or("disabled"));
        info!("Session File: {}", self.session_file.display());
        info!("Request Timeout: {}s", self.request_timeout.as_secs());
        info!("Image Hosts: {}", self.export.image_hosts.join(", "));
        info!("----------------------------");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn chat_url_falls_back_to_api_url() {
        let args = Args::parse_from([
            "insight-portal",
            "--api-url",
            "https://api.example.com/api",
            "--chat-api-url",
            "",
            "--ga-id",
            "",
            "--image-hosts",
            "cdn.example.com",
            "insights",
        ]);
        let config = SiteConfig::from_args(&args);

        assert_eq!(config.chat_api_url, "https://api.example.com/api");
        assert!(config.analytics_id.is_none());
        assert_eq!(config.export.image_hosts, vec!["cdn.example.com".to_string()]);
    }
}
