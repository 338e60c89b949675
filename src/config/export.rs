use log::debug;
use url::Url;

pub const DEFAULT_IMAGE_HOSTS: [&str; 2] = ["images.unsplash.com", "res.cloudinary.com"];

/// Static-export build settings: no image optimizer, remote images only from
/// an allow-list of hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    pub static_export: bool,
    pub unoptimized_images: bool,
    pub image_hosts: Vec<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            static_export: true,
            unoptimized_images: true,
            image_hosts: DEFAULT_IMAGE_HOSTS.iter().map(|h| h.to_string()).collect(),
        }
    }
}

impl ExportConfig {
    pub fn with_hosts(hosts: &str) -> Self {
        let image_hosts: Vec<String> = hosts
            .split(',')
            .map(|h| h.trim().to_lowercase())
            .filter(|h| !h.is_empty())
            .collect();
        if image_hosts.is_empty() {
            return Self::default();
        }
        Self {
            image_hosts,
            ..Self::default()
        }
    }

    /// Site-relative paths are always fine; absolute URLs must be https or
    /// http on an allow-listed host.
    pub fn is_allowed_image(&self, src: &str) -> bool {
        let src = src.trim();
        if src.is_empty() {
            return false;
        }
        if src.starts_with('/') && !src.starts_with("//") {
            return true;
        }
        match Url::parse(src) {
            Ok(url) => {
                let scheme_ok = matches!(url.scheme(), "https" | "http");
                let host_ok = url
                    .host_str()
                    .map(|host| self.image_hosts.iter().any(|h| h.eq_ignore_ascii_case(host)))
                    .unwrap_or(false);
                scheme_ok && host_ok
            }
            Err(e) => {
                debug!("Rejecting image source '{}': {}", src, e);
                false
            }
        }
    }

    pub fn resolve_image<'a>(&self, src: Option<&'a str>) -> Option<&'a str> {
        src.filter(|s| self.is_allowed_image(s))
    }
}
