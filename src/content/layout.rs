//! Site chrome: navigation, footer, and where each is shown.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub href: &'static str,
}

pub static NAV_ITEMS: [NavItem; 6] = [
    NavItem { label: "Home", href: "/" },
    NavItem { label: "About", href: "/about" },
    NavItem { label: "Services", href: "/services" },
    NavItem { label: "Insights", href: "/insights" },
    NavItem { label: "Partners", href: "/partners" },
    NavItem { label: "Contact", href: "/contact" },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FooterColumn {
    pub heading: &'static str,
    pub links: &'static [NavItem],
}

pub const FOOTER_COLUMNS: [FooterColumn; 3] = [
    FooterColumn {
        heading: "Company",
        links: &[
            NavItem { label: "About Us", href: "/about" },
            NavItem { label: "Partners", href: "/partners" },
            NavItem { label: "Contact", href: "/contact" },
        ],
    },
    FooterColumn {
        heading: "Services",
        links: &[
            NavItem { label: "Data Strategy", href: "/services#data-strategy" },
            NavItem { label: "Business Intelligence", href: "/services#business-intelligence" },
            NavItem { label: "Advanced Analytics", href: "/services#advanced-analytics" },
        ],
    },
    FooterColumn {
        heading: "Resources",
        links: &[
            NavItem { label: "Insights", href: "/insights" },
            NavItem { label: "Privacy Policy", href: "/privacy" },
        ],
    },
];

const ADMIN_PREFIX: &str = "/admin";

/// `/admin` and anything below it. `/administrator` is a public path.
pub fn is_admin_route(path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    match path.strip_prefix(ADMIN_PREFIX) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Which parts of the shell wrap a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chrome {
    pub navigation: bool,
    pub footer: bool,
    pub chat_widget: bool,
}

impl Chrome {
    pub fn for_route(path: &str) -> Self {
        let public = !is_admin_route(path);
        Self {
            navigation: public,
            footer: public,
            chat_widget: public,
        }
    }
}

/// Nav entry to highlight for `path`, matching on the first segment.
pub fn active_nav(path: &str) -> Option<&'static NavItem> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    if path.is_empty() || path == "/" {
        return NAV_ITEMS.iter().find(|item| item.href == "/");
    }
    NAV_ITEMS.iter()
        .filter(|item| item.href != "/")
        .find(|item| path == item.href || path.starts_with(&format!("{}/", item.href)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_routes_hide_the_shell() {
        for path in ["/admin", "/admin/", "/admin/leaders", "/admin/sub-services?page=2"] {
            assert_eq!(
                Chrome::for_route(path),
                Chrome { navigation: false, footer: false, chat_widget: false },
                "{}",
                path
            );
        }
    }

    #[test]
    fn public_routes_show_the_shell() {
        for path in ["/", "/about", "/insights/detail?id=1", "/administrator"] {
            let chrome = Chrome::for_route(path);
            assert!(chrome.navigation && chrome.footer && chrome.chat_widget, "{}", path);
        }
    }

    #[test]
    fn active_nav_matches_section() {
        assert_eq!(active_nav("/").unwrap().label, "Home");
        assert_eq!(active_nav("/insights/detail?id=4").unwrap().label, "Insights");
        assert_eq!(active_nav("/contact").unwrap().label, "Contact");
        assert!(active_nav("/admin").is_none());
    }
}
