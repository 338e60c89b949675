use crate::config::export::ExportConfig;
use crate::models::leader::Leader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Value {
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stat {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceOffering {
    pub slug: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
    pub highlights: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partner {
    pub name: &'static str,
    pub category: &'static str,
    pub logo: &'static str,
}

pub const MISSION: &str =
    "We help organisations turn raw data into decisions, pairing sound engineering with clear business insight.";

pub const VALUES: [Value; 4] = [
    Value { title: "Integrity", description: "Honest numbers, even when they are inconvenient." },
    Value { title: "Clarity", description: "Analysis that a board can read and act on." },
    Value { title: "Partnership", description: "We build alongside client teams, not around them." },
    Value { title: "Craft", description: "Pipelines and models engineered to last." },
];

pub const STATS: [Stat; 4] = [
    Stat { value: "12+", label: "Years of experience" },
    Stat { value: "150+", label: "Projects delivered" },
    Stat { value: "40+", label: "Data specialists" },
    Stat { value: "9", label: "Countries served" },
];

pub static SERVICES: [ServiceOffering; 4] = [
    ServiceOffering {
        slug: "data-strategy",
        title: "Data Strategy",
        summary: "Roadmaps that connect data investment to business outcomes.",
        highlights: &["Maturity assessment", "Data governance", "Operating model design"],
    },
    ServiceOffering {
        slug: "business-intelligence",
        title: "Business Intelligence",
        summary: "Dashboards and reporting that leadership actually uses.",
        highlights: &["KPI frameworks", "Self-service reporting", "Executive dashboards"],
    },
    ServiceOffering {
        slug: "advanced-analytics",
        title: "Advanced Analytics",
        summary: "Forecasting, segmentation and optimisation models in production.",
        highlights: &["Demand forecasting", "Customer analytics", "Machine learning operations"],
    },
    ServiceOffering {
        slug: "data-engineering",
        title: "Data Engineering",
        summary: "Reliable pipelines and platforms on modern cloud stacks.",
        highlights: &["Cloud data platforms", "ETL modernisation", "Data quality monitoring"],
    },
];

pub const PARTNERS: [Partner; 4] = [
    Partner { name: "Microsoft", category: "Cloud & BI", logo: "/partners/microsoft.svg" },
    Partner { name: "Snowflake", category: "Data platform", logo: "/partners/snowflake.svg" },
    Partner { name: "Tableau", category: "Visualisation", logo: "/partners/tableau.svg" },
    Partner { name: "Databricks", category: "Analytics platform", logo: "/partners/databricks.svg" },
];

pub fn service_by_slug(slug: &str) -> Option<&'static ServiceOffering> {
    SERVICES.iter().find(|s| s.slug == slug)
}

/// A leader as shown on the public team section.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamCard {
    pub name: String,
    pub title: String,
    pub image: Option<String>,
    pub location: Option<String>,
}

impl TeamCard {
    /// Images from hosts outside the allow-list are dropped, as the static
    /// export would fail to load them.
    pub fn from_leader(leader: &Leader, export: &ExportConfig) -> Self {
        Self {
            name: leader.name.clone(),
            title: leader.title.plain_text(),
            image: export.resolve_image(leader.image.as_deref()).map(str::to_string),
            location: leader.location.clone(),
        }
    }
}

/// Active leaders in display order.
pub fn team(leaders: &[Leader], export: &ExportConfig) -> Vec<TeamCard> {
    leaders
        .iter()
        .filter(|l| l.is_active)
        .map(|l| TeamCard::from_leader(l, export))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    About,
    Services,
    Partners,
}

impl std::str::FromStr for Page {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "about" => Ok(Page::About),
            "services" => Ok(Page::Services),
            "partners" => Ok(Page::Partners),
            other => Err(format!("Unknown page: {}", other)),
        }
    }
}

/// Plain-text rendering for the terminal.
pub fn render(page: Page) -> String {
    let mut out = String::new();
    match page {
        Page::About => {
            out.push_str(&format!("{}\n\n", MISSION));
            for value in VALUES.iter() {
                out.push_str(&format!("* {}: {}\n", value.title, value.description));
            }
            out.push('\n');
            for stat in STATS.iter() {
                out.push_str(&format!("{:>6}  {}\n", stat.value, stat.label));
            }
        }
        Page::Services => {
            for service in SERVICES.iter() {
                out.push_str(&format!("{}\n  {}\n", service.title, service.summary));
                for highlight in service.highlights {
                    out.push_str(&format!("  - {}\n", highlight));
                }
            }
        }
        Page::Partners => {
            for partner in PARTNERS.iter() {
                out.push_str(&format!("{} ({})\n", partner.name, partner.category));
            }
        }
    }
    out
}
