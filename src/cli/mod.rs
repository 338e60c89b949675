pub mod commands;

use clap::{ Parser, Subcommand };
use std::path::PathBuf;

use crate::config::preferences::{ Language, Theme };
use crate::resource::StatusFilter;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- API Args ---
    /// Base URL of the admin/content REST API
    #[arg(long, env = "PORTAL_API_URL", default_value = "http://localhost:5000/api")]
    pub api_url: String,

    /// Base URL of the chat backend. Defaults to the API URL when unset
    #[arg(long, env = "NEXT_PUBLIC_API_URL")]
    pub chat_api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "PORTAL_REQUEST_TIMEOUT_SECS", default_value = "30")]
    pub request_timeout_secs: u64,

    // --- Site Args ---
    /// Analytics measurement id, carried as configuration only
    #[arg(long, env = "NEXT_PUBLIC_GA_ID")]
    pub ga_id: Option<String>,

    /// Comma-separated hosts remote images may be loaded from
    #[arg(long, env = "PORTAL_IMAGE_HOSTS")]
    pub image_hosts: Option<String>,

    // --- Session Args ---
    /// File holding the token, cached user and display preferences
    #[arg(long, env = "PORTAL_SESSION_FILE", default_value = ".portal-session.json")]
    pub session_file: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Sign in to the admin panel
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored token and user
    Logout,
    /// Show or edit the signed-in admin profile
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },
    /// Manage the leadership team
    Leaders {
        #[command(subcommand)]
        action: LeadersCommand,
    },
    /// Manage sub-services
    SubServices {
        #[command(subcommand)]
        action: SubServicesCommand,
    },
    /// Talk to the site assistant. Each line on stdin is one message
    Chat {
        /// Send a single message and exit
        #[arg(long)]
        message: Option<String>,
    },
    /// Send the contact form
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        message: String,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        subject: Option<String>,
    },
    /// List insights, or show one with --id
    Insights {
        #[arg(long)]
        id: Option<String>,
    },
    /// Print a public page (about, services, partners, team)
    Page {
        name: String,
    },
    /// Show or change display preferences
    Prefs {
        #[arg(long)]
        theme: Option<Theme>,
        #[arg(long)]
        language: Option<Language>,
    },
    /// Show which parts of the site shell a route renders
    Route {
        path: String,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ProfileCommand {
    Show,
    Update {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    Password {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
        #[arg(long)]
        confirm: String,
    },
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct ListArgs {
    #[arg(long, default_value = "")]
    pub search: String,
    #[arg(long, default_value = "all")]
    pub status: StatusFilter,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct LeaderFields {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub bio: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub experience: Option<u32>,
    #[arg(long)]
    pub projects_led: Option<u32>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub linkedin: Option<String>,
    /// Comma-separated
    #[arg(long, value_delimiter = ',')]
    pub education: Vec<String>,
    /// Comma-separated
    #[arg(long, value_delimiter = ',')]
    pub membership: Vec<String>,
    #[arg(long)]
    pub realised_projects: Option<String>,
    #[arg(long)]
    pub active: Option<bool>,
    /// Portrait to upload
    #[arg(long)]
    pub image: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum LeadersCommand {
    List {
        #[command(flatten)]
        filters: ListArgs,
    },
    Create {
        #[arg(long)]
        name: String,
        #[command(flatten)]
        fields: LeaderFields,
    },
    Update {
        id: String,
        /// New name; the current one is kept when omitted
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        fields: LeaderFields,
    },
    Delete {
        id: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Move the leader at FROM to TO (zero-based positions)
    Move {
        from: usize,
        to: usize,
    },
    /// Submit a full id order
    Reorder {
        ids: Vec<String>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum SubServicesCommand {
    List {
        #[command(flatten)]
        filters: ListArgs,
        /// Parent service id
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value = "1")]
        page: u32,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        main_service: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },
    Update {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        main_service: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },
    Delete {
        id: String,
        #[arg(long)]
        yes: bool,
    },
    /// Flip active/inactive
    Toggle {
        id: String,
    },
    Move {
        from: usize,
        to: usize,
        #[arg(long, default_value = "1")]
        page: u32,
    },
    /// List parent service categories
    Categories,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leader_create_parses_lists_and_image() {
        let args = Args::parse_from([
            "insight-portal",
            "leaders",
            "create",
            "--name",
            "Nadia",
            "--education",
            "MSc Statistics,BSc Maths",
            "--image",
            "nadia.png",
        ]);
        match args.command {
            Command::Leaders { action: LeadersCommand::Create { name, fields } } => {
                assert_eq!(name, "Nadia");
                assert_eq!(fields.education, vec!["MSc Statistics", "BSc Maths"]);
                assert_eq!(fields.image, Some(PathBuf::from("nadia.png")));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(args.api_url, "http://localhost:5000/api");
    }

    #[test]
    fn status_filter_is_validated() {
        assert!(
            Args::try_parse_from(["insight-portal", "leaders", "list", "--status", "archived"]).is_err()
        );
        let args = Args::parse_from(["insight-portal", "prefs", "--theme", "dark", "--language", "ar"]);
        assert!(matches!(args.command, Command::Prefs { theme: Some(Theme::Dark), language: Some(Language::Arabic) }));
    }
}
