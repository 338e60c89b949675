use log::{ info, warn };
use std::error::Error;
use std::sync::Arc;
use tokio::io::{ AsyncBufReadExt, BufReader };

use super::{ Command, LeaderFields, LeadersCommand, ListArgs, ProfileCommand, SubServicesCommand };
use crate::api::{ ApiClient, Attachment, HttpTransport };
use crate::chat::{ ChatWidget, SendOutcome };
use crate::config::SiteConfig;
use crate::content::insights::{ self, InsightDetail };
use crate::content::layout::{ self, Chrome };
use crate::content::pages::{ self, Page };
use crate::content::{ ContactPage, InsightsPage };
use crate::forms::{ ContactForm, LeaderForm, LoginForm, PasswordForm, ProfileForm, SubServiceForm };
use crate::models::leader::Leader;
use crate::notify::{ LogNotifier, NoticeLevel };
use crate::profile::ProfileController;
use crate::reorder::DropEvent;
use crate::resource::leaders::Leaders;
use crate::resource::sub_services::SubServices;
use crate::resource::{ ListController, ListFilters, MutationOutcome };
use crate::session::{ FileSessionStore, Session };

type CliResult = Result<(), Box<dyn Error + Send + Sync>>;

/// Everything a command needs: both API clients, the session and the
/// notice sink.
pub struct Portal {
    pub config: SiteConfig,
    pub session: Session,
    pub api: ApiClient,
    pub chat_api: ApiClient,
    pub notifier: Arc<LogNotifier>,
}

impl Portal {
    pub fn new(config: SiteConfig) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let session = Session::new(Arc::new(FileSessionStore::new(&config.session_file)));
        let api = ApiClient::new(
            Arc::new(HttpTransport::new(&config.api_url, session.clone(), config.request_timeout)?)
        );
        let chat_api = ApiClient::new(
            Arc::new(HttpTransport::new(&config.chat_api_url, session.clone(), config.request_timeout)?)
        );
        Ok(Self {
            config,
            session,
            api,
            chat_api,
            notifier: Arc::new(LogNotifier::new()),
        })
    }

    fn leaders(&self) -> ListController<Leaders> {
        ListController::new(self.api.clone(), self.notifier.clone())
    }

    fn sub_services(&self) -> ListController<SubServices> {
        ListController::new(self.api.clone(), self.notifier.clone())
    }

    fn profile(&self) -> ProfileController {
        ProfileController::new(self.api.clone(), self.session.clone(), self.notifier.clone())
    }

    /// Prints the notices raised by the last command.
    fn flush_notices(&self) {
        for notice in self.notifier.drain() {
            match notice.level {
                NoticeLevel::Error => eprintln!("✗ {}", notice.message),
                NoticeLevel::Success => println!("✓ {}", notice.message),
                NoticeLevel::Info => println!("• {}", notice.message),
            }
        }
    }
}

pub async fn execute(portal: &Portal, command: Command) -> CliResult {
    let result = dispatch(portal, command).await;
    portal.flush_notices();
    result
}

async fn dispatch(portal: &Portal, command: Command) -> CliResult {
    match command {
        Command::Login { email, password } => {
            let user = portal.profile().login(&LoginForm { email, password }).await?;
            println!("Signed in as {} <{}>", user.name, user.email);
        }
        Command::Logout => portal.profile().logout()?,
        Command::Profile { action } => profile(portal, action).await?,
        Command::Leaders { action } => leaders(portal, action).await?,
        Command::SubServices { action } => sub_services(portal, action).await?,
        Command::Chat { message } => chat(portal, message).await?,
        Command::Contact { name, email, message, company, phone, subject } => {
            let form = ContactForm { name, email, company, phone, subject, message };
            ContactPage::new(portal.api.clone(), portal.notifier.clone()).submit(&form).await?;
        }
        Command::Insights { id } => show_insights(portal, id).await?,
        Command::Page { name } if name.eq_ignore_ascii_case("team") => {
            let controller = portal.leaders();
            controller.mount().await?;
            for card in pages::team(&controller.items(), &portal.config.export) {
                println!("{} | {}", card.name, card.title);
                if let Some(location) = &card.location {
                    println!("  {}", location);
                }
                if let Some(image) = &card.image {
                    println!("  [image: {}]", image);
                }
            }
        }
        Command::Page { name } => {
            let page: Page = name.parse()?;
            print!("{}", pages::render(page));
        }
        Command::Prefs { theme, language } => {
            if let Some(theme) = theme {
                portal.session.set_theme(theme)?;
            }
            if let Some(language) = language {
                portal.session.set_language(language)?;
            }
            let language = portal.session.language()?;
            println!("theme: {}", portal.session.theme()?);
            println!(
                "language: {} ({})",
                language,
                if language.is_rtl() { "right-to-left" } else { "left-to-right" }
            );
        }
        Command::Route { path } => {
            let chrome = Chrome::for_route(&path);
            println!("navigation: {}", chrome.navigation);
            println!("footer: {}", chrome.footer);
            println!("chat widget: {}", chrome.chat_widget);
            if let Some(item) = layout::active_nav(&path) {
                println!("active: {}", item.label);
            }
        }
    }
    Ok(())
}

async fn profile(portal: &Portal, action: ProfileCommand) -> CliResult {
    let controller = portal.profile();
    match action {
        ProfileCommand::Show => {
            let user = controller.load().await?;
            println!("{} <{}>", user.name, user.email);
            if let Some(role) = &user.role {
                println!("role: {}", role);
            }
        }
        ProfileCommand::Update { name, email } => {
            let user = controller.update(&ProfileForm { name, email }).await?;
            println!("{} <{}>", user.name, user.email);
        }
        ProfileCommand::Password { current, new, confirm } => {
            let form = PasswordForm {
                current_password: current,
                new_password: new,
                confirm_password: confirm,
            };
            controller.change_password(&form).await?;
        }
    }
    Ok(())
}

fn list_filters(args: &ListArgs) -> ListFilters {
    ListFilters {
        search: args.search.trim().to_string(),
        status: args.status,
        ..ListFilters::default()
    }
}

fn apply_leader_fields(form: &mut LeaderForm, fields: LeaderFields) -> Result<(), std::io::Error> {
    let LeaderFields {
        title,
        bio,
        location,
        experience,
        projects_led,
        email,
        phone,
        linkedin,
        education,
        membership,
        realised_projects,
        active,
        image,
    } = fields;

    form.title = title.or(form.title.take());
    form.bio = bio.or(form.bio.take());
    form.location = location.or(form.location.take());
    form.experience = experience.or(form.experience);
    form.projects_led = projects_led.or(form.projects_led);
    form.email = email.or(form.email.take());
    form.phone = phone.or(form.phone.take());
    form.linkedin = linkedin.or(form.linkedin.take());
    if !education.is_empty() {
        form.education = education;
    }
    if !membership.is_empty() {
        form.professional_membership = membership;
    }
    form.realised_projects = realised_projects.or(form.realised_projects.take());
    form.is_active = active.or(form.is_active);
    if let Some(path) = image {
        form.image = Some(Attachment::from_path(&path)?);
    }
    Ok(())
}

fn print_leaders(items: &[Leader]) {
    if items.is_empty() {
        println!("No leaders found.");
        return;
    }
    for (position, leader) in items.iter().enumerate() {
        println!(
            "{:>3}. {} | {} | {} [{}]",
            position,
            leader.name,
            leader.title.excerpt(40),
            if leader.is_active { "active" } else { "inactive" },
            leader.id
        );
    }
}

async fn leaders(portal: &Portal, action: LeadersCommand) -> CliResult {
    let controller = portal.leaders();
    match action {
        LeadersCommand::List { filters } => {
            controller.apply_filters(list_filters(&filters)).await?;
            print_leaders(&controller.items());
        }
        LeadersCommand::Create { name, fields } => {
            let mut form = LeaderForm::new(name);
            apply_leader_fields(&mut form, fields)?;
            controller.open_create();
            controller.create(&form).await?;
            print_leaders(&controller.items());
        }
        LeadersCommand::Update { id, name, fields } => {
            controller.mount().await?;
            let current = controller
                .items()
                .into_iter()
                .find(|l| l.id == id)
                .ok_or_else(|| format!("No leader with id {}", id))?;
            let mut form = LeaderForm::from(&current);
            if let Some(name) = name {
                form.name = name.trim().to_string();
            }
            apply_leader_fields(&mut form, fields)?;
            controller.open_edit(&id);
            controller.update(&id, &form).await?;
        }
        LeadersCommand::Delete { id, yes } => {
            controller.request_delete(&id);
            if !yes {
                controller.cancel_delete();
                warn!("Deletion of leader {} not confirmed", id);
                println!("Re-run with --yes to delete leader {}", id);
                return Ok(());
            }
            controller.confirm_delete().await?;
        }
        LeadersCommand::Move { from, to } => {
            controller.mount().await?;
            if controller.handle_drop(DropEvent::new(from, to)).await? == MutationOutcome::NoChange {
                println!("Order unchanged");
            }
            print_leaders(&controller.items());
        }
        LeadersCommand::Reorder { ids } => {
            controller.reorder(ids).await?;
            controller.fetch().await?;
            print_leaders(&controller.items());
        }
    }
    Ok(())
}

async fn sub_services(portal: &Portal, action: SubServicesCommand) -> CliResult {
    let controller = portal.sub_services();
    let print = |controller: &ListController<SubServices>| {
        let state = controller.snapshot();
        if state.items.is_empty() {
            println!("No sub-services found.");
        }
        for (position, sub) in state.items.iter().enumerate() {
            println!(
                "{:>3}. {} | {} | {} [{}]",
                position,
                sub.name,
                sub.main_service_id.name().unwrap_or(sub.main_service_id.id()),
                if sub.is_active { "active" } else { "inactive" },
                sub.id
            );
        }
        if let Some(pagination) = state.pagination {
            println!(
                "page {}/{} ({} total)",
                pagination.current_page,
                pagination.total_pages,
                pagination.total_items
            );
        }
    };

    match action {
        SubServicesCommand::List { filters, category, page } => {
            let filters = ListFilters { category, page, ..list_filters(&filters) };
            controller.apply_filters(filters).await?;
            print(&controller);
        }
        SubServicesCommand::Create { name, main_service, description, active } => {
            let form = SubServiceForm {
                description,
                is_active: active,
                ..SubServiceForm::new(name, main_service)
            };
            controller.open_create();
            controller.create(&form).await?;
            print(&controller);
        }
        SubServicesCommand::Update { id, name, main_service, description, active } => {
            let form = SubServiceForm {
                description,
                is_active: active,
                ..SubServiceForm::new(name, main_service)
            };
            controller.open_edit(&id);
            controller.update(&id, &form).await?;
        }
        SubServicesCommand::Delete { id, yes } => {
            controller.request_delete(&id);
            if !yes {
                controller.cancel_delete();
                println!("Re-run with --yes to delete sub-service {}", id);
                return Ok(());
            }
            controller.confirm_delete().await?;
        }
        SubServicesCommand::Toggle { id } => {
            controller.toggle_status(&id).await?;
        }
        SubServicesCommand::Move { from, to, page } => {
            controller.apply_filters(ListFilters { page, ..ListFilters::default() }).await?;
            controller.handle_drop(DropEvent::new(from, to)).await?;
            print(&controller);
        }
        SubServicesCommand::Categories => {
            for category in controller.categories().await? {
                println!("{} [{}]", category.name, category.id);
            }
        }
    }
    Ok(())
}

async fn chat(portal: &Portal, message: Option<String>) -> CliResult {
    let widget = ChatWidget::new(portal.chat_api.clone(), portal.notifier.clone());
    if let Some(message) = message {
        if let SendOutcome::Replied(reply) = widget.send(&message).await? {
            println!("{}", reply.text);
        }
        return Ok(());
    }

    widget.open().await?;
    info!("Chat open, one message per line; /voice to dictate, /reset to start over");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let outcome = match line.trim() {
            "/reset" => {
                widget.reset();
                continue;
            }
            "/voice" => widget.dictate().await,
            text => widget.send(text).await,
        };
        match outcome {
            Ok(SendOutcome::Replied(reply)) => println!("bot: {}", reply.text),
            Ok(_) => {}
            Err(e) if e.is_cancelled() => break,
            Err(_) => {}
        }
        portal.flush_notices();
    }
    widget.close();
    Ok(())
}

async fn show_insights(portal: &Portal, id: Option<String>) -> CliResult {
    let page = InsightsPage::new(portal.api.clone(), portal.notifier.clone());
    match id {
        None => {
            let items = page.load().await?;
            if items.is_empty() {
                println!("{}", insights::EMPTY_LIST);
            }
            for insight in items {
                println!(
                    "{} | {} [{}]",
                    insight.title,
                    insight.category.as_deref().unwrap_or("General"),
                    insight.id
                );
            }
        }
        Some(id) => {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .append_pair("id", &id)
                .finish();
            match page.detail(&query).await? {
                InsightDetail::Found(insight) => {
                    println!("{}\n", insight.title);
                    if let Some(image) = portal.config.export.resolve_image(insight.image.as_deref()) {
                        println!("[image: {}]", image);
                    }
                    println!("{}", insight.body.plain_text());
                }
                other => {
                    if let Some(message) = other.empty_state() {
                        println!("{}", message);
                    }
                }
            }
        }
    }
    Ok(())
}
