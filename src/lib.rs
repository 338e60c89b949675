pub mod api;
pub mod chat;
pub mod cli;
pub mod config;
pub mod content;
pub mod forms;
pub mod models;
pub mod notify;
pub mod profile;
pub mod reorder;
pub mod resource;
pub mod session;

#[cfg(test)]
mod testing;

use cli::commands::{ self, Portal };
use cli::Args;
use config::SiteConfig;
use std::error::Error;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = SiteConfig::from_args(&args);
    config.log_summary();

    let portal = Portal::new(config)?;
    commands::execute(&portal, args.command).await
}
