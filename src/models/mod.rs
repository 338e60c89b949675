pub mod chat;
pub mod insight;
pub mod leader;
pub mod pagination;
pub mod profile;
pub mod rich_text;
pub mod service;

pub use rich_text::RichText;
