pub mod client;
pub mod message;

pub use client::TelegramBot;
pub use message::format_summary;
