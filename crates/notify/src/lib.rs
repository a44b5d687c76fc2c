//! Messaging adapters implementing `vigil_core::notify::port::Notifier`.

pub mod email;
pub mod telegram;

pub use email::EmailNotifier;
pub use telegram::TelegramNotifier;
