//! Liyu Agency intake bot: guided service-booking conversations over
//! Telegram, with a local CLI channel for testing.

pub mod booking;
pub mod channels;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod i18n;
pub mod store;
