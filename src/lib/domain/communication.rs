//! Communication with the outside world

pub mod email_addresses;
pub mod mailer;
