//! Outbound email

pub mod smtp;

#[cfg(test)]
pub mod stub_relay;
