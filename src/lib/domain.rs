//! Domain logic

pub mod communication;
pub mod submissions;
