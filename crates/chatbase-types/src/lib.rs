pub mod models;
pub mod tables;

pub use models::{Message, MessageType, NewUsername, Presence, TypingIndicator, UsernameReservation};
pub use tables::{Table, UnknownTable};
