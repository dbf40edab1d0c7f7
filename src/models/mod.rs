pub mod chat;
pub mod webhook;
