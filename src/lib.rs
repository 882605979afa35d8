//! Lead Assist: conversational lead qualification for the site chat.

pub mod bus;
pub mod cli;
pub mod config;
pub mod error;
pub mod flow;
pub mod lookup;
pub mod session;
pub mod submit;
pub mod validators;
