//! Conversation flow: the scripted lead-qualification wizard.
//!
//! The flow is a fixed sequence of steps, each pairing a prompt with a
//! validation rule and a target answer field. `script` holds the step
//! table for a deployment variant, `engine` interprets it one input at a
//! time, `answers` carries the collected data and the option tables, and
//! `transcript` the exchanged messages.

pub mod answers;
pub mod engine;
pub mod script;
pub mod transcript;

pub use answers::{
    AnswerSet, BusinessSector, DocumentChoice, PrimaryNeed, RevenueBracket, ServiceLine, TaxRegime,
};
pub use engine::{Conversation, TimedMessage, Turn, TurnAction};
pub use script::{Expects, FlowOptions, Script, ScriptLine, Step, StepSpec, TextRule};
pub use transcript::{ChatMessage, ChatOption, Sender};
