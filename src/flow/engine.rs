//! Conversation engine: the single driver loop over the script table.
//!
//! The engine is synchronous and side-effect free. Callers feed it visitor
//! input and receive timed bot messages plus, once the flow completes, a
//! submission handoff. Pacing, rendering and the actual delivery belong to
//! the session layer.

use std::sync::Arc;
use std::time::Duration;

use crate::flow::answers::{
    AnswerSet, BusinessSector, DocumentChoice, PrimaryNeed, RevenueBracket, ServiceLine, TaxRegime,
};
use crate::flow::script::{Expects, Script, ScriptLine, Step, StepSpec, TextRule};
use crate::flow::transcript::{ChatMessage, ChatOption};
use crate::lookup::{CityIndex, normalize};
use crate::validators::{self, FieldError};

/// A bot message paired with the typing delay that precedes its reveal.
#[derive(Debug, Clone)]
pub struct TimedMessage {
    pub message: ChatMessage,
    pub delay: Duration,
}

/// What the caller must do after feeding one input.
#[derive(Debug, Clone)]
pub enum TurnAction {
    /// Keep reading visitor input.
    Continue,
    /// Deliver the completed answers, then report the outcome through
    /// [`Conversation::finish_submission`].
    Submit(AnswerSet),
}

/// Output of one engine turn.
#[derive(Debug)]
pub struct Turn {
    pub messages: Vec<TimedMessage>,
    pub action: TurnAction,
}

impl Turn {
    fn quiet() -> Self {
        Self {
            messages: Vec::new(),
            action: TurnAction::Continue,
        }
    }
}

/// One visitor's conversation, driven step by step over a [`Script`].
pub struct Conversation {
    script: Script,
    cities: Option<Arc<CityIndex>>,
    step: Step,
    answers: AnswerSet,
    transcript: Vec<ChatMessage>,
    submitted: bool,
}

impl Default for Conversation {
    /// Default script, no city index.
    fn default() -> Self {
        Self::new(Script::default(), None)
    }
}

impl Conversation {
    pub fn new(script: Script, cities: Option<Arc<CityIndex>>) -> Self {
        Self {
            script,
            cities,
            step: Step::Intro,
            answers: AnswerSet::default(),
            transcript: Vec::new(),
            submitted: false,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn accepts_input(&self) -> bool {
        self.step.accepts_input()
    }

    /// Options attached to the pending prompt, when the current step is a
    /// choice.
    pub fn pending_options(&self) -> Option<&[ChatOption]> {
        self.script.spec(self.step).and_then(|spec| match &spec.expects {
            Expects::Choice(options) => Some(options.as_slice()),
            Expects::Text(_) => None,
        })
    }

    /// Open the conversation: greeting plus the first step's prompt.
    /// Does nothing unless the conversation is still at INTRO.
    pub fn open(&mut self) -> Vec<TimedMessage> {
        if self.step != Step::Intro {
            return Vec::new();
        }
        let mut out = Vec::new();
        self.push_bot_line(&mut out, Script::GREETING);
        self.enter_step(self.script.first_step(), &mut out);
        out
    }

    /// Discard all progress and replay the opening.
    pub fn restart(&mut self) -> Vec<TimedMessage> {
        self.step = Step::Intro;
        self.answers = AnswerSet::default();
        self.transcript.clear();
        self.submitted = false;
        self.open()
    }

    /// Feed one visitor input, free text or a typed option pick. Empty
    /// input and input at non-reading steps are ignored.
    pub fn handle_input(&mut self, raw: &str) -> Turn {
        if !self.step.accepts_input() {
            return Turn::quiet();
        }
        let input = raw.trim();
        if input.is_empty() {
            return Turn::quiet();
        }
        let Some(spec) = self.script.spec(self.step).cloned() else {
            tracing::warn!(step = %self.step, "No script row for current step");
            return Turn::quiet();
        };
        match &spec.expects {
            Expects::Choice(options) => self.handle_choice(&spec, options, input),
            Expects::Text(rule) => self.handle_text(&spec, *rule, input),
        }
    }

    /// Close the conversation with the submission outcome. Only meaningful
    /// at SUBMITTING; anything else is a no-op.
    pub fn finish_submission(&mut self, delivered: bool) -> Vec<TimedMessage> {
        if self.step != Step::Submitting {
            return Vec::new();
        }
        let (step, lines) = if delivered {
            (Step::Success, Script::SUCCESS_LINES)
        } else {
            (Step::Error, Script::ERROR_LINES)
        };
        self.step = step;
        let mut out = Vec::new();
        for line in lines {
            self.push_bot_line(&mut out, line);
        }
        out
    }

    fn handle_text(&mut self, spec: &StepSpec, rule: TextRule, input: &str) -> Turn {
        self.transcript.push(ChatMessage::user(input));
        match self.apply_text_rule(rule, input) {
            Ok(value) => self.store_text(spec, value),
            Err(reason) => self.reject(reason),
        }
    }

    fn handle_choice(&mut self, spec: &StepSpec, options: &[ChatOption], input: &str) -> Turn {
        match resolve_option(options, input) {
            Some(option) => {
                self.transcript.push(ChatMessage::user(option.label.clone()));
                self.record_choice(spec, &option.value)
            }
            None => {
                self.transcript.push(ChatMessage::user(input));
                self.reject(FieldError::OptionRequired)
            }
        }
    }

    fn apply_text_rule(&self, rule: TextRule, input: &str) -> Result<String, FieldError> {
        match rule {
            TextRule::FullName => {
                validators::validate_full_name(input)?;
                Ok(input.trim().to_string())
            }
            TextRule::Any => Ok(input.trim().to_string()),
            TextRule::Email => {
                validators::validate_email(input)?;
                Ok(input.trim().to_lowercase())
            }
            TextRule::Phone => {
                validators::validate_phone(input)?;
                Ok(validators::format_phone(input))
            }
            TextRule::City => {
                validators::validate_city_text(input)?;
                if let Some(index) = &self.cities {
                    if !index.matches(input) {
                        return Err(FieldError::CityUnknown);
                    }
                }
                Ok(input.trim().to_string())
            }
            TextRule::Document => {
                // DOC_NUMBER is only entered after a CPF/CNPJ choice
                let Some(kind) = self.answers.document_choice.and_then(|c| c.kind()) else {
                    tracing::warn!("Document number step without a document choice");
                    return Err(FieldError::OptionRequired);
                };
                validators::validate_document(kind, input)?;
                Ok(validators::format_document(kind, input))
            }
            TextRule::Message => {
                validators::validate_message(input)?;
                Ok(input.trim().to_string())
            }
        }
    }

    fn store_text(&mut self, spec: &StepSpec, value: String) -> Turn {
        match spec.step {
            Step::DocNumber => self.answers.document_number = Some(value),
            Step::Name => self.answers.name = Some(value),
            Step::Company => self.answers.company = Some(value),
            Step::Email => self.answers.email = Some(value),
            Step::Phone => self.answers.phone = Some(value),
            Step::City => self.answers.city = Some(value),
            Step::Message => self.answers.message = Some(value),
            other => {
                tracing::warn!(step = %other, "Text input at a non-text step");
                return Turn::quiet();
            }
        }
        self.goto(spec.next)
    }

    fn record_choice(&mut self, spec: &StepSpec, code: &str) -> Turn {
        match spec.step {
            Step::Service => {
                let Some(service) = ServiceLine::from_code(code) else {
                    return self.reject(FieldError::OptionRequired);
                };
                self.answers.service = Some(service);
                self.goto(spec.next)
            }
            Step::DocKind => {
                let Some(choice) = DocumentChoice::from_code(code) else {
                    return self.reject(FieldError::OptionRequired);
                };
                self.answers.document_choice = Some(choice);
                // visitors without a document skip the number step
                let next = if choice.kind().is_some() {
                    spec.next
                } else {
                    self.script
                        .spec(Step::DocNumber)
                        .map(|r| r.next)
                        .unwrap_or(Step::Name)
                };
                self.goto(next)
            }
            Step::Revenue => {
                let Some(bracket) = RevenueBracket::from_code(code) else {
                    return self.reject(FieldError::OptionRequired);
                };
                self.answers.revenue = Some(bracket);
                self.goto(spec.next)
            }
            Step::Regime => {
                let Some(regime) = TaxRegime::from_code(code) else {
                    return self.reject(FieldError::OptionRequired);
                };
                self.answers.regime = Some(regime);
                self.goto(spec.next)
            }
            Step::Sector => {
                let Some(sector) = BusinessSector::from_code(code) else {
                    return self.reject(FieldError::OptionRequired);
                };
                self.answers.sector = Some(sector);
                self.goto(spec.next)
            }
            Step::MainNeed => {
                let Some(need) = PrimaryNeed::from_code(code) else {
                    return self.reject(FieldError::OptionRequired);
                };
                self.answers.main_need = Some(need);
                if self.script.options().message_only_for_other {
                    if need == PrimaryNeed::Other {
                        return self.goto(Step::Message);
                    }
                    // menu picks submit straight away with a synthesized note
                    self.answers.message =
                        Some(format!("Desafio selecionado via menu: {}", need.label()));
                    return self.goto(Step::Submitting);
                }
                self.goto(spec.next)
            }
            other => {
                tracing::warn!(step = %other, "Choice input at a non-choice step");
                self.reject(FieldError::OptionRequired)
            }
        }
    }

    /// Enter `next`: either the submission handoff or the next prompt.
    fn goto(&mut self, next: Step) -> Turn {
        let mut messages = Vec::new();
        if next == Step::Submitting {
            if self.submitted {
                tracing::warn!("Submission already triggered; ignoring");
                return Turn::quiet();
            }
            self.step = Step::Submitting;
            self.submitted = true;
            self.push_bot_line(&mut messages, Script::SUBMITTING_NOTICE);
            return Turn {
                messages,
                action: TurnAction::Submit(self.answers.clone()),
            };
        }
        self.enter_step(next, &mut messages);
        Turn {
            messages,
            action: TurnAction::Continue,
        }
    }

    /// Move to a prompting step and queue its rendered prompt.
    fn enter_step(&mut self, step: Step, out: &mut Vec<TimedMessage>) {
        let Some(spec) = self.script.spec(step).cloned() else {
            tracing::warn!(step = %step, "No script row to enter");
            return;
        };
        self.step = step;
        let prompt = self.render_prompt(spec.prompt);
        let message = match &spec.expects {
            Expects::Choice(options) => ChatMessage::bot_with_options(prompt, options.clone()),
            Expects::Text(_) => ChatMessage::bot(prompt),
        };
        self.transcript.push(message.clone());
        out.push(TimedMessage {
            message,
            delay: spec.delay,
        });
    }

    fn render_prompt(&self, template: &str) -> String {
        let mut text = template.to_string();
        if text.contains("{first_name}") {
            let first = self.answers.first_name().unwrap_or("visitante");
            text = text.replace("{first_name}", first);
        }
        if text.contains("{document}") {
            let acronym = self
                .answers
                .document_choice
                .and_then(|c| c.kind())
                .map(|k| k.acronym())
                .unwrap_or("documento");
            text = text.replace("{document}", acronym);
        }
        text
    }

    fn reject(&mut self, reason: FieldError) -> Turn {
        tracing::debug!(step = %self.step, %reason, "Input rejected");
        let message = ChatMessage::bot(reason.to_string());
        self.transcript.push(message.clone());
        Turn {
            messages: vec![TimedMessage {
                message,
                delay: Script::RETRY_DELAY,
            }],
            action: TurnAction::Continue,
        }
    }

    fn push_bot_line(&mut self, out: &mut Vec<TimedMessage>, line: ScriptLine) {
        let message = ChatMessage::bot(line.text);
        self.transcript.push(message.clone());
        out.push(TimedMessage {
            message,
            delay: line.delay,
        });
    }
}

/// Resolve typed input against a quick-reply set: 1-based index, exact code
/// (case-insensitive), or case- and accent-insensitive label.
fn resolve_option(options: &[ChatOption], input: &str) -> Option<ChatOption> {
    if let Ok(pick) = input.parse::<usize>() {
        if (1..=options.len()).contains(&pick) {
            return Some(options[pick - 1].clone());
        }
        return None;
    }
    let folded = normalize(input);
    options
        .iter()
        .find(|o| o.value.eq_ignore_ascii_case(input) || normalize(&o.label) == folded)
        .cloned()
}
