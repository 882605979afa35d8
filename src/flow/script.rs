//! The conversation script: one explicit table mapping each step to its
//! prompt, typing delay, expected input and successor.
//!
//! Variants (collect a document or not, check the city or not, always ask
//! for a message or only for the catch-all need) are expressed through
//! `FlowOptions` when the table is built, so the engine interprets a single
//! table instead of branching on product flags.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::flow::answers::{
    BusinessSector, DocumentChoice, PrimaryNeed, RevenueBracket, ServiceLine, TaxRegime,
};
use crate::flow::transcript::ChatOption;

/// One discrete stage of the conversational wizard, in script order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Intro,
    Service,
    DocKind,
    DocNumber,
    Name,
    Company,
    Email,
    Phone,
    City,
    Revenue,
    Regime,
    Sector,
    MainNeed,
    Message,
    Submitting,
    Success,
    Error,
}

impl Step {
    /// Terminal steps end the session; nothing follows them.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Step::Success | Step::Error)
    }

    /// Whether the assistant reads visitor input at this step.
    pub fn accepts_input(&self) -> bool {
        !matches!(
            self,
            Step::Intro | Step::Submitting | Step::Success | Step::Error
        )
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Step::Intro => "intro",
            Step::Service => "service",
            Step::DocKind => "doc_kind",
            Step::DocNumber => "doc_number",
            Step::Name => "name",
            Step::Company => "company",
            Step::Email => "email",
            Step::Phone => "phone",
            Step::City => "city",
            Step::Revenue => "revenue",
            Step::Regime => "regime",
            Step::Sector => "sector",
            Step::MainNeed => "main_need",
            Step::Message => "message",
            Step::Submitting => "submitting",
            Step::Success => "success",
            Step::Error => "error",
        };
        write!(f, "{}", s)
    }
}

/// Validation rule applied to a free-text step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRule {
    /// First plus last name, at least three characters.
    FullName,
    /// Any non-empty text, stored trimmed.
    Any,
    Email,
    Phone,
    /// Minimum length plus the optional reference-list match.
    City,
    /// CPF or CNPJ, depending on the earlier document choice.
    Document,
    /// Free text with a minimum length.
    Message,
}

/// What kind of input a step expects.
#[derive(Debug, Clone)]
pub enum Expects {
    Text(TextRule),
    Choice(Vec<ChatOption>),
}

/// A single row of the conversation script.
#[derive(Debug, Clone)]
pub struct StepSpec {
    pub step: Step,
    /// Prompt sent when the step is entered. `{first_name}` and
    /// `{document}` are substituted at render time.
    pub prompt: &'static str,
    /// Typing delay before the prompt is revealed.
    pub delay: Duration,
    pub expects: Expects,
    /// Step entered after this one validates. The engine overrides this
    /// on the two dynamic branches (document choice, catch-all need).
    pub next: Step,
}

/// Which optional steps a deployment runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowOptions {
    /// Open with the service-line selection.
    pub collect_service: bool,
    /// Ask for a CPF/CNPJ before the name.
    pub collect_document: bool,
    /// Check the city against the locality list when one is loaded.
    pub check_city: bool,
    /// Ask the free-text message only when the main need is "outro";
    /// otherwise submit straight away with a synthesized message.
    pub message_only_for_other: bool,
}

impl Default for FlowOptions {
    fn default() -> Self {
        Self {
            collect_service: true,
            collect_document: false,
            check_city: false,
            message_only_for_other: true,
        }
    }
}

/// A scripted line with its typing delay.
#[derive(Debug, Clone, Copy)]
pub struct ScriptLine {
    pub text: &'static str,
    pub delay: Duration,
}

const PROMPT_SERVICE: &str = "Para começarmos, qual dessas soluções você está buscando hoje?";
const PROMPT_DOC_KIND: &str = "Para personalizar o atendimento: você já possui CPF ou CNPJ?";
const PROMPT_DOC_NUMBER: &str =
    "Certo! Digite o número do seu {document}, com ou sem pontuação.";
const PROMPT_NAME_AFTER_SERVICE: &str =
    "Ótima escolha! Para prosseguirmos com a consultoria, qual é o seu nome completo?";
const PROMPT_NAME_AFTER_DOCUMENT: &str = "Perfeito! Qual é o seu nome completo?";
const PROMPT_NAME_OPENING: &str = "Para começarmos, qual é o seu nome completo?";
const PROMPT_COMPANY: &str = "Prazer, {first_name}! Qual o nome da sua empresa?";
const PROMPT_EMAIL: &str = "Agora, qual é o seu melhor e-mail corporativo?";
const PROMPT_PHONE: &str = "Qual seu WhatsApp (DDD + 9 dígitos)?";
const PROMPT_CITY: &str = "Qual a sua cidade e estado (ex: Maringá - PR)?";
const PROMPT_REVENUE: &str = "Qual o faturamento mensal estimado da empresa?";
const PROMPT_REGIME: &str = "Qual o Regime Tributário atual?";
const PROMPT_SECTOR: &str = "Qual é o setor de atuação principal?";
const PROMPT_MAIN_NEED: &str = "Qual o seu maior objetivo hoje?";
const PROMPT_MESSAGE: &str = "Para finalizar, descreva brevemente como podemos ajudar.";

/// The ordered script for one deployment variant.
#[derive(Debug, Clone)]
pub struct Script {
    options: FlowOptions,
    rows: Vec<StepSpec>,
}

impl Script {
    /// Opening line sent when the assistant is opened.
    pub const GREETING: ScriptLine = ScriptLine {
        text: "Olá! Sou o seu assistente virtual. 🤖",
        delay: Duration::from_millis(500),
    };

    /// Notice shown while the lead is being delivered.
    pub const SUBMITTING_NOTICE: ScriptLine = ScriptLine {
        text: "Analisando seus dados e enviando para nossa equipe...",
        delay: Duration::from_millis(500),
    };

    /// Closing lines for a delivered lead.
    pub const SUCCESS_LINES: [ScriptLine; 2] = [
        ScriptLine {
            text: "✅ Tudo certo! Recebemos sua solicitação.",
            delay: Duration::from_millis(1000),
        },
        ScriptLine {
            text: "Nossos especialistas em consultoria tributária entrarão em contato em breve pelo WhatsApp.",
            delay: Duration::from_millis(2000),
        },
    ];

    /// Closing lines for a failed delivery, pointing at the fallback channel.
    pub const ERROR_LINES: [ScriptLine; 2] = [
        ScriptLine {
            text: "Ops! Houve um erro de conexão.",
            delay: Duration::from_millis(1000),
        },
        ScriptLine {
            text: "Por favor, tente falar diretamente com nossa equipe pelo WhatsApp.",
            delay: Duration::from_millis(2000),
        },
    ];

    /// Delay before a validation re-prompt.
    pub const RETRY_DELAY: Duration = Duration::from_millis(500);

    /// Build the step table for the given variant.
    pub fn new(options: FlowOptions) -> Self {
        let mut rows = Vec::new();

        if options.collect_service {
            rows.push(row(
                Step::Service,
                PROMPT_SERVICE,
                1500,
                Expects::Choice(ServiceLine::options()),
            ));
        }
        if options.collect_document {
            rows.push(row(
                Step::DocKind,
                PROMPT_DOC_KIND,
                600,
                Expects::Choice(DocumentChoice::options()),
            ));
            rows.push(row(
                Step::DocNumber,
                PROMPT_DOC_NUMBER,
                600,
                Expects::Text(TextRule::Document),
            ));
        }

        let name_prompt = if options.collect_document {
            PROMPT_NAME_AFTER_DOCUMENT
        } else if options.collect_service {
            PROMPT_NAME_AFTER_SERVICE
        } else {
            PROMPT_NAME_OPENING
        };
        rows.push(row(Step::Name, name_prompt, 600, Expects::Text(TextRule::FullName)));
        rows.push(row(Step::Company, PROMPT_COMPANY, 600, Expects::Text(TextRule::Any)));
        rows.push(row(Step::Email, PROMPT_EMAIL, 600, Expects::Text(TextRule::Email)));
        rows.push(row(Step::Phone, PROMPT_PHONE, 600, Expects::Text(TextRule::Phone)));
        rows.push(row(Step::City, PROMPT_CITY, 600, Expects::Text(TextRule::City)));
        rows.push(row(
            Step::Revenue,
            PROMPT_REVENUE,
            800,
            Expects::Choice(RevenueBracket::options()),
        ));
        rows.push(row(
            Step::Regime,
            PROMPT_REGIME,
            600,
            Expects::Choice(TaxRegime::options()),
        ));
        rows.push(row(
            Step::Sector,
            PROMPT_SECTOR,
            600,
            Expects::Choice(BusinessSector::options()),
        ));
        rows.push(row(
            Step::MainNeed,
            PROMPT_MAIN_NEED,
            600,
            Expects::Choice(PrimaryNeed::options()),
        ));
        rows.push(row(
            Step::Message,
            PROMPT_MESSAGE,
            600,
            Expects::Text(TextRule::Message),
        ));

        // Wire successors in listed order; the last row flows into SUBMITTING.
        for i in 0..rows.len() {
            rows[i].next = match rows.get(i + 1) {
                Some(following) => following.step,
                None => Step::Submitting,
            };
        }
        if options.message_only_for_other {
            // MESSAGE stays in the table but is only entered via the
            // catch-all branch; MAIN_NEED submits directly otherwise.
            if let Some(main_need) = rows.iter_mut().find(|r| r.step == Step::MainNeed) {
                main_need.next = Step::Submitting;
            }
        }

        Self { options, rows }
    }

    pub fn options(&self) -> FlowOptions {
        self.options
    }

    /// The row for a step, if the variant includes it.
    pub fn spec(&self, step: Step) -> Option<&StepSpec> {
        self.rows.iter().find(|r| r.step == step)
    }

    /// First interactive step after the greeting.
    pub fn first_step(&self) -> Step {
        self.rows.first().map(|r| r.step).unwrap_or(Step::Name)
    }
}

impl Default for Script {
    fn default() -> Self {
        Self::new(FlowOptions::default())
    }
}

fn row(step: Step, prompt: &'static str, delay_ms: u64, expects: Expects) -> StepSpec {
    StepSpec {
        step,
        prompt,
        delay: Duration::from_millis(delay_ms),
        expects,
        next: Step::Submitting,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn successor(script: &Script, step: Step) -> Step {
        script.spec(step).expect("step missing from script").next
    }

    #[test]
    fn default_script_runs_service_to_main_need() {
        let script = Script::default();
        assert_eq!(script.first_step(), Step::Service);
        assert_eq!(successor(&script, Step::Service), Step::Name);
        assert_eq!(successor(&script, Step::Name), Step::Company);
        assert_eq!(successor(&script, Step::Company), Step::Email);
        assert_eq!(successor(&script, Step::Email), Step::Phone);
        assert_eq!(successor(&script, Step::Phone), Step::City);
        assert_eq!(successor(&script, Step::City), Step::Revenue);
        assert_eq!(successor(&script, Step::Revenue), Step::Regime);
        assert_eq!(successor(&script, Step::Regime), Step::Sector);
        assert_eq!(successor(&script, Step::Sector), Step::MainNeed);
    }

    #[test]
    fn default_main_need_submits_directly() {
        let script = Script::default();
        assert_eq!(successor(&script, Step::MainNeed), Step::Submitting);
        // the MESSAGE row still exists for the catch-all branch
        assert_eq!(successor(&script, Step::Message), Step::Submitting);
    }

    #[test]
    fn always_message_variant_routes_through_message() {
        let script = Script::new(FlowOptions {
            message_only_for_other: false,
            ..Default::default()
        });
        assert_eq!(successor(&script, Step::MainNeed), Step::Message);
    }

    #[test]
    fn document_variant_inserts_the_pair() {
        let script = Script::new(FlowOptions {
            collect_document: true,
            ..Default::default()
        });
        assert_eq!(successor(&script, Step::Service), Step::DocKind);
        assert_eq!(successor(&script, Step::DocKind), Step::DocNumber);
        assert_eq!(successor(&script, Step::DocNumber), Step::Name);
    }

    #[test]
    fn minimal_variant_opens_with_name() {
        let script = Script::new(FlowOptions {
            collect_service: false,
            collect_document: false,
            ..Default::default()
        });
        assert_eq!(script.first_step(), Step::Name);
        assert!(script.spec(Step::Service).is_none());
        assert!(script.spec(Step::DocKind).is_none());
    }

    #[test]
    fn choice_steps_carry_their_tables() {
        let script = Script::default();
        match &script.spec(Step::Revenue).unwrap().expects {
            Expects::Choice(options) => assert_eq!(options.len(), 5),
            other => panic!("expected choice step, got {:?}", other),
        }
    }

    #[test]
    fn terminal_and_busy_steps_reject_input() {
        assert!(Step::Success.is_terminal());
        assert!(Step::Error.is_terminal());
        assert!(!Step::Submitting.is_terminal());
        for step in [Step::Intro, Step::Submitting, Step::Success, Step::Error] {
            assert!(!step.accepts_input());
        }
        assert!(Step::Name.accepts_input());
        assert!(Step::MainNeed.accepts_input());
    }

    #[test]
    fn display_matches_serde() {
        for step in [
            Step::Intro,
            Step::Service,
            Step::DocKind,
            Step::DocNumber,
            Step::Name,
            Step::Company,
            Step::Email,
            Step::Phone,
            Step::City,
            Step::Revenue,
            Step::Regime,
            Step::Sector,
            Step::MainNeed,
            Step::Message,
            Step::Submitting,
            Step::Success,
            Step::Error,
        ] {
            let json = serde_json::to_string(&step).unwrap();
            assert_eq!(json, format!("\"{}\"", step));
        }
    }
}
