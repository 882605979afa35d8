//! Lead delivery: payload shape and the webhook client.
//!
//! A completed answer set is flattened into a pt-BR keyed payload, labels
//! substituted for enum codes, and POSTed as JSON to the configured
//! endpoint. Exactly one attempt: any 2xx is success, everything else
//! (including transport failures) maps to the conversation's ERROR close.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SubmitError;
use crate::flow::answers::AnswerSet;

const NOT_INFORMED: &str = "Não informado";
const NOT_INFORMED_F: &str = "Não informada";

/// Contact block of the lead payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactSection {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "email")]
    pub email: String,
    #[serde(rename = "telefone")]
    pub phone: String,
    #[serde(rename = "empresa")]
    pub company: String,
    #[serde(rename = "cidade", default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(rename = "documento", default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
}

/// Qualification block of the lead payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualificationSection {
    #[serde(
        rename = "servico_interesse",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub service: Option<String>,
    #[serde(rename = "faturamento_estimado")]
    pub revenue: String,
    #[serde(rename = "regime_tributario")]
    pub regime: String,
    #[serde(rename = "setor_atuacao")]
    pub sector: String,
    #[serde(rename = "necessidade_principal")]
    pub need: String,
}

/// Payload posted to the lead webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadPayload {
    #[serde(rename = "data_envio")]
    pub sent_at: String,
    #[serde(rename = "origem")]
    pub origin: String,
    #[serde(rename = "contato")]
    pub contact: ContactSection,
    #[serde(rename = "qualificacao_lead")]
    pub qualification: QualificationSection,
    #[serde(rename = "mensagem")]
    pub message: String,
}

impl LeadPayload {
    /// Flatten a completed answer set. Labels, not codes, go on the wire;
    /// fields the variant never collected are omitted, answered-but-empty
    /// ones fall back to "Não informado".
    pub fn from_answers(answers: &AnswerSet, origin: &str) -> Self {
        let document = answers.document_choice.map(|choice| match choice.kind() {
            Some(_) => match &answers.document_number {
                Some(number) => format!("{} {}", choice.code(), number),
                None => choice.code().to_string(),
            },
            None => NOT_INFORMED.to_string(),
        });

        Self {
            sent_at: chrono::Local::now().format("%d/%m/%Y %H:%M:%S").to_string(),
            origin: origin.to_string(),
            contact: ContactSection {
                name: answers.name.clone().unwrap_or_else(|| NOT_INFORMED.into()),
                email: answers.email.clone().unwrap_or_else(|| NOT_INFORMED.into()),
                phone: answers.phone.clone().unwrap_or_else(|| NOT_INFORMED.into()),
                company: answers
                    .company
                    .clone()
                    .unwrap_or_else(|| NOT_INFORMED_F.into()),
                city: answers.city.clone(),
                document,
            },
            qualification: QualificationSection {
                service: answers.service.map(|s| s.label().to_string()),
                revenue: answers
                    .revenue
                    .map(|v| v.label().to_string())
                    .unwrap_or_else(|| NOT_INFORMED.into()),
                regime: answers
                    .regime
                    .map(|v| v.label().to_string())
                    .unwrap_or_else(|| NOT_INFORMED.into()),
                sector: answers
                    .sector
                    .map(|v| v.label().to_string())
                    .unwrap_or_else(|| NOT_INFORMED.into()),
                need: answers
                    .main_need
                    .map(|v| v.label().to_string())
                    .unwrap_or_else(|| NOT_INFORMED.into()),
            },
            message: answers.message.clone().unwrap_or_default(),
        }
    }
}

/// Transport for delivering one completed lead.
#[async_trait]
pub trait LeadSink: Send + Sync {
    /// Deliver the lead. Exactly one attempt, no retries.
    async fn deliver(&self, lead: &LeadPayload) -> Result<(), SubmitError>;
}

/// Delivers leads to an HTTP webhook as JSON.
pub struct WebhookSink {
    client: reqwest::Client,
    endpoint: String,
}

impl WebhookSink {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl LeadSink for WebhookSink {
    async fn deliver(&self, lead: &LeadPayload) -> Result<(), SubmitError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(lead)
            .send()
            .await
            .map_err(|e| SubmitError::Request {
                endpoint: self.endpoint.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(%status, "Lead delivered");
            Ok(())
        } else {
            Err(SubmitError::Rejected {
                status: status.as_u16(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::answers::{
        BusinessSector, DocumentChoice, PrimaryNeed, RevenueBracket, ServiceLine, TaxRegime,
    };

    fn full_answers() -> AnswerSet {
        AnswerSet {
            service: Some(ServiceLine::CreditRecovery),
            document_choice: Some(DocumentChoice::Cnpj),
            document_number: Some("11.222.333/0001-81".into()),
            name: Some("Ana Souza".into()),
            company: Some("Souza Contábil".into()),
            email: Some("ana@gmail.com".into()),
            phone: Some("(11) 98765-4321".into()),
            city: Some("Maringá - PR".into()),
            revenue: Some(RevenueBracket::From300kTo1m),
            regime: Some(TaxRegime::LucroPresumido),
            sector: Some(BusinessSector::Services),
            main_need: Some(PrimaryNeed::LowerTaxes),
            message: Some("Quero pagar menos impostos".into()),
        }
    }

    #[test]
    fn labels_go_on_the_wire() {
        let payload = LeadPayload::from_answers(&full_answers(), "Assistente Virtual - Site");
        assert_eq!(payload.qualification.revenue, "R$ 300k - R$ 1M");
        assert_eq!(payload.qualification.regime, "Lucro Presumido");
        assert_eq!(payload.qualification.sector, "Serviços");
        assert_eq!(payload.qualification.need, "Reduzir Impostos");
        assert_eq!(
            payload.qualification.service.as_deref(),
            Some("Recuperação de Créditos")
        );
    }

    #[test]
    fn document_joins_kind_and_number() {
        let payload = LeadPayload::from_answers(&full_answers(), "origem");
        assert_eq!(
            payload.contact.document.as_deref(),
            Some("CNPJ 11.222.333/0001-81")
        );
    }

    #[test]
    fn no_document_choice_reads_not_informed() {
        let answers = AnswerSet {
            document_choice: Some(DocumentChoice::NoDocument),
            ..full_answers()
        };
        let payload = LeadPayload::from_answers(&answers, "origem");
        assert_eq!(payload.contact.document.as_deref(), Some("Não informado"));
    }

    #[test]
    fn uncollected_fields_are_omitted_from_json() {
        let answers = AnswerSet {
            service: None,
            document_choice: None,
            document_number: None,
            city: None,
            ..full_answers()
        };
        let payload = LeadPayload::from_answers(&answers, "origem");
        let json = serde_json::to_value(&payload).unwrap();
        let contact = json.get("contato").unwrap();
        assert!(contact.get("cidade").is_none());
        assert!(contact.get("documento").is_none());
        assert!(json.get("qualificacao_lead").unwrap().get("servico_interesse").is_none());
    }

    #[test]
    fn wire_keys_are_pt_br() {
        let payload = LeadPayload::from_answers(&full_answers(), "Formulário Site");
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("data_envio").is_some());
        assert_eq!(json.get("origem").unwrap(), "Formulário Site");
        assert_eq!(
            json.pointer("/contato/telefone").unwrap(),
            "(11) 98765-4321"
        );
        assert_eq!(
            json.pointer("/qualificacao_lead/necessidade_principal").unwrap(),
            "Reduzir Impostos"
        );
        assert_eq!(json.get("mensagem").unwrap(), "Quero pagar menos impostos");
    }

    #[test]
    fn empty_answers_fall_back_to_not_informed() {
        let payload = LeadPayload::from_answers(&AnswerSet::default(), "origem");
        assert_eq!(payload.contact.name, "Não informado");
        assert_eq!(payload.contact.company, "Não informada");
        assert_eq!(payload.qualification.revenue, "Não informado");
        assert_eq!(payload.message, "");
    }
}
