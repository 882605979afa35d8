//! Lead answers and the fixed option tables for each choice field.
//!
//! Each choice field has exactly one table mapping stable codes to pt-BR
//! labels; prompts and the submission payload both read from it, so the
//! two can never drift apart.

use serde::{Deserialize, Serialize};

use crate::flow::transcript::ChatOption;
use crate::validators::DocumentKind;

/// Service lines offered by the firm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceLine {
    #[serde(rename = "consultoria-contabil")]
    AccountingAdvisory,
    #[serde(rename = "adequacao-reforma")]
    TaxReformReadiness,
    #[serde(rename = "recuperacao-creditos")]
    CreditRecovery,
    #[serde(rename = "agro-intelligence")]
    AgroSolutions,
    #[serde(rename = "planejamento-estrategico")]
    StrategicPlanning,
}

impl ServiceLine {
    pub const ALL: [ServiceLine; 5] = [
        ServiceLine::AccountingAdvisory,
        ServiceLine::TaxReformReadiness,
        ServiceLine::CreditRecovery,
        ServiceLine::AgroSolutions,
        ServiceLine::StrategicPlanning,
    ];

    /// Stable code submitted to the webhook.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceLine::AccountingAdvisory => "consultoria-contabil",
            ServiceLine::TaxReformReadiness => "adequacao-reforma",
            ServiceLine::CreditRecovery => "recuperacao-creditos",
            ServiceLine::AgroSolutions => "agro-intelligence",
            ServiceLine::StrategicPlanning => "planejamento-estrategico",
        }
    }

    /// Label shown in prompts and in the lead payload.
    pub fn label(&self) -> &'static str {
        match self {
            ServiceLine::AccountingAdvisory => "Consultoria Contábil",
            ServiceLine::TaxReformReadiness => "Adequação à Reforma",
            ServiceLine::CreditRecovery => "Recuperação de Créditos",
            ServiceLine::AgroSolutions => "Soluções para o Agro",
            ServiceLine::StrategicPlanning => "Planejamento Estratégico",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.code() == code)
    }

    /// Quick replies for the service prompt.
    pub fn options() -> Vec<ChatOption> {
        Self::ALL
            .iter()
            .map(|v| ChatOption::new(v.code(), v.label()))
            .collect()
    }
}

impl std::fmt::Display for ServiceLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Estimated monthly revenue brackets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevenueBracket {
    #[serde(rename = "ate_80k")]
    UpTo80k,
    #[serde(rename = "80k_300k")]
    From80kTo300k,
    #[serde(rename = "300k_1m")]
    From300kTo1m,
    #[serde(rename = "1m_5m")]
    From1mTo5m,
    #[serde(rename = "acima_5m")]
    Above5m,
}

impl RevenueBracket {
    pub const ALL: [RevenueBracket; 5] = [
        RevenueBracket::UpTo80k,
        RevenueBracket::From80kTo300k,
        RevenueBracket::From300kTo1m,
        RevenueBracket::From1mTo5m,
        RevenueBracket::Above5m,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            RevenueBracket::UpTo80k => "ate_80k",
            RevenueBracket::From80kTo300k => "80k_300k",
            RevenueBracket::From300kTo1m => "300k_1m",
            RevenueBracket::From1mTo5m => "1m_5m",
            RevenueBracket::Above5m => "acima_5m",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RevenueBracket::UpTo80k => "Até R$ 80k (MEI)",
            RevenueBracket::From80kTo300k => "R$ 80k - R$ 300k",
            RevenueBracket::From300kTo1m => "R$ 300k - R$ 1M",
            RevenueBracket::From1mTo5m => "R$ 1M - R$ 5M",
            RevenueBracket::Above5m => "Acima de R$ 5M",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.code() == code)
    }

    pub fn options() -> Vec<ChatOption> {
        Self::ALL
            .iter()
            .map(|v| ChatOption::new(v.code(), v.label()))
            .collect()
    }
}

impl std::fmt::Display for RevenueBracket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Brazilian corporate tax regimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxRegime {
    #[serde(rename = "mei")]
    Mei,
    #[serde(rename = "simples_nacional")]
    SimplesNacional,
    #[serde(rename = "lucro_presumido")]
    LucroPresumido,
    #[serde(rename = "lucro_real")]
    LucroReal,
    #[serde(rename = "naosei_abertura")]
    NotSureOrOpening,
}

impl TaxRegime {
    pub const ALL: [TaxRegime; 5] = [
        TaxRegime::Mei,
        TaxRegime::SimplesNacional,
        TaxRegime::LucroPresumido,
        TaxRegime::LucroReal,
        TaxRegime::NotSureOrOpening,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            TaxRegime::Mei => "mei",
            TaxRegime::SimplesNacional => "simples_nacional",
            TaxRegime::LucroPresumido => "lucro_presumido",
            TaxRegime::LucroReal => "lucro_real",
            TaxRegime::NotSureOrOpening => "naosei_abertura",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaxRegime::Mei => "MEI",
            TaxRegime::SimplesNacional => "Simples Nacional",
            TaxRegime::LucroPresumido => "Lucro Presumido",
            TaxRegime::LucroReal => "Lucro Real",
            TaxRegime::NotSureOrOpening => "Não sei / Abertura",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.code() == code)
    }

    pub fn options() -> Vec<ChatOption> {
        Self::ALL
            .iter()
            .map(|v| ChatOption::new(v.code(), v.label()))
            .collect()
    }
}

impl std::fmt::Display for TaxRegime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Main market sector of the lead's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BusinessSector {
    #[serde(rename = "industria")]
    Industry,
    #[serde(rename = "comercio/varejo")]
    Retail,
    #[serde(rename = "atacado")]
    Wholesale,
    #[serde(rename = "servicos")]
    Services,
    #[serde(rename = "agro")]
    Agribusiness,
    #[serde(rename = "saude")]
    Healthcare,
    #[serde(rename = "outro")]
    Other,
}

impl BusinessSector {
    pub const ALL: [BusinessSector; 7] = [
        BusinessSector::Industry,
        BusinessSector::Retail,
        BusinessSector::Wholesale,
        BusinessSector::Services,
        BusinessSector::Agribusiness,
        BusinessSector::Healthcare,
        BusinessSector::Other,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            BusinessSector::Industry => "industria",
            BusinessSector::Retail => "comercio/varejo",
            BusinessSector::Wholesale => "atacado",
            BusinessSector::Services => "servicos",
            BusinessSector::Agribusiness => "agro",
            BusinessSector::Healthcare => "saude",
            BusinessSector::Other => "outro",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BusinessSector::Industry => "Indústria",
            BusinessSector::Retail => "Comércio/Varejo",
            BusinessSector::Wholesale => "Atacado",
            BusinessSector::Services => "Serviços",
            BusinessSector::Agribusiness => "Agro",
            BusinessSector::Healthcare => "Saúde",
            BusinessSector::Other => "Outro",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.code() == code)
    }

    pub fn options() -> Vec<ChatOption> {
        Self::ALL
            .iter()
            .map(|v| ChatOption::new(v.code(), v.label()))
            .collect()
    }
}

impl std::fmt::Display for BusinessSector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Primary goal the lead wants help with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimaryNeed {
    #[serde(rename = "reduzir_impostos")]
    LowerTaxes,
    #[serde(rename = "resolver_dividas")]
    SettleDebts,
    #[serde(rename = "recuperacao_de_credito")]
    RecoverCredits,
    #[serde(rename = "consultoria_contabil")]
    Accounting,
    #[serde(rename = "reforma_tributaria")]
    TaxReform,
    #[serde(rename = "outro")]
    Other,
}

impl PrimaryNeed {
    pub const ALL: [PrimaryNeed; 6] = [
        PrimaryNeed::LowerTaxes,
        PrimaryNeed::SettleDebts,
        PrimaryNeed::RecoverCredits,
        PrimaryNeed::Accounting,
        PrimaryNeed::TaxReform,
        PrimaryNeed::Other,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            PrimaryNeed::LowerTaxes => "reduzir_impostos",
            PrimaryNeed::SettleDebts => "resolver_dividas",
            PrimaryNeed::RecoverCredits => "recuperacao_de_credito",
            PrimaryNeed::Accounting => "consultoria_contabil",
            PrimaryNeed::TaxReform => "reforma_tributaria",
            PrimaryNeed::Other => "outro",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PrimaryNeed::LowerTaxes => "Reduzir Impostos",
            PrimaryNeed::SettleDebts => "Resolver Dívidas",
            PrimaryNeed::RecoverCredits => "Recuperação de Créditos",
            PrimaryNeed::Accounting => "Consultoria Contábil",
            PrimaryNeed::TaxReform => "Reforma Tributária",
            PrimaryNeed::Other => "Outro",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.code() == code)
    }

    pub fn options() -> Vec<ChatOption> {
        Self::ALL
            .iter()
            .map(|v| ChatOption::new(v.code(), v.label()))
            .collect()
    }
}

impl std::fmt::Display for PrimaryNeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// What the visitor answered when asked about an identity document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentChoice {
    #[serde(rename = "CPF")]
    Cpf,
    #[serde(rename = "CNPJ")]
    Cnpj,
    #[serde(rename = "nenhum")]
    NoDocument,
}

impl DocumentChoice {
    pub const ALL: [DocumentChoice; 3] = [
        DocumentChoice::Cpf,
        DocumentChoice::Cnpj,
        DocumentChoice::NoDocument,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            DocumentChoice::Cpf => "CPF",
            DocumentChoice::Cnpj => "CNPJ",
            DocumentChoice::NoDocument => "nenhum",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocumentChoice::Cpf => "CPF",
            DocumentChoice::Cnpj => "CNPJ",
            DocumentChoice::NoDocument => "Ainda não possuo",
        }
    }

    /// The document kind to validate against, if the visitor has one.
    pub fn kind(&self) -> Option<DocumentKind> {
        match self {
            DocumentChoice::Cpf => Some(DocumentKind::Cpf),
            DocumentChoice::Cnpj => Some(DocumentKind::Cnpj),
            DocumentChoice::NoDocument => None,
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.code() == code)
    }

    pub fn options() -> Vec<ChatOption> {
        Self::ALL
            .iter()
            .map(|v| ChatOption::new(v.code(), v.label()))
            .collect()
    }
}

impl std::fmt::Display for DocumentChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Answers accumulated across the conversation, one field per step.
///
/// A field is written exactly once, when its step passes validation; a
/// restart discards the whole set. Fields the active variant never asks
/// for stay `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<ServiceLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_choice: Option<DocumentChoice>,
    /// Formatted document number, present only for CPF/CNPJ choices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Stored lowercased.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Stored formatted, `(DD) 99999-9999`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<RevenueBracket>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regime: Option<TaxRegime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<BusinessSector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_need: Option<PrimaryNeed>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AnswerSet {
    /// First name of the lead, used for personalized prompts.
    pub fn first_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .and_then(|name| name.split_whitespace().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_from_code() {
        for v in ServiceLine::ALL {
            assert_eq!(ServiceLine::from_code(v.code()), Some(v));
        }
        for v in RevenueBracket::ALL {
            assert_eq!(RevenueBracket::from_code(v.code()), Some(v));
        }
        for v in TaxRegime::ALL {
            assert_eq!(TaxRegime::from_code(v.code()), Some(v));
        }
        for v in BusinessSector::ALL {
            assert_eq!(BusinessSector::from_code(v.code()), Some(v));
        }
        for v in PrimaryNeed::ALL {
            assert_eq!(PrimaryNeed::from_code(v.code()), Some(v));
        }
        for v in DocumentChoice::ALL {
            assert_eq!(DocumentChoice::from_code(v.code()), Some(v));
        }
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert_eq!(RevenueBracket::from_code("bilhoes"), None);
    }

    #[test]
    fn display_matches_serde() {
        for v in BusinessSector::ALL {
            let json = serde_json::to_string(&v).unwrap();
            assert_eq!(json, format!("\"{}\"", v));
        }
    }

    #[test]
    fn labels_match_the_site_copy() {
        let service: Vec<&str> = ServiceLine::ALL.iter().map(|v| v.label()).collect();
        assert_eq!(
            service,
            [
                "Consultoria Contábil",
                "Adequação à Reforma",
                "Recuperação de Créditos",
                "Soluções para o Agro",
                "Planejamento Estratégico",
            ]
        );

        let revenue: Vec<&str> = RevenueBracket::ALL.iter().map(|v| v.label()).collect();
        assert_eq!(
            revenue,
            [
                "Até R$ 80k (MEI)",
                "R$ 80k - R$ 300k",
                "R$ 300k - R$ 1M",
                "R$ 1M - R$ 5M",
                "Acima de R$ 5M",
            ]
        );

        let regime: Vec<&str> = TaxRegime::ALL.iter().map(|v| v.label()).collect();
        assert_eq!(
            regime,
            ["MEI", "Simples Nacional", "Lucro Presumido", "Lucro Real", "Não sei / Abertura"]
        );

        let sector: Vec<&str> = BusinessSector::ALL.iter().map(|v| v.label()).collect();
        assert_eq!(
            sector,
            ["Indústria", "Comércio/Varejo", "Atacado", "Serviços", "Agro", "Saúde", "Outro"]
        );

        let need: Vec<&str> = PrimaryNeed::ALL.iter().map(|v| v.label()).collect();
        assert_eq!(
            need,
            [
                "Reduzir Impostos",
                "Resolver Dívidas",
                "Recuperação de Créditos",
                "Consultoria Contábil",
                "Reforma Tributária",
                "Outro",
            ]
        );

        let document: Vec<&str> = DocumentChoice::ALL.iter().map(|v| v.label()).collect();
        assert_eq!(document, ["CPF", "CNPJ", "Ainda não possuo"]);
    }

    #[test]
    fn options_pair_code_and_label() {
        let options = PrimaryNeed::options();
        assert_eq!(options.len(), 6);
        assert_eq!(options[0].value, "reduzir_impostos");
        assert_eq!(options[0].label, "Reduzir Impostos");
    }

    #[test]
    fn document_choice_maps_to_kind() {
        use crate::validators::DocumentKind;
        assert_eq!(DocumentChoice::Cpf.kind(), Some(DocumentKind::Cpf));
        assert_eq!(DocumentChoice::NoDocument.kind(), None);
    }

    #[test]
    fn first_name_takes_leading_token() {
        let answers = AnswerSet {
            name: Some("Ana Beatriz Souza".into()),
            ..Default::default()
        };
        assert_eq!(answers.first_name(), Some("Ana"));
        assert_eq!(AnswerSet::default().first_name(), None);
    }
}
