//! Field validators for Brazilian lead data.
//!
//! Pure, synchronous checks used by the conversation flow:
//! - CPF/CNPJ checksum validation (mod-11 check digits)
//! - mobile phone validation against the national DDD table
//! - email shape plus registrable-suffix / provider heuristics
//! - minimum-length rules for names, cities and free-text messages
//!
//! Every rejection carries the pt-BR text shown to the visitor as a
//! re-prompt. Formatters apply fixed punctuation templates and leave
//! input of unexpected length untouched.

use std::sync::LazyLock;

use regex::Regex;

/// Identity documents accepted from leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Cpf,
    Cnpj,
}

impl DocumentKind {
    /// Acronym as shown to the visitor.
    pub fn acronym(&self) -> &'static str {
        match self {
            DocumentKind::Cpf => "CPF",
            DocumentKind::Cnpj => "CNPJ",
        }
    }

    /// Digit count of a well-formed document of this kind.
    pub fn digit_count(&self) -> usize {
        match self {
            DocumentKind::Cpf => 11,
            DocumentKind::Cnpj => 14,
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.acronym())
    }
}

/// Why an input was rejected. `Display` is the visitor-facing reason.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("{0} inválido. Confira os números e tente novamente.")]
    InvalidDocument(DocumentKind),

    #[error("O telefone deve conter DDD + 9 dígitos (ex: 11999998888).")]
    PhoneLength,

    #[error("O número deve ser um celular e começar com 9.")]
    PhoneNotMobile,

    #[error("O DDD {0} não é um DDD válido no Brasil.")]
    PhoneBadDdd(String),

    #[error("Formato de e-mail inválido.")]
    EmailShape,

    #[error("Por favor, utilize um e-mail com domínio válido (ex: .com, .com.br, .adv.br).")]
    EmailDomain,

    #[error("Por favor, digite seu nome e sobrenome.")]
    NameTooShort,

    #[error("Por favor, digite o nome da cidade.")]
    CityTooShort,

    #[error("Não encontrei essa cidade. Digite o nome oficial (ex: Maringá - PR).")]
    CityUnknown,

    #[error("Descreva um pouco melhor sua necessidade (mínimo de 10 caracteres).")]
    MessageTooShort,

    #[error("Escolha uma das opções listadas para continuar.")]
    OptionRequired,
}

/// Valid Brazilian area codes (DDDs), grouped by state.
pub const VALID_DDDS: [u8; 67] = [
    11, 12, 13, 14, 15, 16, 17, 18, 19, // São Paulo
    21, 22, 24, // Rio de Janeiro
    27, 28, // Espírito Santo
    31, 32, 33, 34, 35, 37, 38, // Minas Gerais
    41, 42, 43, 44, 45, 46, // Paraná
    47, 48, 49, // Santa Catarina
    51, 53, 54, 55, // Rio Grande do Sul
    61, // Distrito Federal
    62, 64, // Goiás
    63, // Tocantins
    65, 66, // Mato Grosso
    67, // Mato Grosso do Sul
    68, // Acre
    69, // Rondônia
    71, 73, 74, 75, 77, // Bahia
    79, // Sergipe
    81, 87, // Pernambuco
    82, // Alagoas
    83, // Paraíba
    84, // Rio Grande do Norte
    85, 88, // Ceará
    86, 89, // Piauí
    91, 93, 94, // Pará
    92, 97, // Amazonas
    95, // Roraima
    96, // Amapá
    98, 99, // Maranhão
];

/// Public mail providers accepted regardless of suffix.
const COMMON_PROVIDERS: [&str; 10] = [
    "gmail", "hotmail", "outlook", "yahoo", "icloud", "uol", "bol", "terra", "ig", "live",
];

/// Registrable suffixes accepted for lead addresses: the generic TLDs plus
/// the Registro.br category domains.
const VALID_SUFFIXES: [&str; 61] = [
    // generic
    "com", "net", "org", "br",
    // liberal professions
    "adv.br", "arq.br", "cnt.br", "eng.br", "eti.br", "med.br", "odo.br",
    // companies
    "agr.br", "art.br", "esp.br", "etc.br", "far.br", "imb.br", "ind.br", "inf.br", "jor.br",
    "jus.br", "log.br", "psi.br", "radio.br", "rec.br", "srv.br", "tmp.br", "tur.br", "tv.br",
    // other professionals
    "adm.br", "bio.br", "bmd.br", "cim.br", "cng.br", "ecn.br", "fnd.br", "fot.br", "fst.br",
    "ggf.br", "mat.br", "mus.br", "not.br", "ntr.br", "ppg.br", "pro.br", "psc.br", "qsl.br",
    "slg.br", "taxi.br", "teo.br", "trd.br", "vet.br", "zlg.br",
    // individuals
    "blog.br", "flog.br", "nom.br", "vlog.br", "wiki.br",
    // institutional
    "gov.br", "edu.br", "mil.br",
];

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Strip everything that is not an ASCII digit.
pub fn digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Validate a CPF or CNPJ number. Punctuation is ignored.
pub fn validate_document(kind: DocumentKind, raw: &str) -> Result<(), FieldError> {
    let digits = digits(raw);
    let ok = match kind {
        DocumentKind::Cpf => valid_cpf(&digits),
        DocumentKind::Cnpj => valid_cnpj(&digits),
    };
    if ok {
        Ok(())
    } else {
        Err(FieldError::InvalidDocument(kind))
    }
}

/// Validate a Brazilian mobile number: a valid DDD plus nine digits
/// starting with 9.
pub fn validate_phone(raw: &str) -> Result<(), FieldError> {
    let digits = digits(raw);
    if digits.len() != 11 {
        return Err(FieldError::PhoneLength);
    }
    if digits.as_bytes()[2] != b'9' {
        return Err(FieldError::PhoneNotMobile);
    }
    let ddd = &digits[..2];
    let code: u8 = ddd.parse().unwrap_or(0);
    if !VALID_DDDS.contains(&code) {
        return Err(FieldError::PhoneBadDdd(ddd.to_string()));
    }
    Ok(())
}

/// Validate an email address: basic shape, then the domain must carry a
/// known registrable suffix or belong to a common public provider.
/// Checks run on the lowercased address.
pub fn validate_email(raw: &str) -> Result<(), FieldError> {
    let email = raw.trim().to_lowercase();
    if !EMAIL_SHAPE.is_match(&email) {
        return Err(FieldError::EmailShape);
    }
    let Some(domain) = email.split('@').nth(1) else {
        return Err(FieldError::EmailShape);
    };
    let known_suffix = VALID_SUFFIXES
        .iter()
        .any(|suffix| domain == *suffix || domain.ends_with(&format!(".{suffix}")));
    let known_provider = domain
        .split('.')
        .next()
        .is_some_and(|label| COMMON_PROVIDERS.contains(&label));
    if known_suffix || known_provider {
        Ok(())
    } else {
        Err(FieldError::EmailDomain)
    }
}

/// Full name rule: at least three characters and a first plus last name.
pub fn validate_full_name(raw: &str) -> Result<(), FieldError> {
    let name = raw.trim();
    if name.chars().count() < 3 || name.split_whitespace().count() < 2 {
        return Err(FieldError::NameTooShort);
    }
    Ok(())
}

/// City rule applied before any reference-list match.
pub fn validate_city_text(raw: &str) -> Result<(), FieldError> {
    if raw.trim().chars().count() < 2 {
        return Err(FieldError::CityTooShort);
    }
    Ok(())
}

/// Free-text message rule.
pub fn validate_message(raw: &str) -> Result<(), FieldError> {
    if raw.trim().chars().count() < 10 {
        return Err(FieldError::MessageTooShort);
    }
    Ok(())
}

/// Apply the fixed punctuation template for the given document kind.
/// Input whose digits do not match the expected count is returned unchanged.
pub fn format_document(kind: DocumentKind, raw: &str) -> String {
    let digits = digits(raw);
    if digits.len() != kind.digit_count() {
        return raw.to_string();
    }
    match kind {
        DocumentKind::Cpf => format!(
            "{}.{}.{}-{}",
            &digits[..3],
            &digits[3..6],
            &digits[6..9],
            &digits[9..]
        ),
        DocumentKind::Cnpj => format!(
            "{}.{}.{}/{}-{}",
            &digits[..2],
            &digits[2..5],
            &digits[5..8],
            &digits[8..12],
            &digits[12..]
        ),
    }
}

/// Format an eleven-digit mobile number as `(DD) 99999-9999`.
/// Anything else is returned unchanged.
pub fn format_phone(raw: &str) -> String {
    let digits = digits(raw);
    if digits.len() != 11 {
        return raw.to_string();
    }
    format!("({}) {}-{}", &digits[..2], &digits[2..7], &digits[7..])
}

fn valid_cpf(digits: &str) -> bool {
    if digits.len() != 11 || all_same_digit(digits) {
        return false;
    }
    let d: Vec<u32> = digits.chars().filter_map(|c| c.to_digit(10)).collect();
    cpf_check_digit(&d[..9]) == d[9] && cpf_check_digit(&d[..10]) == d[10]
}

/// Standard CPF check digit: weights count down from body length + 1 to 2;
/// the remainder of (sum * 10) mod 11 collapses to 0 when it reaches 10.
fn cpf_check_digit(body: &[u32]) -> u32 {
    let len = body.len() as u32;
    let sum: u32 = body
        .iter()
        .enumerate()
        .map(|(i, d)| d * (len + 1 - i as u32))
        .sum();
    match (sum * 10) % 11 {
        10 => 0,
        rest => rest,
    }
}

fn valid_cnpj(digits: &str) -> bool {
    if digits.len() != 14 || all_same_digit(digits) {
        return false;
    }
    let d: Vec<u32> = digits.chars().filter_map(|c| c.to_digit(10)).collect();
    cnpj_check_digit(&d[..12]) == d[12] && cnpj_check_digit(&d[..13]) == d[13]
}

/// CNPJ check digit: weights start at body length - 7, decrement, and reset
/// to 9 below 2; remainders under 2 collapse to 0, otherwise 11 - remainder.
fn cnpj_check_digit(body: &[u32]) -> u32 {
    let mut weight = body.len() as u32 - 7;
    let mut sum = 0;
    for d in body {
        sum += d * weight;
        weight -= 1;
        if weight < 2 {
            weight = 9;
        }
    }
    match sum % 11 {
        0 | 1 => 0,
        rest => 11 - rest,
    }
}

fn all_same_digit(digits: &str) -> bool {
    let mut chars = digits.chars();
    match chars.next() {
        Some(first) => chars.all(|c| c == first),
        None => true,
    }
}
