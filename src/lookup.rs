//! City reference data for the CITY step.
//!
//! One GET at startup loads the public municipality list into an in-memory
//! index; the match is case- and accent-insensitive, accepting either the
//! exact name or input containing it ("Maringá - PR"). A failed fetch is
//! the caller's cue to skip the check entirely.

use serde::Deserialize;

use crate::error::LookupError;

/// Default public endpoint listing Brazilian municipalities.
pub const DEFAULT_MUNICIPALITIES_URL: &str =
    "https://servicodados.ibge.gov.br/api/v1/localidades/municipios";

/// IBGE municipality record; only the name is used.
#[derive(Debug, Deserialize)]
struct Municipality {
    nome: String,
}

/// In-memory city list, stored normalized.
#[derive(Debug, Clone, Default)]
pub struct CityIndex {
    names: Vec<String>,
}

impl CityIndex {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names.into_iter().map(|n| normalize(n.as_ref())).collect(),
        }
    }

    /// Fetch the municipality list once. The caller decides what a failure
    /// degrades to.
    pub async fn fetch(client: &reqwest::Client, url: &str) -> Result<Self, LookupError> {
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| LookupError::Fetch(e.to_string()))?;
        if !response.status().is_success() {
            return Err(LookupError::Fetch(format!("status {}", response.status())));
        }
        let municipalities: Vec<Municipality> = response
            .json()
            .await
            .map_err(|e| LookupError::Decode(e.to_string()))?;
        Ok(Self::from_names(
            municipalities.iter().map(|m| m.nome.as_str()),
        ))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Whether the input names a known city: equal to one after folding, or
    /// containing one. An empty index accepts anything.
    pub fn matches(&self, input: &str) -> bool {
        if self.names.is_empty() {
            return true;
        }
        let folded = normalize(input.trim());
        self.names
            .iter()
            .any(|name| folded == *name || folded.contains(name.as_str()))
    }
}

/// Lowercase and strip the accent marks used in pt-BR names.
pub(crate) fn normalize(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_folds_case_and_accents() {
        assert_eq!(normalize("São João del-Rei"), "sao joao del-rei");
        assert_eq!(normalize("MARINGÁ"), "maringa");
        assert_eq!(normalize("Conceição"), "conceicao");
    }

    #[test]
    fn matches_exact_name() {
        let index = CityIndex::from_names(["Maringá", "Curitiba"]);
        assert!(index.matches("maringa"));
        assert!(index.matches("Curitiba"));
    }

    #[test]
    fn matches_city_with_state_suffix() {
        let index = CityIndex::from_names(["Maringá", "São Paulo"]);
        assert!(index.matches("Maringá - PR"));
        assert!(index.matches("sao paulo/SP"));
    }

    #[test]
    fn rejects_unknown_city() {
        let index = CityIndex::from_names(["Maringá"]);
        assert!(!index.matches("Gotham"));
    }

    #[test]
    fn empty_index_accepts_anything() {
        let index = CityIndex::from_names(Vec::<String>::new());
        assert!(index.matches("Gotham"));
    }

    #[test]
    fn from_names_counts_entries() {
        let index = CityIndex::from_names(["A", "B", "C"]);
        assert_eq!(index.len(), 3);
        assert!(!index.is_empty());
    }
}
