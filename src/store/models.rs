/// Record model for development payloads returned by the vector store.
///
/// Payload keys are matched against a closed set of canonical field names;
/// anything outside that set is dropped at the boundary.
use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

/// Canonical payload keys of a development record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKey {
    Construtora,
    Empreendimento,
    Estoque,
    Bairro,
    Situacao,
    Endereco,
    Metragem,
    DormsSuites,
    Vagas,
    Infraestrutura,
    Diferenciais,
    PrevEntrega,
    ValorAPartirDe,
    PontosFortes,
    Persona,
    ContatoComercial1,
    ContatoComercial2,
    PoliticasComerciais,
    DriveDasConstrutoras,
    LinkDosVideos,
    LinkDosCards,
    LinkTabelao,
    LinkTabela,
}

impl FieldKey {
    /// Every canonical key, in payload order.
    pub const ALL: [FieldKey; 23] = [
        FieldKey::Construtora,
        FieldKey::Empreendimento,
        FieldKey::Estoque,
        FieldKey::Bairro,
        FieldKey::Situacao,
        FieldKey::Endereco,
        FieldKey::Metragem,
        FieldKey::DormsSuites,
        FieldKey::Vagas,
        FieldKey::Infraestrutura,
        FieldKey::Diferenciais,
        FieldKey::PrevEntrega,
        FieldKey::ValorAPartirDe,
        FieldKey::PontosFortes,
        FieldKey::Persona,
        FieldKey::ContatoComercial1,
        FieldKey::ContatoComercial2,
        FieldKey::PoliticasComerciais,
        FieldKey::DriveDasConstrutoras,
        FieldKey::LinkDosVideos,
        FieldKey::LinkDosCards,
        FieldKey::LinkTabelao,
        FieldKey::LinkTabela,
    ];

    /// The raw payload key as stored in the collection.
    #[must_use]
    pub fn as_key(self) -> &'static str {
        match self {
            FieldKey::Construtora => "CONSTRUTORA",
            FieldKey::Empreendimento => "EMPREENDIMENTO",
            FieldKey::Estoque => "ESTOQUE",
            FieldKey::Bairro => "BAIRRO",
            FieldKey::Situacao => "SITUAÇÃO",
            FieldKey::Endereco => "ENDEREÇO",
            FieldKey::Metragem => "METRAGEM",
            FieldKey::DormsSuites => "DORMS/SUITES",
            FieldKey::Vagas => "VAGAS",
            FieldKey::Infraestrutura => "INFRAESTRUTURA",
            FieldKey::Diferenciais => "DIFERENCIAIS/FRASE CHAVE",
            FieldKey::PrevEntrega => "PREV. ENTREGA",
            FieldKey::ValorAPartirDe => "VALOR A PARTIR DE",
            FieldKey::PontosFortes => "PONTOS FORTES INDICADOS PELO CONSTRUTOR",
            FieldKey::Persona => "PERSONA INDICADA PELO CONSTRUTOR",
            FieldKey::ContatoComercial1 => "CONTATO COMERCIAL 1",
            FieldKey::ContatoComercial2 => "CONTATO COMERCIAL 2",
            FieldKey::PoliticasComerciais => "POLÍTICAS COMERCIAIS",
            FieldKey::DriveDasConstrutoras => "DRIVE DAS CONSTRUTORAS",
            FieldKey::LinkDosVideos => "LINK DOS VIDEOS",
            FieldKey::LinkDosCards => "LINK DOS CARDS",
            FieldKey::LinkTabelao => "LINK TABELÃO",
            FieldKey::LinkTabela => "LINK TABELA",
        }
    }

    /// Look up a canonical key by its exact payload spelling.
    #[must_use]
    pub fn from_key(raw: &str) -> Option<FieldKey> {
        FieldKey::ALL.into_iter().find(|k| k.as_key() == raw)
    }
}

/// One real-estate development, restricted to canonical fields.
///
/// Only non-empty values are stored, so `get` returning `Some` always means
/// the field was present in the source payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: BTreeMap<FieldKey, String>,
}

impl Record {
    /// Build a record from a raw JSON payload.
    ///
    /// Unknown keys are ignored, non-string and blank values count as absent,
    /// and a payload that is not an object yields an empty record.
    #[must_use]
    pub fn from_payload(payload: &Value) -> Self {
        let Some(obj) = payload.as_object() else {
            debug!("payload is not an object, treating every field as absent");
            return Self::default();
        };

        let mut record = Self::default();
        for (raw_key, value) in obj {
            let Some(key) = FieldKey::from_key(raw_key) else {
                debug!("ignoring unknown payload key {raw_key:?}");
                continue;
            };
            if let Some(text) = value.as_str() {
                record.set(key, text);
            }
        }
        record
    }

    /// Builder-style insert, used mostly by tests and the in-memory store.
    #[must_use]
    pub fn with(mut self, key: FieldKey, value: &str) -> Self {
        self.set(key, value);
        self
    }

    fn set(&mut self, key: FieldKey, value: &str) {
        if value.trim().is_empty() {
            self.fields.remove(&key);
        } else {
            self.fields.insert(key, value.to_string());
        }
    }

    /// The value of `key`, if present and non-empty.
    #[must_use]
    pub fn get(&self, key: FieldKey) -> Option<&str> {
        self.fields.get(&key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A record paired with its similarity to the query vector.
#[derive(Debug, Clone)]
pub struct ScoredRecord {
    pub record: Record,
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_key_lookup_roundtrip() {
        for key in FieldKey::ALL {
            assert_eq!(FieldKey::from_key(key.as_key()), Some(key));
        }
        assert_eq!(FieldKey::from_key("SITUACAO"), None);
        assert_eq!(FieldKey::from_key("empreendimento"), None);
    }

    #[test]
    fn test_from_payload_drops_unknown_keys() {
        let payload = json!({
            "EMPREENDIMENTO": "Residencial Aurora",
            "METRAGEM": "68 m²",
            "SENHA DO ADMIN": "hunter2",
        });
        let record = Record::from_payload(&payload);
        assert_eq!(record.get(FieldKey::Empreendimento), Some("Residencial Aurora"));
        assert_eq!(record.get(FieldKey::Metragem), Some("68 m²"));
        assert_eq!(record.fields.len(), 2);
    }

    #[test]
    fn test_from_payload_blank_and_non_string_are_absent() {
        let payload = json!({
            "LINK TABELÃO": "",
            "VAGAS": "   ",
            "ESTOQUE": 12,
            "BAIRRO": null,
        });
        let record = Record::from_payload(&payload);
        assert!(record.is_empty());
    }

    #[test]
    fn test_from_payload_non_object() {
        assert!(Record::from_payload(&json!("just text")).is_empty());
        assert!(Record::from_payload(&json!([1, 2, 3])).is_empty());
        assert!(Record::from_payload(&Value::Null).is_empty());
    }
}
