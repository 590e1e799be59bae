/// Projection of a record onto the fields relevant to a query intent.
use std::fmt;

use super::intent::Intent;
use crate::store::{FieldKey, Record};

/// Substituted for every absent field value.
pub const SENTINEL: &str = "informação não fornecida pela construtora";

const DEVELOPMENT_FALLBACK: &str = "Empreendimento";
const BUILDER_FALLBACK: &str = "Construtora";

/// Link fields with their commercial labels, in render order.
pub const LINK_FIELDS: [(FieldKey, &str); 5] = [
    (FieldKey::DriveDasConstrutoras, "Drive das Construtoras"),
    (FieldKey::LinkDosVideos, "Vídeo institucional"),
    (FieldKey::LinkDosCards, "Cards digitais"),
    (FieldKey::LinkTabelao, "Tabelão"),
    (FieldKey::LinkTabela, "Tabela de valores"),
];

/// Descriptive fields with their commercial labels, in render order.
pub const GENERAL_FIELDS: [(FieldKey, &str); 9] = [
    (FieldKey::Bairro, "Bairro"),
    (FieldKey::Situacao, "Situação"),
    (FieldKey::Metragem, "Metragem"),
    (FieldKey::DormsSuites, "Dorms/Suítes"),
    (FieldKey::Vagas, "Vagas"),
    (FieldKey::PrevEntrega, "Entrega"),
    (FieldKey::ValorAPartirDe, "Valor a partir de"),
    (FieldKey::Diferenciais, "Diferenciais"),
    (FieldKey::Infraestrutura, "Infraestrutura"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextLine {
    pub label: &'static str,
    /// `None` renders as [`SENTINEL`].
    pub value: Option<String>,
}

/// A record rendered for one intent: a heading plus one line per field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextBlock {
    pub development: String,
    pub builder: String,
    pub lines: Vec<ContextLine>,
}

impl ContextBlock {
    /// Labels in render order.
    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.lines.iter().map(|l| l.label)
    }
}

impl fmt::Display for ContextBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### {} ({})", self.development, self.builder)?;
        for line in &self.lines {
            let value = line.value.as_deref().unwrap_or(SENTINEL);
            writeln!(f, "**{}:** {value}", line.label)?;
        }
        Ok(())
    }
}

/// The field subset shown for `intent`.
#[must_use]
pub fn fields_for(intent: Intent) -> &'static [(FieldKey, &'static str)] {
    match intent {
        Intent::LinksRequest => &LINK_FIELDS,
        Intent::GeneralRequest | Intent::AggregateCount(_) => &GENERAL_FIELDS,
    }
}

/// Project `record` onto the fields of `intent`.
///
/// Each field of the subset appears exactly once and in fixed order; fields
/// outside the subset never appear, whatever the record holds.
#[must_use]
pub fn project(record: &Record, intent: Intent) -> ContextBlock {
    let lines = fields_for(intent)
        .iter()
        .map(|&(key, label)| ContextLine {
            label,
            value: record.get(key).map(str::to_string),
        })
        .collect();

    ContextBlock {
        development: record
            .get(FieldKey::Empreendimento)
            .unwrap_or(DEVELOPMENT_FALLBACK)
            .to_string(),
        builder: record
            .get(FieldKey::Construtora)
            .unwrap_or(BUILDER_FALLBACK)
            .to_string(),
        lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn aurora() -> Record {
        Record::from_payload(&json!({
            "EMPREENDIMENTO": "Residencial Aurora",
            "CONSTRUTORA": "Construtora Horizonte",
            "BAIRRO": "Cambuí",
            "METRAGEM": "68 a 92 m²",
            "VAGAS": "2",
            "DRIVE DAS CONSTRUTORAS": "https://drive.example/aurora",
            "LINK DOS VIDEOS": "https://video.example/aurora",
            "LINK TABELÃO": "",
            "CONTATO COMERCIAL 1": "Ana (19) 99999-0000",
        }))
    }

    fn link_labels() -> Vec<&'static str> {
        LINK_FIELDS.iter().map(|(_, l)| *l).collect()
    }

    fn general_labels() -> Vec<&'static str> {
        GENERAL_FIELDS.iter().map(|(_, l)| *l).collect()
    }

    #[test]
    fn test_links_block_has_exactly_link_labels() {
        let block = project(&aurora(), Intent::LinksRequest);
        assert_eq!(block.labels().collect::<Vec<_>>(), link_labels());

        let text = block.to_string();
        for label in general_labels() {
            assert!(!text.contains(&format!("**{label}:**")), "leaked {label}");
        }
    }

    #[test]
    fn test_general_block_has_no_link_labels() {
        let block = project(&aurora(), Intent::GeneralRequest);
        assert_eq!(block.labels().collect::<Vec<_>>(), general_labels());

        let text = block.to_string();
        for label in link_labels() {
            assert!(!text.contains(&format!("**{label}:**")), "leaked {label}");
        }
        assert!(!text.contains("https://"));
    }

    #[test]
    fn test_fields_outside_subset_never_render() {
        let text = project(&aurora(), Intent::GeneralRequest).to_string();
        assert!(!text.contains("Ana (19)"));
        let text = project(&aurora(), Intent::LinksRequest).to_string();
        assert!(!text.contains("Cambuí"));
        assert!(!text.contains("68 a 92"));
    }

    #[test]
    fn test_empty_link_renders_sentinel() {
        let text = project(&aurora(), Intent::LinksRequest).to_string();
        assert!(text.contains("**Tabelão:** informação não fornecida pela construtora"));
        assert!(text.contains("**Drive das Construtoras:** https://drive.example/aurora"));
        assert!(!text.contains("LINK TABELÃO"));
    }

    #[test]
    fn test_missing_general_field_renders_sentinel() {
        let text = project(&aurora(), Intent::GeneralRequest).to_string();
        assert!(text.contains("**Metragem:** 68 a 92 m²"));
        assert!(text.contains(&format!("**Situação:** {SENTINEL}")));
        assert!(text.contains(&format!("**Infraestrutura:** {SENTINEL}")));
    }

    #[test]
    fn test_every_label_rendered_once() {
        for intent in [Intent::LinksRequest, Intent::GeneralRequest] {
            let text = project(&aurora(), intent).to_string();
            for (_, label) in fields_for(intent) {
                assert_eq!(text.matches(&format!("**{label}:**")).count(), 1);
            }
        }
    }

    #[test]
    fn test_heading() {
        let block = project(&aurora(), Intent::LinksRequest);
        assert!(
            block
                .to_string()
                .starts_with("### Residencial Aurora (Construtora Horizonte)\n")
        );
    }

    #[test]
    fn test_shapeless_record_degrades_to_sentinels() {
        let record = Record::from_payload(&json!(42));
        let block = project(&record, Intent::GeneralRequest);
        assert_eq!(block.development, "Empreendimento");
        assert_eq!(block.builder, "Construtora");
        assert!(block.lines.iter().all(|l| l.value.is_none()));
        assert_eq!(
            block.to_string().matches(SENTINEL).count(),
            GENERAL_FIELDS.len()
        );
    }
}
