/// Query intent classification.
///
/// Pure keyword matching over the raw query text; no I/O and no state.
use std::sync::LazyLock;

use regex::Regex;

/// Which campaign total an aggregate question asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateKind {
    Developments,
    Builders,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Links or documents (drive, videos, cards, price tables).
    LinksRequest,
    /// Descriptive or technical information about a listing.
    GeneralRequest,
    /// "How many developments/builders take part in the campaign".
    /// Answered from fixed figures without retrieval.
    AggregateCount(AggregateKind),
}

static LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(link|drive|tabel(a|ão|ao)|planilha|cards?|v[íi]deo)")
        .expect("link pattern is valid")
});

/// The whole question must be "quantos empreendimentos / quantas construtoras
/// participam (da campanha)"; any qualifier (a builder, a neighbourhood, a
/// feature) makes it a scoped question that needs retrieval.
static COUNT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*quant[oa]s\s+(empreendimentos|construtoras)\s+(participam|fazem\s+parte)(\s+d[ao]\s+(campanha(\s+m[êe]s\s+das\s+construtoras)?|m[êe]s\s+das\s+construtoras))?\s*\??\s*$",
    )
    .expect("count pattern is valid")
});

/// Classify a query. Aggregate questions are checked first, then link
/// keywords; a link keyword wins over any descriptive attribute in the text.
#[must_use]
pub fn classify(query: &str) -> Intent {
    if let Some(kind) = aggregate_kind(query) {
        return Intent::AggregateCount(kind);
    }
    if LINK_PATTERN.is_match(query) {
        return Intent::LinksRequest;
    }
    Intent::GeneralRequest
}

fn aggregate_kind(query: &str) -> Option<AggregateKind> {
    let caps = COUNT_PATTERN.captures(query)?;
    let noun = caps.get(1)?.as_str().to_lowercase();
    if noun.starts_with("empreend") {
        Some(AggregateKind::Developments)
    } else {
        Some(AggregateKind::Builders)
    }
}
