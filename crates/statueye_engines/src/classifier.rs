#![forbid(unsafe_code)]

use statueye_contracts::query::LegalArea;

/// Caller-supplied bound on classification work. The classifier scans at most
/// `max_scan_chars` characters so a pathological input can never stall a
/// submit call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifyBudget {
    pub max_scan_chars: usize,
}

impl ClassifyBudget {
    pub fn mvp_v1() -> Self {
        Self {
            max_scan_chars: 2048,
        }
    }
}

/// Maps free text to a legal-area tag. Best-effort: implementations return
/// `LegalArea::Unknown` rather than failing.
pub trait QueryClassifier {
    fn classify(&self, text: &str, budget: ClassifyBudget) -> LegalArea;
}

/// Deterministic keyword-scoring stub. Each area carries a fixed keyword
/// list; the highest-scoring area wins, earlier areas win ties, zero matches
/// yield `Unknown`.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn new() -> Self {
        Self
    }
}

const AREA_KEYWORDS: [(LegalArea, &[&str]); 6] = [
    (
        LegalArea::TenantRights,
        &[
            "landlord", "tenant", "tenancy", "rent", "eviction", "evicted", "deposit", "lease",
            "heating", "repair", "mould", "housing",
        ],
    ),
    (
        LegalArea::Employment,
        &[
            "employer", "employment", "fired", "dismissed", "dismissal", "wage", "wages",
            "salary", "workplace", "redundancy", "discrimination", "boss",
        ],
    ),
    (
        LegalArea::Dui,
        &[
            "drunk", "dui", "dwi", "breathalyser", "breathalyzer", "drink driving",
            "over the limit",
        ],
    ),
    (
        LegalArea::Consumer,
        &[
            "refund", "warranty", "faulty", "product", "purchase", "seller", "retailer",
            "goods",
        ],
    ),
    (
        LegalArea::Traffic,
        &[
            "speeding", "speed limit", "parking", "ticket", "licence points", "license points",
            "traffic",
        ],
    ),
    (
        LegalArea::Drugs,
        &["possession", "drug", "drugs", "cannabis", "controlled substance"],
    ),
];

impl QueryClassifier for KeywordClassifier {
    fn classify(&self, text: &str, budget: ClassifyBudget) -> LegalArea {
        let bounded: String = text
            .chars()
            .take(budget.max_scan_chars)
            .collect::<String>()
            .to_lowercase();

        let mut best = LegalArea::Unknown;
        let mut best_score = 0usize;
        for (area, keywords) in AREA_KEYWORDS {
            let score = keywords
                .iter()
                .filter(|keyword| bounded.contains(*keyword))
                .count();
            if score > best_score {
                best = area;
                best_score = score;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> LegalArea {
        KeywordClassifier::new().classify(text, ClassifyBudget::mvp_v1())
    }

    #[test]
    fn at_classify_01_landlord_query_maps_to_tenant_rights() {
        assert_eq!(
            classify("my landlord won't fix the heating"),
            LegalArea::TenantRights
        );
    }

    #[test]
    fn at_classify_02_dismissal_query_maps_to_employment() {
        assert_eq!(
            classify("I was dismissed without notice and my wages were withheld"),
            LegalArea::Employment
        );
    }

    #[test]
    fn at_classify_03_unmatched_text_is_unknown() {
        assert_eq!(classify("completely unrelated gardening question"), LegalArea::Unknown);
    }

    #[test]
    fn at_classify_04_budget_bounds_the_scan() {
        let mut text = "x".repeat(64);
        text.push_str(" my landlord won't fix the heating");
        let tight = ClassifyBudget { max_scan_chars: 32 };
        assert_eq!(
            KeywordClassifier::new().classify(&text, tight),
            LegalArea::Unknown
        );
        assert_eq!(
            KeywordClassifier::new().classify(&text, ClassifyBudget::mvp_v1()),
            LegalArea::TenantRights
        );
    }

    #[test]
    fn at_classify_05_classification_is_deterministic() {
        let text = "faulty product, seller refuses a refund";
        let a = classify(text);
        let b = classify(text);
        assert_eq!(a, b);
        assert_eq!(a, LegalArea::Consumer);
    }
}
