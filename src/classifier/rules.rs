/// Department keyword table for the deterministic fallback branch. The
/// first matching entry wins; `General Medicine` is the default when
/// nothing matches.
const DEPARTMENT_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Cardiology",
        &["heart", "dil", "palpitation", "blood pressure", "bp high"],
    ),
    (
        "Pulmonology",
        &["cough", "breathless", "asthma", "saans", "khansi"],
    ),
    (
        "Gastroenterology",
        &["stomach pain", "pet dard", "vomiting", "diarrhea", "loose motion"],
    ),
    (
        "Neurology",
        &["headache", "sar dard", "dizziness", "migraine", "numbness"],
    ),
    (
        "Orthopedics",
        &["fracture", "joint pain", "back pain", "kamar dard", "sprain"],
    ),
    (
        "Dermatology",
        &["rash", "skin", "khujli", "itching", "allergy skin"],
    ),
    (
        "Obstetrics & Gynecology",
        &["pregnant", "pregnancy", "periods", "garbhvati", "menstrual"],
    ),
    (
        "Pediatrics",
        &["baby", "infant", "child fever", "bachcha", "newborn"],
    ),
    (
        "ENT",
        &["ear pain", "throat pain", "gala dard", "sinus", "hearing"],
    ),
    (
        "Ophthalmology",
        &["eye pain", "vision blur", "aankh", "red eye"],
    ),
    ("Urology", &["urination pain", "kidney stone", "peshab"]),
    ("Psychiatry", &["anxiety", "depression", "panic attack"]),
];

/// Terms that elevate the rule-based fallback to `high` severity (score 7).
const HIGH_SEVERITY_TERMS: &[&str] = &[
    "severe",
    "high fever",
    "blood",
    "confusion",
    "dengue",
    "malaria",
    "tez bukhar",
    "bahut dard",
    "infection spreading",
    "persistent vomiting",
];

pub struct RuleAssessment {
    pub department: &'static str,
    pub severity: u8,
    pub high_severity_matches: Vec<&'static str>,
}

/// Deterministic local classification, used when the instant-emergency
/// branch does not match and the AI branch is unavailable or disabled.
pub fn classify_rule_based(text: &str) -> RuleAssessment {
    let lower = text.to_lowercase();

    let department = DEPARTMENT_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(dept, _)| *dept)
        .unwrap_or("General Medicine");

    let high_severity_matches: Vec<&'static str> = HIGH_SEVERITY_TERMS
        .iter()
        .filter(|term| lower.contains(*term))
        .copied()
        .collect();

    let severity = if high_severity_matches.is_empty() { 3 } else { 7 };

    RuleAssessment {
        department,
        severity,
        high_severity_matches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_general_medicine() {
        let a = classify_rule_based("feeling a bit tired lately");
        assert_eq!(a.department, "General Medicine");
        assert_eq!(a.severity, 3);
    }

    #[test]
    fn matches_department_keyword() {
        let a = classify_rule_based("I have a severe headache and dizziness");
        assert_eq!(a.department, "Neurology");
        assert_eq!(a.severity, 7);
    }

    #[test]
    fn first_match_wins() {
        // "heart" triggers Cardiology before Gastroenterology's "vomiting" would.
        let a = classify_rule_based("heart racing and vomiting");
        assert_eq!(a.department, "Cardiology");
    }

    #[test]
    fn high_severity_term_elevates_score() {
        let a = classify_rule_based("patient has dengue with high fever");
        assert_eq!(a.severity, 7);
        assert!(a.high_severity_matches.contains(&"dengue"));
    }
}
