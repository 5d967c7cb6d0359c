//! Canonicalización de códigos de curso y grupos de equivalencia.
//!
//! Two courses are the same planning unit when their normalized codes match;
//! completing any member of an equivalence group satisfies the whole group.

use std::collections::HashSet;

/// Hand-curated groups of mutually-exclusive/equivalent courses. Completing
/// any one member satisfies the requirement every member covers. Groups are
/// kept disjoint; if an overlap ever slips in, expansion unions all groups
/// containing the code.
const EQUIVALENCE_GROUPS: &[&[&str]] = &[
    // Calculus I variants
    &["MATH 150", "MATH 151", "MATH 154", "MATH 157"],
    // Calculus II variants
    &["MATH 152", "MATH 155", "MATH 158"],
    // Introduction to programming
    &["CMPT 120", "CMPT 128", "CMPT 130"],
    // Programming II
    &["CMPT 125", "CMPT 129", "CMPT 135"],
    // Linear algebra
    &["MATH 232", "MATH 240"],
];

/// Normalize a course code for comparison: uppercase, single-spaced, with a
/// single space between the department letters and the number ("cmpt225" and
/// "CMPT  225" both become "CMPT 225"). Strings that do not look like
/// DEPT-then-number pass through uppercased and whitespace-collapsed.
pub fn normalize_code(code: &str) -> String {
    let collapsed = code
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase();

    let compact: String = collapsed.chars().filter(|c| !c.is_whitespace()).collect();
    let dept_len = compact.chars().take_while(|c| c.is_ascii_alphabetic()).count();
    let rest = &compact[dept_len..];

    // DEPT NNN[W]: digits with at most one trailing letter ("CMPT 105W")
    let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
    let shape_ok = dept_len > 0
        && digits > 0
        && rest[digits..].chars().all(|c| c.is_ascii_alphabetic())
        && rest[digits..].chars().count() <= 1;

    if shape_ok {
        format!("{} {}", &compact[..dept_len], rest)
    } else {
        collapsed
    }
}

/// Expand a completed-course list into the full satisfied set: every
/// completed code (normalized), plus every member of any equivalence group
/// the completed set touches. Pure function, no I/O.
pub fn expand_taken(completed: &[String]) -> HashSet<String> {
    let mut taken: HashSet<String> = completed.iter().map(|c| normalize_code(c)).collect();

    for group in EQUIVALENCE_GROUPS {
        let hit = group.iter().any(|code| taken.contains(*code));
        if hit {
            for code in *group {
                taken.insert((*code).to_string());
            }
        }
    }

    taken
}

/// Drop desired courses already satisfied by the expanded taken set,
/// preserving the caller's ranking order and original display forms.
pub fn filter_untaken(desired: &[String], taken: &HashSet<String>) -> Vec<String> {
    desired
        .iter()
        .filter(|c| !taken.contains(&normalize_code(c)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_code_shapes() {
        assert_eq!(normalize_code("cmpt 225"), "CMPT 225");
        assert_eq!(normalize_code("CMPT  225"), "CMPT 225");
        assert_eq!(normalize_code("cmpt225"), "CMPT 225");
        assert_eq!(normalize_code("cmpt 105w"), "CMPT 105W");
        // Not DEPT-number shaped: passes through collapsed and uppercased
        assert_eq!(normalize_code("  special topics  "), "SPECIAL TOPICS");
        assert_eq!(normalize_code("225"), "225");
    }

    #[test]
    fn test_expand_taken_pulls_in_whole_group() {
        let completed = vec!["math 150".to_string()];
        let taken = expand_taken(&completed);
        assert!(taken.contains("MATH 150"));
        assert!(taken.contains("MATH 151"));
        assert!(taken.contains("MATH 154"));
        // Untouched groups stay out
        assert!(!taken.contains("CMPT 120"));
    }

    #[test]
    fn test_expand_taken_always_includes_input() {
        let completed = vec!["ENSC 251".to_string()];
        let taken = expand_taken(&completed);
        assert!(taken.contains("ENSC 251"));
        assert_eq!(taken.len(), 1);
    }

    #[test]
    fn test_filter_untaken_drops_equivalents() {
        let completed = vec!["MATH 150".to_string()];
        let taken = expand_taken(&completed);
        let desired = vec!["MATH 151".to_string(), "CMPT 225".to_string()];
        let remaining = filter_untaken(&desired, &taken);
        assert_eq!(remaining, vec!["CMPT 225".to_string()]);
    }
}
