//! Dice expression grammar and evaluation.
//!
//! An expression is one or more `+`-joined terms; each term is either a
//! bare integer (a literal added to the sum) or `{count}D{faces}` with
//! an optional count (`D6`, `3D6`, `3x D6`, `3×D6`). Up to 20 dice per
//! term are listed individually; larger counts are reported as a
//! face→occurrences histogram.

use std::sync::OnceLock;

use regex::Regex;

use crate::rng::RandomSource;

/// Individual results are listed up to this many dice per term.
pub const HISTOGRAM_THRESHOLD: u64 = 20;

/// One parsed term of a dice expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Term {
    /// A literal added to the total.
    Literal(u64),
    /// `count` dice with `faces` sides each.
    Dice { count: u64, faces: u64 },
}

/// Result of evaluating an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollOutcome {
    /// Rendered result of each term, in input order.
    pub parts: Vec<String>,
    /// Sum over all dice and literals.
    pub total: u64,
}

fn term_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?i)(?:(?:(\d+)\s*[×x*]?\s*)?d\s*)?(\d+)$").expect("term regex is valid")
    })
}

/// Parse a full dice expression. Returns `None` when any term falls
/// outside the grammar (the caller then treats the input as an option
/// list or as malformed).
pub fn parse_expression(input: &str) -> Option<Vec<Term>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let mut terms = Vec::new();
    for raw in input.split('+') {
        let raw = raw.trim();
        let captures = term_regex().captures(raw)?;
        let number: u64 = captures.get(2)?.as_str().parse().ok()?;

        // Without a 'D' the term is a plain literal.
        let is_die = raw.to_lowercase().contains('d');
        if !is_die {
            terms.push(Term::Literal(number));
            continue;
        }

        let count = captures
            .get(1)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(1)
            .max(1);
        terms.push(Term::Dice {
            count,
            faces: number,
        });
    }

    Some(terms)
}

/// Roll every term and render the parts.
pub fn evaluate(terms: &[Term], rng: &mut dyn RandomSource) -> RollOutcome {
    let mut parts = Vec::with_capacity(terms.len());
    let mut total: u64 = 0;

    for term in terms {
        match *term {
            Term::Literal(value) => {
                total += value;
                parts.push(value.to_string());
            }
            Term::Dice { count: 1, faces } => {
                let result = rng.pick(faces);
                total += result;
                parts.push(format!("D{faces}: {result}"));
            }
            Term::Dice { count, faces } if count <= HISTOGRAM_THRESHOLD => {
                let results: Vec<String> = (0..count)
                    .map(|_| {
                        let result = rng.pick(faces);
                        total += result;
                        result.to_string()
                    })
                    .collect();
                parts.push(format!("{count}×D{faces}: ({})", results.join(", ")));
            }
            Term::Dice { count, faces } => {
                // Too many dice to list: histogram of face occurrences.
                let mut occurrences = vec![0u64; faces.max(1) as usize];
                for _ in 0..count {
                    let result = rng.pick(faces);
                    total += result;
                    occurrences[(result - 1) as usize] += 1;
                }
                let histogram: Vec<String> = occurrences
                    .iter()
                    .enumerate()
                    .filter(|(_, n)| **n > 0)
                    .map(|(face, n)| format!("{n}×{}", face as u64 + 1))
                    .collect();
                parts.push(format!("{count}×D{faces}: ({})", histogram.join(", ")));
            }
        }
    }

    RollOutcome { parts, total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{ScriptedRandom, ThreadRandom};

    #[test]
    fn parses_literals_dice_and_mixtures() {
        assert_eq!(parse_expression("3"), Some(vec![Term::Literal(3)]));
        assert_eq!(
            parse_expression("D6"),
            Some(vec![Term::Dice { count: 1, faces: 6 }])
        );
        assert_eq!(
            parse_expression("2D6+3"),
            Some(vec![Term::Dice { count: 2, faces: 6 }, Term::Literal(3)])
        );
        assert_eq!(
            parse_expression("3 × D 20 + d4"),
            Some(vec![
                Term::Dice { count: 3, faces: 20 },
                Term::Dice { count: 1, faces: 4 },
            ])
        );
    }

    #[test]
    fn rejects_non_numeric_input() {
        assert_eq!(parse_expression("red, green, blue"), None);
        assert_eq!(parse_expression(""), None);
        assert_eq!(parse_expression("2D6+"), None);
        assert_eq!(parse_expression("D"), None);
    }

    #[test]
    fn evaluation_is_deterministic_under_script() {
        let terms = parse_expression("2D6+3").unwrap();
        let mut rng = ScriptedRandom::new([2, 5]);
        let outcome = evaluate(&terms, &mut rng);

        assert_eq!(outcome.parts, vec!["2×D6: (2, 5)".to_string(), "3".to_string()]);
        assert_eq!(outcome.total, 10);
    }

    #[test]
    fn real_rolls_stay_in_range() {
        let terms = parse_expression("2D6+3").unwrap();
        for _ in 0..50 {
            let outcome = evaluate(&terms, &mut ThreadRandom);
            // Two dice in [1,6] plus the literal 3.
            assert!((5..=15).contains(&outcome.total));
        }
    }

    #[test]
    fn large_counts_render_a_histogram() {
        let terms = parse_expression("21D6").unwrap();
        let mut rng = ScriptedRandom::new(std::iter::repeat(3).take(21));
        let outcome = evaluate(&terms, &mut rng);

        assert_eq!(outcome.parts, vec!["21×D6: (21×3)".to_string()]);
        assert_eq!(outcome.total, 63);
    }

    #[test]
    fn twenty_dice_are_still_listed() {
        let terms = parse_expression("20D6").unwrap();
        let mut rng = ScriptedRandom::new(std::iter::repeat(1).take(20));
        let outcome = evaluate(&terms, &mut rng);

        assert!(outcome.parts[0].starts_with("20×D6: (1, 1"));
        assert_eq!(outcome.total, 20);
    }
}
