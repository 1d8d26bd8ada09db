use crate::error::{Error, Result};
use crate::model::{QueryTerm, RankedOilResult, MAX_EFFECT_DEGREE};

/// Highest raw score any oil could reach for these terms
///
/// Raw scores are only accumulated during a search. Once all terms are merged
/// this maximum turns each of them into a 0-100 match strength
/// ("Gewichtete Übereinstimmung").
///
/// Sum of `severity * MAX_EFFECT_DEGREE` over the terms a search would not skip.
pub fn max_possible_raw_score(terms: &[QueryTerm]) -> i64 {
    terms
        .iter()
        .filter(|t| t.is_usable())
        .map(|t| i64::from(t.severity) * i64::from(MAX_EFFECT_DEGREE))
        .fold(0, i64::saturating_add)
}

/// Weighted match value of one result: `100 / max * raw`, truncated toward zero
///
/// Evaluated in integer arithmetic so a perfect match is exactly 100.
/// `max_possible_raw_score` must be positive; callers check for a query
/// without usable terms before normalizing.
pub fn normalize(result: &RankedOilResult, max_possible_raw_score: i64) -> Result<i32> {
    if max_possible_raw_score <= 0 {
        return Err(Error::DivisionByZero(max_possible_raw_score));
    }

    let value = 100 * i128::from(result.raw_score) / i128::from(max_possible_raw_score);
    Ok(value.clamp(i128::from(i32::MIN), i128::from(i32::MAX)) as i32)
}

/// Normalize a whole result set in place
pub fn normalize_all(results: &mut [RankedOilResult], max_possible_raw_score: i64) -> Result<()> {
    for result in results.iter_mut() {
        result.weighted_match_value = normalize(result, max_possible_raw_score)?;
    }
    Ok(())
}

/// Display order: weighted match value, then match count, both descending
///
/// Stable, so equal results keep the order the engine first saw them in.
pub fn sort_for_display(results: &mut [RankedOilResult]) {
    results.sort_by(|a, b| {
        b.weighted_match_value
            .cmp(&a.weighted_match_value)
            .then_with(|| b.match_count.cmp(&a.match_count))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EssentialOil;

    fn make_result(id: &str, raw_score: i64, match_count: u32) -> RankedOilResult {
        let oil = EssentialOil {
            id: id.to_string(),
            name: id.to_string(),
            latin_name: String::new(),
            description: None,
        };
        let mut result = RankedOilResult::partial(oil, raw_score, "A");
        result.match_count = match_count;
        result
    }

    #[test]
    fn test_max_possible_skips_unusable_terms() {
        let terms = vec![
            QueryTerm::new("A", 4),
            QueryTerm::new("B", 1),
            QueryTerm::new("C", 2),
            QueryTerm::new("", 3),
            QueryTerm::new("D", 0),
        ];

        assert_eq!(max_possible_raw_score(&terms), 28);
        assert_eq!(max_possible_raw_score(&[]), 0);
    }

    #[test]
    fn test_normalize_worked_example() {
        assert_eq!(normalize(&make_result("x", 22, 3), 28).unwrap(), 78);
        assert_eq!(normalize(&make_result("y", 10, 2), 28).unwrap(), 35);
    }

    #[test]
    fn test_normalize_boundaries() {
        assert_eq!(normalize(&make_result("x", 28, 3), 28).unwrap(), 100);
        assert_eq!(normalize(&make_result("x", 0, 1), 28).unwrap(), 0);
        assert_eq!(normalize(&make_result("x", 388, 5), 388).unwrap(), 100);
    }

    #[test]
    fn test_large_severity_does_not_overflow() {
        let terms = vec![
            QueryTerm::new("Stress", i32::MAX),
            QueryTerm::new("Pain", 1_000_000_000),
        ];
        let max = max_possible_raw_score(&terms);

        assert_eq!(max, (i64::from(i32::MAX) + 1_000_000_000) * 4);
        assert_eq!(normalize(&make_result("x", max, 2), max).unwrap(), 100);
        assert_eq!(normalize(&make_result("x", max / 2, 1), max).unwrap(), 50);
    }

    #[test]
    fn test_normalize_division_by_zero() {
        let result = make_result("x", 5, 1);

        assert!(matches!(normalize(&result, 0), Err(Error::DivisionByZero(0))));
        assert!(matches!(normalize(&result, -4), Err(Error::DivisionByZero(-4))));
    }

    #[test]
    fn test_normalize_all_and_sort() {
        let mut results = vec![
            make_result("low", 10, 2),
            make_result("tie-first", 22, 2),
            make_result("tie-second", 22, 2),
            make_result("more-matches", 22, 3),
        ];

        normalize_all(&mut results, 28).unwrap();
        sort_for_display(&mut results);

        let order: Vec<&str> = results.iter().map(|r| r.oil_id.as_str()).collect();
        assert_eq!(order, vec!["more-matches", "tie-first", "tie-second", "low"]);
        assert_eq!(results[0].weighted_match_value, 78);
    }
}
