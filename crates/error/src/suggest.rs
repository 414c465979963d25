//! Levenshtein-based "did you mean" suggestions for rejection hints.

/// Find the closest option within an edit distance of 3.
pub fn closest_match(target: &str, options: &[String]) -> Option<String> {
    let mut best_match: Option<&str> = None;
    let mut min_distance = usize::MAX;

    for option in options {
        let distance = levenshtein(target, option);
        if distance < min_distance && distance <= 3 {
            min_distance = distance;
            best_match = Some(option.as_str());
        }
    }

    best_match.map(|s| s.to_string())
}

fn levenshtein(a: &str, b: &str) -> usize {
    let len_a = a.chars().count();
    let len_b = b.chars().count();
    let b_chars: Vec<char> = b.chars().collect();

    let mut dp = vec![vec![0; len_b + 1]; len_a + 1];

    for (i, row) in dp.iter_mut().enumerate().take(len_a + 1) {
        row[0] = i;
    }
    for (j, val) in dp[0].iter_mut().enumerate().take(len_b + 1) {
        *val = j;
    }

    for (i, ca) in a.chars().enumerate() {
        for j in 1..=len_b {
            let cost = if ca == b_chars[j - 1] { 0 } else { 1 };
            dp[i + 1][j] = std::cmp::min(
                std::cmp::min(dp[i][j] + 1, dp[i + 1][j - 1] + 1),
                dp[i][j - 1] + cost,
            );
        }
    }

    dp[len_a][len_b]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("book", "back"), 2);
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("same", "same"), 0);
    }

    #[test]
    fn test_closest_match() {
        let options = vec![
            "dim_date".to_string(),
            "dim_product".to_string(),
            "fact_sales".to_string(),
        ];

        assert_eq!(
            closest_match("fact_sale", &options),
            Some("fact_sales".to_string())
        );
        assert_eq!(
            closest_match("dim_dates", &options),
            Some("dim_date".to_string())
        );

        // No match (distance > 3)
        assert_eq!(closest_match("completely_different", &options), None);
    }
}
