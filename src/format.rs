/// Shown in tables where a PM2.5 reading is undefined.
pub const MISSING_PLACEHOLDER: &str = "n/a";

/// Render a population with comma thousands separators: `1234567` → `"1,234,567"`.
pub fn format_population(pop: u64) -> String {
    let digits = pop.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Render a PM2.5 reading with one decimal, or the placeholder when undefined.
pub fn format_pm25(pm25: Option<f64>) -> String {
    match pm25 {
        Some(v) if !v.is_nan() => format!("{v:.1}"),
        _ => MISSING_PLACEHOLDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn population_separators() {
        assert_eq!(format_population(0), "0");
        assert_eq!(format_population(999), "999");
        assert_eq!(format_population(1000), "1,000");
        assert_eq!(format_population(100_000), "100,000");
        assert_eq!(format_population(1_234_567), "1,234,567");
        assert_eq!(format_population(u64::MAX), "18,446,744,073,709,551,615");
    }

    #[test]
    fn pm25_labels() {
        assert_eq!(format_pm25(Some(40.0)), "40.0");
        assert_eq!(format_pm25(Some(12.345)), "12.3");
        assert_eq!(format_pm25(None), "n/a");
        assert_eq!(format_pm25(Some(f64::NAN)), "n/a");
    }
}
