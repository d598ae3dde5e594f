//! Production-rate text shown next to the particle layer

use std::fmt::Write;

/// Short-scale suffixes, one per factor of 1000 starting at thousands
const SUFFIXES: [&str; 11] = ["K", "M", "B", "T", "Qa", "Qi", "Sx", "Sp", "Oc", "No", "Dc"];

/// Formats the production rate into a reused text buffer.
///
/// Below a thousand the value is shown with one decimal. Above that it is
/// scaled into the suffix table with two decimals, and past the last suffix
/// it switches to scientific notation.
#[derive(Debug, Default)]
pub struct RateDisplay {
    text: String,
    value: Option<f64>,
}

impl RateDisplay {
    pub fn new() -> Self {
        Self {
            text: String::with_capacity(24),
            value: None,
        }
    }

    /// Reformat for `rate` and return the text. Unchanged rates skip the
    /// formatting work.
    pub fn update(&mut self, rate: f64) -> &str {
        let rate = if rate.is_nan() || rate < 0.0 { 0.0 } else { rate };
        if self.value != Some(rate) {
            self.value = Some(rate);
            self.text.clear();
            format_rate(&mut self.text, rate);
        }
        &self.text
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

fn format_rate(out: &mut String, rate: f64) {
    if rate.is_infinite() {
        out.push_str("Infinity");
        return;
    }
    if rate < 999.95 {
        let _ = write!(out, "{rate:.1}");
        return;
    }
    let mut tier = 0usize;
    let mut scaled = rate / 1000.0;
    // Bump tiers while the rounded value would print as 1000.00
    while scaled >= 999.995 && tier < SUFFIXES.len() {
        scaled /= 1000.0;
        tier += 1;
    }
    match SUFFIXES.get(tier) {
        Some(suffix) => {
            let _ = write!(out, "{scaled:.2}{suffix}");
        }
        None => {
            let _ = write!(out, "{rate:.2e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fmt(rate: f64) -> String {
        RateDisplay::new().update(rate).to_string()
    }

    #[test]
    fn small_rates_show_one_decimal() {
        assert_eq!(fmt(0.0), "0.0");
        assert_eq!(fmt(12.345), "12.3");
        assert_eq!(fmt(999.9), "999.9");
    }

    #[test]
    fn suffixes() {
        assert_eq!(fmt(1_000.0), "1.00K");
        assert_eq!(fmt(1_234_567.0), "1.23M");
        assert_eq!(fmt(4.5e9), "4.50B");
        assert_eq!(fmt(7.0e15), "7.00Qa");
        assert_eq!(fmt(2.0e33), "2.00Dc");
    }

    #[test]
    fn rounding_never_prints_a_thousand() {
        assert_eq!(fmt(999.97), "1.00K");
        assert_eq!(fmt(999_999.0), "1.00M");
    }

    #[test]
    fn beyond_table_is_scientific() {
        assert_eq!(fmt(3.0e36), "3.00e36");
    }

    #[test]
    fn garbage_reads_as_zero() {
        assert_eq!(fmt(-5.0), "0.0");
        assert_eq!(fmt(f64::NAN), "0.0");
        assert_eq!(fmt(f64::INFINITY), "Infinity");
    }

    #[test]
    fn buffer_is_reused() {
        let mut display = RateDisplay::new();
        display.update(1.0e6);
        let cap = display.text.capacity();
        for i in 0..100 {
            display.update(i as f64 * 1.7e4);
        }
        assert_eq!(display.text.capacity(), cap);
    }

    proptest! {
        #[test]
        fn scaled_mantissa_stays_below_a_thousand(rate in 1000.0f64..1e36) {
            let text = fmt(rate);
            let digits: String = text
                .chars()
                .take_while(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            let mantissa: f64 = digits.parse().expect("numeric prefix");
            prop_assert!((1.0..1000.0).contains(&mantissa), "{} -> {}", rate, text);
        }
    }
}
