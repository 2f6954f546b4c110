//! Number utilities: exact decimal round-up and thousands grouping.

/// Rounds `value` up to `places` decimal digits.
///
/// The returned value is the smallest number representable with `places`
/// decimal digits that is greater than or equal to `value`. The computation
/// works on the decimal (shortest round-trip) representation of the input
/// with integer arithmetic, so a value that is already exact at the target
/// precision comes back unchanged instead of picking up binary-fraction
/// noise. `places = 0` rounds up to the next whole integer.
///
/// Domain is non-negative values (file sizes, pixel counts).
///
/// # Examples
///
/// ```
/// use cutil::number::round_up_decimal;
///
/// assert_eq!(round_up_decimal(28.94, 0), 29.0);
/// assert_eq!(round_up_decimal(8.0, 0), 8.0);
/// assert_eq!(round_up_decimal(1.231, 2), 1.24);
/// assert_eq!(round_up_decimal(1.23, 2), 1.23);
/// ```
pub fn round_up_decimal(value: f64, places: u32) -> f64 {
    // u64 scale caps the usable precision well above anything sensible
    if places > 15 || !value.is_finite() || value < 0.0 {
        return value;
    }

    let text = format!("{value}");
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, f),
        None => (text.as_str(), ""),
    };

    let places = places as usize;
    let kept = &frac_part[..frac_part.len().min(places)];
    let dropped_nonzero =
        frac_part.len() > places && frac_part[places..].bytes().any(|b| b != b'0');

    let scale = 10u128.pow(places as u32);
    let mut scaled = int_part.parse::<u128>().unwrap_or(0) * scale;
    if !kept.is_empty() {
        scaled += kept.parse::<u128>().unwrap_or(0) * 10u128.pow((places - kept.len()) as u32);
    }
    if dropped_nonzero {
        scaled += 1;
    }

    scaled as f64 / scale as f64
}

/// Formats a number string with commas as thousands separators.
///
/// Takes a string representation of a number (which may include decimal
/// places) and groups the integer part in threes.
///
/// # Examples
///
/// ```
/// use cutil::number::format_number_with_commas;
///
/// assert_eq!(format_number_with_commas("1234567"), "1,234,567");
/// assert_eq!(format_number_with_commas("1234.56"), "1,234.56");
/// assert_eq!(format_number_with_commas("123"), "123");
/// assert_eq!(format_number_with_commas(""), "");
/// ```
pub fn format_number_with_commas(number_str: &str) -> String {
    if number_str.is_empty() {
        return String::default();
    }

    let (int_part, rest) = match number_str.split_once('.') {
        Some((i, r)) => (i, Some(r)),
        None => (number_str, None),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*ch);
    }

    match rest {
        Some(r) => format!("{grouped}.{r}"),
        None => grouped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_up_decimal_whole() {
        // cell size derivation inputs: long side / 100
        assert_eq!(round_up_decimal(3.0, 0), 3.0);
        assert_eq!(round_up_decimal(8.0, 0), 8.0);
        assert_eq!(round_up_decimal(12.8, 0), 13.0);
        assert_eq!(round_up_decimal(28.94, 0), 29.0);
        assert_eq!(round_up_decimal(40.93, 0), 41.0);
    }

    #[test]
    fn test_round_up_decimal_places() {
        assert_eq!(round_up_decimal(1.231, 2), 1.24);
        assert_eq!(round_up_decimal(1.23, 2), 1.23);
        assert_eq!(round_up_decimal(1.2, 2), 1.2);
        assert_eq!(round_up_decimal(0.001, 2), 0.01);
        assert_eq!(round_up_decimal(0.0, 2), 0.0);
        assert_eq!(round_up_decimal(1023.0 / 1024.0, 2), 1.0);
    }

    #[test]
    fn test_round_up_decimal_exact_is_fixed_point() {
        let rounded = round_up_decimal(12.34, 2);
        assert_eq!(rounded, 12.34);
        assert_eq!(round_up_decimal(rounded, 2), rounded);
    }

    #[test]
    fn test_format_number_with_commas() {
        let verify = vec![
            "", "1.23", "12.12", "123.12", "1,234.12", "1", "12", "123", "1,234", "123,456",
        ];

        let mut output = vec![];
        for item in [
            "", "1.23", "12.12", "123.12", "1234.12", "1", "12", "123", "1234", "123456",
        ] {
            output.push(format_number_with_commas(item));
        }

        assert_eq!(verify, output);
    }
}
