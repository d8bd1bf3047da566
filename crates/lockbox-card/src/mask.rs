//! Bin/last-digit parsing and display masking for card numbers.
//!
//! The masked form keeps the issuer-identifying prefix and the trailing
//! digits visible while every digit in between becomes `#`. Boundaries
//! widen by one position for input that already contains non-digit
//! characters (spaces, dividers, or a previous mask).

/// First characters of the cleaned digit string that are safe to show.
pub fn bin(input: &str) -> String {
    let digits = super::digits_of(input);
    let end = digits.len().min(6);
    digits[..end].to_string()
}

/// Trailing four digits of the cleaned string, or empty when the number
/// is too short to reveal any.
pub fn last_digits(input: &str) -> String {
    let digits = super::digits_of(input);
    if digits.len() > 10 {
        digits[digits.len() - 4..].to_string()
    } else {
        String::new()
    }
}

/// Prefix of the raw (possibly formatted) string covering the bin zone.
pub fn raw_bin(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let digit_count = super::digits_of(input).len();
    let bin_end = bin_boundary(input);
    let end = if digit_count >= bin_end {
        bin_end.min(chars.len())
    } else {
        digit_count
    };
    chars[..end].iter().collect()
}

/// Suffix of the raw string past the last-digits boundary, or empty.
pub fn raw_last_digits(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let start = last_digits_boundary(input);
    if chars.len() > start {
        chars[start..].iter().collect()
    } else {
        String::new()
    }
}

/// Display form of a card number: bin, masked middle, trailing digits.
///
/// Input shorter than the bin zone is returned untouched, so a string
/// that is already fully masked passes through unchanged. Empty input
/// yields an empty string, not an error.
pub fn masked(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    let chars: Vec<char> = input.chars().collect();
    let start_dig = bin_boundary(input);
    let end_dig = last_digits_boundary(input);

    if chars.len() <= start_dig {
        return input.to_string();
    }

    if chars.len() < end_dig {
        let bin = raw_bin(input);
        let bin_len = bin.chars().count();
        if chars.len() > bin_len {
            let middle: String = chars[bin_len..].iter().collect();
            format!("{}{}", bin, mask_digits(&middle))
        } else {
            bin
        }
    } else {
        let bin = raw_bin(input);
        let last = raw_last_digits(input);
        let bin_len = bin.chars().count();
        let last_len = last.chars().count();
        let middle: String = chars[bin_len..chars.len() - last_len].iter().collect();
        format!("{}{}{}", bin, mask_digits(&middle), last)
    }
}

fn mask_digits(input: &str) -> String {
    input
        .chars()
        .map(|c| if c.is_ascii_digit() { '#' } else { c })
        .collect()
}

fn is_numeric(input: &str) -> bool {
    !input.is_empty() && input.chars().all(|c| c.is_ascii_digit())
}

fn bin_boundary(input: &str) -> usize {
    if is_numeric(input) {
        6
    } else {
        7
    }
}

fn last_digits_boundary(input: &str) -> usize {
    if is_numeric(input) {
        12
    } else {
        15
    }
}
