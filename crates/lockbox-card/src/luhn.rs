//! Luhn mod-10 checksum over the digit characters of a card number.

/// Check the Luhn checksum of `number`, ignoring non-digit characters.
///
/// Empty input (or input with no digits at all) is not valid.
pub fn luhn_valid(number: &str) -> bool {
    let mut sum = 0u32;
    let mut digit_count = 0usize;

    for (position, c) in number
        .chars()
        .rev()
        .filter(|c| c.is_ascii_digit())
        .enumerate()
    {
        let mut digit = c.to_digit(10).unwrap_or(0);
        if position % 2 == 1 {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
        digit_count += 1;
    }

    digit_count > 0 && sum % 10 == 0
}
