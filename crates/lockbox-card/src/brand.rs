//! Card brand table and prefix classification.
//!
//! One canonical ordered table of prefix patterns; classification is a
//! linear scan in table order and the first matching pattern wins, so
//! table order is significant (LASER sits before MAESTRO because both
//! claim the 6304 prefix).

use once_cell::sync::Lazy;
use regex::Regex;

/// Card network inferred from the number's leading digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardBrand {
    Elo,
    VisaElectron,
    Laser,
    Maestro,
    Forbrugsforeningen,
    Dankort,
    Visa,
    Mastercard,
    AmericanExpress,
    Hipercard,
    DinersClub,
    Discover,
    UnionPay,
    Jcb,
    None,
}

/// Static description of a brand: prefix pattern plus the accepted
/// total-digit and CVC lengths.
#[derive(Debug)]
pub struct BrandSpec {
    pub brand: CardBrand,
    pub pattern: &'static str,
    pub number_lengths: &'static [usize],
    pub cvc_lengths: &'static [usize],
}

// Matches any 60-prefix except 6011, which belongs to Discover.
const HIPERCARD_PATTERN: &str =
    r"^(384100|384140|384160|606282|637095|637568|60($|1$|[02-9]|1[02-9]))";

const SPECS: &[BrandSpec] = &[
    BrandSpec {
        brand: CardBrand::Elo,
        pattern: r"^(4011(78|79)|43(1274|8935)|45(1416|7393|763(1|2))|50(4175|6699|67[0-7][0-9]|9000)|627780|63(6297|6368)|650(03([^4])|04([0-9])|05(0|1)|4(0[5-9]|3[0-9]|8[5-9]|9[0-9])|5([0-2][0-9]|3[0-8])|9([2-6][0-9]|7[0-8])|541|700|720|901)|651652|655000|655021)",
        number_lengths: &[16],
        cvc_lengths: &[3],
    },
    BrandSpec {
        brand: CardBrand::VisaElectron,
        pattern: r"^4(026|17500|405|508|844|91[37])",
        number_lengths: &[16],
        cvc_lengths: &[3],
    },
    BrandSpec {
        brand: CardBrand::Laser,
        pattern: r"^(6706|6771|6709|6304)",
        number_lengths: &[16, 17, 18, 19],
        cvc_lengths: &[3],
    },
    BrandSpec {
        brand: CardBrand::Maestro,
        pattern: r"^(5018|5020|5038|6304|6390[0-9]{2}|67[0-9]{4})",
        number_lengths: &[13, 14, 15, 16],
        cvc_lengths: &[3],
    },
    BrandSpec {
        brand: CardBrand::Forbrugsforeningen,
        pattern: r"^600",
        number_lengths: &[16],
        cvc_lengths: &[3],
    },
    BrandSpec {
        brand: CardBrand::Dankort,
        pattern: r"^5019",
        number_lengths: &[16],
        cvc_lengths: &[3],
    },
    BrandSpec {
        brand: CardBrand::Visa,
        pattern: r"^4",
        number_lengths: &[13, 16, 19],
        cvc_lengths: &[3],
    },
    BrandSpec {
        brand: CardBrand::Mastercard,
        pattern: r"^(5[1-5][0-9]{4}|677189)|^(222[1-9]|2[3-6]\d{2}|27[0-1]\d|2720)([0-9]{2})",
        number_lengths: &[16],
        cvc_lengths: &[3],
    },
    BrandSpec {
        brand: CardBrand::AmericanExpress,
        pattern: r"^3[47]",
        number_lengths: &[15],
        cvc_lengths: &[4],
    },
    BrandSpec {
        brand: CardBrand::Hipercard,
        pattern: HIPERCARD_PATTERN,
        number_lengths: &[14, 15, 16, 17, 18, 19],
        cvc_lengths: &[3],
    },
    BrandSpec {
        brand: CardBrand::DinersClub,
        pattern: r"^(36|38|30[0-5])",
        number_lengths: &[14],
        cvc_lengths: &[3],
    },
    BrandSpec {
        brand: CardBrand::Discover,
        pattern: r"^(6011|65|64[4-9]|622)",
        number_lengths: &[16],
        cvc_lengths: &[3],
    },
    BrandSpec {
        brand: CardBrand::UnionPay,
        pattern: r"^62",
        number_lengths: &[16, 17, 18, 19],
        cvc_lengths: &[3],
    },
    BrandSpec {
        brand: CardBrand::Jcb,
        pattern: r"^35",
        number_lengths: &[16, 17, 18, 19],
        cvc_lengths: &[3],
    },
];

// Fallback spec for numbers no pattern claims. Permissive length range;
// the checksum rule still gates validity.
const NONE_SPEC: BrandSpec = BrandSpec {
    brand: CardBrand::None,
    pattern: "",
    number_lengths: &[
        0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19,
    ],
    cvc_lengths: &[3, 4],
};

static COMPILED: Lazy<Vec<(Regex, &'static BrandSpec)>> = Lazy::new(|| {
    SPECS
        .iter()
        .map(|spec| {
            let regex = Regex::new(spec.pattern).expect("brand table pattern must compile");
            (regex, spec)
        })
        .collect()
});

/// Strip every non-digit character from `input`.
pub fn digits_of(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Classify a raw card-number string by its digit prefix.
///
/// Non-digit characters are stripped before matching. Returns
/// [`CardBrand::None`] when no pattern in the table matches. Total
/// function: never fails, never panics on user input.
pub fn classify(input: &str) -> CardBrand {
    let digits = digits_of(input);
    COMPILED
        .iter()
        .find(|(regex, _)| regex.is_match(&digits))
        .map(|(_, spec)| spec.brand)
        .unwrap_or(CardBrand::None)
}

impl CardBrand {
    /// The static table row for this brand.
    pub fn spec(self) -> &'static BrandSpec {
        SPECS
            .iter()
            .find(|spec| spec.brand == self)
            .unwrap_or(&NONE_SPEC)
    }

    /// Accepted total-digit lengths for this brand.
    pub fn number_lengths(self) -> &'static [usize] {
        self.spec().number_lengths
    }

    /// Accepted CVC lengths for this brand.
    pub fn cvc_lengths(self) -> &'static [usize] {
        self.spec().cvc_lengths
    }

    /// Longest accepted CVC length, used to size CVC inputs.
    pub fn cvc_max_length(self) -> usize {
        self.spec().cvc_lengths.iter().copied().max().unwrap_or(3)
    }

    /// Human-readable network name.
    pub fn display_name(self) -> &'static str {
        match self {
            CardBrand::Elo => "Elo",
            CardBrand::VisaElectron => "Visa Electron",
            CardBrand::Laser => "Laser",
            CardBrand::Maestro => "Maestro",
            CardBrand::Forbrugsforeningen => "Forbrugsforeningen",
            CardBrand::Dankort => "Dankort",
            CardBrand::Visa => "Visa",
            CardBrand::Mastercard => "Mastercard",
            CardBrand::AmericanExpress => "American Express",
            CardBrand::Hipercard => "Hipercard",
            CardBrand::DinersClub => "Diners Club",
            CardBrand::Discover => "Discover",
            CardBrand::UnionPay => "UnionPay",
            CardBrand::Jcb => "JCB",
            CardBrand::None => "Unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_prefixes() {
        assert_eq!(classify("4111111111111111"), CardBrand::Visa);
        assert_eq!(classify("4026000000000000"), CardBrand::VisaElectron);
        assert_eq!(classify("5555555555554444"), CardBrand::Mastercard);
        assert_eq!(classify("2221000000000009"), CardBrand::Mastercard);
        assert_eq!(classify("378282246310005"), CardBrand::AmericanExpress);
        assert_eq!(classify("36700102000000"), CardBrand::DinersClub);
        assert_eq!(classify("6011000400000000"), CardBrand::Discover);
        assert_eq!(classify("3528000700000000"), CardBrand::Jcb);
        assert_eq!(classify("6221260000000000"), CardBrand::Discover);
        assert_eq!(classify("6250000000000000"), CardBrand::UnionPay);
        assert_eq!(classify("5019717010103742"), CardBrand::Dankort);
        assert_eq!(classify("6007220000000004"), CardBrand::Forbrugsforeningen);
        assert_eq!(classify("6062825624254001"), CardBrand::Hipercard);
    }

    #[test]
    fn test_no_match_is_none() {
        assert_eq!(classify(""), CardBrand::None);
        assert_eq!(classify("abcdef"), CardBrand::None);
        assert_eq!(classify("9999999999999999"), CardBrand::None);
        assert_eq!(classify("1111111111111111"), CardBrand::None);
    }

    #[test]
    fn test_non_digits_are_stripped_before_matching() {
        assert_eq!(classify("4111 1111 1111 1111"), CardBrand::Visa);
        assert_eq!(classify("37-8282-246310-005"), CardBrand::AmericanExpress);
    }

    #[test]
    fn test_table_order_breaks_shared_prefix_ties() {
        // 6304 is claimed by both Laser and Maestro; Laser is first.
        assert_eq!(classify("6304990000000000"), CardBrand::Laser);
        // 4026 is Visa Electron before the catch-all Visa row.
        assert_eq!(classify("4026111111111115"), CardBrand::VisaElectron);
        // 5018 is Maestro, not Mastercard's 5[1-5] range.
        assert_eq!(classify("5018000000000000"), CardBrand::Maestro);
    }

    #[test]
    fn test_hipercard_excludes_discover_6011() {
        assert_eq!(classify("6011000990139424"), CardBrand::Discover);
        assert_eq!(classify("6012000000000000"), CardBrand::Hipercard);
        assert_eq!(classify("60"), CardBrand::Hipercard);
        assert_eq!(classify("601"), CardBrand::Hipercard);
    }

    #[test]
    fn test_brand_metadata() {
        assert_eq!(CardBrand::AmericanExpress.cvc_max_length(), 4);
        assert_eq!(CardBrand::Visa.cvc_max_length(), 3);
        assert_eq!(CardBrand::Visa.number_lengths(), &[13, 16, 19]);
        assert_eq!(CardBrand::Maestro.number_lengths(), &[13, 14, 15, 16]);
        assert_eq!(CardBrand::None.cvc_lengths(), &[3, 4]);
        assert_eq!(CardBrand::Mastercard.display_name(), "Mastercard");
    }
}
