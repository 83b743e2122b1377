//! Icelandic personal and organisation identity codes (kennitala).
//!
//! A kennitala is ten digits: a `DDMMYY` date, two random digits, a check
//! digit and a century marker (`9` for the 1900s, `0` for the 2000s).
//! Organisations use their registration date with 40 added to the day.
//!
//! ```
//! assert_eq!(kennitala::validate("530575-0209").unwrap(), "5305750209");
//! assert!(kennitala::is_valid("120174-3399"));
//! assert!(!kennitala::is_valid("530575-0299"));
//! ```

mod consts;
mod prelude;
mod types;

pub use consts::*;
pub use types::{CalendarError, Century, Day, EmbeddedDate, EntityKind, Month, Year};

use crate::consts::{
    CENTURY_POS, CONTROL_POS, DAY_POS, HYPHEN_POS, MAX_DAY_TENS, MAX_MONTH_TENS, MONTH_POS,
    RANDOM_POS, YEAR_POS,
};
use crate::prelude::*;
use std::str::FromStr;
use tracing::trace;

/// Ways a kennitala can fail validation. Stages are checked in order and
/// the first failure is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ValidationError {
    /// Not ten digits in the `DDMMYYRRCK` layout once separators are removed.
    #[error("The number has an invalid format")]
    InvalidFormat,

    /// The embedded date does not exist on the calendar.
    #[error("The embedded date of the number is invalid")]
    InvalidComponent,

    /// The check digit does not match the first eight digits.
    #[error("The number's check digit is invalid")]
    InvalidChecksum,
}

impl From<CalendarError> for ValidationError {
    fn from(_: CalendarError) -> Self {
        Self::InvalidComponent
    }
}

/// Converts a kennitala to its minimal representation: dashes and
/// surrounding whitespace removed, upper-cased. No validation is done.
pub fn compact(number: &str) -> String {
    number
        .replace(SEPARATOR, "")
        .to_uppercase()
        .trim()
        .to_owned()
}

/// Formats a kennitala for presentation. There is only one length of
/// kennitala so this is the same as [`compact`].
pub fn format(number: &str) -> String {
    compact(number)
}

/// Calculates the check digit over the first eight digits of a compact
/// kennitala. The result is in `0..=10`; 10 can never match a check digit.
///
/// # Errors
/// Returns `ValidationError::InvalidFormat` unless the input is exactly
/// eight ASCII digits.
pub fn checksum(digits: &str) -> Result<u8, ValidationError> {
    let bytes = digits.as_bytes();
    if bytes.len() != CHECKSUM_INPUT_LENGTH || !bytes.iter().all(u8::is_ascii_digit) {
        return Err(ValidationError::InvalidFormat);
    }
    let mut values = [0u8; CHECKSUM_INPUT_LENGTH];
    for (value, byte) in values.iter_mut().zip(bytes) {
        *value = byte - b'0';
    }
    Ok(weighted_checksum(&values))
}

#[allow(clippy::cast_possible_truncation)]
fn weighted_checksum(digits: &[u8; CHECKSUM_INPUT_LENGTH]) -> u8 {
    let sum: u32 = CHECKSUM_WEIGHTS
        .iter()
        .zip(digits)
        .map(|(weight, &digit)| weight * u32::from(digit))
        .sum();
    // (11 - sum) mod 11, kept non-negative; always below 11
    ((CHECKSUM_MODULUS - sum % CHECKSUM_MODULUS) % CHECKSUM_MODULUS) as u8
}

/// Checks the format, the embedded date and the check digit of a kennitala
/// and returns it in compact form.
///
/// # Errors
/// Returns the `ValidationError` of the first stage that fails.
pub fn validate(number: &str) -> Result<String, ValidationError> {
    Kennitala::parse(number).map(String::from)
}

/// Returns whether `number` passes [`validate`].
pub fn is_valid(number: &str) -> bool {
    validate(number).is_ok()
}

/// The fixed-width fields of a compact kennitala that passed the
/// structural check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fields {
    digits: [u8; KENNITALA_LENGTH],
    century: Century,
}

impl Fields {
    /// Structural check: ten ASCII digits, day tens digit 0-7, month tens
    /// digit 0-1 and a century marker of 9 or 0. Day and month ranges are
    /// only bounded loosely here; the calendar check is stricter.
    fn parse(number: &str) -> Result<Self, ValidationError> {
        let bytes = number.as_bytes();
        if bytes.len() != KENNITALA_LENGTH {
            trace!(stage = "format", length = bytes.len(), "rejected kennitala of wrong length");
            return Err(ValidationError::InvalidFormat);
        }

        let mut digits = [0u8; KENNITALA_LENGTH];
        for (position, (digit, byte)) in digits.iter_mut().zip(bytes).enumerate() {
            if !byte.is_ascii_digit() {
                trace!(stage = "format", position, "rejected kennitala with non-digit character");
                return Err(ValidationError::InvalidFormat);
            }
            *digit = byte - b'0';
        }

        if digits[DAY_POS] > MAX_DAY_TENS || digits[MONTH_POS] > MAX_MONTH_TENS {
            trace!(stage = "format", "rejected kennitala with out-of-pattern day or month");
            return Err(ValidationError::InvalidFormat);
        }

        let Some(century) = Century::from_marker(digits[CENTURY_POS]) else {
            trace!(
                stage = "format",
                marker = digits[CENTURY_POS],
                "rejected kennitala with unknown century marker"
            );
            return Err(ValidationError::InvalidFormat);
        };

        Ok(Self { digits, century })
    }

    const fn pair(&self, position: usize) -> u8 {
        self.digits[position] * 10 + self.digits[position + 1]
    }

    const fn day_field(&self) -> u8 {
        self.pair(DAY_POS)
    }

    const fn month(&self) -> u8 {
        self.pair(MONTH_POS)
    }

    const fn year_in_century(&self) -> u8 {
        self.pair(YEAR_POS)
    }

    const fn random(&self) -> u8 {
        self.pair(RANDOM_POS)
    }

    const fn control(&self) -> u8 {
        self.digits[CONTROL_POS]
    }

    fn checksum_input(&self) -> [u8; CHECKSUM_INPUT_LENGTH] {
        let mut input = [0u8; CHECKSUM_INPUT_LENGTH];
        input.copy_from_slice(&self.digits[..CHECKSUM_INPUT_LENGTH]);
        input
    }
}

/// A kennitala that passed validation, held in compact form together with
/// the information it encodes.
///
/// Dereferences to the compact string and displays as it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Deref)]
#[display(fmt = "{number}")]
pub struct Kennitala {
    #[deref]
    number: String,
    kind: EntityKind,
    date: EmbeddedDate,
    century: Century,
    random: u8,
    control: u8,
}

impl Kennitala {
    /// Compacts and validates `number`.
    ///
    /// # Errors
    /// Returns `InvalidFormat`, `InvalidComponent` or `InvalidChecksum`
    /// for the first stage that fails, in that order.
    pub fn parse(number: &str) -> Result<Self, ValidationError> {
        let number = compact(number);
        let fields = Fields::parse(&number)?;

        let (kind, day_of_month) = EntityKind::from_day_field(fields.day_field());
        let year = fields.century.full_year(fields.year_in_century());
        let date = EmbeddedDate::new(year, fields.month(), day_of_month).map_err(|err| {
            trace!(stage = "component", %err, "rejected kennitala with impossible date");
            ValidationError::from(err)
        })?;

        let expected = weighted_checksum(&fields.checksum_input());
        if expected != fields.control() {
            trace!(stage = "checksum", expected, "rejected kennitala with wrong check digit");
            return Err(ValidationError::InvalidChecksum);
        }

        Ok(Self {
            number,
            kind,
            date,
            century: fields.century,
            random: fields.random(),
            control: fields.control(),
        })
    }

    /// The compact ten-digit form
    pub fn as_str(&self) -> &str {
        &self.number
    }

    /// The conventional written form, `DDMMYY-RRCK`
    pub fn hyphenated(&self) -> String {
        let (date, rest) = self.number.split_at(HYPHEN_POS);
        format!("{date}{SEPARATOR}{rest}")
    }

    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    pub const fn is_organisation(&self) -> bool {
        matches!(self.kind, EntityKind::Organisation)
    }

    /// Date of birth for individuals, date of registration for organisations
    pub const fn date(&self) -> EmbeddedDate {
        self.date
    }

    pub const fn century(&self) -> Century {
        self.century
    }

    /// The two digits between the date and the check digit
    pub const fn random_digits(&self) -> u8 {
        self.random
    }

    pub const fn control_digit(&self) -> u8 {
        self.control
    }
}

impl FromStr for Kennitala {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Kennitala {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<String> for Kennitala {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Kennitala> for String {
    fn from(kennitala: Kennitala) -> Self {
        kennitala.number
    }
}

impl AsRef<str> for Kennitala {
    fn as_ref(&self) -> &str {
        &self.number
    }
}

impl serde::Serialize for Kennitala {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.number)
    }
}

impl<'de> serde::Deserialize<'de> for Kennitala {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_compact() {
        assert_eq!(compact("530575-0209"), "5305750209");
        assert_eq!(compact("120174-3399"), "1201743399");
        assert_eq!(compact("  120174-3399\t"), "1201743399");
        assert_eq!(compact("12-01-74-33-99"), "1201743399");
    }

    #[test]
    fn test_compact_keeps_inner_whitespace() {
        // Only surrounding whitespace is stripped
        assert_eq!(compact("120174 3399"), "120174 3399");
        assert_eq!(validate("120174 3399"), Err(ValidationError::InvalidFormat));
    }

    #[test]
    fn test_compact_uppercases() {
        assert_eq!(compact("12o174-33a9"), "12O17433A9");
    }

    #[test]
    fn test_format_is_compact() {
        assert_eq!(format(" 530575-0209 "), compact(" 530575-0209 "));
    }

    #[test]
    fn test_checksum_known_values() {
        assert_eq!(checksum("53057502"), Ok(0));
        assert_eq!(checksum("12017433"), Ok(9));
    }

    #[test]
    fn test_checksum_can_be_ten() {
        assert_eq!(checksum("00000000"), Ok(0));
        // 2*5 = 10, (11 - 10) mod 11 = 1
        assert_eq!(checksum("00000005"), Ok(1));
        // 3*4 = 12, (11 - 1) mod 11 = 10
        assert_eq!(checksum("40000000"), Ok(10));
    }

    #[test]
    fn test_checksum_rejects_malformed_input() {
        assert_eq!(checksum("1234567"), Err(ValidationError::InvalidFormat));
        assert_eq!(checksum("123456789"), Err(ValidationError::InvalidFormat));
        assert_eq!(checksum("1234567a"), Err(ValidationError::InvalidFormat));
        assert_eq!(checksum(""), Err(ValidationError::InvalidFormat));
    }

    #[test]
    fn test_validate_organisation() {
        assert_eq!(validate("530575-0209"), Ok("5305750209".to_owned()));
    }

    #[test]
    fn test_validate_individual() {
        assert_eq!(validate("120174-3399"), Ok("1201743399".to_owned()));
    }

    #[test]
    fn test_validate_wrong_check_digit() {
        assert_eq!(validate("530575-0299"), Err(ValidationError::InvalidChecksum));
    }

    #[test]
    fn test_validate_impossible_day() {
        // day 32 is below 40, so it is a day-of-month for an individual
        assert_eq!(
            validate("320174-3399"),
            Err(ValidationError::InvalidComponent)
        );
    }

    #[test]
    fn test_validate_ignores_surrounding_whitespace_and_dash() {
        assert_eq!(validate(" 530575-0209 "), validate("5305750209"));
    }

    #[test]
    fn test_validate_wrong_length() {
        assert_eq!(validate("530575-020"), Err(ValidationError::InvalidFormat));
        assert_eq!(validate("530575-02099"), Err(ValidationError::InvalidFormat));
        assert_eq!(validate(""), Err(ValidationError::InvalidFormat));
    }

    #[test]
    fn test_validate_non_digits() {
        assert_eq!(validate("53057A-0209"), Err(ValidationError::InvalidFormat));
        // Non-ASCII digits are not digits here
        assert_eq!(validate("٥٣٠٥٧٥٠٢٠٩"), Err(ValidationError::InvalidFormat));
    }

    #[test]
    fn test_validate_century_marker() {
        for marker in 1..=8 {
            let number = format!("530575020{marker}");
            assert_eq!(
                validate(&number),
                Err(ValidationError::InvalidFormat),
                "marker {marker}"
            );
        }
    }

    #[test]
    fn test_validate_day_tens_digit_out_of_pattern() {
        // 8x and 9x days never match the layout
        assert_eq!(validate("830575-0209"), Err(ValidationError::InvalidFormat));
        assert_eq!(validate("930575-0209"), Err(ValidationError::InvalidFormat));
    }

    #[test]
    fn test_validate_month_tens_digit_out_of_pattern() {
        assert_eq!(validate("122074-3399"), Err(ValidationError::InvalidFormat));
    }

    #[test]
    fn test_validate_month_out_of_range_is_component_error() {
        // 13 matches the layout but is not a month
        assert_eq!(
            validate("121374-3399"),
            Err(ValidationError::InvalidComponent)
        );
        assert_eq!(
            validate("120074-3399"),
            Err(ValidationError::InvalidComponent)
        );
    }

    #[test]
    fn test_validate_organisation_day_range() {
        // 40 means day 0, 72 means day 32: both impossible
        assert_eq!(
            validate("400575-0209"),
            Err(ValidationError::InvalidComponent)
        );
        assert_eq!(
            validate("720575-0209"),
            Err(ValidationError::InvalidComponent)
        );
    }

    #[test]
    fn test_validate_stage_order() {
        // Impossible date and wrong check digit: the date is reported
        assert_eq!(
            validate("320174-3309"),
            Err(ValidationError::InvalidComponent)
        );
        // Bad century marker and impossible date: the format is reported
        assert_eq!(
            validate("320174-3395"),
            Err(ValidationError::InvalidFormat)
        );
    }

    #[test]
    fn test_validate_leap_day() {
        // 29 February 2000
        assert_eq!(checksum("29020012"), Ok(1));
        assert_eq!(validate("290200-1210"), Ok("2902001210".to_owned()));

        // 29 February 1900 does not exist
        assert_eq!(
            validate("290200-1219"),
            Err(ValidationError::InvalidComponent)
        );
    }

    #[test]
    fn test_is_valid() {
        assert!(is_valid("530575-0209"));
        assert!(is_valid("120174-3399"));
        assert!(!is_valid("530575-0299"));
        assert!(!is_valid("320174-3399"));
        assert!(!is_valid("not a number"));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ValidationError::InvalidFormat.to_string(),
            "The number has an invalid format"
        );
        assert_eq!(
            ValidationError::InvalidChecksum.to_string(),
            "The number's check digit is invalid"
        );
    }

    #[test]
    fn test_calendar_error_converts_to_component_error() {
        let err: ValidationError = CalendarError::InvalidMonth(13).into();
        assert_eq!(err, ValidationError::InvalidComponent);
    }

    #[test]
    fn test_kennitala_organisation() {
        let kt: Kennitala = "530575-0209".parse().unwrap();
        assert_eq!(kt.as_str(), "5305750209");
        assert_eq!(kt.to_string(), "5305750209");
        assert_eq!(kt.hyphenated(), "530575-0209");
        assert_eq!(kt.kind(), EntityKind::Organisation);
        assert!(kt.is_organisation());
        assert_eq!(kt.date().to_string(), "1975-05-13");
        assert_eq!(kt.century(), Century::Nineteenth);
        assert_eq!(kt.random_digits(), 2);
        assert_eq!(kt.control_digit(), 0);
    }

    #[test]
    fn test_kennitala_individual() {
        let kt = Kennitala::parse("120174-3399").unwrap();
        assert_eq!(kt.kind(), EntityKind::Individual);
        assert!(!kt.is_organisation());
        assert_eq!(kt.date().to_tuple(), (1974, 1, 12));
        assert_eq!(kt.random_digits(), 33);
        assert_eq!(kt.control_digit(), 9);
        assert_eq!(kt.len(), 10);
    }

    #[test]
    fn test_kennitala_conversions() {
        let kt = Kennitala::try_from("5305750209").unwrap();
        let owned = Kennitala::try_from(String::from("530575-0209")).unwrap();
        assert_eq!(kt, owned);

        let s: String = kt.into();
        assert_eq!(s, "5305750209");

        assert_eq!(
            Kennitala::try_from("530575-0299"),
            Err(ValidationError::InvalidChecksum)
        );
    }

    #[test]
    fn test_kennitala_serde() {
        let kt = Kennitala::parse("530575-0209").unwrap();
        let json = serde_json::to_string(&kt).unwrap();
        assert_eq!(json, r#""5305750209""#);

        let parsed: Kennitala = serde_json::from_str(r#""530575-0209""#).unwrap();
        assert_eq!(parsed, kt);

        let err = serde_json::from_str::<Kennitala>(r#""530575-0299""#).unwrap_err();
        assert!(err.to_string().contains("check digit"));
    }

    proptest! {
        /// Compacting twice changes nothing.
        #[test]
        fn compact_is_idempotent(input in "[ 0-9a-zA-Z\t-]{0,20}") {
            let once = compact(&input);
            prop_assert_eq!(compact(&once), once);
        }

        /// Every eight-digit string has a check value in 0..=10.
        #[test]
        fn checksum_in_range(digits in "[0-9]{8}") {
            let value = checksum(&digits).unwrap();
            prop_assert!(value <= 10);
        }

        /// A check value of 10 can never be satisfied.
        #[test]
        fn checksum_ten_never_validates(
            digits in "[0-9]{8}".prop_filter("check value 10", |d| checksum(d) == Ok(10)),
            control in 0u8..10,
            marker in prop_oneof![Just(0u8), Just(9u8)],
        ) {
            let number = format!("{digits}{control}{marker}");
            prop_assert!(validate(&number).is_err());
        }

        /// `is_valid` agrees with `validate`, and accepted output is already compact.
        #[test]
        fn is_valid_matches_validate(input in "[0-9 -]{8,14}") {
            let result = validate(&input);
            prop_assert_eq!(is_valid(&input), result.is_ok());
            if let Ok(number) = result {
                prop_assert_eq!(compact(&number), number.clone());
                prop_assert_eq!(number.len(), KENNITALA_LENGTH);
            }
        }

        /// Any individual with a real date and the right check digit is accepted.
        #[test]
        fn generated_individuals_validate(
            day in 1u8..=28,
            month in 1u8..=12,
            year in 0u8..=99,
            random in 0u8..=99,
            marker in prop_oneof![Just(0u8), Just(9u8)],
        ) {
            let head = format!("{day:02}{month:02}{year:02}{random:02}");
            let check = checksum(&head).unwrap();
            prop_assume!(check < 10);
            let number = format!("{head}{check}{marker}");
            prop_assert_eq!(validate(&number), Ok(number.clone()));
        }
    }
}
