/// Length of the compact form
pub const KENNITALA_LENGTH: usize = 10;

/// Number of leading digits covered by the checksum
pub const CHECKSUM_INPUT_LENGTH: usize = 8;

/// Checksum weights applied positionally to the first eight digits
pub const CHECKSUM_WEIGHTS: [u32; CHECKSUM_INPUT_LENGTH] = [3, 2, 7, 6, 5, 4, 3, 2];

/// Modulus of the checksum
pub const CHECKSUM_MODULUS: u32 = 11;

/// Separator stripped by `compact` and inserted by `Kennitala::hyphenated`
pub const SEPARATOR: char = '-';

// Positions within the compact form
pub(crate) const DAY_POS: usize = 0;
pub(crate) const MONTH_POS: usize = 2;
pub(crate) const YEAR_POS: usize = 4;
pub(crate) const RANDOM_POS: usize = 6;
pub(crate) const CONTROL_POS: usize = 8;
pub(crate) const CENTURY_POS: usize = 9;

/// Digits before the dash in the hyphenated presentation form
pub(crate) const HYPHEN_POS: usize = 6;

/// Highest accepted tens digit of the day field
pub(crate) const MAX_DAY_TENS: u8 = 7;
/// Highest accepted tens digit of the month field
pub(crate) const MAX_MONTH_TENS: u8 = 1;

/// Added to the day-of-month for organisations
pub const ORGANISATION_DAY_OFFSET: u8 = 40;

/// Century marker for years 1900-1999
pub const CENTURY_MARKER_1900: u8 = 9;
/// Century marker for years 2000-2099
pub const CENTURY_MARKER_2000: u8 = 0;

pub(crate) const CENTURY_BASE_1900: u16 = 1900;
pub(crate) const CENTURY_BASE_2000: u16 = 2000;

/// Earliest year a kennitala can encode
pub const MIN_YEAR: u16 = CENTURY_BASE_1900;
/// Latest year a kennitala can encode
pub const MAX_YEAR: u16 = CENTURY_BASE_2000 + 99;

/// Maximum valid month (December)
pub const MAX_MONTH: u8 = 12;

/// Month number for February
pub const FEBRUARY: u8 = 2;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Maximum days in each month (index 0 is unused, months are 1-indexed)
/// February shows 28 days (non-leap year default)
pub const DAYS_IN_MONTH: [u8; 13] = [
    0,  // index 0 unused (months are 1-indexed)
    31, // January
    28, // February (non-leap, adjusted by is_leap_year check)
    31, // March
    30, // April
    31, // May
    30, // June
    31, // July
    31, // August
    30, // September
    31, // October
    30, // November
    31, // December
];

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: u16 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: u16 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: u16 = 400;
