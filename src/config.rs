//! Application-level configuration constants.

use letter_carousel::storage::LetterSet;
use once_cell::sync::Lazy;

// Carousel slot layout: the fixed slides come before the letter slides.
pub const SETTINGS_SLOT: usize = 0;
pub const START_SLOT: usize = 1;
pub const LETTER_START_SLOT: usize = 2;

/// Canonical letter schema in display order (Norwegian alphabet).
pub const LETTERS: [&str; 29] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S",
    "T", "U", "V", "W", "X", "Y", "Z", "Æ", "Ø", "Å",
];

/// Default settings: every letter enabled.
pub static DEFAULT_LETTERS: Lazy<LetterSet> = Lazy::new(|| {
    LETTERS
        .iter()
        .map(|letter| (letter.to_string(), true))
        .collect()
});

// Settings form layout
pub const LETTERS_PER_COLUMN: usize = 10;
