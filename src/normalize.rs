//! File name normalization.
//!
//! Cyrillic letters of the Ukrainian alphabet are transliterated to ASCII and
//! every other non-word character is replaced with an underscore.
//!
//! # Examples
//!
//! ```
//! use clean_folder::normalize::normalize;
//!
//! assert_eq!(normalize("привіт.txt"), "pryvit.txt");
//! assert_eq!(normalize("Фото.JPG"), "Foto.JPG");
//! assert_eq!(normalize("my file (1).pdf"), "my_file__1_.pdf");
//! ```

use regex::Regex;
use std::sync::LazyLock;

// Combining marks are not word characters here, unlike in `\W`.
static NON_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\p{Alphabetic}\p{N}_]").expect("static pattern is valid")
});

const COMBINING_BREVE: char = '\u{0306}';
const COMBINING_DIAERESIS: char = '\u{0308}';

/// Composes the decomposed forms of `й` and `ї` some filesystems hand back.
fn compose(base: char, mark: char) -> Option<char> {
    match (base, mark) {
        ('и', COMBINING_BREVE) => Some('й'),
        ('И', COMBINING_BREVE) => Some('Й'),
        ('і', COMBINING_DIAERESIS) => Some('ї'),
        ('І', COMBINING_DIAERESIS) => Some('Ї'),
        _ => None,
    }
}

/// Returns the ASCII replacement for a lowercase Ukrainian letter.
fn transliterate_lower(c: char) -> Option<&'static str> {
    let ascii = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'є' => "je",
        'ж' => "zh",
        'з' => "z",
        'и' => "y",
        'і' => "i",
        'ї' => "ji",
        'й' => "j",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ь' => "",
        'ю' => "ju",
        'я' => "ja",
        _ => return None,
    };
    Some(ascii)
}

/// Transliterates the Ukrainian letters of `text`, preserving case.
///
/// Characters outside the table are copied unchanged.
pub fn transliterate(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(mut c) = chars.next() {
        if let Some(composed) = chars.peek().and_then(|&mark| compose(c, mark)) {
            chars.next();
            c = composed;
        }
        let lower = c.to_lowercase().next().unwrap_or(c);
        match transliterate_lower(lower) {
            Some(ascii) if c != lower => out.push_str(&ascii.to_ascii_uppercase()),
            Some(ascii) => out.push_str(ascii),
            None => out.push(c),
        }
    }
    out
}

/// Normalizes a bare name with no extension handling.
pub fn normalize_stem(stem: &str) -> String {
    NON_WORD
        .replace_all(&transliterate(stem), "_")
        .into_owned()
}

/// Normalizes a file name.
///
/// Everything before the first `.` is the base name and is transliterated and
/// sanitized; the rest is appended back unchanged after a dot.
pub fn normalize(name: &str) -> String {
    match name.split_once('.') {
        Some((base, extension)) => format!("{}.{}", normalize_stem(base), extension),
        None => normalize_stem(name),
    }
}
