//! URL-safe slug generation for task listings.
//!
//! Slugs are composed from title + city + the category label in the task's
//! source language, so all segments share one language. Cyrillic input is
//! transliterated using the Bulgarian streamlined system. Uniqueness
//! (numeric disambiguation, insert retry) is handled by the repository; this
//! module is pure string work.

/// Maximum slug length in bytes (slugs are ASCII after transliteration).
pub const MAX_SLUG_LEN: usize = 80;

/// Transliterate a single Cyrillic letter (lowercase) into Latin per the
/// Bulgarian streamlined system. Non-Cyrillic characters pass through.
fn transliterate(c: char) -> &'static str {
    match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "y",
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
        'щ' => "sht",
        'ъ' => "a",
        'ь' => "y",
        'ю' => "yu",
        'я' => "ya",
        _ => "",
    }
}

/// Lowercase, transliterate, and reduce a string to `[a-z0-9-]` with single
/// hyphens and no leading/trailing hyphen.
pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else if ('а'..='я').contains(&c) {
            out.push_str(transliterate(c));
        } else if !out.ends_with('-') && !out.is_empty() {
            out.push('-');
        }
    }
    out.trim_end_matches('-').to_string()
}

/// Compose the base slug from title, city, and the category label, truncated
/// to [`MAX_SLUG_LEN`] without a dangling hyphen.
pub fn base_slug(title: &str, city: &str, category_label: &str) -> String {
    let mut slug = [title, city, category_label]
        .iter()
        .map(|part| slugify(part))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if slug.len() > MAX_SLUG_LEN {
        slug.truncate(MAX_SLUG_LEN);
        slug = slug.trim_end_matches('-').to_string();
    }
    if slug.is_empty() {
        // A slug must never be empty; the repository appends a disambiguator
        // when needed, so a stable stem is enough.
        slug = "task".to_string();
    }
    slug
}

/// Append a numeric disambiguator to a base slug.
pub fn numbered(base: &str, n: i64) -> String {
    format!("{base}-{n}")
}
