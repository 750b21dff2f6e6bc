//! Category label lookup.
//!
//! The category taxonomy itself is maintained externally; this table only
//! maps the fixed category codes to display labels per language so slugs
//! can be built with all segments in the task's source language.

/// `(code, bulgarian label, english label)` per category.
const CATEGORY_LABELS: &[(&str, &str, &str)] = &[
    ("plumbing", "водопровод", "plumbing"),
    ("electrical", "електро", "electrical"),
    ("cleaning", "почистване", "cleaning"),
    ("painting", "боядисване", "painting"),
    ("renovation", "ремонт", "renovation"),
    ("moving", "преместване", "moving"),
    ("gardening", "градинарство", "gardening"),
    ("appliance_repair", "ремонт-на-уреди", "appliance repair"),
    ("carpentry", "дърводелство", "carpentry"),
    ("handyman", "майстор", "handyman"),
];

/// Resolve the display label for a category code in the given language.
///
/// Returns `None` for unknown codes; callers fall back to the raw code.
pub fn category_label(code: &str, language: &str) -> Option<&'static str> {
    CATEGORY_LABELS
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|(_, bg, en)| if language == "bg" { *bg } else { *en })
}
