use super::tables::{LOWERCASE_WORDS, WORD_REPLACEMENT};

/// Turn a game identifier such as `pc_ai_tb` into a label such as `AI Tile Blocker`.
///
/// Segments equal to `remove_prefix` are dropped before capitalization, so the prefix must be
/// given in the identifier's own casing. With the default empty prefix, empty segments
/// (from doubled underscores) are dropped.
pub fn to_label(identifier: &str, remove_prefix: &str) -> String {
    identifier
        .split('_')
        .filter(|word| *word != remove_prefix)
        .map(|word| {
            if LOWERCASE_WORDS.contains(&word) {
                word.to_string()
            } else {
                capitalize(word)
            }
        })
        .map(replace_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn replace_word(word: String) -> String {
    WORD_REPLACEMENT
        .iter()
        .find(|(from, _)| *from == word)
        .map(|(_, to)| to.to_string())
        .unwrap_or(word)
}
