//! Fixed stopword table: Russian function words plus domain-generic catalog
//! nouns ("система", "устройство", ...) that carry no discriminating signal
//! between taxonomy branches.

use std::sync::OnceLock;

use ahash::AHashSet;

use crate::stem::stem;

/// Raw stopword list. Entries are stored here in surface form and stemmed at
/// set construction, because [`is_stop_word`] is consulted after stemming.
const STOP_WORDS: &[&str] = &[
    // function words
    "и", "в", "во", "не", "на", "с", "со", "по", "для", "из", "от", "до",
    "без", "под", "над", "при", "о", "об", "или", "а", "но", "же", "как",
    "так", "то", "у", "за", "к", "ко", "это", "все", "его", "ее", "их",
    "нет", "есть", "между", "через", "после", "перед", "около",
    // domain-generic nouns
    "система", "системы", "устройство", "оборудование", "изделие",
    "комплект", "деталь", "запчасть", "товар", "продукция", "наименование",
    "артикул", "прочее", "разное", "тип", "вид",
];

fn stop_word_set() -> &'static AHashSet<String> {
    static SET: OnceLock<AHashSet<String>> = OnceLock::new();
    SET.get_or_init(|| STOP_WORDS.iter().map(|w| stem(w)).collect())
}

/// Check whether a stemmed token belongs to the stopword table.
pub fn is_stop_word(token: &str) -> bool {
    stop_word_set().contains(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_words_are_stopped() {
        assert!(is_stop_word("для"));
        assert!(is_stop_word("или"));
        assert!(is_stop_word("это"));
    }

    #[test]
    fn test_domain_nouns_are_stopped_in_stem_form() {
        assert!(is_stop_word(&stem("система")));
        assert!(is_stop_word(&stem("устройство")));
        assert!(is_stop_word(&stem("оборудование")));
    }

    #[test]
    fn test_content_words_pass() {
        assert!(!is_stop_word("тормоз"));
        assert!(!is_stop_word("клапан"));
        assert!(!is_stop_word(&stem("пневматический")));
    }
}
