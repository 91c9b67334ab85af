//! Naive sentence segmentation.
//!
//! Splits on runs of `.`, `?` and `!` followed by whitespace or the end of the
//! text. There is no abbreviation or quotation handling, so "z. B." splits.

use regex::Regex;
use std::sync::LazyLock;

static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.?!]+(?:\s+|$)").expect("sentence pattern is valid"));

/// Split text into trimmed, non-empty sentences with their terminators removed.
pub fn split_sentences(text: &str) -> Vec<String> {
    SENTENCE_END
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Sentences of several texts, segmented one after the other.
pub fn split_all<'a, I>(texts: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    texts.into_iter().flat_map(split_sentences).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_basic() {
        assert_eq!(
            split_sentences("Der Hund bellt. Die Katze schläft? Ja! Gut."),
            ["Der Hund bellt", "Die Katze schläft", "Ja", "Gut"]
        );
    }

    #[test]
    fn test_split_terminator_runs() {
        assert_eq!(split_sentences("Wirklich?! Ja... Echt!!!"), ["Wirklich", "Ja", "Echt"]);
    }

    #[test]
    fn test_trailing_terminator_yields_no_empty_sentence() {
        assert_eq!(split_sentences("Hallo Welt."), ["Hallo Welt"]);
        assert_eq!(split_sentences("Hallo Welt.   "), ["Hallo Welt"]);
    }

    #[test]
    fn test_no_split_inside_numbers_or_urls() {
        assert_eq!(split_sentences("Es kostet 3.50 Euro bei klexikon.zum.de heute."), [
            "Es kostet 3.50 Euro bei klexikon.zum.de heute"
        ]);
    }

    #[test]
    fn test_abbreviations_split_naively() {
        assert_eq!(split_sentences("Tiere, z. B. Hunde."), ["Tiere, z", "B", "Hunde"]);
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("  \n ").is_empty());
        assert!(split_sentences("...").is_empty());
    }

    #[test]
    fn test_text_without_terminator() {
        assert_eq!(split_sentences("Kapitel Eins"), ["Kapitel Eins"]);
    }

    #[test]
    fn test_resegmenting_rejoined_sentences_is_stable() {
        let text = "Bären leben im Wald. Sind sie gefährlich? Manchmal! Meistens nicht.";
        let first = split_sentences(text);

        let terminators = [".", "?", "!", "."];
        let rejoined = first
            .iter()
            .zip(terminators)
            .map(|(sentence, end)| format!("{sentence}{end}"))
            .collect::<Vec<_>>()
            .join(" ");

        assert_eq!(split_sentences(&rejoined), first);

        let rejoined_plain = first.iter().map(|s| format!("{s}.")).collect::<Vec<_>>().join(" ");
        assert_eq!(split_sentences(&rejoined_plain), first);
    }

    #[test]
    fn test_split_all_keeps_block_order() {
        let sentences = split_all(["Erster Satz. Zweiter Satz.", "Überschrift", "Dritter Satz!"]);
        assert_eq!(sentences, ["Erster Satz", "Zweiter Satz", "Überschrift", "Dritter Satz"]);
    }
}
