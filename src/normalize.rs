//! Text cleanup that turns a raw phrase into word tokens

use std::fmt::Display;
use std::sync::LazyLock;

use log::error;
use regex::Regex;

// Applied in order: contractions are expanded before the bare apostrophe is
// removed, and whitespace is collapsed last.
const RULES: [(&str, &str); 27] = [
    // `+-=` is a range, it keeps `+ , - . / 0-9 : ; < =`
    (r"[^A-Za-z0-9\^,!./'+-=]", " "),
    (r"what's", "what is "),
    (r"'s", " "),
    (r"'ve", " have "),
    (r"can't", "cannot "),
    (r"n't", " not "),
    (r"i'm", "i am "),
    (r"'re", " are "),
    (r"'d", " would "),
    (r"'ll", " will "),
    (r",", " "),
    (r"\.", " "),
    (r"!", " ! "),
    (r"/", " "),
    (r"\^", " ^ "),
    (r"\+", " + "),
    (r"-", " - "),
    (r"=", " = "),
    (r"'", " "),
    (r"(\d+)k", "${1}000"),
    (r":", " : "),
    (r" e g ", " eg "),
    (r" b g ", " bg "),
    (r" u s ", " american "),
    (r" 9 11 ", "911"),
    (r"e - mail", "email"),
    (r"j k", "jk"),
];

static COMPILED: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    RULES
        .iter()
        .filter_map(|(pattern, replacement)| match Regex::new(pattern) {
            Ok(re) => Some((re, *replacement)),
            Err(e) => {
                error!("rewrite rule {:?} does not compile: {}", pattern, e);
                None
            }
        })
        .collect()
});

static WHITESPACE: LazyLock<Option<Regex>> = LazyLock::new(|| match Regex::new(r"\s{2,}") {
    Ok(re) => Some(re),
    Err(e) => {
        error!("whitespace rule does not compile: {}", e);
        None
    }
});

/// Lowercase, clean and split a phrase into words.
///
/// Empty or whitespace-only input gives an empty vector.
pub fn text_to_word_list(text: &str) -> Vec<String> {
    let mut text = text.to_lowercase();
    for (re, replacement) in COMPILED.iter() {
        text = re.replace_all(&text, *replacement).into_owned();
    }
    if let Some(ws) = WHITESPACE.as_ref() {
        text = ws.replace_all(&text, " ").into_owned();
    }
    text.split_whitespace().map(String::from).collect()
}

/// Same as [`text_to_word_list`] for values that are not strings yet.
pub fn text_to_word_list_from<T: Display + ?Sized>(value: &T) -> Vec<String> {
    text_to_word_list(&value.to_string())
}

// Tests
//-------------------------------------------------------------------------------
#[cfg(test)]
mod tests {

    use super::*;

    fn words(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| String::from(*s)).collect()
    }

    #[test]
    fn all_rules_compile() {
        assert_eq!(COMPILED.len(), RULES.len());
        assert!(WHITESPACE.is_some());
    }

    #[test]
    fn contraction_and_question_mark() {
        assert_eq!(text_to_word_list("What's up?"), words(&["what", "is", "up"]));
    }

    #[test]
    fn empty_and_blank_input() {
        assert!(text_to_word_list("").is_empty());
        assert!(text_to_word_list("   \t\n ").is_empty());
        assert!(text_to_word_list("???").is_empty());
    }

    #[test]
    fn expands_contractions() {
        assert_eq!(
            text_to_word_list("I can't believe they've gone, I'm sure we'll see they'd left"),
            words(&[
                "i", "cannot", "believe", "they", "have", "gone", "i", "am", "sure", "we", "will",
                "see", "they", "would", "left"
            ])
        );
        assert_eq!(text_to_word_list("Don't you're"), words(&["do", "not", "you", "are"]));
    }

    #[test]
    fn possessive_is_dropped() {
        assert_eq!(text_to_word_list("John's car"), words(&["john", "car"]));
    }

    #[test]
    fn isolates_operators() {
        assert_eq!(text_to_word_list("2+2=4!"), words(&["2", "+", "2", "=", "4", "!"]));
        assert_eq!(text_to_word_list("x^2"), words(&["x", "^", "2"]));
        assert_eq!(text_to_word_list("ratio 3:1"), words(&["ratio", "3", ":", "1"]));
    }

    #[test]
    fn thousands_suffix() {
        assert_eq!(text_to_word_list("earn 50k a year"), words(&["earn", "50000", "a", "year"]));
    }

    #[test]
    fn abbreviations() {
        assert_eq!(text_to_word_list("fruit, e.g. apples"), words(&["fruit", "eg", "apples"]));
        assert_eq!(text_to_word_list("live in the U.S. now"), words(&["live", "in", "the", "american", "now"]));
        assert_eq!(text_to_word_list("my e-mail address"), words(&["my", "email", "address"]));
        assert_eq!(text_to_word_list("j k"), words(&["jk"]));
    }

    #[test]
    fn slashes_and_periods_split_words() {
        assert_eq!(text_to_word_list("and/or end."), words(&["and", "or", "end"]));
    }

    #[test]
    fn idempotent_on_normalized_text() {
        let samples = [
            "What's the best way to learn Rust in 2024?",
            "How do I earn 10k/month: tips & tricks!",
            "Is it true that 1+1=2 in the U.S.?",
            "Why can't I sleep at night",
        ];
        for sample in samples {
            let once = text_to_word_list(sample);
            let twice = text_to_word_list(&once.join(" "));
            assert_eq!(once, twice, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn non_string_values() {
        assert_eq!(text_to_word_list_from(&42), words(&["42"]));
        assert_eq!(text_to_word_list_from(&3.5), words(&["3", "5"]));
    }
}
