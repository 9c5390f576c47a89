//! Devanagari to Latin transliteration for code-mixed transcripts.
//!
//! The upstream provider has no Hinglish model, so code-mixed audio is
//! transcribed with the Hindi model and the Devanagari output is mapped
//! back to the Latin spelling speakers actually use. Two passes: a
//! whole-word dictionary for common words, then a character-level phonetic
//! map over whatever Devanagari remains. The word pass must run first —
//! running the character map first destroys the word boundaries the
//! dictionary keys on.

/// Common Hindi words with their conventional Latin spellings.
const WORDS: &[(&str, &str)] = &[
    ("मैं", "main"),
    ("आज", "aaj"),
    ("कल", "kal"),
    ("अभी", "abhi"),
    ("क्या", "kya"),
    ("कैसे", "kaise"),
    ("कहाँ", "kahan"),
    ("कब", "kab"),
    ("कौन", "kaun"),
    ("कितना", "kitna"),
    ("यह", "yeh"),
    ("वह", "voh"),
    ("हाँ", "haan"),
    ("नहीं", "nahin"),
    ("और", "aur"),
    ("या", "ya"),
    ("भी", "bhi"),
    ("के", "ke"),
    ("का", "ka"),
    ("की", "ki"),
    ("को", "ko"),
    ("से", "se"),
    ("में", "mein"),
    ("पर", "par"),
    ("गया", "gaya"),
    ("आया", "aaya"),
    ("किया", "kiya"),
    ("होगा", "hoga"),
    ("था", "tha"),
    ("है", "hai"),
    ("हैं", "hain"),
    ("थे", "the"),
    ("बहुत", "bahut"),
    ("अच्छा", "accha"),
    ("बुरा", "bura"),
    ("छोटा", "chota"),
    ("बड़ा", "bada"),
    ("अच्छी", "acchi"),
    ("ठीक", "theek"),
    ("सही", "sahi"),
    ("गलत", "galat"),
    ("काम", "kaam"),
    ("घर", "ghar"),
    ("ऑफिस", "office"),
    ("मीटिंग", "meeting"),
    ("टाइम", "time"),
    ("बात", "baat"),
    ("चलो", "chalo"),
    ("जाना", "jaana"),
    ("आना", "aana"),
    ("देखना", "dekhna"),
    ("सुनना", "sunna"),
    ("कहना", "kahna"),
    ("भाई", "bhai"),
    ("यार", "yaar"),
    ("दोस्त", "dost"),
];

/// Phonetic fallback for characters the dictionary did not cover.
const CHARS: &[(&str, &str)] = &[
    ("अ", "a"),
    ("आ", "aa"),
    ("इ", "i"),
    ("ई", "ee"),
    ("उ", "u"),
    ("ऊ", "oo"),
    ("ए", "e"),
    ("ऐ", "ai"),
    ("ओ", "o"),
    ("औ", "au"),
    ("क", "k"),
    ("ख", "kh"),
    ("ग", "g"),
    ("घ", "gh"),
    ("च", "ch"),
    ("छ", "chh"),
    ("ज", "j"),
    ("झ", "jh"),
    ("ट", "t"),
    ("ठ", "th"),
    ("ड", "d"),
    ("ढ", "dh"),
    ("ण", "n"),
    ("त", "t"),
    ("थ", "th"),
    ("द", "d"),
    ("ध", "dh"),
    ("न", "n"),
    ("प", "p"),
    ("फ", "ph"),
    ("ब", "b"),
    ("भ", "bh"),
    ("म", "m"),
    ("य", "y"),
    ("र", "r"),
    ("ल", "l"),
    ("व", "v"),
    ("श", "sh"),
    ("ष", "sh"),
    ("स", "s"),
    ("ह", "h"),
    ("ा", "aa"),
    ("ि", "i"),
    ("ी", "ee"),
    ("ु", "u"),
    ("ू", "oo"),
    ("े", "e"),
    ("ै", "ai"),
    ("ो", "o"),
    ("ौ", "au"),
    ("ं", "n"),
    ("ँ", "n"),
    ("्", ""),
];

/// Transliterate any Devanagari in `text` to a Latin approximation.
/// Latin text passes through untouched.
pub fn to_latin(text: &str) -> String {
    let mut out = text.to_string();

    for (hindi, roman) in WORDS {
        if out.contains(hindi) {
            out = out.replace(hindi, roman);
        }
    }

    for (devanagari, roman) in CHARS {
        if out.contains(devanagari) {
            out = out.replace(devanagari, roman);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_devanagari(s: &str) -> bool {
        s.chars().any(|c| ('\u{0900}'..='\u{097F}').contains(&c))
    }

    #[test]
    fn test_dictionary_words() {
        assert_eq!(to_latin("हाँ"), "haan");
        assert_eq!(to_latin("नहीं"), "nahin");
        assert_eq!(to_latin("मीटिंग"), "meeting");
    }

    #[test]
    fn test_word_pass_beats_character_pass() {
        // The character map alone would render मैं as "main" minus the
        // nasalization detail; the dictionary spelling must win.
        assert_eq!(to_latin("मैं"), "main");
        assert_eq!(to_latin("क्या"), "kya");
    }

    #[test]
    fn test_mixed_sentence() {
        let out = to_latin("हाँ, the deadline कल hai");
        assert_eq!(out, "haan, the deadline kal hai");
    }

    #[test]
    fn test_no_residual_devanagari_for_covered_words() {
        for (hindi, _) in WORDS {
            assert!(
                !has_devanagari(&to_latin(hindi)),
                "residual Devanagari for {hindi}"
            );
        }
    }

    #[test]
    fn test_character_fallback_for_unknown_words() {
        // "नमस्ते" is not in the dictionary; the character pass still
        // produces pure Latin output.
        let out = to_latin("नमस्ते");
        assert!(!has_devanagari(&out));
        assert!(!out.is_empty());
    }

    #[test]
    fn test_latin_passthrough() {
        let input = "Let's review the Q4 roadmap.";
        assert_eq!(to_latin(input), input);
    }
}
