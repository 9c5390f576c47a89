//! Synthetic fallback transcripts.
//!
//! When the provider is unreachable or returns an unusable response the
//! adapter substitutes one of these canned transcripts instead of failing
//! the pipeline. The corpus is keyed by language hint so the downstream
//! summarizer still sees plausible input.

use rand::Rng;

use super::Language;

/// Provider tag recorded on fallback transcripts.
pub const PROVIDER: &str = "fallback";

const ENGLISH: &[&str] = &[
    "Good morning everyone, thanks for joining today's meeting. Let's start by reviewing our progress from last week. Sarah, could you give us an update on the user authentication feature?",
    "Welcome to our weekly planning session. Today we need to discuss our Q4 roadmap and prioritize the upcoming features.",
    "Hi team, this is our client check-in call. The client has expressed satisfaction with our current progress and they're particularly happy with the new dashboard features.",
    "Thanks everyone for joining this brainstorming session. We need to come up with creative solutions for improving user engagement on our platform.",
];

const HINGLISH: &[&str] = &[
    "Aaj ka meeting start karte hain. Sabko dhanyawad for joining. Pehle hum last week ka progress review karenge. Sarah, kya aap authentication feature ke baare mein update de sakti hain?",
    "Namaskar everyone, weekly planning session mein aapka swagat hai. Aaj hum Q4 roadmap discuss karenge aur upcoming features ko prioritize karenge. Mobile app development hamare liye sabse important hai.",
    "Hello team, yeh hamare client ke saath check-in call hai. Client bahut khush hai current progress se aur dashboard features se particularly impressed hain. Unke paas next phase ke liye kuch additional requirements hain.",
    "Thanks sabko joining ke liye. Humein user engagement improve karne ke liye creative solutions chahiye. Current metrics dekh kar lagta hai ki improvement ki scope hai. Innovative approaches explore karte hain.",
];

/// Pick a canned transcript for the given language hint.
pub fn pick(language: Language) -> String {
    let corpus = match language {
        Language::English => ENGLISH,
        Language::Hinglish => HINGLISH,
    };

    let index = rand::rng().random_range(0..corpus.len());
    corpus[index].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_returns_corpus_member() {
        let text = pick(Language::English);
        assert!(ENGLISH.contains(&text.as_str()));

        let text = pick(Language::Hinglish);
        assert!(HINGLISH.contains(&text.as_str()));
    }

    #[test]
    fn test_corpus_is_latin_script() {
        for text in ENGLISH.iter().chain(HINGLISH.iter()) {
            assert!(text.is_ascii(), "non-Latin fallback transcript: {text}");
        }
    }
}
