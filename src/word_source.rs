use crate::dictionary::{Definition, DictionaryClient, LookupError, RandomWord};
use crate::info_log;
use crate::wordbank::{FallbackTable, SecretWord, is_alphabetic};
use log::warn;
use rand::Rng;

/// Produces the secret word for each round.
///
/// A live lookup is attempted first when a client is configured. Any failure
/// falls back to the offline table, so [`WordSource::acquire`] always
/// returns a playable word.
pub struct WordSource<C> {
    client: Option<C>,
    fallback: FallbackTable,
}

impl<C: DictionaryClient> WordSource<C> {
    pub fn new(client: C, fallback: FallbackTable) -> Self {
        Self {
            client: Some(client),
            fallback,
        }
    }

    /// A source that never contacts the dictionary service.
    pub fn offline(fallback: FallbackTable) -> Self {
        Self {
            client: None,
            fallback,
        }
    }

    #[must_use]
    pub fn is_offline(&self) -> bool {
        self.client.is_none()
    }

    pub fn acquire(&self) -> SecretWord {
        self.acquire_with_rng(&mut rand::thread_rng())
    }

    pub fn acquire_with_rng<R: Rng>(&self, rng: &mut R) -> SecretWord {
        let Some(client) = &self.client else {
            return self.fallback.choose(rng);
        };
        match fetch_remote(client) {
            Ok(word) => {
                info_log!("Fetched '{}' from dictionary service", word.text());
                word
            }
            Err(reason) => {
                warn!("Dictionary lookup failed ({reason}); using a fallback word");
                self.fallback.choose(rng)
            }
        }
    }
}

fn fetch_remote<C: DictionaryClient>(client: &C) -> Result<SecretWord, LookupError> {
    let candidate = candidate_from(client.random_word()?)?;
    let definition = definition_from(&candidate, client.definitions(&candidate)?)?;
    SecretWord::new(&candidate, &definition).map_err(|_| LookupError::InvalidWord(candidate))
}

fn candidate_from(payload: RandomWord) -> Result<String, LookupError> {
    let word = payload.word.ok_or(LookupError::MissingWord)?;
    if word.is_empty() {
        return Err(LookupError::MissingWord);
    }
    if !is_alphabetic(&word) {
        return Err(LookupError::InvalidWord(word));
    }
    Ok(word)
}

fn definition_from(word: &str, definitions: Vec<Definition>) -> Result<String, LookupError> {
    definitions
        .into_iter()
        .next()
        .and_then(|d| d.text)
        .map(|text| clean_definition(&text))
        .filter(|text| !text.is_empty())
        .ok_or_else(|| LookupError::NoDefinition(word.to_string()))
}

/// Removes `<...>` tags, trims, and capitalizes the first character.
#[must_use]
pub fn clean_definition(raw: &str) -> String {
    let stripped = strip_markup(raw);
    let trimmed = stripped.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Deletes every run matching `<[^>]+>`.
fn strip_markup(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(open) = rest.find('<') {
        let after = &rest[open + 1..];
        match after.find('>') {
            Some(close) if close > 0 => {
                out.push_str(&rest[..open]);
                rest = &after[close + 1..];
            }
            _ => {
                out.push_str(&rest[..=open]);
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::cell::Cell;

    struct StubClient {
        word: Result<RandomWord, LookupError>,
        definitions: Result<Vec<Definition>, LookupError>,
        definition_calls: Cell<usize>,
    }

    impl StubClient {
        fn new(
            word: Result<RandomWord, LookupError>,
            definitions: Result<Vec<Definition>, LookupError>,
        ) -> Self {
            Self {
                word,
                definitions,
                definition_calls: Cell::new(0),
            }
        }

        fn answering(word: &str, definition: &str) -> Self {
            Self::new(
                Ok(RandomWord {
                    word: Some(word.to_string()),
                }),
                Ok(vec![Definition {
                    text: Some(definition.to_string()),
                }]),
            )
        }
    }

    impl DictionaryClient for StubClient {
        fn random_word(&self) -> Result<RandomWord, LookupError> {
            self.word.clone()
        }

        fn definitions(&self, _word: &str) -> Result<Vec<Definition>, LookupError> {
            self.definition_calls.set(self.definition_calls.get() + 1);
            self.definitions.clone()
        }
    }

    fn table() -> FallbackTable {
        FallbackTable::embedded().unwrap()
    }

    fn assert_from_fallback(word: &SecretWord) {
        assert!(table().entries().contains(word), "{word:?} is not a fallback entry");
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    #[test]
    fn test_remote_word_is_used_when_both_lookups_succeed() {
        let source = WordSource::new(
            StubClient::answering("lantern", "<i>a</i> portable lamp. "),
            table(),
        );
        let word = source.acquire_with_rng(&mut rng());
        assert_eq!(word.text(), "LANTERN");
        assert_eq!(word.definition(), "A portable lamp.");
    }

    #[test]
    fn test_transport_failure_falls_back() {
        let source = WordSource::new(
            StubClient::new(Err(LookupError::Transport("timed out".into())), Ok(vec![])),
            table(),
        );
        let client_calls = source.client.as_ref().unwrap();
        assert_from_fallback(&source.acquire_with_rng(&mut rng()));
        assert_eq!(client_calls.definition_calls.get(), 0);
    }

    #[test]
    fn test_missing_word_field_falls_back() {
        let source = WordSource::new(
            StubClient::new(Ok(RandomWord { word: None }), Ok(vec![])),
            table(),
        );
        assert_from_fallback(&source.acquire_with_rng(&mut rng()));
    }

    #[test]
    fn test_empty_word_falls_back() {
        let source = WordSource::new(StubClient::answering("", "anything"), table());
        assert_from_fallback(&source.acquire_with_rng(&mut rng()));
    }

    #[test]
    fn test_non_alphabetic_candidate_falls_back() {
        for word in ["ice-cream", "o'clock", "abc123", "two words"] {
            let source = WordSource::new(StubClient::answering(word, "a thing"), table());
            assert_from_fallback(&source.acquire_with_rng(&mut rng()));
        }
    }

    #[test]
    fn test_definition_failures_fall_back() {
        let failures: Vec<Result<Vec<Definition>, LookupError>> = vec![
            Err(LookupError::Status(404)),
            Err(LookupError::Malformed("bad json".into())),
            Ok(vec![]),
            Ok(vec![Definition { text: None }]),
            Ok(vec![Definition {
                text: Some("  <xref></xref>  ".into()),
            }]),
        ];
        for definitions in failures {
            let source = WordSource::new(
                StubClient::new(
                    Ok(RandomWord {
                        word: Some("lantern".into()),
                    }),
                    definitions,
                ),
                table(),
            );
            let word = source.acquire_with_rng(&mut rng());
            assert_from_fallback(&word);
            assert_eq!(source.client.as_ref().unwrap().definition_calls.get(), 1);
        }
    }

    #[test]
    fn test_only_first_definition_is_used() {
        let source = WordSource::new(
            StubClient::new(
                Ok(RandomWord {
                    word: Some("Owl".into()),
                }),
                Ok(vec![
                    Definition {
                        text: Some("first".into()),
                    },
                    Definition {
                        text: Some("second".into()),
                    },
                ]),
            ),
            table(),
        );
        let word = source.acquire_with_rng(&mut rng());
        assert_eq!(word.text(), "OWL");
        assert_eq!(word.definition(), "First");
    }

    #[test]
    fn test_offline_source_never_calls_client() {
        let source: WordSource<StubClient> = WordSource::offline(table());
        assert!(source.is_offline());
        assert_from_fallback(&source.acquire());
    }

    #[test]
    fn test_acquire_always_yields_playable_word() {
        let source = WordSource::new(
            StubClient::new(Err(LookupError::Status(500)), Err(LookupError::Status(500))),
            table(),
        );
        let mut rng = rng();
        for _ in 0..100 {
            let word = source.acquire_with_rng(&mut rng);
            assert!(!word.text().is_empty());
            assert!(word.text().chars().all(|c| c.is_ascii_uppercase()));
            assert!(!word.definition().is_empty());
        }
    }

    #[test]
    fn test_clean_definition() {
        assert_eq!(clean_definition("  a bird.  "), "A bird.");
        assert_eq!(
            clean_definition("<xref>See</xref> <em>also</em> owl"),
            "See also owl"
        );
        assert_eq!(clean_definition("<b></b>"), "");
        assert_eq!(clean_definition("ünder"), "Ünder");
        assert_eq!(clean_definition(""), "");
    }

    #[test]
    fn test_strip_markup_leaves_unmatched_brackets() {
        assert_eq!(strip_markup("a <> b"), "a <> b");
        assert_eq!(strip_markup("x < y"), "x < y");
        assert_eq!(strip_markup("1 < 2 and 3 > 2"), "1  2");
        assert_eq!(strip_markup("<a<b>c"), "c");
    }
}
