//! Remote dictionary lookups.
//!
//! The game needs two things from a dictionary service: a random word and
//! that word's definition. [`DictionaryClient`] is that contract;
//! [`WordnikClient`] implements it over HTTP against the Wordnik v4 API.
//! Clients return the raw payloads, and [`crate::word_source`] decides
//! whether they are usable.

use crate::debug_log;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.wordnik.com/v4";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const PREFERRED_DICTIONARIES: &str = "wiktionary,wordnet";
pub const MIN_CORPUS_COUNT: u32 = 5000;
pub const MIN_WORD_LENGTH: usize = 5;
pub const MAX_WORD_LENGTH: usize = 12;

/// Why a lookup produced nothing usable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("service returned status {0}")]
    Status(u16),
    #[error("malformed payload: {0}")]
    Malformed(String),
    #[error("response contained no word")]
    MissingWord,
    #[error("candidate '{0}' is not purely alphabetic")]
    InvalidWord(String),
    #[error("no usable definition for '{0}'")]
    NoDefinition(String),
}

/// Payload of the random-word operation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RandomWord {
    pub word: Option<String>,
}

/// One entry of the definitions operation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Definition {
    pub text: Option<String>,
}

pub trait DictionaryClient {
    fn random_word(&self) -> Result<RandomWord, LookupError>;
    fn definitions(&self, word: &str) -> Result<Vec<Definition>, LookupError>;
}

impl<T: DictionaryClient + ?Sized> DictionaryClient for &T {
    fn random_word(&self) -> Result<RandomWord, LookupError> {
        (**self).random_word()
    }

    fn definitions(&self, word: &str) -> Result<Vec<Definition>, LookupError> {
        (**self).definitions(word)
    }
}

#[derive(Debug, Clone)]
pub struct DictionaryConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

pub struct WordnikClient {
    agent: ureq::Agent,
    base_url: String,
    api_key: Option<String>,
}

impl WordnikClient {
    #[must_use]
    pub fn new(config: &DictionaryConfig) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();
        Self {
            agent,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn request(&self, path: &str) -> ureq::Request {
        let url = format!("{}{}", self.base_url, path);
        let request = self.agent.get(&url);
        match &self.api_key {
            Some(key) => request.query("api_key", key),
            None => request,
        }
    }

    /// `path` is what goes into logs and errors; the full URL carries the key.
    fn fetch_json<T: DeserializeOwned>(
        path: &str,
        request: ureq::Request,
    ) -> Result<T, LookupError> {
        debug_log!("GET {}", path);
        let response = request.call().map_err(|e| match e {
            ureq::Error::Status(code, _) => LookupError::Status(code),
            ureq::Error::Transport(t) => LookupError::Transport(format!("{} ({path})", t.kind())),
        })?;
        if response.status() != 200 {
            return Err(LookupError::Status(response.status()));
        }
        let body = response
            .into_string()
            .map_err(|e| LookupError::Transport(format!("{} ({path})", e.kind())))?;
        serde_json::from_str(&body).map_err(|e| LookupError::Malformed(e.to_string()))
    }
}

impl DictionaryClient for WordnikClient {
    fn random_word(&self) -> Result<RandomWord, LookupError> {
        let path = "/words.json/randomWord";
        let request = self
            .request(path)
            .query("hasDictionaryDef", "true")
            .query("minCorpusCount", &MIN_CORPUS_COUNT.to_string())
            .query("minLength", &MIN_WORD_LENGTH.to_string())
            .query("maxLength", &MAX_WORD_LENGTH.to_string());
        Self::fetch_json(path, request)
    }

    fn definitions(&self, word: &str) -> Result<Vec<Definition>, LookupError> {
        let path = format!("/word.json/{}/definitions", word.to_lowercase());
        let request = self
            .request(&path)
            .query("limit", "1")
            .query("includeRelated", "false")
            .query("sourceDictionaries", PREFERRED_DICTIONARIES)
            .query("useCanonical", "false");
        Self::fetch_json(&path, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    /// Serves one canned HTTP response and reports the request line it saw.
    fn serve_once(status_line: &str, body: &str) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            loop {
                let mut header = String::new();
                reader.read_line(&mut header).unwrap();
                if header == "\r\n" || header.is_empty() {
                    break;
                }
            }
            let mut stream = stream;
            stream.write_all(response.as_bytes()).unwrap();
            let _ = tx.send(request_line);
        });
        (format!("http://{addr}"), rx)
    }

    fn client_for(base_url: String, api_key: Option<&str>) -> WordnikClient {
        WordnikClient::new(&DictionaryConfig {
            base_url,
            api_key: api_key.map(str::to_string),
            timeout: Duration::from_secs(2),
        })
    }

    #[test]
    fn test_random_word_parses_payload() {
        let (base, rx) = serve_once("200 OK", r#"{"id": 1, "word": "lantern"}"#);
        let client = client_for(base, Some("secret"));
        let payload = client.random_word().unwrap();
        assert_eq!(payload.word.as_deref(), Some("lantern"));

        let request_line = rx.recv().unwrap();
        assert!(request_line.starts_with("GET /words.json/randomWord?"));
        assert!(request_line.contains("hasDictionaryDef=true"));
        assert!(request_line.contains("minCorpusCount=5000"));
        assert!(request_line.contains("minLength=5"));
        assert!(request_line.contains("maxLength=12"));
        assert!(request_line.contains("api_key=secret"));
    }

    #[test]
    fn test_random_word_without_word_field() {
        let (base, _rx) = serve_once("200 OK", r#"{"id": 1}"#);
        let client = client_for(base, None);
        assert!(client.random_word().unwrap().word.is_none());
    }

    #[test]
    fn test_definitions_request_shape() {
        let (base, rx) = serve_once("200 OK", r#"[{"text": "A portable lamp."}]"#);
        let client = client_for(base, None);
        let defs = client.definitions("LANTERN").unwrap();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].text.as_deref(), Some("A portable lamp."));

        let request_line = rx.recv().unwrap();
        assert!(request_line.starts_with("GET /word.json/lantern/definitions?"));
        assert!(request_line.contains("limit=1"));
        assert!(request_line.contains("includeRelated=false"));
        assert!(request_line.contains("sourceDictionaries=wiktionary%2Cwordnet"));
        assert!(request_line.contains("useCanonical=false"));
        assert!(!request_line.contains("api_key"));
    }

    #[test]
    fn test_error_status_is_reported() {
        let (base, _rx) = serve_once("401 Unauthorized", r#"{"message": "unauthorized"}"#);
        let client = client_for(base, None);
        assert_eq!(client.random_word().unwrap_err(), LookupError::Status(401));
    }

    #[test]
    fn test_non_200_success_status_is_rejected() {
        let (base, _rx) = serve_once("204 No Content", "");
        let client = client_for(base, None);
        assert_eq!(client.random_word().unwrap_err(), LookupError::Status(204));
    }

    #[test]
    fn test_malformed_json_is_reported() {
        let (base, _rx) = serve_once("200 OK", "<html>oops</html>");
        let client = client_for(base, None);
        assert!(matches!(
            client.definitions("owl"),
            Err(LookupError::Malformed(_))
        ));
    }

    #[test]
    fn test_connection_refused_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = client_for(format!("http://{addr}"), None);
        assert!(matches!(
            client.random_word(),
            Err(LookupError::Transport(_))
        ));
    }

    #[test]
    fn test_transport_errors_never_carry_the_api_key() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = client_for(format!("http://{addr}"), Some("SUPERSECRET"));

        for err in [
            client.random_word().unwrap_err(),
            client.definitions("owl").unwrap_err(),
        ] {
            let LookupError::Transport(message) = &err else {
                panic!("Expected Transport, got {err:?}");
            };
            assert!(!err.to_string().contains("SUPERSECRET"), "{err}");
            assert!(!message.contains("api_key"), "{message}");
            assert!(!message.contains('?'), "{message}");
        }
    }

    #[test]
    fn test_timeout_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            // Accept and hold the connection open without answering.
            let (stream, _) = listener.accept().unwrap();
            thread::sleep(Duration::from_millis(800));
            drop(stream);
        });
        let client = WordnikClient::new(&DictionaryConfig {
            base_url: format!("http://{addr}"),
            api_key: None,
            timeout: Duration::from_millis(200),
        });
        assert!(matches!(
            client.random_word(),
            Err(LookupError::Transport(_))
        ));
        handle.join().unwrap();
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = client_for("http://localhost:1/v4/".to_string(), None);
        assert_eq!(client.base_url, "http://localhost:1/v4");
    }
}
