use super::{
    normalize::normalize_phrase, Language, LocalPhrases, PhraseError, PhraseRequest, PhraseSource,
    Ticket,
};
use serde::Deserialize;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

/// Phrases longer than this are not pleasant to type in one go
const MAX_REMOTE_CHARS: usize = 220;

/// Answer to a pending phrase request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseDelivery {
    pub ticket: Ticket,
    pub language: Language,
    pub phrase: String,
    /// True when the remote fetch failed and a bundled phrase was used instead
    pub fallback: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum QuoteBody {
    Content { content: String },
    Citation { citation: Citation },
    List(Vec<QuoteBody>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Citation {
    Nested { citation: String },
    Text(String),
}

impl QuoteBody {
    fn into_text(self) -> Option<String> {
        match self {
            QuoteBody::Content { content } => Some(content),
            QuoteBody::Citation {
                citation: Citation::Nested { citation } | Citation::Text(citation),
            } => Some(citation),
            QuoteBody::List(items) => items.into_iter().find_map(QuoteBody::into_text),
        }
    }
}

/// Pull the quote text out of a response body from either quote service.
pub fn parse_quote(body: &str) -> Result<String, PhraseError> {
    let parsed: QuoteBody =
        serde_json::from_str(body).map_err(|e| PhraseError::Malformed(e.to_string()))?;
    let text = parsed.into_text().map(|t| normalize_phrase(&t)).unwrap_or_default();
    if text.is_empty() {
        return Err(PhraseError::Empty);
    }
    if text.chars().count() > MAX_REMOTE_CHARS {
        return Err(PhraseError::Malformed(format!(
            "quote is longer than {MAX_REMOTE_CHARS} chars"
        )));
    }
    Ok(text)
}

fn fetch(url: &str, timeout: Duration) -> Result<String, PhraseError> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("phrasedash/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()?;
    let body = client.get(url).send()?.error_for_status()?.text()?;
    parse_quote(&body)
}

/// Best-effort quotes from public APIs, answered on a worker thread
pub struct RemotePhrases {
    english_endpoint: String,
    french_endpoint: String,
    timeout: Duration,
    local: LocalPhrases,
    tx: Sender<PhraseDelivery>,
}

impl RemotePhrases {
    pub fn new(
        english_endpoint: impl Into<String>,
        french_endpoint: impl Into<String>,
        timeout: Duration,
        local: LocalPhrases,
        tx: Sender<PhraseDelivery>,
    ) -> Self {
        Self {
            english_endpoint: english_endpoint.into(),
            french_endpoint: french_endpoint.into(),
            timeout,
            local,
            tx,
        }
    }

    fn endpoint(&self, language: Language) -> &str {
        match language {
            Language::English => &self.english_endpoint,
            Language::French => &self.french_endpoint,
        }
    }
}

impl PhraseSource for RemotePhrases {
    fn request(&mut self, language: Language, ticket: Ticket) -> PhraseRequest {
        let url = self.endpoint(language).to_string();
        let timeout = self.timeout;
        let fallback_phrase = self.local.by_index(language, ticket.0 as usize);
        let tx = self.tx.clone();

        let spawned = thread::Builder::new()
            .name("phrase-fetch".into())
            .spawn(move || {
                let delivery = match fetch(&url, timeout) {
                    Ok(phrase) => PhraseDelivery {
                        ticket,
                        language,
                        phrase,
                        fallback: false,
                    },
                    Err(e) => {
                        log::info!("remote phrase from {url} unavailable ({e}), using bundled list");
                        PhraseDelivery {
                            ticket,
                            language,
                            phrase: fallback_phrase,
                            fallback: true,
                        }
                    }
                };
                // receiver gone means the game is shutting down
                let _ = tx.send(delivery);
            });

        match spawned {
            Ok(_) => PhraseRequest::Pending,
            Err(e) => {
                log::warn!("could not start phrase fetch thread: {e}");
                PhraseRequest::Ready(self.local.next_phrase(language))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phrases::Pick;
    use assert_matches::assert_matches;
    use std::sync::mpsc;

    #[test]
    fn test_parse_quotable_body() {
        let body = r#"{"_id":"x","content":"Stay hungry, stay foolish.","author":"Someone"}"#;
        assert_eq!(parse_quote(body).unwrap(), "Stay hungry, stay foolish.");
    }

    #[test]
    fn test_parse_nested_citation_body() {
        let body = r#"{"status":1,"citation":{"citation":"C’est pas faux.","infos":{}}}"#;
        assert_eq!(parse_quote(body).unwrap(), "C'est pas faux.");
    }

    #[test]
    fn test_parse_list_body() {
        let body = r#"[{"content":"first one"},{"content":"second"}]"#;
        assert_eq!(parse_quote(body).unwrap(), "first one");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_matches!(parse_quote("<html>"), Err(PhraseError::Malformed(_)));
        assert_matches!(parse_quote(r#"{"other":1}"#), Err(PhraseError::Malformed(_)));
        assert_matches!(parse_quote(r#"{"content":"   "}"#), Err(PhraseError::Empty));
    }

    #[test]
    fn test_parse_rejects_overlong_quote() {
        let body = format!(r#"{{"content":"{}"}}"#, "word ".repeat(100));
        assert_matches!(parse_quote(&body), Err(PhraseError::Malformed(_)));
    }

    #[test]
    fn test_unreachable_endpoint_falls_back_to_local() {
        let (tx, rx) = mpsc::channel();
        let local = LocalPhrases::from_lists(
            vec!["fallback a".into(), "fallback b".into()],
            vec!["repli".into()],
            Pick::Sequential,
        );
        let mut remote = RemotePhrases::new(
            "http://127.0.0.1:9/quote",
            "http://127.0.0.1:9/citation",
            Duration::from_millis(200),
            local,
            tx,
        );

        assert_eq!(
            remote.request(Language::English, Ticket(3)),
            PhraseRequest::Pending
        );
        let delivery = rx.recv_timeout(Duration::from_secs(10)).unwrap();
        assert_eq!(delivery.ticket, Ticket(3));
        assert_eq!(delivery.language, Language::English);
        assert!(delivery.fallback);
        assert_eq!(delivery.phrase, "fallback b");
    }
}
