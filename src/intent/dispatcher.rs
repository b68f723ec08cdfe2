//! Ordered intent matching and reply generation.

use chrono::Local;
use log::debug;

use crate::math::evaluate_arithmetic;
use crate::session::Session;
use crate::skills::{
    NewsClient, STORY_HINTS, SnippetTable, WikipediaClient, disease_info, generate_story,
    solve_symbolic, summarize,
};
use crate::types::Reply;

use super::matching::Utterance;
use super::rules::{PHRASE_RULES, PhraseAction};

const WIKI_PREFIXES: [&str; 3] = ["about ", "who is ", "what is "];
const READ_OUT_WORDS: [&str; 3] = ["read", "read out", "full"];
const SUMMARY_WORDS: [&str; 4] = ["summarize", "summary", "short", "main points"];
const MORE_ABOUT: [&str; 3] = ["more about him", "more about her", "more about it"];
const FALLBACK: &str = "Sorry, I didn't understand that. Try asking about diseases, math problems, or say 'open YouTube' or upload a file or image.";

/// Choice made while a document is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentChoice {
    ReadOut,
    Summarize,
    Unclear,
}

/// What a message asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent<'a> {
    Document(DocumentChoice),
    Phrase(PhraseAction),
    WikiLookup(&'a str),
    WikiMore,
    /// Reply computed while matching
    Answer(String),
    Story,
    Fallback,
}

/// Everything a matcher may look at. Intents only borrow from the message,
/// never from the session.
pub struct MatchInput<'a, 's> {
    pub utterance: &'a Utterance,
    pub session: &'s Session,
    pub snippets: &'a SnippetTable,
}

type Matcher = for<'a, 's> fn(&MatchInput<'a, 's>) -> Option<Intent<'a>>;

/// Matchers in priority order; the first hit wins.
const MATCHERS: [(&str, Matcher); 10] = [
    ("pending-document", match_pending_document),
    ("phrase", match_phrase),
    ("wikipedia", match_wiki_lookup),
    ("wikipedia-more", match_wiki_more),
    ("snippet", match_snippet),
    ("arithmetic", match_arithmetic),
    ("symbolic", match_symbolic),
    ("disease", match_disease),
    ("story", match_story),
    ("fallback", match_fallback),
];

/// Picks the intent of a message.
pub fn classify<'a>(input: &MatchInput<'a, '_>) -> Intent<'a> {
    for (name, matcher) in MATCHERS {
        if let Some(intent) = matcher(input) {
            debug!("Intent '{}' matched '{}'", name, input.utterance.text);
            return intent;
        }
    }
    Intent::Fallback
}

fn match_pending_document<'a>(input: &MatchInput<'a, '_>) -> Option<Intent<'a>> {
    if !input.session.pending_document {
        return None;
    }
    let utterance = input.utterance;
    let choice = if utterance.contains_any(&READ_OUT_WORDS) {
        DocumentChoice::ReadOut
    } else if utterance.contains_any(&SUMMARY_WORDS) {
        DocumentChoice::Summarize
    } else {
        DocumentChoice::Unclear
    };
    Some(Intent::Document(choice))
}

fn match_phrase<'a>(input: &MatchInput<'a, '_>) -> Option<Intent<'a>> {
    PHRASE_RULES
        .iter()
        .find(|rule| input.utterance.contains_any(rule.phrases))
        .map(|rule| {
            debug!("Phrase rule '{}'", rule.name);
            Intent::Phrase(rule.action)
        })
}

fn match_wiki_lookup<'a>(input: &MatchInput<'a, '_>) -> Option<Intent<'a>> {
    let text = input.utterance.text.as_str();
    WIKI_PREFIXES
        .iter()
        .find_map(|prefix| text.strip_prefix(prefix))
        .map(str::trim)
        .filter(|topic| !topic.is_empty())
        .map(Intent::WikiLookup)
}

fn match_wiki_more<'a>(input: &MatchInput<'a, '_>) -> Option<Intent<'a>> {
    input
        .utterance
        .contains_any(&MORE_ABOUT)
        .then_some(Intent::WikiMore)
}

fn match_snippet<'a>(input: &MatchInput<'a, '_>) -> Option<Intent<'a>> {
    input
        .snippets
        .lookup(&input.utterance.text)
        .map(Intent::Answer)
}

fn match_arithmetic<'a>(input: &MatchInput<'a, '_>) -> Option<Intent<'a>> {
    evaluate_arithmetic(&input.utterance.text).map(Intent::Answer)
}

fn match_symbolic<'a>(input: &MatchInput<'a, '_>) -> Option<Intent<'a>> {
    solve_symbolic(&input.utterance.text).map(Intent::Answer)
}

fn match_disease<'a>(input: &MatchInput<'a, '_>) -> Option<Intent<'a>> {
    disease_info(&input.utterance.text).map(Intent::Answer)
}

fn match_story<'a>(input: &MatchInput<'a, '_>) -> Option<Intent<'a>> {
    input
        .utterance
        .contains_phrase("tell me a story")
        .then_some(Intent::Story)
}

fn match_fallback<'a>(_: &MatchInput<'a, '_>) -> Option<Intent<'a>> {
    Some(Intent::Fallback)
}

/// The rule-based assistant.
#[derive(Debug, Clone)]
pub struct Assistant {
    snippets: SnippetTable,
    wikipedia: WikipediaClient,
    news: NewsClient,
}

impl Assistant {
    pub fn new(snippets: SnippetTable, wikipedia: WikipediaClient, news: NewsClient) -> Self {
        Self {
            snippets,
            wikipedia,
            news,
        }
    }

    /// Answers one chat message, updating the session as needed.
    pub async fn respond(&self, message: &str, session: &mut Session) -> Reply {
        let utterance = Utterance::new(message);
        let intent = classify(&MatchInput {
            utterance: &utterance,
            session,
            snippets: &self.snippets,
        });

        match intent {
            Intent::Document(choice) => document_reply(choice, session),
            Intent::Phrase(PhraseAction::Say(text)) => Reply::text(text),
            Intent::Phrase(PhraseAction::CurrentTime) => {
                Reply::text(Local::now().format("Current time is %I:%M %p").to_string())
            }
            Intent::Phrase(PhraseAction::Headlines) => Reply::text(self.news.current_affairs().await),
            Intent::WikiLookup(topic) => Reply::text(self.wikipedia.lookup(topic, session).await),
            Intent::WikiMore => Reply::text(self.wikipedia.more(session).await),
            Intent::Answer(text) => Reply::text(text),
            Intent::Story => Reply::text(generate_story(&STORY_HINTS)),
            Intent::Fallback => Reply::text(FALLBACK),
        }
    }
}

fn document_reply(choice: DocumentChoice, session: &mut Session) -> Reply {
    match choice {
        DocumentChoice::ReadOut => {
            let content = session.take_document();
            Reply::Document {
                text: "📖 Reading the full document...".to_string(),
                speak: content.clone(),
                full_content: Some(content),
            }
        }
        DocumentChoice::Summarize => {
            let summary = summarize(&session.take_document());
            Reply::Document {
                text: summary.clone(),
                speak: summary,
                full_content: None,
            }
        }
        DocumentChoice::Unclear => Reply::Document {
            text: "Please choose an option: 'read out' for full content or 'summarize' for main points."
                .to_string(),
            speak: "Please choose read out or summarize".to_string(),
            full_content: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use url::Url;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, query_param},
    };

    use super::*;
    use crate::intent::rules::GREETING;

    fn snippets() -> SnippetTable {
        let mut table = BTreeMap::new();
        table.insert("bubble sort".to_string(), "def bubble(xs): ...".to_string());
        SnippetTable::new(table)
    }

    fn assistant_with(wikipedia_url: &str) -> Assistant {
        let client = reqwest::Client::new();
        Assistant::new(
            snippets(),
            WikipediaClient::new(client.clone(), Url::parse(wikipedia_url).expect("url")),
            NewsClient::new(
                client,
                Url::parse("http://127.0.0.1:9/v2/top-headlines").expect("url"),
                None,
                "in".to_string(),
            ),
        )
    }

    fn assistant() -> Assistant {
        assistant_with("http://127.0.0.1:9/w/api.php")
    }

    async fn reply_text(message: &str) -> String {
        let mut session = Session::default();
        assistant()
            .respond(message, &mut session)
            .await
            .as_text()
            .to_string()
    }

    fn classified(message: &str, session: &Session) -> Intent<'static> {
        let utterance = Utterance::new(message);
        let table = SnippetTable::default();
        let intent = classify(&MatchInput {
            utterance: &utterance,
            session,
            snippets: &table,
        });
        match intent {
            Intent::WikiLookup(topic) => Intent::Answer(format!("wiki:{topic}")),
            Intent::Document(choice) => Intent::Document(choice),
            Intent::Phrase(action) => Intent::Phrase(action),
            Intent::WikiMore => Intent::WikiMore,
            Intent::Answer(text) => Intent::Answer(text),
            Intent::Story => Intent::Story,
            Intent::Fallback => Intent::Fallback,
        }
    }

    #[tokio::test]
    async fn greetings_match_whole_words() {
        assert_eq!(reply_text("hello").await, GREETING);
        assert_eq!(reply_text("well hello there").await, GREETING);
        assert_eq!(reply_text("Hi!").await, GREETING);
        assert_ne!(reply_text("this machine").await, GREETING);
    }

    #[tokio::test]
    async fn fixed_phrases() {
        assert_eq!(reply_text("what is your name").await, "My name is Virtual Assistant");
        assert_eq!(reply_text("thank you so much").await, "It's my pleasure, sir, to stay with you.");
        assert_eq!(reply_text("open youtube").await, "OPEN_YOUTUBE");
        assert_eq!(reply_text("please quit").await, "Ok sir. Shutting down.");
    }

    #[tokio::test]
    async fn time_reply_has_clock_format() {
        let reply = reply_text("what is the time now").await;
        assert!(reply.starts_with("Current time is "));
        assert!(reply.ends_with("AM") || reply.ends_with("PM"));
    }

    #[tokio::test]
    async fn news_without_key_apologizes() {
        assert_eq!(
            reply_text("current affairs").await,
            "Sorry, I'm having trouble fetching the news at the moment."
        );
    }

    #[tokio::test]
    async fn arithmetic_and_division_by_zero() {
        assert_eq!(reply_text("5 plus 3").await, "The answer is: 8");
        assert_eq!(reply_text("10 divided by 0").await, "Sorry, I can't divide by zero.");
    }

    #[tokio::test]
    async fn symbolic_math() {
        assert_eq!(reply_text("differentiate x^2").await, "Derivative: 2*x");
    }

    #[tokio::test]
    async fn disease_lookup_uses_declared_order() {
        let reply = reply_text("cold and fever").await;
        assert!(reply.starts_with("🩺 *Common Cold*"));
    }

    #[tokio::test]
    async fn snippet_lookup() {
        let reply = reply_text("show me bubble sort").await;
        assert!(reply.starts_with("Here is the bubble sort program:\n```python\n"));
    }

    #[tokio::test]
    async fn story_and_fallback() {
        let story = reply_text("tell me a story").await;
        assert!(story.contains("hero"));
        assert_eq!(reply_text("blorp").await, FALLBACK);
    }

    #[test]
    fn earlier_intents_win() {
        let session = Session::default();
        assert_eq!(
            classified("what is your name", &session),
            Intent::Phrase(PhraseAction::Say("My name is Virtual Assistant"))
        );
        assert_eq!(
            classified("who is alan turing", &session),
            Intent::Answer("wiki:alan turing".to_string())
        );
        assert_eq!(classified("tell me more about it", &session), Intent::WikiMore);
        assert_eq!(classified("what is", &session), Intent::Fallback);
    }

    #[test]
    fn pending_document_takes_priority() {
        let mut session = Session::default();
        session.store_document("text".to_string());
        assert_eq!(
            classified("hello", &session),
            Intent::Document(DocumentChoice::Unclear)
        );
        assert_eq!(
            classified("read out", &session),
            Intent::Document(DocumentChoice::ReadOut)
        );
        assert_eq!(
            classified("give me the main points", &session),
            Intent::Document(DocumentChoice::Summarize)
        );
    }

    #[tokio::test]
    async fn document_flow_read_out_and_summarize() {
        let assistant = assistant();
        let content = "This document explains the first important idea. \
                       It continues with a second longer sentence here.";

        let mut session = Session::default();
        session.store_document(content.to_string());
        let reply = assistant.respond("something else", &mut session).await;
        assert!(matches!(reply, Reply::Document { full_content: None, .. }));
        assert!(session.pending_document);

        let reply = assistant.respond("read out", &mut session).await;
        assert_eq!(
            reply,
            Reply::Document {
                text: "📖 Reading the full document...".to_string(),
                speak: content.to_string(),
                full_content: Some(content.to_string()),
            }
        );
        assert!(!session.pending_document);

        session.store_document(content.to_string());
        let reply = assistant.respond("summarize", &mut session).await;
        let Reply::Document { text, full_content, .. } = reply else {
            panic!("expected a document reply");
        };
        assert!(text.starts_with("📄 **Summary:**"));
        assert_ne!(text, content);
        assert_eq!(full_content, None);
        assert!(!session.pending_document);
    }

    #[tokio::test]
    async fn wikipedia_pages_through_the_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("exsentences", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "query": {"pages": [{"title": "Cat", "extract": "Cats are small. They purr."}]}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("exsentences", "4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "query": {"pages": [{
                    "title": "Cat",
                    "extract": "Cats are small. They purr. They sleep a lot. They hunt mice."
                }]}
            })))
            .mount(&server)
            .await;

        let assistant = assistant_with(&format!("{}/w/api.php", server.uri()));
        let mut session = Session::default();

        let reply = assistant.respond("about cats", &mut session).await;
        assert_eq!(reply.as_text(), "Cats are small. They purr.");
        assert_eq!(session.wiki_offset, 0);

        let reply = assistant.respond("more about it", &mut session).await;
        assert_eq!(reply.as_text(), "They sleep a lot. They hunt mice.");
        assert_eq!(session.wiki_offset, 2);
    }
}
