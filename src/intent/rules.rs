//! Built-in fixed-phrase replies.

/// What a matched phrase rule answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhraseAction {
    /// Constant reply
    Say(&'static str),
    /// Local time of day
    CurrentTime,
    /// Top news headlines
    Headlines,
}

/// A fixed-phrase rule.
#[derive(Debug, Clone, Copy)]
pub struct PhraseRule {
    pub name: &'static str,
    pub phrases: &'static [&'static str],
    pub action: PhraseAction,
}

pub const GREETING: &str = "Hey sir, how can I help you!";

/// Rules in priority order.
pub const PHRASE_RULES: &[PhraseRule] = &[
    PhraseRule {
        name: "name",
        phrases: &["what is your name"],
        action: PhraseAction::Say("My name is Virtual Assistant"),
    },
    PhraseRule {
        name: "greeting",
        phrases: &["hello", "hye", "hay", "hi"],
        action: PhraseAction::Say(GREETING),
    },
    PhraseRule {
        name: "wellbeing",
        phrases: &["how are you"],
        action: PhraseAction::Say("I am doing great these days, sir."),
    },
    PhraseRule {
        name: "thanks",
        phrases: &["thanku", "thank", "thanks", "thank you"],
        action: PhraseAction::Say("It's my pleasure, sir, to stay with you."),
    },
    PhraseRule {
        name: "good-morning",
        phrases: &["good morning"],
        action: PhraseAction::Say("Good morning sir, I think you might need some help."),
    },
    PhraseRule {
        name: "time",
        phrases: &["time now"],
        action: PhraseAction::CurrentTime,
    },
    PhraseRule {
        name: "news",
        phrases: &["current affairs"],
        action: PhraseAction::Headlines,
    },
    PhraseRule {
        name: "open-youtube",
        phrases: &["open youtube"],
        action: PhraseAction::Say("OPEN_YOUTUBE"),
    },
    PhraseRule {
        name: "open-google",
        phrases: &["open google"],
        action: PhraseAction::Say("OPEN_GOOGLE"),
    },
    PhraseRule {
        name: "open-facebook",
        phrases: &["open facebook"],
        action: PhraseAction::Say("OPEN_FACEBOOK"),
    },
    PhraseRule {
        name: "open-sbtet",
        phrases: &["open sbtet"],
        action: PhraseAction::Say("OPEN_SBTET"),
    },
    PhraseRule {
        name: "open-music",
        phrases: &["open music"],
        action: PhraseAction::Say("OPEN_MUSIC"),
    },
    PhraseRule {
        name: "shutdown",
        phrases: &["shutdown", "quit"],
        action: PhraseAction::Say("Ok sir. Shutting down."),
    },
];
