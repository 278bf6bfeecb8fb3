//! # Localization
//!
//! Fixed UI strings for the assistant, bundled per language. The console
//! shell picks a bundle once at startup; everything user-visible that the
//! session controller injects into a conversation (greeting, failure
//! notices, cleared-history greeting) comes from here so the controller
//! itself stays language-agnostic.

use clap::ValueEnum;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Lang {
    /// English
    #[default]
    En,
    /// Filipino
    Fil,
}

impl Lang {
    /// Parses a config-file language tag ("en", "fil"). Unknown tags
    /// return `None` so the caller can warn and fall back.
    pub fn from_tag(tag: &str) -> Option<Lang> {
        match tag.to_ascii_lowercase().as_str() {
            "en" => Some(Lang::En),
            "fil" | "tl" => Some(Lang::Fil),
            _ => None,
        }
    }
}

/// One language's worth of fixed strings.
#[derive(Debug)]
pub struct Strings {
    pub greeting: &'static str,
    /// Greeting shown after the remote history has been cleared.
    pub cleared_greeting: &'static str,
    /// Appended when the backend answers with `success: false` and no text.
    pub assistant_error: &'static str,
    /// Appended when the request itself fails (network/transport).
    pub connection_error: &'static str,
    pub quick_questions_title: &'static str,
    pub quick_questions: [&'static str; 4],
    pub prompt_placeholder: &'static str,
    pub clear_confirm: &'static str,
    pub clear_yes: &'static str,
    pub clear_no: &'static str,
}

static EN: Strings = Strings {
    greeting: "👋 Hi! I'm your ticketing assistant. Ask me about routes, \
               fares, today's statistics, or tell me to generate a ticket.",
    cleared_greeting: "✅ Chat history cleared! How can I help you today?",
    assistant_error: "❌ Sorry, I encountered an error. Please try again.",
    connection_error: "❌ Failed to connect to the server. Please check your connection.",
    quick_questions_title: "Quick questions",
    quick_questions: [
        "Show my routes",
        "Today's statistics",
        "Generate a ticket",
        "Recent tickets",
    ],
    prompt_placeholder: "Ask me anything...",
    clear_confirm: "Clear the whole chat history? This cannot be undone.",
    clear_yes: "Yes, clear it",
    clear_no: "No, keep it",
};

static FIL: Strings = Strings {
    greeting: "👋 Kumusta! Ako ang iyong ticketing assistant. Magtanong \
               tungkol sa mga ruta, pamasahe, estadistika ngayong araw, o \
               sabihin mong gumawa ng tiket.",
    cleared_greeting: "✅ Na-clear na ang chat history! Paano kita matutulungan?",
    assistant_error: "❌ Paumanhin, nagkaroon ng error. Pakisubukang muli.",
    connection_error: "❌ Hindi makakonekta sa server. Pakisuri ang iyong koneksyon.",
    quick_questions_title: "Mabilisang tanong",
    quick_questions: [
        "Ipakita ang aking mga ruta",
        "Estadistika ngayong araw",
        "Gumawa ng tiket",
        "Mga kamakailang tiket",
    ],
    prompt_placeholder: "Magtanong ng kahit ano...",
    clear_confirm: "Burahin ang buong chat history? Hindi na ito maibabalik.",
    clear_yes: "Oo, burahin",
    clear_no: "Hindi, itago",
};

/// Returns the string bundle for a language.
pub fn strings(lang: Lang) -> &'static Strings {
    match lang {
        Lang::En => &EN,
        Lang::Fil => &FIL,
    }
}
