//! Console view for the assistant.
//!
//! The reference "owning view": a line-oriented REPL that opens a session,
//! triggers hydration, submits messages, and renders replies as ANSI text.
//! The production console swaps this out; the controller neither knows nor
//! cares which view owns it.

use std::io::{self, Write as _};

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::core::controller::{ChatController, ValidationError};
use crate::core::session::Role;
use crate::format::{self, DisplayBlock, InlineSpan};
use crate::locale::Strings;

const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Renders display blocks as ANSI terminal text.
pub fn render_blocks(blocks: &[DisplayBlock]) -> String {
    let mut out = String::new();
    for block in blocks {
        match block {
            DisplayBlock::Header(text) => {
                out.push_str(&format!("{BOLD}{text}{RESET}\n"));
            }
            DisplayBlock::List(items) => {
                for item in items {
                    out.push_str("  • ");
                    out.push_str(&render_spans(item));
                    out.push('\n');
                }
            }
            DisplayBlock::CodeLine(line) => {
                out.push_str(&format!("    {DIM}{line}{RESET}\n"));
            }
            DisplayBlock::Divider => {
                out.push_str(&format!("{DIM}{}{RESET}\n", "─".repeat(40)));
            }
            DisplayBlock::TextLine(spans) => {
                out.push_str(&render_spans(spans));
                out.push('\n');
            }
            DisplayBlock::LineBreak => out.push('\n'),
        }
    }
    out
}

fn render_spans(spans: &[InlineSpan]) -> String {
    spans
        .iter()
        .map(|span| match span {
            InlineSpan::Plain(text) => text.clone(),
            InlineSpan::Emphasis(text) => format!("{BOLD}{text}{RESET}"),
        })
        .collect()
}

/// Prints every message the view has not shown yet, returning the new
/// watermark.
fn print_new_messages(controller: &ChatController, user_id: &str, seen: usize) -> usize {
    let messages = controller.current_messages(user_id);
    for message in &messages[seen.min(messages.len())..] {
        match message.role {
            Role::User => println!("you: {}", message.content),
            Role::Assistant => {
                print!("assistant:\n{}", render_blocks(&format::format(&message.content)));
                if message.is_ticket
                    && let Some(ticket) = &message.ticket
                {
                    println!(
                        "{BOLD}🎫 Ticket {} — route {}{RESET}",
                        ticket.ticket_number, ticket.route_number
                    );
                }
            }
        }
    }
    messages.len()
}

/// Runs the REPL until `/quit`. `/clear` asks for confirmation first;
/// `/q N` copies quick question N into the draft, and an empty line sends
/// the current draft.
pub async fn run(
    mut controller: ChatController,
    user_id: String,
    route_number: Option<String>,
    strings: &'static Strings,
) -> io::Result<()> {
    controller.open_session(&user_id, route_number);
    let mut seen = print_new_messages(&controller, &user_id, 0);
    controller.hydrate_once(&user_id).await;
    seen = print_new_messages(&controller, &user_id, seen);

    if let Some(questions) = controller.quick_questions(&user_id) {
        println!("{DIM}{}:{RESET}", strings.quick_questions_title);
        for (i, question) in questions.iter().enumerate() {
            println!("{DIM}  /q {}  {question}{RESET}", i + 1);
        }
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{DIM}{}{RESET}\n> {}", strings.prompt_placeholder, controller.draft(&user_id));
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break; // stdin closed
        };

        match line.trim() {
            "/quit" => break,
            "/clear" => {
                controller.request_clear(&user_id);
                print!(
                    "{} (y = {}, n = {}) ",
                    strings.clear_confirm, strings.clear_yes, strings.clear_no
                );
                io::stdout().flush()?;
                let answer = lines.next_line().await?.unwrap_or_default();
                if answer.trim().eq_ignore_ascii_case("y") {
                    controller.confirm_clear(&user_id).await;
                } else {
                    controller.cancel_clear(&user_id);
                }
                // Re-render from the top: a successful clear replaced the
                // whole sequence.
                seen = print_new_messages(&controller, &user_id, 0);
            }
            quick if quick.starts_with("/q ") => {
                if let Ok(n) = quick[3..].trim().parse::<usize>()
                    && n >= 1
                {
                    controller.apply_quick_question(&user_id, n - 1);
                }
            }
            "" => {
                let draft = controller.draft(&user_id).to_string();
                match controller.submit(&user_id, &draft).await {
                    Ok(()) | Err(ValidationError::Blank) => {}
                    Err(ValidationError::Busy) => println!("{DIM}(still working){RESET}"),
                }
                seen = print_new_messages(&controller, &user_id, seen);
            }
            text => {
                match controller.submit(&user_id, text).await {
                    Ok(()) => {}
                    Err(ValidationError::Blank) => {}
                    Err(ValidationError::Busy) => println!("{DIM}(still working){RESET}"),
                }
                seen = print_new_messages(&controller, &user_id, seen);
            }
        }
    }

    controller.close_session(&user_id);
    Ok(())
}
