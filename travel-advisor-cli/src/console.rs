//! Interactive stdin console over the in-process advisor.

use anyhow::Result;
use futures::StreamExt;
use std::io::{self, BufRead, Write};
use travel_advisor::{Advisor, EventPart, SessionKey, StreamEvent};

/// Reads questions from stdin until `exit`, `quit` or EOF.
pub async fn run_console(advisor: &Advisor, key: &SessionKey) -> Result<()> {
    println!("Travel advisor ready (session {}). Type 'exit' to quit.\n", key.session_id());

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("You: ");
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            println!("\nGoodbye!");
            break;
        }

        let input = input.trim();
        if input == "exit" || input == "quit" {
            println!("Goodbye!");
            break;
        }
        if input.is_empty() {
            continue;
        }

        let mut events = advisor.stream(key, input).await?;
        print!("Advisor: ");
        stdout.flush()?;

        let mut streamed_text = false;
        while let Some(event) = events.next().await {
            match event {
                Ok(event) => {
                    let event = StreamEvent::from_json(serde_json::to_value(&event)?);
                    print_event(&event, &mut streamed_text, &mut stdout)?;
                }
                Err(e) => eprintln!("\nError: {e}"),
            }
        }
        println!("\n");
    }

    Ok(())
}

fn print_event(event: &StreamEvent, streamed_text: &mut bool, out: &mut impl Write) -> Result<()> {
    for part in &event.parts {
        match part {
            EventPart::FunctionCall { name, args } => write!(out, "\n  [{name} {args}]\n")?,
            EventPart::Text(text) => {
                // A complete event after streamed chunks repeats the same text.
                if event.partial {
                    *streamed_text = true;
                    write!(out, "{text}")?;
                } else if !*streamed_text {
                    write!(out, "{text}")?;
                }
            }
            _ => {}
        }
    }
    out.flush()?;
    Ok(())
}
