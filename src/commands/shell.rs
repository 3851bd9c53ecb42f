//! Interactive session: one `TableState` lives for the whole shell, so items
//! saved while offline are kept and replayed once the store is back

use super::{dispatch, sync, Command};
use crate::Session;
use clap::Parser;
use futures::StreamExt;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::wrappers::LinesStream;

#[derive(Parser, Debug)]
#[command(no_binary_name = true)]
struct ShellLine {
    #[command(subcommand)]
    command: Command,
}

/// Split a line into words; single or double quotes group words
pub(crate) fn split_words(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut word = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => word.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut word));
                    in_word = false;
                }
            }
            None => {
                word.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err("unterminated quote".to_string());
    }
    if in_word {
        words.push(word);
    }
    Ok(words)
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

pub async fn run(session: &mut Session) -> anyhow::Result<()> {
    println!(
        "Shopping list `{}` on {}. Type `help` for commands, `exit` to quit.",
        session.app.table.table(),
        session.app.table.store_name()
    );
    println!("{}", super::items::list_items(session).await);
    println!("{}", sync::get_status(session));
    prompt();

    let mut lines = LinesStream::new(BufReader::new(tokio::io::stdin()).lines());
    while let Some(line) = lines.next().await {
        let words = match split_words(&line?) {
            Ok(words) => words,
            Err(e) => {
                eprintln!("{}", e);
                prompt();
                continue;
            }
        };

        match words.first().map(String::as_str) {
            None => {}
            Some("exit") | Some("quit") => break,
            Some(_) => match ShellLine::try_parse_from(words) {
                Ok(ShellLine { command }) => match dispatch(session, command).await {
                    Ok(out) => println!("{}", out),
                    Err(e) => eprintln!("Error: {}", e),
                },
                // Covers `help` too
                Err(e) => {
                    let _ = e.print();
                }
            },
        }
        prompt();
    }

    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_words() {
        assert_eq!(
            split_words(r#"add "Rice, white" -q 2 -b 'Tio João'"#).unwrap(),
            ["add", "Rice, white", "-q", "2", "-b", "Tio João"]
        );
        assert_eq!(split_words("  list  ").unwrap(), ["list"]);
        assert_eq!(split_words(r#"add "" -q 1"#).unwrap(), ["add", "", "-q", "1"]);
        assert!(split_words("").unwrap().is_empty());
        assert!(split_words("add \"Rice").is_err());
    }

    #[test]
    fn test_shell_line_parsing() {
        let words = split_words("add Rice -q 2 -u kg -p 8.50 -n 5kg").unwrap();
        let ShellLine { command } = ShellLine::try_parse_from(words).unwrap();
        match command {
            Command::Add(args) => {
                assert_eq!(args.item, "Rice");
                assert_eq!(args.quantity, 2.0);
                assert_eq!(args.unit, crate::model::UnitType::Kilogram);
                assert_eq!(args.price, 8.5);
                assert_eq!(args.note, "5kg");
                assert_eq!(args.brand, "");
            }
            other => panic!("unexpected command {:?}", other),
        }

        assert!(ShellLine::try_parse_from(["add", "Rice"]).is_err());
        assert!(matches!(
            ShellLine::try_parse_from(["export", "--out", "/tmp"]).unwrap().command,
            Command::Export { out: Some(_) }
        ));
    }
}
