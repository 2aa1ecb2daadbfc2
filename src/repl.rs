//! Interactive command loop.
//!
//! After the initial search the user can edit the criteria one field at a
//! time and search again, the same way they would edit the form fields and
//! press the search button on the web page. Editing never searches by itself.

use crate::api::NewsApi;
use crate::controller::SearchController;
use crate::models::Logic;
use crate::outputs::terminal;
use crate::utils::parse_date;
use chrono::NaiveDate;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

pub const HELP: &str = "\
Commands:
  keyword <text>      set the search keyword (comma-separated terms)
  logic <OR|AND>      how multiple terms are combined
  start <YYYY-MM-DD>  first day of the range
  end <YYYY-MM-DD>    last day of the range
  clear-dates         unset both dates
  search              run the search with the current criteria
  show                print the current view again
  help                show this text
  quit                exit
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Keyword(String),
    Logic(Logic),
    Start(NaiveDate),
    End(NaiveDate),
    ClearDates,
    Search,
    Show,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (name, arg) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    let date = |arg: &str| parse_date(arg).ok_or_else(|| format!("invalid date '{arg}', expected YYYY-MM-DD"));

    let command = match name.to_ascii_lowercase().as_str() {
        "keyword" | "k" => Command::Keyword(arg.to_string()),
        "logic" | "l" => Command::Logic(arg.parse()?),
        "start" | "s" => Command::Start(date(arg)?),
        "end" | "e" => Command::End(date(arg)?),
        "clear-dates" => Command::ClearDates,
        "search" | "go" => Command::Search,
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command '{other}', type 'help'")),
    };
    Ok(Some(command))
}

/// Read commands from `input` until EOF or `quit`.
///
/// Hints and `show` output go to `out`; search results reach the user
/// through whatever observers are subscribed to the controller.
pub async fn run<A, R, W>(
    controller: &mut SearchController<A>,
    input: R,
    out: &mut W,
) -> std::io::Result<()>
where
    A: NewsApi,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(hint) => {
                out.write_all(format!("{hint}\n").as_bytes()).await?;
                continue;
            }
        };
        debug!(?command, "Interactive command");
        let edits_criteria = matches!(
            command,
            Command::Keyword(_)
                | Command::Logic(_)
                | Command::Start(_)
                | Command::End(_)
                | Command::ClearDates
        );

        match command {
            Command::Keyword(keyword) => controller.set_keyword(keyword),
            Command::Logic(logic) => controller.set_logic(logic),
            Command::Start(date) => controller.set_start_date(Some(date)),
            Command::End(date) => controller.set_end_date(Some(date)),
            Command::ClearDates => {
                controller.set_start_date(None);
                controller.set_end_date(None);
            }
            Command::Search => {
                controller.run_search().await;
            }
            Command::Show => {
                out.write_all(terminal::render(controller.state()).as_bytes())
                    .await?;
            }
            Command::Help => out.write_all(HELP.as_bytes()).await?,
            Command::Quit => break,
        }
        if edits_criteria {
            let echo = format!("Criteria: {}\n", controller.criteria().summary());
            out.write_all(echo.as_bytes()).await?;
        }
        out.flush().await?;
    }
    info!("Leaving interactive mode");
    Ok(())
}
