use crate::dataset::temporal::month_name;
use crate::report::Selection;
use std::str::FromStr;

pub const HELP_TEXT: &str = "Commands: year <y..>|all|none | month <m..>|all|none | segment <a>, <b>|all|none | search <text> | reset | help | quit";

/// A filter-set choice typed on the command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Choice<T> {
    All,
    Nothing,
    Only(Vec<T>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Years(Choice<i32>),
    Months(Choice<u32>),
    Segments(Choice<String>),
    /// Empty text clears the search.
    Search(String),
    Reset,
    /// Internal: recompute the report for this selection.
    Refresh {
        selection: Selection,
    },
    Help,
    Quit,
    Unknown(String),
}

impl FromStr for AppCommand {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (head, rest) = match s.split_once(char::is_whitespace) {
            Some((h, r)) => (h, r.trim()),
            None => (s, ""),
        };
        if head.is_empty() {
            return Ok(AppCommand::Unknown("".to_string()));
        }

        match head.to_ascii_lowercase().as_str() {
            "year" | "years" | "tahun" => {
                match parse_choice(rest, |t| t.parse::<i32>().ok()) {
                    Some(choice) => Ok(AppCommand::Years(choice)),
                    None => Ok(AppCommand::Unknown(
                        "usage: year <2023 2024 ..> | year all | year none".to_string(),
                    )),
                }
            }
            "month" | "months" | "bulan" => match parse_choice(rest, parse_month) {
                Some(choice) => Ok(AppCommand::Months(choice)),
                None => Ok(AppCommand::Unknown(
                    "usage: month <1..12 | jan ..> | month all | month none".to_string(),
                )),
            },
            "segment" | "segments" | "segmen" => {
                let choice = match rest.to_ascii_lowercase().as_str() {
                    "" => None,
                    "all" => Some(Choice::All),
                    "none" => Some(Choice::Nothing),
                    _ => {
                        let names: Vec<String> = rest
                            .split(',')
                            .map(|p| p.trim().to_string())
                            .filter(|p| !p.is_empty())
                            .collect();
                        (!names.is_empty()).then_some(Choice::Only(names))
                    }
                };
                match choice {
                    Some(choice) => Ok(AppCommand::Segments(choice)),
                    None => Ok(AppCommand::Unknown(
                        "usage: segment <a>, <b> | segment all | segment none".to_string(),
                    )),
                }
            }
            "search" | "s" => Ok(AppCommand::Search(rest.to_string())),
            "reset" => Ok(AppCommand::Reset),
            "help" | "h" => Ok(AppCommand::Help),
            "quit" | "q" | "exit" => Ok(AppCommand::Quit),
            _ => Ok(AppCommand::Unknown(format!("unknown command: {}", head))),
        }
    }
}

/// `all`, `none`, or whitespace/comma separated values; `None` when empty or any token is invalid.
fn parse_choice<T>(rest: &str, parse: impl Fn(&str) -> Option<T>) -> Option<Choice<T>> {
    match rest.to_ascii_lowercase().as_str() {
        "" => None,
        "all" => Some(Choice::All),
        "none" => Some(Choice::Nothing),
        _ => rest
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .map(&parse)
            .collect::<Option<Vec<T>>>()
            .map(Choice::Only),
    }
}

/// `1`..`12`, or an English month name / prefix of at least three letters.
pub fn parse_month(token: &str) -> Option<u32> {
    if let Ok(n) = token.parse::<u32>() {
        return (1..=12).contains(&n).then_some(n);
    }
    let t = token.to_ascii_lowercase();
    if t.len() < 3 {
        return None;
    }
    (1..=12).find(|&m| month_name(m).to_ascii_lowercase().starts_with(&t))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> AppCommand {
        AppCommand::from_str(s).unwrap()
    }

    #[test]
    fn test_years() {
        assert_eq!(
            parse("year 2023 2024"),
            AppCommand::Years(Choice::Only(vec![2023, 2024]))
        );
        assert_eq!(
            parse("year 2023,2024"),
            AppCommand::Years(Choice::Only(vec![2023, 2024]))
        );
        assert_eq!(parse("tahun ALL"), AppCommand::Years(Choice::All));
        assert_eq!(parse("year none"), AppCommand::Years(Choice::Nothing));
        assert!(matches!(parse("year 20x4"), AppCommand::Unknown(_)));
        assert!(matches!(parse("year"), AppCommand::Unknown(_)));
    }

    #[test]
    fn test_months_accept_names() {
        assert_eq!(
            parse("month 1 mar december"),
            AppCommand::Months(Choice::Only(vec![1, 3, 12]))
        );
        assert!(matches!(parse("month 13"), AppCommand::Unknown(_)));
        assert!(matches!(parse("month ma"), AppCommand::Unknown(_)));
        assert_eq!(parse_month("SEPT"), Some(9));
    }

    #[test]
    fn test_segments_split_on_commas() {
        assert_eq!(
            parse("segment Heavy Equipment, Bus"),
            AppCommand::Segments(Choice::Only(vec![
                "Heavy Equipment".to_string(),
                "Bus".to_string()
            ]))
        );
        assert_eq!(parse("segmen all"), AppCommand::Segments(Choice::All));
    }

    #[test]
    fn test_search_reset_and_misc() {
        assert_eq!(
            parse("search  sinar jaya "),
            AppCommand::Search("sinar jaya".to_string())
        );
        assert_eq!(parse("search"), AppCommand::Search(String::new()));
        assert_eq!(parse("reset"), AppCommand::Reset);
        assert_eq!(parse("h"), AppCommand::Help);
        assert_eq!(parse("exit"), AppCommand::Quit);
        assert_eq!(
            parse("frobnicate"),
            AppCommand::Unknown("unknown command: frobnicate".to_string())
        );
    }
}
