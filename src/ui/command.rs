use crate::tray::MenuAction;
use std::str::FromStr;

/// The usage printed on `help` or on an unknown command.
pub const HELP: &str = "Commands:
  start                 start monitoring with the current settings
  stop                  stop monitoring
  set <field> <value>   change a setting (watch, repo, pattern, remote, branch, debounce, recursive)
  hide                  minimize to the tray
  open                  reopen the configuration window
  push                  force push the current branch
  pull                  pull from the remote
  fetch                 fetch from the remote
  exit                  stop monitoring and exit
In the commit prompt: type the message, `:default` to accept the suggestion or `:cancel` to skip.
The tray stays available in the prompt as `:open`, `:push`, `:pull`, `:fetch` and `:exit`.";

const CANCEL: &str = ":cancel";
const ACCEPT_SUGGESTION: &str = ":default";

/// A command from the configuration window or the tray menu.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    StartMonitoring,
    StopMonitoring,
    Set(String, String),
    Minimize,
    Menu(MenuAction),
    Help,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, rest) = s.split_once(char::is_whitespace).unwrap_or((s, ""));
        let rest = rest.trim();

        match (name, rest) {
            ("set", rest) => match rest.split_once(char::is_whitespace) {
                Some((field, value)) => Ok(Command::Set(field.to_string(), value.trim().to_string())),
                None => Err(String::from("usage: set <field> <value>")),
            },
            (name, "") => match name {
                "start" => Ok(Command::StartMonitoring),
                "stop" => Ok(Command::StopMonitoring),
                "hide" | "minimize" => Ok(Command::Minimize),
                "open" | "reopen" | "config" => Ok(Command::Menu(MenuAction::Reopen)),
                "push" => Ok(Command::Menu(MenuAction::ForcePush)),
                "pull" => Ok(Command::Menu(MenuAction::Pull)),
                "fetch" => Ok(Command::Menu(MenuAction::Fetch)),
                "exit" | "quit" => Ok(Command::Menu(MenuAction::Exit)),
                "help" | "?" => Ok(Command::Help),
                name => Err(format!("cannot parse {name}, type help for the commands")),
            },
            (name, _) => Err(format!("{name} doesn't take arguments")),
        }
    }
}

/// A line typed while the commit prompt is open.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PromptInput {
    Cancel,
    AcceptSuggestion,
    /// A tray menu entry, which works while the prompt is open.
    Menu(MenuAction),
    Message(String),
}

impl PromptInput {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        match line {
            CANCEL => return PromptInput::Cancel,
            ACCEPT_SUGGESTION => return PromptInput::AcceptSuggestion,
            _ => {}
        }

        // Anything else starting with a colon is still a message, e.g. `:bug: fix crash`
        if let Some(Ok(Command::Menu(action))) = line.strip_prefix(':').map(str::parse::<Command>) {
            return PromptInput::Menu(action);
        }

        PromptInput::Message(line.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_should_parse_menu_actions() {
        assert_eq!(Ok(Command::Menu(MenuAction::Reopen)), "open".parse());
        assert_eq!(Ok(Command::Menu(MenuAction::ForcePush)), " push ".parse());
        assert_eq!(Ok(Command::Menu(MenuAction::Pull)), "pull".parse());
        assert_eq!(Ok(Command::Menu(MenuAction::Fetch)), "fetch".parse());
        assert_eq!(Ok(Command::Menu(MenuAction::Exit)), "quit".parse());
    }

    #[test]
    fn it_should_parse_window_commands() {
        assert_eq!(Ok(Command::StartMonitoring), "start".parse());
        assert_eq!(Ok(Command::StopMonitoring), "stop".parse());
        assert_eq!(Ok(Command::Minimize), "hide".parse());
        assert_eq!(Ok(Command::Help), "help".parse());
    }

    #[test]
    fn it_should_parse_settings_with_spaces() {
        assert_eq!(
            Ok(Command::Set(
                String::from("watch"),
                String::from("/home/me/My Projects")
            )),
            "set watch /home/me/My Projects".parse()
        );
    }

    #[test]
    fn it_should_fail_on_unknown_or_incomplete_commands() {
        assert!("dance".parse::<Command>().is_err());
        assert!("set watch".parse::<Command>().is_err());
        assert!("push now".parse::<Command>().is_err());
    }

    #[test]
    fn it_should_parse_prompt_input() {
        assert_eq!(PromptInput::Cancel, PromptInput::parse(" :cancel "));
        assert_eq!(PromptInput::AcceptSuggestion, PromptInput::parse(":default"));
        assert_eq!(
            PromptInput::Menu(MenuAction::Exit),
            PromptInput::parse(":exit")
        );
        assert_eq!(
            PromptInput::Menu(MenuAction::ForcePush),
            PromptInput::parse(":push")
        );
        assert_eq!(
            PromptInput::Message(String::from("exit")),
            PromptInput::parse("exit")
        );
        assert_eq!(
            PromptInput::Message(String::from(":bug: fix crash")),
            PromptInput::parse(":bug: fix crash")
        );
        assert_eq!(
            PromptInput::Message(String::from(":start")),
            PromptInput::parse(":start")
        );
    }
}
