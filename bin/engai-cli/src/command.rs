use engai_types::ModelTier;

pub const HELP: &str = "\
/attach <path>   attach a PDF or image to the next question
/detach          drop the pending attachment
/model flash|pro switch model tier
/history         print the transcript
/quit            end the session";

/// One line of user input.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Say(String),
    Attach(String),
    Detach,
    Model(ModelTier),
    History,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Command::Say(line.to_owned());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };
        match name {
            "attach" if !arg.is_empty() => Command::Attach(arg.to_owned()),
            "detach" => Command::Detach,
            "model" => Command::Model(ModelTier::from_form_value(Some(arg))),
            "history" => Command::History,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => Command::Unknown(trimmed.to_owned()),
        }
    }
}
