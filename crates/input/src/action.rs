use std::fmt;
use std::str::FromStr;

use crate::script::ScriptError;

/// A player command. Key bindings and scripted timelines both resolve to
/// these; the kernel consumes them through `FrameInput`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    /// Shift one lane left.
    Left,
    /// Shift one lane right.
    Right,
    Jump,
    /// Reset the run after game over (or at any time).
    Restart,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Left, Action::Right, Action::Jump, Action::Restart];

    pub fn name(self) -> &'static str {
        match self {
            Action::Left => "left",
            Action::Right => "right",
            Action::Jump => "jump",
            Action::Restart => "restart",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Action::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ScriptError::UnknownAction(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for action in Action::ALL {
            assert_eq!(action.name().parse::<Action>().unwrap(), action);
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(" Jump ".parse::<Action>().unwrap(), Action::Jump);
        assert_eq!("RESTART".parse::<Action>().unwrap(), Action::Restart);
    }

    #[test]
    fn unknown_name_is_an_error() {
        let err = "dash".parse::<Action>().unwrap_err();
        assert!(matches!(err, ScriptError::UnknownAction(ref n) if n == "dash"));
    }

    #[test]
    fn display_uses_name() {
        assert_eq!(Action::Left.to_string(), "left");
    }
}
