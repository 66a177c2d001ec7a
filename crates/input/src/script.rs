use std::str::FromStr;

use skate_common::FrameInput;

use crate::action::Action;
use crate::latch::InputLatch;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("unknown action: {0:?}")]
    UnknownAction(String),
    #[error("malformed entry {entry:?}: expected `frame:action`")]
    Malformed { entry: String },
    #[error("invalid frame number in {entry:?}")]
    InvalidFrame { entry: String },
}

/// A timeline of actions keyed by frame number, for headless and replayed
/// runs. Text form: `"240:jump, 300:left, 900:restart"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputScript {
    /// Sorted by frame; entries on the same frame keep their written order.
    entries: Vec<(u64, Action)>,
}

impl InputScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: u64, action: Action) {
        let at = self.entries.partition_point(|(f, _)| *f <= frame);
        self.entries.insert(at, (frame, action));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last_frame(&self) -> Option<u64> {
        self.entries.last().map(|(f, _)| *f)
    }

    pub fn actions_at(&self, frame: u64) -> impl Iterator<Item = Action> + '_ {
        let start = self.entries.partition_point(|(f, _)| *f < frame);
        self.entries[start..]
            .iter()
            .take_while(move |(f, _)| *f == frame)
            .map(|(_, a)| *a)
    }

    /// Latch every action scheduled on `frame` and return the frame input.
    pub fn input_at(&self, frame: u64) -> FrameInput {
        let mut latch = InputLatch::new();
        for action in self.actions_at(frame) {
            latch.press(action);
        }
        latch.take()
    }
}

impl FromStr for InputScript {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut script = InputScript::new();
        for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (frame, action) = entry.split_once(':').ok_or_else(|| ScriptError::Malformed {
                entry: entry.to_string(),
            })?;
            let frame: u64 = frame.trim().parse().map_err(|_| ScriptError::InvalidFrame {
                entry: entry.to_string(),
            })?;
            script.push(frame, action.parse()?);
        }
        Ok(script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_sorts_entries() {
        let script: InputScript = "300:left, 240:jump,300:right".parse().unwrap();
        assert_eq!(script.len(), 3);
        assert_eq!(script.last_frame(), Some(300));
        assert_eq!(script.actions_at(240).collect::<Vec<_>>(), vec![Action::Jump]);
        assert_eq!(
            script.actions_at(300).collect::<Vec<_>>(),
            vec![Action::Left, Action::Right]
        );
        assert_eq!(script.actions_at(1).count(), 0);
    }

    #[test]
    fn empty_text_is_empty_script() {
        let script: InputScript = " ".parse().unwrap();
        assert!(script.is_empty());
        assert_eq!(script.last_frame(), None);
    }

    #[test]
    fn input_at_latches_scheduled_actions() {
        let script: InputScript = "10:jump,10:jump,10:restart".parse().unwrap();
        let input = script.input_at(10);
        assert!(input.jump && input.restart);
        assert!(!input.left);
        assert!(script.input_at(11).is_empty());
    }

    #[test]
    fn malformed_entries_are_rejected() {
        assert_eq!(
            "jump".parse::<InputScript>().unwrap_err(),
            ScriptError::Malformed {
                entry: "jump".into()
            }
        );
        assert!(matches!(
            "x:jump".parse::<InputScript>(),
            Err(ScriptError::InvalidFrame { .. })
        ));
        assert!(matches!(
            "5:fly".parse::<InputScript>(),
            Err(ScriptError::UnknownAction(_))
        ));
    }
}
