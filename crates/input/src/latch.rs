use std::collections::BTreeMap;

use skate_common::FrameInput;

use crate::action::Action;

/// Key to action table. Keys are matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    keys: BTreeMap<char, Action>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = Self {
            keys: BTreeMap::new(),
        };
        bindings.bind('q', Action::Left);
        bindings.bind('e', Action::Right);
        bindings.bind('t', Action::Jump);
        bindings.bind('g', Action::Restart);
        bindings
    }
}

impl KeyBindings {
    /// Bind `key` to `action`, replacing any previous binding of that key.
    pub fn bind(&mut self, key: char, action: Action) -> Option<Action> {
        self.keys.insert(key.to_ascii_lowercase(), action)
    }

    pub fn unbind(&mut self, key: char) -> Option<Action> {
        self.keys.remove(&key.to_ascii_lowercase())
    }

    pub fn action_for(&self, key: char) -> Option<Action> {
        self.keys.get(&key.to_ascii_lowercase()).copied()
    }

    /// Every key currently bound to `action`.
    pub fn keys_for(&self, action: Action) -> Vec<char> {
        self.keys
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|(k, _)| *k)
            .collect()
    }
}

/// Edge-triggered action flags recorded between frames.
///
/// The host input layer calls `press` whenever a key fires; the frame loop
/// calls `take` once at the start of each update.
#[derive(Debug, Clone, Default)]
pub struct InputLatch {
    pending: FrameInput,
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, action: Action) {
        let slot = match action {
            Action::Left => &mut self.pending.left,
            Action::Right => &mut self.pending.right,
            Action::Jump => &mut self.pending.jump,
            Action::Restart => &mut self.pending.restart,
        };
        if *slot {
            tracing::trace!(%action, "coalesced repeated press");
        }
        *slot = true;
    }

    /// Press whatever `key` is bound to. Returns the action, if any.
    pub fn press_key(&mut self, key: char, bindings: &KeyBindings) -> Option<Action> {
        let action = bindings.action_for(key)?;
        self.press(action);
        Some(action)
    }

    pub fn is_pending(&self, action: Action) -> bool {
        match action {
            Action::Left => self.pending.left,
            Action::Right => self.pending.right,
            Action::Jump => self.pending.jump,
            Action::Restart => self.pending.restart,
        }
    }

    /// Hand over the latched actions and clear every flag.
    pub fn take(&mut self) -> FrameInput {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings() {
        let b = KeyBindings::default();
        assert_eq!(b.action_for('q'), Some(Action::Left));
        assert_eq!(b.action_for('E'), Some(Action::Right));
        assert_eq!(b.action_for('t'), Some(Action::Jump));
        assert_eq!(b.action_for('g'), Some(Action::Restart));
        assert_eq!(b.action_for('x'), None);
    }

    #[test]
    fn rebinding_replaces_key() {
        let mut b = KeyBindings::default();
        assert_eq!(b.bind('t', Action::Restart), Some(Action::Jump));
        b.bind(' ', Action::Jump);
        assert_eq!(b.keys_for(Action::Jump), vec![' ']);
        assert_eq!(b.unbind('q'), Some(Action::Left));
        assert!(b.keys_for(Action::Left).is_empty());
    }

    #[test]
    fn take_clears_flags() {
        let mut latch = InputLatch::new();
        latch.press(Action::Jump);
        assert!(latch.is_pending(Action::Jump));
        let input = latch.take();
        assert!(input.jump);
        assert!(!input.left);
        assert!(latch.take().is_empty());
    }

    #[test]
    fn repeated_presses_coalesce() {
        let mut latch = InputLatch::new();
        for _ in 0..5 {
            latch.press(Action::Left);
        }
        let input = latch.take();
        assert_eq!(
            input,
            FrameInput {
                left: true,
                ..FrameInput::default()
            }
        );
    }

    #[test]
    fn press_key_resolves_binding() {
        let bindings = KeyBindings::default();
        let mut latch = InputLatch::new();
        assert_eq!(latch.press_key('G', &bindings), Some(Action::Restart));
        assert_eq!(latch.press_key('z', &bindings), None);
        assert!(latch.take().restart);
    }
}
