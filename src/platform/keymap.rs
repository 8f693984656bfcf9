//! Keyboard mapping
//!
//! Uses `KeyboardEvent.key` values so the mapping is layout-independent.

use crate::sim::InputAction;

/// Logical action for a DOM key value, if any
pub fn action_for_key(key: &str) -> Option<InputAction> {
    match key {
        "ArrowRight" | "d" | "D" => Some(InputAction::MoveForward),
        "ArrowLeft" | "a" | "A" => Some(InputAction::MoveBackward),
        " " | "ArrowUp" | "w" | "W" => Some(InputAction::Jump),
        "r" | "R" => Some(InputAction::Restart),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping() {
        assert_eq!(action_for_key("ArrowRight"), Some(InputAction::MoveForward));
        assert_eq!(action_for_key("a"), Some(InputAction::MoveBackward));
        assert_eq!(action_for_key(" "), Some(InputAction::Jump));
        assert_eq!(action_for_key("R"), Some(InputAction::Restart));
        assert_eq!(action_for_key("Escape"), None);
    }
}
