//! Keys understood by the controller and roving-focus movement.

/// Terminal-independent key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Enter,
    Space,
    Tab,
    BackTab,
    Char(char),
}

impl Key {
    pub const fn is_activation(self) -> bool {
        matches!(self, Self::Enter | Self::Space)
    }
}

/// Orientation of a focus group; decides which arrows move focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Vertical,
    Horizontal,
}

/// New focus index after `key` inside a group of `len` items.
///
/// Arrows along `axis` wrap at both ends, Home/End jump to the first and
/// last item. Keys that do not move focus return `None`, as does an empty
/// group.
pub const fn move_focus(current: Option<usize>, len: usize, key: Key, axis: Axis) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let last = len - 1;
    let forward = matches!(
        (axis, key),
        (Axis::Vertical, Key::Down) | (Axis::Horizontal, Key::Right)
    );
    let backward = matches!(
        (axis, key),
        (Axis::Vertical, Key::Up) | (Axis::Horizontal, Key::Left)
    );
    if forward {
        return Some(match current {
            Some(i) if i < last => i + 1,
            _ => 0,
        });
    }
    if backward {
        return Some(match current {
            Some(0) | None => last,
            Some(i) => i - 1,
        });
    }
    match key {
        Key::Home => Some(0),
        Key::End => Some(last),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrows_wrap_at_both_ends() {
        assert_eq!(move_focus(Some(2), 3, Key::Down, Axis::Vertical), Some(0));
        assert_eq!(move_focus(Some(0), 3, Key::Up, Axis::Vertical), Some(2));
        assert_eq!(move_focus(Some(1), 3, Key::Right, Axis::Horizontal), Some(2));
        assert_eq!(move_focus(Some(0), 3, Key::Left, Axis::Horizontal), Some(2));
    }

    #[test]
    fn test_cross_axis_arrows_are_ignored() {
        assert_eq!(move_focus(Some(1), 3, Key::Right, Axis::Vertical), None);
        assert_eq!(move_focus(Some(1), 3, Key::Down, Axis::Horizontal), None);
    }

    #[test]
    fn test_home_end_and_unfocused_start() {
        assert_eq!(move_focus(Some(1), 4, Key::Home, Axis::Vertical), Some(0));
        assert_eq!(move_focus(None, 4, Key::End, Axis::Horizontal), Some(3));
        assert_eq!(move_focus(None, 4, Key::Down, Axis::Vertical), Some(0));
        assert_eq!(move_focus(None, 4, Key::Up, Axis::Vertical), Some(3));
    }

    #[test]
    fn test_empty_group() {
        assert_eq!(move_focus(None, 0, Key::Down, Axis::Vertical), None);
    }
}
