// Keyboard shortcut router - fixed chord to tab slot mapping

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Alt,
    Ctrl,
    Meta,
    Shift,
}

/// A key press as reported by the input surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub modifier: Modifier,
    pub key: char,
    /// Focus was on a text input or other editable element.
    pub in_editable: bool,
}

impl KeyChord {
    pub fn new(modifier: Modifier, key: char) -> Self {
        Self {
            modifier,
            key,
            in_editable: false,
        }
    }

    pub fn in_editable(mut self) -> Self {
        self.in_editable = true;
        self
    }
}

/// Alt + home-row letters select the first four tabs.
pub const DEFAULT_BINDINGS: [(Modifier, char); 4] = [
    (Modifier::Alt, 'a'),
    (Modifier::Alt, 's'),
    (Modifier::Alt, 'd'),
    (Modifier::Alt, 'f'),
];

#[derive(Debug, Clone)]
pub struct ShortcutRouter {
    slots: Vec<(Modifier, char)>,
}

impl ShortcutRouter {
    /// The n-th binding selects tab slot n.
    pub fn new(slots: Vec<(Modifier, char)>) -> Self {
        Self { slots }
    }

    pub fn slot_for(&self, chord: &KeyChord) -> Option<usize> {
        self.slots.iter().position(|(modifier, key)| {
            *modifier == chord.modifier && key.eq_ignore_ascii_case(&chord.key)
        })
    }

    /// Tab index a chord should switch to, or `None` when it must be ignored.
    pub fn route(&self, chord: &KeyChord, tab_count: usize, active: usize) -> Option<usize> {
        if chord.in_editable {
            return None;
        }
        let slot = self.slot_for(chord)?;
        (slot < tab_count && slot != active).then_some(slot)
    }
}

impl Default for ShortcutRouter {
    fn default() -> Self {
        Self::new(DEFAULT_BINDINGS.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_selects_slot() {
        let router = ShortcutRouter::default();
        assert_eq!(router.route(&KeyChord::new(Modifier::Alt, 's'), 3, 0), Some(1));
        assert_eq!(router.route(&KeyChord::new(Modifier::Alt, 'D'), 3, 0), Some(2));
    }

    #[test]
    fn test_route_ignores() {
        let router = ShortcutRouter::default();
        // editable focus
        assert_eq!(
            router.route(&KeyChord::new(Modifier::Alt, 's').in_editable(), 3, 0),
            None
        );
        // slot beyond tab count
        assert_eq!(router.route(&KeyChord::new(Modifier::Alt, 'f'), 3, 0), None);
        // already active
        assert_eq!(router.route(&KeyChord::new(Modifier::Alt, 'a'), 3, 0), None);
        // unbound
        assert_eq!(router.route(&KeyChord::new(Modifier::Ctrl, 'a'), 3, 1), None);
        assert_eq!(router.route(&KeyChord::new(Modifier::Alt, 'x'), 3, 1), None);
    }
}
