//! Modifier-key state and one-shot action gates.

use bitflags::bitflags;

bitflags! {
    /// Which modifier keys the host currently reports as held.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        const LEFT_CONTROL  = 1 << 0;
        const RIGHT_CONTROL = 1 << 1;
        const LEFT_ALT      = 1 << 2;
        const RIGHT_ALT     = 1 << 3;
        const LEFT_SHIFT    = 1 << 4;
        const RIGHT_SHIFT   = 1 << 5;
    }
}

impl Modifiers {
    pub fn ctrl(self) -> bool {
        self.intersects(Self::LEFT_CONTROL | Self::RIGHT_CONTROL)
    }

    pub fn alt(self) -> bool {
        self.intersects(Self::LEFT_ALT | Self::RIGHT_ALT)
    }

    pub fn shift(self) -> bool {
        self.intersects(Self::LEFT_SHIFT | Self::RIGHT_SHIFT)
    }

    /// Ctrl-chords require ctrl held with no alt and no shift.
    pub fn is_plain_ctrl(self) -> bool {
        self.ctrl() && !self.alt() && !self.shift()
    }
}

bitflags! {
    /// Gated key actions. A gate is consumed when its action runs and
    /// re-armed by the host on key release, so a held key acts once per
    /// physical press no matter how often the handler chain runs.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ActionGates: u16 {
        const BACKSPACE      = 1 << 0;
        const ENTER_KEY      = 1 << 1;
        const CTRL_C         = 1 << 2;
        const CTRL_W         = 1 << 3;
        const PAGE_UP        = 1 << 4;
        const PAGE_DOWN      = 1 << 5;
        const HOME           = 1 << 6;
        const END            = 1 << 7;
        const PREVIOUS_INPUT = 1 << 8;
        const NEXT_INPUT     = 1 << 9;
        const TAB            = 1 << 10;
    }
}

impl Default for ActionGates {
    fn default() -> Self {
        Self::all()
    }
}

impl ActionGates {
    /// Consume `gate`: true exactly once per arming.
    pub fn take(&mut self, gate: ActionGates) -> bool {
        if self.contains(gate) {
            self.remove(gate);
            true
        } else {
            false
        }
    }

    pub fn arm(&mut self, gate: ActionGates) {
        self.insert(gate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn either_control_key_counts_as_ctrl() {
        assert!(Modifiers::LEFT_CONTROL.ctrl());
        assert!(Modifiers::RIGHT_CONTROL.ctrl());
        assert!(!Modifiers::LEFT_SHIFT.ctrl());
    }

    #[test]
    fn plain_ctrl_excludes_alt_and_shift() {
        assert!(Modifiers::LEFT_CONTROL.is_plain_ctrl());
        assert!(!(Modifiers::LEFT_CONTROL | Modifiers::LEFT_ALT).is_plain_ctrl());
        assert!(!(Modifiers::RIGHT_CONTROL | Modifiers::RIGHT_SHIFT).is_plain_ctrl());
        assert!(!Modifiers::empty().is_plain_ctrl());
    }

    #[test]
    fn gates_start_armed_and_fire_once() {
        let mut gates = ActionGates::default();
        assert!(gates.take(ActionGates::BACKSPACE));
        assert!(!gates.take(ActionGates::BACKSPACE));
        gates.arm(ActionGates::BACKSPACE);
        assert!(gates.take(ActionGates::BACKSPACE));
    }

    #[test]
    fn gates_are_independent() {
        let mut gates = ActionGates::default();
        assert!(gates.take(ActionGates::ENTER_KEY));
        assert!(gates.take(ActionGates::TAB));
        assert!(!gates.take(ActionGates::ENTER_KEY));
    }
}
