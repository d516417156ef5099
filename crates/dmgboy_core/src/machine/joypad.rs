use super::interrupts::InterruptFlags;

/// The eight DMG buttons.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Button {
    A,
    B,
    Select,
    Start,
    Right,
    Left,
    Up,
    Down,
}

impl Button {
    pub const ALL: [Button; 8] = [
        Button::A,
        Button::B,
        Button::Select,
        Button::Start,
        Button::Right,
        Button::Left,
        Button::Up,
        Button::Down,
    ];

    /// Whether the button sits on the action row (P15) rather than the
    /// direction row (P14).
    #[inline]
    fn is_action(self) -> bool {
        matches!(self, Button::A | Button::B | Button::Select | Button::Start)
    }

    /// Bit of the P1 low nibble the button pulls down.
    #[inline]
    fn mask(self) -> u8 {
        match self {
            Button::A | Button::Right => 0x01,
            Button::B | Button::Left => 0x02,
            Button::Select | Button::Up => 0x04,
            Button::Start | Button::Down => 0x08,
        }
    }
}

/// P1 ($FF00) button matrix.
///
/// `select` holds P1 bits 5..4 as written (0 selects a row). `actions` and
/// `directions` use bit=1 for "pressed".
pub(crate) struct Joypad {
    select: u8,
    actions: u8,
    directions: u8,
}

impl Default for Joypad {
    fn default() -> Self {
        Self {
            select: 0x30,
            actions: 0,
            directions: 0,
        }
    }
}

impl Joypad {
    /// Active-low input lines P13..P10 for the current row selection.
    ///
    /// Exactly one row must be selected for a button to be visible; with
    /// both rows or neither selected the nibble reads all ones.
    fn lines(&self) -> u8 {
        let actions_selected = self.select & 0x20 == 0;
        let directions_selected = self.select & 0x10 == 0;
        let pressed = match (actions_selected, directions_selected) {
            (true, false) => self.actions,
            (false, true) => self.directions,
            _ => 0,
        };
        !pressed & 0x0F
    }

    pub(crate) fn read(&self) -> u8 {
        0xC0 | self.select | self.lines()
    }

    pub(crate) fn write(&mut self, value: u8, if_reg: &mut InterruptFlags) {
        let before = self.lines();
        self.select = value & 0x30;
        Self::raise_on_press(before, self.lines(), if_reg);
    }

    pub(crate) fn set_button(
        &mut self,
        button: Button,
        pressed: bool,
        if_reg: &mut InterruptFlags,
    ) {
        let before = self.lines();
        let row = if button.is_action() {
            &mut self.actions
        } else {
            &mut self.directions
        };
        if pressed {
            *row |= button.mask();
        } else {
            *row &= !button.mask();
        }
        Self::raise_on_press(before, self.lines(), if_reg);
    }

    /// Request the joypad interrupt when any visible line went 1 → 0.
    #[inline]
    fn raise_on_press(before: u8, after: u8, if_reg: &mut InterruptFlags) {
        if before & !after & 0x0F != 0 {
            if_reg.insert(InterruptFlags::JOYPAD);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unselected_rows_read_all_ones() {
        let mut pad = Joypad::default();
        let mut if_reg = InterruptFlags::empty();
        pad.set_button(Button::A, true, &mut if_reg);
        assert_eq!(pad.read(), 0xFF);
        assert!(if_reg.is_empty());
    }

    #[test]
    fn both_rows_selected_read_all_ones() {
        let mut pad = Joypad::default();
        let mut if_reg = InterruptFlags::empty();
        pad.write(0x00, &mut if_reg);
        pad.set_button(Button::Start, true, &mut if_reg);
        assert_eq!(pad.read() & 0x0F, 0x0F);
    }

    #[test]
    fn action_row_reports_pressed_buttons_active_low() {
        let mut pad = Joypad::default();
        let mut if_reg = InterruptFlags::empty();
        pad.write(0x10, &mut if_reg);
        pad.set_button(Button::B, true, &mut if_reg);
        pad.set_button(Button::Start, true, &mut if_reg);
        assert_eq!(pad.read(), 0xC0 | 0x10 | 0b0101);
        assert!(if_reg.contains(InterruptFlags::JOYPAD));
    }

    #[test]
    fn direction_row_ignores_action_buttons() {
        let mut pad = Joypad::default();
        let mut if_reg = InterruptFlags::empty();
        pad.write(0x20, &mut if_reg);
        pad.set_button(Button::A, true, &mut if_reg);
        assert_eq!(pad.read() & 0x0F, 0x0F);
        assert!(if_reg.is_empty());

        pad.set_button(Button::Down, true, &mut if_reg);
        assert_eq!(pad.read() & 0x0F, 0b0111);
        assert!(if_reg.contains(InterruptFlags::JOYPAD));
    }

    #[test]
    fn release_does_not_raise_interrupt() {
        let mut pad = Joypad::default();
        let mut if_reg = InterruptFlags::empty();
        pad.write(0x10, &mut if_reg);
        pad.set_button(Button::A, true, &mut if_reg);
        if_reg = InterruptFlags::empty();
        pad.set_button(Button::A, false, &mut if_reg);
        assert!(if_reg.is_empty());
        assert_eq!(pad.read() & 0x0F, 0x0F);
    }

    #[test]
    fn selecting_a_row_with_a_held_button_raises_interrupt() {
        let mut pad = Joypad::default();
        let mut if_reg = InterruptFlags::empty();
        pad.set_button(Button::Left, true, &mut if_reg);
        assert!(if_reg.is_empty());
        pad.write(0x20, &mut if_reg);
        assert!(if_reg.contains(InterruptFlags::JOYPAD));
    }
}
