//! Keyboard focus cycling across a fixed set of panes.

/// Ordered ring of `N` panes, exactly one of which has focus.
///
/// `P` is usually a small `Copy` enum naming the panes.
#[derive(Debug, Clone)]
pub struct FocusRing<P, const N: usize> {
    panes: [P; N],
    focused: usize,
}

impl<P: Copy + PartialEq, const N: usize> FocusRing<P, N> {
    /// Create a ring in the given order, focusing the first pane.
    pub fn new(panes: [P; N]) -> Self {
        Self { panes, focused: 0 }
    }

    /// The pane that has focus.
    pub fn current(&self) -> P {
        self.panes[self.focused]
    }

    /// Advance, wrapping after the last pane.
    pub fn next(&mut self) -> P {
        self.focused = (self.focused + 1) % N;
        self.current()
    }

    /// Step back, wrapping before the first pane.
    pub fn prev(&mut self) -> P {
        self.focused = (self.focused + N - 1) % N;
        self.current()
    }

    /// Focus `pane`.  Panes not in the ring are ignored.
    pub fn focus(&mut self, pane: P) {
        if let Some(i) = self.panes.iter().position(|p| *p == pane) {
            self.focused = i;
        }
    }

    /// Whether `pane` has focus.
    pub fn is_focused(&self, pane: P) -> bool {
        self.current() == pane
    }
}
