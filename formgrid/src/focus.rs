use crate::document::InputId;

/// Where keyboard focus currently sits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusTarget {
    /// The off-screen proxy input that captures navigation keys.
    Proxy,
    /// An input inside the grid.
    Input(InputId),
}

/// Tracks which element is currently focused and whether its text is selected.
#[derive(Debug, Default)]
pub struct FocusState {
    focused: Option<FocusTarget>,
    selected: bool,
}

impl FocusState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the currently focused target.
    pub fn focused(&self) -> Option<&FocusTarget> {
        self.focused.as_ref()
    }

    /// Get the focused grid input, if focus is inside the grid.
    pub fn focused_input(&self) -> Option<&InputId> {
        match &self.focused {
            Some(FocusTarget::Input(id)) => Some(id),
            _ => None,
        }
    }

    pub fn is_proxy(&self) -> bool {
        matches!(self.focused, Some(FocusTarget::Proxy))
    }

    /// Whether the focused input has its whole content selected.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Move focus to a target.
    /// Returns true if focus changed.
    pub fn focus(&mut self, target: FocusTarget) -> bool {
        if self.focused.as_ref() == Some(&target) {
            return false;
        }
        self.focused = Some(target);
        self.selected = false;
        true
    }

    /// Focus an input and select its content.
    pub fn focus_and_select(&mut self, id: InputId) {
        self.focus(FocusTarget::Input(id));
        self.selected = true;
    }

    /// Drop the text selection, e.g. once the user starts editing.
    pub fn clear_selection(&mut self) {
        self.selected = false;
    }
}
