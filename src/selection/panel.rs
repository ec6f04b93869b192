use crate::host::LayerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonState {
    pub visible: bool,
    pub enabled: bool,
}

impl ButtonState {
    pub const fn new(visible: bool, enabled: bool) -> Self {
        Self { visible, enabled }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerChoice {
    pub id: LayerId,
    pub name: String,
}

/// Layer picker with its status line and confirm/reset buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionPanel {
    status: String,
    choices: Vec<LayerChoice>,
    chosen: Option<LayerId>,
    confirm: ButtonState,
    reset: ButtonState,
}

impl Default for SelectionPanel {
    fn default() -> Self {
        Self {
            status: "Select a target layer to crop.".to_string(),
            choices: Vec::new(),
            chosen: None,
            confirm: ButtonState::new(true, false),
            reset: ButtonState::new(false, false),
        }
    }
}

impl SelectionPanel {
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn choices(&self) -> &[LayerChoice] {
        &self.choices
    }

    /// Replaces the choices. The current choice survives if it is still offered,
    /// otherwise the first choice (if any) is taken.
    pub fn reset_choices(&mut self, choices: Vec<LayerChoice>) {
        let keep = self
            .chosen
            .filter(|id| choices.iter().any(|choice| choice.id == *id));
        self.chosen = keep.or_else(|| choices.first().map(|choice| choice.id));
        self.choices = choices;
    }

    pub fn chosen(&self) -> Option<LayerId> {
        self.chosen
    }

    /// Chooses the offered layer called `name`. Returns whether one was found.
    pub fn choose(&mut self, name: &str) -> bool {
        match self.choices.iter().find(|choice| choice.name == name) {
            Some(choice) => {
                self.chosen = Some(choice.id);
                true
            }
            None => false,
        }
    }

    pub fn confirm(&self) -> ButtonState {
        self.confirm
    }

    pub fn reset(&self) -> ButtonState {
        self.reset
    }

    pub fn set_confirm_state(&mut self, visible: bool, enabled: bool) {
        self.confirm = ButtonState::new(visible, enabled);
    }

    pub fn set_reset_state(&mut self, visible: bool, enabled: bool) {
        self.reset = ButtonState::new(visible, enabled);
    }
}
