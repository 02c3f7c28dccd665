use super::input::{ActionStates, InputAction};
use super::rendering::DrawSurface;

/// Pressed-key state handed to a scene for exactly one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    actions: ActionStates,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(actions: ActionStates) -> Self {
        Self { actions }
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn any_down(&self) -> bool {
        InputAction::ALL
            .iter()
            .any(|action| self.actions.is_down(*action))
    }
}

/// A scene owns its whole simulation. The host calls `update` once per key
/// press and `render` whenever a frame is needed; the two never interleave.
pub trait Scene {
    fn load(&mut self);
    fn update(&mut self, input: &InputSnapshot);
    fn render(&self, surface: &mut dyn DrawSurface);
    fn unload(&mut self) {}
    fn window_title(&self) -> Option<String> {
        None
    }
}
