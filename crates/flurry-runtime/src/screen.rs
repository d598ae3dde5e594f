//! Which surface owns the screen
//!
//! Normal play sits at the bottom and is implicit. Modal layers (prompts,
//! the pause screen, host-defined overlays) are pushed on top while they are
//! open. The topmost layer decides how the particle and overlay layers
//! behave; any open layer that claims the screen makes the reward's expiry
//! check yield.

/// How an animation layer behaves under the current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayerMode {
    /// Advances and draws
    #[default]
    Live,
    /// Draws its last state without advancing
    Frozen,
    /// Neither advances nor draws
    Hidden,
}

impl LayerMode {
    pub fn advances(self) -> bool {
        self == LayerMode::Live
    }

    pub fn visible(self) -> bool {
        self != LayerMode::Hidden
    }
}

/// Effect a screen has on the engine's layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenPolicy {
    pub particles: LayerMode,
    pub overlays: LayerMode,
    /// The screen is owned by something more important than the reward
    pub claims_screen: bool,
}

/// A modal layer opened over normal play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Dialog over a live game
    Prompt,
    /// Everything frozen in place
    Paused,
    Custom(ScreenPolicy),
}

impl Screen {
    pub fn policy(self) -> ScreenPolicy {
        match self {
            Screen::Prompt => ScreenPolicy {
                claims_screen: true,
                ..ScreenPolicy::default()
            },
            Screen::Paused => ScreenPolicy {
                particles: LayerMode::Frozen,
                overlays: LayerMode::Frozen,
                claims_screen: true,
            },
            Screen::Custom(policy) => policy,
        }
    }
}

/// Modal layers above normal play, innermost last
#[derive(Debug, Default)]
pub struct ScreenStack {
    open: Vec<Screen>,
}

impl ScreenStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, screen: Screen) {
        self.open.push(screen);
    }

    /// Close the innermost layer; `None` when only normal play is left
    pub fn close(&mut self) -> Option<Screen> {
        self.open.pop()
    }

    /// Policy of the innermost layer, or normal play
    pub fn active(&self) -> ScreenPolicy {
        self.open
            .last()
            .map(|screen| screen.policy())
            .unwrap_or_default()
    }

    /// True while any open layer claims the screen, even one covered by a
    /// layer that does not
    pub fn holds_rewards(&self) -> bool {
        self.open.iter().any(|screen| screen.policy().claims_screen)
    }

    pub fn is_playing(&self) -> bool {
        self.open.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.open.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_play_runs_everything_and_releases_rewards() {
        let stack = ScreenStack::new();
        assert!(stack.is_playing());
        assert_eq!(stack.active(), ScreenPolicy::default());
        assert!(stack.active().particles.advances());
        assert!(!stack.holds_rewards());
    }

    #[test]
    fn prompt_keeps_animating_but_holds_rewards() {
        let mut stack = ScreenStack::new();
        stack.open(Screen::Prompt);
        assert!(stack.active().particles.advances());
        assert!(stack.active().overlays.advances());
        assert!(stack.holds_rewards());

        assert_eq!(stack.close(), Some(Screen::Prompt));
        assert!(!stack.holds_rewards());
    }

    #[test]
    fn pause_freezes_without_hiding() {
        let mut stack = ScreenStack::new();
        stack.open(Screen::Paused);
        let policy = stack.active();
        assert!(!policy.particles.advances());
        assert!(policy.particles.visible());
        assert!(!policy.overlays.advances());
        assert!(stack.holds_rewards());
    }

    #[test]
    fn covered_claim_still_holds_rewards() {
        let mut stack = ScreenStack::new();
        stack.open(Screen::Paused);
        stack.open(Screen::Custom(ScreenPolicy {
            particles: LayerMode::Hidden,
            ..ScreenPolicy::default()
        }));
        assert!(!stack.active().particles.visible());
        assert!(!stack.active().claims_screen);
        assert!(stack.holds_rewards());

        stack.close();
        assert!(!stack.active().particles.advances());
    }

    #[test]
    fn closing_past_normal_play_is_a_no_op() {
        let mut stack = ScreenStack::new();
        assert_eq!(stack.close(), None);
        stack.open(Screen::Prompt);
        stack.close();
        assert_eq!(stack.close(), None);
        assert_eq!(stack.depth(), 0);
    }
}
