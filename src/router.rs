//! Which screen is showing. Never persisted: on reload the view is derived
//! from the stored [`Mode`].

use crate::state::Mode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    KidHome,
    CheckIn,
    Repair,
    Saplings,
    Upload,
    Story,
    BadgeAwarded,
    DevUnlock,
    DevDashboard,
}

impl View {
    pub fn default_for(mode: Mode) -> Self {
        match mode {
            Mode::Dev => View::DevDashboard,
            Mode::Kid => View::KidHome,
        }
    }
}

/// Single current-view holder. No history: going back means an explicit
/// navigation to another view.
#[derive(Debug)]
pub struct Router {
    current: View,
}

impl Router {
    pub fn new(mode: Mode) -> Self {
        Self { current: View::default_for(mode) }
    }

    pub fn current(&self) -> View {
        self.current
    }

    /// Returns true when the view actually changed.
    pub fn navigate(&mut self, to: View) -> bool {
        let changed = self.current != to;
        self.current = to;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_view_follows_mode() {
        assert_eq!(Router::new(Mode::Kid).current(), View::KidHome);
        assert_eq!(Router::new(Mode::Dev).current(), View::DevDashboard);
    }

    #[test]
    fn navigate_reports_change() {
        let mut r = Router::new(Mode::Kid);
        assert!(r.navigate(View::CheckIn));
        assert!(!r.navigate(View::CheckIn));
        assert_eq!(r.current(), View::CheckIn);
    }
}
