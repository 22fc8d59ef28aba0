/// Minimal finite-state-machine container.
///
/// `S` is the state type (usually a fieldless enum). The machine tracks the
/// current state, the previous one, and how many transitions it has taken.
/// **Side effects of a transition are kept out of the machine itself**: the
/// owner checks the return value of [`StateMachine::go`] and reacts.
///
/// # Usage
/// ```
/// use segmask::fsm::StateMachine;
///
/// let mut fsm = StateMachine::new(1u8);
/// assert!(fsm.go(2));
/// assert!(!fsm.go(2));
/// assert_eq!(fsm.previous, 1);
/// ```
#[derive(Debug, Clone)]
pub struct StateMachine<S: Clone + PartialEq> {
    pub state: S,
    pub previous: S,
    transitions: u64,
}

impl<S: Clone + PartialEq> StateMachine<S> {
    pub fn new(initial: S) -> Self {
        Self {
            previous: initial.clone(),
            state: initial,
            transitions: 0,
        }
    }

    /// Transition to `next` only if it differs from the current state.
    /// Returns `true` when a transition happened.
    pub fn go(&mut self, next: S) -> bool {
        if self.state == next {
            return false;
        }
        self.force_go(next);
        true
    }

    /// Like [`go`](Self::go), but **always** transitions, even to the same
    /// state.
    pub fn force_go(&mut self, next: S) {
        self.previous = std::mem::replace(&mut self.state, next);
        self.transitions += 1;
    }

    pub fn transitions(&self) -> u64 {
        self.transitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    enum Light {
        Off,
        On,
    }

    #[test]
    fn go_ignores_same_state() {
        let mut fsm = StateMachine::new(Light::Off);
        assert!(!fsm.go(Light::Off));
        assert_eq!(fsm.transitions(), 0);

        assert!(fsm.go(Light::On));
        assert_eq!(fsm.state, Light::On);
        assert_eq!(fsm.previous, Light::Off);
        assert_eq!(fsm.transitions(), 1);
    }

    #[test]
    fn force_go_always_counts() {
        let mut fsm = StateMachine::new(Light::On);
        fsm.force_go(Light::On);
        assert_eq!(fsm.transitions(), 1);
        assert_eq!(fsm.previous, Light::On);
    }
}
