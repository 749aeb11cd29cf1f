//! This module provides ways to tweak mocked storages and seed sources, so that they can return errors on some tests
#![cfg(any(test, feature = "mocked_storage"))]

use std::error::Error;

/// This stores some behaviour tweaks, that describe how a mocked instance will behave during a given test
///
/// So that a functions fails _n_ times after _m_ initial successes, set `(m, n)` for the suited parameter
#[derive(Default, Clone, Debug)]
pub struct MockBehaviour {
    /// If this is true, every action will be allowed
    pub is_suspended: bool,

    // From the KeyValueStore trait
    pub get_behaviour: (u32, u32),
    pub set_behaviour: (u32, u32),

    // From the SeedSource trait
    pub fetch_behaviour: (u32, u32),
}

impl MockBehaviour {
    pub fn new() -> Self {
        Self::default()
    }

    /// All actions will fail at once, for `n_fails` times
    pub fn fail_now(n_fails: u32) -> Self {
        Self {
            is_suspended: false,
            get_behaviour: (0, n_fails),
            set_behaviour: (0, n_fails),
            fetch_behaviour: (0, n_fails),
        }
    }

    /// Suspend this mock behaviour until you call `resume`
    pub fn suspend(&mut self) {
        self.is_suspended = true;
    }
    /// Make this behaviour active again
    pub fn resume(&mut self) {
        self.is_suspended = false;
    }

    pub fn can_get(&mut self) -> Result<(), Box<dyn Error>> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.get_behaviour, "get")
    }
    pub fn can_set(&mut self) -> Result<(), Box<dyn Error>> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.set_behaviour, "set")
    }
    pub fn can_fetch(&mut self) -> Result<(), Box<dyn Error>> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.fetch_behaviour, "fetch")
    }
}


/// Return Ok(()) in case the value is `(1+, _)` or `(_, 0)`, or return Err and decrement otherwise
fn decrement(value: &mut (u32, u32), descr: &str) -> Result<(), Box<dyn Error>> {
    let remaining_successes = value.0;
    let remaining_failures = value.1;

    if remaining_successes > 0 {
        value.0 -= 1;
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    } else if remaining_failures > 0 {
        value.1 -= 1;
        log::debug!("Mock behaviour: failing a {} ({:?})", descr, value);
        Err(format!("Mocked behaviour requires this {} to fail this time. ({:?})", descr, value).into())
    } else {
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_mock_behaviour() {
        let mut ok = MockBehaviour::new();
        assert!(ok.can_get().is_ok());
        assert!(ok.can_set().is_ok());
        assert!(ok.can_fetch().is_ok());

        let mut now = MockBehaviour::fail_now(2);
        assert!(now.can_set().is_err());
        assert!(now.can_get().is_err());
        assert!(now.can_set().is_err());
        assert!(now.can_set().is_ok());
        assert!(now.can_get().is_err());
        assert!(now.can_get().is_ok());

        let mut custom = MockBehaviour{
            set_behaviour: (1,2),
            ..MockBehaviour::default()
        };
        assert!(custom.can_set().is_ok());
        assert!(custom.can_set().is_err());
        custom.suspend();
        assert!(custom.can_set().is_ok());
        custom.resume();
        assert!(custom.can_set().is_err());
        assert!(custom.can_set().is_ok());
        assert!(custom.can_fetch().is_ok());
    }
}
