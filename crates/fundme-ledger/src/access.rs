use fundme_types::{Address, FundMeError, Result};
use serde::{Deserialize, Serialize};

/// Single-owner guard, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ownership {
    owner: Address,
}

impl Ownership {
    pub fn new(owner: Address) -> Self {
        Ownership { owner }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Fails with `NotOwner` for any caller other than the owner
    pub fn require_owner(&self, caller: &Address) -> Result<()> {
        if *caller != self.owner {
            return Err(FundMeError::NotOwner(*caller));
        }
        Ok(())
    }
}
