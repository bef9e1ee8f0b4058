use std::fmt;
use std::str::FromStr;

/// Desk a race volunteer works at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Registration,
    StartFinish,
    Manager,
}

/// Group of write operations guarded together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// Register and edit racers, hand out numbers
    Register,
    /// Start and finish racers, work the finish log and pauses
    Timing,
    /// Time overrides, deletes and checkpoints
    Manage,
}

impl Role {
    pub fn permissions(&self) -> &'static [Permission] {
        match self {
            Self::Registration => &[Permission::Register],
            Self::StartFinish => &[Permission::Timing],
            Self::Manager => &[Permission::Register, Permission::Timing, Permission::Manage],
        }
    }

    pub fn allows(&self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "registration" => Ok(Self::Registration),
            "startfinish" | "start_finish" | "start-finish" => Ok(Self::StartFinish),
            "manager" => Ok(Self::Manager),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Registration => "registration",
            Self::StartFinish => "start_finish",
            Self::Manager => "manager",
        };
        f.write_str(name)
    }
}
