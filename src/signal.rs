use std::fmt;

/// The state of an intersection's traffic signal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LightState {
    #[default]
    Red,
    Green,
}

/// A grid-wide signal phase: which road orientation currently has green.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// Vertical (north-south) roads are green; phase 0.
    #[default]
    Vertical,
    /// Horizontal (east-west) roads are green; phase 1.
    Horizontal,
}

impl Phase {
    /// Both phases, in enumeration order.
    pub const ALL: [Phase; 2] = [Phase::Vertical, Phase::Horizontal];

    /// The numeric phase, 0 for vertical and 1 for horizontal.
    pub fn index(self) -> u8 {
        match self {
            Phase::Vertical => 0,
            Phase::Horizontal => 1,
        }
    }

    /// Gets the phase with the given numeric index.
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// The other phase.
    pub fn opposite(self) -> Self {
        match self {
            Phase::Vertical => Phase::Horizontal,
            Phase::Horizontal => Phase::Vertical,
        }
    }
}

impl fmt::Display for LightState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LightState::Red => "RED",
            LightState::Green => "GREEN",
        })
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Vertical => write!(f, "0 (vertical green)"),
            Phase::Horizontal => write!(f, "1 (horizontal green)"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn phase_indices() {
        assert_eq!(Phase::from_index(0), Some(Phase::Vertical));
        assert_eq!(Phase::from_index(1), Some(Phase::Horizontal));
        assert_eq!(Phase::from_index(2), None);
        for phase in Phase::ALL {
            assert_eq!(Phase::from_index(phase.index()), Some(phase));
            assert_ne!(phase.opposite(), phase);
        }
    }
}
