use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Named locations with a fixed centre and zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Seahorse,
    Elephant,
    Spiral,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Self::Seahorse, Self::Elephant, Self::Spiral];

    pub fn name(self) -> &'static str {
        match self {
            Self::Seahorse => "seahorse",
            Self::Elephant => "elephant",
            Self::Spiral => "spiral",
        }
    }

    /// `(center_x, center_y, zoom)` for this preset.
    pub fn location(self) -> (f64, f64, f64) {
        match self {
            Self::Seahorse => (-0.745, 0.186, 500.0),
            Self::Elephant => (0.374, 0.214, 200.0),
            Self::Spiral => (-0.748, 0.098, 10000.0),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| CoreError::UnknownPreset(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_table() {
        assert_eq!(Preset::Seahorse.location(), (-0.745, 0.186, 500.0));
        assert_eq!(Preset::Elephant.location(), (0.374, 0.214, 200.0));
        assert_eq!(Preset::Spiral.location(), (-0.748, 0.098, 10000.0));
    }

    #[test]
    fn parse_names() {
        assert_eq!("Seahorse".parse::<Preset>(), Ok(Preset::Seahorse));
        assert_eq!("spiral".parse::<Preset>(), Ok(Preset::Spiral));
        assert!(matches!(
            "valley".parse::<Preset>(),
            Err(CoreError::UnknownPreset(name)) if name == "valley"
        ));
    }
}
