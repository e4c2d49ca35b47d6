use serde::{Serialize, Serializer};

/// Severity band for a PM2.5 concentration (µg/m³).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorBand {
    Good,
    Moderate,
    UnhealthySensitive,
    Unhealthy,
    Hazardous,
}

impl ColorBand {
    /// Upper bounds are inclusive. NaN falls through to `Hazardous`.
    pub fn from_pm25(pm25: f64) -> Self {
        if pm25 <= 12.0 {
            ColorBand::Good
        } else if pm25 <= 35.0 {
            ColorBand::Moderate
        } else if pm25 <= 55.0 {
            ColorBand::UnhealthySensitive
        } else if pm25 <= 150.0 {
            ColorBand::Unhealthy
        } else {
            ColorBand::Hazardous
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            ColorBand::Good => "#00FF00",
            ColorBand::Moderate => "#FFFF00",
            ColorBand::UnhealthySensitive => "#FFA500",
            ColorBand::Unhealthy => "#FF0000",
            ColorBand::Hazardous => "#800080",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ColorBand::Good => "Good",
            ColorBand::Moderate => "Moderate",
            ColorBand::UnhealthySensitive => "Unhealthy for Sensitive Groups",
            ColorBand::Unhealthy => "Unhealthy",
            ColorBand::Hazardous => "Hazardous",
        }
    }
}

impl std::fmt::Display for ColorBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.hex())
    }
}

impl Serialize for ColorBand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.hex())
    }
}
