use crate::models::ProfileField;
use std::fmt;
use std::str::FromStr;

/// Which derived view is on screen.
///
/// Any tab is reachable from any other. Selecting `WhatIf` only arms the
/// debounced re-simulation; it never issues a request by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActiveTab {
    #[default]
    Insight,
    WhatIf,
    Trust,
    Governance,
}

impl ActiveTab {
    pub const ALL: [ActiveTab; 4] = [
        ActiveTab::Insight,
        ActiveTab::WhatIf,
        ActiveTab::Trust,
        ActiveTab::Governance,
    ];

    /// Short name accepted by the console.
    pub fn key(self) -> &'static str {
        match self {
            ActiveTab::Insight => "insight",
            ActiveTab::WhatIf => "whatif",
            ActiveTab::Trust => "trust",
            ActiveTab::Governance => "governance",
        }
    }

    /// Title shown in the tab strip.
    pub fn title(self) -> &'static str {
        match self {
            ActiveTab::Insight => "Insight",
            ActiveTab::WhatIf => "Simulator",
            ActiveTab::Trust => "X-Ray",
            ActiveTab::Governance => "Logs",
        }
    }
}

impl fmt::Display for ActiveTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTab(pub String);

impl fmt::Display for UnknownTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown tab: {} (expected insight, whatif, trust or governance)",
            self.0
        )
    }
}

impl std::error::Error for UnknownTab {}

impl FromStr for ActiveTab {
    type Err = UnknownTab;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ActiveTab::ALL
            .into_iter()
            .find(|tab| tab.key() == wanted || tab.title().to_ascii_lowercase() == wanted)
            .ok_or_else(|| UnknownTab(s.trim().to_string()))
    }
}

// ============ Simulator Sliders ============

/// Presentation bounds of a simulator slider. Applied by the caller, never by the profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

pub const LOAN_AMOUNT_SLIDER: SliderRange = SliderRange {
    min: 1_000.0,
    max: 100_000.0,
    step: 1_000.0,
};

pub const INCOME_SLIDER: SliderRange = SliderRange {
    min: 5_000.0,
    max: 250_000.0,
    step: 5_000.0,
};

impl SliderRange {
    /// Slider for a field, if the simulator exposes one.
    pub fn for_field(field: ProfileField) -> Option<SliderRange> {
        match field {
            ProfileField::LoanAmount => Some(LOAN_AMOUNT_SLIDER),
            ProfileField::Income => Some(INCOME_SLIDER),
            _ => None,
        }
    }

    /// Clamps into range and rounds to the nearest step from `min`.
    pub fn snap(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.min;
        }
        let clamped = value.clamp(self.min, self.max);
        let steps = ((clamped - self.min) / self.step).round();
        (self.min + steps * self.step).min(self.max)
    }
}
