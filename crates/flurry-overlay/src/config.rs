//! Tuning for the built-in drawers, read from the `[overlays]` config section

use crate::drawers::{Orbit, Pulse, Sparkle, Steam};
use serde::{Deserialize, Serialize};

/// Parameters of each built-in drawer. Missing tables keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub sparkle: Sparkle,
    pub orbit: Orbit,
    pub pulse: Pulse,
    pub steam: Steam,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_table_keeps_other_defaults() {
        let config: OverlayConfig = toml::from_str(
            r#"
            [orbit]
            count = 9
            period = 3.0
            "#,
        )
        .expect("parses");
        assert_eq!(config.orbit.count, 9);
        assert_eq!(config.orbit.period, 3.0);
        assert_eq!(config.orbit.item_radius, Orbit::default().item_radius);
        assert_eq!(config.pulse, Pulse::default());
    }
}
