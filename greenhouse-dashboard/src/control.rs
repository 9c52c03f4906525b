use greenhouse_api::{ControlMode, ControlState};

/// Mode a control moves to on the next toggle.
///
/// Three-state controls cycle `OFF -> ON -> AUTO -> OFF`. Two-state controls
/// flip between `ON` and `OFF`; one found in `AUTO` falls back to `ON`.
pub fn next_state(current: ControlMode, allow_auto: bool) -> ControlMode {
    match (current, allow_auto) {
        (ControlMode::Off, _) => ControlMode::On,
        (ControlMode::On, true) => ControlMode::Auto,
        (ControlMode::On, false) => ControlMode::Off,
        (ControlMode::Auto, true) => ControlMode::Off,
        (ControlMode::Auto, false) => ControlMode::On,
    }
}

pub fn toggle(control: &ControlState) -> ControlState {
    ControlState {
        state: next_state(control.state, control.allow_auto),
        ..control.clone()
    }
}

pub fn default_controls() -> Vec<ControlState> {
    vec![
        ControlState::new("Irrigation", ControlMode::On, false),
        ControlState::new("Lighting", ControlMode::On, true),
        ControlState::new("Ventilation", ControlMode::Off, false),
        ControlState::new("Heating", ControlMode::On, false),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_state_cycle() {
        let mut control = ControlState::new("Lighting", ControlMode::Off, true);

        control = toggle(&control);
        assert_eq!(control.state, ControlMode::On);
        control = toggle(&control);
        assert_eq!(control.state, ControlMode::Auto);
        control = toggle(&control);
        assert_eq!(control.state, ControlMode::Off);
    }

    #[test]
    fn test_two_state_cycle() {
        for start in [ControlMode::On, ControlMode::Off] {
            let control = ControlState::new("Heating", start, false);
            let once = toggle(&control);
            assert_ne!(once.state, start);
            assert_ne!(once.state, ControlMode::Auto);
            assert_eq!(toggle(&once), control);
        }
    }

    #[test]
    fn test_two_state_leaves_auto() {
        assert_eq!(next_state(ControlMode::Auto, false), ControlMode::On);
    }

    #[test]
    fn test_toggle_keeps_identity() {
        let control = ControlState::new("Ventilation", ControlMode::Off, false);
        let toggled = toggle(&control);

        assert_eq!(toggled.name, "Ventilation");
        assert!(!toggled.allow_auto);
    }

    #[test]
    fn test_default_controls() {
        let controls = default_controls();
        let names: Vec<&str> = controls.iter().map(|c| c.name.as_str()).collect();

        assert_eq!(names, ["Irrigation", "Lighting", "Ventilation", "Heating"]);
        assert_eq!(controls.iter().filter(|c| c.allow_auto).count(), 1);
        assert_eq!(controls[2].state, ControlMode::Off);
    }
}
