//! End-to-end: discovery → command → ticks → completion on a simulated rig.

use std::time::Duration;

use nacelle_hal::angle::normalize_deg;
use nacelle_hal::sim::SimStator;
use nacelle_hal::stator::Stator;
use nacelle_kernel::ControllerId;
use nacelle_runtime::NacelleDriver;

const TICK: Duration = Duration::from_millis(16);
const MAX_TICKS: usize = 2_000;

fn rig() -> Vec<SimStator> {
    vec![
        SimStator::new("Nacelle Hinge")
            .with_custom_data("~NC_Reference")
            .with_velocity_rpm(8.0),
        SimStator::new("Nacelle Left")
            .with_custom_data("~NC_Mirror")
            .with_velocity_rpm(8.0),
        SimStator::new("Nacelle Right")
            .with_custom_data("~NC_Copy\n~NC_Offset = 10")
            .with_velocity_rpm(8.0),
        SimStator::new("Cargo Door"),
    ]
}

/// Send `argument`, then tick with an empty argument until idle.
fn command(driver: &mut NacelleDriver<SimStator>, argument: &str) -> usize {
    driver.run(argument, TICK).unwrap();
    for ticks in 1..MAX_TICKS {
        for stator in driver.stators_mut() {
            stator.advance(TICK);
        }
        driver.run("", TICK).unwrap();
        if driver.is_idle() {
            return ticks;
        }
    }
    panic!("rig did not settle within {MAX_TICKS} ticks");
}

fn angle_of(driver: &NacelleDriver<SimStator>, id: usize) -> f32 {
    driver
        .controllers()
        .get(ControllerId(id))
        .unwrap()
        .stator()
        .angle_deg()
}

#[test]
fn reference_reaches_ninety_and_relocks() {
    let mut driver = NacelleDriver::new(rig());
    driver.run("90", TICK).unwrap();
    assert_eq!(driver.scheduler().running_len(), 3);

    // Still running until the angle is within tolerance.
    for _ in 0..10 {
        for stator in driver.stators_mut() {
            stator.advance(TICK);
        }
        driver.run("", TICK).unwrap();
    }
    assert!(angle_of(&driver, 0) > 0.0 && angle_of(&driver, 0) < 90.0);
    assert_eq!(driver.scheduler().running_len(), 3);

    let ticks = command(&mut driver, "");
    assert!(ticks > 1);

    let reference = driver.controllers().reference().unwrap().stator();
    assert!((reference.angle_deg() - 90.0).abs() < 0.0035);
    assert!(!reference.is_enabled());
    assert!(reference.safety_lock());
    assert!((reference.upper_limit_deg() - 361.0).abs() < 1e-3);
}

#[test]
fn slaves_mirror_and_copy_the_reference() {
    let mut driver = NacelleDriver::new(rig());
    command(&mut driver, "45");

    assert!((angle_of(&driver, 0) - 45.0).abs() < 1e-3);
    // Mirrored: -45° reported in [0°, 360°).
    assert!((angle_of(&driver, 1) - 315.0).abs() < 1e-3);
    // The offset shifts limits, not the target.
    assert!((angle_of(&driver, 2) - 45.0).abs() < 1e-3);

    for stator in driver.into_stators() {
        assert!(stator.safety_lock());
        assert!(!stator.is_enabled());
    }
}

#[test]
fn target_outside_limits_is_clamped_and_reached() {
    let mut driver = NacelleDriver::new(vec![
        SimStator::new("Hinge")
            .with_custom_data("~NC_Reference\n~NC_LowerLimit=-30\n~NC_UpperLimit=30")
            .with_angle_deg(20.0)
            .with_velocity_rpm(4.0),
    ]);
    command(&mut driver, "170");

    let reference = driver.controllers().reference().unwrap();
    assert!((reference.properties().target_angle_deg().unwrap() - 30.0).abs() < 1e-3);
    assert!((reference.stator().angle_deg() - 30.0).abs() < 1e-3);
    assert!((reference.stator().upper_limit_deg() - 30.0).abs() < 1e-3);
    assert!((reference.stator().lower_limit_deg() + 30.0).abs() < 1e-3);
}

#[test]
fn mirrored_joint_with_limits_stays_inside_its_band() {
    let directive = "\n~NC_LowerLimit=-30\n~NC_UpperLimit=30";
    let mut driver = NacelleDriver::new(vec![
        SimStator::new("Hinge")
            .with_custom_data(format!("~NC_Reference{directive}"))
            .with_velocity_rpm(4.0),
        SimStator::new("Left")
            .with_custom_data(format!("~NC_Mirror{directive}"))
            .with_velocity_rpm(4.0),
    ]);

    let mirrored = driver.controllers().get(ControllerId(1)).unwrap().stator();
    assert!((mirrored.lower_limit_deg() + 30.0).abs() < 1e-3);
    assert!((mirrored.upper_limit_deg() - 30.0).abs() < 1e-3);

    driver.run("10", TICK).unwrap();
    let mut widest = 0.0f32;
    for _ in 0..MAX_TICKS {
        for stator in driver.stators_mut() {
            stator.advance(TICK);
        }
        driver.run("", TICK).unwrap();
        widest = widest.max(normalize_deg(angle_of(&driver, 1)).abs());
        if driver.is_idle() {
            break;
        }
    }

    assert!(driver.is_idle());
    assert!((angle_of(&driver, 0) - 10.0).abs() < 1e-3);
    assert!((angle_of(&driver, 1) - 350.0).abs() < 1e-3);
    assert!(widest <= 10.0 + 1e-3);
}

#[test]
fn new_command_mid_flight_evicts_and_retargets() {
    let mut driver = NacelleDriver::new(rig());
    driver.run("120", TICK).unwrap();
    for _ in 0..20 {
        for stator in driver.stators_mut() {
            stator.advance(TICK);
        }
        driver.run("", TICK).unwrap();
    }
    assert_eq!(driver.scheduler().running_len(), 3);

    driver.run("-20", TICK).unwrap();
    assert_eq!(driver.scheduler().running_len(), 3);

    command(&mut driver, "");
    assert!((angle_of(&driver, 0) - 340.0).abs() < 1e-3);
    assert!((angle_of(&driver, 1) - 20.0).abs() < 1e-3);
}

#[test]
fn rig_without_reference_ignores_commands() {
    let mut driver = NacelleDriver::new(vec![
        SimStator::new("Left").with_custom_data("~NC_Mirror"),
        SimStator::new("Right").with_custom_data("~NC_Copy"),
    ]);
    driver.run("45", TICK).unwrap();

    assert!(driver.is_idle());
    assert!(driver.summary().is_none());
    assert!(driver.status_text().contains("ERROR: No reference stator."));
    for stator in driver.into_stators() {
        assert!(stator.safety_lock());
        assert_eq!(stator.angle_deg(), 0.0);
    }
}

#[test]
fn update_picks_up_changed_directives() {
    let mut driver = NacelleDriver::new(vec![
        SimStator::new("Hinge").with_velocity_rpm(8.0),
        SimStator::new("Left").with_velocity_rpm(8.0),
    ]);
    assert!(driver.summary().is_none());

    for stator in driver.stators_mut() {
        let directive = if stator.name() == "Hinge" {
            "~NC_Reference"
        } else {
            "~NC_Mirror"
        };
        stator.set_custom_data(directive);
    }
    driver.run("update", TICK).unwrap();

    let summary = driver.summary().unwrap();
    assert_eq!(summary.reference, "Hinge");
    assert_eq!(summary.mirrored, 1);

    command(&mut driver, "30");
    assert!((angle_of(&driver, 0) - 30.0).abs() < 1e-3);
    assert!((angle_of(&driver, 1) - 330.0).abs() < 1e-3);
}
