//! Motor list and action-key derivation for SO100 arms.

use std::collections::BTreeMap;

use telegrip_types::{ArmSide, FeatureKind};

/// SO100 motors in the order the control subsystem reports their angles.
pub const MOTOR_NAMES: [&str; 6] = [
    "shoulder_pan",
    "shoulder_lift",
    "elbow_flex",
    "wrist_flex",
    "wrist_roll",
    "gripper",
];

/// Arms polled for one action record.  A single-arm setup drives the right
/// follower.
pub fn polled_sides(bimanual: bool) -> &'static [ArmSide] {
    if bimanual {
        &[ArmSide::Left, ArmSide::Right]
    } else {
        &[ArmSide::Right]
    }
}

/// Action key of `motor` on `side`, e.g. `left_gripper.pos` or `gripper.pos`.
pub fn action_key(bimanual: bool, side: ArmSide, motor: &str) -> String {
    if bimanual {
        format!("{}{motor}.pos", side.key_prefix())
    } else {
        format!("{motor}.pos")
    }
}

/// Every action key produced in the given mode, in record order.
pub fn action_keys(bimanual: bool) -> Vec<String> {
    polled_sides(bimanual)
        .iter()
        .flat_map(|side| MOTOR_NAMES.iter().map(move |m| action_key(bimanual, *side, m)))
        .collect()
}

pub fn action_features(bimanual: bool) -> BTreeMap<String, FeatureKind> {
    action_keys(bimanual)
        .into_iter()
        .map(|k| (k, FeatureKind::Float))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_arm_has_six_unprefixed_keys() {
        let features = action_features(false);
        assert_eq!(features.len(), 6);
        for motor in MOTOR_NAMES {
            assert_eq!(features.get(&format!("{motor}.pos")), Some(&FeatureKind::Float));
        }
        assert!(features.keys().all(|k| !k.starts_with("left_") && !k.starts_with("right_")));
    }

    #[test]
    fn bimanual_has_twelve_prefixed_keys() {
        let features = action_features(true);
        assert_eq!(features.len(), 12);
        assert_eq!(features.keys().filter(|k| k.starts_with("left_")).count(), 6);
        assert_eq!(features.keys().filter(|k| k.starts_with("right_")).count(), 6);
        assert!(features.contains_key("left_shoulder_pan.pos"));
        assert!(features.contains_key("right_gripper.pos"));
    }

    #[test]
    fn action_keys_are_left_then_right_in_motor_order() {
        let keys = action_keys(true);
        assert_eq!(keys[0], "left_shoulder_pan.pos");
        assert_eq!(keys[5], "left_gripper.pos");
        assert_eq!(keys[6], "right_shoulder_pan.pos");
        assert_eq!(keys[11], "right_gripper.pos");
    }

    #[test]
    fn single_arm_polls_right_side() {
        assert_eq!(polled_sides(false), &[ArmSide::Right]);
        assert_eq!(action_key(false, ArmSide::Right, "wrist_roll"), "wrist_roll.pos");
    }
}
