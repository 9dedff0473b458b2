use super::DeviceProfile;

/// The handheld's fixed panel. Frames may come in at half resolution and get
/// scale-blitted up, or at native resolution and go out untouched.
pub const DECK: DeviceProfile = DeviceProfile {
    name: "deck",
    display_width: 960,
    display_height: 544,
    resolutions: &[(480, 272), (960, 544)],
};
