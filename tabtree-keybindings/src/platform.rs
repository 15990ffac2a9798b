//! Platform-specific keybinding resolution.

/// Resolve the `CmdOrCtrl` modifier for the current platform.
///
/// Returns `(expected_ctrl, expected_super)` given a `cmd_or_ctrl` flag and the
/// raw `ctrl`/`super_key` values from the parsed combo.
///
/// - macOS: `CmdOrCtrl` maps to Super (Cmd key).
/// - All other platforms: `CmdOrCtrl` maps to Ctrl.
#[inline]
pub fn resolve_cmd_or_ctrl(cmd_or_ctrl: bool, ctrl: bool, super_key: bool) -> (bool, bool) {
    if cmd_or_ctrl {
        #[cfg(target_os = "macos")]
        {
            (ctrl, true) // CmdOrCtrl -> Super on macOS
        }
        #[cfg(not(target_os = "macos"))]
        {
            (true, super_key) // CmdOrCtrl -> Ctrl on other platforms
        }
    } else {
        (ctrl, super_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_modifiers_pass_through() {
        assert_eq!(resolve_cmd_or_ctrl(false, true, false), (true, false));
        assert_eq!(resolve_cmd_or_ctrl(false, false, true), (false, true));
    }

    #[test]
    fn test_cmd_or_ctrl_resolution() {
        #[cfg(target_os = "macos")]
        assert_eq!(resolve_cmd_or_ctrl(true, false, false), (false, true));
        #[cfg(not(target_os = "macos"))]
        assert_eq!(resolve_cmd_or_ctrl(true, false, false), (true, false));
    }
}
