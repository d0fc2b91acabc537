use shared_types::PermissionId;

pub const READ_PHONE_STATE: &str = "android.permission.READ_PHONE_STATE";
pub const CALL_PHONE: &str = "android.permission.CALL_PHONE";
pub const ANSWER_PHONE_CALLS: &str = "android.permission.ANSWER_PHONE_CALLS";
pub const SYSTEM_ALERT_WINDOW: &str = "android.permission.SYSTEM_ALERT_WINDOW";
pub const READ_CONTACTS: &str = "android.permission.READ_CONTACTS";
pub const WRITE_EXTERNAL_STORAGE: &str = "android.permission.WRITE_EXTERNAL_STORAGE";
pub const CAMERA: &str = "android.permission.CAMERA";
pub const RECORD_AUDIO: &str = "android.permission.RECORD_AUDIO";
pub const VIBRATE: &str = "android.permission.VIBRATE";

/// Needed for call detection and dialing; requested during onboarding
pub const REQUIRED: &[&str] = &[READ_PHONE_STATE, CALL_PHONE, ANSWER_PHONE_CALLS];

pub const OPTIONAL: &[&str] = &[READ_CONTACTS, CAMERA];

/// Granted through a system settings screen rather than a dialog
pub const SPECIAL: &[&str] = &[SYSTEM_ALERT_WINDOW];

/// Granted at install time
pub const AUTO_GRANTED: &[&str] = &[VIBRATE];

pub fn required_permissions() -> Vec<PermissionId> {
    REQUIRED.iter().copied().map(PermissionId::from).collect()
}

pub fn optional_permissions() -> Vec<PermissionId> {
    OPTIONAL.iter().copied().map(PermissionId::from).collect()
}

/// Every permission a runtime dialog can grant
pub fn requestable_permissions() -> Vec<PermissionId> {
    REQUIRED
        .iter()
        .chain(OPTIONAL)
        .copied()
        .map(PermissionId::from)
        .collect()
}

pub fn is_special(permission: &PermissionId) -> bool {
    SPECIAL.contains(&permission.as_str())
}

pub fn is_auto_granted(permission: &PermissionId) -> bool {
    AUTO_GRANTED.contains(&permission.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requestable_excludes_special_and_auto_granted() {
        let requestable = requestable_permissions();

        assert_eq!(requestable.len(), 5);
        assert!(!requestable.iter().any(is_special));
        assert!(!requestable.iter().any(is_auto_granted));
        assert!(is_special(&PermissionId::from(SYSTEM_ALERT_WINDOW)));
    }
}
