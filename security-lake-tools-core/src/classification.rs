//! OCSF event classes accepted for custom log sources.
//!
//! The table is fixed at compile time and grouped by OCSF category, in the order the
//! `--list` output shows them.

use crate::error::{ToolError, ToolResult};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OcsfCategory {
    SystemActivity,
    Findings,
    IdentityAndAccessManagement,
    NetworkActivity,
    Discovery,
    ApplicationActivity,
    Remediation,
    WindowsExtension,
}

impl OcsfCategory {
    pub const ALL: [Self; 8] = [
        Self::SystemActivity,
        Self::Findings,
        Self::IdentityAndAccessManagement,
        Self::NetworkActivity,
        Self::Discovery,
        Self::ApplicationActivity,
        Self::Remediation,
        Self::WindowsExtension,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::SystemActivity => "System Activity",
            Self::Findings => "Findings",
            Self::IdentityAndAccessManagement => "Identity & Access Management",
            Self::NetworkActivity => "Network Activity",
            Self::Discovery => "Discovery",
            Self::ApplicationActivity => "Application Activity",
            Self::Remediation => "Remediation",
            Self::WindowsExtension => "Windows Extension",
        }
    }
}

impl fmt::Display for OcsfCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One OCSF class UID and the Security Lake event class name it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationEntry {
    pub code: &'static str,
    pub event_class: &'static str,
    pub category: OcsfCategory,
}

const fn entry(
    code: &'static str,
    event_class: &'static str,
    category: OcsfCategory,
) -> ClassificationEntry {
    ClassificationEntry {
        code,
        event_class,
        category,
    }
}

use OcsfCategory::{
    ApplicationActivity, Discovery, Findings, IdentityAndAccessManagement, NetworkActivity,
    Remediation, SystemActivity, WindowsExtension,
};

pub const OCSF_EVENT_CLASSES: &[ClassificationEntry] = &[
    entry("1001", "FILE_ACTIVITY", SystemActivity),
    entry("1002", "KERNEL_EXTENSION", SystemActivity),
    entry("1003", "KERNEL_ACTIVITY", SystemActivity),
    entry("1004", "MEMORY_ACTIVITY", SystemActivity),
    entry("1005", "MODULE_ACTIVITY", SystemActivity),
    entry("1006", "SCHEDULED_JOB", SystemActivity),
    entry("1007", "PROCESS_ACTIVITY", SystemActivity),
    entry("1008", "EVENT_LOG", SystemActivity),
    entry("1009", "SCRIPT_ACTIVITY", SystemActivity),
    entry("2001", "SECURITY_FINDING", Findings),
    entry("2002", "VULNERABILITY_FINDING", Findings),
    entry("2003", "COMPLIANCE_FINDING", Findings),
    entry("2004", "DETECTION_FINDING", Findings),
    entry("2005", "INCIDENT_FINDING", Findings),
    entry("2006", "DATA_SECURITY_FINDING", Findings),
    entry("2007", "APPLICATION_SECURITY_FINDING", Findings),
    entry("3001", "ACCOUNT_CHANGE", IdentityAndAccessManagement),
    entry("3002", "AUTHENTICATION", IdentityAndAccessManagement),
    entry("3003", "AUTHORIZE_SESSION", IdentityAndAccessManagement),
    entry("3004", "ENTITY_MANAGEMENT", IdentityAndAccessManagement),
    entry("3005", "USER_ACCESS", IdentityAndAccessManagement),
    entry("3006", "GROUP_MANAGEMENT", IdentityAndAccessManagement),
    entry("4001", "NETWORK_ACTIVITY", NetworkActivity),
    entry("4002", "HTTP_ACTIVITY", NetworkActivity),
    entry("4003", "DNS_ACTIVITY", NetworkActivity),
    entry("4004", "DHCP_ACTIVITY", NetworkActivity),
    entry("4005", "RDP_ACTIVITY", NetworkActivity),
    entry("4006", "SMB_ACTIVITY", NetworkActivity),
    entry("4007", "SSH_ACTIVITY", NetworkActivity),
    entry("4008", "FTP_ACTIVITY", NetworkActivity),
    entry("4009", "EMAIL_ACTIVITY", NetworkActivity),
    entry("4013", "NTP_ACTIVITY", NetworkActivity),
    entry("4014", "TUNNEL_ACTIVITY", NetworkActivity),
    entry("5001", "DEVICE_INVENTORY", Discovery),
    entry("5002", "DEVICE_CONFIG_STATE", Discovery),
    entry("5003", "USER_INVENTORY", Discovery),
    entry("5004", "OS_PATCH_STATE", Discovery),
    entry("6001", "WEB_RESOURCES", ApplicationActivity),
    entry("6002", "APPLICATION_LIFECYCLE", ApplicationActivity),
    entry("6003", "API_ACTIVITY", ApplicationActivity),
    entry("6005", "DATASTORE_ACTIVITY", ApplicationActivity),
    entry("6006", "FILE_HOSTING", ApplicationActivity),
    entry("6007", "SCAN_ACTIVITY", ApplicationActivity),
    entry("6008", "APPLICATION_ERROR", ApplicationActivity),
    entry("7001", "REMEDIATION", Remediation),
    entry("7002", "FILE_REMEDIATION", Remediation),
    entry("7003", "PROCESS_REMEDIATION", Remediation),
    entry("201001", "REGISTRY_KEY_ACTIVITY", WindowsExtension),
    entry("201002", "REGISTRY_VALUE_ACTIVITY", WindowsExtension),
    entry("201003", "WINDOWS_RESOURCE_ACTIVITY", WindowsExtension),
    entry("201004", "WINDOWS_SERVICE_ACTIVITY", WindowsExtension),
];

pub fn lookup(code: &str) -> Option<&'static ClassificationEntry> {
    OCSF_EVENT_CLASSES.iter().find(|entry| entry.code == code)
}

/// Resolve a class UID or reject it. Callers run this before touching any remote service.
pub fn validate_code(code: &str) -> ToolResult<&'static ClassificationEntry> {
    lookup(code).ok_or_else(|| {
        ToolError::validation(format!(
            "Unknown OCSF class UID: {code}\nValid class UIDs: {}",
            sorted_codes().join(", ")
        ))
    })
}

/// All codes in lexical order.
pub fn sorted_codes() -> Vec<&'static str> {
    let mut codes: Vec<&'static str> = OCSF_EVENT_CLASSES.iter().map(|e| e.code).collect();
    codes.sort_unstable();
    codes
}

pub fn entries_in(category: OcsfCategory) -> impl Iterator<Item = &'static ClassificationEntry> {
    OCSF_EVENT_CLASSES
        .iter()
        .filter(move |entry| entry.category == category)
}

/// Text printed by `create-source --list`.
pub fn render_listing() -> String {
    let mut out = String::from("Available OCSF class UIDs:\n\n");
    for category in OcsfCategory::ALL {
        out.push_str(&format!("{category}:\n"));
        for entry in entries_in(category) {
            out.push_str(&format!("  {}: {}\n", entry.code, entry.event_class));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_event_classes_exist() {
        assert!(!OCSF_EVENT_CLASSES.is_empty());
    }

    #[test]
    fn test_specific_event_classes() {
        let class = |code| lookup(code).map(|e| e.event_class);
        assert_eq!(class("1001"), Some("FILE_ACTIVITY"));
        assert_eq!(class("2001"), Some("SECURITY_FINDING"));
        assert_eq!(class("3001"), Some("ACCOUNT_CHANGE"));
        assert_eq!(class("4001"), Some("NETWORK_ACTIVITY"));
        assert_eq!(class("201004"), Some("WINDOWS_SERVICE_ACTIVITY"));
    }

    #[test]
    fn test_codes_are_unique() {
        let unique: HashSet<_> = OCSF_EVENT_CLASSES.iter().map(|e| e.code).collect();
        assert_eq!(unique.len(), OCSF_EVENT_CLASSES.len());
    }

    #[test]
    fn test_unknown_code_is_rejected() {
        let err = validate_code("9999").expect_err("9999 is not an OCSF class");
        let message = err.to_string();
        assert!(message.contains("Unknown OCSF class UID: 9999"));
        assert!(message.contains("1001"));
        assert!(matches!(err, ToolError::Validation(_)));
        assert!(validate_code("").is_err());
        assert!(validate_code(" 1001").is_err());
    }

    #[test]
    fn test_every_entry_is_listed_once() {
        let listing = render_listing();
        for entry in OCSF_EVENT_CLASSES {
            let line = format!("  {}: {}\n", entry.code, entry.event_class);
            assert_eq!(listing.matches(&line).count(), 1, "{line}");
        }
        assert!(listing.contains("Identity & Access Management:\n  3001: ACCOUNT_CHANGE"));
    }

    #[test]
    fn test_sorted_codes_order() {
        let codes = sorted_codes();
        assert_eq!(codes.first(), Some(&"1001"));
        assert_eq!(codes.last(), Some(&"7003"));
    }
}
