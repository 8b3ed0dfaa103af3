//! Status icons for CLI output

/// Status icons for different states
pub struct StatusIcon;

impl StatusIcon {
    /// Artifact present / everything installed
    pub const SUCCESS: &'static str = "✓";

    /// Partially installed
    pub const WARNING: &'static str = "⚠";

    /// Artifact absent
    pub const ERROR: &'static str = "✗";

    /// Being deleted
    pub const PENDING: &'static str = "⏳";

    pub const UNKNOWN: &'static str = "?";

    /// Icon for a "present out of expected" count
    pub fn get_ratio_icon(present: usize, total: usize) -> &'static str {
        if total == 0 {
            Self::UNKNOWN
        } else if present == total {
            Self::SUCCESS
        } else if present > 0 {
            Self::WARNING
        } else {
            Self::ERROR
        }
    }

    pub fn get_install_text(present: usize, total: usize) -> &'static str {
        if total == 0 {
            "Unknown"
        } else if present == total {
            "Installed"
        } else if present > 0 {
            "Partial"
        } else {
            "Not installed"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_ratio_icon() {
        assert_eq!(StatusIcon::get_ratio_icon(13, 13), StatusIcon::SUCCESS);
        assert_eq!(StatusIcon::get_ratio_icon(2, 13), StatusIcon::WARNING);
        assert_eq!(StatusIcon::get_ratio_icon(0, 13), StatusIcon::ERROR);
        assert_eq!(StatusIcon::get_ratio_icon(0, 0), StatusIcon::UNKNOWN);
    }

    #[test]
    fn test_get_install_text() {
        assert_eq!(StatusIcon::get_install_text(13, 13), "Installed");
        assert_eq!(StatusIcon::get_install_text(2, 13), "Partial");
        assert_eq!(StatusIcon::get_install_text(0, 13), "Not installed");
        assert_eq!(StatusIcon::get_install_text(0, 0), "Unknown");
    }
}
