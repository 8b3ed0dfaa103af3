//! Color theme for CLI output

use comfy_table::Color as TableColor;

/// Color theme for terminal output
#[derive(Debug, Clone)]
pub struct ColorTheme {
    pub success: TableColor,
    pub warning: TableColor,
    pub error: TableColor,
    pub info: TableColor,
    pub muted: TableColor,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            success: TableColor::Green,
            warning: TableColor::Yellow,
            error: TableColor::Red,
            info: TableColor::Cyan,
            muted: TableColor::DarkGrey,
        }
    }
}

impl ColorTheme {
    /// Color for a "present out of expected" count
    pub fn get_ratio_color(&self, present: usize, total: usize) -> TableColor {
        if total == 0 {
            self.muted
        } else if present == total {
            self.success
        } else if present > 0 {
            self.warning
        } else {
            self.error
        }
    }

    /// Color for cluster-scoped vs namespaced artifacts in plan tables
    pub fn get_scope_color(&self, namespaced: bool) -> TableColor {
        if namespaced {
            self.info
        } else {
            self.muted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme() {
        let theme = ColorTheme::default();
        assert_eq!(theme.success, TableColor::Green);
        assert_eq!(theme.warning, TableColor::Yellow);
        assert_eq!(theme.error, TableColor::Red);
    }

    #[test]
    fn test_get_ratio_color() {
        let theme = ColorTheme::default();
        assert_eq!(theme.get_ratio_color(13, 13), TableColor::Green);
        assert_eq!(theme.get_ratio_color(4, 13), TableColor::Yellow);
        assert_eq!(theme.get_ratio_color(0, 13), TableColor::Red);
        assert_eq!(theme.get_ratio_color(0, 0), TableColor::DarkGrey);
    }
}
