//! Terminal styling

use console::Style;

pub const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}";

/// Styles used by the renderers
#[derive(Clone)]
pub struct Theme {
    pub heading: Style,
    pub accent: Style,
    pub muted: Style,
    pub success: Style,
    pub error: Style,
    pub badge: Style,
    pub code: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            heading: Style::new().bold(),
            accent: Style::new().cyan(),
            muted: Style::new().dim(),
            success: Style::new().green().bold(),
            error: Style::new().red().bold(),
            badge: Style::new().green(),
            code: Style::new().yellow(),
        }
    }
}

impl Theme {
    pub fn no_color() -> Self {
        Self {
            heading: Style::new(),
            accent: Style::new(),
            muted: Style::new(),
            success: Style::new(),
            error: Style::new(),
            badge: Style::new(),
            code: Style::new(),
        }
    }
}
