use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct ThemeTokens {
    pub menu_title: Color,
    pub menu_desc: Color,
    pub border: Color,
    pub notice: Color,
    pub selection_fg: Color,
    pub selection_bg: Color,
}

impl Default for ThemeTokens {
    fn default() -> Self {
        Self::builtin_dark()
    }
}

impl ThemeTokens {
    #[must_use]
    pub fn builtin_dark() -> Self {
        Self {
            menu_title: Color::White,
            menu_desc: Color::DarkGray,
            border: Color::DarkGray,
            notice: Color::Yellow,
            selection_fg: Color::Black,
            selection_bg: Color::Cyan,
        }
    }
}
