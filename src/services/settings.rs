pub const MIN_MAX_MESSAGES: usize = 10;
pub const MAX_MAX_MESSAGES: usize = 200;
pub const DEFAULT_MAX_MESSAGES: usize = 50;
pub const DEFAULT_AI_NAME: &str = "AI Assistant";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSettings {
    pub ai_name: String,
    pub theme: Theme,
    max_messages: usize,
    pub reply_source: ReplySource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}

/// Where assistant replies come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReplySource {
    /// Canned replies after a random delay.
    #[default]
    Simulated,
    /// The GraphQL chat backend.
    Backend,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            ai_name: DEFAULT_AI_NAME.to_string(),
            theme: Theme::Light,
            max_messages: DEFAULT_MAX_MESSAGES,
            reply_source: ReplySource::Simulated,
        }
    }
}

impl ChatSettings {
    pub fn max_messages(&self) -> usize {
        self.max_messages
    }

    /// Clamped to `[MIN_MAX_MESSAGES, MAX_MAX_MESSAGES]`.
    pub fn set_max_messages(&mut self, value: usize) {
        self.max_messages = value.clamp(MIN_MAX_MESSAGES, MAX_MAX_MESSAGES);
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    /// Label shown for assistant messages; falls back when left blank.
    pub fn display_name(&self) -> &str {
        let name = self.ai_name.trim();
        if name.is_empty() {
            DEFAULT_AI_NAME
        } else {
            name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ChatSettings::default();
        assert_eq!(settings.ai_name, "AI Assistant");
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.max_messages(), 50);
        assert_eq!(settings.reply_source, ReplySource::Simulated);
    }

    #[test]
    fn test_max_messages_is_clamped() {
        let mut settings = ChatSettings::default();
        settings.set_max_messages(5);
        assert_eq!(settings.max_messages(), 10);
        settings.set_max_messages(500);
        assert_eq!(settings.max_messages(), 200);
        settings.set_max_messages(120);
        assert_eq!(settings.max_messages(), 120);
    }

    #[test]
    fn test_theme_toggle() {
        let mut settings = ChatSettings::default();
        settings.toggle_theme();
        assert!(settings.theme.is_dark());
        settings.toggle_theme();
        assert_eq!(settings.theme, Theme::Light);
    }

    #[test]
    fn test_blank_name_falls_back() {
        let mut settings = ChatSettings::default();
        settings.ai_name = "   ".to_string();
        assert_eq!(settings.display_name(), DEFAULT_AI_NAME);
        settings.ai_name = " Nova ".to_string();
        assert_eq!(settings.display_name(), "Nova");
    }
}
