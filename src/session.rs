//! 会话上下文
//!
//! 登录状态、主题和用户资料显式传递，不使用全局变量。

use crate::config::SessionConfig;
use serde::{Deserialize, Serialize};

labeled_enum! {
    /// 界面主题
    pub enum Theme {
        Light => ("light", "浅色"),
        Dark => ("dark", "深色"),
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Light
    }
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// 用户资料
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub age: u32,
    pub gender: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "张先生".to_string(),
            age: 35,
            gender: "男".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub authenticated: bool,
    pub theme: Theme,
    pub profile: UserProfile,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self {
            authenticated: true,
            theme: Theme::Light,
            profile: UserProfile::default(),
        }
    }
}

impl From<&SessionConfig> for SessionContext {
    fn from(config: &SessionConfig) -> Self {
        Self {
            authenticated: config.authenticated,
            theme: config.theme,
            profile: UserProfile::default(),
        }
    }
}

impl SessionContext {
    pub fn login(&mut self) {
        self.authenticated = true;
        tracing::info!(user = %self.profile.name, "已登录");
    }

    pub fn logout(&mut self) {
        self.authenticated = false;
        tracing::info!(user = %self.profile.name, "已退出登录");
    }

    /// 切换主题，返回切换后的主题
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        tracing::debug!(theme = %self.theme, "主题已切换");
        self.theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_session() {
        let session = SessionContext::default();
        assert!(session.authenticated);
        assert_eq!(session.theme, Theme::Light);
        assert_eq!(session.profile.name, "张先生");
    }

    #[test]
    fn test_login_logout_and_theme() {
        let mut session = SessionContext::default();
        session.logout();
        assert!(!session.authenticated);
        session.login();
        assert!(session.authenticated);

        assert_eq!(session.toggle_theme(), Theme::Dark);
        assert_eq!(session.toggle_theme(), Theme::Light);
    }

    #[test]
    fn test_from_config() {
        let config = SessionConfig {
            authenticated: false,
            theme: Theme::Dark,
        };
        let session = SessionContext::from(&config);
        assert!(!session.authenticated);
        assert_eq!(session.theme, Theme::Dark);
    }
}
