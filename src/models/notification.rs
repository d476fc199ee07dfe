#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationIcon {
    Alarm,
    Adhan,
    Info,
}

impl NotificationIcon {
    pub fn glyph(&self) -> &'static str {
        match self {
            NotificationIcon::Alarm => "⏰",
            NotificationIcon::Adhan => "🕋",
            NotificationIcon::Info => "ℹ",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub icon: NotificationIcon,
    pub message: String,
}

impl Notification {
    pub fn new(icon: NotificationIcon, message: impl Into<String>) -> Self {
        Self {
            icon,
            message: message.into(),
        }
    }
}

/// Dismissible banner holding at most one notification.
#[derive(Debug, Default)]
pub struct Banner {
    current: Option<Notification>,
}

impl Banner {
    pub fn show(&mut self, notification: Notification) {
        self.current = Some(notification);
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }
}
