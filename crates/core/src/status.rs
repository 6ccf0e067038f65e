#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiStatus {
    #[default]
    Ready,
    Processing,
    Complete,
    Error,
}

impl UiStatus {
    pub fn label(self) -> &'static str {
        match self {
            UiStatus::Ready => "Ready",
            UiStatus::Processing => "Processing",
            UiStatus::Complete => "Complete",
            UiStatus::Error => "Error",
        }
    }

    /// Contextual colour of the status badge.
    pub fn tone(self) -> &'static str {
        match self {
            UiStatus::Ready | UiStatus::Complete => "success",
            UiStatus::Processing => "warning",
            UiStatus::Error => "danger",
        }
    }

    pub fn badge_class(self) -> String {
        format!("badge bg-{}", self.tone())
    }

    pub fn is_busy(self) -> bool {
        self == UiStatus::Processing
    }
}
