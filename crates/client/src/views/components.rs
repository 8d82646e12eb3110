//! Small presentational components.

/// Spinner size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadingSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl LoadingSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadingSize::Small => "small",
            LoadingSize::Medium => "medium",
            LoadingSize::Large => "large",
        }
    }
}

/// Loading spinner shown while a view waits for the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingIndicator {
    pub size: LoadingSize,
    pub message: String,
    /// Cover the whole view instead of rendering inline.
    pub overlay: bool,
}

impl Default for LoadingIndicator {
    fn default() -> Self {
        Self {
            size: LoadingSize::default(),
            message: "Loading...".to_string(),
            overlay: false,
        }
    }
}

impl LoadingIndicator {
    pub fn size_class(&self) -> String {
        format!("spinner--{}", self.size.as_str())
    }
}

/// Yes/no confirmation dialog.
///
/// The dialog only tracks whether it is open and what it says; the view
/// that opened it decides what confirming or cancelling does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationModal {
    pub is_open: bool,
    pub title: String,
    pub message: String,
    pub confirm_text: String,
    pub cancel_text: String,
}

impl Default for ConfirmationModal {
    fn default() -> Self {
        Self {
            is_open: false,
            title: "Are you sure?".to_string(),
            message: "Do you want to continue with this action?".to_string(),
            confirm_text: "Confirm".to_string(),
            cancel_text: "Cancel".to_string(),
        }
    }
}

impl ConfirmationModal {
    pub fn open(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.is_open = true;
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    /// A click on the backdrop cancels; clicks inside the dialog do not.
    /// Returns `true` when the click should be treated as a cancel.
    pub fn on_backdrop_click(&self, target_is_backdrop: bool) -> bool {
        self.is_open && target_is_backdrop
    }
}
