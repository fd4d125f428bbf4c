use crate::recognition::domain::identity_label::IdentityLabel;
use crate::shared::constants::PRESENCE_SUFFIX;

/// Announcement that a recognized person is present.
#[derive(Clone, Debug, PartialEq)]
pub struct NotificationEvent {
    label: IdentityLabel,
}

impl NotificationEvent {
    /// `None` for Unknown: only resolved names are announced.
    pub fn for_label(label: &IdentityLabel) -> Option<Self> {
        if label.is_unknown() {
            None
        } else {
            Some(Self {
                label: label.clone(),
            })
        }
    }

    pub fn label(&self) -> &IdentityLabel {
        &self.label
    }

    pub fn message(&self) -> String {
        format!("{} {PRESENCE_SUFFIX}", self.label)
    }
}
