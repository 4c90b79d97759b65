//! User-facing notifications emitted by cart operations.

use std::fmt;

use crate::error::CartError;

/// Cart operation kind, used to pick the notification for a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Remove,
    Update,
}

impl Operation {
    /// Lowercase name for log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Update => "update",
        }
    }
}

/// Fire-and-forget message shown to the shopper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    /// Adding failed because the product has no stock left.
    AddOutOfStock,
    /// Quantity update asked for more than is in stock.
    UpdateOutOfStock,
    /// Adding failed for any other reason.
    AddFailed,
    /// Removal failed.
    RemoveFailed,
    /// Quantity update failed for any other reason.
    UpdateFailed,
}

impl Notification {
    /// Notifications for a failed operation, in emission order.
    ///
    /// A stock rejection is announced first and then reported as the
    /// operation's generic failure.
    #[must_use]
    pub const fn for_failure(operation: Operation, error: &CartError) -> &'static [Self] {
        match (operation, error.is_out_of_stock()) {
            (Operation::Add, true) => &[Self::AddOutOfStock, Self::AddFailed],
            (Operation::Add, false) => &[Self::AddFailed],
            (Operation::Update, true) => &[Self::UpdateOutOfStock, Self::UpdateFailed],
            (Operation::Update, false) => &[Self::UpdateFailed],
            (Operation::Remove, _) => &[Self::RemoveFailed],
        }
    }

    /// Static message text.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::AddOutOfStock | Self::UpdateOutOfStock => "Requested quantity is out of stock",
            Self::AddFailed => "Failed to add product",
            Self::RemoveFailed => "Failed to remove product",
            Self::UpdateFailed => "Failed to update product quantity",
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
