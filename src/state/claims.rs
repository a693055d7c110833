use std::fmt;

use crate::state::data_model::{ClaimRecord, Row, RowId};

// Row field holding the ordered quantity, used to cap claim quantities.
pub const QUANTITY_FIELD: &str = "quantity";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClaimError {
    UnknownRow(RowId),
    RowLocked(RowId),
    AlreadyClaimed(RowId),
    MissingReason,
    MissingProduct,
    InvalidQuantity { requested: u32, available: Option<u64> },
}

impl fmt::Display for ClaimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownRow(id) => write!(f, "row {id} is not in the current data set"),
            Self::RowLocked(id) => write!(f, "row {id} is locked"),
            Self::AlreadyClaimed(id) => write!(f, "row {id} already carries a claim"),
            Self::MissingReason => write!(f, "claim reason is required"),
            Self::MissingProduct => write!(f, "claim product is required"),
            Self::InvalidQuantity {
                requested,
                available: Some(available),
            } => write!(f, "claim quantity {requested} must be between 1 and {available}"),
            Self::InvalidQuantity { requested, .. } => {
                write!(f, "claim quantity {requested} must be at least 1")
            }
        }
    }
}

impl std::error::Error for ClaimError {}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClaimDraft {
    pub reason: String,
    pub quantity: u32,
    pub description: String,
    pub image: Option<String>,
    pub product: String,
}

impl ClaimDraft {
    pub fn new(reason: impl Into<String>, quantity: u32, product: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            quantity,
            product: product.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn submit(self, id: &RowId, row: &Row) -> Result<ClaimRecord, ClaimError> {
        check_claimable(id, row)?;

        let reason = self.reason.trim();
        if reason.is_empty() {
            return Err(ClaimError::MissingReason);
        }
        let product = self.product.trim();
        if product.is_empty() {
            return Err(ClaimError::MissingProduct);
        }

        let available = row.get(QUANTITY_FIELD).and_then(|value| value.as_u64());
        let in_range = self.quantity >= 1
            && available.map_or(true, |available| u64::from(self.quantity) <= available);
        if !in_range {
            return Err(ClaimError::InvalidQuantity {
                requested: self.quantity,
                available,
            });
        }

        Ok(ClaimRecord {
            reason: reason.to_string(),
            quantity: self.quantity,
            description: self.description.trim().to_string(),
            image: self.image.filter(|image| !image.trim().is_empty()),
            product: product.to_string(),
        })
    }
}

pub fn check_claimable(id: &RowId, row: &Row) -> Result<(), ClaimError> {
    if row.is_locked {
        return Err(ClaimError::RowLocked(id.clone()));
    }
    if row.already_claimed || row.claim.is_some() {
        return Err(ClaimError::AlreadyClaimed(id.clone()));
    }
    Ok(())
}
