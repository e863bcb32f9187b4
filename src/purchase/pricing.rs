//! Ticket pricing tiers.

use super::validation::{StudentStatus, ValidatedRequest};
use crate::ledger::TicketType;

/// Buyers younger than this pay half price.
pub const HALF_PRICE_AGE_LIMIT: i64 = 18;

/// Priced purchase before the stock check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    pub ticket_type: TicketType,
    pub unit_price: f64,
    pub total: f64,
}

pub fn ticket_type(age: i64, student: StudentStatus) -> TicketType {
    if age < HALF_PRICE_AGE_LIMIT || student == StudentStatus::Yes {
        TicketType::Half
    } else {
        TicketType::Full
    }
}

/// Price `request` against a full ticket price. No rounding is applied.
pub fn quote(full_price: f64, request: &ValidatedRequest) -> Quote {
    let ticket_type = ticket_type(request.age, request.student);
    let unit_price = match ticket_type {
        TicketType::Full => full_price,
        TicketType::Half => full_price / 2.0,
    };

    Quote {
        ticket_type,
        unit_price,
        total: unit_price * request.quantity as f64,
    }
}
