use crate::constants::{MAX_PAGE_SIZE, MIN_PAGE_SIZE};

pub mod academic_service;

pub mod ml_service;

pub mod user_service;

/// Keeps a page size inside what the list endpoints accept.
pub(crate) fn page_limit(limit: u32) -> u32 {
    limit.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE)
}
