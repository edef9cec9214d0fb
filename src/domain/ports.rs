use std::sync::Arc;

use uuid::Uuid;

use super::errors::DomainError;
use super::order::{ListResult, Order};

/// Rows to skip for a 1-based `page` of `limit` items, or `None` when the
/// page lies past anything addressable.
pub fn page_offset(page: i64, limit: i64) -> Option<i64> {
    page.checked_sub(1)?.checked_mul(limit).filter(|offset| *offset >= 0)
}

/// Storage for order aggregates. Pages are 1-based.
pub trait OrderRepository: Send + Sync + 'static {
    fn save(&self, order: &Order) -> Result<(), DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError>;
    fn find_by_user_id(
        &self,
        user_id: &str,
        page: i64,
        limit: i64,
    ) -> Result<ListResult, DomainError>;
    /// Newest first.
    fn list(&self, page: i64, limit: i64) -> Result<ListResult, DomainError>;
    /// Returns `false` when no order had that id.
    fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}

impl<R: OrderRepository + ?Sized> OrderRepository for Arc<R> {
    fn save(&self, order: &Order) -> Result<(), DomainError> {
        (**self).save(order)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        (**self).find_by_id(id)
    }

    fn find_by_user_id(
        &self,
        user_id: &str,
        page: i64,
        limit: i64,
    ) -> Result<ListResult, DomainError> {
        (**self).find_by_user_id(user_id, page, limit)
    }

    fn list(&self, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        (**self).list(page, limit)
    }

    fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        (**self).delete(id)
    }
}
