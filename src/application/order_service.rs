use std::sync::Arc;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{ListResult, Order, OrderInput};
use crate::domain::ports::OrderRepository;

pub const MAX_PAGE_SIZE: i64 = 100;

pub struct OrderService<R> {
    repo: R,
}

/// The service as shared by the HTTP handlers, with the storage picked at
/// startup.
pub type SharedOrderService = OrderService<Arc<dyn OrderRepository>>;

/// Pages start at 1; limits are kept within `1..=MAX_PAGE_SIZE`.
pub fn normalize_paging(page: i64, limit: i64) -> (i64, i64) {
    (page.max(1), limit.clamp(1, MAX_PAGE_SIZE))
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Builds the aggregate from `input` and stores it. Nothing is written
    /// when validation fails.
    pub fn create_order(&self, input: OrderInput) -> Result<Order, DomainError> {
        log::info!(
            "Creating order for user {} with {} line(s)",
            input.user_id,
            input.lines.len()
        );
        let order = Order::create(input).inspect_err(|e| {
            log::warn!("Rejected order: {}", e);
        })?;
        self.repo.save(&order)?;
        log::info!("Created order {} (total {})", order.id, order.total);
        Ok(order)
    }

    pub fn get_order(&self, id: Uuid) -> Result<Order, DomainError> {
        log::debug!("Fetching order {}", id);
        self.repo.find_by_id(id)?.ok_or(DomainError::NotFound)
    }

    pub fn list_orders(&self, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        let (page, limit) = normalize_paging(page, limit);
        log::debug!("Listing orders page={} limit={}", page, limit);
        self.repo.list(page, limit)
    }

    pub fn list_orders_by_user(
        &self,
        user_id: &str,
        page: i64,
        limit: i64,
    ) -> Result<ListResult, DomainError> {
        let (page, limit) = normalize_paging(page, limit);
        log::debug!(
            "Listing orders of user {} page={} limit={}",
            user_id,
            page,
            limit
        );
        self.repo.find_by_user_id(user_id, page, limit)
    }

    pub fn delete_order(&self, id: Uuid) -> Result<(), DomainError> {
        log::info!("Deleting order {}", id);
        if self.repo.delete(id)? {
            Ok(())
        } else {
            Err(DomainError::NotFound)
        }
    }
}
