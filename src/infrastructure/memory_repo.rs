use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{ListResult, Order};
use crate::domain::ports::{page_offset, OrderRepository};

/// Process-local storage, used when no database is configured.
#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<HashMap<Uuid, Order>>,
}

fn poisoned<T>(_: T) -> DomainError {
    DomainError::Internal("order store lock poisoned".to_string())
}

fn paginate<'a>(orders: impl Iterator<Item = &'a Order>, page: i64, limit: i64) -> ListResult {
    let mut matching: Vec<&Order> = orders.collect();
    matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));

    let total = matching.len() as i64;
    let Some(offset) = page_offset(page, limit).and_then(|o| usize::try_from(o).ok()) else {
        return ListResult {
            items: Vec::new(),
            total,
        };
    };
    let items = matching
        .into_iter()
        .skip(offset)
        .take(limit.max(0) as usize)
        .cloned()
        .collect();
    ListResult { items, total }
}

impl OrderRepository for InMemoryOrderRepository {
    fn save(&self, order: &Order) -> Result<(), DomainError> {
        order.check_consistency()?;
        self.orders
            .write()
            .map_err(poisoned)?
            .insert(order.id, order.clone());
        Ok(())
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        Ok(self.orders.read().map_err(poisoned)?.get(&id).cloned())
    }

    fn find_by_user_id(
        &self,
        user_id: &str,
        page: i64,
        limit: i64,
    ) -> Result<ListResult, DomainError> {
        let orders = self.orders.read().map_err(poisoned)?;
        Ok(paginate(
            orders.values().filter(|o| o.user_id == user_id),
            page,
            limit,
        ))
    }

    fn list(&self, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        let orders = self.orders.read().map_err(poisoned)?;
        Ok(paginate(orders.values(), page, limit))
    }

    fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        Ok(self.orders.write().map_err(poisoned)?.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::seed::sample_orders;

    fn stored(repo: &InMemoryOrderRepository, minutes: i64) -> Order {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap() + Duration::minutes(minutes);
        let order =
            Order::create_at(sample_orders().remove(0), Uuid::new_v4(), at).expect("valid order");
        repo.save(&order).expect("save failed");
        order
    }

    #[test]
    fn find_by_id_returns_none_for_unknown_id() {
        let repo = InMemoryOrderRepository::default();
        assert!(repo.find_by_id(Uuid::new_v4()).expect("find").is_none());
    }

    #[test]
    fn list_returns_empty_when_no_orders() {
        let result = InMemoryOrderRepository::default().list(1, 20).expect("list");
        assert_eq!(result.total, 0);
        assert!(result.items.is_empty());
    }

    #[test]
    fn list_paginates_newest_first() {
        let repo = InMemoryOrderRepository::default();
        let orders: Vec<Order> = (0..5).map(|m| stored(&repo, m)).collect();

        let page1 = repo.list(1, 3).expect("list page 1");
        assert_eq!(page1.total, 5);
        assert_eq!(page1.items.len(), 3);
        assert_eq!(page1.items[0].id, orders[4].id);

        let page2 = repo.list(2, 3).expect("list page 2");
        assert_eq!(page2.items.len(), 2);
        assert_eq!(page2.items[1].id, orders[0].id);

        assert!(repo.list(3, 3).expect("list page 3").items.is_empty());
    }

    #[test]
    fn page_past_addressable_range_is_empty() {
        let repo = InMemoryOrderRepository::default();
        stored(&repo, 0);

        let result = repo.list(i64::MAX, 100).expect("list");
        assert_eq!(result.total, 1);
        assert!(result.items.is_empty());
    }

    #[test]
    fn save_rejects_inconsistent_order() {
        let repo = InMemoryOrderRepository::default();
        let mut order = Order::create(sample_orders().remove(0)).expect("valid order");
        order.order_line_list[0].quantity = 7;

        let err = repo.save(&order).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(repo.find_by_id(order.id).expect("find").is_none());
    }

    #[test]
    fn delete_reports_whether_anything_was_removed() {
        let repo = InMemoryOrderRepository::default();
        let order = stored(&repo, 0);

        assert!(repo.delete(order.id).expect("delete"));
        assert!(!repo.delete(order.id).expect("delete"));
    }
}
