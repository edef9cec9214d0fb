use diesel::pg::PgConnection;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{Client, ListResult, Order, OrderLine};
use crate::domain::ports::{page_offset, OrderRepository};
use crate::schema::{order_lines, orders};

use super::models::{NewOrderLineRow, OrderLineRow, OrderRow};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::Internal(format!("client column: {}", e))
    }
}

// ── Row mapping ──────────────────────────────────────────────────────────────

fn to_rows(order: &Order) -> Result<(OrderRow, Vec<NewOrderLineRow>), DomainError> {
    let row = OrderRow {
        id: order.id,
        user_id: order.user_id.clone(),
        client: serde_json::to_value(&order.client)?,
        quantity: order.quantity,
        total: order.total.clone(),
        created_at: order.created_at,
        updated_at: order.updated_at,
    };
    let lines = order
        .order_line_list
        .iter()
        .enumerate()
        .map(|(line_no, l)| {
            let line_no = i32::try_from(line_no).map_err(|_| {
                DomainError::Internal(format!("order {} has too many lines to store", order.id))
            })?;
            Ok(NewOrderLineRow {
                id: Uuid::new_v4(),
                order_id: order.id,
                line_no,
                product_id: l.product_id.clone(),
                quantity: l.quantity,
                product_price: l.product_price.clone(),
                total: l.total.clone(),
            })
        })
        .collect::<Result<Vec<_>, DomainError>>()?;
    Ok((row, lines))
}

fn from_rows(row: OrderRow, mut lines: Vec<OrderLineRow>) -> Result<Order, DomainError> {
    lines.sort_by_key(|l| l.line_no);
    let client: Client = serde_json::from_value(row.client)?;
    let order = Order {
        id: row.id,
        user_id: row.user_id,
        client,
        order_line_list: lines
            .into_iter()
            .map(|l| OrderLine {
                quantity: l.quantity,
                product_id: l.product_id,
                product_price: l.product_price,
                total: l.total,
            })
            .collect(),
        quantity: row.quantity,
        total: row.total,
        created_at: row.created_at,
        updated_at: row.updated_at,
    };
    order
        .check_consistency()
        .map_err(|e| DomainError::Internal(format!("stored order {} is corrupt: {}", order.id, e)))?;
    Ok(order)
}

fn attach_lines(conn: &mut PgConnection, rows: Vec<OrderRow>) -> Result<Vec<Order>, DomainError> {
    let lines = OrderLineRow::belonging_to(&rows)
        .select(OrderLineRow::as_select())
        .load(conn)?;
    let grouped = lines.grouped_by(&rows);
    rows.into_iter()
        .zip(grouped)
        .map(|(row, lines)| from_rows(row, lines))
        .collect()
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl OrderRepository for DieselOrderRepository {
    fn save(&self, order: &Order) -> Result<(), DomainError> {
        order.check_consistency()?;
        let (row, lines) = to_rows(order)?;
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            diesel::insert_into(orders::table)
                .values(&row)
                .execute(conn)?;
            diesel::insert_into(order_lines::table)
                .values(&lines)
                .execute(conn)?;
            Ok(())
        })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .filter(orders::id.eq(id))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let lines = OrderLineRow::belonging_to(&order)
            .select(OrderLineRow::as_select())
            .load(&mut conn)?;

        from_rows(order, lines).map(Some)
    }

    fn find_by_user_id(
        &self,
        user_id: &str,
        page: i64,
        limit: i64,
    ) -> Result<ListResult, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = orders::table
                .filter(orders::user_id.eq(user_id))
                .count()
                .get_result(conn)?;
            let Some(offset) = page_offset(page, limit) else {
                return Ok(ListResult {
                    items: Vec::new(),
                    total,
                });
            };

            let rows = orders::table
                .filter(orders::user_id.eq(user_id))
                .select(OrderRow::as_select())
                .order((orders::created_at.desc(), orders::id.asc()))
                .limit(limit)
                .offset(offset)
                .load(conn)?;

            Ok(ListResult {
                items: attach_lines(conn, rows)?,
                total,
            })
        })
    }

    fn list(&self, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = orders::table.count().get_result(conn)?;
            let Some(offset) = page_offset(page, limit) else {
                return Ok(ListResult {
                    items: Vec::new(),
                    total,
                });
            };

            let rows = orders::table
                .select(OrderRow::as_select())
                .order((orders::created_at.desc(), orders::id.asc()))
                .limit(limit)
                .offset(offset)
                .load(conn)?;

            Ok(ListResult {
                items: attach_lines(conn, rows)?,
                total,
            })
        })
    }

    fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        // order_lines go with it through ON DELETE CASCADE
        let removed = diesel::delete(orders::table.filter(orders::id.eq(id))).execute(&mut conn)?;
        Ok(removed > 0)
    }
}
