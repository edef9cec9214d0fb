use std::str::FromStr;

use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::order_service::{normalize_paging, SharedOrderService};
use crate::domain::errors::ValidationError;
use crate::domain::order::{
    Address, Client, ListResult, Order, OrderInput, OrderLine, OrderLineInput,
};
use crate::errors::AppError;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressDto {
    pub street: String,
    pub number: String,
    pub city: String,
    pub province: String,
    pub country: String,
    /// Postal code
    pub cp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientDto {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: AddressDto,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderLineRequest {
    pub quantity: i32,
    pub product_id: String,
    /// Decimal price. Sent as a string to avoid floating-point issues, e.g.
    /// "19.99"; plain JSON numbers are accepted too.
    #[serde(deserialize_with = "decimal_text")]
    #[schema(value_type = String, example = "19.99")]
    pub product_price: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub user_id: String,
    pub client: ClientDto,
    pub order_line_list: Vec<CreateOrderLineRequest>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineResponse {
    pub quantity: i32,
    pub product_id: String,
    pub product_price: String,
    pub total: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: Uuid,
    pub user_id: String,
    pub client: ClientDto,
    pub order_line_list: Vec<OrderLineResponse>,
    pub quantity: i64,
    pub total: String,
    pub created_at: String,
    pub updated_at: String,
}

fn decimal_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

impl From<AddressDto> for Address {
    fn from(a: AddressDto) -> Self {
        Address {
            street: a.street,
            number: a.number,
            city: a.city,
            province: a.province,
            country: a.country,
            cp: a.cp,
        }
    }
}

impl From<Address> for AddressDto {
    fn from(a: Address) -> Self {
        AddressDto {
            street: a.street,
            number: a.number,
            city: a.city,
            province: a.province,
            country: a.country,
            cp: a.cp,
        }
    }
}

impl From<ClientDto> for Client {
    fn from(c: ClientDto) -> Self {
        Client {
            full_name: c.full_name,
            email: c.email,
            phone: c.phone,
            address: c.address.into(),
        }
    }
}

impl From<Client> for ClientDto {
    fn from(c: Client) -> Self {
        ClientDto {
            full_name: c.full_name,
            email: c.email,
            phone: c.phone,
            address: c.address.into(),
        }
    }
}

impl CreateOrderRequest {
    /// Parses the decimal prices; everything else is checked when the order
    /// is built.
    pub fn into_input(self) -> Result<OrderInput, ValidationError> {
        let lines = self
            .order_line_list
            .into_iter()
            .enumerate()
            .map(|(index, l)| {
                let product_price = BigDecimal::from_str(l.product_price.trim()).map_err(|_| {
                    ValidationError::new(
                        format!("orderLineList[{index}].productPrice"),
                        format!("'{}' is not a decimal number", l.product_price),
                    )
                })?;
                Ok(OrderLineInput {
                    quantity: l.quantity,
                    product_id: l.product_id,
                    product_price,
                })
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;

        Ok(OrderInput {
            user_id: self.user_id,
            client: self.client.into(),
            lines,
        })
    }
}

impl From<OrderLine> for OrderLineResponse {
    fn from(l: OrderLine) -> Self {
        OrderLineResponse {
            quantity: l.quantity,
            product_id: l.product_id,
            product_price: l.product_price.to_string(),
            total: l.total.to_string(),
        }
    }
}

impl From<Order> for OrderResponse {
    fn from(o: Order) -> Self {
        OrderResponse {
            id: o.id,
            user_id: o.user_id,
            client: o.client.into(),
            order_line_list: o.order_line_list.into_iter().map(Into::into).collect(),
            quantity: o.quantity,
            total: o.total.to_string(),
            created_at: o.created_at.to_rfc3339(),
            updated_at: o.updated_at.to_rfc3339(),
        }
    }
}

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListOrdersParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListOrdersResponse {
    pub items: Vec<OrderResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

impl ListOrdersResponse {
    fn new(result: ListResult, page: i64, limit: i64) -> Self {
        ListOrdersResponse {
            items: result.items.into_iter().map(Into::into).collect(),
            total: result.total,
            page,
            limit,
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Validates the submitted order, computes line and order totals and stores
/// it. Nothing is stored when validation fails.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created successfully", body = OrderResponse),
        (status = 400, description = "Order failed validation"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    service: web::Data<SharedOrderService>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner().into_input()?;

    let order = web::block(move || service.create_order(input)).await??;

    Ok(HttpResponse::Created().json(OrderResponse::from(order)))
}

/// GET /orders/{id}
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    service: web::Data<SharedOrderService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let order = web::block(move || service.get_order(order_id)).await??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// GET /orders
///
/// Returns a page of orders, newest first.
/// Use `page` (1-based) and `limit` to control pagination.
#[utoipa::path(
    get,
    path = "/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
    ),
    responses(
        (status = 200, description = "Paginated list of orders", body = ListOrdersResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    service: web::Data<SharedOrderService>,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let (page, limit) = normalize_paging(params.page, params.limit);

    let result = web::block(move || service.list_orders(page, limit)).await??;

    Ok(HttpResponse::Ok().json(ListOrdersResponse::new(result, page, limit)))
}

/// GET /orders/user/{user_id}
///
/// Returns a page of the orders owned by one user.
#[utoipa::path(
    get,
    path = "/orders/user/{user_id}",
    params(
        ("user_id" = String, Path, description = "Owning user identifier"),
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
    ),
    responses(
        (status = 200, description = "Paginated list of the user's orders", body = ListOrdersResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_user_orders(
    service: web::Data<SharedOrderService>,
    path: web::Path<String>,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    let params = query.into_inner();
    let (page, limit) = normalize_paging(params.page, params.limit);

    let result =
        web::block(move || service.list_orders_by_user(&user_id, page, limit)).await??;

    Ok(HttpResponse::Ok().json(ListOrdersResponse::new(result, page, limit)))
}

/// DELETE /orders/{id}
#[utoipa::path(
    delete,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn delete_order(
    service: web::Data<SharedOrderService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    web::block(move || service.delete_order(order_id)).await??;

    Ok(HttpResponse::NoContent().finish())
}
