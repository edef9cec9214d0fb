use bigdecimal::{BigDecimal, RoundingMode, Zero};
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::ValidationError;
use super::validation::{
    require_non_blank, require_non_negative_price, require_positive_quantity,
    require_price_within_bounds, validate_client,
};

/// Number of decimal places kept on line and order totals.
pub const TOTAL_SCALE: i64 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub number: String,
    pub city: String,
    pub province: String,
    pub country: String,
    /// Postal code.
    pub cp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub quantity: i32,
    pub product_id: String,
    pub product_price: BigDecimal,
    pub total: BigDecimal,
}

/// The order aggregate. Client and lines are embedded values with no identity
/// of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub user_id: String,
    pub client: Client,
    pub order_line_list: Vec<OrderLine>,
    /// Sum of the line quantities.
    pub quantity: i64,
    /// Sum of the line totals.
    pub total: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct OrderLineInput {
    pub quantity: i32,
    pub product_id: String,
    pub product_price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct OrderInput {
    pub user_id: String,
    pub client: Client,
    pub lines: Vec<OrderLineInput>,
}

#[derive(Debug, Clone)]
pub struct ListResult {
    pub items: Vec<Order>,
    pub total: i64,
}

/// `quantity * price`, rounded half-up to two decimals.
pub fn line_total(quantity: i32, price: &BigDecimal) -> BigDecimal {
    (BigDecimal::from(quantity) * price).with_scale_round(TOTAL_SCALE, RoundingMode::HalfUp)
}

fn line_field(index: usize, name: &str) -> String {
    format!("orderLineList[{index}].{name}")
}

impl OrderLine {
    fn build(index: usize, input: OrderLineInput) -> Result<Self, ValidationError> {
        require_positive_quantity(&line_field(index, "quantity"), input.quantity)?;
        require_non_blank(&line_field(index, "productId"), &input.product_id)?;
        require_price_within_bounds(&line_field(index, "productPrice"), &input.product_price)?;
        require_non_negative_price(&line_field(index, "productPrice"), &input.product_price)?;

        let total = line_total(input.quantity, &input.product_price);
        Ok(Self {
            quantity: input.quantity,
            product_id: input.product_id,
            product_price: input.product_price,
            total,
        })
    }

    fn check(&self, index: usize) -> Result<(), ValidationError> {
        require_positive_quantity(&line_field(index, "quantity"), self.quantity)?;
        require_non_blank(&line_field(index, "productId"), &self.product_id)?;
        require_price_within_bounds(&line_field(index, "productPrice"), &self.product_price)?;
        require_non_negative_price(&line_field(index, "productPrice"), &self.product_price)?;

        // Half a cent either way still rounds to the same two-decimal figure.
        let tolerance = BigDecimal::new(5i32.into(), 3);
        let exact = BigDecimal::from(self.quantity) * &self.product_price;
        if (&self.total - exact).abs() > tolerance {
            return Err(ValidationError::new(
                line_field(index, "total"),
                format!(
                    "{} does not match {} x {}",
                    self.total, self.quantity, self.product_price
                ),
            ));
        }
        Ok(())
    }
}

impl Order {
    /// Validates `input` and builds a new order with a fresh id and the
    /// current time as both timestamps, truncated to the microsecond
    /// precision storage keeps.
    pub fn create(input: OrderInput) -> Result<Self, ValidationError> {
        Self::create_at(input, Uuid::new_v4(), Utc::now().trunc_subsecs(6))
    }

    pub fn create_at(
        input: OrderInput,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        require_non_blank("userId", &input.user_id)?;
        validate_client(&input.client)?;
        if input.lines.is_empty() {
            return Err(ValidationError::new(
                "orderLineList",
                "an order needs at least one line",
            ));
        }

        let order_line_list = input
            .lines
            .into_iter()
            .enumerate()
            .map(|(index, line)| OrderLine::build(index, line))
            .collect::<Result<Vec<_>, _>>()?;

        let (quantity, total) = aggregate_totals(&order_line_list);
        Ok(Self {
            id,
            user_id: input.user_id,
            client: input.client,
            order_line_list,
            quantity,
            total,
            created_at: now,
            updated_at: now,
        })
    }

    /// Re-checks every invariant on an order that was not produced by
    /// [`Order::create`], e.g. one read back from storage or a request body.
    pub fn check_consistency(&self) -> Result<(), ValidationError> {
        require_non_blank("userId", &self.user_id)?;
        validate_client(&self.client)?;
        if self.order_line_list.is_empty() {
            return Err(ValidationError::new(
                "orderLineList",
                "an order needs at least one line",
            ));
        }
        for (index, line) in self.order_line_list.iter().enumerate() {
            line.check(index)?;
        }

        let (quantity, total) = aggregate_totals(&self.order_line_list);
        if self.quantity != quantity {
            return Err(ValidationError::new(
                "quantity",
                format!("{} does not match the line quantities ({quantity})", self.quantity),
            ));
        }
        if self.total != total {
            return Err(ValidationError::new(
                "total",
                format!("{} does not match the line totals ({total})", self.total),
            ));
        }
        Ok(())
    }
}

fn aggregate_totals(lines: &[OrderLine]) -> (i64, BigDecimal) {
    lines.iter().fold((0, BigDecimal::zero()), |(quantity, total), line| {
        (quantity + i64::from(line.quantity), total + &line.total)
    })
}
