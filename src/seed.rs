//! Sample orders shipped with the service, loaded at startup when
//! `SEED_SAMPLE_DATA=true`. Also used as fixtures throughout the tests.

use bigdecimal::BigDecimal;

use crate::application::order_service::OrderService;
use crate::domain::errors::DomainError;
use crate::domain::order::{Address, Client, Order, OrderInput, OrderLineInput};
use crate::domain::ports::OrderRepository;

const SAMPLE_USER_ID: &str = "a2bcb7b3-4c36-4073-9ab8-9d8f4a57301b";

fn cents(amount: i64) -> BigDecimal {
    BigDecimal::new(amount.into(), 2)
}

fn line(quantity: i32, product_id: &str, price_cents: i64) -> OrderLineInput {
    OrderLineInput {
        quantity,
        product_id: product_id.to_string(),
        product_price: cents(price_cents),
    }
}

pub fn sample_orders() -> Vec<OrderInput> {
    vec![
        OrderInput {
            user_id: SAMPLE_USER_ID.to_string(),
            client: Client {
                full_name: "John Doe".to_string(),
                email: "john.doe@example.com".to_string(),
                phone: "123456789".to_string(),
                address: Address {
                    street: "Main Street".to_string(),
                    number: "123".to_string(),
                    city: "Cityville".to_string(),
                    province: "Provinceland".to_string(),
                    country: "Countryland".to_string(),
                    cp: "12345".to_string(),
                },
            },
            lines: vec![
                line(2, "57b77805-c1ce-490f-a96f-ec15505d5fae", 1999),
                line(1, "874f872f-c30e-4089-ab33-16fd1c4d4344", 2499),
            ],
        },
        OrderInput {
            user_id: SAMPLE_USER_ID.to_string(),
            client: Client {
                full_name: "Jane Doe".to_string(),
                email: "jane.doe@example.com".to_string(),
                phone: "987654321".to_string(),
                address: Address {
                    street: "Broadway".to_string(),
                    number: "456".to_string(),
                    city: "Citytown".to_string(),
                    province: "Stateland".to_string(),
                    country: "Countryland".to_string(),
                    cp: "54321".to_string(),
                },
            },
            lines: vec![line(3, "57b77805-c1ce-490f-a96f-ec15505d5fae", 2999)],
        },
    ]
}

pub fn load_sample_orders<R: OrderRepository>(
    service: &OrderService<R>,
) -> Result<Vec<Order>, DomainError> {
    let orders = sample_orders()
        .into_iter()
        .map(|input| service.create_order(input))
        .collect::<Result<Vec<_>, _>>()?;
    log::info!("Seeded {} sample orders", orders.len());
    Ok(orders)
}
