use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub description: Option<String>,
    pub total_amount: f64,
    pub status: String,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// An order as listed to clients, with `created_at` pre-split for display.
#[derive(Debug, Serialize)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub date: String,
    pub time: String,
}

impl From<Order> for OrderView {
    fn from(order: Order) -> Self {
        let date = order.created_at.format("%Y-%m-%d").to_string();
        let time = order.created_at.format("%H:%M").to_string();
        Self { order, date, time }
    }
}
