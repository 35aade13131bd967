use serde::{Deserialize, Serialize};

use super::{OrderId, Side};
use crate::values::{Price, Quantity, Symbol};

/// Fill report for one of the agent's own orders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Execution {
    pub order_id: OrderId,
    pub symbol: Symbol,
    pub side: Side,
    pub quantity: Quantity,
    pub fill_price: Price,
}

impl Execution {
    pub fn signed_quantity(&self) -> Quantity {
        self.quantity * self.side.sign()
    }
}
