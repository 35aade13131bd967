//! Lifecycle Adapter
//!
//! Maps host callbacks (`kernel_starting`, `on_wakeup`, `on_message`,
//! `kernel_stopping`) onto the per-agent state machine:
//!
//! ```text
//!                  wakeup (poll)             QUERY_SPREAD
//! AWAITING_WAKEUP ──────────────► AWAITING_SPREAD ──────────► AWAITING_WAKEUP
//!        │                                 (decide, set_wakeup)
//!        │ wakeup (stream, subscribe once)
//!        ▼
//! AWAITING_MARKET_DATA ◄──┐ MARKET_DATA (decide)
//!        └────────────────┘
//! ```
//!
//! Wakeups before the open or after the close land in `INACTIVE`; a
//! completed one-shot policy lands in `ACTIVE`. Fills and cancellations
//! update the order-in-flight flag in any state without moving it.

use ballast_core::{Execution, MarketHours, Portfolio, Price, Quantity, Symbol, Timestamp};
use ballast_ports::{AgentMessage, BookLevel, TradingHost};
use ballast_strategy::{
    DecisionContext, OrderGate, QuoteCache, RebalancingPolicy, within_exposure_limit,
};
use chrono::Duration;
use log::{debug, info, warn};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::{AgentConfig, QuoteMode};
use crate::error::Result;
use crate::schedule::WakeSchedule;
use crate::state::AgentState;

/// Depth requested on every spread query
const SPREAD_DEPTH: usize = 1;

/// End-of-run report for one agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalValuation {
    pub agent_id: String,
    pub shares: Quantity,
    pub cash: Decimal,
    pub starting_cash: Decimal,
    /// Known midpoint, else last fill price
    pub mark: Option<Price>,
    /// `(mark * shares + cash - starting_cash) / starting_cash`
    pub surplus: Option<Decimal>,
}

/// A rebalancing agent living inside an external kernel
pub struct TradingAgent {
    id: String,
    symbol: Symbol,
    starting_cash: Decimal,
    portfolio: Portfolio,
    quotes: QuoteCache,
    policy: Box<dyn RebalancingPolicy>,
    quote_mode: QuoteMode,
    schedule: WakeSchedule,
    start_at: Option<Timestamp>,
    log_orders: bool,

    state: AgentState,
    order_in_flight: bool,
    subscription_requested: bool,
    hours: Option<MarketHours>,
    mkt_closed: bool,
    close_price: Option<Price>,

    orders_placed: u64,
    fills: u64,
}

impl TradingAgent {
    /// Build an agent from its configuration. The policy is validated here.
    pub fn from_config(config: &AgentConfig) -> Result<Self> {
        let policy = config.policy.build()?;
        Ok(Self {
            id: config.agent_id.clone(),
            symbol: config.symbol.clone(),
            starting_cash: config.starting_cash,
            portfolio: Portfolio::new(config.starting_cash).with_holding(config.symbol.clone(), 0),
            quotes: QuoteCache::new(),
            policy,
            quote_mode: config.quote_mode,
            schedule: WakeSchedule::new(config.wake, config.seed),
            start_at: config.start_at,
            log_orders: config.log_orders,
            state: AgentState::AwaitingWakeup,
            order_in_flight: false,
            subscription_requested: false,
            hours: None,
            mkt_closed: false,
            close_price: None,
            orders_placed: 0,
            fills: 0,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn quotes(&self) -> &QuoteCache {
        &self.quotes
    }

    pub fn order_in_flight(&self) -> bool {
        self.order_in_flight
    }

    pub fn market_hours(&self) -> Option<MarketHours> {
        self.hours
    }

    pub fn close_price(&self) -> Option<Price> {
        self.close_price
    }

    pub fn orders_placed(&self) -> u64 {
        self.orders_placed
    }

    pub fn fills(&self) -> u64 {
        self.fills
    }

    /// Schedule the first wakeup, one wake interval after kernel start
    pub fn kernel_starting<H: TradingHost>(&mut self, start: Timestamp, host: &mut H) {
        let first = self.schedule.next_wakeup(start);
        debug!("[{}] Kernel starting, first wakeup at {}", self.id, first);
        host.set_wakeup(first);
    }

    pub fn on_wakeup<H: TradingHost>(&mut self, now: Timestamp, host: &mut H) {
        if self.state == AgentState::AwaitingSpread {
            debug!("[{}] Wakeup while awaiting spread, ignored", self.id);
            return;
        }

        let Some(hours) = self.hours else {
            debug!("[{}] Market hours unknown, requesting", self.id);
            host.request_market_hours();
            self.transition(AgentState::Inactive);
            return;
        };

        if self.is_closed(now) {
            if self.close_price.is_none() {
                // One last look at the book to record the close
                host.query_spread(&self.symbol, SPREAD_DEPTH);
                self.transition(AgentState::AwaitingSpread);
            } else {
                self.transition(AgentState::Inactive);
            }
            return;
        }

        let resume_at = self.start_at.map_or(hours.open, |at| at.max(hours.open));
        if now < resume_at {
            host.set_wakeup(resume_at);
            self.transition(AgentState::Inactive);
            return;
        }

        if let QuoteMode::Stream { levels, freq_ns } = self.quote_mode {
            if !self.subscription_requested {
                host.request_data_subscription(
                    &self.symbol,
                    levels,
                    Duration::nanoseconds(freq_ns),
                );
                self.subscription_requested = true;
            }
            self.transition(AgentState::AwaitingMarketData);
            return;
        }

        if self.policy_complete() {
            self.transition(AgentState::Active);
            return;
        }

        host.query_spread(&self.symbol, SPREAD_DEPTH);
        self.transition(AgentState::AwaitingSpread);
    }

    pub fn on_message<H: TradingHost>(
        &mut self,
        now: Timestamp,
        message: AgentMessage,
        host: &mut H,
    ) {
        match message {
            AgentMessage::MarketHours { open, close } => {
                info!("[{}] Market hours {} - {}", self.id, open, close);
                self.hours = Some(MarketHours::new(open, close));
                host.set_wakeup(open.max(now));
            }
            AgentMessage::MarketClosed => {
                debug!("[{}] Market closed", self.id);
                self.mkt_closed = true;
            }
            AgentMessage::OrderAccepted { order_id, symbol } => {
                debug!("[{}] Order accepted: {} {}", self.id, order_id, symbol);
            }
            AgentMessage::OrderExecuted(execution) => self.on_execution(execution),
            AgentMessage::OrderCancelled { order_id, symbol } => {
                debug!("[{}] Order cancelled: {} {}", self.id, order_id, symbol);
                self.order_in_flight = false;
            }
            AgentMessage::QuerySpread {
                symbol,
                bids,
                asks,
                last_trade,
                mkt_closed,
            } => {
                if symbol != self.symbol {
                    return;
                }
                self.update_quotes(&bids, &asks, last_trade, now);
                if mkt_closed {
                    self.mkt_closed = true;
                }
                if self.state == AgentState::AwaitingSpread {
                    self.on_spread(now, host);
                }
            }
            AgentMessage::MarketData {
                symbol,
                bids,
                asks,
                last_transaction,
            } => {
                if symbol != self.symbol {
                    return;
                }
                self.update_quotes(&bids, &asks, last_transaction, now);
                if self.state == AgentState::AwaitingMarketData && !self.is_closed(now) {
                    self.evaluate(host);
                }
            }
        }
    }

    /// Value the portfolio at the known midpoint (else last fill) and log it
    pub fn kernel_stopping(&self) -> FinalValuation {
        let valuation = self.final_valuation();
        info!(
            "[{}] FINAL_VALUATION surplus={:?} shares={} cash={} start={} mark={:?}",
            self.id,
            valuation.surplus,
            valuation.shares,
            valuation.cash,
            valuation.starting_cash,
            valuation.mark
        );
        valuation
    }

    pub fn final_valuation(&self) -> FinalValuation {
        let shares = self.portfolio.holding(&self.symbol);
        let cash = self.portfolio.cash;
        let mark = self
            .quotes
            .midpoint(&self.symbol)
            .or_else(|| self.quotes.last_trade(&self.symbol));

        let position_value = match (shares, mark) {
            (0, _) => Some(Decimal::ZERO),
            (_, Some(mark)) => Some(mark * Decimal::from(shares)),
            (_, None) => None,
        };
        let surplus = position_value
            .filter(|_| !self.starting_cash.is_zero())
            .map(|value| (value + cash - self.starting_cash) / self.starting_cash);

        FinalValuation {
            agent_id: self.id.clone(),
            shares,
            cash,
            starting_cash: self.starting_cash,
            mark,
            surplus,
        }
    }

    fn on_spread<H: TradingHost>(&mut self, now: Timestamp, host: &mut H) {
        if self.is_closed(now) {
            if self.close_price.is_none() {
                self.close_price = self
                    .quotes
                    .midpoint(&self.symbol)
                    .or_else(|| self.quotes.last_trade(&self.symbol));
                info!("[{}] Close price {:?}", self.id, self.close_price);
            }
            self.transition(AgentState::Inactive);
            return;
        }

        self.evaluate(host);
        host.set_wakeup(self.schedule.next_wakeup(now));
        self.transition(AgentState::AwaitingWakeup);
    }

    fn on_execution(&mut self, execution: Execution) {
        if self.log_orders {
            info!(
                "[{}] Executed {:?} {} {} @ {}",
                self.id, execution.side, execution.quantity, execution.symbol, execution.fill_price
            );
        }
        self.portfolio.apply_execution(&execution);
        self.quotes
            .record_last_trade(&execution.symbol, execution.fill_price);
        self.fills += 1;
        // A one-shot policy stays latched once filled
        self.order_in_flight = self.policy.gate() == OrderGate::OneShot;
    }

    fn update_quotes(
        &mut self,
        bids: &[BookLevel],
        asks: &[BookLevel],
        last_trade: Option<Price>,
        now: Timestamp,
    ) {
        self.quotes.apply_snapshot(&self.symbol, bids, asks, now);
        if let Some(price) = last_trade {
            self.quotes.record_last_trade(&self.symbol, price);
        }
    }

    /// Run the policy against the cached quote and submit what it asks for
    fn evaluate<H: TradingHost>(&mut self, host: &mut H) {
        if self.order_in_flight && self.policy.gate() != OrderGate::Unrestricted {
            debug!("[{}] Order in flight, {} waits", self.id, self.policy.name());
            return;
        }

        let ctx = DecisionContext {
            symbol: &self.symbol,
            midpoint: self.quotes.midpoint(&self.symbol),
            portfolio: &self.portfolio,
            starting_cash: self.starting_cash,
            valuer: &*host,
        };
        let order = match self.policy.decide(&ctx) {
            Ok(Some(order)) => order,
            Ok(None) => return,
            Err(e) => {
                warn!("[{}] {} skipped this cycle: {}", self.id, self.policy.name(), e);
                return;
            }
        };

        if !order.ignore_risk {
            match within_exposure_limit(&order, &self.portfolio, self.starting_cash, &*host) {
                Ok(true) => {}
                Ok(false) => {
                    debug!(
                        "[{}] {:?} {} {} exceeds exposure limit",
                        self.id, order.side, order.quantity, order.symbol
                    );
                    return;
                }
                Err(e) => {
                    warn!("[{}] Exposure check failed: {}", self.id, e);
                    return;
                }
            }
        }

        if self.log_orders {
            info!(
                "[{}] Placing {:?} {} {} (ignore_risk={})",
                self.id, order.side, order.quantity, order.symbol, order.ignore_risk
            );
        } else {
            debug!(
                "[{}] Placing {:?} {} {}",
                self.id, order.side, order.quantity, order.symbol
            );
        }
        host.place_market_order(order);
        self.order_in_flight = true;
        self.orders_placed += 1;
    }

    fn policy_complete(&self) -> bool {
        self.policy.gate() == OrderGate::OneShot && self.order_in_flight && self.fills > 0
    }

    fn is_closed(&self, now: Timestamp) -> bool {
        self.mkt_closed || self.hours.is_some_and(|h| h.is_closed(now))
    }

    fn transition(&mut self, next: AgentState) {
        if self.state != next {
            debug!("[{}] {} -> {}", self.id, self.state, next);
            self.state = next;
        }
    }
}
