//! Simulation - deterministic market day
//!
//! A single-threaded discrete-event loop standing in for the external
//! kernel. It ties together:
//! - The simulated venue (quotes, fills, market hours)
//! - A seeded quote feed moving the market
//! - Any number of trading agents
//! - Request/response routing with a fixed latency
//!
//! Events are ordered by `(time, sequence)`, so a run with the same
//! configuration and seeds always replays identically.

use ballast_core::{MarketHours, Price, Quantity, Symbol, Timestamp};
use ballast_ports::{AgentMessage, HostRequest};
use chrono::{Duration, TimeZone, Utc};
use exchange_sim::{SimVenue, VenueSession};
use log::{debug, info, warn};
use priority_queue::PriorityQueue;
use std::cmp::Reverse;
use std::collections::HashMap;

use crate::error::{Result, RunnerError};
use crate::event_feed::{QuoteFeed, QuoteFeedConfig};
use crate::lifecycle::{FinalValuation, TradingAgent};
use crate::state::AgentState;

/// Simulation configuration
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Kernel start; agents schedule their first wakeup from here
    pub start: Timestamp,
    /// Kernel stop; events after this are discarded
    pub end: Timestamp,
    pub hours: MarketHours,
    /// One-way delay between an agent and the venue
    pub latency: Duration,
    /// Time between quote feed ticks
    pub quote_interval: Duration,
    pub feed: QuoteFeedConfig,
    pub feed_seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let day = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).single().unwrap_or_default();
        let open = day + Duration::hours(9) + Duration::minutes(30);
        let close = day + Duration::hours(16);
        Self {
            start: day + Duration::hours(9),
            end: close + Duration::minutes(5),
            hours: MarketHours::new(open, close),
            latency: Duration::milliseconds(1),
            quote_interval: Duration::seconds(5),
            feed: QuoteFeedConfig::default(),
            feed_seed: 42,
        }
    }
}

/// Simulation results
#[derive(Debug, Clone, Default)]
pub struct SimulationResults {
    /// Final valuation per agent, in agent order
    pub valuations: Vec<FinalValuation>,
    pub orders_by_agent: HashMap<String, u64>,
    pub fills_by_agent: HashMap<String, u64>,
    pub holdings_by_agent: HashMap<String, Quantity>,
    pub states_by_agent: HashMap<String, AgentState>,
    pub close_price_by_agent: HashMap<String, Option<Price>>,
    pub total_orders: u64,
    pub total_fills: u64,
    pub events_processed: u64,
}

#[derive(Debug, Clone)]
enum SimEvent {
    Wakeup(usize),
    Deliver(usize, AgentMessage),
    /// Request arriving at the venue
    Request(usize, HostRequest),
    QuoteTick,
    /// Snapshot due for a subscription
    Publish(usize),
    Close,
}

#[derive(Debug, Clone)]
struct Subscription {
    agent: usize,
    symbol: Symbol,
    levels: usize,
    freq: Duration,
}

/// Full market day simulation
pub struct Simulation {
    config: SimulationConfig,
    venue: SimVenue,
    feed: QuoteFeed,
    agents: Vec<TradingAgent>,
    queue: PriorityQueue<u64, Reverse<(Timestamp, u64)>>,
    pending: HashMap<u64, SimEvent>,
    next_seq: u64,
    subscriptions: Vec<Subscription>,
    now: Timestamp,
    events_processed: u64,
}

impl Simulation {
    /// Create a simulation. Every agent must trade the feed's symbol.
    pub fn new(config: SimulationConfig, agents: Vec<TradingAgent>) -> Result<Self> {
        let symbol = config.feed.symbol.clone();
        if let Some(agent) = agents.iter().find(|a| a.symbol() != symbol) {
            return Err(RunnerError::UnlistedSymbol {
                agent_id: agent.id().to_string(),
                symbol: agent.symbol().to_string(),
            });
        }

        let mut venue = SimVenue::new([symbol.clone()], config.hours);
        let feed = QuoteFeed::with_seed(config.feed.clone(), config.feed_seed);
        let (bid, ask) = feed.quote();
        venue.set_quote(&symbol, bid, ask, config.feed.depth)?;

        Ok(Self {
            now: config.start,
            config,
            venue,
            feed,
            agents,
            queue: PriorityQueue::new(),
            pending: HashMap::new(),
            next_seq: 0,
            subscriptions: Vec::new(),
            events_processed: 0,
        })
    }

    pub fn agents(&self) -> &[TradingAgent] {
        &self.agents
    }

    pub fn venue(&self) -> &SimVenue {
        &self.venue
    }

    /// Run the day from kernel start to kernel stop
    pub fn run(&mut self) -> SimulationResults {
        info!(
            "[Simulation] Starting {} agents, market {} - {}",
            self.agents.len(),
            self.config.hours.open,
            self.config.hours.close
        );

        let start = self.config.start;
        self.now = start;
        for agent in 0..self.agents.len() {
            self.dispatch(agent, |a, host| a.kernel_starting(start, host));
        }
        self.schedule(start, SimEvent::QuoteTick);
        self.schedule(self.config.hours.close, SimEvent::Close);

        while let Some((seq, Reverse((at, _)))) = self.queue.pop() {
            if at > self.config.end {
                break;
            }
            let Some(event) = self.pending.remove(&seq) else {
                continue;
            };
            self.now = at;
            self.events_processed += 1;
            self.handle(event);
        }

        info!("[Simulation] Stopped after {} events", self.events_processed);
        self.results()
    }

    fn schedule(&mut self, at: Timestamp, event: SimEvent) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.insert(seq, event);
        self.queue.push(seq, Reverse((at, seq)));
    }

    /// Invoke an agent callback against a fresh venue session and route
    /// whatever it asked for
    fn dispatch(
        &mut self,
        agent: usize,
        callback: impl FnOnce(&mut TradingAgent, &mut VenueSession<'_>),
    ) {
        let mut session = self.venue.session();
        callback(&mut self.agents[agent], &mut session);
        let requests = session.into_requests();
        self.route(agent, requests);
    }

    fn route(&mut self, agent: usize, requests: Vec<HostRequest>) {
        for request in requests {
            match request {
                HostRequest::Wakeup(at) => self.schedule(at.max(self.now), SimEvent::Wakeup(agent)),
                other => {
                    let arrival = self.now + self.config.latency;
                    self.schedule(arrival, SimEvent::Request(agent, other));
                }
            }
        }
    }

    fn handle(&mut self, event: SimEvent) {
        let now = self.now;
        match event {
            SimEvent::Wakeup(agent) => {
                self.dispatch(agent, |a, host| a.on_wakeup(now, host));
            }
            SimEvent::Deliver(agent, message) => {
                self.dispatch(agent, |a, host| a.on_message(now, message, host));
            }
            SimEvent::Request(agent, request) => {
                if let HostRequest::Subscribe {
                    symbol,
                    levels,
                    freq,
                } = &request
                {
                    self.subscriptions.push(Subscription {
                        agent,
                        symbol: symbol.clone(),
                        levels: *levels,
                        freq: *freq,
                    });
                    self.schedule(now, SimEvent::Publish(self.subscriptions.len() - 1));
                }

                let reply_at = now + self.config.latency;
                for reply in self.venue.respond(&request, now) {
                    self.schedule(reply_at, SimEvent::Deliver(agent, reply));
                }
            }
            SimEvent::QuoteTick => {
                if let Err(e) = self.feed.tick(&mut self.venue) {
                    warn!("[Simulation] Quote feed failed: {}", e);
                }
                if !self.config.hours.is_closed(now) {
                    self.schedule(now + self.config.quote_interval, SimEvent::QuoteTick);
                }
            }
            SimEvent::Publish(id) => self.publish(id),
            SimEvent::Close => {
                debug!("[Simulation] Market closed at {}", now);
                for agent in 0..self.agents.len() {
                    self.schedule(now, SimEvent::Deliver(agent, AgentMessage::MarketClosed));
                }
            }
        }
    }

    /// Push one snapshot to a subscriber and schedule the next
    fn publish(&mut self, id: usize) {
        // Subscriptions lapse at the close
        if self.config.hours.is_closed(self.now) {
            return;
        }
        let Some(subscription) = self.subscriptions.get(id).cloned() else {
            return;
        };
        if subscription.freq <= Duration::zero() {
            warn!(
                "[Simulation] Dropping subscription with non-positive frequency for agent {}",
                subscription.agent
            );
            return;
        }

        match self.venue.market_data(&subscription.symbol, subscription.levels) {
            Ok(message) => {
                let at = self.now + self.config.latency;
                self.schedule(at, SimEvent::Deliver(subscription.agent, message));
            }
            Err(e) => warn!("[Simulation] Market data failed: {}", e),
        }
        self.schedule(self.now + subscription.freq, SimEvent::Publish(id));
    }

    fn results(&self) -> SimulationResults {
        let mut results = SimulationResults {
            events_processed: self.events_processed,
            ..Default::default()
        };

        for agent in &self.agents {
            let id = agent.id().to_string();
            results.valuations.push(agent.kernel_stopping());
            results.orders_by_agent.insert(id.clone(), agent.orders_placed());
            results.fills_by_agent.insert(id.clone(), agent.fills());
            results
                .holdings_by_agent
                .insert(id.clone(), agent.portfolio().holding(agent.symbol()));
            results.states_by_agent.insert(id.clone(), agent.state());
            results.close_price_by_agent.insert(id, agent.close_price());
            results.total_orders += agent.orders_placed();
            results.total_fills += agent.fills();
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AgentConfig;
    use rust_decimal_macros::dec;

    #[test]
    fn test_unlisted_symbol_rejected() {
        let agent =
            TradingAgent::from_config(&AgentConfig::wbr("wbr-1", "MSFT", dec!(1_000_000))).unwrap();
        let result = Simulation::new(SimulationConfig::default(), vec![agent]);
        assert!(matches!(
            result,
            Err(RunnerError::UnlistedSymbol { symbol, .. }) if symbol == "MSFT"
        ));
    }

    #[test]
    fn test_events_ordered_by_time_then_sequence() {
        let mut sim = Simulation::new(SimulationConfig::default(), Vec::new()).unwrap();
        let t0 = sim.config.start;
        sim.schedule(t0 + Duration::seconds(2), SimEvent::Close);
        sim.schedule(t0, SimEvent::QuoteTick);
        sim.schedule(t0, SimEvent::Publish(7));

        let order: Vec<u64> = std::iter::from_fn(|| sim.queue.pop().map(|(seq, _)| seq)).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn test_empty_day_runs_to_close() {
        let mut sim = Simulation::new(SimulationConfig::default(), Vec::new()).unwrap();
        let results = sim.run();
        assert_eq!(results.total_orders, 0);
        assert!(results.events_processed > 0);
        assert!(results.valuations.is_empty());
    }
}
