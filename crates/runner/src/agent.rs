//! Agent Runner - drives one agent from a kernel event channel
//!
//! The kernel pushes `KernelEvent`s; the runner hands them to the agent
//! one at a time, so callbacks for the same agent never overlap. Requests
//! the agent makes go out through its host.

use ballast_core::Timestamp;
use ballast_ports::{AgentMessage, TradingHost};
use tokio::sync::mpsc;

use crate::lifecycle::{FinalValuation, TradingAgent};

/// Callback delivered by the kernel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KernelEvent {
    /// Kernel start; the agent schedules its first wakeup
    Start(Timestamp),
    Wakeup(Timestamp),
    Message {
        at: Timestamp,
        message: AgentMessage,
    },
    /// Kernel stop; the runner reports the final valuation and exits
    Stop,
}

/// Agent runner - wraps an agent and its host
pub struct AgentRunner<H: TradingHost> {
    agent: TradingAgent,
    host: H,
    events: mpsc::Receiver<KernelEvent>,
}

impl<H: TradingHost> AgentRunner<H> {
    pub fn new(agent: TradingAgent, host: H, events: mpsc::Receiver<KernelEvent>) -> Self {
        Self {
            agent,
            host,
            events,
        }
    }

    pub fn agent(&self) -> &TradingAgent {
        &self.agent
    }

    fn handle(&mut self, event: KernelEvent) {
        match event {
            KernelEvent::Start(at) => self.agent.kernel_starting(at, &mut self.host),
            KernelEvent::Wakeup(at) => self.agent.on_wakeup(at, &mut self.host),
            KernelEvent::Message { at, message } => {
                log::debug!("[{}] Received {}", self.agent.id(), message.tag());
                self.agent.on_message(at, message, &mut self.host);
            }
            KernelEvent::Stop => {}
        }
    }

    /// Run until `Stop` or until the kernel drops its sender
    pub async fn run(mut self) -> FinalValuation {
        log::info!("[{}] Agent started", self.agent.id());

        while let Some(event) = self.events.recv().await {
            if event == KernelEvent::Stop {
                break;
            }
            self.handle(event);
        }

        let valuation = self.agent.kernel_stopping();
        log::info!("[{}] Agent stopped", self.agent.id());
        valuation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AgentConfig;
    use crate::host::{ChannelHost, MarkBoard};
    use ballast_ports::HostRequest;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use tokio::sync::watch;

    #[tokio::test]
    async fn test_runner_forwards_requests_and_stops() {
        let (event_tx, event_rx) = mpsc::channel(16);
        let (request_tx, mut request_rx) = mpsc::unbounded_channel();
        let (_marks_tx, marks_rx) = watch::channel(MarkBoard::new());

        let agent =
            TradingAgent::from_config(&AgentConfig::cppi("cppi-1", "IBM", dec!(10_000_000)))
                .unwrap();
        let host = ChannelHost::new("cppi-1", request_tx, marks_rx);
        let handle = tokio::spawn(AgentRunner::new(agent, host, event_rx).run());

        let start = Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap();
        event_tx.send(KernelEvent::Start(start)).await.unwrap();
        event_tx.send(KernelEvent::Stop).await.unwrap();

        let valuation = handle.await.unwrap();
        assert_eq!(valuation.agent_id, "cppi-1");
        assert_eq!(valuation.surplus, Some(dec!(0)));

        let first = request_rx.recv().await.unwrap();
        assert_eq!(
            first.request,
            HostRequest::Wakeup(start + chrono::Duration::seconds(60))
        );
    }
}
