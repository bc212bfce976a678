use crate::api::RestClient;
use crate::controller::{Outcome, Request, perform};
use tokio::sync::mpsc;

/// Runs repository requests in the background and hands their outcomes back
/// to the event loop.
///
/// Requests are neither deduplicated nor cancellable: everything submitted
/// eventually produces exactly one outcome.
pub struct Dispatcher {
    client: RestClient,
    outcome_sender: mpsc::UnboundedSender<Outcome>,
    outcome_receiver: mpsc::UnboundedReceiver<Outcome>,
    in_flight: usize,
}

impl Dispatcher {
    pub fn new(client: RestClient) -> Self {
        let (outcome_sender, outcome_receiver) = mpsc::unbounded_channel();
        Self {
            client,
            outcome_sender,
            outcome_receiver,
            in_flight: 0,
        }
    }

    /// Spawn a task that runs `request`.
    pub fn submit(&mut self, request: Request) {
        tracing::debug!(?request, "dispatching request");
        let client = self.client.clone();
        let sender = self.outcome_sender.clone();
        self.in_flight += 1;

        tokio::spawn(async move {
            let outcome = perform(&client, request).await;
            // Receiver only goes away on shutdown.
            let _ = sender.send(outcome);
        });
    }

    /// Next finished outcome, if any (non-blocking).
    pub fn poll_outcome(&mut self) -> Option<Outcome> {
        let outcome = self.outcome_receiver.try_recv().ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(outcome)
    }

    /// Number of requests that have not reported back yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}
