//! Builder para `Orchestrator`.
//!
//! Colaboradores obligatorios en `new` (publisher, verificador, historial y
//! cuentas); el resto tiene valores por defecto. `event_store` cambia el
//! tipo del builder para admitir cualquier `EventStore`.
//!
//! ```ignore
//! let mut orchestrator = OrchestratorBuilder::new(ledger, verifier, history, accounts)
//!     .skip_policy(SkipPolicy::RedeployChanged)
//!     .retry_policy(RetryPolicy::immediate(3))
//!     .build();
//! ```

use super::config::{RunConfig, SkipPolicy};
use super::core::Orchestrator;
use crate::accounts::NamedAccounts;
use crate::event::{EventStore, InMemoryEventStore};
use crate::services::{HistoryStore, LedgerPublisher, VerificationService};
use crate::verify::{RetryPolicy, VerificationDispatcher};

#[derive(Debug)]
pub struct OrchestratorBuilder<P, V, H, E = InMemoryEventStore> {
    publisher: P,
    verifier: V,
    history: H,
    event_store: E,
    accounts: NamedAccounts,
    config: RunConfig,
}

impl<P, V, H> OrchestratorBuilder<P, V, H, InMemoryEventStore>
    where P: LedgerPublisher,
          V: VerificationService,
          H: HistoryStore
{
    pub fn new(publisher: P, verifier: V, history: H, accounts: NamedAccounts) -> Self {
        Self { publisher,
               verifier,
               history,
               event_store: InMemoryEventStore::default(),
               accounts,
               config: RunConfig::default() }
    }
}

impl<P, V, H, E> OrchestratorBuilder<P, V, H, E>
    where P: LedgerPublisher,
          V: VerificationService,
          H: HistoryStore,
          E: EventStore
{
    pub fn config(mut self, config: RunConfig) -> Self {
        self.config = config;
        self
    }

    pub fn skip_policy(mut self, policy: SkipPolicy) -> Self {
        self.config.skip_policy = policy;
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.config.retry = policy;
        self
    }

    pub fn verify_reused(mut self, enabled: bool) -> Self {
        self.config.verify_reused = enabled;
        self
    }

    /// Reemplaza el store de eventos (p.ej. uno compartido entre runs).
    pub fn event_store<E2: EventStore>(self, event_store: E2) -> OrchestratorBuilder<P, V, H, E2> {
        OrchestratorBuilder { publisher: self.publisher,
                              verifier: self.verifier,
                              history: self.history,
                              event_store,
                              accounts: self.accounts,
                              config: self.config }
    }

    pub fn build(self) -> Orchestrator<P, V, H, E> {
        Orchestrator { publisher: self.publisher,
                       dispatcher: VerificationDispatcher::new(self.verifier, self.config.retry),
                       history: self.history,
                       event_store: self.event_store,
                       accounts: self.accounts,
                       config: self.config,
                       last_run_id: None }
    }
}
