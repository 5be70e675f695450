//! Orquestador de despliegue.
//!
//! Recorre el registro en orden topológico y, por cada artifact:
//! 1. Resuelve argumentos y enlaces de librería contra las ubicaciones ya
//!    conocidas (historial + publicaciones de este run).
//! 2. Decide reutilizar o publicar según `SkipPolicy`.
//! 3. Si publica, registra en el historial antes de continuar.
//! 4. Despacha la verificación (no fatal).
//!
//! Toda decisión queda en el `EventStore` bajo el `run_id` del run.
use chrono::Utc;
use log::{debug, error, info, warn};
use serde_json::json;
use uuid::Uuid;

use super::config::{RunConfig, SkipPolicy};
use super::report::{ArtifactAction, ArtifactOutcome, RunReport, VerificationStatus};
use crate::accounts::NamedAccounts;
use crate::constants::{DEPLOYER_ROLE, ENGINE_VERSION};
use crate::errors::DeployError;
use crate::event::{EventStore, InMemoryEventStore, RunEvent, RunEventKind};
use crate::hashing::hash_value;
use crate::model::{Address, ArtifactSpec, History, PublishedRecord, RunState};
use crate::registry::Registry;
use crate::resolver::{compute_target_location, deterministic_salt, ResolvedInputs};
use crate::services::{HistoryError, HistoryStore, LedgerPublisher, PublishRequest, VerificationService};
use crate::verify::VerificationDispatcher;

pub struct Orchestrator<P, V, H, E = InMemoryEventStore>
    where P: LedgerPublisher,
          V: VerificationService,
          H: HistoryStore,
          E: EventStore
{
    pub(crate) publisher: P,
    pub(crate) dispatcher: VerificationDispatcher<V>,
    pub(crate) history: H,
    pub(crate) event_store: E,
    pub(crate) accounts: NamedAccounts,
    pub(crate) config: RunConfig,
    pub(crate) last_run_id: Option<Uuid>,
}

impl<P, V, H, E> Orchestrator<P, V, H, E>
    where P: LedgerPublisher,
          V: VerificationService,
          H: HistoryStore,
          E: EventStore
{
    /// Ejecuta un run completo cargando el historial desde el `HistoryStore`.
    ///
    /// Las precondiciones (cuentas nombradas) se validan antes de cualquier
    /// lectura o publicación.
    pub async fn run(&mut self, registry: &Registry) -> Result<RunReport, DeployError> {
        self.check_preconditions(registry)?;
        let prior = self.history
                        .load()
                        .map_err(|e| DeployError::HistoryLoadFailed(e.to_string()))?;
        debug!("run:history_loaded network={} records={}", self.accounts.network(), prior.len());
        self.execute(registry, prior).await
    }

    /// Igual que `run` pero con un historial previo provisto por el llamador.
    pub async fn run_with_history(&mut self,
                                  registry: &Registry,
                                  prior_history: History)
                                  -> Result<RunReport, DeployError> {
        self.check_preconditions(registry)?;
        self.execute(registry, prior_history).await
    }

    /// Falla con `MissingNamedAccount` si falta el deployer o cualquier rol
    /// referenciado por los argumentos del registro.
    pub fn check_preconditions(&self, registry: &Registry) -> Result<(), DeployError> {
        self.accounts.require(DEPLOYER_ROLE)?;
        for role in registry.account_roles() {
            self.accounts.require(role)?;
        }
        Ok(())
    }

    async fn execute(&mut self, registry: &Registry, prior_history: History) -> Result<RunReport, DeployError> {
        let deployer = self.accounts.require(DEPLOYER_ROLE)?.clone();
        let run_id = Uuid::new_v4();
        self.last_run_id = Some(run_id);
        let network = self.accounts.network().to_string();
        info!("run:start run_id={run_id} network={network} artifacts={} registry_hash={}",
              registry.len(),
              registry.registry_hash());
        self.event_store.append_kind(run_id,
                                     RunEventKind::RunInitialized { registry_hash: registry.registry_hash()
                                                                                       .to_string(),
                                                                    artifact_count: registry.len(),
                                                                    network: network.clone() });

        let mut state = RunState::from_history(prior_history);
        let mut outcomes = Vec::with_capacity(registry.len());
        for spec in registry.topological_order() {
            let outcome = self.process_artifact(run_id, spec, &deployer, &mut state).await?;
            outcomes.push(outcome);
        }

        // Cada registro ya se escribió al publicarse; esto sólo consolida.
        if let Err(e) = self.history.save(&state) {
            warn!("run:save_failed run_id={run_id} err={e}");
        }

        let fingerprint = run_fingerprint(registry, &state);
        let caveats = outcomes.iter().filter(|o| o.has_caveat()).count();
        self.event_store.append_kind(run_id,
                                     RunEventKind::RunCompleted { run_fingerprint: fingerprint.clone(),
                                                                  caveats });
        info!("run:done run_id={run_id} fingerprint={fingerprint} caveats={caveats}");

        Ok(RunReport { run_id,
                       network,
                       state,
                       events: self.event_store.list(run_id),
                       outcomes,
                       fingerprint })
    }

    async fn process_artifact(&mut self,
                              run_id: Uuid,
                              spec: &ArtifactSpec,
                              deployer: &Address,
                              state: &mut RunState)
                              -> Result<ArtifactOutcome, DeployError> {
        let inputs = ResolvedInputs::resolve(spec, &state.locations(), &self.accounts)?;

        // El historial manda: se relee justo antes de decidir publicar.
        if !state.contains(&spec.name) {
            if let Some(found) = self.history
                                     .get(&spec.name)
                                     .map_err(|e| DeployError::HistoryLoadFailed(e.to_string()))?
            {
                info!("process:history_hit artifact={} location={}", spec.name, found.location);
                state.insert(found);
            }
        }

        let reusable = match state.get(&spec.name) {
            None => None,
            Some(existing) => {
                let stale = !inputs.matches(spec, existing);
                match (self.config.skip_policy, stale) {
                    (SkipPolicy::RedeployChanged, true) => {
                        info!("process:redeploy artifact={} reason=inputs_changed", spec.name);
                        None
                    }
                    _ => Some((existing.clone(), stale)),
                }
            }
        };

        match reusable {
            Some((record, stale)) => self.reuse(run_id, record, stale, state).await,
            None => {
                let (record, transaction_ref) = match self.publish(run_id, spec, inputs, deployer).await {
                    Ok(published) => published,
                    Err(DeployError::HistoryWriteFailed { artifact, reason, record }) => {
                        // Último intento: consolidar el estado completo, incluido el huérfano.
                        state.insert((*record).clone());
                        if let Err(e) = self.history.save(state) {
                            warn!("run:save_failed run_id={run_id} err={e}");
                        }
                        return Err(DeployError::HistoryWriteFailed { artifact, reason, record });
                    }
                    Err(e) => return Err(e),
                };
                state.insert(record.clone());
                let verification = self.verify_record(run_id, &record, state).await;
                Ok(ArtifactOutcome { name: record.name,
                                     location: record.location,
                                     action: ArtifactAction::Published { transaction_ref },
                                     verification })
            }
        }
    }

    async fn reuse(&mut self,
                   run_id: Uuid,
                   record: PublishedRecord,
                   stale: bool,
                   state: &mut RunState)
                   -> Result<ArtifactOutcome, DeployError> {
        if stale {
            warn!("reuse:stale artifact={} location={} (inputs differ from recorded ones)",
                  record.name,
                  record.location);
        } else {
            info!("reuse artifact={} location={}", record.name, record.location);
        }
        self.event_store.append_kind(run_id,
                                     RunEventKind::Reused { name: record.name.clone(),
                                                            location: record.location.clone(),
                                                            stale });
        let verification = if record.verified {
            VerificationStatus::PreviouslyVerified
        } else if self.config.verify_reused {
            self.verify_record(run_id, &record, state).await
        } else {
            VerificationStatus::Skipped
        };
        Ok(ArtifactOutcome { name: record.name,
                             location: record.location,
                             action: ArtifactAction::Reused { stale },
                             verification })
    }

    /// Publica y escribe el registro en el historial. Cualquier error aquí
    /// detiene el run.
    async fn publish(&mut self,
                     run_id: Uuid,
                     spec: &ArtifactSpec,
                     inputs: ResolvedInputs,
                     deployer: &Address)
                     -> Result<(PublishedRecord, String), DeployError> {
        let expected = compute_target_location(spec, &inputs)?;
        let salt = deterministic_salt(&spec.name, &spec.salt_seed);
        let request = PublishRequest { artifact: spec.name.clone(),
                                       bytecode_ref: spec.bytecode_ref.clone(),
                                       constructor_args: inputs.constructor_args.clone(),
                                       libraries: inputs.libraries.clone(),
                                       from: deployer.clone(),
                                       salt: salt.clone(),
                                       expected_location: expected.clone() };
        info!("publish:start artifact={} expected={expected} libraries={}",
              spec.name,
              inputs.libraries.len());

        let receipt = match self.publisher.publish(&request).await {
            Ok(r) => r,
            Err(e) => {
                error!("publish:failed artifact={} err={e}", spec.name);
                self.event_store.append_kind(run_id,
                                             RunEventKind::Failed { name: spec.name.clone(),
                                                                    error: e.to_string() });
                return Err(DeployError::PublishFailed { run_id,
                                                        artifact: spec.name.clone(),
                                                        reason: e.to_string() });
            }
        };
        if receipt.location != expected {
            warn!("publish:location_mismatch artifact={} expected={expected} actual={}",
                  spec.name,
                  receipt.location);
        }

        let record = PublishedRecord { name: spec.name.clone(),
                                       location: receipt.location,
                                       bytecode_ref: spec.bytecode_ref.clone(),
                                       constructor_args_used: inputs.constructor_args,
                                       libraries_used: inputs.libraries,
                                       salt,
                                       transaction_ref: Some(receipt.transaction_ref.clone()),
                                       published_at: Utc::now(),
                                       verified: false };
        if let Err(e) = self.record_durably(&record).await {
            error!("publish:history_write_failed artifact={} location={} tx={} err={e}",
                   spec.name,
                   record.location,
                   receipt.transaction_ref);
            self.event_store.append_kind(run_id,
                                         RunEventKind::Failed { name: spec.name.clone(),
                                                                error: format!("history write: {e}") });
            return Err(DeployError::HistoryWriteFailed { artifact: spec.name.clone(),
                                                         reason: e.to_string(),
                                                         record: Box::new(record) });
        }
        self.event_store.append_kind(run_id,
                                     RunEventKind::Published { name: record.name.clone(),
                                                               location: record.location.clone(),
                                                               transaction_ref: receipt.transaction_ref.clone(),
                                                               libraries: record.libraries_used.clone() });
        info!("publish:ok artifact={} location={} tx={}",
              record.name,
              record.location,
              receipt.transaction_ref);
        Ok((record, receipt.transaction_ref))
    }

    /// Escribe un registro recién publicado, reintentando con la
    /// `RetryPolicy` del run.
    async fn record_durably(&mut self, record: &PublishedRecord) -> Result<(), HistoryError> {
        let policy = self.config.retry;
        let mut attempt = 1;
        loop {
            match self.history.record(record) {
                Ok(()) => return Ok(()),
                Err(e) if attempt < policy.max_attempts => {
                    let delay = policy.delay_after(attempt);
                    warn!("publish:history_write_retry artifact={} attempt={attempt} delay_ms={} err={e}",
                          record.name,
                          delay.as_millis());
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Verificación no fatal: el resultado queda en eventos y en el reporte.
    async fn verify_record(&mut self,
                           run_id: Uuid,
                           record: &PublishedRecord,
                           state: &mut RunState)
                           -> VerificationStatus {
        let report = self.dispatcher.dispatch(record).await;
        if report.verified {
            if let Some(updated) = state.mark_verified(&record.name) {
                if let Err(e) = self.history.record(updated) {
                    warn!("verify:flag_not_persisted artifact={} err={e}", record.name);
                }
            }
            self.event_store.append_kind(run_id,
                                         RunEventKind::VerificationSucceeded { name: record.name.clone(),
                                                                               attempts: report.attempts,
                                                                               already_verified:
                                                                                   report.already_verified });
            VerificationStatus::Verified { attempts: report.attempts,
                                           already_verified: report.already_verified }
        } else {
            let error = report.last_error
                              .unwrap_or_else(|| "verification failed".to_string());
            self.event_store.append_kind(run_id,
                                         RunEventKind::VerificationFailed { name: record.name.clone(),
                                                                            attempts: report.attempts,
                                                                            error: error.clone() });
            VerificationStatus::Failed { attempts: report.attempts,
                                         error }
        }
    }

    pub fn events_for(&self, run_id: Uuid) -> Vec<RunEvent> {
        self.event_store.list(run_id)
    }

    pub fn last_run_id(&self) -> Option<Uuid> {
        self.last_run_id
    }

    pub fn accounts(&self) -> &NamedAccounts {
        &self.accounts
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    pub fn verifier(&self) -> &V {
        self.dispatcher.service()
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    pub fn event_store(&self) -> &E {
        &self.event_store
    }
}

/// Fingerprint agregado del run: versión del motor, hash del registro y las
/// ubicaciones finales en orden topológico. Dos runs sobre el mismo
/// registro y el mismo historial producen el mismo valor.
pub fn run_fingerprint(registry: &Registry, state: &RunState) -> String {
    let locations: Vec<serde_json::Value> =
        registry.topological_order()
                .filter_map(|spec| state.get(&spec.name).map(|r| json!([spec.name, r.location.as_str()])))
                .collect();
    hash_value(&json!({
                   "engine_version": ENGINE_VERSION,
                   "registry_hash": registry.registry_hash(),
                   "locations": locations,
               }))
}
