//! Exam session orchestration.
//!
//! `Engine` ties the store, the oracle adapters, and the QR signer together
//! behind the operations the CLI exposes: the schedule pipeline, hall ticket
//! authorization and issuance, attendance marking, and cascade deletion.
//!
//! The engine is generic over the oracle traits so orchestration behavior is
//! testable with in-process fakes returning scripted responses; production
//! wires in the subprocess implementations via [`Engine::with_process_oracles`].

pub mod artifacts;
pub mod attendance;
pub mod error;
pub mod pipeline;
pub mod tickets;

pub use error::EngineError;

use proctor_config::ProctorConfig;
use proctor_db::store::ExamStore;
use proctor_oracle::{
    ArtifactOracle, ProcessArtifactOracle, ProcessSeatingOracle, ProcessTimetableOracle,
    SeatingOracle, TimetableOracle,
};
use proctor_qr::QrSigner;

/// Orchestrates exam operations over a store and a set of oracles.
pub struct Engine<T, S, A> {
    store: ExamStore,
    config: ProctorConfig,
    signer: QrSigner,
    timetable_oracle: T,
    seating_oracle: S,
    artifact_oracle: A,
}

impl<T, S, A> Engine<T, S, A>
where
    T: TimetableOracle,
    S: SeatingOracle,
    A: ArtifactOracle,
{
    pub fn new(
        store: ExamStore,
        config: ProctorConfig,
        timetable_oracle: T,
        seating_oracle: S,
        artifact_oracle: A,
    ) -> Self {
        let signer = QrSigner::new(&config.signing.secret);
        Self {
            store,
            config,
            signer,
            timetable_oracle,
            seating_oracle,
            artifact_oracle,
        }
    }

    /// Access the underlying store (list/show commands go straight through).
    #[must_use]
    pub const fn store(&self) -> &ExamStore {
        &self.store
    }

    #[must_use]
    pub const fn config(&self) -> &ProctorConfig {
        &self.config
    }

    #[must_use]
    pub const fn signer(&self) -> &QrSigner {
        &self.signer
    }
}

/// Engine wired to the subprocess oracle implementations.
pub type ProcessEngine = Engine<ProcessTimetableOracle, ProcessSeatingOracle, ProcessArtifactOracle>;

impl ProcessEngine {
    /// Production constructor: opens the configured database and binds the
    /// subprocess oracles to the configured scripts.
    ///
    /// # Errors
    ///
    /// Returns `EngineError` if the database cannot be opened.
    pub async fn with_process_oracles(config: ProctorConfig) -> Result<Self, EngineError> {
        let store = ExamStore::new_local(&config.storage.db_path).await?;
        let oracle_config = config.oracle.clone();
        Ok(Self::new(
            store,
            config,
            ProcessTimetableOracle::new(oracle_config.clone()),
            ProcessSeatingOracle::new(oracle_config.clone()),
            ProcessArtifactOracle::new(oracle_config),
        ))
    }
}
