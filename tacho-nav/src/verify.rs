//! Background signature verification of card data files.
//!
//! Each load schedules at most one task per card generation that carries
//! `dataFiles`. A task owns a snapshot of everything it needs (files, ERCA
//! key, load id) and reports through a `VerificationSink`; it never touches
//! the session. Results for a record that has since been replaced are
//! dropped.

use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tacho_model::{CardGenBlock, CardGeneration, DataFiles, Record};

use crate::queue::TaskQueue;

/// Required ERCA public key size for Gen1 cards, in bytes.
pub const GEN1_ERCA_KEY_LEN: usize = 144;
/// Required ERCA public key size for Gen2 cards, in bytes.
pub const GEN2_ERCA_KEY_LEN: usize = 205;

#[derive(Debug, Clone, thiserror::Error)]
pub enum VerifyError {
    #[error("no data files to verify")]
    EmptyInputData,
    #[error("ERCA public key for {generation} must be {expected} bytes, got {actual}")]
    KeyLength {
        generation: CardGeneration,
        expected: usize,
        actual: usize,
    },
    #[error("verification failed: {0}")]
    Failed(String),
    #[error("verifier panicked: {0}")]
    Panicked(String),
}

/// Checks card data file signatures against an ERCA public key.
pub trait SignatureVerifier: Send + Sync {
    fn verify(&self, data_files: &DataFiles, public_key: &[u8]) -> Result<bool, VerifyError>;
}

impl<F> SignatureVerifier for F
where
    F: Fn(&DataFiles, &[u8]) -> Result<bool, VerifyError> + Send + Sync,
{
    fn verify(&self, data_files: &DataFiles, public_key: &[u8]) -> Result<bool, VerifyError> {
        self(data_files, public_key)
    }
}

/// ERCA public keys, one per card generation.
#[derive(Debug, Clone, Default)]
pub struct ErcaKeys {
    gen1: Option<Arc<[u8]>>,
    gen2: Option<Arc<[u8]>>,
}

impl ErcaKeys {
    pub fn new(gen1: Option<Vec<u8>>, gen2: Option<Vec<u8>>) -> Self {
        Self {
            gen1: gen1.map(Arc::from),
            gen2: gen2.map(Arc::from),
        }
    }

    /// Read keys from files. A `None` path leaves that generation without a key.
    pub fn from_files(gen1: Option<&Path>, gen2: Option<&Path>) -> std::io::Result<Self> {
        let read = |path: Option<&Path>| path.map(std::fs::read).transpose();
        Ok(Self::new(read(gen1)?, read(gen2)?))
    }

    pub fn key(&self, generation: CardGeneration) -> Option<&Arc<[u8]>> {
        match generation {
            CardGeneration::Gen1 => self.gen1.as_ref(),
            CardGeneration::Gen2 => self.gen2.as_ref(),
        }
    }

    pub fn expected_len(generation: CardGeneration) -> usize {
        match generation {
            CardGeneration::Gen1 => GEN1_ERCA_KEY_LEN,
            CardGeneration::Gen2 => GEN2_ERCA_KEY_LEN,
        }
    }
}

/// Check that `key` has the size `generation` requires.
pub fn check_key(generation: CardGeneration, key: &[u8]) -> Result<(), VerifyError> {
    let expected = ErcaKeys::expected_len(generation);
    if key.len() == expected {
        Ok(())
    } else {
        Err(VerifyError::KeyLength {
            generation,
            expected,
            actual: key.len(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct VerificationOutcome {
    pub load_id: u64,
    pub file_name: String,
    pub generation: CardGeneration,
    pub result: Result<bool, VerifyError>,
}

impl VerificationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self.result, Ok(true))
    }
}

/// Receives verification outcomes. Called from whatever runs the task.
pub trait VerificationSink: Send + Sync {
    fn report(&self, outcome: VerificationOutcome);
}

/// Writes outcomes to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl VerificationSink for LogSink {
    fn report(&self, outcome: VerificationOutcome) {
        match &outcome.result {
            Ok(true) => log::info!("{} {}: signature valid", outcome.file_name, outcome.generation),
            Ok(false) => log::warn!("{} {}: signature INVALID", outcome.file_name, outcome.generation),
            Err(e) => log::warn!("{} {}: verification error: {e}", outcome.file_name, outcome.generation),
        }
    }
}

/// Schedules verification tasks for loaded records.
pub struct VerificationDispatcher {
    verifier: Option<Arc<dyn SignatureVerifier>>,
    keys: ErcaKeys,
    queue: Arc<dyn TaskQueue>,
    sink: Arc<dyn VerificationSink>,
    current_load: Arc<AtomicU64>,
}

impl VerificationDispatcher {
    pub fn new(queue: Arc<dyn TaskQueue>) -> Self {
        Self {
            verifier: None,
            keys: ErcaKeys::default(),
            queue,
            sink: Arc::new(LogSink),
            current_load: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn with_verifier(mut self, verifier: Arc<dyn SignatureVerifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    pub fn with_keys(mut self, keys: ErcaKeys) -> Self {
        self.keys = keys;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn VerificationSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Start a new load and return its id. Outstanding tasks of earlier
    /// loads will have their results discarded.
    pub fn begin_load(&self) -> u64 {
        self.current_load.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current_load(&self) -> u64 {
        self.current_load.load(Ordering::SeqCst)
    }

    /// Queue one task per card generation present in `record`.
    /// Returns the number of tasks queued.
    pub fn dispatch(&self, record: &Record, file_name: &str, load_id: u64) -> usize {
        let Some(card) = record.card_data() else {
            return 0;
        };
        let Some(verifier) = &self.verifier else {
            log::debug!("no signature verifier configured, skipping verification");
            return 0;
        };

        let mut queued = 0;
        for (generation, block) in card.generations() {
            if self.dispatch_block(verifier, block, generation, file_name, load_id) {
                queued += 1;
            }
        }
        queued
    }

    fn dispatch_block(
        &self,
        verifier: &Arc<dyn SignatureVerifier>,
        block: &CardGenBlock,
        generation: CardGeneration,
        file_name: &str,
        load_id: u64,
    ) -> bool {
        let Some(files) = block.data_files.clone() else {
            log::debug!("{generation}: no dataFiles, skipping verification");
            return false;
        };
        let Some(key) = self.keys.key(generation).cloned() else {
            log::debug!("{generation}: no ERCA key configured, skipping verification");
            return false;
        };

        let task = VerifyTask {
            verifier: Arc::clone(verifier),
            sink: Arc::clone(&self.sink),
            current_load: Arc::clone(&self.current_load),
            files,
            key,
            generation,
            file_name: file_name.to_string(),
            load_id,
        };
        log::debug!("{generation}: verification queued for load {load_id}");
        self.queue.defer(Box::new(move || task.run()));
        true
    }
}

impl fmt::Debug for VerificationDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerificationDispatcher")
            .field("has_verifier", &self.verifier.is_some())
            .field("keys", &self.keys)
            .field("current_load", &self.current_load())
            .finish_non_exhaustive()
    }
}

struct VerifyTask {
    verifier: Arc<dyn SignatureVerifier>,
    sink: Arc<dyn VerificationSink>,
    current_load: Arc<AtomicU64>,
    files: Arc<DataFiles>,
    key: Arc<[u8]>,
    generation: CardGeneration,
    file_name: String,
    load_id: u64,
}

impl VerifyTask {
    fn run(self) {
        let result = self.verify();
        if self.current_load.load(Ordering::SeqCst) != self.load_id {
            log::debug!(
                "{} {}: discarding verification result of superseded load {}",
                self.file_name,
                self.generation,
                self.load_id
            );
            return;
        }
        self.sink.report(VerificationOutcome {
            load_id: self.load_id,
            file_name: self.file_name,
            generation: self.generation,
            result,
        });
    }

    fn verify(&self) -> Result<bool, VerifyError> {
        if self.files.is_empty() {
            return Err(VerifyError::EmptyInputData);
        }
        check_key(self.generation, &self.key)?;
        catch_unwind(AssertUnwindSafe(|| self.verifier.verify(&self.files, &self.key)))
            .unwrap_or_else(|payload| Err(VerifyError::Panicked(panic_message(payload.as_ref()))))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::DeferredQueue;
    use std::io::Write;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Collect(Mutex<Vec<VerificationOutcome>>);

    impl VerificationSink for Collect {
        fn report(&self, outcome: VerificationOutcome) {
            self.0.lock().unwrap().push(outcome);
        }
    }

    fn files() -> Arc<DataFiles> {
        let mut files = DataFiles::default();
        files.insert("ICC", tacho_model::DataNode::from(1u64));
        Arc::new(files)
    }

    fn task(
        verifier: Arc<dyn SignatureVerifier>,
        sink: Arc<Collect>,
        key_len: usize,
        load_id: u64,
        current: u64,
    ) -> VerifyTask {
        VerifyTask {
            verifier,
            sink,
            current_load: Arc::new(AtomicU64::new(current)),
            files: files(),
            key: Arc::from(vec![0u8; key_len]),
            generation: CardGeneration::Gen1,
            file_name: "C.ddd".into(),
            load_id,
        }
    }

    #[test]
    fn test_check_key_lengths() {
        assert!(check_key(CardGeneration::Gen1, &[0; 144]).is_ok());
        assert!(check_key(CardGeneration::Gen2, &[0; 205]).is_ok());
        assert!(matches!(
            check_key(CardGeneration::Gen2, &[0; 144]),
            Err(VerifyError::KeyLength { expected: 205, actual: 144, .. })
        ));
    }

    #[test]
    fn test_task_reports_result() {
        let sink = Arc::new(Collect::default());
        let ok: Arc<dyn SignatureVerifier> = Arc::new(|_: &DataFiles, _: &[u8]| -> Result<bool, VerifyError> { Ok(true) });
        task(ok, Arc::clone(&sink), 144, 1, 1).run();
        let outcomes = sink.0.lock().unwrap();
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].is_valid());
    }

    #[test]
    fn test_task_catches_panic() {
        let sink = Arc::new(Collect::default());
        let boom: Arc<dyn SignatureVerifier> =
            Arc::new(|_: &DataFiles, _: &[u8]| -> Result<bool, VerifyError> { panic!("bad certificate chain") });
        task(boom, Arc::clone(&sink), 144, 1, 1).run();
        let outcomes = sink.0.lock().unwrap();
        assert!(matches!(&outcomes[0].result, Err(VerifyError::Panicked(m)) if m == "bad certificate chain"));
    }

    #[test]
    fn test_task_rejects_wrong_key_without_calling_verifier() {
        let sink = Arc::new(Collect::default());
        let never: Arc<dyn SignatureVerifier> =
            Arc::new(|_: &DataFiles, _: &[u8]| -> Result<bool, VerifyError> { panic!("must not be called") });
        task(never, Arc::clone(&sink), 10, 1, 1).run();
        let outcomes = sink.0.lock().unwrap();
        assert!(matches!(outcomes[0].result, Err(VerifyError::KeyLength { actual: 10, .. })));
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let sink = Arc::new(Collect::default());
        let ok: Arc<dyn SignatureVerifier> = Arc::new(|_: &DataFiles, _: &[u8]| -> Result<bool, VerifyError> { Ok(true) });
        task(ok, Arc::clone(&sink), 144, 1, 2).run();
        assert!(sink.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_begin_load_increments() {
        let dispatcher = VerificationDispatcher::new(Arc::new(DeferredQueue::new()));
        assert_eq!(dispatcher.current_load(), 0);
        assert_eq!(dispatcher.begin_load(), 1);
        assert_eq!(dispatcher.begin_load(), 2);
        assert_eq!(dispatcher.current_load(), 2);
    }

    #[test]
    fn test_keys_from_files() {
        let mut gen1 = tempfile::NamedTempFile::new().unwrap();
        gen1.write_all(&[7u8; GEN1_ERCA_KEY_LEN]).unwrap();

        let keys = ErcaKeys::from_files(Some(gen1.path()), None).unwrap();
        assert_eq!(keys.key(CardGeneration::Gen1).map(|k| k.len()), Some(GEN1_ERCA_KEY_LEN));
        assert!(keys.key(CardGeneration::Gen2).is_none());

        let missing = ErcaKeys::from_files(Some(Path::new("/nonexistent/erca.bin")), None);
        assert!(missing.is_err());
    }
}
