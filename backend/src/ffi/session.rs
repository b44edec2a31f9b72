//! PyO3 wrapper for Session
//!
//! # Example (from Python)
//!
//! ```python
//! from surveillance_core import Session
//!
//! session = Session('{"rng_seed": 7}')
//! session.set_on_complete(lambda payout, message: print(payout, message))
//! while not session.is_finished():
//!     session.advance()
//! ```

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::orchestrator::{Session, SessionConfig};

/// Python wrapper for a running session
///
/// Unsendable: the session is single-threaded and must stay on the thread
/// that created it.
#[pyclass(name = "Session", unsendable)]
pub struct PySession {
    inner: Session,
    on_complete: Option<PyObject>,
}

#[pymethods]
impl PySession {
    /// Create a session from an optional JSON config and optional seed override
    ///
    /// With neither `seed` nor an `rng_seed` in the config, a fresh seed is
    /// drawn; read it back through `seed()` to replay the session.
    /// Raises ValueError if the config does not parse or validate.
    #[new]
    #[pyo3(signature = (config_json = None, seed = None))]
    fn new(config_json: Option<&str>, seed: Option<u64>) -> PyResult<Self> {
        let config = match config_json {
            Some(json) => SessionConfig::from_json_str_or_fresh_seed(json)
                .map_err(|e| PyValueError::new_err(e.to_string()))?,
            None => SessionConfig::default().with_fresh_seed(),
        };
        let config = match seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        };

        let inner = Session::new(config).map_err(|e| {
            PyRuntimeError::new_err(format!("Failed to create session: {}", e))
        })?;

        Ok(PySession {
            inner,
            on_complete: None,
        })
    }

    /// Register `callback(payout: int, message: str)`, called once on natural end
    fn set_on_complete(&mut self, callback: PyObject) {
        self.on_complete = Some(callback);
    }

    /// Advance one tick; returns the tick number
    fn advance(&mut self, py: Python<'_>) -> PyResult<u64> {
        let result = self.inner.advance();
        if let Some(outcome) = result.outcome {
            if let Some(callback) = self.on_complete.take() {
                callback.call1(py, (outcome.payout, outcome.message))?;
            }
        }
        Ok(result.tick)
    }

    /// Select an entity; returns the outcome as a JSON string
    fn select(&mut self, entity_id: u64) -> PyResult<String> {
        let outcome = self.inner.select(entity_id);
        serde_json::to_string(&outcome).map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }

    /// Abort without settling; the completion callback is dropped
    fn cancel(&mut self) {
        self.inner.cancel();
        self.on_complete = None;
    }

    /// Seed the session runs on
    fn seed(&self) -> u64 {
        self.inner.config().rng_seed
    }

    fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }

    fn time_remaining(&self) -> u32 {
        self.inner.time_remaining()
    }

    /// Current presentation snapshot as JSON
    fn snapshot_json(&self) -> PyResult<String> {
        self.inner
            .snapshot()
            .to_json()
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }
}
