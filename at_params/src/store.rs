use std::fs;
use std::fs::File;
use std::io::BufWriter;
use std::io::ErrorKind;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::SystemTime;

use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::error::StoreError;
use crate::params::ParameterSet;
use crate::validator::validate_value;

/// File name used by the strategy inside its user data directory
pub const PARAMS_FILE_NAME: &str = "strategy_params.json";

static TEMP_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// What the last metadata stat saw at the backing path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Observation {
    /// Nothing observed yet, or invalidated by a local save
    Unseen,
    Missing,
    Present { modified: SystemTime, len: u64 },
}

#[derive(Debug)]
struct StoreState {
    last_good: Option<ParameterSet>,
    observed: Observation,
}

/// File-backed parameter store
///
/// Writers replace the file through a temporary sibling and an atomic rename.
/// Readers call [`ParamStore::has_changed`] (a metadata stat) and only re-parse
/// through [`ParamStore::load`] when the file moved.
#[derive(Debug)]
pub struct ParamStore {
    path: PathBuf,
    state: Mutex<StoreState>,
}

impl ParamStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), state: Mutex::new(StoreState { last_good: None, observed: Observation::Unseen }) }
    }

    /// Store at `<user_data_dir>/strategy_params.json`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(PARAMS_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the backing file changed since the last observation
    ///
    /// Records the new observation, so a second call without an intervening
    /// write returns false.
    pub fn has_changed(&self) -> bool {
        let current = self.observe();
        let mut state = self.state.lock();
        let changed = state.observed != current;
        state.observed = current;
        changed
    }

    /// Read the parameter set
    ///
    /// Absent file gives defaults. Unreadable or invalid content is logged and
    /// the last known good set (or defaults) is returned instead.
    pub fn load(&self) -> ParameterSet {
        let observed = self.observe();
        let result = self.read();

        let mut state = self.state.lock();
        state.observed = observed;

        match result {
            Ok(Some(params)) => {
                debug!(path = %self.path.display(), "Loaded strategy parameters");
                state.last_good = Some(params);
                params
            }
            Ok(None) => {
                if state.last_good.is_some() {
                    warn!(path = %self.path.display(), "Params file not found, using defaults");
                }
                let params = ParameterSet::default();
                state.last_good = Some(params);
                params
            }
            Err(err) => {
                let fallback = state.last_good.unwrap_or_default();
                error!(path = %self.path.display(), error = %err, "Failed to load strategy parameters, keeping last known good");
                fallback
            }
        }
    }

    /// Consumer helper: re-read only when the file changed
    pub fn refresh(&self) -> Option<ParameterSet> {
        if self.has_changed() { Some(self.load()) } else { None }
    }

    /// Persist the whole set atomically
    pub fn save(&self, params: &ParameterSet) -> Result<(), StoreError> {
        let staged = self.stage(params)?;
        self.commit(&staged)?;

        let mut state = self.state.lock();
        state.last_good = Some(*params);
        state.observed = Observation::Unseen;

        info!(path = %self.path.display(), "Saved strategy parameters");
        Ok(())
    }

    fn read(&self) -> Result<Option<ParameterSet>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StoreError::io(&self.path)(err)),
        };

        let raw: Value = serde_json::from_str(&contents)?;
        Ok(Some(validate_value(&raw)?))
    }

    fn observe(&self) -> Observation {
        match fs::metadata(&self.path) {
            Ok(meta) => Observation::Present { modified: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH), len: meta.len() },
            Err(err) if err.kind() == ErrorKind::NotFound => Observation::Missing,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "Failed to stat params file");
                Observation::Missing
            }
        }
    }

    fn temp_path(&self) -> PathBuf {
        let name = self.path.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_else(|| PARAMS_FILE_NAME.to_string());
        let sequence = TEMP_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        self.path.with_file_name(format!(".{name}.{}.{sequence}.tmp", std::process::id()))
    }

    /// Write the full document to a temporary sibling of the target
    pub(crate) fn stage(&self, params: &ParameterSet) -> Result<PathBuf, StoreError> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(StoreError::io(parent))?;
        }

        let temp = self.temp_path();
        if let Err(err) = write_pretty(&temp, params) {
            let _ = fs::remove_file(&temp);
            return Err(err);
        }
        Ok(temp)
    }

    /// Atomically move a staged file over the target
    pub(crate) fn commit(&self, staged: &Path) -> Result<(), StoreError> {
        fs::rename(staged, &self.path).map_err(|err| {
            let _ = fs::remove_file(staged);
            StoreError::io(&self.path)(err)
        })
    }
}

fn write_pretty(path: &Path, params: &ParameterSet) -> Result<(), StoreError> {
    let file = File::create(path).map_err(StoreError::io(path))?;
    let mut writer = BufWriter::new(file);

    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
    params.serialize(&mut serializer)?;
    writer.write_all(b"\n").map_err(StoreError::io(path))?;

    let file = writer.into_inner().map_err(|err| StoreError::io(path)(err.into_error()))?;
    file.sync_all().map_err(StoreError::io(path))?;
    Ok(())
}
