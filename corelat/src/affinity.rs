use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AffinityError {
    #[error("could not bind thread to logical core {core}")]
    BindFailed { core: usize },
}

/// Pins the calling thread to a single logical core.
///
/// Implementations must report failure instead of leaving the thread
/// silently migratable.
pub trait CoreBinder: Sync {
    fn bind_current(&self, core: usize) -> Result<(), AffinityError>;
}

/// Binder backed by the OS scheduler affinity API.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsBinder;

impl CoreBinder for OsBinder {
    fn bind_current(&self, core: usize) -> Result<(), AffinityError> {
        if !core_affinity::set_for_current(core_affinity::CoreId { id: core }) {
            return Err(AffinityError::BindFailed { core });
        }
        Ok(())
    }
}

/// Leaves the calling thread unpinned. Scores measured this way include
/// scheduler migration noise; useful for tests and for environments where
/// affinity control is unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopBinder;

impl CoreBinder for NoopBinder {
    fn bind_current(&self, _core: usize) -> Result<(), AffinityError> {
        Ok(())
    }
}
