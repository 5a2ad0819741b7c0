//! Artifact-loading capabilities.
//!
//! The vectorizer never opens files itself; it is handed sources that
//! produce a weighter or a projector when asked. The storage crate provides
//! file-backed sources, and any `Fn() -> Result<Arc<..>>` closure is a
//! source too, which is how tests inject in-memory models.

use std::sync::Arc;

use topicrec_core::Result;

use crate::projector::Projector;
use crate::weighter::TermWeighter;

pub trait WeighterSource {
    fn load(&self) -> Result<Arc<dyn TermWeighter>>;
}

pub trait ProjectorSource {
    fn load(&self) -> Result<Arc<dyn Projector>>;
}

impl<F> WeighterSource for F
where
    F: Fn() -> Result<Arc<dyn TermWeighter>>,
{
    fn load(&self) -> Result<Arc<dyn TermWeighter>> {
        self()
    }
}

impl<F> ProjectorSource for F
where
    F: Fn() -> Result<Arc<dyn Projector>>,
{
    fn load(&self) -> Result<Arc<dyn Projector>> {
        self()
    }
}

/// An already-loaded weighter or projector
#[derive(Debug)]
pub struct Loaded<T: ?Sized>(pub Arc<T>);

impl WeighterSource for Loaded<dyn TermWeighter> {
    fn load(&self) -> Result<Arc<dyn TermWeighter>> {
        Ok(Arc::clone(&self.0))
    }
}

impl ProjectorSource for Loaded<dyn Projector> {
    fn load(&self) -> Result<Arc<dyn Projector>> {
        Ok(Arc::clone(&self.0))
    }
}
