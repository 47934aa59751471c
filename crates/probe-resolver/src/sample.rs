//! Scoped ownership of the disposable sample instance.

use tracing::debug;

use crate::error::ResolveError;
use crate::host::SampleProvider;

/// Holds a spawned sample and removes it when dropped.
///
/// Removal runs on every exit path out of the scope that owns the guard,
/// including early returns through `?`.
pub struct SampleGuard<'p, P: SampleProvider> {
    provider: &'p mut P,
    instance: P::Instance,
}

impl<'p, P: SampleProvider> SampleGuard<'p, P> {
    pub fn spawn(provider: &'p mut P) -> Result<Self, ResolveError> {
        // A failed spawn may still have left host state behind.
        let instance = match provider.spawn() {
            Ok(instance) => instance,
            Err(e) => {
                provider.remove();
                return Err(ResolveError::SampleUnavailable(e));
            }
        };
        debug!(base_type = %provider.base_type(), "spawned sample instance");
        Ok(Self { provider, instance })
    }

    pub fn instance_mut(&mut self) -> &mut P::Instance {
        &mut self.instance
    }
}

impl<P: SampleProvider> Drop for SampleGuard<'_, P> {
    fn drop(&mut self) {
        self.provider.remove();
        debug!("removed sample instance");
    }
}
