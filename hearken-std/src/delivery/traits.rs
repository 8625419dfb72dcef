use crate::resolve::Resolution;

/// Strategy for invoking a resolved set of listeners.
///
/// This abstraction allows different execution models (sequential,
/// background) to be plugged into the emitter.
pub trait Delivery: Send + Sync {
    /// What the caller receives back.
    type Output;

    /// Invoke the resolved listeners with their shared payload.
    fn deliver(&self, resolution: Resolution) -> Self::Output;
}
