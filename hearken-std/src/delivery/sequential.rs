use super::traits::Delivery;
use crate::{observe, resolve::Resolution};
use hearken_core::{EmitterError, Values};

/// A sequential delivery strategy.
///
/// Calls listeners one by one on the calling thread, in registration order.
/// The first listener failure aborts the firing and is returned as
/// [`EmitterError::Invocation`]; results collected so far are discarded.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequentialDelivery;

impl Delivery for SequentialDelivery {
    type Output = Result<Vec<Values>, EmitterError>;

    fn deliver(&self, resolution: Resolution) -> Self::Output {
        let mut results = Vec::with_capacity(resolution.len());
        for (index, listener) in resolution.listeners().iter().enumerate() {
            match listener.call(resolution.payload()) {
                Ok(values) => results.push(values),
                Err(source) => {
                    observe::listener_failed(resolution.event(), index, &source);
                    return Err(EmitterError::Invocation {
                        event: resolution.event().to_string(),
                        index,
                        source,
                    });
                }
            }
        }
        Ok(results)
    }
}
