use crate::status::StatusResponse;

/// Receives every successful status query made while waiting.
///
/// Called synchronously from the polling loop, so a slow observer delays the
/// next query. Any `Fn(&StatusResponse)` closure is an observer.
pub trait StatusObserver: Send + Sync {
    fn on_status(&self, response: &StatusResponse);
}

impl<F> StatusObserver for F
where
    F: Fn(&StatusResponse) + Send + Sync,
{
    fn on_status(&self, response: &StatusResponse) {
        self(response)
    }
}
