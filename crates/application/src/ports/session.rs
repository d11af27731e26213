//! Session controller port

/// Owner of the authenticated / unauthenticated application state.
pub trait SessionController: Send + Sync {
    /// Moves the application to the signed-out state after an unrecoverable
    /// authentication failure.
    ///
    /// Must be safe to call any number of times and must drop any in-memory
    /// session state itself.
    fn force_logout(&self);
}
