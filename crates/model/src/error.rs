/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The credential was rejected by the service.
    Auth,
    /// The completion service is rate limited.
    RateLimitExceeded,
    /// Any other errors.
    Other,
}
