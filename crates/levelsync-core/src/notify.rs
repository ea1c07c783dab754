//! Role gate and completion callbacks for hosts acting as the authority
//! (e.g. a game server waiting on a level before starting a match).

pub trait Role: Send + Sync {
    fn is_authoritative(&self) -> bool;
}

impl Role for bool {
    fn is_authoritative(&self) -> bool { *self }
}

/// Exactly one of these fires, at most once per acquisition, and only for
/// an authoritative [`Role`].
pub trait CompletionHandler: Send + Sync {
    fn server_download_completed(&self, index: usize);

    fn download_failed(&self);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCompletion;

impl CompletionHandler for NoopCompletion {
    fn server_download_completed(&self, _index: usize) {}

    fn download_failed(&self) {}
}

/// Completion handler backed by two closures.
pub struct FnCompletion<C, F> {
    completed: C,
    failed:    F,
}

impl<C, F> FnCompletion<C, F>
where
    C: Fn(usize) + Send + Sync,
    F: Fn() + Send + Sync,
{
    pub fn new(completed: C, failed: F) -> Self { Self { completed, failed } }
}

impl<C, F> CompletionHandler for FnCompletion<C, F>
where
    C: Fn(usize) + Send + Sync,
    F: Fn() + Send + Sync,
{
    fn server_download_completed(&self, index: usize) { (self.completed)(index) }

    fn download_failed(&self) { (self.failed)() }
}
