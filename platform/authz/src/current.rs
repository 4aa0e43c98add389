//! Context-scoped "current principal" used when callers omit one.

use std::{future::Future, sync::Arc};

use crate::principal::Principal;

tokio::task_local! {
    static CURRENT: Option<Arc<Principal>>;
}

/// Run `fut` with `principal` installed as the current principal.
pub async fn scope<F: Future>(principal: Option<Arc<Principal>>, fut: F) -> F::Output {
    CURRENT.scope(principal, fut).await
}

/// Synchronous variant of [`scope`] for callers outside an async task.
pub fn sync_scope<R>(principal: Option<Arc<Principal>>, f: impl FnOnce() -> R) -> R {
    CURRENT.sync_scope(principal, f)
}

/// The principal installed by the innermost enclosing scope, if any.
pub fn current() -> Option<Arc<Principal>> {
    CURRENT.try_with(Clone::clone).ok().flatten()
}

pub(crate) fn with_principal<R>(
    explicit: Option<&Principal>,
    f: impl FnOnce(Option<&Principal>) -> R,
) -> R {
    match explicit {
        Some(principal) => f(Some(principal)),
        None => {
            let scoped = current();
            f(scoped.as_deref())
        }
    }
}
