// Panic isolation for handler calls
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

/// Result of a panic-guarded execution
#[derive(Debug)]
pub enum PanicGuardResult<T> {
    /// Execution completed (successfully or not)
    Completed(T),
    /// Execution panicked
    Panicked(String),
}

/// Drive a future with panic isolation
///
/// A panic inside the future is caught and reported as
/// `PanicGuardResult::Panicked` so one broken handler cannot take down the
/// host's connection task.
pub async fn execute_guarded<F>(future: F) -> PanicGuardResult<F::Output>
where
    F: Future,
{
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(output) => PanicGuardResult::Completed(output),
        Err(panic_info) => PanicGuardResult::Panicked(panic_message(panic_info.as_ref())),
    }
}

fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed() {
        let result = tokio_test::block_on(execute_guarded(async { 42 }));
        assert!(matches!(result, PanicGuardResult::Completed(42)));
    }

    #[tokio::test]
    async fn test_panic_with_str() {
        let result = execute_guarded(async {
            tokio::task::yield_now().await;
            panic!("boom");
        })
        .await;
        match result {
            PanicGuardResult::Panicked(msg) => assert_eq!(msg, "boom"),
            PanicGuardResult::Completed(()) => panic!("expected a panic"),
        }
    }

    #[tokio::test]
    async fn test_panic_with_string() {
        let id = 7;
        let result: PanicGuardResult<()> = execute_guarded(async move {
            panic!("user {} exploded", id);
        })
        .await;
        match result {
            PanicGuardResult::Panicked(msg) => assert_eq!(msg, "user 7 exploded"),
            PanicGuardResult::Completed(()) => panic!("expected a panic"),
        }
    }
}
