use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::trace;

/// Collapses bursts of calls into one invocation of `func` with the
/// arguments of the last call.
///
/// Every [`call`](Self::call) restarts the delay. A callback that has already
/// started is never interrupted by a later call.
pub struct Debouncer<T, F> {
    delay: Duration,
    func: Arc<F>,
    generation: Arc<AtomicU64>,
    _args: std::marker::PhantomData<fn(T)>,
}

impl<T, F> std::fmt::Debug for Debouncer<T, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish()
    }
}

impl<T, F, Fut> Debouncer<T, F>
where
    T: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    pub fn new(delay: Duration, func: F) -> Self {
        Self {
            delay,
            func: Arc::new(func),
            generation: Arc::new(AtomicU64::new(0)),
            _args: std::marker::PhantomData,
        }
    }

    /// Schedules `func(args)` after the delay unless another call arrives first.
    ///
    /// The returned handle resolves once the scheduled task is done: `true`
    /// after `func` has run to completion, `false` if the call was superseded
    /// or cancelled. Must be called from within a Tokio runtime.
    pub fn call(&self, args: T) -> JoinHandle<bool> {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let generation = Arc::clone(&self.generation);
        let func = Arc::clone(&self.func);
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if generation.load(Ordering::SeqCst) != ticket {
                trace!("Debounced call {} superseded", ticket);
                return false;
            }
            func(args).await;
            true
        })
    }

    /// Drops any pending call.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recorder() -> (
        Arc<Mutex<Vec<String>>>,
        impl Fn(String) -> std::future::Ready<()> + Send + Sync + 'static,
    ) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        (calls, move |q: String| {
            sink.lock().unwrap().push(q);
            std::future::ready(())
        })
    }

    #[tokio::test(start_paused = true)]
    async fn burst_runs_once_with_last_arguments() {
        let (calls, func) = recorder();
        let debouncer = Debouncer::new(Duration::from_millis(300), func);

        debouncer.call("b".to_string());
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.call("ba".to_string());
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.call("bat".to_string());
        tokio::time::sleep(Duration::from_millis(299)).await;
        assert!(calls.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(*calls.lock().unwrap(), ["bat"]);
    }

    #[tokio::test(start_paused = true)]
    async fn calls_separated_by_the_delay_each_run() {
        let (calls, func) = recorder();
        let debouncer = Debouncer::new(Duration::from_millis(50), func);

        debouncer.call("one".to_string());
        tokio::time::sleep(Duration::from_millis(60)).await;
        debouncer.call("two".to_string());
        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(*calls.lock().unwrap(), ["one", "two"]);
    }

    #[tokio::test(start_paused = true)]
    async fn handles_report_whether_the_callback_ran() {
        let (calls, func) = recorder();
        let debouncer = Debouncer::new(Duration::from_millis(50), func);

        let first = debouncer.call("a".to_string());
        let last = debouncer.call("ab".to_string());

        assert!(last.await.unwrap());
        assert!(!first.await.unwrap());
        assert_eq!(*calls.lock().unwrap(), ["ab"]);
    }

    #[tokio::test(start_paused = true)]
    async fn last_handle_waits_for_a_slow_callback() {
        let finished = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&finished);
        let debouncer = Debouncer::new(Duration::from_millis(50), move |_: ()| {
            let flag = Arc::clone(&flag);
            async move {
                tokio::time::sleep(Duration::from_secs(5)).await;
                *flag.lock().unwrap() = true;
            }
        });

        let handle = debouncer.call(());

        assert!(handle.await.unwrap());
        assert!(*finished.lock().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_call() {
        let (calls, func) = recorder();
        let debouncer = Debouncer::new(Duration::from_millis(50), func);

        let handle = debouncer.call("never".to_string());
        debouncer.cancel();

        assert!(!handle.await.unwrap());
        assert!(calls.lock().unwrap().is_empty());
    }
}
