use fjord::{Error, RuntimeBuilder, async_, finish, launch};

use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

#[test]
fn launch_runs_a_plain_body() {
    let _ = tracing_subscriber::fmt().try_init();

    let result = launch(async {});
    result.unwrap();
}

#[test]
fn concurrent_launch_on_one_runtime_is_rejected() {
    let runtime = RuntimeBuilder::new().worker_threads(2).build();

    thread::scope(|s| {
        let first = s.spawn(|| {
            runtime.launch(async {
                thread::sleep(Duration::from_millis(400));
            })
        });

        // Give the first application time to take the guard.
        thread::sleep(Duration::from_millis(100));

        let second = runtime.launch(async {});
        assert!(matches!(second, Err(Error::AlreadyLaunched)));

        first.join().unwrap().unwrap();
    });
}

#[test]
fn sequential_launches_on_one_runtime_succeed() {
    let runtime = RuntimeBuilder::new().worker_threads(2).build();

    let counter = Arc::new(AtomicUsize::new(0));

    for _ in 0..3 {
        let counter_in = counter.clone();

        let result = runtime.launch(async move {
            let counter_task = counter_in.clone();

            finish(async move {
                async_(async move {
                    counter_task.fetch_add(1, Ordering::SeqCst);
                });
            })
            .await;
        });

        result.unwrap();
    }

    assert_eq!(counter.load(Ordering::SeqCst), 3);
}

#[test]
fn builder_accepts_worker_count_override() {
    let result = RuntimeBuilder::new().worker_threads(2).launch(async {
        finish(async {
            async_(async {});
            async_(async {});
        })
        .await;
    });

    result.unwrap();
}

#[test]
#[should_panic(expected = "worker_threads must be > 0")]
fn builder_rejects_zero_workers() {
    let _ = RuntimeBuilder::new().worker_threads(0);
}

/// A task tree used to keep the pool busy for the liveness check.
fn busy_node(depth: u32, counter: Arc<AtomicUsize>) -> Pin<Box<dyn Future<Output = ()> + Send>> {
    Box::pin(async move {
        counter.fetch_add(1, Ordering::SeqCst);

        if depth == 0 {
            thread::sleep(Duration::from_millis(1));
            return;
        }

        let left = counter.clone();
        let right = counter.clone();

        finish(async move {
            async_(busy_node(depth - 1, left));
            async_(busy_node(depth - 1, right));
        })
        .await;
    })
}

#[test]
fn waiting_tasks_are_always_eventually_resumed() {
    // Liveness: a deep tree of suspending joins must drain in bounded time;
    // a lost wakeup would leave the launch blocked forever.
    let (sender, receiver) = mpsc::channel();

    thread::spawn(move || {
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_in = counter.clone();

        let result = RuntimeBuilder::new().worker_threads(2).launch(async move {
            let root = counter_in.clone();

            finish(async move {
                async_(busy_node(5, root));
            })
            .await;
        });

        let _ = sender.send((result, counter.load(Ordering::SeqCst)));
    });

    let (result, completed) = receiver
        .recv_timeout(Duration::from_secs(60))
        .expect("launch did not return in time: a waiting task was never resumed");

    result.unwrap();
    assert_eq!(completed, 63);
}
