use fjord::{RuntimeBuilder, async_, finish, launch};

use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

/// A task that spawns two children per level, `depth` levels deep.
fn node(depth: u32, counter: Arc<AtomicUsize>) -> Pin<Box<dyn Future<Output = ()> + Send>> {
    Box::pin(async move {
        counter.fetch_add(1, Ordering::SeqCst);

        if depth == 0 {
            return;
        }

        let left = counter.clone();
        let right = counter.clone();

        finish(async move {
            async_(node(depth - 1, left));
            async_(node(depth - 1, right));
        })
        .await;
    })
}

#[test]
fn three_levels_of_nesting_join_all_fourteen_tasks() {
    let completed = Arc::new(AtomicUsize::new(0));
    let completed_in = completed.clone();

    let result = RuntimeBuilder::new().worker_threads(4).launch(async move {
        let left = completed_in.clone();
        let right = completed_in.clone();

        finish(async move {
            async_(node(2, left));
            async_(node(2, right));
        })
        .await;

        // 2 + 4 + 8 tasks across the three levels.
        assert_eq!(completed_in.load(Ordering::SeqCst), 14);
    });

    result.unwrap();
    assert_eq!(completed.load(Ordering::SeqCst), 14);
}

#[test]
fn nested_async_without_finish_joins_nearest_scope() {
    // An async_ spawned directly inside another async_ (no intervening
    // finish) registers against the nearest enclosing scope, so the outer
    // finish waits for the grandchild too.
    let grandchild = Arc::new(AtomicBool::new(false));
    let grandchild_in = grandchild.clone();

    let result = launch(async move {
        let grandchild_task = grandchild_in.clone();

        finish(async move {
            async_(async move {
                async_(async move {
                    thread::sleep(Duration::from_millis(100));
                    grandchild_task.store(true, Ordering::SeqCst);
                });
            });
        })
        .await;

        assert!(grandchild_in.load(Ordering::SeqCst));
    });

    result.unwrap();
    assert!(grandchild.load(Ordering::SeqCst));
}

#[test]
fn single_worker_does_not_deadlock_on_suspension() {
    // Suspending at a finish must free the only worker thread to run the
    // children; a blocking join here would deadlock the pool.
    let completed = Arc::new(AtomicUsize::new(0));
    let completed_in = completed.clone();

    let result = RuntimeBuilder::new().worker_threads(1).launch(async move {
        let left = completed_in.clone();
        let right = completed_in.clone();

        finish(async move {
            async_(node(3, left));
            async_(node(3, right));
        })
        .await;
    });

    result.unwrap();
    assert_eq!(completed.load(Ordering::SeqCst), 30);
}

#[test]
fn sequential_finishes_in_one_task() {
    let first = Arc::new(AtomicBool::new(false));
    let second = Arc::new(AtomicBool::new(false));

    let first_in = first.clone();
    let second_in = second.clone();

    let result = launch(async move {
        let first_task = first_in.clone();

        finish(async move {
            async_(async move {
                first_task.store(true, Ordering::SeqCst);
            });
        })
        .await;

        assert!(first_in.load(Ordering::SeqCst));

        let second_task = second_in.clone();

        finish(async move {
            async_(async move {
                second_task.store(true, Ordering::SeqCst);
            });
        })
        .await;

        assert!(second_in.load(Ordering::SeqCst));
    });

    result.unwrap();
    assert!(first.load(Ordering::SeqCst));
    assert!(second.load(Ordering::SeqCst));
}
