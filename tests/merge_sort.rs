use fjord::{RuntimeBuilder, async_, finish};

use rand::Rng;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

/// Recursively sorts `data`, forking the two halves as child tasks and
/// merging once the finish joins them.
fn sort_task(
    data: Vec<i32>,
    out: Arc<Mutex<Option<Vec<i32>>>>,
) -> Pin<Box<dyn Future<Output = ()> + Send>> {
    Box::pin(async move {
        if data.len() <= 64 {
            let mut data = data;
            data.sort_unstable();
            *out.lock().unwrap() = Some(data);
            return;
        }

        let mut left = data;
        let right = left.split_off(left.len() / 2);

        let left_out = Arc::new(Mutex::new(None));
        let right_out = Arc::new(Mutex::new(None));

        let left_slot = left_out.clone();
        let right_slot = right_out.clone();

        finish(async move {
            async_(sort_task(left, left_slot));
            async_(sort_task(right, right_slot));
        })
        .await;

        let left = left_out.lock().unwrap().take().unwrap();
        let right = right_out.lock().unwrap().take().unwrap();

        *out.lock().unwrap() = Some(merge(left, right));
    })
}

fn merge(left: Vec<i32>, right: Vec<i32>) -> Vec<i32> {
    let mut merged = Vec::with_capacity(left.len() + right.len());

    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    loop {
        match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => {
                if l <= r {
                    merged.push(left.next().unwrap());
                } else {
                    merged.push(right.next().unwrap());
                }
            }
            (Some(_), None) => merged.push(left.next().unwrap()),
            (None, Some(_)) => merged.push(right.next().unwrap()),
            (None, None) => break,
        }
    }

    merged
}

#[test]
fn parallel_merge_sort_matches_sequential_sort() {
    let mut rng = rand::thread_rng();

    let input: Vec<i32> = (0..10_000)
        .map(|_| rng.gen_range(-1_000_000..1_000_000))
        .collect();

    let mut expected = input.clone();
    expected.sort_unstable();

    let out = Arc::new(Mutex::new(None));
    let out_in = out.clone();

    let result = RuntimeBuilder::new()
        .worker_threads(4)
        .launch(async move { sort_task(input, out_in).await });

    result.unwrap();

    let sorted = out.lock().unwrap().take().unwrap();
    assert_eq!(sorted, expected);
}
