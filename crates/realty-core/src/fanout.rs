//! Settle-all fan-out.
//!
//! Every future in the set runs to completion regardless of how its siblings
//! fare; the caller receives one tagged result per input, in input order.

use std::future::Future;

use futures::future::join_all;

/// Drive all futures concurrently and collect every outcome.
pub async fn settle_all<I, F, T, E>(futures: I) -> Vec<Result<T, E>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>>,
{
    join_all(futures).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_failure_does_not_abort_siblings() {
        let completed = Arc::new(AtomicUsize::new(0));
        let futures = (0..4).map(|i| {
            let completed = completed.clone();
            async move {
                if i == 1 {
                    return Err(format!("item {} failed", i));
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
                completed.fetch_add(1, Ordering::SeqCst);
                Ok(i)
            }
        });

        let results = settle_all(futures).await;
        assert_eq!(results.len(), 4);
        assert_eq!(completed.load(Ordering::SeqCst), 3);
        assert_eq!(results[1], Err("item 1 failed".to_string()));
        assert_eq!(results[3], Ok(3));
    }

    #[tokio::test]
    async fn test_empty_input_settles_immediately() {
        let results: Vec<Result<u8, String>> =
            settle_all(Vec::<std::future::Ready<Result<u8, String>>>::new()).await;
        assert!(results.is_empty());
    }
}
