//! Thread-safe balancer handle.
//!
//! Every operation takes the same lock, so an admission (placement, route
//! update and scaling check) is observed by other threads either entirely
//! or not at all.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::{
    Admission, Balancer, BalancerError, BalancerResult, ConnectionId, LoadGenerator,
    PlacementPolicy, RandomPlacement, UniformLoad,
};

pub struct SharedBalancer<P = RandomPlacement, L = UniformLoad> {
    inner: Arc<Mutex<Balancer<P, L>>>,
}

impl<P, L> Clone for SharedBalancer<P, L> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P, L> From<Balancer<P, L>> for SharedBalancer<P, L> {
    fn from(balancer: Balancer<P, L>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(balancer)),
        }
    }
}

impl<P, L> SharedBalancer<P, L>
where
    P: PlacementPolicy,
    L: LoadGenerator,
{
    pub fn new(balancer: Balancer<P, L>) -> Self {
        Self::from(balancer)
    }

    fn lock(&self) -> BalancerResult<MutexGuard<'_, Balancer<P, L>>> {
        self.inner.lock().map_err(|_| BalancerError::Poisoned)
    }

    pub fn add_connection(&self, id: impl Into<ConnectionId>) -> BalancerResult<Admission> {
        self.lock()?.add_connection(id)
    }

    pub fn close_connection(&self, id: impl Into<ConnectionId>) -> BalancerResult<f64> {
        self.lock()?.close_connection(id)
    }

    pub fn avg_load(&self) -> BalancerResult<f64> {
        self.lock()?.avg_load()
    }

    pub fn add_server(&self) -> BalancerResult<usize> {
        Ok(self.lock()?.add_server())
    }

    pub fn server_count(&self) -> BalancerResult<usize> {
        Ok(self.lock()?.server_count())
    }

    pub fn connection_count(&self) -> BalancerResult<usize> {
        Ok(self.lock()?.connection_count())
    }

    /// Run `f` against the balancer while holding the lock.
    pub fn with<R>(&self, f: impl FnOnce(&mut Balancer<P, L>) -> R) -> BalancerResult<R> {
        let mut balancer = self.lock()?;
        Ok(f(&mut balancer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BalancerConfig, LoadConfig};
    use std::thread;

    fn shared(seed: u64) -> SharedBalancer {
        let balancer = Balancer::with_policy(
            RandomPlacement::seeded(seed),
            UniformLoad::seeded(LoadConfig::default(), seed),
            &BalancerConfig::default(),
        )
        .unwrap();
        SharedBalancer::new(balancer)
    }

    #[test]
    fn test_single_thread_operations() {
        let lb = shared(42);
        let admission = lb.add_connection("a").unwrap();
        assert_eq!(lb.connection_count().unwrap(), 1);
        assert_eq!(lb.avg_load().unwrap(), admission.load);

        assert_eq!(lb.add_server().unwrap(), 1);
        assert_eq!(lb.server_count().unwrap(), 2);

        assert_eq!(lb.close_connection("a").unwrap(), admission.load);
        assert!(matches!(
            lb.close_connection("a"),
            Err(BalancerError::NotFound(_))
        ));
    }

    #[test]
    fn test_concurrent_admissions_stay_consistent() {
        let lb = shared(42);
        let mut handles = vec![];

        for t in 0..4 {
            let lb = lb.clone();
            handles.push(thread::spawn(move || {
                for i in 0..250 {
                    let id = format!("{}-{}", t, i);
                    lb.add_connection(id.as_str()).unwrap();
                    if i % 3 == 0 {
                        lb.close_connection(id.as_str()).unwrap();
                    }
                }
            }));
        }

        for h in handles {
            h.join().unwrap();
        }

        // 84 of every 250 ids per thread were closed again.
        assert_eq!(lb.connection_count().unwrap(), 4 * (250 - 84));
        assert!(lb.with(|b| b.is_consistent()).unwrap());
    }

    #[test]
    fn test_concurrent_duplicates_admitted_once() {
        let lb = shared(7);
        let mut handles = vec![];

        for _ in 0..8 {
            let lb = lb.clone();
            handles.push(thread::spawn(move || lb.add_connection("same").is_ok()));
        }

        let admitted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&ok| ok)
            .count();
        assert_eq!(admitted, 1);
        assert_eq!(lb.connection_count().unwrap(), 1);
    }
}
