//! # Pool de Workers
//! src/server/pool.rs
//!
//! Pool fijo de threads que procesa closures en orden FIFO.
//! El accept loop encola una tarea por conexión; los workers la toman con
//! `Mutex<VecDeque>` + `Condvar`.
//!
//! Al hacer drop del pool se procesan las tareas pendientes y luego se
//! hace join de todos los workers.

use std::collections::VecDeque;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;

type Job = Box<dyn FnOnce() + Send + 'static>;

struct State {
    jobs: VecDeque<Job>,
    shutdown: bool,
}

struct Shared {
    state: Mutex<State>,
    condvar: Condvar,
}

impl Shared {
    // Las tareas corren fuera del lock, así que un panic nunca deja el
    // mutex envenenado a mitad de una modificación.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Pool de threads de tamaño fijo
pub struct ThreadPool {
    workers: Vec<thread::JoinHandle<()>>,
    shared: Arc<Shared>,
}

impl ThreadPool {
    /// Crea un pool con `size` workers
    ///
    /// # Errores
    ///
    /// `InvalidInput` si `size` es 0, o el error de `spawn` si no se pudo
    /// crear un thread.
    pub fn new(size: usize) -> io::Result<Self> {
        if size == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "thread pool size must be > 0",
            ));
        }

        let shared = Arc::new(Shared {
            state: Mutex::new(State {
                jobs: VecDeque::new(),
                shutdown: false,
            }),
            condvar: Condvar::new(),
        });

        let mut workers = Vec::with_capacity(size);
        for i in 0..size {
            let shared = Arc::clone(&shared);
            let handle = thread::Builder::new()
                .name(format!("worker-{}", i))
                .spawn(move || Self::worker_loop(i, shared))?;
            workers.push(handle);
        }

        Ok(Self { workers, shared })
    }

    /// Encola una tarea
    ///
    /// Después del shutdown las tareas nuevas se descartan.
    pub fn execute<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        {
            let mut state = self.shared.lock();
            if state.shutdown {
                tracing::warn!("pool detenido, tarea descartada");
                return;
            }
            state.jobs.push_back(Box::new(f));
        }
        self.shared.condvar.notify_one();
    }

    /// Número de workers
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Tareas esperando un worker libre
    pub fn queued(&self) -> usize {
        self.shared.lock().jobs.len()
    }

    fn worker_loop(id: usize, shared: Arc<Shared>) {
        tracing::debug!(worker = id, "worker iniciado");

        loop {
            let job = {
                let mut state = shared.lock();
                loop {
                    if let Some(job) = state.jobs.pop_front() {
                        break job;
                    }
                    if state.shutdown {
                        tracing::debug!(worker = id, "worker detenido");
                        return;
                    }
                    state = shared
                        .condvar
                        .wait(state)
                        .unwrap_or_else(PoisonError::into_inner);
                }
            };

            // Un panic en una conexión no debe matar al worker
            if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                tracing::error!(worker = id, "la tarea terminó con panic");
            }
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.shared.lock().shutdown = true;
        self.shared.condvar.notify_all();

        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_pool_size() {
        let pool = ThreadPool::new(3).unwrap();
        assert_eq!(pool.size(), 3);
    }

    #[test]
    fn test_zero_size_is_error() {
        let err = ThreadPool::new(0).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_queued_counts_waiting_jobs() {
        let pool = ThreadPool::new(1).unwrap();
        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();

        // Ocupa al único worker
        pool.execute(move || {
            started_tx.send(()).unwrap();
            let _ = release_rx.recv();
        });
        started_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(pool.queued(), 0);

        pool.execute(|| {});
        pool.execute(|| {});
        assert_eq!(pool.queued(), 2);

        release_tx.send(()).unwrap();
    }

    #[test]
    fn test_runs_all_jobs_before_drop_returns() {
        let counter = Arc::new(AtomicUsize::new(0));

        {
            let pool = ThreadPool::new(2).unwrap();
            for _ in 0..50 {
                let counter = Arc::clone(&counter);
                pool.execute(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                });
            }
        } // drop: drena la cola y hace join

        assert_eq!(counter.load(Ordering::SeqCst), 50);
    }

    #[test]
    fn test_jobs_run_concurrently() {
        let pool = ThreadPool::new(2).unwrap();
        let (tx, rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let release_rx = Arc::new(Mutex::new(release_rx));

        // La primera tarea se bloquea; la segunda debe correr igual
        {
            let release_rx = Arc::clone(&release_rx);
            pool.execute(move || {
                let _ = release_rx.lock().unwrap().recv();
            });
        }
        pool.execute(move || {
            tx.send("second").unwrap();
        });

        assert_eq!(
            rx.recv_timeout(Duration::from_secs(5)).unwrap(),
            "second"
        );
        release_tx.send(()).unwrap();
    }

    #[test]
    fn test_panic_does_not_kill_worker() {
        let pool = ThreadPool::new(1).unwrap();
        let (tx, rx) = mpsc::channel();

        pool.execute(|| panic!("boom"));
        pool.execute(move || {
            tx.send(42).unwrap();
        });

        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 42);
    }
}
