//! Candidate collection over record storage, serial or chunk-parallel.
//!
//! Parallel collection maps each chunk of records on its own scoped thread and joins every
//! thread before returning, so arbitration always sees a fully materialized list. Chunk
//! results are concatenated in chunk order, which makes the output order identical to a
//! serial scan.
//!
//! ```text
//!  records ──chunks──► [ t0 | t1 | t2 ] ──join (barrier)──► t0 ++ t1 ++ t2
//! ```

use std::panic;

/// How candidates are collected from storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Collect {
    /// Scan all records on the calling thread.
    #[default]
    Serial,
    /// Scan fixed-size chunks of records on scoped worker threads.
    Parallel {
        /// Records per worker. Zero is treated as one.
        chunk_size: usize,
    },
}

impl Collect {
    /// Map every item through `map`, keeping the `Some` results in item order.
    pub fn collect<I, O, F>(self, items: &[I], map: F) -> Vec<O>
    where
        I: Sync,
        O: Send,
        F: Fn(&I) -> Option<O> + Sync,
    {
        match self {
            Collect::Parallel { chunk_size } if items.len() > chunk_size.max(1) => {
                collect_parallel(items, chunk_size.max(1), &map)
            }
            _ => items.iter().filter_map(|item| map(item)).collect(),
        }
    }
}

fn collect_parallel<I, O, F>(items: &[I], chunk_size: usize, map: &F) -> Vec<O>
where
    I: Sync,
    O: Send,
    F: Fn(&I) -> Option<O> + Sync,
{
    let scoped = crossbeam::scope(|scope| {
        let workers: Vec<_> = items
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move |_| chunk.iter().filter_map(|item| map(item)).collect::<Vec<O>>())
            })
            .collect();

        let mut collected = Vec::with_capacity(items.len());
        for worker in workers {
            match worker.join() {
                Ok(chunk) => collected.extend(chunk),
                Err(payload) => panic::resume_unwind(payload),
            }
        }
        collected
    });

    scoped.unwrap_or_else(|payload| panic::resume_unwind(payload))
}
