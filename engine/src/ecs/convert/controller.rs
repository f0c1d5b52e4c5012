//! One conversion pass per tick for a single singleton type.
//!
//! The [`Controller`] owns every side effect of singleton conversion: record cleanup,
//! candidate collection, tagging, slot writes and hook notification. The decision itself is
//! delegated to the [`Arbitrator`].
//!
//! # Tick
//!
//! ```text
//! delete processed records of the previous tick
//!        │
//! pending == 0 ──────────────────────────────► Idle
//!        │
//! snapshot slot existence, collect candidates, tag them Processed
//!        │
//! arbitrate ──winner──► create/set slot, tag winner Changed ──► Changed hooks
//!        └───none────► tag every candidate Unchanged ─────────► Unchanged hooks
//! ```
//!
//! A record is therefore `pending → Processed → {Changed | Unchanged}` and is deleted by the
//! cleanup step of the following tick. No record survives more than two ticks.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut world = World::new(world::Id::new(0));
//! let mut controller = Controller::<TimeConfig>::new();
//! controller.on_changed(|config| println!("frame rate is now {}", config.target_frame_rate));
//!
//! world.spawn_converter(TimeConfig::new(60));
//! assert!(matches!(controller.tick(&mut world)?, Tick::Changed { .. }));
//! ```
//!
//! # Concurrency
//!
//! A tick runs to completion on the calling thread. Exactly one controller may drive a given
//! singleton type; [`Group`](crate::ecs::convert::Group) enforces this at registration.

use log::{debug, error, trace};

use crate::ecs::{
    convert::{
        Arbitrator, StoreError, Tag,
        hooks::{Hooks, UnchangedReport},
        store::Store,
    },
    entity::Entity,
    singleton::{BlobRef, DeepCopy, Identity, Prepare, Singleton},
};

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// No pending candidates. Nothing but cleanup happened.
    Idle,
    /// A winner was written into the slot.
    Changed {
        /// The winning record, now tagged [`Tag::Changed`].
        source: Entity,
        /// Number of candidates in the pass.
        contenders: usize,
    },
    /// Candidates arrived but none was eligible.
    Unchanged {
        /// Number of candidates in the pass, all tagged [`Tag::Unchanged`].
        contenders: usize,
    },
}

impl Tick {
    #[inline]
    pub fn is_changed(&self) -> bool {
        matches!(self, Tick::Changed { .. })
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        matches!(self, Tick::Idle)
    }
}

/// Drives singleton conversion for one singleton type `T`.
pub struct Controller<T: Singleton, P = Identity> {
    arbitrator: Arbitrator<T, P>,
    hooks: Hooks<T>,
}

impl<T: Singleton> Controller<T, Identity> {
    /// A controller for plain data singletons.
    pub fn new() -> Self {
        Self::with_prepare(Identity)
    }
}

impl<T: Singleton> Default for Controller<T, Identity> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Controller<BlobRef<T>, DeepCopy>
where
    T: 'static + Send + Sync + Clone + std::fmt::Debug,
{
    /// A controller for blob singletons. Winners are deep-copied into slot-owned storage.
    pub fn blob() -> Self {
        Self::with_prepare(DeepCopy)
    }
}

impl<T: Singleton, P: Prepare<T>> Controller<T, P> {
    /// A controller applying `prepare` to every winning value.
    pub fn with_prepare(prepare: P) -> Self {
        Self {
            arbitrator: Arbitrator::with_prepare(prepare),
            hooks: Hooks::new(),
        }
    }

    /// Short name of `T`.
    #[inline]
    pub fn type_name(&self) -> &str {
        self.arbitrator.type_name()
    }

    /// Register a hook fired after a pass replaced the singleton.
    pub fn on_changed(&mut self, hook: impl FnMut(&T) + 'static) -> &mut Self {
        self.hooks.on_changed(hook);
        self
    }

    /// Register a hook fired after a pass with candidates left the singleton untouched.
    pub fn on_unchanged(&mut self, hook: impl FnMut(&UnchangedReport) + 'static) -> &mut Self {
        self.hooks.on_unchanged(hook);
        self
    }

    /// Run one conversion pass against `store`.
    ///
    /// Store failures propagate as-is; whatever the store already applied stays applied. They
    /// are also logged at `error` with the type name and the pending count.
    ///
    /// # Panics
    ///
    /// Panics on broken store invariants: more than one slot for `T`, or a pending count that
    /// disagrees with the enumerated candidates. The message names `T` and the pending count.
    pub fn tick<S: Store<T>>(&mut self, store: &mut S) -> Result<Tick, StoreError> {
        let processed = store.count_processed();
        if processed > 0 {
            let deleted = store.delete_all_processed().inspect_err(|err| {
                error!("{}: cleanup of {} processed converters failed: {}", self.type_name(), processed, err)
            })?;
            debug!("{}: cleaned up {} processed converters", self.type_name(), deleted);
        }

        let pending = store.count_pending();
        if pending == 0 {
            trace!("{}: idle", self.type_name());
            return Ok(Tick::Idle);
        }

        self.convert(store, pending).inspect_err(|err| {
            error!("{}: conversion of {} pending converters failed: {}", self.type_name(), pending, err)
        })
    }

    fn convert<S: Store<T>>(&mut self, store: &mut S, pending: usize) -> Result<Tick, StoreError> {
        let slots = store.count_slot();
        assert!(
            slots <= 1,
            "{}: store reported {} singletons, expected at most one ({} pending)",
            self.type_name(),
            slots,
            pending
        );
        let slot_existed = slots == 1;

        let candidates = store.enumerate_pending()?;
        assert_eq!(
            candidates.len(),
            pending,
            "{}: store reported {} pending converters but enumerated {}",
            self.type_name(),
            pending,
            candidates.len()
        );

        let sources: Vec<Entity> = candidates.iter().map(|c| c.source()).collect();
        for source in &sources {
            store.tag(*source, Tag::Processed)?;
        }

        let current = store.get_slot().cloned();
        let outcome = self
            .arbitrator
            .resolve(slot_existed, current.as_ref(), candidates)
            .unwrap_or_else(|err| panic!("{err} ({pending} pending)"));
        let contenders = outcome.contenders();

        match outcome.into_winner() {
            Some(winner) => {
                let source = winner.source();
                if slot_existed {
                    store.set_slot(winner.into_value())?;
                } else {
                    store.create_slot(winner.into_value())?;
                }
                store.tag(source, Tag::Changed)?;
                debug!(
                    "{}: converted from {:?} ({} candidates)",
                    self.type_name(),
                    source,
                    contenders
                );

                if let Some(value) = store.get_slot() {
                    self.hooks.fire_changed(value);
                }
                Ok(Tick::Changed { source, contenders })
            }
            None => {
                for source in &sources {
                    store.tag(*source, Tag::Unchanged)?;
                }
                debug!(
                    "{}: {} candidates, none replaced the current value",
                    self.type_name(),
                    contenders
                );

                let report = UnchangedReport {
                    type_name: self.type_name().to_string(),
                    contenders,
                };
                self.hooks.fire_unchanged(&report);
                Ok(Tick::Unchanged { contenders })
            }
        }
    }
}
