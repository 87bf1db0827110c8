// ─────────────────────────────────────────────────────────────────────
// StatKern — Handles
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Explicit handle tables for natively owned objects.
//!
//! A host runtime holds only an opaque `u64` token; the object itself lives
//! in a [`HandleTable`] and is released by an explicit `destroy`.
//! Tokens start at 1 and are never reused within a table.

use std::collections::HashMap;
use std::fmt;

use rand::rngs::StdRng;
use rand::SeedableRng;
use statkern_types::config::SamplingConfig;
use statkern_types::error::{KernelError, KernelResult};

use crate::sampling::UniformDraw;

/// Opaque token for an object stored in a [`HandleTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(u64);

impl Handle {
    pub fn from_raw(raw: u64) -> Self {
        Handle(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
pub struct HandleTable<T> {
    entries: HashMap<u64, T>,
    next: u64,
}

impl<T> Default for HandleTable<T> {
    fn default() -> Self {
        HandleTable {
            entries: HashMap::new(),
            next: 1,
        }
    }
}

impl<T> HandleTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `value` and return a fresh handle to it.
    pub fn create(&mut self, value: T) -> Handle {
        let id = self.next;
        self.next += 1;
        self.entries.insert(id, value);
        tracing::debug!(handle = id, live = self.entries.len(), "handle created");
        Handle(id)
    }

    pub fn get(&self, handle: Handle) -> KernelResult<&T> {
        self.entries.get(&handle.0).ok_or_else(|| unknown(handle))
    }

    pub fn get_mut(&mut self, handle: Handle) -> KernelResult<&mut T> {
        self.entries.get_mut(&handle.0).ok_or_else(|| unknown(handle))
    }

    /// Remove the object and hand it back to the caller.
    pub fn destroy(&mut self, handle: Handle) -> KernelResult<T> {
        let value = self.entries.remove(&handle.0).ok_or_else(|| unknown(handle))?;
        tracing::debug!(handle = handle.0, live = self.entries.len(), "handle destroyed");
        Ok(value)
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.entries.contains_key(&handle.0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn unknown(handle: Handle) -> KernelError {
    tracing::warn!(handle = handle.0, "unknown handle");
    KernelError::UnknownHandle(handle.0)
}

/// A uniform distribution together with the generator that feeds it.
#[derive(Debug)]
pub struct SamplerSession {
    pub draw: UniformDraw,
    pub rng: StdRng,
}

/// Handle table of [`SamplerSession`]s.
#[derive(Debug, Default)]
pub struct SamplerRegistry {
    table: HandleTable<SamplerSession>,
    config: SamplingConfig,
    opened: u64,
}

impl SamplerRegistry {
    pub fn new(config: SamplingConfig) -> Self {
        SamplerRegistry {
            table: HandleTable::new(),
            config,
            opened: 0,
        }
    }

    /// Open a session drawing from `[min, max)`.
    ///
    /// Seed precedence: explicit `seed`, then `default_seed` offset by the
    /// number of sessions opened so far, then OS entropy.
    pub fn open(&mut self, min: f64, max: f64, seed: Option<u64>) -> KernelResult<Handle> {
        let draw = UniformDraw::new(min, max)?;
        let rng = match seed.or_else(|| {
            self.config
                .default_seed
                .map(|base| base.wrapping_add(self.opened))
        }) {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        self.opened += 1;
        Ok(self.table.create(SamplerSession { draw, rng }))
    }

    pub fn draw(&mut self, handle: Handle, n: usize) -> KernelResult<Vec<f64>> {
        let SamplerSession { draw, rng } = self.table.get_mut(handle)?;
        Ok(draw.draw(n, rng))
    }

    pub fn session(&self, handle: Handle) -> KernelResult<&SamplerSession> {
        self.table.get(handle)
    }

    pub fn close(&mut self, handle: Handle) -> KernelResult<()> {
        self.table.destroy(handle).map(|_| ())
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_get_destroy() {
        let mut table = HandleTable::new();
        let h = table.create(String::from("first"));
        assert_eq!(h.raw(), 1);
        assert_eq!(table.get(h).unwrap(), "first");

        table.get_mut(h).unwrap().push_str("-edited");
        assert_eq!(table.destroy(h).unwrap(), "first-edited");
        assert!(table.is_empty());
    }

    #[test]
    fn test_tokens_never_reused() {
        let mut table = HandleTable::new();
        let a = table.create(1);
        table.destroy(a).unwrap();
        let b = table.create(2);
        assert_ne!(a, b);
        assert!(b > a);
        assert!(!table.contains(a));
        assert!(table.contains(b));
    }

    #[test]
    fn test_double_destroy_is_unknown() {
        let mut table = HandleTable::new();
        let h = table.create(0u8);
        table.destroy(h).unwrap();
        match table.destroy(h) {
            Err(KernelError::UnknownHandle(id)) => assert_eq!(id, h.raw()),
            other => panic!("Unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_forged_handle_is_unknown() {
        let table: HandleTable<u8> = HandleTable::new();
        assert!(matches!(
            table.get(Handle::from_raw(0)),
            Err(KernelError::UnknownHandle(0))
        ));
    }

    #[test]
    fn test_registry_seeded_sessions_reproduce() {
        let mut reg = SamplerRegistry::default();
        let h1 = reg.open(0.0, 10.0, Some(7)).unwrap();
        let h2 = reg.open(0.0, 10.0, Some(7)).unwrap();
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.draw(h1, 16).unwrap(), reg.draw(h2, 16).unwrap());
    }

    #[test]
    fn test_registry_session_state_advances() {
        let mut reg = SamplerRegistry::default();
        let h = reg.open(0.0, 1.0, Some(3)).unwrap();
        let first = reg.draw(h, 8).unwrap();
        let second = reg.draw(h, 8).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_registry_default_seed() {
        let config = SamplingConfig {
            default_seed: Some(290),
        };
        let mut a = SamplerRegistry::new(config.clone());
        let mut b = SamplerRegistry::new(config);
        let ha = a.open(-1.0, 1.0, None).unwrap();
        let hb = b.open(-1.0, 1.0, None).unwrap();
        assert_eq!(a.draw(ha, 4).unwrap(), b.draw(hb, 4).unwrap());

        // Second session from the same registry gets a different stream.
        let ha2 = a.open(-1.0, 1.0, None).unwrap();
        let fresh = a.draw(ha2, 4).unwrap();
        let mut c = SamplerRegistry::new(SamplingConfig {
            default_seed: Some(290),
        });
        let hc = c.open(-1.0, 1.0, None).unwrap();
        assert_ne!(fresh, c.draw(hc, 4).unwrap());
    }

    #[test]
    fn test_registry_close() {
        let mut reg = SamplerRegistry::default();
        let h = reg.open(2.0, 3.0, None).unwrap();
        let session = reg.session(h).unwrap();
        assert_eq!(session.draw.min(), 2.0);
        assert_eq!(session.draw.max(), 3.0);
        reg.close(h).unwrap();
        assert!(reg.is_empty());
        assert!(matches!(reg.draw(h, 1), Err(KernelError::UnknownHandle(_))));
        assert!(matches!(reg.close(h), Err(KernelError::UnknownHandle(_))));
    }

    #[test]
    fn test_registry_rejects_bad_bounds() {
        let mut reg = SamplerRegistry::default();
        assert!(matches!(
            reg.open(5.0, 1.0, None),
            Err(KernelError::InvalidParameter(_))
        ));
        assert!(reg.is_empty());
    }
}
