//! Immutable seed list, resolved once at construction.

use crate::domain::{ConfigError, PeerRecord};
use crate::ports::AddressResolver;

/// The resolved seed peers.
///
/// Resolution is all-or-nothing: the first address that fails to resolve
/// aborts construction, so a partial book never exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressBook {
    seeds: Vec<PeerRecord>,
}

impl AddressBook {
    /// Resolve every address string, preserving order.
    pub fn resolve<S: AsRef<str>>(
        addresses: &[S],
        resolver: &dyn AddressResolver,
    ) -> Result<Self, ConfigError> {
        let seeds = addresses
            .iter()
            .map(|address| {
                let address = address.as_ref();
                resolver
                    .resolve(address)
                    .map_err(|source| ConfigError::Resolve {
                        address: address.to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { seeds })
    }

    pub fn seeds(&self) -> &[PeerRecord] {
        &self.seeds
    }

    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }
}
