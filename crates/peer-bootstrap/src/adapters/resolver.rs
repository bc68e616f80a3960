//! Multiaddr seed address resolver.

use crate::domain::{Multiaddr, PeerRecord, ResolveError};
use crate::ports::AddressResolver;
use multiaddr::Protocol;

/// Resolves `<transport multiaddr>/p2p/<peer-id>` seed strings.
///
/// Any transport part `multiaddr` understands is accepted (`/ip4/../tcp/..`,
/// `/dns4/..`, `/dnsaddr/..`, ...). `/ipfs/` is read as `/p2p/`. The peer id
/// must decode to a valid multihash.
///
/// ```rust
/// use peer_bootstrap::adapters::MultiaddrResolver;
/// use peer_bootstrap::ports::AddressResolver;
///
/// let record = MultiaddrResolver
///     .resolve("/ip4/104.131.131.82/tcp/4001/ipfs/QmaCpDMGvV2BGHeYERUEnRQAwe3N8SzbUtfsmvsqQLuvuJ")
///     .unwrap();
/// assert_eq!(record.address.to_string(), "/ip4/104.131.131.82/tcp/4001");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MultiaddrResolver;

impl AddressResolver for MultiaddrResolver {
    fn resolve(&self, address: &str) -> Result<PeerRecord, ResolveError> {
        // One trailing slash is common in hand-edited seed lists
        let trimmed = address.strip_suffix('/').unwrap_or(address);
        let mut addr: Multiaddr = trimmed
            .parse()
            .map_err(|e: multiaddr::Error| ResolveError::Malformed(e.to_string()))?;

        let id = match addr.pop() {
            Some(Protocol::P2p(id)) => id,
            _ => return Err(ResolveError::MissingPeerId),
        };
        if addr.is_empty() {
            return Err(ResolveError::MissingAddress);
        }

        Ok(PeerRecord::new(id, addr))
    }
}
