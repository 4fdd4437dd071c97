use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket},
    sync::OnceLock,
};

use crate::id::SnowflakeId;

/// Supplies the node ID embedded into every generated ID.
///
/// A generator calls [`NodeIdResolver::resolve`] exactly once, on its first
/// ID, and keeps the result for its lifetime. Implementations must not fail:
/// node-id collisions are an operational risk handled by deployment
/// configuration, not something to halt generation over.
pub trait NodeIdResolver {
    /// Returns a node ID in `0..=31`.
    fn resolve(&self) -> i64;
}

impl<N: NodeIdResolver + ?Sized> NodeIdResolver for &N {
    fn resolve(&self) -> i64 {
        (**self).resolve()
    }
}

/// A node ID supplied by configuration.
///
/// Use this when hosts share the low octets of their addresses, or whenever
/// the deployment assigns node IDs explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FixedNodeId(i64);

impl FixedNodeId {
    /// Returns `None` if `node_id` does not fit the 5-bit node field.
    pub const fn new(node_id: i64) -> Option<Self> {
        if node_id >= 0 && node_id <= SnowflakeId::MAX_NODE_ID {
            Some(Self(node_id))
        } else {
            None
        }
    }
}

impl NodeIdResolver for FixedNodeId {
    fn resolve(&self) -> i64 {
        self.0
    }
}

/// Derives the node ID from the host's IPv4 address.
///
/// The address is the one the OS would use for outbound traffic; finding it
/// only sets a route on an unconnected UDP socket and sends nothing. The last
/// two octets are combined and masked to the node field, so hosts whose
/// addresses agree in the low five bits collide.
///
/// The first successful or failed lookup is cached for the whole process and
/// never changes afterwards. On failure the node ID falls back to `0`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalIpNodeId;

static LOCAL_NODE_ID: OnceLock<i64> = OnceLock::new();

// TEST-NET-1; connecting a UDP socket here only consults the routing table.
const ROUTE_PROBE: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)), 9);

impl NodeIdResolver for LocalIpNodeId {
    fn resolve(&self) -> i64 {
        *LOCAL_NODE_ID.get_or_init(|| match local_ipv4() {
            Some(addr) => {
                let node_id = node_id_from_ipv4(addr);
                #[cfg(feature = "tracing")]
                tracing::debug!(%addr, node_id, "derived node id from local address");
                node_id
            }
            None => {
                #[cfg(feature = "tracing")]
                tracing::warn!("could not determine a local IPv4 address; using node id 0");
                0
            }
        })
    }
}

/// Combines the last two octets of `addr` and masks the result to the 5-bit
/// node field.
///
/// ```
/// use std::net::Ipv4Addr;
/// use shardflake::node_id_from_ipv4;
///
/// assert_eq!(node_id_from_ipv4(Ipv4Addr::new(10, 0, 1, 37)), 5);
/// ```
pub fn node_id_from_ipv4(addr: Ipv4Addr) -> i64 {
    let [_, _, high, low] = addr.octets();
    ((i64::from(high) << 8) | i64::from(low)) & SnowflakeId::NODE_ID_MASK
}

fn local_ipv4() -> Option<Ipv4Addr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
    socket.connect(ROUTE_PROBE).ok()?;
    match socket.local_addr().ok()?.ip() {
        IpAddr::V4(addr) if !addr.is_unspecified() => Some(addr),
        _ => None,
    }
}
