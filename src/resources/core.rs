//! Address types shared by clusters and listeners.

use serde::{Deserialize, Serialize};

/// Transport protocol for a socket address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransportProtocol {
    Tcp,
    Udp,
}

/// A network address with an explicit port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocketAddress {
    pub protocol: TransportProtocol,
    pub address: String,
    pub port_value: u16,
}

impl SocketAddress {
    /// TCP address helper; every address this control plane emits is TCP.
    pub fn tcp(address: impl Into<String>, port_value: u16) -> Self {
        Self {
            protocol: TransportProtocol::Tcp,
            address: address.into(),
            port_value,
        }
    }
}
