//! Request helper extensions.

use std::net::{IpAddr, SocketAddr};

use salvo::prelude::Request;

const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

pub(crate) trait RequestExt {
    /// Address anonymous carts are keyed by: the first `x-forwarded-for` hop, else the peer.
    fn client_ip(&self) -> Option<IpAddr>;
}

impl RequestExt for Request {
    fn client_ip(&self) -> Option<IpAddr> {
        let forwarded = self
            .headers()
            .get(FORWARDED_FOR_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(first_forwarded_hop);

        forwarded.or_else(|| peer_ip(&self.remote_addr().to_string()))
    }
}

fn first_forwarded_hop(header: &str) -> Option<IpAddr> {
    header.split(',').next()?.trim().parse().ok()
}

fn peer_ip(remote_addr: &str) -> Option<IpAddr> {
    remote_addr
        .parse::<SocketAddr>()
        .map(|addr| addr.ip())
        .or_else(|_| remote_addr.parse::<IpAddr>())
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_forwarded_hop_wins() {
        assert_eq!(
            first_forwarded_hop("203.0.113.7, 10.0.0.1"),
            "203.0.113.7".parse().ok()
        );
        assert_eq!(
            first_forwarded_hop(" 2001:db8::1 "),
            "2001:db8::1".parse().ok()
        );
        assert_eq!(first_forwarded_hop("not-an-ip, 10.0.0.1"), None);
        assert_eq!(first_forwarded_hop(""), None);
    }

    #[test]
    fn peer_address_drops_the_port() {
        assert_eq!(peer_ip("192.0.2.1:54321"), "192.0.2.1".parse().ok());
        assert_eq!(peer_ip("[2001:db8::2]:443"), "2001:db8::2".parse().ok());
        assert_eq!(peer_ip("unknown"), None);
    }
}
