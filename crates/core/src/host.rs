//! Classification of the page host as local or remote.
//!
//! Training runs are expensive, so the train action is only offered when the
//! panel is served from a machine that is not reachable from the public network.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostLocality {
    Local,
    Remote,
}

impl HostLocality {
    /// Classifies a `location.hostname` value.
    pub fn classify(hostname: &str) -> Self {
        let h = hostname.trim();
        let local = h.is_empty()
            || h == "localhost"
            || h == "127.0.0.1"
            || h.starts_with("192.168.")
            || h.starts_with("10.");
        if local {
            HostLocality::Local
        } else {
            HostLocality::Remote
        }
    }

    pub fn is_local(self) -> bool {
        self == HostLocality::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loopback_and_private_ranges_are_local() {
        for h in ["localhost", "127.0.0.1", "", "192.168.1.20", "10.0.0.7"] {
            assert_eq!(HostLocality::classify(h), HostLocality::Local, "{h:?}");
        }
    }

    #[test]
    fn public_hosts_are_remote() {
        for h in ["example.com", "172.16.0.1", "8.8.8.8", "100.1.2.3", "my-app.vercel.app"] {
            assert_eq!(HostLocality::classify(h), HostLocality::Remote, "{h:?}");
        }
    }
}
