// src/alerts/blocklist.rs

/// Insertion-ordered set of blocked IPs
#[derive(Debug, Clone, Default)]
pub struct Blocklist {
    ips: Vec<String>,
}

impl Blocklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a persisted snapshot, dropping duplicates
    pub fn from_ips(ips: Vec<String>) -> Self {
        let mut list = Self::new();
        for ip in ips {
            list.block(ip);
        }
        list
    }

    /// Insert `ip`; returns false when it was already present
    pub fn block(&mut self, ip: String) -> bool {
        if self.contains(&ip) {
            return false;
        }
        self.ips.push(ip);
        true
    }

    pub fn contains(&self, ip: &str) -> bool {
        self.ips.iter().any(|existing| existing == ip)
    }

    pub fn len(&self) -> usize {
        self.ips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ips.is_empty()
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.ips.clone()
    }
}
