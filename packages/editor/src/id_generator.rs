use crc32fast::Hasher;
use dashgrid_layout::TempId;

/// Derive a short, stable seed from a dashboard identifier using CRC32
pub fn get_seed(dashboard_id: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(dashboard_id.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential temporary ids for widgets added during editing
#[derive(Debug, Clone)]
pub struct TempIdGenerator {
    seed: String,
    count: u32,
}

impl TempIdGenerator {
    pub fn new(dashboard_id: &str) -> Self {
        Self {
            seed: get_seed(dashboard_id),
            count: 0,
        }
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self) -> TempId {
        self.count += 1;
        TempId(format!("tmp-{}-{}", self.seed, self.count))
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_dashboard_same_seed() {
        assert_eq!(get_seed("sales"), get_seed("sales"));
        assert_ne!(get_seed("sales"), get_seed("marketing"));
    }

    #[test]
    fn test_sequential_ids() {
        let mut gen = TempIdGenerator::new("sales");

        let id1 = gen.new_id();
        let id2 = gen.new_id();

        assert!(id1.0.ends_with("-1"));
        assert!(id2.0.ends_with("-2"));
        assert!(id1.0.contains(gen.seed()));
        assert_ne!(id1, id2);
    }
}
