//! Page, visual and filter identifier generation
//!
//! Identifiers are 20-character lowercase hex strings used as folder names
//! and document keys. Generation is an injected capability rather than a
//! global, so generators stay pure and tests can pin deterministic names.

use rand::Rng;

const HEX_DIGITS: &[u8] = b"0123456789abcdef";

/// Length of generated identifiers
pub const ID_LEN: usize = 20;

/// Source of unique identifiers for pages, visuals and filters
pub trait IdGenerator {
    /// Produce the next identifier
    fn next_id(&mut self) -> String;
}

/// Random hex identifiers, the production source
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomHexIds;

impl IdGenerator for RandomHexIds {
    fn next_id(&mut self) -> String {
        let mut rng = rand::thread_rng();
        (0..ID_LEN)
            .map(|_| HEX_DIGITS[rng.gen_range(0..HEX_DIGITS.len())] as char)
            .collect()
    }
}

/// Deterministic counting identifiers for tests
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialIds {
    next: u64,
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{:020x}", self.next);
        self.next += 1;
        id
    }
}
