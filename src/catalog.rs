//! Static clue catalog and the shuffled draw pool that feeds questions to the
//! session. The pool never runs dry: draining it triggers a refill and
//! reshuffle from the full catalog.

use rand::seq::SliceRandom;
use rand::Rng;

pub const LAYER_COUNT: u8 = 7;

pub const LAYER_NAMES: [&str; 7] = [
    "PHYSICAL",
    "DATA LINK",
    "NETWORK",
    "TRANSPORT",
    "SESSION",
    "PRESENTATION",
    "APPLICATION",
];

/// Four-character tag shown under each port.
pub fn layer_tag(layer: u8) -> &'static str {
    &LAYER_NAMES[layer as usize - 1][..4]
}

pub struct Prompt {
    pub text: &'static str,
    pub layer: u8,
}

const fn p(text: &'static str, layer: u8) -> Prompt {
    Prompt { text, layer }
}

pub static CATALOG: &[Prompt] = &[
    // Layer 1 - Physical
    p("Bit streams, voltage levels, cabling, hubs.", 1),
    p("Light pulses travelling through fiber optic cable.", 1),
    p("The electrical signal between a NIC and a switch.", 1),
    p("Repeaters regenerate weakening electrical signals here.", 1),
    // Layer 2 - Data Link
    p("Home of the MAC address, the physical hardware address.", 2),
    p("Switches and bridges operate here.", 2),
    p("The data unit is called a frame.", 2),
    p("ARP resolves an IP address to a MAC address here.", 2),
    p("Framing turns the raw bit stream from the wire into meaningful blocks.", 2),
    p("The CAM table maps MAC addresses to switch ports.", 2),
    // Layer 3 - Network
    p("Logical addressing with IP addresses.", 3),
    p("Routers operate here.", 3),
    p("The data unit is called a packet.", 3),
    p("ICMP, the protocol behind ping, lives here.", 3),
    p("Interprets addresses and decides the route data will take.", 3),
    p("Layer 3 switches can route between VLANs.", 3),
    // Layer 4 - Transport
    p("Provides end-to-end communication.", 4),
    p("TCP for reliability, UDP for speed.", 4),
    p("Data is sliced into segments.", 4),
    p("Flow control and error recovery.", 4),
    p("A connection opens with the TCP three-way handshake.", 4),
    p("Splits data into segments and stamps each with a port number.", 4),
    // Layer 5 - Session
    p("Manages the dialogue between two applications.", 5),
    p("Inserts synchronization checkpoints into the stream.", 5),
    p("NetBIOS and RPC protocols.", 5),
    p("Establishes, maintains and tears down sessions between hosts.", 5),
    p("Controls the flow of information, handling authentication and reconnects.", 5),
    // Layer 6 - Presentation
    p("Data formats like JPEG, ASCII and MP3.", 6),
    p("Encryption and decryption happen here.", 6),
    p("Data compression.", 6),
    p("Translates data formats between different operating systems.", 6),
    p("Associated with the encryption and integrity work of SSL/TLS.", 6),
    // Layer 7 - Application
    p("The layer closest to the user.", 7),
    p("HTTP, FTP, SMTP and DNS.", 7),
    p("Web browsers and e-mail clients.", 7),
    p("A window for users and application processes onto network services.", 7),
    p("Sockets, an IP address plus a port number, connect processes here.", 7),
];

/// Shuffled working pool, drawn one prompt per question.
pub struct PromptPool {
    queue: Vec<&'static Prompt>,
}

impl PromptPool {
    pub fn shuffled<R: Rng>(rng: &mut R) -> Self {
        let mut pool = Self { queue: Vec::new() };
        pool.refill(rng);
        pool
    }

    pub fn refill<R: Rng>(&mut self, rng: &mut R) {
        self.queue = CATALOG.iter().collect();
        self.queue.shuffle(rng);
    }

    /// Pops the next prompt, reshuffling the full catalog first if the pool
    /// is exhausted. The cycle never terminates.
    pub fn draw<R: Rng>(&mut self, rng: &mut R) -> &'static Prompt {
        if self.queue.is_empty() {
            self.refill(rng);
        }
        // The catalog is a non-empty static, so refill always leaves at
        // least one entry.
        self.queue.pop().expect("catalog is never empty")
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn catalog_covers_every_layer() {
        for layer in 1..=LAYER_COUNT {
            assert!(
                CATALOG.iter().any(|q| q.layer == layer),
                "no prompts for layer {layer}"
            );
        }
        assert!(CATALOG.iter().all(|q| (1..=LAYER_COUNT).contains(&q.layer)));
        assert!(CATALOG.len() >= 30);
    }

    #[test]
    fn draws_are_unique_until_refill() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut pool = PromptPool::shuffled(&mut rng);
        let texts: HashSet<_> = (0..CATALOG.len()).map(|_| pool.draw(&mut rng).text).collect();
        assert_eq!(texts.len(), CATALOG.len());
    }

    #[test]
    fn pool_refills_after_draining() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut pool = PromptPool::shuffled(&mut rng);
        for _ in 0..CATALOG.len() {
            pool.draw(&mut rng);
        }
        assert_eq!(pool.remaining(), 0);

        // The next draw must refill and reshuffle before popping.
        let prompt = pool.draw(&mut rng);
        assert!((1..=LAYER_COUNT).contains(&prompt.layer));
        assert_eq!(pool.remaining(), CATALOG.len() - 1);
    }

    #[test]
    fn layer_tags_are_four_chars() {
        for layer in 1..=LAYER_COUNT {
            assert_eq!(layer_tag(layer).len(), 4);
        }
    }
}
