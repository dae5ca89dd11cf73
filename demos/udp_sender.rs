/**
 * UDP Test Sender
 *
 * Sends structured control packets to a running firmware, including two
 * with an intentionally corrupted CRC that the firmware must drop.
 *
 * Usage: cargo run --example udp_sender [target]
 * Default: 192.168.1.100:12345
 */

use rov_link::{WirePacket, UDP_PORT};
use std::net::UdpSocket;
use std::thread;
use std::time::Duration;

const DEFAULT_TARGET_IP: &str = "192.168.1.100";

struct TestCase {
    seq: u32,
    payload: u64,
    corrupt_crc: bool,
}

fn create_packet(case: &TestCase) -> [u8; 16] {
    let mut packet = WirePacket::new(case.seq, case.payload);
    if case.corrupt_crc {
        packet.checksum ^= 0xDEAD_BEEF;
        println!("  CRC32 intentionally corrupted");
    }

    println!("  Sequence: {}", packet.sequence);
    println!("  Payload:  0x{:016X}", packet.payload);
    println!("  CRC32:    0x{:08X}", packet.checksum);
    packet.to_bytes()
}

fn main() -> std::io::Result<()> {
    let default_target = format!("{}:{}", DEFAULT_TARGET_IP, UDP_PORT);
    let target = std::env::args().nth(1).unwrap_or(default_target);

    println!("=== UDP test sender ===");
    println!("Target: {}", target);
    println!("Packet: [u32 seq][u64 payload][u32 crc32] = 16 bytes\n");

    let socket = UdpSocket::bind("0.0.0.0:0")?;

    let cases = [
        TestCase { seq: 1, payload: 0x1234_5678_90AB_CDEF, corrupt_crc: false },
        TestCase { seq: 2, payload: 0xDEAD_BEEF_CAFE_BABE, corrupt_crc: false },
        TestCase { seq: 3, payload: 0x0000_0000_0000_0000, corrupt_crc: false },
        TestCase { seq: 4, payload: 0xFFFF_FFFF_FFFF_FFFF, corrupt_crc: false },
        TestCase { seq: 100, payload: 0x1234_5678_9ABC_DEF0, corrupt_crc: false },
        TestCase { seq: 255, payload: 0x5555_AAAA_5555_AAAA, corrupt_crc: true },
        TestCase { seq: 254, payload: 0x5555_AAAA_5555_AAAA, corrupt_crc: true },
        TestCase { seq: 252, payload: 0x5555_AAAA_5555_AAAA, corrupt_crc: false },
    ];

    for (i, case) in cases.iter().enumerate() {
        println!("--- Test packet {} ---", i + 1);
        let bytes = create_packet(case);
        match socket.send_to(&bytes, &target) {
            Ok(n) => println!("  Sent {} bytes", n),
            Err(e) => println!("  Send failed: {}", e),
        }
        thread::sleep(Duration::from_secs(2));
        println!();
    }

    println!("=== Done, check the firmware log ===");
    Ok(())
}
