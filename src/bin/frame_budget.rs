use colored::*;
use sattm::codec::FrameEncode;
use sattm::frame::{FRAME_HEADER_LEN, FRAME_MAX_LEN, FRAME_PAYLOAD_CAPACITY};
use sattm::store::{DataStore, MemoryStore};
use sattm::telemetry::{AttitudeSample, StatusSnapshot, TemperatureSample};

fn report(name: &str, len: usize) -> bool {
    let ratio = (len as f32 / FRAME_PAYLOAD_CAPACITY as f32) * 100.0;
    let fits = len < FRAME_PAYLOAD_CAPACITY;
    let verdict = if fits { "✅ fits".bright_green() } else { "❌ too large".bright_red() };

    println!("  {:<20} {:>4} bytes  {:>5.1}%  {}", name, len, ratio, verdict);
    fits
}

fn main() {
    println!("📏 Frame budget");
    println!("   frame:   {} bytes", FRAME_MAX_LEN);
    println!("   header:  {} bytes", FRAME_HEADER_LEN);
    println!("   payload: {} bytes", FRAME_PAYLOAD_CAPACITY);
    println!();

    let all_fit = [
        report("StatusSnapshot", StatusSnapshot::ENCODED_LEN),
        report("TemperatureSample", TemperatureSample::ENCODED_LEN),
        report("AttitudeSample", AttitudeSample::ENCODED_LEN),
    ]
    .iter()
    .all(|fits| *fits);

    // Show what a real status frame looks like
    let status = MemoryStore::simulated(36_000, 1).status_snapshot();
    match serde_json::to_string_pretty(&status) {
        Ok(json_str) => {
            println!("\n📄 Simulated status snapshot:");
            println!("{}", json_str);
        }
        Err(e) => {
            println!("❌ Serialization failed: {}", e);
        }
    }

    if !all_fit {
        std::process::exit(1);
    }
}
