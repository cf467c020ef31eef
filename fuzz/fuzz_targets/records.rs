#![no_main]

use emfplus::{accum::ObjectReassembler, records::RecordStream, DecodeConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut reassembler = ObjectReassembler::new(DecodeConfig::default());
    for record in RecordStream::new(data).flatten() {
        if let Ok(objects) = reassembler.feed(&record) {
            for object in objects.iter().filter(|object| object.complete) {
                let _ = object.object();
            }
        }
    }
    let _ = reassembler.finish();
});
