#![no_main]

use emfplus::{objects::Object, types::ObjectType};
use libfuzzer_sys::fuzz_target;
use strum::IntoEnumIterator;

fuzz_target!(|data: &[u8]| {
    for kind in ObjectType::iter() {
        let _ = Object::parse(kind, data);
    }
});
