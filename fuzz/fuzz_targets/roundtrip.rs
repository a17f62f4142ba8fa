#![no_main]
use libfuzzer_sys::fuzz_target;
use tagzw::{Decoder, Encoder};

fuzz_target!(|data: &[u8]| {
    let encoded = Encoder::new().encode(data).expect("encoding never fails for valid input");
    let result = Decoder::new().decode(&encoded);
    assert!(result.is_ok(), "{:?}", result);
    assert_eq!(result.unwrap(), data);
});
